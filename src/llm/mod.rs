// LLM abstraction layer

pub mod provider;
pub mod chat_completions;

pub use provider::*;
pub use chat_completions::ChatCompletionsAdapter;
