use async_trait::async_trait;
use crate::types::{LLMRequest, LLMResponse, AppResult};

/// A chat-completion backend. Both the research API and the summarizer sit
/// behind this trait.
#[async_trait]
pub trait LLMAdapter: Send + Sync {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse>;
}
