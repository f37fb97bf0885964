//! Agent System
//!
//! The agents that do the actual research work for a job:
//!
//! - **Research Agent**: builds phase prompts and calls the deep-research API
//! - **Summarizer Agent**: optionally structures the finished report as JSON
//!
//! ## Pipeline Overview
//!
//! ```text
//!  Job record
//!      │
//!      ▼
//! ┌─────────────┐
//! │  Research   │  → 1 phase (single) or 2 sequential phases (dual)
//! │   Agent     │
//! └─────────────┘
//!      │  merged citations + report
//!      ▼
//! ┌─────────────┐
//! │ Summarizer  │  → best effort, failure leaves parsed_research null
//! │   Agent     │
//! └─────────────┘
//!      │
//!      ▼
//!  Job update
//! ```
//!
//! Sequencing and progress reporting live in [`crate::queue::workers`].

pub mod prompts;
pub mod research;
pub mod extract;
pub mod summarizer;

// Re-export main components
pub use prompts::build_prompt;
pub use research::{ResearchAgent, ResearchPhase, PhaseResult, merge_citations, combine_report};
pub use extract::extract_json_object;
pub use summarizer::SummarizerAgent;
