//! Research Agent
//!
//! Runs research phases against the deep-research API and assembles their
//! output into the report stored on the job.

use crate::agents::prompts::{self, build_prompt};
use crate::llm::LLMAdapter;
use crate::queue::jobs::Job;
use crate::types::{AppResult, LLMRequest};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// One discrete call to the research API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResearchPhase {
    /// The only phase of a single-phase run
    MarketResearch,
    /// Dual-phase, phase 1
    Behavioral,
    /// Dual-phase, phase 2
    Demographic,
}

impl ResearchPhase {
    pub fn template(&self) -> &'static str {
        match self {
            ResearchPhase::MarketResearch => prompts::MARKET_RESEARCH_PROMPT,
            ResearchPhase::Behavioral => prompts::BEHAVIORAL_PROMPT,
            ResearchPhase::Demographic => prompts::DEMOGRAPHIC_PROMPT,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ResearchPhase::MarketResearch => "Market research",
            ResearchPhase::Behavioral => "Phase 1",
            ResearchPhase::Demographic => "Phase 2",
        }
    }

    pub fn prompt_for(&self, job: &Job) -> String {
        build_prompt(self.template(), &job.product_name, job.niche(), job.description())
    }
}

/// Text and sources returned by one phase
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhaseResult {
    pub content: String,
    pub citations: Vec<String>,
}

pub struct ResearchAgent {
    llm: Arc<dyn LLMAdapter>,
    model: String,
}

impl ResearchAgent {
    pub fn new(llm: Arc<dyn LLMAdapter>, model: impl Into<String>) -> Self {
        Self {
            llm,
            model: model.into(),
        }
    }

    /// Run one phase for a job. Any API failure is returned to the caller.
    pub async fn run_phase(&self, job_id: &str, phase: ResearchPhase, job: &Job) -> AppResult<PhaseResult> {
        let request = LLMRequest::user_prompt(&self.model, phase.prompt_for(job));

        info!(job_id = %job_id, phase = phase.label(), model = %self.model, "Calling research API");
        let started = Instant::now();

        let response = self.llm.create_chat_completion(&request).await?;

        info!(
            job_id = %job_id,
            phase = phase.label(),
            citations = response.citations.len(),
            chars = response.content.len(),
            finish_reason = response.finish_reason.as_deref(),
            total_tokens = response.usage.as_ref().map(|u| u.total_tokens),
            elapsed_secs = started.elapsed().as_secs_f64(),
            "Research phase complete"
        );

        Ok(PhaseResult {
            content: response.content,
            citations: response.citations,
        })
    }
}

/// Union of citation lists with duplicates dropped, first appearance wins
pub fn merge_citations<'a, I>(lists: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a [String]>,
{
    let mut seen = HashSet::new();
    lists
        .into_iter()
        .flatten()
        .filter(|url| seen.insert(*url))
        .cloned()
        .collect()
}

/// Markdown report combining both phases of a dual-phase run
pub fn combine_report(
    job: &Job,
    behavioral: &PhaseResult,
    demographic: &PhaseResult,
    citations: &[String],
) -> String {
    let citation_list = citations
        .iter()
        .enumerate()
        .map(|(i, url)| format!("{}. {}", i + 1, url))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"
# PRISM INTELLIGENCE ENGINE - COMPLETE MARKET RESEARCH

## Research Summary
- **Product:** {product}
- **Niche:** {niche}
- **Total Sources Analyzed:** {total}
- **Phase 1 (Behavioral):** {phase1_sources} sources
- **Phase 2 (Demographic):** {phase2_sources} sources

---

# PHASE 1: EMOTIONAL & BEHAVIORAL RESEARCH

{phase1}

---

# PHASE 2: DEMOGRAPHIC & PSYCHOGRAPHIC PROFILES

{phase2}

---

## All Citations ({total} sources)

{citation_list}
"#,
        product = job.product_name,
        niche = job.niche().unwrap_or("Not specified"),
        total = citations.len(),
        phase1_sources = behavioral.citations.len(),
        phase2_sources = demographic.citations.len(),
        phase1 = behavioral.content,
        phase2 = demographic.content,
        citation_list = citation_list,
    )
}
