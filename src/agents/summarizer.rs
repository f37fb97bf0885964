//! Summarizer Agent
//!
//! Optional last step: asks a general-purpose model to turn the raw research
//! report into structured JSON. Callers treat every error from here as
//! non-fatal.

use crate::agents::extract::extract_json_object;
use crate::config::ResearchMode;
use crate::llm::LLMAdapter;
use crate::types::{AppError, AppResult, LLMRequest};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

const SINGLE_PHASE_SCHEMA: &str = r#"{
  "pain_points": [{ "insight": "", "quote": "", "source": "", "awareness_level": "" }],
  "desires": [{ "insight": "", "quote": "", "source": "" }],
  "objections": [{ "insight": "", "quote": "", "source": "" }],
  "emotional_drivers": [{ "insight": "", "quote": "", "source": "" }],
  "identity_shifts": [{ "insight": "", "quote": "", "source": "" }],
  "beliefs": [{ "insight": "", "quote": "", "source": "" }],
  "trigger_events": [{ "insight": "", "quote": "", "source": "" }],
  "buying_criteria": [{ "insight": "", "quote": "", "source": "" }],
  "influences": [{ "insight": "", "quote": "", "source": "" }],
  "competitor_insights": [{ "insight": "", "quote": "", "source": "" }],
  "demographics": { "age": "", "gender": "", "income": "", "location": "", "life_stage": "" },
  "psychographics": { "values": [], "lifestyle": [], "personality": [] },
  "ad_angles": [{ "angle": "", "target_awareness": "", "hook_style": "" }]
}"#;

const DUAL_PHASE_SCHEMA: &str = r#"{
  "phase1_behavioral": {
    "pain_points": [{ "insight": "", "quote": "", "source": "", "awareness_level": "" }],
    "desires": [{ "insight": "", "quote": "", "source": "" }],
    "hidden_desires": [{ "insight": "", "quote": "", "source": "" }],
    "objections": [{ "insight": "", "quote": "", "source": "" }],
    "emotional_drivers": [{ "insight": "", "quote": "", "source": "" }],
    "identity_shifts": [{ "insight": "", "quote": "", "source": "" }],
    "beliefs": [{ "insight": "", "quote": "", "source": "" }],
    "villains": [{ "insight": "", "quote": "", "source": "" }],
    "trigger_events": [{ "insight": "", "quote": "", "source": "" }],
    "failed_solutions": [{ "insight": "", "quote": "", "source": "" }],
    "buying_criteria": [{ "insight": "", "quote": "", "source": "" }],
    "language_patterns": [{ "phrase": "", "context": "", "source": "" }],
    "competitor_insights": [{ "insight": "", "quote": "", "source": "" }],
    "ad_angles": [{ "angle": "", "target_awareness": "", "hook_style": "" }],
    "headlines": [{ "headline": "", "target_segment": "" }],
    "offers": [{ "offer": "", "target_segment": "" }],
    "guarantees": [{ "guarantee": "", "addresses_fear": "" }]
  },
  "phase2_demographic": {
    "segments": {
      "unaware": { "age_range": "", "income": "", "life_stage": "", "where_they_research": [], "health_philosophy": "" },
      "problem_aware": { "age_range": "", "income": "", "life_stage": "", "where_they_research": [], "health_philosophy": "" },
      "solution_aware": { "age_range": "", "income": "", "life_stage": "", "where_they_research": [], "buying_criteria": [] },
      "product_aware": { "age_range": "", "income": "", "life_stage": "", "where_they_research": [], "decision_factors": [] },
      "most_aware": { "age_range": "", "income": "", "life_stage": "", "conversion_accelerators": [] },
      "new_customers": { "churn_risk": "", "critical_touchpoints": [], "expectations": "" },
      "repeat_customers": { "purchase_pattern": "", "retention_drivers": [], "ltv": "" },
      "at_risk": { "red_flags": [], "churn_reasons": [], "win_back_strategies": [] },
      "lost_customers": { "why_they_left": [], "reactivation_potential": "" },
      "advocates": { "behaviors": [], "where_active": [], "amplification_opportunities": [] }
    },
    "market_size": { "tam": "", "active_seekers_percent": "", "growth_rate": "" },
    "decision_hierarchy": [],
    "key_platforms": []
  },
  "total_citations": 0
}"#;

pub struct SummarizerAgent {
    llm: Arc<dyn LLMAdapter>,
    model: String,
}

impl SummarizerAgent {
    pub fn new(llm: Arc<dyn LLMAdapter>, model: impl Into<String>) -> Self {
        Self {
            llm,
            model: model.into(),
        }
    }

    /// Structure a research report.
    ///
    /// Dual-phase summaries get `total_citations` set from the merged citation count.
    pub async fn summarize(
        &self,
        job_id: &str,
        mode: ResearchMode,
        raw_research: &str,
        total_citations: usize,
    ) -> AppResult<Value> {
        info!(job_id = %job_id, model = %self.model, "Parsing research into structured format");

        let request = LLMRequest::user_prompt(&self.model, Self::create_parse_prompt(mode, raw_research));
        let response = self.llm.create_chat_completion(&request).await?;

        let mut parsed = extract_json_object(&response.content)?;

        if mode == ResearchMode::Dual {
            let object = parsed
                .as_object_mut()
                .ok_or_else(|| AppError::MalformedSummary("summary is not an object".to_string()))?;
            object.insert("total_citations".to_string(), Value::from(total_citations));
        }

        info!(job_id = %job_id, "Parsed research successfully");
        Ok(parsed)
    }

    fn create_parse_prompt(mode: ResearchMode, raw_research: &str) -> String {
        let (instruction, schema) = match mode {
            ResearchMode::Single => ("Extract", SINGLE_PHASE_SCHEMA),
            ResearchMode::Dual => ("Extract and organize", DUAL_PHASE_SCHEMA),
        };

        format!(
            "Parse the following market research into structured JSON. {instruction}:\n{schema}\n\nResearch to parse:\n{raw_research}\n\nReturn ONLY valid JSON, no other text."
        )
    }
}
