// Research worker: drives one job from acknowledgment to a terminal state

use crate::agents::{combine_report, merge_citations, ResearchAgent, ResearchPhase, SummarizerAgent};
use crate::config::{Config, ResearchMode};
use crate::llm::ChatCompletionsAdapter;
use crate::queue::jobs::{Job, JobUpdate};
use crate::storage::{HttpJobStore, JobStore};
use crate::types::AppResult;
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// How a run ended
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Completed { citations: usize, summarized: bool },
    Failed { message: String },
    /// The store had no such job; nothing was written
    JobNotFound,
}

/// Research text and merged sources, ready to persist
struct CollectedResearch {
    raw_research: String,
    citations: Vec<String>,
}

pub struct ResearchWorker {
    store: Arc<dyn JobStore>,
    research: ResearchAgent,
    summarizer: Option<SummarizerAgent>,
    mode: ResearchMode,
}

impl ResearchWorker {
    pub fn new(
        store: Arc<dyn JobStore>,
        research: ResearchAgent,
        summarizer: Option<SummarizerAgent>,
        mode: ResearchMode,
    ) -> Self {
        Self {
            store,
            research,
            summarizer,
            mode,
        }
    }

    /// Wire the HTTP job store and chat-completion clients from configuration
    pub fn from_config(config: &Config) -> Self {
        let store = Arc::new(HttpJobStore::new(&config.job_store));

        let research_llm = Arc::new(ChatCompletionsAdapter::new(
            "Perplexity",
            &config.research.api_key,
            &config.research.api_base,
        ));
        let research = ResearchAgent::new(research_llm, &config.research.model);

        let summarizer = config.summarizer.api_key.as_deref().map(|api_key| {
            let llm = Arc::new(ChatCompletionsAdapter::new(
                "Lovable AI",
                api_key,
                &config.summarizer.api_base,
            ));
            SummarizerAgent::new(llm, &config.summarizer.model)
        });

        Self::new(store, research, summarizer, config.research.mode)
    }

    pub fn mode(&self) -> ResearchMode {
        self.mode
    }

    /// Run a job on its own task. The task outlives the caller; dropping the
    /// handle does not cancel it.
    pub fn spawn(self: &Arc<Self>, job_id: String) -> JoinHandle<RunOutcome> {
        let worker = Arc::clone(self);
        tokio::spawn(async move { worker.process_job(&job_id).await })
    }

    /// Process one job. Every error on the main path ends here and is
    /// reported to the store as a failed job.
    pub async fn process_job(&self, job_id: &str) -> RunOutcome {
        match self.run(job_id).await {
            Ok(outcome) => outcome,
            Err(e) => {
                let message = e.to_string();
                error!(job_id = %job_id, error = %message, "Research failed");

                self.checkpoint(job_id, JobUpdate::failed(message.clone())).await;
                RunOutcome::Failed { message }
            }
        }
    }

    async fn run(&self, job_id: &str) -> AppResult<RunOutcome> {
        let job = match self.store.fetch_job(job_id).await? {
            Some(job) => job,
            None => {
                warn!(job_id = %job_id, "Job not found");
                return Ok(RunOutcome::JobNotFound);
            }
        };

        info!(
            job_id = %job_id,
            product = %job.product_name,
            mode = %self.mode,
            "Starting research"
        );

        let research = match self.mode {
            ResearchMode::Single => self.run_single_phase(job_id, &job).await?,
            ResearchMode::Dual => self.run_dual_phase(job_id, &job).await?,
        };
        let total_citations = research.citations.len();

        let parsed_research = self.summarize(job_id, &research).await;
        let summarized = parsed_research.is_some();

        let message = match self.mode {
            ResearchMode::Single => "Research complete!".to_string(),
            ResearchMode::Dual => format!(
                "Prism Intelligence complete! {} sources analyzed.",
                total_citations
            ),
        };
        self.checkpoint(job_id, JobUpdate::completed(message, parsed_research))
            .await;

        let total_secs = job
            .created_at()
            .map(|created| (Utc::now() - created).num_milliseconds() as f64 / 1000.0);
        info!(
            job_id = %job_id,
            citations = total_citations,
            chars = research.raw_research.len(),
            summarized,
            total_secs = ?total_secs,
            "Job completed successfully"
        );

        Ok(RunOutcome::Completed {
            citations: total_citations,
            summarized,
        })
    }

    async fn run_single_phase(&self, job_id: &str, job: &Job) -> AppResult<CollectedResearch> {
        self.checkpoint(job_id, JobUpdate::running(10, "Starting deep research..."))
            .await;
        self.checkpoint(
            job_id,
            JobUpdate::progress(25, "Searching Reddit, forums, reviews, communities..."),
        )
        .await;

        let result = self
            .research
            .run_phase(job_id, ResearchPhase::MarketResearch, job)
            .await?;

        let citations = merge_citations([result.citations.as_slice()]);
        let research = CollectedResearch {
            raw_research: result.content,
            citations,
        };

        self.checkpoint(
            job_id,
            JobUpdate::progress(70, "Research complete. Processing results...")
                .with_research(research.raw_research.clone(), research.citations.clone()),
        )
        .await;

        Ok(research)
    }

    async fn run_dual_phase(&self, job_id: &str, job: &Job) -> AppResult<CollectedResearch> {
        self.checkpoint(
            job_id,
            JobUpdate::running(5, "Initializing Prism Intelligence Engine..."),
        )
        .await;

        self.checkpoint(
            job_id,
            JobUpdate::progress(
                10,
                "Phase 1: Extracting emotional drivers, pain points, and language patterns...",
            ),
        )
        .await;

        let behavioral = self
            .research
            .run_phase(job_id, ResearchPhase::Behavioral, job)
            .await?;

        self.checkpoint(
            job_id,
            JobUpdate::progress(45, "Phase 1 complete. Starting Phase 2: Demographic profiling..."),
        )
        .await;
        self.checkpoint(
            job_id,
            JobUpdate::progress(
                50,
                "Phase 2: Mapping demographics and psychographics to each segment...",
            ),
        )
        .await;

        let demographic = self
            .research
            .run_phase(job_id, ResearchPhase::Demographic, job)
            .await?;

        self.checkpoint(
            job_id,
            JobUpdate::progress(85, "Combining research phases and structuring insights..."),
        )
        .await;

        let citations = merge_citations([
            behavioral.citations.as_slice(),
            demographic.citations.as_slice(),
        ]);
        let raw_research = combine_report(job, &behavioral, &demographic, &citations);

        info!(
            job_id = %job_id,
            citations = citations.len(),
            chars = raw_research.len(),
            "Combined research"
        );

        self.checkpoint(
            job_id,
            JobUpdate::progress(95, "Finalizing research package...")
                .with_research(raw_research.clone(), citations.clone()),
        )
        .await;

        Ok(CollectedResearch {
            raw_research,
            citations,
        })
    }

    /// Best-effort structuring. Any failure is logged and yields `None`.
    async fn summarize(&self, job_id: &str, research: &CollectedResearch) -> Option<Value> {
        let summarizer = self.summarizer.as_ref()?;

        match summarizer
            .summarize(
                job_id,
                self.mode,
                &research.raw_research,
                research.citations.len(),
            )
            .await
        {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                warn!(job_id = %job_id, error = %e, "Parse failed (non-fatal)");
                None
            }
        }
    }

    /// Send an update to the store. Failures are logged and never stop the run.
    async fn checkpoint(&self, job_id: &str, update: JobUpdate) {
        if let Err(e) = self.store.update_job(job_id, &update).await {
            error!(
                job_id = %job_id,
                error = %e,
                terminal = update.is_terminal(),
                "Failed to update job"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LLMAdapter;
    use crate::queue::jobs::JobStatus;
    use crate::types::{AppError, LLMRequest, LLMResponse};
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingStore {
        job: Option<Job>,
        fail_fetch: bool,
        fail_updates: bool,
        updates: Mutex<Vec<JobUpdate>>,
    }

    impl RecordingStore {
        fn with_job(job: Job) -> Self {
            Self {
                job: Some(job),
                ..Default::default()
            }
        }

        fn updates(&self) -> Vec<JobUpdate> {
            self.updates.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl JobStore for RecordingStore {
        async fn fetch_job(&self, _job_id: &str) -> AppResult<Option<Job>> {
            if self.fail_fetch {
                return Err(AppError::JobStore("Failed to get job: 503 Service Unavailable".to_string()));
            }
            Ok(self.job.clone())
        }

        async fn update_job(&self, _job_id: &str, updates: &JobUpdate) -> AppResult<()> {
            self.updates.lock().unwrap().push(updates.clone());
            if self.fail_updates {
                return Err(AppError::JobStore("Failed to update job: 500".to_string()));
            }
            Ok(())
        }
    }

    /// Replies from a queue and records every prompt it was sent
    #[derive(Default)]
    struct ScriptedLLM {
        replies: Mutex<VecDeque<AppResult<LLMResponse>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedLLM {
        fn new(replies: Vec<AppResult<LLMResponse>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LLMAdapter for ScriptedLLM {
        async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
            self.prompts
                .lock()
                .unwrap()
                .push(request.messages[0].content.clone());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(AppError::LLMApi("no scripted reply".to_string())))
        }
    }

    fn reply(content: &str, citations: &[&str]) -> AppResult<LLMResponse> {
        Ok(LLMResponse {
            content: content.to_string(),
            citations: citations.iter().map(|c| c.to_string()).collect(),
            ..Default::default()
        })
    }

    fn acme() -> Job {
        Job {
            id: Some("job-1".to_string()),
            product_name: "Acme Widget".to_string(),
            niche: Some("home fitness".to_string()),
            ..Default::default()
        }
    }

    fn worker(
        store: Arc<RecordingStore>,
        research: Arc<ScriptedLLM>,
        summarizer: Option<Arc<ScriptedLLM>>,
        mode: ResearchMode,
    ) -> ResearchWorker {
        ResearchWorker::new(
            store,
            ResearchAgent::new(research, "sonar-deep-research"),
            summarizer.map(|llm| SummarizerAgent::new(llm, "google/gemini-2.5-flash")),
            mode,
        )
    }

    fn progress_of(updates: &[JobUpdate]) -> Vec<u8> {
        updates.iter().filter_map(|u| u.progress).collect()
    }

    fn terminal_count(updates: &[JobUpdate]) -> usize {
        updates.iter().filter(|u| u.is_terminal()).count()
    }

    #[tokio::test]
    async fn test_single_phase_dedupes_citations_and_completes() {
        let store = Arc::new(RecordingStore::with_job(acme()));
        let research = ScriptedLLM::new(vec![reply("findings", &["http://a", "http://a", "http://b"])]);

        let outcome = worker(store.clone(), research.clone(), None, ResearchMode::Single)
            .process_job("job-1")
            .await;

        assert_eq!(outcome, RunOutcome::Completed { citations: 2, summarized: false });

        let updates = store.updates();
        assert_eq!(progress_of(&updates), vec![10, 25, 70, 100]);
        assert_eq!(updates[0].status, Some(JobStatus::Running));
        assert!(updates[0].started_at.is_some());

        let persisted = &updates[2];
        assert_eq!(persisted.raw_research.as_deref(), Some("findings"));
        assert_eq!(
            persisted.citations,
            Some(vec!["http://a".to_string(), "http://b".to_string()])
        );

        let last = updates.last().unwrap();
        assert_eq!(last.status, Some(JobStatus::Completed));
        assert_eq!(last.parsed_research, Some(None));
        assert!(last.completed_at.is_some());
        assert_eq!(terminal_count(&updates), 1);

        let prompts = research.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Acme Widget"));
        assert!(prompts[0].contains("home fitness"));
    }

    #[tokio::test]
    async fn test_dual_phase_runs_both_phases_in_order() {
        let store = Arc::new(RecordingStore::with_job(Job {
            product_description: Some("Folds flat under a bed".to_string()),
            ..acme()
        }));
        let research = ScriptedLLM::new(vec![
            reply("behavioral", &["http://a", "http://b"]),
            reply("demographic", &["http://b", "http://c"]),
        ]);

        let outcome = worker(store.clone(), research.clone(), None, ResearchMode::Dual)
            .process_job("job-1")
            .await;

        assert_eq!(outcome, RunOutcome::Completed { citations: 3, summarized: false });

        let updates = store.updates();
        let progress = progress_of(&updates);
        assert_eq!(progress, vec![5, 10, 45, 50, 85, 95, 100]);
        assert!(progress.windows(2).all(|w| w[0] <= w[1]));

        let persisted = updates.iter().find(|u| u.raw_research.is_some()).unwrap();
        let raw = persisted.raw_research.as_deref().unwrap();
        assert!(raw.contains("behavioral"));
        assert!(raw.contains("demographic"));
        assert_eq!(persisted.citations.as_ref().unwrap().len(), 3);

        assert_eq!(
            updates.last().unwrap().stage_message.as_deref(),
            Some("Prism Intelligence complete! 3 sources analyzed.")
        );

        let prompts = research.prompts();
        assert_eq!(prompts.len(), 2);
        assert!(prompts[0].contains("elite direct response market researcher"));
        assert!(prompts[1].starts_with("For Acme Widget in the home fitness market"));
        assert!(prompts
            .iter()
            .all(|p| p.ends_with("Product description: Folds flat under a bed")));
    }

    #[tokio::test]
    async fn test_missing_job_writes_nothing() {
        let store = Arc::new(RecordingStore::default());
        let research = ScriptedLLM::new(vec![]);

        let outcome = worker(store.clone(), research.clone(), None, ResearchMode::Dual)
            .process_job("ghost")
            .await;

        assert_eq!(outcome, RunOutcome::JobNotFound);
        assert!(store.updates().is_empty());
        assert!(research.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_failure_reports_failed_job() {
        let store = Arc::new(RecordingStore {
            fail_fetch: true,
            ..Default::default()
        });

        let outcome = worker(store.clone(), ScriptedLLM::new(vec![]), None, ResearchMode::Single)
            .process_job("job-1")
            .await;

        assert!(matches!(outcome, RunOutcome::Failed { .. }));
        let updates = store.updates();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].status, Some(JobStatus::Failed));
        assert!(updates[0].error_message.as_deref().unwrap().contains("503"));
    }

    #[tokio::test]
    async fn test_research_failure_fails_job_with_status_code() {
        let store = Arc::new(RecordingStore::with_job(acme()));
        let research = ScriptedLLM::new(vec![Err(AppError::LLMApi(
            "Perplexity API error (500 Internal Server Error): upstream down".to_string(),
        ))]);
        let summarizer = ScriptedLLM::new(vec![reply("{}", &[])]);

        let outcome = worker(store.clone(), research, Some(summarizer.clone()), ResearchMode::Single)
            .process_job("job-1")
            .await;

        let RunOutcome::Failed { message } = outcome else {
            panic!("expected a failed run");
        };
        assert!(message.contains("500"));

        let updates = store.updates();
        let last = updates.last().unwrap();
        assert_eq!(last.status, Some(JobStatus::Failed));
        assert!(last.error_message.as_deref().unwrap().contains("500"));
        assert!(last.completed_at.is_some());
        assert_eq!(terminal_count(&updates), 1);
        assert!(updates.iter().all(|u| u.status != Some(JobStatus::Completed)));
        assert!(summarizer.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_second_phase_failure_fails_job() {
        let store = Arc::new(RecordingStore::with_job(acme()));
        let research = ScriptedLLM::new(vec![
            reply("behavioral", &["http://a"]),
            Err(AppError::LLMApi("Perplexity API error (502 Bad Gateway): ".to_string())),
        ]);

        let outcome = worker(store.clone(), research, None, ResearchMode::Dual)
            .process_job("job-1")
            .await;

        assert!(matches!(outcome, RunOutcome::Failed { .. }));
        let updates = store.updates();
        assert_eq!(progress_of(&updates), vec![5, 10, 45, 50]);
        assert!(updates.iter().all(|u| u.raw_research.is_none()));
        assert_eq!(updates.last().unwrap().status, Some(JobStatus::Failed));
    }

    #[tokio::test]
    async fn test_summary_is_stored_when_parsing_succeeds() {
        let store = Arc::new(RecordingStore::with_job(acme()));
        let research = ScriptedLLM::new(vec![reply("findings", &["http://a"])]);
        let summarizer = ScriptedLLM::new(vec![reply(
            "```json\n{\"desires\": [{\"insight\": \"more time\"}]}\n```",
            &[],
        )]);

        let outcome = worker(store.clone(), research, Some(summarizer.clone()), ResearchMode::Single)
            .process_job("job-1")
            .await;

        assert_eq!(outcome, RunOutcome::Completed { citations: 1, summarized: true });
        assert_eq!(
            store.updates().last().unwrap().parsed_research,
            Some(Some(json!({ "desires": [{ "insight": "more time" }] })))
        );
        assert!(summarizer.prompts()[0].contains("Research to parse:\nfindings"));
    }

    #[tokio::test]
    async fn test_summarizer_error_still_completes() {
        let store = Arc::new(RecordingStore::with_job(acme()));
        let research = ScriptedLLM::new(vec![reply("findings", &[])]);
        let summarizer = ScriptedLLM::new(vec![Err(AppError::LLMApi(
            "Lovable AI API error (500 Internal Server Error): ".to_string(),
        ))]);

        let outcome = worker(store.clone(), research, Some(summarizer), ResearchMode::Single)
            .process_job("job-1")
            .await;

        assert_eq!(outcome, RunOutcome::Completed { citations: 0, summarized: false });
        let last = store.updates().last().cloned().unwrap();
        assert_eq!(last.status, Some(JobStatus::Completed));
        assert_eq!(last.parsed_research, Some(None));
    }

    #[tokio::test]
    async fn test_summary_without_json_still_completes() {
        let store = Arc::new(RecordingStore::with_job(acme()));
        let research = ScriptedLLM::new(vec![
            reply("behavioral", &["http://a"]),
            reply("demographic", &["http://a"]),
        ]);
        let summarizer = ScriptedLLM::new(vec![reply("I could not find any structure.", &[])]);

        let outcome = worker(store.clone(), research, Some(summarizer), ResearchMode::Dual)
            .process_job("job-1")
            .await;

        assert_eq!(outcome, RunOutcome::Completed { citations: 1, summarized: false });
        let updates = store.updates();
        assert_eq!(updates.last().unwrap().parsed_research, Some(None));
        assert_eq!(terminal_count(&updates), 1);
    }

    #[tokio::test]
    async fn test_update_failures_do_not_stop_the_run() {
        let store = Arc::new(RecordingStore {
            job: Some(acme()),
            fail_updates: true,
            ..Default::default()
        });
        let research = ScriptedLLM::new(vec![reply("findings", &["http://a"])]);

        let outcome = worker(store.clone(), research.clone(), None, ResearchMode::Single)
            .process_job("job-1")
            .await;

        assert_eq!(outcome, RunOutcome::Completed { citations: 1, summarized: false });
        assert_eq!(research.prompts().len(), 1);
        assert_eq!(progress_of(&store.updates()), vec![10, 25, 70, 100]);
    }

    #[tokio::test]
    async fn test_spawned_run_reaches_terminal_state() {
        let store = Arc::new(RecordingStore::with_job(acme()));
        let research = ScriptedLLM::new(vec![reply("findings", &[])]);
        let worker = Arc::new(worker(store.clone(), research, None, ResearchMode::Single));

        let outcome = worker.spawn("job-1".to_string()).await.unwrap();

        assert!(matches!(outcome, RunOutcome::Completed { .. }));
        assert_eq!(terminal_count(&store.updates()), 1);
    }
}
