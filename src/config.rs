use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;

pub const DEFAULT_RESEARCH_API_BASE: &str = "https://api.perplexity.ai";
pub const DEFAULT_RESEARCH_MODEL: &str = "sonar-deep-research";
pub const DEFAULT_SUMMARIZER_API_BASE: &str = "https://ai.gateway.lovable.dev/v1";
pub const DEFAULT_SUMMARIZER_MODEL: &str = "google/gemini-2.5-flash";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub job_store: JobStoreConfig,
    pub research: ResearchConfig,
    pub summarizer: SummarizerConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobStoreConfig {
    pub base_url: String,
    pub worker_secret: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResearchConfig {
    pub api_key: String,
    pub api_base: String,
    pub model: String,
    pub mode: ResearchMode,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SummarizerConfig {
    /// Summarization is skipped entirely when this is `None`
    pub api_key: Option<String>,
    pub api_base: String,
    pub model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub log_dir: Option<String>,
}

/// How many research phases a job runs through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResearchMode {
    Single,
    Dual,
}

impl Default for ResearchMode {
    fn default() -> Self {
        ResearchMode::Dual
    }
}

impl std::fmt::Display for ResearchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResearchMode::Single => write!(f, "single"),
            ResearchMode::Dual => write!(f, "dual"),
        }
    }
}

impl std::str::FromStr for ResearchMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "single" | "single-phase" => Ok(ResearchMode::Single),
            "dual" | "dual-phase" => Ok(ResearchMode::Dual),
            other => anyhow::bail!("unknown research mode '{}' (expected 'single' or 'dual')", other),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &str| get(key).with_context(|| format!("{} must be set", key));

        Ok(Self {
            server: ServerConfig {
                port: get("PORT")
                    .unwrap_or_else(|| "3000".to_string())
                    .parse()
                    .context("PORT must be a valid port number")?,
                host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            },
            job_store: JobStoreConfig {
                base_url: require("LOVABLE_FUNCTIONS_URL")?
                    .trim_end_matches('/')
                    .to_string(),
                worker_secret: require("WORKER_SECRET")?,
            },
            research: ResearchConfig {
                api_key: require("PERPLEXITY_API_KEY")?,
                api_base: get("PERPLEXITY_API_BASE")
                    .unwrap_or_else(|| DEFAULT_RESEARCH_API_BASE.to_string())
                    .trim_end_matches('/')
                    .to_string(),
                model: get("RESEARCH_MODEL").unwrap_or_else(|| DEFAULT_RESEARCH_MODEL.to_string()),
                mode: match get("RESEARCH_MODE") {
                    Some(mode) => mode.parse()?,
                    None => ResearchMode::default(),
                },
            },
            summarizer: SummarizerConfig {
                api_key: get("LOVABLE_API_KEY"),
                api_base: get("SUMMARIZER_API_BASE")
                    .unwrap_or_else(|| DEFAULT_SUMMARIZER_API_BASE.to_string())
                    .trim_end_matches('/')
                    .to_string(),
                model: get("SUMMARIZER_MODEL").unwrap_or_else(|| DEFAULT_SUMMARIZER_MODEL.to_string()),
            },
            logging: LoggingConfig {
                log_dir: get("LOG_DIR"),
            },
        })
    }
}
