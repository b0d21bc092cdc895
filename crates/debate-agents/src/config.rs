//! Runtime settings for a debate run.
//!
//! ## Precedence (highest to lowest)
//!
//! 1. CLI flags (applied by the binary)
//! 2. Environment variables (`DEBATE_*`)
//! 3. TOML file passed with `--config`
//! 4. Built-in defaults
//!
//! ## Environment variables
//!
//! | Variable                    | Field                          |
//! |-----------------------------|--------------------------------|
//! | `DEBATE_MODEL_URL`          | `model.base_url`               |
//! | `DEBATE_MODEL_API_KEY`      | `model.api_key` (or `OPENAI_API_KEY`) |
//! | `DEBATE_ARGUMENT_MODEL`     | `model.argument_model`         |
//! | `DEBATE_DECISION_MODEL`     | `model.decision_model`         |
//! | `DEBATE_SEARCH_URL`         | `search.base_url`              |
//! | `DEBATE_SEARCH_API_KEY`     | `search.api_key` (or `TAVILY_API_KEY`) |
//! | `DEBATE_ROUNDS`             | `round_limit`                  |
//! | `DEBATE_LOOKUPS_PER_SIDE`   | `lookups_per_polarity`         |
//! | `DEBATE_CALL_TIMEOUT_SECS`  | `call_timeout_secs`            |

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use coordination::debate::{DEFAULT_LOOKUPS_PER_POLARITY, DEFAULT_ROUND_LIMIT};
use serde::{Deserialize, Serialize};

const DEFAULT_MODEL_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_SEARCH_URL: &str = "https://api.tavily.com";
const DEFAULT_MAX_SEARCH_RESULTS: usize = 5;
const DEFAULT_MAX_PAGE_CHARS: usize = 6_000;
const DEFAULT_CALL_TIMEOUT_SECS: u64 = 60;
const DEFAULT_USER_AGENT: &str = "product-debate/0.1 (+https://github.com/product-debate)";

const ENV_MODEL_URL: &str = "DEBATE_MODEL_URL";
const ENV_MODEL_API_KEY: &str = "DEBATE_MODEL_API_KEY";
const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
const ENV_ARGUMENT_MODEL: &str = "DEBATE_ARGUMENT_MODEL";
const ENV_DECISION_MODEL: &str = "DEBATE_DECISION_MODEL";
const ENV_SEARCH_URL: &str = "DEBATE_SEARCH_URL";
const ENV_SEARCH_API_KEY: &str = "DEBATE_SEARCH_API_KEY";
const ENV_TAVILY_API_KEY: &str = "TAVILY_API_KEY";
const ENV_ROUNDS: &str = "DEBATE_ROUNDS";
const ENV_LOOKUPS: &str = "DEBATE_LOOKUPS_PER_SIDE";
const ENV_CALL_TIMEOUT: &str = "DEBATE_CALL_TIMEOUT_SECS";

/// OpenAI-compatible chat completions endpoint and per-role models.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    pub base_url: String,
    pub api_key: String,
    /// Model used by the pro and con agents.
    pub argument_model: String,
    /// Model used by the decision agent.
    pub decision_model: String,
    pub argument_temperature: f64,
    /// Lower keeps verdicts stable across runs.
    pub decision_temperature: f64,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_MODEL_URL.to_string(),
            api_key: String::new(),
            argument_model: DEFAULT_MODEL.to_string(),
            decision_model: DEFAULT_MODEL.to_string(),
            argument_temperature: 0.7,
            decision_temperature: 0.2,
        }
    }
}

/// Review search backend (Tavily-compatible `POST /search`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub base_url: String,
    pub api_key: String,
    pub max_results: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SEARCH_URL.to_string(),
            api_key: String::new(),
            max_results: DEFAULT_MAX_SEARCH_RESULTS,
        }
    }
}

/// Product page fetching.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeSettings {
    pub user_agent: String,
    /// Extracted text beyond this many characters is dropped.
    pub max_page_chars: usize,
}

impl Default for ScrapeSettings {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_page_chars: DEFAULT_MAX_PAGE_CHARS,
        }
    }
}

/// Top-level settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebateSettings {
    pub model: ModelSettings,
    pub search: SearchSettings,
    pub scrape: ScrapeSettings,
    /// Pro/con rounds before the decision.
    pub round_limit: u32,
    /// Tool lookups each side may make over the whole debate.
    pub lookups_per_polarity: u32,
    /// Deadline applied to every external call.
    pub call_timeout_secs: u64,
}

impl Default for DebateSettings {
    fn default() -> Self {
        Self {
            model: ModelSettings::default(),
            search: SearchSettings::default(),
            scrape: ScrapeSettings::default(),
            round_limit: DEFAULT_ROUND_LIMIT,
            lookups_per_polarity: DEFAULT_LOOKUPS_PER_POLARITY,
            call_timeout_secs: DEFAULT_CALL_TIMEOUT_SECS,
        }
    }
}

/// The subset of settings the workflow itself needs.
#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    pub round_limit: u32,
    pub lookups_per_polarity: u32,
    pub call_timeout: Duration,
    pub argument_temperature: f64,
    pub decision_temperature: f64,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        DebateSettings::default().workflow_config()
    }
}

impl DebateSettings {
    /// Load settings: optional TOML file, then environment overrides, then validation.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let settings = base.with_overrides(|key| std::env::var(key).ok());
        settings.validate()?;
        Ok(settings)
    }

    /// Parse a TOML settings file. Missing fields take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content).context("Failed to parse debate settings TOML")
    }

    /// Apply overrides from a key lookup (the process environment in production).
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = non_empty(ENV_MODEL_URL) {
            self.model.base_url = v;
        }
        if let Some(v) = non_empty(ENV_MODEL_API_KEY).or_else(|| non_empty(ENV_OPENAI_API_KEY)) {
            self.model.api_key = v;
        }
        if let Some(v) = non_empty(ENV_ARGUMENT_MODEL) {
            self.model.argument_model = v;
        }
        if let Some(v) = non_empty(ENV_DECISION_MODEL) {
            self.model.decision_model = v;
        }
        if let Some(v) = non_empty(ENV_SEARCH_URL) {
            self.search.base_url = v;
        }
        if let Some(v) = non_empty(ENV_SEARCH_API_KEY).or_else(|| non_empty(ENV_TAVILY_API_KEY)) {
            self.search.api_key = v;
        }
        if let Some(v) = non_empty(ENV_ROUNDS).and_then(|v| v.parse().ok()) {
            self.round_limit = v;
        }
        if let Some(v) = non_empty(ENV_LOOKUPS).and_then(|v| v.parse().ok()) {
            self.lookups_per_polarity = v;
        }
        if let Some(v) = non_empty(ENV_CALL_TIMEOUT).and_then(|v| v.parse().ok()) {
            self.call_timeout_secs = v;
        }
        self
    }

    /// Validate all fields; the error names the first offending one.
    pub fn validate(&self) -> Result<()> {
        if self.round_limit == 0 {
            anyhow::bail!("round_limit must be > 0");
        }
        if self.call_timeout_secs == 0 {
            anyhow::bail!("call_timeout_secs must be > 0");
        }
        for (name, value) in [
            ("argument_temperature", self.model.argument_temperature),
            ("decision_temperature", self.model.decision_temperature),
        ] {
            if !(0.0..=2.0).contains(&value) {
                anyhow::bail!("{name} must be in [0, 2], got {value}");
            }
        }
        if self.search.max_results == 0 {
            anyhow::bail!("search.max_results must be > 0");
        }
        url::Url::parse(&self.model.base_url)
            .with_context(|| format!("model.base_url is not a URL: {}", self.model.base_url))?;
        url::Url::parse(&self.search.base_url)
            .with_context(|| format!("search.base_url is not a URL: {}", self.search.base_url))?;
        Ok(())
    }

    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }

    pub fn workflow_config(&self) -> WorkflowConfig {
        WorkflowConfig {
            round_limit: self.round_limit,
            lookups_per_polarity: self.lookups_per_polarity,
            call_timeout: self.call_timeout(),
            argument_temperature: self.model.argument_temperature,
            decision_temperature: self.model.decision_temperature,
        }
    }
}
