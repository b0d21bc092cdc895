//! Model invocation behind a trait.
//!
//! `RigBackend` talks to any OpenAI-compatible chat completions endpoint
//! through rig. The workflow only sees `CompletionBackend`, so tests can
//! script replies without a network.

use async_trait::async_trait;
use rig::client::CompletionClient;
use rig::completion::Prompt;
use rig::providers::openai;
use tracing::debug;

use crate::config::ModelSettings;

/// Which agent a request is made for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentRole {
    ProAdvocate,
    ConAdvocate,
    Judge,
}

impl AgentRole {
    pub fn agent_name(self) -> &'static str {
        match self {
            Self::ProAdvocate => "pro_advocate",
            Self::ConAdvocate => "con_advocate",
            Self::Judge => "judge",
        }
    }
}

/// A single-turn completion request.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub role: AgentRole,
    /// System prompt.
    pub preamble: String,
    pub prompt: String,
    pub temperature: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("failed to build model client: {0}")]
    Client(String),

    #[error("completion request failed: {0}")]
    Completion(String),
}

/// Anything that can turn a prompt into a reply.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<String, BackendError>;
}

/// rig-backed OpenAI-compatible backend.
///
/// One client serves all roles; model selection happens per request.
pub struct RigBackend {
    client: openai::CompletionsClient,
    argument_model: String,
    decision_model: String,
}

impl RigBackend {
    pub fn from_settings(settings: &ModelSettings) -> Result<Self, BackendError> {
        let client = openai::CompletionsClient::builder()
            .api_key(&settings.api_key)
            .base_url(&settings.base_url)
            .build()
            .map_err(|e| BackendError::Client(e.to_string()))?;
        Ok(Self {
            client,
            argument_model: settings.argument_model.clone(),
            decision_model: settings.decision_model.clone(),
        })
    }

    fn model_for(&self, role: AgentRole) -> &str {
        match role {
            AgentRole::ProAdvocate | AgentRole::ConAdvocate => &self.argument_model,
            AgentRole::Judge => &self.decision_model,
        }
    }
}

#[async_trait]
impl CompletionBackend for RigBackend {
    async fn complete(&self, request: CompletionRequest) -> Result<String, BackendError> {
        let model = self.model_for(request.role);
        debug!(
            agent = request.role.agent_name(),
            model,
            prompt_chars = request.prompt.len(),
            "sending completion"
        );

        let agent = self
            .client
            .agent(model)
            .name(request.role.agent_name())
            .preamble(&request.preamble)
            .temperature(request.temperature)
            .build();

        agent
            .prompt(request.prompt.as_str())
            .await
            .map_err(|e| BackendError::Completion(e.to_string()))
    }
}
