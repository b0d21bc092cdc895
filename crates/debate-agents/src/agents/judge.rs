//! Decision agent: reads the whole transcript and picks buy or skip.

use std::sync::Arc;
use std::time::Duration;

use coordination::{ArgumentRecord, Decision, Product};
use tracing::{info, warn};

use super::complete_within;
use crate::backend::{AgentRole, CompletionBackend, CompletionRequest};
use crate::contracts::parse_decision;
use crate::errors::{DebateError, Stage};
use crate::prompts;

pub struct DecisionRenderer {
    backend: Arc<dyn CompletionBackend>,
    temperature: f64,
    call_timeout: Duration,
}

impl DecisionRenderer {
    pub fn new(backend: Arc<dyn CompletionBackend>, temperature: f64, call_timeout: Duration) -> Self {
        Self {
            backend,
            temperature,
            call_timeout,
        }
    }

    /// Render the verdict for a finished exchange. No lookups are made here.
    pub async fn render(
        &self,
        product: &Product,
        history: &[ArgumentRecord],
    ) -> Result<Decision, DebateError> {
        let request = CompletionRequest {
            role: AgentRole::Judge,
            preamble: prompts::JUDGE_PREAMBLE.to_string(),
            prompt: prompts::decision_prompt(product, history),
            temperature: self.temperature,
        };
        let raw = complete_within(
            self.backend.as_ref(),
            request,
            self.call_timeout,
            Stage::Decision,
        )
        .await?;

        let decision = parse_decision(&raw).map_err(|e| {
            warn!(error = %e, "unusable decision reply");
            DebateError::external(Stage::Decision, e.to_string())
        })?;
        info!(
            choice = %decision.choice,
            sentiment = decision.sentiment,
            arguments = history.len(),
            "decision rendered"
        );
        Ok(decision)
    }
}
