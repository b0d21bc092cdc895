//! Debate driver: asks the moderator what comes next and dispatches to the
//! advocates or the judge until the run completes.
//!
//! ```text
//! start ─► Argue(pro) ─► Argue(con) ─► ... (round_limit rounds) ─► Decide ─► Complete
//! ```
//!
//! Turns run strictly one after another. A failed turn records nothing and
//! ends the run with its error.

use std::time::Instant;

use coordination::{DebateOutcome, DebateState, Moderator, ModeratorError, NextAction, Product};
use tracing::{error, info};

use crate::agents::{ArgumentGenerator, Collaborators, DecisionRenderer, ResearchNotes};
use crate::config::WorkflowConfig;
use crate::errors::DebateError;
use crate::prompts::PROMPT_VERSION;

pub struct DebateWorkflow {
    moderator: Moderator,
    advocate: ArgumentGenerator,
    judge: DecisionRenderer,
    lookups_per_polarity: u32,
}

impl DebateWorkflow {
    /// Fails with `DebateError::Transition` when the round limit is zero.
    pub fn new(config: WorkflowConfig, collaborators: Collaborators) -> Result<Self, DebateError> {
        let moderator = Moderator::new(config.round_limit)?;
        let advocate = ArgumentGenerator::new(
            collaborators.backend.clone(),
            collaborators.search,
            collaborators.page,
            config.argument_temperature,
            config.call_timeout,
        );
        let judge = DecisionRenderer::new(
            collaborators.backend,
            config.decision_temperature,
            config.call_timeout,
        );
        Ok(Self {
            moderator,
            advocate,
            judge,
            lookups_per_polarity: config.lookups_per_polarity,
        })
    }

    pub fn round_limit(&self) -> u32 {
        self.moderator.round_limit()
    }

    /// Run one full debate about `product`.
    #[tracing::instrument(skip_all, fields(product = %product.name))]
    pub async fn run(&self, product: Product) -> Result<DebateOutcome, DebateError> {
        let started = Instant::now();
        let mut state = self.moderator.start();
        let mut notes = ResearchNotes::new(self.lookups_per_polarity);
        info!(
            run_id = %state.id(),
            round_limit = state.round_limit(),
            prompt_version = PROMPT_VERSION,
            "debate started"
        );

        if let Err(e) = self.drive(&product, &mut state, &mut notes).await {
            error!(
                run_id = %state.id(),
                status = %state.status_line(),
                error = %e,
                "debate aborted"
            );
            return Err(e);
        }

        let outcome = finish(product, &state)?;
        info!(
            run_id = %outcome.run_id,
            choice = %outcome.decision.choice,
            sentiment = outcome.decision.sentiment,
            pro_lookups = notes.budget().used(coordination::Polarity::Pro),
            con_lookups = notes.budget().used(coordination::Polarity::Con),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "debate complete"
        );
        Ok(outcome)
    }

    async fn drive(
        &self,
        product: &Product,
        state: &mut DebateState,
        notes: &mut ResearchNotes,
    ) -> Result<(), DebateError> {
        loop {
            match self.moderator.next_action(state) {
                NextAction::Argue(polarity) => {
                    let argument = self
                        .advocate
                        .generate(product, state.history(), polarity, state.current_round(), notes)
                        .await?;
                    self.moderator.record_argument(state, polarity, argument)?;
                }
                NextAction::Decide => {
                    let decision = self.judge.render(product, state.history()).await?;
                    self.moderator.record_decision(state, decision)?;
                }
                NextAction::Complete => return Ok(()),
            }
        }
    }
}

/// Snapshot a finished run; a state without a verdict is a sequencing error.
fn finish(product: Product, state: &DebateState) -> Result<DebateOutcome, DebateError> {
    DebateOutcome::from_state(product, state)
        .ok_or(ModeratorError::Incomplete(state.phase()))
        .map_err(DebateError::from)
}
