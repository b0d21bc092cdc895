//! Moderator: decides whose turn it is and when the debate ends.
//!
//! The moderator is the only writer of a `DebateState`. It accepts an
//! argument only from the side it is waiting on, counts a round once the con
//! side has answered, and hands off to the decision step when the round
//! limit is reached.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::state::{DebatePhase, DebateState, TransitionError};
use super::types::{Argument, ArgumentRecord, Decision, Polarity};

/// Default number of pro/con rounds before a decision.
pub const DEFAULT_ROUND_LIMIT: u32 = 3;

/// What the moderator expects next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NextAction {
    /// Waiting for an argument from the given side.
    Argue(Polarity),
    /// Waiting for the final decision.
    Decide,
    /// Debate is complete.
    Complete,
}

impl std::fmt::Display for NextAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Argue(polarity) => write!(f, "argue_{polarity}"),
            Self::Decide => write!(f, "decide"),
            Self::Complete => write!(f, "complete"),
        }
    }
}

/// Error from the moderator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModeratorError {
    #[error("round limit must be at least 1")]
    ZeroRoundLimit,

    #[error("expected an argument from the {expected} side, got {actual}")]
    WrongTurn { expected: Polarity, actual: Polarity },

    #[error("no argument accepted in phase {0}")]
    NotArguing(DebatePhase),

    #[error("decision not accepted in phase {0}")]
    NotDeciding(DebatePhase),

    #[error("transition failed: {0}")]
    TransitionFailed(String),

    #[error("debate ended in phase {0} without a decision")]
    Incomplete(DebatePhase),
}

impl From<TransitionError> for ModeratorError {
    fn from(err: TransitionError) -> Self {
        Self::TransitionFailed(err.to_string())
    }
}

/// Compute the phase that follows `phase` once its turn has been recorded.
///
/// `completed_rounds` is the round count after the turn was applied.
pub fn next_phase(phase: DebatePhase, completed_rounds: u32, round_limit: u32) -> DebatePhase {
    match phase {
        DebatePhase::AwaitingPro => DebatePhase::AwaitingCon,
        DebatePhase::AwaitingCon if completed_rounds < round_limit => DebatePhase::AwaitingPro,
        DebatePhase::AwaitingCon => DebatePhase::Deciding,
        DebatePhase::Deciding | DebatePhase::Done => DebatePhase::Done,
    }
}

/// Turn sequencer for a fixed number of pro/con rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ModeratorSettings")]
pub struct Moderator {
    round_limit: u32,
}

#[derive(Deserialize)]
struct ModeratorSettings {
    round_limit: u32,
}

impl TryFrom<ModeratorSettings> for Moderator {
    type Error = ModeratorError;

    fn try_from(settings: ModeratorSettings) -> Result<Self, Self::Error> {
        Self::new(settings.round_limit)
    }
}

impl Default for Moderator {
    fn default() -> Self {
        Self {
            round_limit: DEFAULT_ROUND_LIMIT,
        }
    }
}

impl Moderator {
    pub fn new(round_limit: u32) -> Result<Self, ModeratorError> {
        if round_limit == 0 {
            return Err(ModeratorError::ZeroRoundLimit);
        }
        Ok(Self { round_limit })
    }

    pub fn round_limit(&self) -> u32 {
        self.round_limit
    }

    /// Fresh state for a new run, waiting on the pro side.
    pub fn start(&self) -> DebateState {
        DebateState::new(self.round_limit)
    }

    /// What action is expected next.
    pub fn next_action(&self, state: &DebateState) -> NextAction {
        match state.phase() {
            DebatePhase::AwaitingPro => NextAction::Argue(Polarity::Pro),
            DebatePhase::AwaitingCon => NextAction::Argue(Polarity::Con),
            DebatePhase::Deciding => NextAction::Decide,
            DebatePhase::Done => NextAction::Complete,
        }
    }

    /// Append an argument from `polarity` and advance.
    ///
    /// The state is left untouched when the argument is rejected.
    pub fn record_argument(
        &self,
        state: &mut DebateState,
        polarity: Polarity,
        argument: Argument,
    ) -> Result<NextAction, ModeratorError> {
        let phase = state.phase();
        let expected = phase
            .awaited_polarity()
            .ok_or(ModeratorError::NotArguing(phase))?;
        if expected != polarity {
            return Err(ModeratorError::WrongTurn {
                expected,
                actual: polarity,
            });
        }

        let completed = match polarity {
            Polarity::Pro => state.round(),
            Polarity::Con => state.round() + 1,
        };
        let to = next_phase(phase, completed, state.round_limit());
        let reason = match to {
            DebatePhase::Deciding => format!("round limit {} reached", state.round_limit()),
            _ => format!("{polarity} argued in round {}", state.current_round()),
        };
        state.transition(to, &reason)?;

        state.push_argument(ArgumentRecord {
            round: state.current_round(),
            polarity,
            argument,
            recorded_at: Utc::now(),
        });
        if polarity == Polarity::Con {
            state.complete_round();
        }

        tracing::debug!(
            run_id = %state.id(),
            %polarity,
            round = state.round(),
            phase = %state.phase(),
            "argument recorded"
        );
        Ok(self.next_action(state))
    }

    /// Record the verdict and finish the debate.
    pub fn record_decision(
        &self,
        state: &mut DebateState,
        decision: Decision,
    ) -> Result<(), ModeratorError> {
        if state.phase() != DebatePhase::Deciding {
            return Err(ModeratorError::NotDeciding(state.phase()));
        }
        state.transition(DebatePhase::Done, &format!("decided {}", decision.choice))?;
        state.set_decision(decision);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debate::types::Choice;

    fn arg(sentiment: i32) -> Argument {
        Argument::new(sentiment, format!("argument with sentiment {sentiment}"))
    }

    fn decision() -> Decision {
        Decision {
            sentiment: 3,
            choice: Choice::Buy,
            explanation: "pros outweigh cons".to_string(),
        }
    }

    fn run_rounds(moderator: &Moderator, state: &mut DebateState) {
        while let NextAction::Argue(polarity) = moderator.next_action(state) {
            let sentiment = if polarity == Polarity::Pro { 5 } else { -5 };
            moderator
                .record_argument(state, polarity, arg(sentiment))
                .unwrap();
        }
    }

    #[test]
    fn test_zero_round_limit_rejected() {
        assert_eq!(Moderator::new(0).unwrap_err(), ModeratorError::ZeroRoundLimit);
    }

    #[test]
    fn test_deserialize_checks_round_limit() {
        let moderator: Moderator = serde_json::from_str(r#"{"round_limit": 2}"#).unwrap();
        assert_eq!(moderator.round_limit(), 2);

        let err = serde_json::from_str::<Moderator>(r#"{"round_limit": 0}"#).unwrap_err();
        assert!(err.to_string().contains("round limit must be at least 1"));
    }

    #[test]
    fn test_default_round_limit() {
        assert_eq!(Moderator::default().round_limit(), DEFAULT_ROUND_LIMIT);
    }

    #[test]
    fn test_two_rounds_alternate_then_decide() {
        let moderator = Moderator::new(2).unwrap();
        let mut state = moderator.start();

        let mut seen = Vec::new();
        while let NextAction::Argue(polarity) = moderator.next_action(&state) {
            seen.push(polarity);
            moderator.record_argument(&mut state, polarity, arg(1)).unwrap();
        }
        assert_eq!(
            seen,
            vec![Polarity::Pro, Polarity::Con, Polarity::Pro, Polarity::Con]
        );
        assert_eq!(moderator.next_action(&state), NextAction::Decide);
        assert_eq!(state.round(), 2);

        moderator.record_decision(&mut state, decision()).unwrap();
        assert_eq!(moderator.next_action(&state), NextAction::Complete);
        assert!(state.is_complete());
        assert_eq!(state.decision().unwrap().choice, Choice::Buy);
    }

    #[test]
    fn test_argument_count_is_twice_round_limit() {
        for limit in 1..=6 {
            let moderator = Moderator::new(limit).unwrap();
            let mut state = moderator.start();
            run_rounds(&moderator, &mut state);
            assert_eq!(state.history().len() as u32, 2 * limit);
            assert_eq!(state.round(), limit);
            for (i, record) in state.history().iter().enumerate() {
                let expected = if i % 2 == 0 { Polarity::Pro } else { Polarity::Con };
                assert_eq!(record.polarity, expected);
                assert_eq!(record.round, i as u32 / 2 + 1);
            }
        }
    }

    #[test]
    fn test_round_counter_never_exceeds_limit() {
        let moderator = Moderator::new(1).unwrap();
        let mut state = moderator.start();
        run_rounds(&moderator, &mut state);
        let err = moderator
            .record_argument(&mut state, Polarity::Pro, arg(1))
            .unwrap_err();
        assert_eq!(err, ModeratorError::NotArguing(DebatePhase::Deciding));
        assert_eq!(state.round(), 1);
        assert_eq!(state.history().len(), 2);
    }

    #[test]
    fn test_wrong_turn_leaves_state_untouched() {
        let moderator = Moderator::new(2).unwrap();
        let mut state = moderator.start();
        let err = moderator
            .record_argument(&mut state, Polarity::Con, arg(-3))
            .unwrap_err();
        assert_eq!(
            err,
            ModeratorError::WrongTurn {
                expected: Polarity::Pro,
                actual: Polarity::Con
            }
        );
        assert!(state.history().is_empty());
        assert!(state.transitions().is_empty());
        assert_eq!(state.phase(), DebatePhase::AwaitingPro);
    }

    #[test]
    fn test_decision_only_once() {
        let moderator = Moderator::new(1).unwrap();
        let mut state = moderator.start();
        assert_eq!(
            moderator.record_decision(&mut state, decision()).unwrap_err(),
            ModeratorError::NotDeciding(DebatePhase::AwaitingPro)
        );
        run_rounds(&moderator, &mut state);
        moderator.record_decision(&mut state, decision()).unwrap();
        assert_eq!(
            moderator.record_decision(&mut state, decision()).unwrap_err(),
            ModeratorError::NotDeciding(DebatePhase::Done)
        );
    }

    #[test]
    fn test_no_arguments_after_done() {
        let moderator = Moderator::new(1).unwrap();
        let mut state = moderator.start();
        run_rounds(&moderator, &mut state);
        moderator.record_decision(&mut state, decision()).unwrap();
        assert!(moderator
            .record_argument(&mut state, Polarity::Pro, arg(1))
            .is_err());
        assert_eq!(state.history().len(), 2);
    }

    #[test]
    fn test_next_phase_function() {
        assert_eq!(next_phase(DebatePhase::AwaitingPro, 0, 2), DebatePhase::AwaitingCon);
        assert_eq!(next_phase(DebatePhase::AwaitingCon, 1, 2), DebatePhase::AwaitingPro);
        assert_eq!(next_phase(DebatePhase::AwaitingCon, 2, 2), DebatePhase::Deciding);
        assert_eq!(next_phase(DebatePhase::Deciding, 2, 2), DebatePhase::Done);
    }

    #[test]
    fn test_transition_reasons_logged() {
        let moderator = Moderator::new(1).unwrap();
        let mut state = moderator.start();
        run_rounds(&moderator, &mut state);
        let reasons: Vec<&str> = state
            .transitions()
            .iter()
            .map(|t| t.reason.as_str())
            .collect();
        assert_eq!(reasons, vec!["pro argued in round 1", "round limit 1 reached"]);
    }

    #[test]
    fn test_next_action_display() {
        assert_eq!(NextAction::Argue(Polarity::Pro).to_string(), "argue_pro");
        assert_eq!(NextAction::Argue(Polarity::Con).to_string(), "argue_con");
        assert_eq!(NextAction::Decide.to_string(), "decide");
        assert_eq!(NextAction::Complete.to_string(), "complete");
    }
}
