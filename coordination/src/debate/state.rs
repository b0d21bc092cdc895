//! Debate state machine: phases, transitions, and the per-run state record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::types::{ArgumentRecord, Decision, Polarity};

/// Phase of a debate run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DebatePhase {
    /// Waiting for the pro side to argue.
    AwaitingPro,
    /// Waiting for the con side to answer.
    AwaitingCon,
    /// Round budget exhausted; waiting for the verdict.
    Deciding,
    /// Verdict rendered.
    Done,
}

impl DebatePhase {
    /// Whether this is a terminal phase.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done)
    }

    /// The side this phase is waiting on, if any.
    pub fn awaited_polarity(self) -> Option<Polarity> {
        match self {
            Self::AwaitingPro => Some(Polarity::Pro),
            Self::AwaitingCon => Some(Polarity::Con),
            Self::Deciding | Self::Done => None,
        }
    }

    /// Valid transitions from this phase.
    pub fn valid_transitions(self) -> &'static [DebatePhase] {
        match self {
            Self::AwaitingPro => &[Self::AwaitingCon],
            Self::AwaitingCon => &[Self::AwaitingPro, Self::Deciding],
            Self::Deciding => &[Self::Done],
            Self::Done => &[],
        }
    }
}

impl std::fmt::Display for DebatePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AwaitingPro => write!(f, "awaiting_pro"),
            Self::AwaitingCon => write!(f, "awaiting_con"),
            Self::Deciding => write!(f, "deciding"),
            Self::Done => write!(f, "done"),
        }
    }
}

/// A phase transition record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebateTransition {
    pub from: DebatePhase,
    pub to: DebatePhase,
    pub timestamp: DateTime<Utc>,
    pub reason: String,
}

/// Error for invalid state transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionError {
    pub from: DebatePhase,
    pub to: DebatePhase,
    pub reason: String,
}

impl std::fmt::Display for TransitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid transition {} → {}: {}",
            self.from, self.to, self.reason
        )
    }
}

impl std::error::Error for TransitionError {}

/// A deserialized state whose fields contradict each other.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("inconsistent debate state: {0}")]
pub struct InvalidState(String);

/// Mutable record of one debate run.
///
/// Owned by a single workflow run. Only the `Moderator` mutates it; callers
/// get read access through the accessors. Deserializing checks the same
/// invariants the moderator maintains.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "DebateRecord")]
pub struct DebateState {
    id: Uuid,
    phase: DebatePhase,
    /// Completed rounds (a round is one pro turn followed by one con turn).
    round: u32,
    round_limit: u32,
    history: Vec<ArgumentRecord>,
    transitions: Vec<DebateTransition>,
    decision: Option<Decision>,
    created_at: DateTime<Utc>,
}

/// Unchecked wire form of `DebateState`.
#[derive(Deserialize)]
struct DebateRecord {
    id: Uuid,
    phase: DebatePhase,
    round: u32,
    round_limit: u32,
    history: Vec<ArgumentRecord>,
    transitions: Vec<DebateTransition>,
    decision: Option<Decision>,
    created_at: DateTime<Utc>,
}

impl TryFrom<DebateRecord> for DebateState {
    type Error = InvalidState;

    fn try_from(r: DebateRecord) -> Result<Self, Self::Error> {
        let fail = |msg: String| Err(InvalidState(msg));

        if r.round_limit == 0 {
            return fail("round limit is 0".into());
        }
        let rounds_ok = match r.phase {
            DebatePhase::AwaitingPro | DebatePhase::AwaitingCon => r.round < r.round_limit,
            DebatePhase::Deciding | DebatePhase::Done => r.round == r.round_limit,
        };
        if !rounds_ok {
            return fail(format!(
                "round {}/{} in phase {}",
                r.round, r.round_limit, r.phase
            ));
        }

        let expected_len = 2 * r.round as usize + usize::from(r.phase == DebatePhase::AwaitingCon);
        if r.history.len() != expected_len {
            return fail(format!(
                "{} arguments recorded, expected {expected_len}",
                r.history.len()
            ));
        }
        for (i, record) in r.history.iter().enumerate() {
            let polarity = if i % 2 == 0 { Polarity::Pro } else { Polarity::Con };
            let round = i as u32 / 2 + 1;
            if record.polarity != polarity || record.round != round {
                return fail(format!(
                    "argument {i} is {} in round {}, expected {polarity} in round {round}",
                    record.polarity, record.round
                ));
            }
        }

        if r.decision.is_some() != (r.phase == DebatePhase::Done) {
            return fail(format!("decision presence does not match phase {}", r.phase));
        }

        let mut phase = DebatePhase::AwaitingPro;
        for t in &r.transitions {
            if t.from != phase || !phase.valid_transitions().contains(&t.to) {
                return fail(format!("transition {} → {} out of sequence", t.from, t.to));
            }
            phase = t.to;
        }
        if phase != r.phase {
            return fail(format!("transition log ends in {phase}, state is {}", r.phase));
        }

        Ok(Self {
            id: r.id,
            phase: r.phase,
            round: r.round,
            round_limit: r.round_limit,
            history: r.history,
            transitions: r.transitions,
            decision: r.decision,
            created_at: r.created_at,
        })
    }
}

impl DebateState {
    pub(super) fn new(round_limit: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            phase: DebatePhase::AwaitingPro,
            round: 0,
            round_limit,
            history: Vec::new(),
            transitions: Vec::new(),
            decision: None,
            created_at: Utc::now(),
        }
    }

    /// Transition to a new phase with a reason.
    pub(super) fn transition(
        &mut self,
        to: DebatePhase,
        reason: &str,
    ) -> Result<(), TransitionError> {
        if !self.phase.valid_transitions().contains(&to) {
            return Err(TransitionError {
                from: self.phase,
                to,
                reason: format!(
                    "not a valid transition (allowed: {:?})",
                    self.phase.valid_transitions()
                ),
            });
        }

        self.transitions.push(DebateTransition {
            from: self.phase,
            to,
            timestamp: Utc::now(),
            reason: reason.to_string(),
        });
        self.phase = to;
        Ok(())
    }

    pub(super) fn push_argument(&mut self, record: ArgumentRecord) {
        self.history.push(record);
    }

    pub(super) fn complete_round(&mut self) {
        self.round += 1;
    }

    pub(super) fn set_decision(&mut self, decision: Decision) {
        self.decision = Some(decision);
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn phase(&self) -> DebatePhase {
        self.phase
    }

    /// Completed rounds so far.
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn round_limit(&self) -> u32 {
        self.round_limit
    }

    /// Round the next argument belongs to (1-indexed).
    pub fn current_round(&self) -> u32 {
        self.round + 1
    }

    pub fn history(&self) -> &[ArgumentRecord] {
        &self.history
    }

    pub fn transitions(&self) -> &[DebateTransition] {
        &self.transitions
    }

    pub fn decision(&self) -> Option<&Decision> {
        self.decision.as_ref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whether the debate has ended.
    pub fn is_complete(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Arguments produced by one side, in order.
    pub fn arguments_for(&self, polarity: Polarity) -> impl Iterator<Item = &ArgumentRecord> {
        self.history.iter().filter(move |r| r.polarity == polarity)
    }

    /// Compact status line.
    pub fn status_line(&self) -> String {
        format!(
            "[{}] round {}/{} | {} arguments recorded | run={}",
            self.phase,
            self.round,
            self.round_limit,
            self.history.len(),
            self.id
        )
    }
}
