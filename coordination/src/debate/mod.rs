//! Debate Orchestration: Pro/Con Turn Sequencing
//!
//! Deterministic state machine for a fixed-length debate between a pro side
//! and a con side, followed by a single decision.
//!
//! # Debate Flow
//!
//! ```text
//! AwaitingPro → AwaitingCon → [round < limit?]
//!      ▲             │              │
//!      └─────────────┘ yes          │ no
//!                                   ▼
//!                               Deciding → Done
//! ```
//!
//! A round is one pro turn followed by one con turn. No transition skips a
//! side, and `Deciding` is entered exactly once.

pub mod budget;
pub mod moderator;
pub mod outcome;
pub mod state;
pub mod types;

pub use budget::{LookupBudget, DEFAULT_LOOKUPS_PER_POLARITY};
pub use moderator::{next_phase, Moderator, ModeratorError, NextAction, DEFAULT_ROUND_LIMIT};
pub use outcome::DebateOutcome;
pub use state::{DebatePhase, DebateState, DebateTransition, InvalidState, TransitionError};
pub use types::{
    Argument, ArgumentRecord, Choice, Decision, Polarity, Product, SentimentHint,
    ValidationError, MAX_ARGUMENT_CHARS, MAX_EXPLANATION_CHARS, SENTIMENT_MAX, SENTIMENT_MIN,
};
