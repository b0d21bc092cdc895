//! Debate Coordination Library
//!
//! The deterministic half of the product debate: everything that does not
//! talk to a model or the network.
//!
//! - `debate::types`: products, arguments, decisions, and their bounds
//! - `debate::state`: the per-run `DebateState` and its phase transitions
//! - `debate::moderator`: the turn sequencer that owns all state mutation
//! - `debate::budget`: per-side cap on tool lookups
//! - `debate::outcome`: serializable snapshot of a finished run

#![allow(clippy::uninlined_format_args)]

pub mod debate;

pub use debate::{
    Argument, ArgumentRecord, Choice, DebateOutcome, DebatePhase, DebateState, Decision,
    LookupBudget, Moderator, ModeratorError, NextAction, Polarity, Product, SentimentHint,
};
