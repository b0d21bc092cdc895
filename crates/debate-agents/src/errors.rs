//! Error taxonomy for a debate run.
//!
//! Nothing here is retried internally: every failure aborts the run and is
//! returned to the caller. `is_retriable()` tells a caller that wants to
//! wrap the workflow in its own retry loop which failures are worth another
//! attempt, without string matching.

use std::fmt;

use coordination::debate::ModeratorError;
use coordination::Polarity;
use thiserror::Error;

use crate::tools::ToolError;

/// Which model-backed step an external call belonged to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ProArgument,
    ConArgument,
    Decision,
}

impl From<Polarity> for Stage {
    fn from(polarity: Polarity) -> Self {
        match polarity {
            Polarity::Pro => Self::ProArgument,
            Polarity::Con => Self::ConArgument,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProArgument => write!(f, "pro_argument"),
            Self::ConArgument => write!(f, "con_argument"),
            Self::Decision => write!(f, "decision"),
        }
    }
}

/// Unified error type for a debate run.
#[derive(Debug, Error)]
pub enum DebateError {
    /// The model was unreachable, timed out, or replied with output that
    /// could not be decoded into the expected shape.
    #[error("external call failed during {stage}: {message}")]
    ExternalCallFailure { stage: Stage, message: String },

    /// The review search backend errored.
    #[error("review search unavailable: {0}")]
    SearchUnavailable(String),

    /// The product page could not be fetched at all.
    #[error("failed to scrape {url}: {message}")]
    ScrapeFailure { url: String, message: String },

    /// The moderator rejected a turn. Indicates a sequencing bug.
    #[error("debate sequencing error: {0}")]
    Transition(#[from] ModeratorError),

    /// Settings are invalid or a client could not be built.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl DebateError {
    /// Build an `ExternalCallFailure` conveniently.
    pub fn external(stage: Stage, message: impl Into<String>) -> Self {
        Self::ExternalCallFailure {
            stage,
            message: message.into(),
        }
    }

    /// Returns `true` if running the debate again might succeed.
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            Self::ExternalCallFailure { .. } | Self::SearchUnavailable(_) | Self::ScrapeFailure { .. }
        )
    }
}

impl From<ToolError> for DebateError {
    fn from(err: ToolError) -> Self {
        match err {
            ToolError::SearchUnavailable(message) => Self::SearchUnavailable(message),
            ToolError::ScrapeFailure { url, message } => Self::ScrapeFailure { url, message },
        }
    }
}
