//! Debate data model: products, arguments, and the final decision.
//!
//! These types form the typed handoff between the model-backed agents and
//! the deterministic moderator.
//!
//! | Type             | Produced by        | Consumed by                   |
//! |------------------|--------------------|-------------------------------|
//! | `Product`        | Caller / CLI       | Argument generator, workflow  |
//! | `Argument`       | Argument generator | Moderator (appended to state) |
//! | `ArgumentRecord` | Moderator          | Decision renderer, transcript |
//! | `Decision`       | Decision renderer  | Moderator, caller             |

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Lowest sentiment score a model may report.
pub const SENTIMENT_MIN: i32 = -10;
/// Highest sentiment score a model may report.
pub const SENTIMENT_MAX: i32 = 10;
/// Upper bound on an argument body, in characters.
pub const MAX_ARGUMENT_CHARS: usize = 1200;
/// Upper bound on a decision explanation, in characters.
pub const MAX_EXPLANATION_CHARS: usize = 2000;

// ── Product ─────────────────────────────────────────────────────────────────

/// The product under debate. Created once per run and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub url: String,
    /// Ordered search keywords (brand, category, model number, ...).
    pub keywords: Vec<String>,
}

impl Product {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            keywords: Vec::new(),
        }
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Search query for reviews of this product: name followed by keywords.
    pub fn search_terms(&self) -> String {
        std::iter::once(self.name.as_str())
            .chain(self.keywords.iter().map(String::as_str))
            .filter(|s| !s.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

// ── Polarity ────────────────────────────────────────────────────────────────

/// Which side of the debate an argument is generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    Pro,
    Con,
}

impl Polarity {
    /// The side that speaks after this one.
    pub fn opponent(self) -> Self {
        match self {
            Self::Pro => Self::Con,
            Self::Con => Self::Pro,
        }
    }

    /// Review sentiment the side searches for.
    pub fn sentiment_hint(self) -> SentimentHint {
        match self {
            Self::Pro => SentimentHint::Positive,
            Self::Con => SentimentHint::Negative,
        }
    }

    /// Whether `sentiment` carries the sign this side would be expected to use.
    ///
    /// Zero is accepted for both sides.
    pub fn is_consistent_with(self, sentiment: i32) -> bool {
        match self {
            Self::Pro => sentiment >= 0,
            Self::Con => sentiment <= 0,
        }
    }
}

impl std::fmt::Display for Polarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pro => write!(f, "pro"),
            Self::Con => write!(f, "con"),
        }
    }
}

/// Bias applied to a review search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentHint {
    Positive,
    Negative,
}

impl std::fmt::Display for SentimentHint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Positive => write!(f, "positive"),
            Self::Negative => write!(f, "negative"),
        }
    }
}

// ── Validation ──────────────────────────────────────────────────────────────

/// A structured value that decoded but violates its declared bounds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("sentiment {0} outside {SENTIMENT_MIN}..={SENTIMENT_MAX}")]
    SentimentOutOfRange(i32),

    #[error("{field} is empty")]
    Empty { field: &'static str },

    #[error("choice must be \"buy\" or \"skip\", got {0:?}")]
    UnknownChoice(String),
}

fn check_sentiment(sentiment: i32) -> Result<(), ValidationError> {
    if (SENTIMENT_MIN..=SENTIMENT_MAX).contains(&sentiment) {
        Ok(())
    } else {
        Err(ValidationError::SentimentOutOfRange(sentiment))
    }
}

/// Trim and cap a free-text field at `max_chars` characters.
fn normalize_text(
    text: &str,
    field: &'static str,
    max_chars: usize,
) -> Result<String, ValidationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    if trimmed.chars().count() <= max_chars {
        return Ok(trimmed.to_string());
    }
    tracing::debug!(field, max_chars, "truncating over-long model text");
    Ok(trimmed.chars().take(max_chars).collect::<String>().trim_end().to_string())
}

// ── Argument ────────────────────────────────────────────────────────────────

/// One short argument for or against the product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Argument {
    /// Sentiment toward the product, from -10 (avoid) to 10 (must buy).
    pub sentiment: i32,
    /// The argument itself: a few sentences citing concrete evidence.
    pub body: String,
}

impl Argument {
    pub fn new(sentiment: i32, body: impl Into<String>) -> Self {
        Self {
            sentiment,
            body: body.into(),
        }
    }

    /// Validate bounds and normalize the body (trimmed, capped length).
    pub fn normalized(self) -> Result<Self, ValidationError> {
        check_sentiment(self.sentiment)?;
        let body = normalize_text(&self.body, "body", MAX_ARGUMENT_CHARS)?;
        Ok(Self {
            sentiment: self.sentiment,
            body,
        })
    }
}

/// An argument as stored in the debate history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArgumentRecord {
    /// Round the argument belongs to (1-indexed).
    pub round: u32,
    pub polarity: Polarity,
    pub argument: Argument,
    pub recorded_at: DateTime<Utc>,
}

impl ArgumentRecord {
    /// One-line rendering used in prompts and the terminal transcript.
    pub fn render(&self) -> String {
        format!(
            "[round {} | {} | sentiment {:+}] {}",
            self.round, self.polarity, self.argument.sentiment, self.argument.body
        )
    }
}

// ── Decision ────────────────────────────────────────────────────────────────

/// The final verdict. There is no "undecided" value.
///
/// Serializes lowercase; parsing ignores case and surrounding whitespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, JsonSchema)]
pub enum Choice {
    #[serde(rename = "buy")]
    Buy,
    #[serde(rename = "skip")]
    Skip,
}

impl std::str::FromStr for Choice {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buy" => Ok(Self::Buy),
            "skip" => Ok(Self::Skip),
            _ => Err(ValidationError::UnknownChoice(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for Choice {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for Choice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "buy"),
            Self::Skip => write!(f, "skip"),
        }
    }
}

/// Terminal result of a debate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Decision {
    /// Overall sentiment after weighing both sides, from -10 to 10.
    pub sentiment: i32,
    /// Either "buy" or "skip".
    pub choice: Choice,
    /// Why, referring to the arguments that carried the most weight.
    pub explanation: String,
}

impl Decision {
    /// Validate bounds and normalize the explanation.
    pub fn normalized(self) -> Result<Self, ValidationError> {
        check_sentiment(self.sentiment)?;
        let explanation = normalize_text(&self.explanation, "explanation", MAX_EXPLANATION_CHARS)?;
        Ok(Self {
            sentiment: self.sentiment,
            choice: self.choice,
            explanation,
        })
    }
}
