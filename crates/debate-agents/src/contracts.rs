//! Structured response contracts for the debate agents.
//!
//! Each agent must reply with a JSON object matching a fixed shape. Replies
//! are decoded and bounds-checked here, at the boundary; anything malformed
//! is returned as a `ContractError` and never replaced with a default.
//!
//! ```text
//! Argument { sentiment: -10..=10, body: non-empty text }
//! Decision { sentiment: -10..=10, choice: "buy" | "skip", explanation: non-empty text }
//! ```

use coordination::debate::ValidationError;
use coordination::{Argument, Decision};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;

#[derive(Debug, thiserror::Error)]
pub enum ContractError {
    #[error("response contains no JSON object")]
    MissingJson,

    #[error("response does not match the expected shape: {0}")]
    Shape(#[from] serde_json::Error),

    #[error("response is out of bounds: {0}")]
    Bounds(#[from] ValidationError),
}

/// Parse an argument agent reply.
pub fn parse_argument(raw: &str) -> Result<Argument, ContractError> {
    let argument: Argument = decode(raw)?;
    Ok(argument.normalized()?)
}

/// Parse a decision agent reply.
pub fn parse_decision(raw: &str) -> Result<Decision, ContractError> {
    let decision: Decision = decode(raw)?;
    Ok(decision.normalized()?)
}

/// Pretty-printed JSON schema for `T`, embedded in prompts.
pub fn schema_hint<T: JsonSchema>() -> String {
    let schema = schemars::schema_for!(T);
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}

fn decode<T: DeserializeOwned>(raw: &str) -> Result<T, ContractError> {
    let mut best_error: Option<serde_json::Error> = None;
    for candidate in json_candidates(raw) {
        match serde_json::Deserializer::from_str(candidate)
            .into_iter::<T>()
            .next()
        {
            Some(Ok(value)) => return Ok(value),
            Some(Err(e)) => {
                // a shape mismatch says more than a syntax error from a brace in prose
                if best_error
                    .as_ref()
                    .map_or(true, |prev| !prev.is_data() && e.is_data())
                {
                    best_error = Some(e);
                }
            }
            None => {}
        }
    }
    Err(best_error.map_or(ContractError::MissingJson, ContractError::Shape))
}

/// Places a JSON object may start: a ```json fence first, then every `{`.
fn json_candidates(text: &str) -> impl Iterator<Item = &str> {
    let fenced = text.find("```json").and_then(|start| {
        let body = &text[start + 7..];
        body.find("```").map(|end| body[..end].trim())
    });
    fenced
        .into_iter()
        .chain(text.match_indices('{').map(move |(i, _)| &text[i..]))
}
