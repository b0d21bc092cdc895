//! Outcome of a completed debate.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::state::DebateState;
use super::types::{ArgumentRecord, Decision, Polarity, Product};

/// Everything a finished run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebateOutcome {
    pub run_id: Uuid,
    pub product: Product,
    /// Rounds executed (equals the round limit).
    pub rounds_completed: u32,
    /// Arguments in the order they were made.
    pub arguments: Vec<ArgumentRecord>,
    pub decision: Decision,
}

impl DebateOutcome {
    /// Snapshot a finished state. Returns `None` until a decision is recorded.
    pub fn from_state(product: Product, state: &DebateState) -> Option<Self> {
        if !state.is_complete() {
            return None;
        }
        let decision = state.decision()?.clone();
        Some(Self {
            run_id: state.id(),
            product,
            rounds_completed: state.round(),
            arguments: state.history().to_vec(),
            decision,
        })
    }

    /// Mean sentiment of one side's arguments, or `None` if it never spoke.
    pub fn mean_sentiment(&self, polarity: Polarity) -> Option<f64> {
        let scores: Vec<i32> = self
            .arguments
            .iter()
            .filter(|r| r.polarity == polarity)
            .map(|r| r.argument.sentiment)
            .collect();
        if scores.is_empty() {
            return None;
        }
        Some(scores.iter().sum::<i32>() as f64 / scores.len() as f64)
    }

    /// Compact summary line.
    pub fn summary_line(&self) -> String {
        format!(
            "[{}] sentiment {:+} | {} rounds | {} arguments | product={}",
            self.decision.choice.to_string().to_uppercase(),
            self.decision.sentiment,
            self.rounds_completed,
            self.arguments.len(),
            self.product.name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debate::moderator::{Moderator, NextAction};
    use crate::debate::types::{Argument, Choice};

    fn finished(limit: u32) -> DebateState {
        let moderator = Moderator::new(limit).unwrap();
        let mut state = moderator.start();
        while let NextAction::Argue(polarity) = moderator.next_action(&state) {
            let sentiment = match polarity {
                Polarity::Pro => 6,
                Polarity::Con => -2,
            };
            moderator
                .record_argument(&mut state, polarity, Argument::new(sentiment, "x"))
                .unwrap();
        }
        moderator
            .record_decision(
                &mut state,
                Decision {
                    sentiment: 4,
                    choice: Choice::Buy,
                    explanation: "worth it".into(),
                },
            )
            .unwrap();
        state
    }

    #[test]
    fn test_outcome_requires_completion() {
        let moderator = Moderator::new(1).unwrap();
        let state = moderator.start();
        assert!(DebateOutcome::from_state(Product::new("p", "u"), &state).is_none());
    }

    #[test]
    fn test_outcome_from_finished_state() {
        let state = finished(2);
        let outcome = DebateOutcome::from_state(Product::new("Kettle", "u"), &state).unwrap();
        assert_eq!(outcome.run_id, state.id());
        assert_eq!(outcome.rounds_completed, 2);
        assert_eq!(outcome.arguments.len(), 4);
        assert_eq!(outcome.mean_sentiment(Polarity::Pro), Some(6.0));
        assert_eq!(outcome.mean_sentiment(Polarity::Con), Some(-2.0));
        assert_eq!(
            outcome.summary_line(),
            "[BUY] sentiment +4 | 2 rounds | 4 arguments | product=Kettle"
        );
    }

    #[test]
    fn test_outcome_serializes_to_json() {
        let state = finished(1);
        let outcome = DebateOutcome::from_state(Product::new("Kettle", "u"), &state).unwrap();
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["decision"]["choice"], "buy");
        assert_eq!(json["arguments"][0]["polarity"], "pro");
        assert_eq!(json["arguments"][1]["polarity"], "con");
    }
}
