//! Moderated debate integration test: drives full runs through the public
//! `coordination` API with canned arguments (no model calls).
//!
//! Covers: moderator ↔ state ↔ outcome running together in a single pass.

use coordination::debate::{next_phase, DebatePhase, ModeratorError, NextAction};
use coordination::{
    Argument, Choice, DebateOutcome, DebateState, Decision, LookupBudget, Moderator, Polarity,
    Product,
};

/// Helper: canned argument for a side and round.
fn canned_argument(polarity: Polarity, round: u32) -> Argument {
    let sentiment = match polarity {
        Polarity::Pro => 5,
        Polarity::Con => -3,
    };
    Argument::new(sentiment, format!("{polarity} point for round {round}"))
}

fn verdict(choice: Choice) -> Decision {
    Decision {
        sentiment: if choice == Choice::Buy { 2 } else { -2 },
        choice,
        explanation: "Weighed the strongest points from each side.".to_string(),
    }
}

/// Helper: play the debate to completion, answering every prompt from the moderator.
fn play(moderator: &Moderator, choice: Choice) -> DebateState {
    let mut state = moderator.start();
    loop {
        match moderator.next_action(&state) {
            NextAction::Argue(polarity) => {
                let round = state.current_round();
                moderator
                    .record_argument(&mut state, polarity, canned_argument(polarity, round))
                    .unwrap();
            }
            NextAction::Decide => moderator.record_decision(&mut state, verdict(choice)).unwrap(),
            NextAction::Complete => return state,
        }
    }
}

#[test]
fn test_debate_full_run_to_outcome() {
    let moderator = Moderator::new(3).unwrap();
    let state = play(&moderator, Choice::Buy);

    assert!(state.is_complete());
    assert_eq!(state.round(), 3);
    assert_eq!(state.history().len(), 6);

    let product = Product::new("Standing Desk", "https://shop.example/desk")
        .with_keywords(["electric", "dual motor"]);
    let outcome = DebateOutcome::from_state(product, &state).unwrap();
    assert_eq!(outcome.rounds_completed, 3);
    assert_eq!(outcome.decision.choice, Choice::Buy);
    assert_eq!(outcome.mean_sentiment(Polarity::Pro), Some(5.0));
    assert_eq!(outcome.mean_sentiment(Polarity::Con), Some(-3.0));
    assert!(outcome.summary_line().starts_with("[BUY]"));
}

#[test]
fn test_debate_history_alternates_and_rounds_are_numbered() {
    let moderator = Moderator::new(2).unwrap();
    let state = play(&moderator, Choice::Skip);

    let turns: Vec<(u32, Polarity)> = state
        .history()
        .iter()
        .map(|r| (r.round, r.polarity))
        .collect();
    assert_eq!(
        turns,
        vec![
            (1, Polarity::Pro),
            (1, Polarity::Con),
            (2, Polarity::Pro),
            (2, Polarity::Con),
        ]
    );
    assert_eq!(state.decision().map(|d| d.choice), Some(Choice::Skip));
}

#[test]
fn test_debate_transitions_logged_in_order() {
    let moderator = Moderator::new(1).unwrap();
    let state = play(&moderator, Choice::Buy);

    let phases: Vec<(DebatePhase, DebatePhase)> =
        state.transitions().iter().map(|t| (t.from, t.to)).collect();
    assert_eq!(
        phases,
        vec![
            (DebatePhase::AwaitingPro, DebatePhase::AwaitingCon),
            (DebatePhase::AwaitingCon, DebatePhase::Deciding),
            (DebatePhase::Deciding, DebatePhase::Done),
        ]
    );
}

#[test]
fn test_debate_rejects_out_of_turn_and_late_arguments() {
    let moderator = Moderator::new(1).unwrap();
    let mut state = moderator.start();

    let err = moderator
        .record_argument(&mut state, Polarity::Con, canned_argument(Polarity::Con, 1))
        .unwrap_err();
    assert!(matches!(err, ModeratorError::WrongTurn { .. }));
    assert!(state.history().is_empty());

    let state = play(&moderator, Choice::Buy);
    let mut finished = state.clone();
    let err = moderator
        .record_argument(&mut finished, Polarity::Pro, canned_argument(Polarity::Pro, 2))
        .unwrap_err();
    assert_eq!(err, ModeratorError::NotArguing(DebatePhase::Done));
    assert_eq!(finished.history().len(), state.history().len());
}

#[test]
fn test_outcome_json_round_trip_keeps_transcript() {
    let moderator = Moderator::new(2).unwrap();
    let state = play(&moderator, Choice::Skip);
    let outcome =
        DebateOutcome::from_state(Product::new("Kettle", "https://shop.example/k"), &state).unwrap();

    let json = serde_json::to_string(&outcome).unwrap();
    assert!(json.contains("\"choice\":\"skip\""));
    assert!(json.contains("\"polarity\":\"con\""));

    let back: DebateOutcome = serde_json::from_str(&json).unwrap();
    assert_eq!(back.arguments.len(), 4);
    assert_eq!(back.decision, outcome.decision);
}

#[test]
fn test_next_phase_matches_moderator() {
    for limit in 1..=4 {
        let moderator = Moderator::new(limit).unwrap();
        let mut state = moderator.start();
        while let NextAction::Argue(polarity) = moderator.next_action(&state) {
            let completed = match polarity {
                Polarity::Pro => state.round(),
                Polarity::Con => state.round() + 1,
            };
            let expected = next_phase(state.phase(), completed, limit);
            moderator
                .record_argument(&mut state, polarity, canned_argument(polarity, 0))
                .unwrap();
            assert_eq!(state.phase(), expected);
        }
        assert_eq!(state.phase(), DebatePhase::Deciding);
        assert!(state.round() <= limit);
    }
}

#[test]
fn test_lookup_budget_shared_across_a_debate() {
    let mut budget = LookupBudget::new(2);
    // product page plus one search for pro
    assert!(budget.try_acquire(Polarity::Pro));
    assert!(budget.try_acquire(Polarity::Pro));
    assert!(!budget.try_acquire(Polarity::Pro));
    assert_eq!(budget.remaining(Polarity::Con), 2);
}
