//! Live debate against real model and search endpoints.
//!
//! All tests are `#[ignore]`. Run with
//! `DEBATE_MODEL_API_KEY=... DEBATE_SEARCH_API_KEY=... cargo test -p debate-agents -- --ignored`.

use coordination::{Choice, Product};
use debate_agents::{Collaborators, DebateSettings, DebateWorkflow};

fn live_settings() -> DebateSettings {
    let mut settings = DebateSettings::load(None).expect("settings from environment");
    settings.round_limit = 1;
    settings.lookups_per_polarity = 1;
    settings
}

#[tokio::test]
#[ignore]
async fn test_live_single_round_debate() {
    let _ = tracing_subscriber::fmt().with_env_filter("debate_agents=debug").try_init();

    let settings = live_settings();
    assert!(
        !settings.model.api_key.is_empty(),
        "set DEBATE_MODEL_API_KEY or OPENAI_API_KEY"
    );
    let collaborators = Collaborators::from_settings(&settings).expect("clients");
    let workflow = DebateWorkflow::new(settings.workflow_config(), collaborators).expect("workflow");

    let product = Product::new(
        "Herman Miller Aeron",
        "https://www.hermanmiller.com/products/seating/office-chairs/aeron-chairs/",
    )
    .with_keywords(["office chair"]);
    let outcome = workflow.run(product).await.expect("live debate");

    assert_eq!(outcome.arguments.len(), 2);
    assert!(matches!(outcome.decision.choice, Choice::Buy | Choice::Skip));
    assert!(!outcome.decision.explanation.is_empty());
    println!("{}", outcome.summary_line());
}
