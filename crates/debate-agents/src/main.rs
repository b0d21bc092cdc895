use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use coordination::{DebateOutcome, Polarity, Product};
use debate_agents::{Collaborators, DebateSettings, DebateWorkflow};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Debate whether a product is worth buying", long_about = None)]
struct Args {
    /// Product name
    #[arg(long)]
    name: String,

    /// Product page URL
    #[arg(long)]
    url: String,

    /// Extra search keyword (repeatable)
    #[arg(long = "keyword")]
    keywords: Vec<String>,

    /// Pro/con rounds before the decision
    #[arg(long)]
    rounds: Option<u32>,

    /// TOML settings file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the outcome as JSON instead of a transcript
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut settings = DebateSettings::load(args.config.as_deref())?;
    if let Some(rounds) = args.rounds {
        settings.round_limit = rounds;
        settings.validate()?;
    }
    info!(
        model_url = %settings.model.base_url,
        argument_model = %settings.model.argument_model,
        decision_model = %settings.model.decision_model,
        rounds = settings.round_limit,
        "product debate starting"
    );

    url::Url::parse(&args.url).with_context(|| format!("--url is not a URL: {}", args.url))?;
    let product = Product::new(args.name, args.url).with_keywords(args.keywords);

    let collaborators =
        Collaborators::from_settings(&settings).context("Failed to build debate clients")?;
    let workflow = DebateWorkflow::new(settings.workflow_config(), collaborators)?;
    let outcome = workflow.run(product).await?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&outcome).context("Failed to serialize outcome")?
        );
    } else {
        print_transcript(&outcome);
    }
    Ok(())
}

fn print_transcript(outcome: &DebateOutcome) {
    println!("Debate: {} <{}>", outcome.product.name, outcome.product.url);
    println!("Run {}", outcome.run_id);
    println!();
    for record in &outcome.arguments {
        println!(
            "{} {}",
            record.recorded_at.format("%H:%M:%S"),
            record.render()
        );
    }
    println!();
    for polarity in [Polarity::Pro, Polarity::Con] {
        if let Some(mean) = outcome.mean_sentiment(polarity) {
            println!("mean {polarity} sentiment: {mean:+.1}");
        }
    }
    println!("{}", outcome.summary_line());
    println!("{}", outcome.decision.explanation);
}
