//! System prompts and prompt builders for each agent role in the debate.
//!
//! Prompt versioning: bump `PROMPT_VERSION` whenever preamble content changes.
//! The version is logged with every run so a verdict can be traced back to
//! the prompt that produced it.

use coordination::{Argument, ArgumentRecord, Decision, Polarity, Product};

use crate::contracts::schema_hint;

/// Prompt version. Bump on any preamble content change.
pub const PROMPT_VERSION: &str = "1.2.0";

/// Pro advocate preamble.
pub const PRO_PREAMBLE: &str = "\
You are the PRO advocate in a structured debate about whether to buy a product.
Your job is to make the single strongest case FOR buying it in this turn.

## Rules
- Ground your argument in the product details and review snippets you are given.
  Do not invent specifications, prices, or awards.
- Respond to the opposing side's most recent point when there is one. Do not repeat
  an argument you already made.
- Keep the body to one short paragraph (at most 1200 characters).
- Sentiment is an integer from -10 to 10 expressing how favourable your point is.
  As the pro side it should normally be between 0 and 10.

## Output
Reply with ONLY a JSON object: {\"sentiment\": <integer>, \"body\": \"<argument>\"}";

/// Con advocate preamble.
pub const CON_PREAMBLE: &str = "\
You are the CON advocate in a structured debate about whether to buy a product.
Your job is to make the single strongest case AGAINST buying it in this turn.

## Rules
- Ground your argument in the product details and review snippets you are given.
  Do not invent defects, recalls, or prices.
- Rebut the pro side's most recent point when there is one. Do not repeat
  an argument you already made.
- Keep the body to one short paragraph (at most 1200 characters).
- Sentiment is an integer from -10 to 10 expressing how favourable your point is.
  As the con side it should normally be between -10 and 0.

## Output
Reply with ONLY a JSON object: {\"sentiment\": <integer>, \"body\": \"<argument>\"}";

/// Judge preamble.
pub const JUDGE_PREAMBLE: &str = "\
You are an impartial judge reading a finished pro/con debate about a product.
Weigh both sides on the strength of their evidence, not on how many points they made.

## Rules
- You must choose exactly one of \"buy\" or \"skip\". There is no undecided option.
- Sentiment is an integer from -10 (strongly against) to 10 (strongly in favour)
  summarising the whole debate. It should agree with your choice.
- The explanation names the arguments that carried the most weight, in a few sentences.

## Output
Reply with ONLY a JSON object:
{\"sentiment\": <integer>, \"choice\": \"buy\" | \"skip\", \"explanation\": \"<text>\"}";

pub fn preamble_for(polarity: Polarity) -> &'static str {
    match polarity {
        Polarity::Pro => PRO_PREAMBLE,
        Polarity::Con => CON_PREAMBLE,
    }
}

/// Render the debate history, oldest first.
pub fn render_history(history: &[ArgumentRecord]) -> String {
    if history.is_empty() {
        return "(no arguments yet)".to_string();
    }
    history
        .iter()
        .map(ArgumentRecord::render)
        .collect::<Vec<_>>()
        .join("\n")
}

fn product_header(product: &Product) -> String {
    let mut header = format!("**Product:** {}\n**URL:** {}\n", product.name, product.url);
    if !product.keywords.is_empty() {
        header.push_str(&format!("**Keywords:** {}\n", product.keywords.join(", ")));
    }
    header
}

fn or_placeholder(text: &str, placeholder: &str) -> String {
    if text.trim().is_empty() {
        placeholder.to_string()
    } else {
        text.to_string()
    }
}

/// Task prompt for one argument turn.
pub fn argument_prompt(
    product: &Product,
    polarity: Polarity,
    round: u32,
    page_text: &str,
    reviews: &str,
    history: &[ArgumentRecord],
) -> String {
    format!(
        "{header}**Side:** {polarity}\n**Round:** {round}\n\n\
         ## Product details\n{details}\n\n\
         ## {hint} review snippets\n{reviews}\n\n\
         ## Debate so far\n{history}\n\n\
         ## Response schema\n```json\n{schema}\n```\n\n\
         Make your {polarity} argument for round {round}.",
        header = product_header(product),
        details = or_placeholder(page_text, "(no product details available)"),
        hint = polarity.sentiment_hint(),
        reviews = or_placeholder(reviews, "(no review snippets found)"),
        history = render_history(history),
        schema = schema_hint::<Argument>(),
    )
}

/// Task prompt for the final decision.
pub fn decision_prompt(product: &Product, history: &[ArgumentRecord]) -> String {
    format!(
        "{header}\n## Debate transcript\n{history}\n\n\
         ## Response schema\n```json\n{schema}\n```\n\n\
         Render your verdict.",
        header = product_header(product),
        history = render_history(history),
        schema = schema_hint::<Decision>(),
    )
}
