//! Pro and con advocates.
//!
//! Each turn gathers context (product page text and sentiment-biased review
//! snippets), prompts the model for one argument, and decodes the reply.
//! Lookups are capped per side for the whole debate; once a side's cap is
//! spent it argues from the reviews it fetched last.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use coordination::{Argument, ArgumentRecord, LookupBudget, Polarity, Product};
use tracing::{debug, info, warn};

use super::complete_within;
use crate::backend::{AgentRole, CompletionBackend, CompletionRequest};
use crate::contracts::parse_argument;
use crate::errors::{DebateError, Stage};
use crate::prompts;
use crate::tools::{ProductPage, ReviewSearch, ToolError};

/// Lookup results and budget carried across the turns of one debate.
#[derive(Debug)]
pub struct ResearchNotes {
    budget: LookupBudget,
    page_text: Option<String>,
    reviews: HashMap<Polarity, String>,
}

impl ResearchNotes {
    pub fn new(lookups_per_polarity: u32) -> Self {
        Self {
            budget: LookupBudget::new(lookups_per_polarity),
            page_text: None,
            reviews: HashMap::new(),
        }
    }

    pub fn budget(&self) -> &LookupBudget {
        &self.budget
    }

    /// Product page text, once fetched.
    pub fn page_text(&self) -> Option<&str> {
        self.page_text.as_deref()
    }

    /// Most recent review snippets for a side.
    pub fn reviews(&self, polarity: Polarity) -> Option<&str> {
        self.reviews.get(&polarity).map(String::as_str)
    }
}

/// Produces one argument per turn for either side.
pub struct ArgumentGenerator {
    backend: Arc<dyn CompletionBackend>,
    search: Arc<dyn ReviewSearch>,
    page: Arc<dyn ProductPage>,
    temperature: f64,
    call_timeout: Duration,
}

impl ArgumentGenerator {
    pub fn new(
        backend: Arc<dyn CompletionBackend>,
        search: Arc<dyn ReviewSearch>,
        page: Arc<dyn ProductPage>,
        temperature: f64,
        call_timeout: Duration,
    ) -> Self {
        Self {
            backend,
            search,
            page,
            temperature,
            call_timeout,
        }
    }

    /// Generate the `polarity` argument for `round`.
    ///
    /// Lookup results are written into `notes` as they arrive. The returned
    /// argument is range-checked but its sign is not forced to match the side.
    pub async fn generate(
        &self,
        product: &Product,
        history: &[ArgumentRecord],
        polarity: Polarity,
        round: u32,
        notes: &mut ResearchNotes,
    ) -> Result<Argument, DebateError> {
        let page_text = self.product_details(product, notes).await?;
        let reviews = self.review_context(product, polarity, notes).await?;

        let request = CompletionRequest {
            role: match polarity {
                Polarity::Pro => AgentRole::ProAdvocate,
                Polarity::Con => AgentRole::ConAdvocate,
            },
            preamble: prompts::preamble_for(polarity).to_string(),
            prompt: prompts::argument_prompt(
                product, polarity, round, &page_text, &reviews, history,
            ),
            temperature: self.temperature,
        };

        let stage = Stage::from(polarity);
        let raw = complete_within(self.backend.as_ref(), request, self.call_timeout, stage).await?;
        let argument = parse_argument(&raw).map_err(|e| {
            warn!(%polarity, round, error = %e, "unusable argument reply");
            DebateError::external(stage, e.to_string())
        })?;

        if !polarity.is_consistent_with(argument.sentiment) {
            warn!(
                %polarity,
                round,
                sentiment = argument.sentiment,
                "argument sentiment points the other way"
            );
        }
        info!(%polarity, round, sentiment = argument.sentiment, "argument generated");
        Ok(argument)
    }

    /// Fetch the page once per debate, charged to the pro side's budget.
    async fn product_details(
        &self,
        product: &Product,
        notes: &mut ResearchNotes,
    ) -> Result<String, DebateError> {
        if let Some(text) = &notes.page_text {
            return Ok(text.clone());
        }
        let text = if notes.budget.try_acquire(Polarity::Pro) {
            let fetch = self.page.fetch_details(&product.url);
            match tokio::time::timeout(self.call_timeout, fetch).await {
                Ok(result) => result?,
                Err(_) => {
                    return Err(ToolError::scrape(
                        &product.url,
                        format!("timed out after {:?}", self.call_timeout),
                    )
                    .into())
                }
            }
        } else {
            debug!("no lookup budget left for product details");
            String::new()
        };
        notes.page_text = Some(text.clone());
        Ok(text)
    }

    /// Fresh review snippets while the side has budget, else the last ones.
    async fn review_context(
        &self,
        product: &Product,
        polarity: Polarity,
        notes: &mut ResearchNotes,
    ) -> Result<String, DebateError> {
        if !notes.budget.try_acquire(polarity) {
            debug!(%polarity, "lookup budget spent, reusing earlier reviews");
            return Ok(notes.reviews(polarity).unwrap_or_default().to_string());
        }

        let search = self
            .search
            .search_reviews(product, polarity.sentiment_hint());
        let reviews = match tokio::time::timeout(self.call_timeout, search).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(ToolError::SearchUnavailable(format!(
                    "timed out after {:?}",
                    self.call_timeout
                ))
                .into())
            }
        };
        debug!(
            %polarity,
            remaining = notes.budget.remaining(polarity),
            "review snippets refreshed"
        );
        notes.reviews.insert(polarity, reviews.clone());
        Ok(reviews)
    }
}
