//! External lookups the argument agents draw on.
//!
//! Both adapters are thin pass-throughs: no retry and no caching. The
//! per-debate lookup cap and reuse of earlier results live in the
//! argument generator, not here.

pub mod scrape;
pub mod search;

use async_trait::async_trait;
use coordination::{Product, SentimentHint};

pub use scrape::HttpProductPage;
pub use search::TavilySearch;

/// Errors that can occur during a lookup.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("search backend error: {0}")]
    SearchUnavailable(String),

    #[error("could not fetch {url}: {message}")]
    ScrapeFailure { url: String, message: String },
}

impl ToolError {
    pub fn scrape(url: impl Into<String>, message: impl ToString) -> Self {
        Self::ScrapeFailure {
            url: url.into(),
            message: message.to_string(),
        }
    }
}

/// Review snippets biased toward one sentiment.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewSearch: Send + Sync {
    /// Returns formatted snippets, one per line. An empty string means no hits.
    async fn search_reviews(
        &self,
        product: &Product,
        hint: SentimentHint,
    ) -> Result<String, ToolError>;
}

/// Readable text from a product page.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductPage: Send + Sync {
    /// Fails only when nothing could be fetched. Thin or garbled pages come
    /// back as whatever text could be extracted, possibly empty.
    async fn fetch_details(&self, url: &str) -> Result<String, ToolError>;
}
