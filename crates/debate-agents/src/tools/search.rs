//! Review search against a Tavily-compatible web search API.

use std::time::Duration;

use async_trait::async_trait;
use coordination::{Product, SentimentHint};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ReviewSearch, ToolError};
use crate::config::SearchSettings;

#[derive(Serialize)]
struct SearchRequest<'a> {
    api_key: &'a str,
    query: String,
    max_results: usize,
    search_depth: &'static str,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: String,
}

/// Review search over HTTP.
pub struct TavilySearch {
    client: Client,
    endpoint: String,
    api_key: String,
    max_results: usize,
}

impl TavilySearch {
    pub fn new(settings: &SearchSettings, timeout: Duration) -> Result<Self, ToolError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ToolError::SearchUnavailable(format!("failed to build client: {e}")))?;
        Ok(Self {
            client,
            endpoint: format!("{}/search", settings.base_url.trim_end_matches('/')),
            api_key: settings.api_key.clone(),
            max_results: settings.max_results,
        })
    }

    /// Query sent for a product and sentiment, e.g. `"Aeron Chair ergonomic positive reviews"`.
    pub fn query_for(product: &Product, hint: SentimentHint) -> String {
        format!("{} {hint} reviews", product.search_terms())
    }
}

/// One line per hit; hits without content are dropped.
fn format_hits(hits: &[SearchHit]) -> String {
    hits.iter()
        .filter(|hit| !hit.content.trim().is_empty())
        .map(|hit| {
            let content = hit.content.split_whitespace().collect::<Vec<_>>().join(" ");
            match (hit.title.trim(), hit.url.trim()) {
                ("", "") => format!("- {content}"),
                (title, "") => format!("- {title}: {content}"),
                (title, url) => format!("- {title} ({url}): {content}"),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[async_trait]
impl ReviewSearch for TavilySearch {
    async fn search_reviews(
        &self,
        product: &Product,
        hint: SentimentHint,
    ) -> Result<String, ToolError> {
        let request = SearchRequest {
            api_key: &self.api_key,
            query: Self::query_for(product, hint),
            max_results: self.max_results,
            search_depth: "basic",
        };
        debug!(query = %request.query, "searching reviews");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| ToolError::SearchUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ToolError::SearchUnavailable(format!(
                "HTTP {status}: {}",
                body.chars().take(200).collect::<String>()
            )));
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| ToolError::SearchUnavailable(format!("undecodable response: {e}")))?;

        debug!(hits = parsed.results.len(), %hint, "review search complete");
        Ok(format_hits(&parsed.results))
    }
}
