//! Product page fetcher: HTTP GET plus HTML-to-text extraction.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use super::{ProductPage, ToolError};
use crate::config::ScrapeSettings;

/// Wrap width handed to the HTML renderer.
const RENDER_WIDTH: usize = 100;

/// Fetches product pages over HTTP and extracts readable text.
pub struct HttpProductPage {
    client: Client,
    max_chars: usize,
}

impl HttpProductPage {
    pub fn new(settings: &ScrapeSettings, timeout: Duration) -> Result<Self, ToolError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(&settings.user_agent)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| ToolError::scrape("", format!("failed to build client: {e}")))?;
        Ok(Self {
            client,
            max_chars: settings.max_page_chars,
        })
    }
}

/// Render HTML to plain text, drop blank runs, and cap the length.
///
/// Never fails: broken markup yields whatever text the renderer recovered.
pub fn html_to_text(html: &str, max_chars: usize) -> String {
    let rendered = html2text::from_read(html.as_bytes(), RENDER_WIDTH);

    let mut lines: Vec<&str> = Vec::new();
    for line in rendered.lines().map(str::trim_end) {
        let blank = line.trim().is_empty();
        if blank && lines.last().map_or(true, |prev| prev.trim().is_empty()) {
            continue;
        }
        lines.push(line);
    }
    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }

    let text = lines.join("\n");
    if text.chars().count() <= max_chars {
        text
    } else {
        text.chars().take(max_chars).collect()
    }
}

#[async_trait]
impl ProductPage for HttpProductPage {
    async fn fetch_details(&self, url: &str) -> Result<String, ToolError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ToolError::scrape(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ToolError::scrape(url, format!("HTTP {status}")));
        }

        let html = response.text().await.map_err(|e| ToolError::scrape(url, e))?;
        let text = html_to_text(&html, self.max_chars);
        if text.is_empty() {
            warn!(url, "product page yielded no readable text");
        }
        debug!(url, chars = text.len(), "product page fetched");
        Ok(text)
    }
}
