//! Outbound page fetching and naive title extraction for the analyze path.

use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;

/// A fetched page: the final post-redirect URL plus the body as text.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL the request resolved to after following redirects.
    pub resolved_url: String,
    /// Response body decoded as text (lossy for non-UTF8 payloads).
    pub body: String,
}

/// HTTP fetcher for linked pages referenced by analyze requests.
///
/// Built once at startup; the underlying client carries the fetch timeout and
/// follows redirects with reqwest's default policy.
#[derive(Clone)]
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    /// Build a fetcher with an explicit timeout.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("trust-brief/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build page fetcher HTTP client")?;

        Ok(Self { client })
    }

    /// Fetch a page, following redirects.
    ///
    /// Non-2xx statuses are not errors; the analyze path extracts titles from
    /// whatever body the server returns. Only transport-level failures
    /// (timeout, DNS, connection reset) surface as `Err`.
    pub async fn fetch_page(&self, url: &str) -> Result<FetchedPage> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to fetch linked page")?;

        let resolved_url = response.url().to_string();
        let body = response
            .text()
            .await
            .context("Failed to read linked page body")?;

        Ok(FetchedPage { resolved_url, body })
    }
}

/// Extract the text between the first `<title>` and the first `</title>`
/// after it, trimmed and capped at 140 characters.
///
/// This is a deliberate naive substring scan over the ASCII-lowercased body;
/// pages with attributed title tags, entities, or multiple titles mis-extract
/// the same way the original service did. Wire compatibility requires
/// keeping that behavior, not fixing it.
pub fn extract_title(body: &str) -> Option<String> {
    const OPEN: &str = "<title>";
    const CLOSE: &str = "</title>";

    let lowered = body.to_ascii_lowercase();
    let start = lowered.find(OPEN)?;
    let inner_start = start + OPEN.len();
    let end = inner_start + lowered[inner_start..].find(CLOSE)?;

    let title: String = body[inner_start..end].trim().chars().take(140).collect();
    if title.is_empty() {
        return None;
    }
    Some(title)
}
