// src/fetch/web.rs

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use url::Url;

static SEARCH_ENDPOINT: &str = "https://serpapi.com/search.json";
static SEARCH_ENGINE: &str = "google";

/// A single organic result from the web-search API. Fields other than the
/// link are ignored.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct SearchHit {
    #[serde(default)]
    pub link: String,
}

#[derive(Debug, Deserialize, Default)]
struct SearchResponse {
    #[serde(default)]
    organic_results: Vec<SearchHit>,
}

/// Key-authenticated client for the web-search API. Used only for profile
/// URL discovery.
pub struct WebSearchClient {
    http: Client,
    api_key: String,
}

impl WebSearchClient {
    pub fn new(http: Client, api_key: impl Into<String>) -> Self {
        Self {
            http,
            api_key: api_key.into(),
        }
    }

    /// Run a web search and return up to `count` organic results. An empty
    /// result set is not an error; transport and HTTP failures are.
    pub async fn search(&self, query: &str, count: u32) -> Result<Vec<SearchHit>> {
        let num = count.to_string();
        let url = Url::parse_with_params(
            SEARCH_ENDPOINT,
            &[
                ("engine", SEARCH_ENGINE),
                ("q", query),
                ("api_key", self.api_key.as_str()),
                ("num", num.as_str()),
            ],
        )
        .context("building web search URL")?;

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .with_context(|| format!("web search GET failed for {:?}", query))?
            .error_for_status()
            .context("web search returned non-success status")?;

        let body: SearchResponse = resp
            .json()
            .await
            .context("decoding web search response body")?;
        Ok(body.organic_results)
    }
}
