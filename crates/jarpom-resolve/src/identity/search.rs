use crate::{ResolveError, Result};
use reqwest::Url;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Remote lookup of a group by jar SHA-1
pub trait SearchService {
    /// Group of the first match, `None` when the service knows no match
    fn find_group(&self, sha1: &str, path: &Path) -> Result<Option<String>>;
}

#[derive(Debug, thiserror::Error)]
pub enum SearchClientError {
    #[error("Invalid search service URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Solr-style search endpoint (search.maven.org)
pub struct MavenCentralSearch {
    client: reqwest::blocking::Client,
    url: Url,
}

impl MavenCentralSearch {
    pub const DEFAULT_URL: &'static str = "https://search.maven.org/solrsearch/select";

    /// Rows requested per query; only the first is read
    const ROWS: &'static str = "20";

    pub fn new(url: &str, timeout: Duration) -> std::result::Result<Self, SearchClientError> {
        let url = Url::parse(url).map_err(|e| SearchClientError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("jarpom/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, url })
    }

    /// Query URL for a SHA-1
    pub fn query_url(&self, sha1: &str) -> Url {
        let mut url = self.url.clone();
        url.query_pairs_mut()
            .append_pair("q", &format!("1:\"{}\"", sha1))
            .append_pair("rows", Self::ROWS)
            .append_pair("wt", "json");
        url
    }
}

impl SearchService for MavenCentralSearch {
    fn find_group(&self, sha1: &str, path: &Path) -> Result<Option<String>> {
        let url = self.query_url(sha1);
        debug!(%url, "querying search service");

        let transport = |source: reqwest::Error| ResolveError::TransportFailure {
            path: path.to_path_buf(),
            source,
        };

        let body = self
            .client
            .get(url)
            .send()
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.text())
            .map_err(transport)?;

        let group = parse_search_response(&body).map_err(|e| ResolveError::InvalidSearchResponse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        if group.is_none() {
            debug!(path = %path.display(), sha1, "search service has no match");
        }

        Ok(group)
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    response: SearchResults,
}

#[derive(Debug, Deserialize)]
struct SearchResults {
    #[serde(default)]
    docs: Vec<SearchDoc>,
}

#[derive(Debug, Deserialize)]
struct SearchDoc {
    g: String,
}

/// Group (`g`) of the first document in a search response body
pub fn parse_search_response(body: &str) -> serde_json::Result<Option<String>> {
    let parsed: SearchResponse = serde_json::from_str(body)?;
    Ok(parsed.response.docs.into_iter().next().map(|doc| doc.g))
}
