//! MediaWiki API client
//!
//! This module fetches the raw HTML of an article from the MediaWiki
//! `action=query` endpoint of a language-scoped wiki.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use super::language_url;

/// Default API host, `{lang}` is replaced with the request language
pub const DEFAULT_API_BASE: &str = "https://{lang}.wikipedia.org";

/// Default API path relative to the host
pub const DEFAULT_API_PATH: &str = "w/api.php";

/// Errors that can occur when fetching an article
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Unexpected HTTP status: {0}")]
    Status(u16),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// The API reported an error
    #[error("API error: {0}")]
    Api(String),

    /// The title does not resolve to a page
    #[error("Article not found: {0}")]
    NotFound(String),

    /// Missing expected field in response
    #[error("Missing expected field in response: {0}")]
    MissingField(String),
}

/// Which part of the article to request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchMode {
    /// Introductory extract (`prop=extracts&exintro`)
    #[default]
    Intro,
    /// Whole parsed article from the latest revision
    FullArticle,
}

impl FetchMode {
    fn query_params(self, title: &str) -> Vec<(&'static str, &str)> {
        let mut params = vec![
            ("action", "query"),
            ("format", "json"),
            ("redirects", "1"),
            ("titles", title),
        ];
        match self {
            FetchMode::Intro => {
                params.push(("prop", "extracts|images"));
                params.push(("exintro", "1"));
            }
            FetchMode::FullArticle => {
                params.push(("prop", "revisions"));
                params.push(("rvprop", "content"));
                params.push(("rvparse", "1"));
            }
        }
        params
    }
}

/// Connection settings for [`WikiClient`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WikiConfig {
    /// Scheme and host, may contain `{lang}`
    pub api_base: String,
    /// Path of the API script
    pub api_path: String,
    /// What to request from the API
    pub mode: FetchMode,
    /// Value of the User-Agent header
    pub user_agent: String,
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            api_path: DEFAULT_API_PATH.to_string(),
            mode: FetchMode::Intro,
            user_agent: concat!("wikicard/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl WikiConfig {
    /// Override the API host
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Override the fetch mode
    pub fn with_mode(mut self, mode: FetchMode) -> Self {
        self.mode = mode;
        self
    }

    /// Full API endpoint for a language
    pub fn api_url(&self, language: &str) -> String {
        format!(
            "{}/{}",
            language_url(&self.api_base, language).trim_end_matches('/'),
            self.api_path.trim_start_matches('/')
        )
    }
}

/// Raw article HTML as returned by the API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawExcerpt {
    /// Page title after redirects
    pub title: String,
    /// Unprocessed HTML fragment
    pub html: String,
}

/// Source of raw article HTML
#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// Fetch the raw HTML for `title` from the wiki of `language`
    async fn fetch(&self, title: &str, language: &str) -> Result<RawExcerpt, FetchError>;
}

/// Client for fetching articles from the MediaWiki API
#[derive(Debug, Clone)]
pub struct WikiClient {
    client: Client,
    config: WikiConfig,
}

impl Default for WikiClient {
    fn default() -> Self {
        Self::new(WikiConfig::default())
    }
}

impl WikiClient {
    /// Create a new WikiClient with the given settings
    pub fn new(config: WikiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Create a new WikiClient with a custom HTTP client
    pub fn with_client(client: Client, config: WikiConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &WikiConfig {
        &self.config
    }
}

#[async_trait]
impl ArticleSource for WikiClient {
    async fn fetch(&self, title: &str, language: &str) -> Result<RawExcerpt, FetchError> {
        let url = self.config.api_url(language);
        debug!(%url, title, mode = ?self.config.mode, "querying article");

        let response = self
            .client
            .get(&url)
            .header(USER_AGENT, &self.config.user_agent)
            .query(&self.config.mode.query_params(title))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let text = response.text().await?;
        let api_response: QueryResponse = serde_json::from_str(&text)?;

        parse_response(api_response, title, self.config.mode)
    }
}

/// Pull the article HTML out of a decoded API response
fn parse_response(
    response: QueryResponse,
    title: &str,
    mode: FetchMode,
) -> Result<RawExcerpt, FetchError> {
    if let Some(error) = response.error {
        return Err(FetchError::Api(error.info));
    }

    let page = response
        .query
        .and_then(|query| query.pages.into_values().next())
        .ok_or_else(|| FetchError::NotFound(title.to_string()))?;

    if page.missing.is_some() || page.invalid.is_some() {
        return Err(FetchError::NotFound(title.to_string()));
    }

    let html = match mode {
        FetchMode::Intro => page
            .extract
            .ok_or_else(|| FetchError::MissingField("extract".to_string()))?,
        FetchMode::FullArticle => page
            .revisions
            .into_iter()
            .next()
            .and_then(|revision| revision.content)
            .ok_or_else(|| FetchError::MissingField("revisions".to_string()))?,
    };

    Ok(RawExcerpt {
        title: page.title.unwrap_or_else(|| title.to_string()),
        html,
    })
}

/// MediaWiki `action=query` response
#[derive(Debug, Deserialize)]
struct QueryResponse {
    query: Option<Query>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    info: String,
}

#[derive(Debug, Deserialize)]
struct Query {
    #[serde(default)]
    pages: HashMap<String, Page>,
}

/// A single page entry, keyed by page id in the response
#[derive(Debug, Deserialize)]
struct Page {
    title: Option<String>,
    missing: Option<serde_json::Value>,
    invalid: Option<serde_json::Value>,
    extract: Option<String>,
    #[serde(default)]
    revisions: Vec<Revision>,
}

#[derive(Debug, Deserialize)]
struct Revision {
    #[serde(rename = "*")]
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    /// Sample extract response for "Paris"
    const EXTRACT_RESPONSE: &str = r#"{
        "batchcomplete": "",
        "query": {
            "pages": {
                "22989": {
                    "pageid": 22989,
                    "ns": 0,
                    "title": "Paris",
                    "extract": "<p><b>Paris</b> is the capital of France.</p>",
                    "images": [{"ns": 6, "title": "File:Paris.jpg"}]
                }
            }
        }
    }"#;

    const MISSING_RESPONSE: &str = r#"{
        "batchcomplete": "",
        "query": {
            "pages": {
                "-1": {"ns": 0, "title": "Nowhere Land Xyz", "missing": ""}
            }
        }
    }"#;

    const REVISIONS_RESPONSE: &str = r#"{
        "query": {
            "pages": {
                "681159": {
                    "pageid": 681159,
                    "title": "Rust (programming language)",
                    "revisions": [
                        {
                            "contentformat": "text/x-wiki",
                            "contentmodel": "wikitext",
                            "*": "<div><p><b>Rust</b> is a language.</p></div>"
                        }
                    ]
                }
            }
        }
    }"#;

    fn decode(json: &str) -> QueryResponse {
        serde_json::from_str(json).expect("Sample response should decode")
    }

    #[test]
    fn test_parse_extract_response() {
        let excerpt = parse_response(decode(EXTRACT_RESPONSE), "paris", FetchMode::Intro).unwrap();
        assert_eq!(excerpt.title, "Paris");
        assert!(excerpt.html.starts_with("<p><b>Paris</b>"));
    }

    #[test]
    fn test_parse_missing_page() {
        let result = parse_response(decode(MISSING_RESPONSE), "Nowhere Land Xyz", FetchMode::Intro);
        assert!(matches!(result, Err(FetchError::NotFound(t)) if t == "Nowhere Land Xyz"));
    }

    #[test]
    fn test_parse_empty_query() {
        let result = parse_response(decode(r#"{"batchcomplete": ""}"#), "X", FetchMode::Intro);
        assert!(matches!(result, Err(FetchError::NotFound(_))));
    }

    #[test]
    fn test_parse_api_error() {
        let json = r#"{"error": {"code": "badvalue", "info": "Unrecognized value"}}"#;
        let result = parse_response(decode(json), "X", FetchMode::Intro);
        assert!(matches!(result, Err(FetchError::Api(info)) if info == "Unrecognized value"));
    }

    #[test]
    fn test_parse_missing_extract_field() {
        let json = r#"{"query": {"pages": {"1": {"title": "X"}}}}"#;
        let result = parse_response(decode(json), "X", FetchMode::Intro);
        assert!(matches!(result, Err(FetchError::MissingField(f)) if f == "extract"));
    }

    #[test]
    fn test_parse_revisions_response() {
        let excerpt =
            parse_response(decode(REVISIONS_RESPONSE), "Rust", FetchMode::FullArticle).unwrap();
        assert_eq!(excerpt.title, "Rust (programming language)");
        assert!(excerpt.html.contains("<b>Rust</b>"));
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let result: Result<QueryResponse, _> = serde_json::from_str("not json");
        let err: FetchError = result.unwrap_err().into();
        assert!(err.to_string().contains("Failed to parse JSON"));
    }

    #[test]
    fn test_api_url_substitutes_language() {
        let config = WikiConfig::default();
        assert_eq!(config.api_url("en"), "https://en.wikipedia.org/w/api.php");

        let config = WikiConfig::default().with_api_base("http://127.0.0.1:9000/");
        assert_eq!(config.api_url("en"), "http://127.0.0.1:9000/w/api.php");
    }

    #[test]
    fn test_query_params_per_mode() {
        let intro = FetchMode::Intro.query_params("Paris");
        assert!(intro.contains(&("prop", "extracts|images")));
        assert!(intro.contains(&("exintro", "1")));
        assert!(intro.contains(&("titles", "Paris")));

        let full = FetchMode::FullArticle.query_params("Paris");
        assert!(full.contains(&("prop", "revisions")));
        assert!(full.contains(&("rvparse", "1")));
    }

    #[tokio::test]
    async fn test_fetch_against_local_server() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/w/api.php")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("action".into(), "query".into()),
                Matcher::UrlEncoded("titles".into(), "Paris".into()),
                Matcher::UrlEncoded("prop".into(), "extracts|images".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(EXTRACT_RESPONSE)
            .create_async()
            .await;

        let client = WikiClient::new(WikiConfig::default().with_api_base(server.url()));
        let excerpt = client.fetch("Paris", "en").await.unwrap();

        assert_eq!(excerpt.title, "Paris");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_reports_http_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let client = WikiClient::new(WikiConfig::default().with_api_base(server.url()));
        let result = client.fetch("Paris", "en").await;

        assert!(matches!(result, Err(FetchError::Status(503))));
    }
}
