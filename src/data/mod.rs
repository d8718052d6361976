//! Core data models for wikicard
//!
//! This module contains the types that flow through a resolution: the typed
//! request, the cache key derived from it, the resolved article record and the
//! view handed to page rendering.

pub mod wiki;

pub use wiki::{ArticleSource, FetchError, FetchMode, RawExcerpt, WikiClient, WikiConfig};

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Language used when a request does not name one
pub const DEFAULT_LANGUAGE: &str = "fr";

/// Placeholder substituted with the request language in URL templates
pub const LANG_PLACEHOLDER: &str = "{lang}";

/// Errors raised while building an [`ArticleRequest`]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    /// The title is empty or only whitespace
    #[error("Article title must not be empty")]
    EmptyTitle,

    /// The language code contains characters that are not allowed
    #[error("Invalid language code: '{0}'")]
    InvalidLanguage(String),
}

/// A validated request for one article
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRequest {
    /// Free-text article title, trimmed
    pub title: String,
    /// Short language code, e.g. "en" or "fr"
    pub language: String,
}

impl ArticleRequest {
    /// Builds a request, trimming the title and validating the language code.
    ///
    /// Language codes are limited to ASCII alphanumerics and `-` since they end
    /// up in host names and cache file names.
    pub fn new(
        title: impl Into<String>,
        language: impl Into<String>,
    ) -> Result<Self, RequestError> {
        let title = title.into().trim().to_string();
        if title.is_empty() {
            return Err(RequestError::EmptyTitle);
        }

        let language = language.into().trim().to_string();
        let valid = !language.is_empty()
            && language
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-');
        if !valid {
            return Err(RequestError::InvalidLanguage(language));
        }

        Ok(Self { title, language })
    }

    /// Builds a request in [`DEFAULT_LANGUAGE`]
    pub fn with_default_language(title: impl Into<String>) -> Result<Self, RequestError> {
        Self::new(title, DEFAULT_LANGUAGE)
    }

    /// Derives the cache key for this request
    pub fn key(&self) -> ResolutionKey {
        ResolutionKey::new(&self.title, &self.language)
    }
}

/// Filesystem-safe identifier for a (title, language) pair
///
/// The title keeps only `[A-Za-z0-9_.-]`; everything else is dropped, so titles
/// differing only in stripped characters share a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolutionKey {
    title: String,
    language: String,
}

impl ResolutionKey {
    /// Creates a key from a raw title and a language code
    pub fn new(title: &str, language: &str) -> Self {
        Self {
            title: sanitize_title(title),
            language: language.to_string(),
        }
    }

    /// The sanitized title portion of the key
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The language portion of the key
    pub fn language(&self) -> &str {
        &self.language
    }
}

impl fmt::Display for ResolutionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.title, self.language)
    }
}

/// Strips every character outside `[A-Za-z0-9_.-]`
pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect()
}

/// Substitutes `{lang}` in a URL template
pub fn language_url(template: &str, language: &str) -> String {
    template.replace(LANG_PLACEHOLDER, language)
}

/// Resolved article content, persisted verbatim in the cache
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    /// Cleaned description paragraph as HTML
    #[serde(rename = "code")]
    pub html_fragment: String,
    /// Representative image, or the default avatar
    #[serde(rename = "img_url")]
    pub image_url: String,
    /// Canonical link back to the article
    #[serde(rename = "wikipedia_url")]
    pub source_url: String,
    /// Text of the first strong element in the description, if any
    #[serde(rename = "article_name", default)]
    pub display_name: Option<String>,
}

/// Resolution output consumed by page rendering
///
/// Carries the record fields under their template names plus the
/// resolution-time options in `config`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleView {
    pub code: String,
    pub img_url: String,
    pub wikipedia_url: String,
    pub article_name: Option<String>,
    pub config: BTreeMap<String, String>,
}

impl ArticleView {
    /// Wraps a record with the options of the request that produced it
    pub fn new(record: ArticleRecord, request: &ArticleRequest) -> Self {
        let mut config = BTreeMap::new();
        config.insert("lang".to_string(), request.language.clone());

        Self {
            code: record.html_fragment,
            img_url: record.image_url,
            wikipedia_url: record.source_url,
            article_name: record.display_name,
            config,
        }
    }
}
