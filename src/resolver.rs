//! Cache-first article resolution
//!
//! [`ArticleResolver`] ties the pieces together: it looks the request up in a
//! [`CacheStore`], and on a miss fetches the raw article, extracts a record and
//! writes it back before returning it.

use std::io;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info};

use crate::cache::CacheStore;
use crate::data::{
    language_url, ArticleRecord, ArticleRequest, ArticleSource, ArticleView, FetchError,
    RequestError, DEFAULT_LANGUAGE,
};
use crate::extract::{ContentExtractor, ExtractionError};

/// Default article link root, `{lang}` is replaced with the request language
pub const DEFAULT_ARTICLE_BASE: &str = "http://{lang}.wikipedia.org";

/// Errors that can occur while resolving an article
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Fetching the raw article failed
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The raw article could not be turned into a record
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// Reading or writing the cache failed
    #[error("Cache error: {0}")]
    Cache(#[from] io::Error),

    /// Fetch and extraction did not finish in time
    #[error("Resolution timed out after {0:?}")]
    Timeout(Duration),
}

/// Settings for an [`ArticleResolver`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Language applied to requests built without one
    pub default_language: String,
    /// Root of article links, may contain `{lang}`
    pub article_base: String,
    /// Base URL of the embedding site, prefixes the default avatar
    pub site_base_url: String,
    /// Whether to read and write the cache
    pub cache_enabled: bool,
    /// Deadline for fetch and extraction on a cache miss
    pub timeout: Option<Duration>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            default_language: DEFAULT_LANGUAGE.to_string(),
            article_base: DEFAULT_ARTICLE_BASE.to_string(),
            site_base_url: String::new(),
            cache_enabled: true,
            timeout: None,
        }
    }
}

impl ResolverConfig {
    pub fn with_site_base_url(mut self, site_base_url: impl Into<String>) -> Self {
        self.site_base_url = site_base_url.into();
        self
    }

    pub fn with_cache_enabled(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_default_language(mut self, language: impl Into<String>) -> Self {
        self.default_language = language.into();
        self
    }

    /// Article link root for a language
    pub fn wiki_url(&self, language: &str) -> String {
        language_url(&self.article_base, language)
            .trim_end_matches('/')
            .to_string()
    }
}

/// Resolves article requests through a cache
pub struct ArticleResolver<S, C> {
    source: S,
    cache: C,
    extractor: ContentExtractor,
    config: ResolverConfig,
}

impl<S: ArticleSource, C: CacheStore> ArticleResolver<S, C> {
    /// Creates a resolver from an article source, a cache and settings
    pub fn new(source: S, cache: C, config: ResolverConfig) -> Self {
        let extractor = ContentExtractor::new(&config.site_base_url);
        Self {
            source,
            cache,
            extractor,
            config,
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Builds a request in the configured default language
    pub fn request(&self, title: &str) -> Result<ArticleRequest, RequestError> {
        ArticleRequest::new(title, self.config.default_language.as_str())
    }

    /// Resolves a request, serving it from the cache when possible
    ///
    /// On a miss the article is fetched, extracted and persisted. Failures leave
    /// the cache untouched.
    pub async fn resolve(&self, request: &ArticleRequest) -> Result<ArticleRecord, ResolveError> {
        let key = request.key();

        if self.config.cache_enabled {
            if let Some(record) = self.cache.get(&key) {
                debug!(%key, "cache hit");
                return Ok(record);
            }
            debug!(%key, "cache miss");
        }

        let record = match self.config.timeout {
            Some(limit) => tokio::time::timeout(limit, self.fetch_and_extract(request))
                .await
                .map_err(|_| ResolveError::Timeout(limit))??,
            None => self.fetch_and_extract(request).await?,
        };

        if self.config.cache_enabled {
            self.cache.put(&key, &record)?;
            debug!(%key, "cached article");
        }

        Ok(record)
    }

    /// Resolves a request into the view consumed by page rendering
    pub async fn resolve_view(
        &self,
        request: &ArticleRequest,
    ) -> Result<ArticleView, ResolveError> {
        let record = self.resolve(request).await?;
        Ok(ArticleView::new(record, request))
    }

    /// Drops any cached entry for the request, then resolves it again
    pub async fn refresh(&self, request: &ArticleRequest) -> Result<ArticleRecord, ResolveError> {
        let key = request.key();
        if self.cache.invalidate(&key)? {
            debug!(%key, "invalidated cache entry");
        }
        self.resolve(request).await
    }

    async fn fetch_and_extract(
        &self,
        request: &ArticleRequest,
    ) -> Result<ArticleRecord, ResolveError> {
        info!(title = %request.title, lang = %request.language, "fetching article");
        let excerpt = self.source.fetch(&request.title, &request.language).await?;

        let wiki_url = self.config.wiki_url(&request.language);
        let record = self.extractor.extract(&excerpt.html, &request.title, &wiki_url)?;
        Ok(record)
    }
}
