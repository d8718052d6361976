//! wikicard library
//!
//! Resolves Wikipedia article titles into cleaned HTML excerpts with a
//! representative image and a canonical link, caching every resolution on disk.
//!
//! ```no_run
//! use wikicard::{ArticleRequest, ArticleResolver, FileCache, ResolverConfig, WikiClient};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let resolver = ArticleResolver::new(
//!     WikiClient::default(),
//!     FileCache::with_dir(".wikipedia-cache"),
//!     ResolverConfig::default(),
//! );
//! let record = resolver.resolve(&ArticleRequest::new("Paris", "en")?).await?;
//! println!("{}", record.html_fragment);
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod cli;
pub mod data;
pub mod extract;
pub mod resolver;

pub use cache::{CacheStore, FileCache, MemoryCache};
pub use data::{
    ArticleRecord, ArticleRequest, ArticleSource, ArticleView, FetchError, FetchMode,
    RequestError, ResolutionKey, WikiClient, WikiConfig,
};
pub use extract::{ContentExtractor, ExtractionError};
pub use resolver::{ArticleResolver, ResolveError, ResolverConfig};
