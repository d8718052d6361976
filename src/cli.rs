//! Command-line interface parsing for wikicard
//!
//! This module handles parsing of CLI arguments using clap and turns them into
//! validated article requests plus client and resolver settings.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;

use crate::data::{ArticleRequest, FetchMode, RequestError, WikiConfig, DEFAULT_LANGUAGE};
use crate::resolver::ResolverConfig;

/// Error types for CLI argument handling
#[derive(Debug, Error)]
pub enum CliError {
    /// A title or language argument was rejected
    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] RequestError),

    /// Neither titles nor a cache-clearing flag were given
    #[error("No article titles given")]
    NoTitles,

    /// A zero timeout would fail every fetch
    #[error("Timeout must be greater than zero")]
    ZeroTimeout,
}

/// wikicard - Turn Wikipedia article titles into embeddable excerpts
#[derive(Parser, Debug)]
#[command(name = "wikicard")]
#[command(about = "Resolve Wikipedia articles into cached HTML excerpts")]
#[command(version)]
pub struct Cli {
    /// Article titles to resolve
    ///
    /// Examples:
    ///   wikicard Paris
    ///   wikicard --lang en "Victor Hugo" Lyon
    #[arg(value_name = "TITLE")]
    pub titles: Vec<String>,

    /// Wiki language code
    #[arg(short, long, default_value = DEFAULT_LANGUAGE)]
    pub lang: String,

    /// Directory holding cache entries (defaults to the XDG cache directory)
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Neither read nor write the cache
    #[arg(long)]
    pub no_cache: bool,

    /// Drop cached entries for the given titles before resolving
    #[arg(long, conflicts_with = "no_cache")]
    pub refresh: bool,

    /// Delete every cache entry before resolving
    #[arg(long)]
    pub clear_cache: bool,

    /// Fetch the whole parsed article instead of the intro extract
    #[arg(long)]
    pub full: bool,

    /// Base URL of the embedding site, used for the default avatar
    #[arg(long, value_name = "URL", default_value = "")]
    pub site_url: String,

    /// API host, `{lang}` is replaced with the language code
    #[arg(long, value_name = "URL")]
    pub api_base: Option<String>,

    /// Give up on a title after this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone)]
pub struct StartupConfig {
    /// Requests to resolve, in argument order
    pub requests: Vec<ArticleRequest>,
    /// API client settings
    pub wiki: WikiConfig,
    /// Resolver settings
    pub resolver: ResolverConfig,
    /// Cache directory override
    pub cache_dir: Option<PathBuf>,
    /// Whether to invalidate entries before resolving
    pub refresh: bool,
    /// Whether to wipe the cache first
    pub clear_cache: bool,
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Arguments
    /// * `cli` - The parsed CLI struct
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with appropriate settings
    /// * `Err(CliError)` if a title or language is invalid, or there is nothing to do
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        if cli.titles.is_empty() && !cli.clear_cache {
            return Err(CliError::NoTitles);
        }

        let requests = cli
            .titles
            .iter()
            .map(|title| ArticleRequest::new(title.as_str(), cli.lang.as_str()))
            .collect::<Result<Vec<_>, _>>()?;

        let timeout = match cli.timeout {
            Some(0) => return Err(CliError::ZeroTimeout),
            Some(secs) => Some(Duration::from_secs(secs)),
            None => None,
        };

        let mode = if cli.full {
            FetchMode::FullArticle
        } else {
            FetchMode::Intro
        };
        let mut wiki = WikiConfig::default().with_mode(mode);
        if let Some(api_base) = &cli.api_base {
            wiki = wiki.with_api_base(api_base.as_str());
        }

        let resolver = ResolverConfig::default()
            .with_default_language(cli.lang.as_str())
            .with_site_base_url(cli.site_url.as_str())
            .with_cache_enabled(!cli.no_cache)
            .with_timeout(timeout);

        Ok(StartupConfig {
            requests,
            wiki,
            resolver,
            cache_dir: cli.cache_dir.clone(),
            refresh: cli.refresh,
            clear_cache: cli.clear_cache,
        })
    }

    /// Default tracing filter for the chosen verbosity
    pub fn log_filter(verbose: bool) -> &'static str {
        if verbose {
            "wikicard=debug"
        } else {
            "wikicard=info"
        }
    }
}
