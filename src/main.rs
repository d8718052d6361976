//! wikicard - Resolve Wikipedia articles into embeddable excerpts
//!
//! Prints the resolution output for each requested title as JSON on stdout.
//! Logs go to stderr.

use std::error::Error;
use std::process::ExitCode;

use clap::Parser;
use futures::future::join_all;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use wikicard::cli::{Cli, StartupConfig};
use wikicard::{ArticleResolver, ArticleView, CacheStore, FileCache, MemoryCache, WikiClient};

/// Installs the stderr log subscriber, honouring `RUST_LOG` when set
fn setup_logging(verbose: bool) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| StartupConfig::log_filter(verbose).into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Resolves every requested title and prints the successful ones
///
/// Returns `ExitCode::FAILURE` when at least one title could not be resolved.
async fn run(config: StartupConfig) -> Result<ExitCode, Box<dyn Error>> {
    let StartupConfig {
        requests,
        wiki,
        resolver: resolver_config,
        cache_dir,
        refresh,
        clear_cache,
    } = config;

    let file_cache = cache_dir.map(FileCache::with_dir).or_else(FileCache::new);

    if clear_cache {
        match &file_cache {
            Some(cache) => {
                let removed = cache.clear()?;
                info!(removed, dir = %cache.dir().display(), "cleared cache");
            }
            None => warn!("no cache directory available, nothing to clear"),
        }
    }

    if requests.is_empty() {
        return Ok(ExitCode::SUCCESS);
    }

    let cache: Box<dyn CacheStore> = match file_cache {
        Some(cache) => Box::new(cache),
        None => {
            warn!("no cache directory available, caching in memory only");
            Box::new(MemoryCache::new())
        }
    };

    let resolver = ArticleResolver::new(WikiClient::new(wiki), cache, resolver_config);
    let resolver = &resolver;

    let outcomes = join_all(requests.iter().map(|request| async move {
        let view = if refresh {
            resolver
                .refresh(request)
                .await
                .map(|record| ArticleView::new(record, request))
        } else {
            resolver.resolve_view(request).await
        };
        (request, view)
    }))
    .await;

    let mut views = Vec::with_capacity(outcomes.len());
    let mut failed = false;
    for (request, outcome) in outcomes {
        match outcome {
            Ok(view) => views.push(view),
            Err(e) => {
                error!(
                    title = %request.title,
                    lang = %request.language,
                    error = %e,
                    "resolution failed"
                );
                failed = true;
            }
        }
    }

    let json = match views.as_slice() {
        [single] if requests.len() == 1 => serde_json::to_string_pretty(single)?,
        _ => serde_json::to_string_pretty(&views)?,
    };
    if !views.is_empty() {
        println!("{json}");
    }

    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let config = match StartupConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match run(config).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
