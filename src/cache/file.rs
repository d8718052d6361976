//! Disk-backed article cache
//!
//! Provides a `FileCache` that stores one JSON file per resolution key in an
//! XDG-compliant cache directory.

use directories::ProjectDirs;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::CacheStore;
use crate::data::{ArticleRecord, ResolutionKey};

/// File extension of cache entries
pub const CACHE_EXTENSION: &str = "cache";

/// Stores resolved articles as JSON files on disk
///
/// Entries live at `<cache_dir>/<sanitized-title>.<language>.cache`
/// (`~/.cache/wikicard/` on Linux by default).
#[derive(Debug, Clone)]
pub struct FileCache {
    /// Directory where cache files are stored
    cache_dir: PathBuf,
}

impl FileCache {
    /// Creates a new FileCache using the XDG-compliant cache directory
    ///
    /// Returns `None` if the cache directory cannot be determined (e.g., no home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "wikicard")?;
        let cache_dir = project_dirs.cache_dir().to_path_buf();
        Some(Self { cache_dir })
    }

    /// Creates a new FileCache with a custom cache directory
    pub fn with_dir(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    /// Directory holding the cache files
    pub fn dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Returns the path to the cache file for the given key
    pub fn entry_path(&self, key: &ResolutionKey) -> PathBuf {
        self.cache_dir.join(format!("{key}.{CACHE_EXTENSION}"))
    }

    /// Ensures the cache directory exists
    fn ensure_dir(&self) -> io::Result<()> {
        fs::create_dir_all(&self.cache_dir)
    }

    /// Deletes every cache entry, returning how many were removed
    ///
    /// A missing cache directory counts as already empty.
    pub fn clear(&self) -> io::Result<usize> {
        let entries = match fs::read_dir(&self.cache_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e),
        };

        let mut removed = 0;
        for entry in entries {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == CACHE_EXTENSION) {
                fs::remove_file(&path)?;
                removed += 1;
            }
        }

        debug!(removed, dir = %self.cache_dir.display(), "cleared cache");
        Ok(removed)
    }
}

impl CacheStore for FileCache {
    fn get(&self, key: &ResolutionKey) -> Option<ArticleRecord> {
        let path = self.entry_path(key);
        let content = fs::read_to_string(&path).ok()?;

        match serde_json::from_str(&content) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring corrupt cache entry");
                None
            }
        }
    }

    fn put(&self, key: &ResolutionKey, record: &ArticleRecord) -> io::Result<()> {
        self.ensure_dir()?;

        let json = serde_json::to_string_pretty(record)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        fs::write(self.entry_path(key), json)
    }

    fn invalidate(&self, key: &ResolutionKey) -> io::Result<bool> {
        match fs::remove_file(self.entry_path(key)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }
}
