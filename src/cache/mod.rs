//! Cache module for storing resolved articles
//!
//! Resolved [`ArticleRecord`]s are stored under their [`ResolutionKey`]. An
//! entry stays authoritative until it is invalidated or removed externally;
//! there is no expiry. Entries that cannot be decoded are treated as misses.

mod file;
mod memory;

pub use file::{FileCache, CACHE_EXTENSION};
pub use memory::MemoryCache;

use std::io;

use crate::data::{ArticleRecord, ResolutionKey};

/// Key-value store for resolved articles
///
/// Concurrent writers to the same key are not coordinated; the last write wins.
pub trait CacheStore: Send + Sync {
    /// Reads the record stored under `key`, `None` on a miss or corrupt entry
    fn get(&self, key: &ResolutionKey) -> Option<ArticleRecord>;

    /// Writes or overwrites the record stored under `key`
    fn put(&self, key: &ResolutionKey, record: &ArticleRecord) -> io::Result<()>;

    /// Removes the entry for `key`, returning whether one existed
    fn invalidate(&self, key: &ResolutionKey) -> io::Result<bool>;
}

impl<T: CacheStore + ?Sized> CacheStore for Box<T> {
    fn get(&self, key: &ResolutionKey) -> Option<ArticleRecord> {
        (**self).get(key)
    }

    fn put(&self, key: &ResolutionKey, record: &ArticleRecord) -> io::Result<()> {
        (**self).put(key, record)
    }

    fn invalidate(&self, key: &ResolutionKey) -> io::Result<bool> {
        (**self).invalidate(key)
    }
}
