//! In-process article cache

use std::collections::HashMap;
use std::io;
use std::sync::{Mutex, PoisonError};

use super::CacheStore;
use crate::data::{ArticleRecord, ResolutionKey};

/// Keeps resolved articles in memory for the lifetime of the value
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, ArticleRecord>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, ArticleRecord>> {
        // A panic while holding the lock cannot leave a half-written record behind
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CacheStore for MemoryCache {
    fn get(&self, key: &ResolutionKey) -> Option<ArticleRecord> {
        self.lock().get(&key.to_string()).cloned()
    }

    fn put(&self, key: &ResolutionKey, record: &ArticleRecord) -> io::Result<()> {
        self.lock().insert(key.to_string(), record.clone());
        Ok(())
    }

    fn invalidate(&self, key: &ResolutionKey) -> io::Result<bool> {
        Ok(self.lock().remove(&key.to_string()).is_some())
    }
}
