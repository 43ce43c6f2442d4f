//! In-memory response cache with a fixed freshness window.
//!
//! Entries are keyed by request identity and checked for expiry only when
//! read. Failed fetches are never stored, so the next read retries.

use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::rc::Rc;

use crate::utils::Clock;

struct CacheEntry<V> {
    value: V,
    stored_at: u64,
}

/// Memoizes fetched values by key for `ttl_ms` milliseconds.
///
/// Keys may carry credentials, so they are never logged.
pub struct ResponseCache<V> {
    entries: RefCell<HashMap<String, CacheEntry<V>>>,
    ttl_ms: u64,
    clock: Rc<dyn Clock>,
}

impl<V: Clone> ResponseCache<V> {
    pub fn new(ttl_ms: u64, clock: Rc<dyn Clock>) -> Self {
        Self {
            entries: RefCell::new(HashMap::new()),
            ttl_ms,
            clock,
        }
    }

    /// Return the cached value for `key` if it is still fresh.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.now_ms();
        let entries = self.entries.borrow();
        let entry = entries.get(key)?;
        self.is_fresh(entry, now).then(|| entry.value.clone())
    }

    /// Return the fresh value for `key`, or run `fetcher` and store its result.
    ///
    /// Errors from `fetcher` are returned unchanged and leave the cache as it was.
    pub async fn get_or_fetch<F, Fut, E>(&self, key: &str, fetcher: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(key) {
            tracing::debug!("cache hit");
            return Ok(value);
        }

        tracing::debug!(entries = self.len(), "cache miss");
        let value = fetcher().await?;

        self.entries.borrow_mut().insert(
            key.to_string(),
            CacheEntry {
                value: value.clone(),
                stored_at: self.clock.now_ms(),
            },
        );
        Ok(value)
    }

    /// Drop the entry for `key`.
    pub fn invalidate(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }

    /// Number of stored entries, fresh or not.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    fn is_fresh(&self, entry: &CacheEntry<V>, now: u64) -> bool {
        now.saturating_sub(entry.stored_at) < self.ttl_ms
    }
}
