//! Short-TTL memoization of assembled pages.
//!
//! Browsers re-issue identical page requests constantly (tab focus,
//! back navigation, polling widgets); the cache absorbs those repeats.
//! It is an optimization only — paging is correct with no cache at all
//! — and entries expire after a short TTL, so a stale page can outlive
//! an index rebuild by at most that window. Call [`PageCache::clear`]
//! after a rebuild to close even that window.
//!
//! The clock is injectable so expiry is testable without sleeping.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use lru::LruCache;

use crate::index::Predicate;
use crate::paging::PageResult;

/// Default time-to-live for cached pages
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Default maximum number of cached pages
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

/// Time source for TTL checks
pub trait Clock: Send + Sync {
    /// Current instant
    fn now(&self) -> Instant;
}

/// Wall-clock time source used in production
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Cache key: everything that determines a page's content
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct PageKey {
    predicate: Predicate,
    page: u64,
    page_size: u64,
}

struct CachedPage {
    stored_at: Instant,
    result: PageResult,
}

/// Entry-bounded, TTL'd page cache, safe for concurrent get/put.
///
/// Wraps an unbounded [`LruCache`] behind a [`Mutex`] and enforces the
/// entry cap itself on insert. A poisoned lock is recovered by clearing
/// the cache and continuing — losing cached pages is always safe.
pub struct PageCache {
    inner: Mutex<LruCache<PageKey, CachedPage>>,
    ttl: Duration,
    capacity: usize,
    clock: Box<dyn Clock>,
}

impl PageCache {
    /// Cache with the default TTL (5 minutes) and capacity.
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    /// Cache with a custom TTL and the default capacity.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self::with_clock(ttl, Box::new(SystemClock))
    }

    /// Cache with a custom TTL and time source.
    pub fn with_clock(ttl: Duration, clock: Box<dyn Clock>) -> Self {
        PageCache {
            inner: Mutex::new(LruCache::unbounded()),
            ttl,
            capacity: DEFAULT_CACHE_CAPACITY,
            clock,
        }
    }

    /// Maximum number of cached pages.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Cached page for `(predicate, page, page_size)`, if fresh.
    ///
    /// An expired entry is evicted and reported as absent.
    pub fn get(&self, predicate: &Predicate, page: u64, page_size: u64) -> Option<PageResult> {
        let key = PageKey {
            predicate: predicate.clone(),
            page,
            page_size,
        };
        let now = self.clock.now();
        let mut inner = self.lock();

        let fresh = inner
            .peek(&key)
            .map(|cached| now.saturating_duration_since(cached.stored_at) < self.ttl);
        match fresh {
            // get() rather than peek() so a hit refreshes LRU order.
            Some(true) => inner.get(&key).map(|cached| cached.result.clone()),
            Some(false) => {
                inner.pop(&key);
                None
            }
            None => None,
        }
    }

    /// Store an assembled page.
    pub fn put(&self, predicate: &Predicate, page: u64, page_size: u64, result: PageResult) {
        let key = PageKey {
            predicate: predicate.clone(),
            page,
            page_size,
        };
        let stored_at = self.clock.now();
        let mut inner = self.lock();

        inner.push(key, CachedPage { stored_at, result });
        while inner.len() > self.capacity {
            inner.pop_lru();
        }
    }

    /// Drop every cached page (e.g. after an index rebuild).
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of cached pages (fresh or not yet evicted).
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the cache holds no pages.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Lock the store, recovering from poisoning by clearing.
    fn lock(&self) -> std::sync::MutexGuard<'_, LruCache<PageKey, CachedPage>> {
        self.inner.lock().unwrap_or_else(|poisoned| {
            let mut guard = poisoned.into_inner();
            guard.clear();
            guard
        })
    }
}

impl Default for PageCache {
    fn default() -> Self {
        Self::new()
    }
}
