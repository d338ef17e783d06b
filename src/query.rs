//! In-memory request cache keyed by query.
//!
//! Each key moves `Idle → Loading → Ready`. A fresh `Ready` entry is served
//! without calling the fetcher again; entries older than the stale time are
//! refetched. Keys never affect each other.

use ahash::AHashMap;
use chrono::NaiveDate;
use std::fmt;
use std::time::{Duration, Instant};

/// Default freshness window for cached results.
pub const DEFAULT_STALE_TIME: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    States,
    Countries,
    /// One state, by uppercase code.
    State(String),
    Historical(NaiveDate),
}

impl QueryKey {
    pub fn state(code: &str) -> Self {
        QueryKey::State(code.trim().to_ascii_uppercase())
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryKey::States => f.write_str("states"),
            QueryKey::Countries => f.write_str("countries"),
            QueryKey::State(code) => write!(f, "state:{code}"),
            QueryKey::Historical(d) => write!(f, "historical:{}", d.format("%Y%m%d")),
        }
    }
}

/// What a consumer sees for a key.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryState<T> {
    Idle,
    Loading,
    Ready(T),
}

impl<T> QueryState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, QueryState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            QueryState::Ready(v) => Some(v),
            _ => None,
        }
    }
}

#[derive(Debug)]
enum Slot<T> {
    Loading,
    Ready { value: T, at: Instant },
}

#[derive(Debug)]
pub struct QueryCache<T> {
    entries: AHashMap<QueryKey, Slot<T>>,
    stale_time: Duration,
}

impl<T> Default for QueryCache<T> {
    fn default() -> Self {
        Self {
            entries: AHashMap::new(),
            stale_time: DEFAULT_STALE_TIME,
        }
    }
}

impl<T: Clone> QueryCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stale_time(mut self, stale_time: Duration) -> Self {
        self.stale_time = stale_time;
        self
    }

    pub fn state(&self, key: &QueryKey) -> QueryState<T> {
        match self.entries.get(key) {
            None => QueryState::Idle,
            Some(Slot::Loading) => QueryState::Loading,
            Some(Slot::Ready { value, .. }) => QueryState::Ready(value.clone()),
        }
    }

    pub fn is_fresh(&self, key: &QueryKey) -> bool {
        matches!(
            self.entries.get(key),
            Some(Slot::Ready { at, .. }) if at.elapsed() < self.stale_time
        )
    }

    /// Mark `key` as in flight. Returns `false` when a request for it is
    /// already outstanding, in which case the caller should not start another.
    pub fn begin(&mut self, key: QueryKey) -> bool {
        if matches!(self.entries.get(&key), Some(Slot::Loading)) {
            return false;
        }
        log::trace!("query {key} loading");
        self.entries.insert(key, Slot::Loading);
        true
    }

    /// Store the result for an in-flight key. A result for a key that was
    /// invalidated (or never started) meanwhile is dropped; returns whether it was kept.
    pub fn complete(&mut self, key: QueryKey, value: T) -> bool {
        match self.entries.get_mut(&key) {
            Some(slot) if matches!(slot, Slot::Loading) => {
                *slot = Slot::Ready {
                    value,
                    at: Instant::now(),
                };
                true
            }
            _ => {
                log::debug!("discarding result for query {key}");
                false
            }
        }
    }

    /// Serve `key` from cache when fresh; otherwise run `fetcher` and cache its result.
    pub fn fetch<F>(&mut self, key: QueryKey, fetcher: F) -> T
    where
        F: FnOnce() -> T,
    {
        if self.is_fresh(&key)
            && let Some(Slot::Ready { value, .. }) = self.entries.get(&key)
        {
            return value.clone();
        }
        self.begin(key.clone());
        let value = fetcher();
        self.complete(key, value.clone());
        value
    }

    pub fn invalidate(&mut self, key: &QueryKey) {
        self.entries.remove(key);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn keys_display_like_cache_keys() {
        assert_eq!(QueryKey::States.to_string(), "states");
        assert_eq!(QueryKey::state("sp").to_string(), "state:SP");
        let d = NaiveDate::from_ymd_opt(2020, 5, 1).unwrap();
        assert_eq!(QueryKey::Historical(d).to_string(), "historical:20200501");
    }

    #[test]
    fn fresh_entries_are_not_refetched() {
        let mut cache: QueryCache<Vec<u32>> = QueryCache::new();
        let calls = Cell::new(0);
        let fetch = || {
            calls.set(calls.get() + 1);
            vec![1, 2, 3]
        };
        assert_eq!(cache.fetch(QueryKey::States, fetch), vec![1, 2, 3]);
        assert_eq!(cache.fetch(QueryKey::States, fetch), vec![1, 2, 3]);
        assert_eq!(calls.get(), 1);

        cache.invalidate(&QueryKey::States);
        cache.fetch(QueryKey::States, fetch);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn zero_stale_time_always_refetches() {
        let mut cache: QueryCache<u32> = QueryCache::new().with_stale_time(Duration::ZERO);
        let calls = Cell::new(0);
        for _ in 0..3 {
            cache.fetch(QueryKey::Countries, || {
                calls.set(calls.get() + 1);
                7
            });
        }
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn loading_state_and_dedup() {
        let mut cache: QueryCache<u32> = QueryCache::new();
        assert_eq!(cache.state(&QueryKey::States), QueryState::Idle);
        assert!(cache.begin(QueryKey::States));
        assert!(cache.state(&QueryKey::States).is_loading());
        assert!(!cache.begin(QueryKey::States));
        // other keys are unaffected
        assert_eq!(cache.state(&QueryKey::Countries), QueryState::Idle);
        assert!(cache.complete(QueryKey::States, 5));
        assert_eq!(cache.state(&QueryKey::States).data(), Some(&5));
    }

    #[test]
    fn results_for_invalidated_keys_are_dropped() {
        let mut cache: QueryCache<u32> = QueryCache::new();
        cache.begin(QueryKey::state("rj"));
        cache.invalidate(&QueryKey::state("RJ"));
        assert!(!cache.complete(QueryKey::state("rj"), 1));
        assert_eq!(cache.state(&QueryKey::state("rj")), QueryState::Idle);
    }
}
