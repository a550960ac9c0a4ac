//! # Caching Module
//!
//! Memoising wrappers around a [`Challenge`]. Elites are re-scored every
//! generation and children often repeat a parent row for row, so the same
//! grid is scored many times over a run. A [`CachedChallenge`] shares one
//! mutex-guarded map across threads; a [`ThreadLocalCachedChallenge`] keeps
//! one map per thread and never contends.
//!
//! Both maps are bounded: once a map holds `capacity` grids it is emptied
//! before the next insert, so memory stays proportional to the capacity and
//! not to the number of distinct grids a run produces.

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use strum::{Display, EnumString};

use crate::fitness::Challenge;
use crate::grid::Grid;

/// Number of grids a cache keeps before it starts over.
pub const DEFAULT_CACHE_CAPACITY: usize = 1 << 16;

/// Which cache, if any, wraps the fitness function of a run.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CacheType {
    /// One cache shared by every thread, holding at most
    /// [`DEFAULT_CACHE_CAPACITY`] grids (a few megabytes).
    Global,
    /// One cache per thread, each holding at most [`DEFAULT_CACHE_CAPACITY`]
    /// grids.
    ThreadLocal,
}

/// Wraps `challenge` in the cache selected by `cache_type`.
pub fn with_cache<C>(challenge: C, cache_type: Option<CacheType>) -> Box<dyn Challenge>
where
    C: Challenge + 'static,
{
    match cache_type {
        None => Box::new(challenge),
        Some(CacheType::Global) => Box::new(CachedChallenge::new(challenge)),
        Some(CacheType::ThreadLocal) => Box::new(ThreadLocalCachedChallenge::new(challenge)),
    }
}

/// A challenge whose scores are cached in one map shared across threads.
#[derive(Debug, Clone)]
pub struct CachedChallenge<C: Challenge> {
    challenge: C,
    cache: Arc<Mutex<HashMap<Grid, f64>>>,
    capacity: usize,
}

impl<C: Challenge> CachedChallenge<C> {
    pub fn new(challenge: C) -> Self {
        Self::with_capacity(challenge, DEFAULT_CACHE_CAPACITY)
    }

    /// Creates a cached challenge that keeps at most `capacity` grids.
    /// A capacity of 0 is treated as 1.
    pub fn with_capacity(challenge: C, capacity: usize) -> Self {
        Self {
            challenge,
            cache: Arc::new(Mutex::new(HashMap::new())),
            capacity: capacity.max(1),
        }
    }

    /// Creates a cached challenge with a pre-populated cache.
    pub fn with_cache(challenge: C, cache: HashMap<Grid, f64>) -> Self {
        let capacity = DEFAULT_CACHE_CAPACITY.max(cache.len());
        Self {
            challenge,
            cache: Arc::new(Mutex::new(cache)),
            capacity,
        }
    }

    pub fn inner(&self) -> &C {
        &self.challenge
    }

    pub fn cache_size(&self) -> usize {
        self.lock().len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear_cache(&self) {
        self.lock().clear();
    }

    // A panic while holding the lock cannot leave a half-written score behind.
    fn lock(&self) -> MutexGuard<'_, HashMap<Grid, f64>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<C: Challenge> Challenge for CachedChallenge<C> {
    fn score(&self, grid: &Grid) -> f64 {
        if let Some(score) = self.lock().get(grid) {
            return *score;
        }

        let score = self.challenge.score(grid);
        insert_bounded(&mut self.lock(), self.capacity, *grid, score);
        score
    }
}

fn insert_bounded(cache: &mut HashMap<Grid, f64>, capacity: usize, grid: Grid, score: f64) {
    if cache.len() >= capacity && !cache.contains_key(&grid) {
        cache.clear();
    }
    cache.insert(grid, score);
}

/// Per-thread score cache.
#[derive(Debug)]
pub struct ThreadLocalCache {
    cache: thread_local::ThreadLocal<RefCell<HashMap<Grid, f64>>>,
    capacity: usize,
}

impl ThreadLocalCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }

    /// Creates a cache that keeps at most `capacity` grids per thread.
    /// A capacity of 0 is treated as 1.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cache: thread_local::ThreadLocal::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn get(&self, grid: &Grid) -> Option<f64> {
        self.cache
            .get()
            .and_then(|cell| cell.try_borrow().ok())
            .and_then(|cache| cache.get(grid).copied())
    }

    pub fn insert(&self, grid: Grid, score: f64) {
        let cell = self.cache.get_or(|| RefCell::new(HashMap::new()));
        if let Ok(mut cache) = cell.try_borrow_mut() {
            insert_bounded(&mut cache, self.capacity, grid, score);
        }
    }

    /// Clears the cache of the current thread.
    pub fn clear(&self) {
        if let Some(cell) = self.cache.get() {
            if let Ok(mut cache) = cell.try_borrow_mut() {
                cache.clear();
            }
        }
    }

    /// Number of entries cached by the current thread.
    pub fn len(&self) -> usize {
        self.cache
            .get()
            .and_then(|cell| cell.try_borrow().ok())
            .map_or(0, |cache| cache.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ThreadLocalCache {
    fn default() -> Self {
        Self::new()
    }
}

/// A challenge whose scores are cached separately on each thread.
#[derive(Debug, Clone)]
pub struct ThreadLocalCachedChallenge<C: Challenge> {
    challenge: C,
    cache: Arc<ThreadLocalCache>,
}

impl<C: Challenge> ThreadLocalCachedChallenge<C> {
    pub fn new(challenge: C) -> Self {
        Self::with_capacity(challenge, DEFAULT_CACHE_CAPACITY)
    }

    /// Creates a cached challenge that keeps at most `capacity` grids per
    /// thread.
    pub fn with_capacity(challenge: C, capacity: usize) -> Self {
        Self {
            challenge,
            cache: Arc::new(ThreadLocalCache::with_capacity(capacity)),
        }
    }

    pub fn inner(&self) -> &C {
        &self.challenge
    }

    /// Clears the cache for the current thread.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Number of entries cached by the current thread.
    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

impl<C: Challenge> Challenge for ThreadLocalCachedChallenge<C> {
    fn score(&self, grid: &Grid) -> f64 {
        if let Some(score) = self.cache.get(grid) {
            return score;
        }

        let score = self.challenge.score(grid);
        self.cache.insert(*grid, score);
        score
    }
}
