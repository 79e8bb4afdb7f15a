//! Route memoisation for the immutable base graph.

use crate::pipeline::Pipeline;
use ahash::AHashMap;
use parking_lot::RwLock;
use switchyard_core::error::NoRouteFound;
use switchyard_core::state::State;

type CacheKey = (State, State);

/// Thread-safe memo of definitive routing results.
///
/// Only valid for a graph that never changes; `NoRouteFound` is cached too,
/// since it is as definitive as a found route.
pub struct RouteCache {
    capacity: usize,
    entries: RwLock<AHashMap<CacheKey, Result<Pipeline, NoRouteFound>>>,
}

impl RouteCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: RwLock::new(AHashMap::new()),
        }
    }

    pub fn get(&self, from: &State, to: &State) -> Option<Result<Pipeline, NoRouteFound>> {
        self.entries.read().get(&(from.clone(), to.clone())).cloned()
    }

    pub fn insert(&self, from: State, to: State, result: Result<Pipeline, NoRouteFound>) {
        if self.capacity == 0 {
            return;
        }
        let key = (from, to);
        let mut entries = self.entries.write();
        if entries.len() >= self.capacity && !entries.contains_key(&key) {
            tracing::debug!(capacity = self.capacity, "Route cache full, clearing");
            entries.clear();
        }
        entries.insert(key, result);
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

impl std::fmt::Debug for RouteCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteCache")
            .field("capacity", &self.capacity)
            .field("entries", &self.len())
            .finish()
    }
}
