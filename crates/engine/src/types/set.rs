//! Unordered set

use std::sync::Arc;

use redis_model_core::Result;
use redis_model_storage::Store;

use super::{impl_key_accessor, Handle};

/// Unordered set of strings
#[derive(Debug, Clone)]
pub struct Set {
    handle: Handle,
}

impl Set {
    /// Bind `key_label` in `store`
    pub fn new(store: Arc<dyn Store>, key_label: impl Into<String>) -> Self {
        Self {
            handle: Handle::new(store, key_label),
        }
    }

    /// Every member, in no particular order
    pub fn to_vec(&self) -> Result<Vec<String>> {
        self.handle.store().smembers(self.handle.key_label())
    }

    /// Cardinality
    pub fn count(&self) -> Result<u64> {
        self.handle.store().scard(self.handle.key_label())
    }

    /// Alias of [`count`](Set::count)
    pub fn len(&self) -> Result<u64> {
        self.count()
    }

    /// Add `value`, returning whether it was new
    pub fn add(&self, value: &str) -> Result<bool> {
        self.handle.store().sadd(self.handle.key_label(), value)
    }

    /// Remove `value`, returning whether it was present
    pub fn remove(&self, value: &str) -> Result<bool> {
        self.handle.store().srem(self.handle.key_label(), value)
    }

    /// Whether `value` is a member
    pub fn contains(&self, value: &str) -> Result<bool> {
        self.handle.store().sismember(self.handle.key_label(), value)
    }

    /// Up to `count` members drawn independently at random
    ///
    /// Picks are made with replacement, so a member may appear more than
    /// once. An empty set yields no picks.
    pub fn pick_random(&self, count: usize) -> Result<Vec<String>> {
        self.handle
            .store()
            .srandmember_many(self.handle.key_label(), count)
    }
}

impl_key_accessor!(Set);
