//! Append-only list

use std::sync::Arc;

use redis_model_core::Result;
use redis_model_storage::Store;

use super::{impl_key_accessor, Handle};

/// List of strings, appended at the tail
#[derive(Debug, Clone)]
pub struct List {
    handle: Handle,
}

impl List {
    /// Bind `key_label` in `store`
    pub fn new(store: Arc<dyn Store>, key_label: impl Into<String>) -> Self {
        Self {
            handle: Handle::new(store, key_label),
        }
    }

    /// Every element, head first
    pub fn to_vec(&self) -> Result<Vec<String>> {
        self.handle.store().lrange(self.handle.key_label(), 0, -1)
    }

    /// Number of elements
    pub fn count(&self) -> Result<u64> {
        self.handle.store().llen(self.handle.key_label())
    }

    /// Alias of [`count`](List::count)
    pub fn len(&self) -> Result<u64> {
        self.count()
    }

    /// Element at `index`; negative indices count from the tail
    pub fn get(&self, index: i64) -> Result<Option<String>> {
        self.handle.store().lindex(self.handle.key_label(), index)
    }

    /// Append `value`, returning the new length
    pub fn push(&self, value: &str) -> Result<u64> {
        self.handle.store().rpush(self.handle.key_label(), value)
    }

    /// Alias of [`push`](List::push)
    pub fn append(&self, value: &str) -> Result<u64> {
        self.push(value)
    }
}

impl_key_accessor!(List);
