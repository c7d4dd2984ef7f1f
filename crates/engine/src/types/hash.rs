//! Field/value hash

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use redis_model_core::Result;
use redis_model_storage::Store;

use super::{Handle, KeyAccessor};

/// Hash of string fields
///
/// `to_map` is memoized until the next write through this accessor.
#[derive(Debug)]
pub struct Hash {
    handle: Handle,
    cached: Mutex<Option<HashMap<String, String>>>,
}

impl Hash {
    /// Bind `key_label` in `store`
    pub fn new(store: Arc<dyn Store>, key_label: impl Into<String>) -> Self {
        Self {
            handle: Handle::new(store, key_label),
            cached: Mutex::new(None),
        }
    }

    /// Value of `field`
    pub fn get(&self, field: &str) -> Result<Option<String>> {
        self.handle.store().hget(self.handle.key_label(), field)
    }

    /// Set `field`, returning whether it was new
    pub fn set(&self, field: &str, value: &str) -> Result<bool> {
        self.invalidate();
        self.handle.store().hset(self.handle.key_label(), field, value)
    }

    /// Add one to `field`
    pub fn incr(&self, field: &str) -> Result<i64> {
        self.incr_by(field, 1)
    }

    /// Add `by` to `field`, returning the new value
    pub fn incr_by(&self, field: &str, by: i64) -> Result<i64> {
        self.invalidate();
        self.handle
            .store()
            .hincr_by(self.handle.key_label(), field, by)
    }

    /// Every field and value, memoized
    pub fn to_map(&self) -> Result<HashMap<String, String>> {
        let mut cached = self.cached.lock();
        if let Some(map) = cached.as_ref() {
            return Ok(map.clone());
        }
        let map = self.handle.store().hgetall(self.handle.key_label())?;
        *cached = Some(map.clone());
        Ok(map)
    }

    /// Every field name
    pub fn keys(&self) -> Result<Vec<String>> {
        self.handle.store().hkeys(self.handle.key_label())
    }

    fn invalidate(&self) {
        *self.cached.lock() = None;
    }
}

impl KeyAccessor for Hash {
    fn key_label(&self) -> &str {
        self.handle.key_label()
    }

    fn store(&self) -> &dyn Store {
        self.handle.store()
    }

    fn delete(&self) -> Result<u64> {
        self.invalidate();
        self.handle.store().del(self.handle.key_label())
    }
}
