//! Shared read/write path of the string-backed scalar families

use std::sync::Arc;

use parking_lot::Mutex;

use redis_model_core::Result;
use redis_model_storage::Store;

use super::Handle;

/// String key with a memoized read
///
/// Only a present value is remembered, so a read of an absent key goes to the
/// store every time. Any write through this accessor drops the memo.
#[derive(Debug)]
pub(crate) struct ScalarValue {
    handle: Handle,
    cached: Mutex<Option<String>>,
}

impl ScalarValue {
    pub(crate) fn new(store: Arc<dyn Store>, key_label: String) -> Self {
        Self {
            handle: Handle::new(store, key_label),
            cached: Mutex::new(None),
        }
    }

    pub(crate) fn handle(&self) -> &Handle {
        &self.handle
    }

    /// GET, memoized
    pub(crate) fn get(&self) -> Result<Option<String>> {
        let mut cached = self.cached.lock();
        if let Some(value) = cached.as_ref() {
            return Ok(Some(value.clone()));
        }
        let value = self.handle.store().get(self.handle.key_label())?;
        if let Some(v) = &value {
            *cached = Some(v.clone());
        }
        Ok(value)
    }

    /// SET
    pub(crate) fn set(&self, value: &str) -> Result<()> {
        self.invalidate();
        self.handle.store().set(self.handle.key_label(), value)
    }

    /// INCRBY
    pub(crate) fn incr_by(&self, by: i64) -> Result<i64> {
        self.invalidate();
        self.handle.store().incr_by(self.handle.key_label(), by)
    }

    pub(crate) fn delete(&self) -> Result<u64> {
        self.invalidate();
        self.handle.store().del(self.handle.key_label())
    }

    pub(crate) fn invalidate(&self) {
        *self.cached.lock() = None;
    }
}
