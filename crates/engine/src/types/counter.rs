//! Counter: atomic integer whose absence reads as zero

use std::sync::Arc;

use redis_model_core::Result;
use redis_model_storage::Store;

use super::scalar::parse_int;
use super::{impl_key_accessor, ScalarValue};

/// Atomic integer counter
///
/// Increments are a single INCRBY each, so concurrent callers never lose an
/// update. A counter that was never touched reads as `0`; call
/// [`exists`](super::KeyAccessor::exists) to tell zero from absent.
///
/// # Example
///
/// ```ignore
/// let visits = model.counter(page_views, &page_id)?;
/// visits.incr()?;
/// assert_eq!(visits.to_int()?, 1);
/// ```
#[derive(Debug)]
pub struct Counter {
    value: ScalarValue,
}

impl Counter {
    /// Bind `key_label` in `store`
    pub fn new(store: Arc<dyn Store>, key_label: impl Into<String>) -> Self {
        Self {
            value: ScalarValue::new(store, key_label.into()),
        }
    }

    /// Add one, returning the new value
    pub fn incr(&self) -> Result<i64> {
        self.incr_by(1)
    }

    /// Add `by`, returning the new value
    pub fn incr_by(&self, by: i64) -> Result<i64> {
        self.value.incr_by(by)
    }

    /// Overwrite the counter
    pub fn set(&self, value: i64) -> Result<()> {
        self.value.set(&value.to_string())
    }

    /// Raw stored string
    pub fn get(&self) -> Result<Option<String>> {
        self.value.get()
    }

    /// Current value, `0` if absent
    pub fn to_int(&self) -> Result<i64> {
        match self.value.get()? {
            Some(raw) => parse_int(&raw),
            None => Ok(0),
        }
    }
}

impl_key_accessor!(Counter, scalar);
