//! Derived sets produced by store-side intersection
//!
//! ## Key labels
//!
//! A derived set is keyed `operand_1:operand_2:<unix seconds>:<seed>`. The
//! timestamp and the seed keep concurrent intersections of the same operands
//! apart; with a random seed below 256 this is probabilistic, not a
//! guarantee.
//!
//! ## Lifecycle
//!
//! Creating an `Intersected` writes nothing. `generate` runs ZINTERSTORE into
//! the derived key, optionally with a TTL. The key stays until deleted,
//! expired, or released by the scope that created it
//! (see [`SortedSet::intersect_with`]).

use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rand::Rng;
use tracing::{debug, warn};

use redis_model_core::Result;
use redis_model_storage::Store;

use crate::label::join_label;
use crate::types::{KeyAccessor, SortedSet};

/// Seeds are drawn below this bound when none is given
pub const DEFAULT_SEED_RANGE: u32 = 256;

/// Ephemeral sorted set holding the intersection of its operands
#[derive(Debug, Clone)]
pub struct Intersected {
    set: SortedSet,
    operands: Vec<String>,
    seed: u32,
}

impl Intersected {
    /// Name the intersection of `operands` in `store`
    pub fn new(store: Arc<dyn Store>, operands: &[&str], seed: Option<u32>) -> Self {
        let seed = seed.unwrap_or_else(|| rand::thread_rng().gen_range(0..DEFAULT_SEED_RANGE));
        let key_label = join_label(
            operands
                .iter()
                .map(|operand| operand.to_string())
                .chain([Utc::now().timestamp().to_string(), seed.to_string()]),
        );
        Self {
            set: SortedSet::new(store, key_label),
            operands: operands.iter().map(|operand| operand.to_string()).collect(),
            seed,
        }
    }

    /// Key labels intersected
    pub fn operands(&self) -> &[String] {
        &self.operands
    }

    /// Seed in the derived key
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Write the intersection to the derived key, returning its cardinality
    ///
    /// With `expire_in`, the derived key also gets that time-to-live. An
    /// empty intersection leaves no key behind.
    pub fn generate(&self, expire_in: Option<Duration>) -> Result<u64> {
        let keys: Vec<&str> = self.operands.iter().map(String::as_str).collect();
        let members = self.set.store().zinterstore(self.key_label(), &keys)?;
        if let Some(ttl) = expire_in {
            self.set.store().expire(self.key_label(), ttl)?;
        }
        debug!(
            target: "redis_model::intersect",
            key_label = %self.key_label(),
            members,
            "Derived set materialized"
        );
        Ok(members)
    }
}

impl Deref for Intersected {
    type Target = SortedSet;

    fn deref(&self) -> &SortedSet {
        &self.set
    }
}

impl KeyAccessor for Intersected {
    fn key_label(&self) -> &str {
        self.set.key_label()
    }

    fn store(&self) -> &dyn Store {
        self.set.store()
    }
}

/// Deletes a derived set when the scope using it ends
///
/// `release` deletes it and reports the outcome; if the guard is dropped
/// without being released (an early return or a panic), the drop deletes it
/// and can only log a failure.
pub(crate) struct ScopedIntersection<'a> {
    set: &'a Intersected,
    armed: bool,
}

impl<'a> ScopedIntersection<'a> {
    pub(crate) fn new(set: &'a Intersected) -> Self {
        Self { set, armed: true }
    }

    pub(crate) fn release(mut self) -> Result<u64> {
        self.armed = false;
        let deleted = self.set.delete()?;
        debug!(
            target: "redis_model::intersect",
            key_label = %self.set.key_label(),
            "Derived set released"
        );
        Ok(deleted)
    }
}

impl Drop for ScopedIntersection<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        match self.set.delete() {
            Ok(_) => debug!(
                target: "redis_model::intersect",
                key_label = %self.set.key_label(),
                "Derived set released on unwind"
            ),
            Err(e) => warn!(
                target: "redis_model::intersect",
                key_label = %self.set.key_label(),
                error = %e,
                "Failed to delete derived set on unwind"
            ),
        }
    }
}
