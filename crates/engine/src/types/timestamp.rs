//! Timestamp stored as a UTC ISO-8601 string

use std::sync::Arc;

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};

use redis_model_core::Result;
use redis_model_storage::Store;

use super::{impl_key_accessor, ScalarValue};

/// Point in time, stored as `2024-05-01T12:00:00Z`
///
/// Reads are lenient: a stored string that does not parse reads as `None`
/// rather than failing.
#[derive(Debug)]
pub struct Timestamp {
    value: ScalarValue,
}

impl Timestamp {
    /// Bind `key_label` in `store`
    pub fn new(store: Arc<dyn Store>, key_label: impl Into<String>) -> Self {
        Self {
            value: ScalarValue::new(store, key_label.into()),
        }
    }

    /// Store `time`, normalized to UTC with second precision
    pub fn set(&self, time: DateTime<Utc>) -> Result<()> {
        self.value
            .set(&time.to_rfc3339_opts(SecondsFormat::Secs, true))
    }

    /// Raw stored string
    pub fn get(&self) -> Result<Option<String>> {
        self.value.get()
    }

    /// Stored time, `None` if absent or unparseable
    pub fn to_time(&self) -> Result<Option<DateTime<Utc>>> {
        Ok(self.value.get()?.and_then(|raw| parse_time(&raw)))
    }
}

impl_key_accessor!(Timestamp, scalar);

fn parse_time(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(time) = DateTime::parse_from_rfc3339(raw) {
        return Some(time.with_timezone(&Utc));
    }
    // Zone-less forms are taken as UTC.
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}
