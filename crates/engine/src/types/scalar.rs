//! String, integer and float scalars

use std::sync::Arc;

use redis_model_core::{Error, Result};
use redis_model_storage::Store;

use super::{impl_key_accessor, ScalarValue};

/// Plain string value
#[derive(Debug)]
pub struct StringValue {
    value: ScalarValue,
}

impl StringValue {
    /// Bind `key_label` in `store`
    pub fn new(store: Arc<dyn Store>, key_label: impl Into<String>) -> Self {
        Self {
            value: ScalarValue::new(store, key_label.into()),
        }
    }

    /// Stored string, `None` if absent
    pub fn get(&self) -> Result<Option<String>> {
        self.value.get()
    }

    /// Overwrite the stored string
    pub fn set(&self, value: &str) -> Result<()> {
        self.value.set(value)
    }
}

impl_key_accessor!(StringValue, scalar);

/// Integer value; absence reads as `None`
///
/// See [`Counter`](super::Counter) for the variant where absence reads as zero.
#[derive(Debug)]
pub struct IntegerValue {
    value: ScalarValue,
}

impl IntegerValue {
    /// Bind `key_label` in `store`
    pub fn new(store: Arc<dyn Store>, key_label: impl Into<String>) -> Self {
        Self {
            value: ScalarValue::new(store, key_label.into()),
        }
    }

    /// Raw stored string
    pub fn get(&self) -> Result<Option<String>> {
        self.value.get()
    }

    /// Store `value`
    pub fn set(&self, value: i64) -> Result<()> {
        self.value.set(&value.to_string())
    }

    /// Stored integer, `None` if absent
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidValue` if the stored string is not an integer.
    pub fn to_int(&self) -> Result<Option<i64>> {
        self.value.get()?.map(|raw| parse_int(&raw)).transpose()
    }
}

impl_key_accessor!(IntegerValue, scalar);

/// Float value; absence reads as `None`
#[derive(Debug)]
pub struct FloatValue {
    value: ScalarValue,
}

impl FloatValue {
    /// Bind `key_label` in `store`
    pub fn new(store: Arc<dyn Store>, key_label: impl Into<String>) -> Self {
        Self {
            value: ScalarValue::new(store, key_label.into()),
        }
    }

    /// Raw stored string
    pub fn get(&self) -> Result<Option<String>> {
        self.value.get()
    }

    /// Store `value`
    pub fn set(&self, value: f64) -> Result<()> {
        self.value.set(&value.to_string())
    }

    /// Stored float, `None` if absent
    pub fn to_float(&self) -> Result<Option<f64>> {
        self.value
            .get()?
            .map(|raw| {
                raw.trim()
                    .parse::<f64>()
                    .map_err(|_| Error::InvalidValue(format!("not a float: {}", raw)))
            })
            .transpose()
    }
}

impl_key_accessor!(FloatValue, scalar);

pub(crate) fn parse_int(raw: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| Error::InvalidValue(format!("not an integer: {}", raw)))
}
