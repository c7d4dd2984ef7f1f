//! Typed data accessors
//!
//! One accessor family per store data type. An accessor is a key label plus a
//! shared store handle; every method issues store commands against that key.
//! Accessors are cheap to build and are normally created per use through the
//! `RedisModel` context.
//!
//! ## Absence
//!
//! A missing key is never an error. Each family reports it in its own way:
//! counters read zero, integers/floats/strings/timestamps read `None`, and
//! collections read empty.
//!
//! ## Thread Safety
//!
//! All accessors are `Send + Sync`. The memoized reads of scalar and hash
//! accessors sit behind a mutex and are only an optimization; a fresh
//! accessor always reads through to the store.

use std::fmt;
use std::sync::Arc;

use redis_model_core::{DataType, Result};
use redis_model_storage::Store;

mod counter;
mod hash;
mod list;
mod scalar;
mod set;
mod sorted_set;
mod timestamp;
mod value;

pub use counter::Counter;
pub use hash::Hash;
pub use list::List;
pub use scalar::{FloatValue, IntegerValue, StringValue};
pub use set::Set;
pub use sorted_set::{IntersectOptions, RangeOptions, SortedSet};
pub use timestamp::Timestamp;

pub(crate) use value::ScalarValue;

/// Common surface of every accessor: its key and existence/deletion
pub trait KeyAccessor: Send + Sync {
    /// Fully-qualified store key
    fn key_label(&self) -> &str;

    /// Store the key lives in
    fn store(&self) -> &dyn Store;

    /// Whether the key exists
    fn exists(&self) -> Result<bool> {
        self.store().exists(self.key_label())
    }

    /// Delete the key, returning the number of keys removed (0 or 1)
    fn delete(&self) -> Result<u64> {
        self.store().del(self.key_label())
    }

    /// Alias of [`delete`](KeyAccessor::delete)
    fn clear(&self) -> Result<u64> {
        self.delete()
    }
}

/// Key label and store shared by every accessor
#[derive(Clone)]
pub struct Handle {
    store: Arc<dyn Store>,
    key_label: String,
}

impl Handle {
    /// Bind `key_label` in `store`
    pub fn new(store: Arc<dyn Store>, key_label: impl Into<String>) -> Self {
        Self {
            store,
            key_label: key_label.into(),
        }
    }

    /// Bound key
    pub fn key_label(&self) -> &str {
        &self.key_label
    }

    /// Bound store
    pub fn store(&self) -> &dyn Store {
        &*self.store
    }

    /// Shared store handle
    pub fn shared_store(&self) -> &Arc<dyn Store> {
        &self.store
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("key_label", &self.key_label)
            .finish()
    }
}

/// Implement `KeyAccessor` for a type holding a `handle: Handle` field, or a
/// `value: ScalarValue` field when tagged `scalar`.
macro_rules! impl_key_accessor {
    ($ty:ty) => {
        impl $crate::types::KeyAccessor for $ty {
            fn key_label(&self) -> &str {
                self.handle.key_label()
            }

            fn store(&self) -> &dyn redis_model_storage::Store {
                self.handle.store()
            }
        }
    };
    ($ty:ty, scalar) => {
        impl $crate::types::KeyAccessor for $ty {
            fn key_label(&self) -> &str {
                self.value.handle().key_label()
            }

            fn store(&self) -> &dyn redis_model_storage::Store {
                self.value.handle().store()
            }

            fn delete(&self) -> redis_model_core::Result<u64> {
                self.value.delete()
            }
        }
    };
}
pub(crate) use impl_key_accessor;

/// Accessor of whichever family a schema declares
#[derive(Debug)]
pub enum Accessor {
    /// `string`
    String(StringValue),
    /// `counter` / `value`
    Counter(Counter),
    /// `float`
    Float(FloatValue),
    /// `integer`
    Integer(IntegerValue),
    /// `timestamp`
    Timestamp(Timestamp),
    /// `list`
    List(List),
    /// `set`
    Set(Set),
    /// `sorted_set`
    SortedSet(SortedSet),
    /// `hash`
    Hash(Hash),
}

impl Accessor {
    /// Build the accessor family for `data_type` on `key_label`
    pub fn new(data_type: DataType, store: Arc<dyn Store>, key_label: impl Into<String>) -> Self {
        let key_label = key_label.into();
        match data_type {
            DataType::String => Accessor::String(StringValue::new(store, key_label)),
            DataType::Counter => Accessor::Counter(Counter::new(store, key_label)),
            DataType::Float => Accessor::Float(FloatValue::new(store, key_label)),
            DataType::Integer => Accessor::Integer(IntegerValue::new(store, key_label)),
            DataType::Timestamp => Accessor::Timestamp(Timestamp::new(store, key_label)),
            DataType::List => Accessor::List(List::new(store, key_label)),
            DataType::Set => Accessor::Set(Set::new(store, key_label)),
            DataType::SortedSet => Accessor::SortedSet(SortedSet::new(store, key_label)),
            DataType::Hash => Accessor::Hash(Hash::new(store, key_label)),
        }
    }

    /// Data type of the wrapped family
    pub fn data_type(&self) -> DataType {
        match self {
            Accessor::String(_) => DataType::String,
            Accessor::Counter(_) => DataType::Counter,
            Accessor::Float(_) => DataType::Float,
            Accessor::Integer(_) => DataType::Integer,
            Accessor::Timestamp(_) => DataType::Timestamp,
            Accessor::List(_) => DataType::List,
            Accessor::Set(_) => DataType::Set,
            Accessor::SortedSet(_) => DataType::SortedSet,
            Accessor::Hash(_) => DataType::Hash,
        }
    }

    fn inner(&self) -> &dyn KeyAccessor {
        match self {
            Accessor::String(a) => a,
            Accessor::Counter(a) => a,
            Accessor::Float(a) => a,
            Accessor::Integer(a) => a,
            Accessor::Timestamp(a) => a,
            Accessor::List(a) => a,
            Accessor::Set(a) => a,
            Accessor::SortedSet(a) => a,
            Accessor::Hash(a) => a,
        }
    }
}

impl KeyAccessor for Accessor {
    fn key_label(&self) -> &str {
        self.inner().key_label()
    }

    fn store(&self) -> &dyn Store {
        self.inner().store()
    }

    fn delete(&self) -> Result<u64> {
        self.inner().delete()
    }
}
