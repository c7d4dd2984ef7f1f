//! RedisModel: the owning context
//!
//! ## Design
//!
//! `RedisModel` owns everything the accessor layer needs: the configuration
//! that prefixes key labels, the shared store handle, and the registry of
//! types and schemas. It is built once at boot and passed to whatever wires
//! up entity types; there is no process-global state.
//!
//! ## Usage
//!
//! ```ignore
//! let model = RedisModel::connect(Config::load("redis_model.toml")?)?;
//! let post = model.define_type("Post", None)?;
//! model.register(post, DataType::SortedSet)?;
//! model.set_key_label(post, |id: &u64| Some(*id))?;
//!
//! let likes = model.sorted_set(post, &42u64)?;
//! likes.put(1.0, "alice")?;
//! ```

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use tracing::info;

use redis_model_core::{Config, DataType, Error, Result, TypeId};
use redis_model_storage::{MemoryStore, RedisStore, Store};

use crate::label::compute_label;
use crate::schema::{KeyLabelFn, Schema, SchemaRegistry};
use crate::types::{
    Accessor, Counter, FloatValue, Hash, IntegerValue, List, Set, SortedSet, StringValue,
    Timestamp,
};

/// Configuration, store and schema registry in one context
pub struct RedisModel {
    config: Config,
    store: Arc<dyn Store>,
    registry: SchemaRegistry,
}

impl RedisModel {
    /// Context over an existing store
    pub fn new(config: Config, store: Arc<dyn Store>) -> Self {
        Self {
            config,
            store,
            registry: SchemaRegistry::new(),
        }
    }

    /// Context over the Redis server at `config.redis_url()`
    ///
    /// The connection itself is opened on the first command.
    pub fn connect(config: Config) -> Result<Self> {
        let store = RedisStore::from_config(&config)?;
        info!(target: "redis_model::model", url = %config.redis_url(), "Redis model configured");
        Ok(Self::new(config, Arc::new(store)))
    }

    /// Context over a fresh in-process store
    pub fn in_memory(config: Config) -> Self {
        Self::new(config, Arc::new(MemoryStore::new()))
    }

    /// Configuration in effect
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Shared store handle
    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    /// Types and schemas
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    // ========== Types and schemas ==========

    /// Define an entity type, optionally deriving from `parent`
    pub fn define_type(&self, name: &str, parent: Option<TypeId>) -> Result<TypeId> {
        self.registry.define_type(name, parent)
    }

    /// Register the data type of `ty`
    ///
    /// # Errors
    ///
    /// Returns `Error::DuplicateDefinition` if `ty` or an ancestor is
    /// already registered.
    pub fn register(&self, ty: TypeId, data_type: DataType) -> Result<Arc<Schema>> {
        self.registry.register(ty, data_type)
    }

    /// Register by tag; unknown tags fail with `Error::UnknownType`
    pub fn register_tag(&self, ty: TypeId, tag: &str) -> Result<Arc<Schema>> {
        self.registry.register_tag(ty, tag)
    }

    /// Attach the custom label suffix of `ty`'s schema
    ///
    /// The function receives the instance passed to `key_label` and the
    /// accessor constructors. Returning `None` leaves the suffix off.
    pub fn set_key_label<T, D, F>(&self, ty: TypeId, f: F) -> Result<()>
    where
        T: 'static,
        D: fmt::Display,
        F: Fn(&T) -> Option<D> + Send + Sync + 'static,
    {
        self.schema_for(ty)?.set_key_label(KeyLabelFn::new(f))
    }

    /// Schema of `ty` or its nearest registered ancestor
    pub fn resolve(&self, ty: TypeId) -> Option<Arc<Schema>> {
        self.registry.resolve(ty)
    }

    /// Every registered schema
    pub fn schemas(&self) -> Vec<(TypeId, Arc<Schema>)> {
        self.registry.all()
    }

    fn schema_for(&self, ty: TypeId) -> Result<Arc<Schema>> {
        match self.registry.resolve(ty) {
            Some(schema) => Ok(schema),
            None => Err(Error::NotRegistered(self.registry.type_name(ty)?)),
        }
    }

    // ========== Key labels ==========

    /// Store key of `instance` as a `ty`
    pub fn key_label(&self, ty: TypeId, instance: &dyn Any) -> Result<String> {
        let schema = self.schema_for(ty)?;
        compute_label(&self.config, &schema, instance)
    }

    // ========== Accessors ==========

    /// Accessor of whichever family `ty` is registered with
    pub fn accessor(&self, ty: TypeId, instance: &dyn Any) -> Result<Accessor> {
        let schema = self.schema_for(ty)?;
        let key_label = compute_label(&self.config, &schema, instance)?;
        Ok(Accessor::new(
            schema.data_type(),
            Arc::clone(&self.store),
            key_label,
        ))
    }

    fn mismatch(&self, ty: TypeId, expected: DataType, actual: DataType) -> Error {
        match self.registry.type_name(ty) {
            Ok(type_name) => Error::DataTypeMismatch {
                type_name,
                expected,
                actual,
            },
            Err(e) => e,
        }
    }
}

macro_rules! typed_accessor {
    ($(#[$doc:meta])* $name:ident, $variant:ident, $ty:ty, $data_type:expr) => {
        $(#[$doc])*
        pub fn $name(&self, ty: TypeId, instance: &dyn Any) -> Result<$ty> {
            match self.accessor(ty, instance)? {
                Accessor::$variant(accessor) => Ok(accessor),
                other => Err(self.mismatch(ty, $data_type, other.data_type())),
            }
        }
    };
}

impl RedisModel {
    typed_accessor!(
        /// String accessor for `instance` as a `ty`
        string, String, StringValue, DataType::String
    );
    typed_accessor!(
        /// Counter accessor for `instance` as a `ty`
        counter, Counter, Counter, DataType::Counter
    );
    typed_accessor!(
        /// Integer accessor for `instance` as a `ty`
        integer, Integer, IntegerValue, DataType::Integer
    );
    typed_accessor!(
        /// Float accessor for `instance` as a `ty`
        float, Float, FloatValue, DataType::Float
    );
    typed_accessor!(
        /// Timestamp accessor for `instance` as a `ty`
        timestamp, Timestamp, Timestamp, DataType::Timestamp
    );
    typed_accessor!(
        /// List accessor for `instance` as a `ty`
        list, List, List, DataType::List
    );
    typed_accessor!(
        /// Set accessor for `instance` as a `ty`
        set, Set, Set, DataType::Set
    );
    typed_accessor!(
        /// Hash accessor for `instance` as a `ty`
        hash, Hash, Hash, DataType::Hash
    );
    typed_accessor!(
        /// Sorted-set accessor for `instance` as a `ty`
        sorted_set, SortedSet, SortedSet, DataType::SortedSet
    );
}

impl fmt::Debug for RedisModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisModel")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .finish()
    }
}
