//! Schema registry
//!
//! ## Design
//!
//! A `Schema` binds one entity type to a store data type and a key-label
//! policy. Schemas live in a `SchemaRegistry` owned by the `RedisModel`
//! context, next to the type arena that defines the types they belong to.
//!
//! ## Resolution
//!
//! `resolve(type)` walks the type's ancestor chain, most-derived first, and
//! returns the first registered schema. Subtypes therefore share their
//! ancestor's store representation without registering again. Schemas are
//! handed out as `Arc<Schema>`, so resolving the same type twice yields the
//! same object and its memoized base label stays valid.
//!
//! ## Registration
//!
//! At most one schema exists per ancestor chain. `register` resolves first
//! and refuses with `DuplicateDefinition` when anything in the chain is
//! already registered, so the first registration in a chain wins.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use tracing::{debug, warn};

use redis_model_core::{DataType, Error, Result, TypeId};

use crate::arena::{AttributeScope, TypeArena, TypeDescriptor};

/// Type-erased custom label function
///
/// The inner call returns `None` when the instance is not of the type the
/// function was written for, and `Some(suffix)` otherwise.
pub struct KeyLabelFn {
    instance_type: &'static str,
    call: Box<dyn Fn(&dyn Any) -> Option<Option<String>> + Send + Sync>,
}

impl KeyLabelFn {
    /// Wrap a typed suffix function
    ///
    /// The suffix is rendered through `Display`, so identifiers of any
    /// printable type can be returned directly.
    pub fn new<T, D, F>(f: F) -> Self
    where
        T: 'static,
        D: fmt::Display,
        F: Fn(&T) -> Option<D> + Send + Sync + 'static,
    {
        Self {
            instance_type: std::any::type_name::<T>(),
            call: Box::new(move |instance: &dyn Any| {
                instance
                    .downcast_ref::<T>()
                    .map(|typed| f(typed).map(|suffix| suffix.to_string()))
            }),
        }
    }

    /// Compute the suffix for `instance`
    ///
    /// Outer `None` means `instance` has the wrong type.
    pub fn call(&self, instance: &dyn Any) -> Option<Option<String>> {
        (self.call)(instance)
    }

    /// Name of the instance type the function expects
    pub fn instance_type(&self) -> &'static str {
        self.instance_type
    }
}

impl fmt::Debug for KeyLabelFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyLabelFn")
            .field("instance_type", &self.instance_type)
            .finish()
    }
}

/// Registered store representation of one entity type
#[derive(Debug)]
pub struct Schema {
    owner: TypeId,
    type_name: String,
    data_type: DataType,
    pub(crate) base_label: OnceCell<String>,
    label_fn: OnceCell<KeyLabelFn>,
}

impl Schema {
    fn new(owner: TypeId, type_name: String, data_type: DataType) -> Self {
        Self {
            owner,
            type_name,
            data_type,
            base_label: OnceCell::new(),
            label_fn: OnceCell::new(),
        }
    }

    /// Type the schema was registered on
    pub fn owner(&self) -> TypeId {
        self.owner
    }

    /// Name of the owning type
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Declared data type
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Custom label function, if attached
    pub fn label_fn(&self) -> Option<&KeyLabelFn> {
        self.label_fn.get()
    }

    /// Attach the custom label function
    ///
    /// The function can be attached once; a second attempt fails with
    /// `DuplicateDefinition` and leaves the first in place.
    pub fn set_key_label(&self, label_fn: KeyLabelFn) -> Result<()> {
        self.label_fn.set(label_fn).map_err(|_| {
            warn!(target: "redis_model::schema", type_name = %self.type_name, "Key label already attached");
            Error::DuplicateDefinition {
                type_name: self.type_name.clone(),
                defined_on: self.type_name.clone(),
            }
        })
    }
}

struct RegistryInner {
    arena: TypeArena,
    schemas: HashMap<TypeId, Arc<Schema>>,
}

/// Types and their schemas
pub struct SchemaRegistry {
    inner: RwLock<RegistryInner>,
}

impl SchemaRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(RegistryInner {
                arena: TypeArena::new(),
                schemas: HashMap::new(),
            }),
        }
    }

    // ========== Types ==========

    /// Define an entity type
    pub fn define_type(&self, name: &str, parent: Option<TypeId>) -> Result<TypeId> {
        let id = self.inner.write().arena.define(name, parent)?;
        debug!(target: "redis_model::schema", type_name = %name, id = %id, "Type defined");
        Ok(id)
    }

    /// Define an attribute type `<Owner>::<Name>`
    pub fn define_attribute_type(
        &self,
        owner: TypeId,
        attribute: &str,
        scope: AttributeScope,
    ) -> Result<TypeId> {
        self.inner
            .write()
            .arena
            .define_attribute(owner, attribute, scope)
    }

    /// Copy of a type's descriptor
    pub fn descriptor(&self, id: TypeId) -> Result<TypeDescriptor> {
        self.inner.read().arena.get(id).cloned()
    }

    /// Name of a type
    pub fn type_name(&self, id: TypeId) -> Result<String> {
        Ok(self.inner.read().arena.get(id)?.name().to_string())
    }

    /// Look up a type by name
    pub fn find_type(&self, name: &str) -> Option<TypeId> {
        self.inner.read().arena.find(name)
    }

    /// Whether `ancestor` is `id` or one of its ancestors
    pub fn is_ancestor_or_self(&self, ancestor: TypeId, id: TypeId) -> bool {
        self.inner.read().arena.is_ancestor_or_self(ancestor, id)
    }

    // ========== Schemas ==========

    /// Register `data_type` for `owner`
    ///
    /// # Errors
    ///
    /// - `UnknownTypeId` if `owner` was not defined here
    /// - `DuplicateDefinition` if `owner` or an ancestor is registered
    pub fn register(&self, owner: TypeId, data_type: DataType) -> Result<Arc<Schema>> {
        let mut inner = self.inner.write();
        let type_name = inner.arena.get(owner)?.name().to_string();

        if let Some(existing) = Self::resolve_in(&inner, owner) {
            warn!(
                target: "redis_model::schema",
                type_name = %type_name,
                defined_on = %existing.type_name,
                "Rejected duplicate schema definition"
            );
            return Err(Error::DuplicateDefinition {
                type_name,
                defined_on: existing.type_name.clone(),
            });
        }

        let schema = Arc::new(Schema::new(owner, type_name, data_type));
        inner.schemas.insert(owner, Arc::clone(&schema));
        debug!(
            target: "redis_model::schema",
            type_name = %schema.type_name,
            data_type = %data_type,
            "Schema registered"
        );
        Ok(schema)
    }

    /// Register by data-type tag, e.g. `"sorted_set"` or `"value"`
    ///
    /// The ancestor chain is checked before the tag is parsed, so a duplicate
    /// registration is reported as such even with a bad tag.
    pub fn register_tag(&self, owner: TypeId, tag: &str) -> Result<Arc<Schema>> {
        if let Some(existing) = self.resolve(owner) {
            return Err(Error::DuplicateDefinition {
                type_name: self.type_name(owner)?,
                defined_on: existing.type_name.clone(),
            });
        }
        self.register(owner, tag.parse()?)
    }

    /// Schema of `id` or its nearest registered ancestor
    pub fn resolve(&self, id: TypeId) -> Option<Arc<Schema>> {
        Self::resolve_in(&self.inner.read(), id)
    }

    fn resolve_in(inner: &RegistryInner, id: TypeId) -> Option<Arc<Schema>> {
        inner
            .arena
            .ancestors(id)
            .into_iter()
            .find_map(|ancestor| inner.schemas.get(&ancestor).cloned())
    }

    /// Every registered schema, in no particular order
    pub fn all(&self) -> Vec<(TypeId, Arc<Schema>)> {
        self.inner
            .read()
            .schemas
            .iter()
            .map(|(id, schema)| (*id, Arc::clone(schema)))
            .collect()
    }

    /// Number of registered schemas
    pub fn len(&self) -> usize {
        self.inner.read().schemas.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.inner.read().schemas.is_empty()
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("SchemaRegistry")
            .field("types", &inner.arena.len())
            .field("schemas", &inner.schemas.len())
            .finish()
    }
}
