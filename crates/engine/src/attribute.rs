//! Attribute binding
//!
//! An attribute is a value stored on behalf of another type: a user's sign-in
//! counter, a post's like set. Each attribute is its own entity type named
//! `<Owner>::<Attribute>`, registered with the attribute's data type.
//!
//! - Instance attributes suffix their key with a value taken from the owner
//!   instance (its id, or a foreign key), e.g. `app:prod:user/sign_in_count:7`.
//! - Class attributes have one value per owner type and no suffix.
//!
//! `clear_attributes` is the destroy hook: it deletes every instance
//! attribute declared by the instance's type or any of its ancestors.

use std::any::Any;
use std::fmt;

use tracing::debug;

use redis_model_core::{DataType, Result, TypeId};

use crate::arena::{camelize, AttributeOf, AttributeScope};
use crate::label::compute_label;
use crate::model::RedisModel;
use crate::schema::KeyLabelFn;
use crate::types::Accessor;

impl RedisModel {
    /// Declare an instance attribute of `owner`
    ///
    /// `key_fn` maps an owner instance to the key suffix, typically its id.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let sign_ins = model.define_attribute(user, "sign_in_count", DataType::Counter,
    ///     |u: &User| Some(u.id))?;
    /// model.attribute_accessor(sign_ins, &alice)?;
    /// ```
    pub fn define_attribute<T, D, F>(
        &self,
        owner: TypeId,
        name: &str,
        data_type: DataType,
        key_fn: F,
    ) -> Result<TypeId>
    where
        T: 'static,
        D: fmt::Display,
        F: Fn(&T) -> Option<D> + Send + Sync + 'static,
    {
        let ty = self
            .registry()
            .define_attribute_type(owner, name, AttributeScope::Instance)?;
        let schema = self.register(ty, data_type)?;
        schema.set_key_label(KeyLabelFn::new(key_fn))?;
        Ok(ty)
    }

    /// Declare a class attribute of `owner`: one value for the whole type
    pub fn define_class_attribute(
        &self,
        owner: TypeId,
        name: &str,
        data_type: DataType,
    ) -> Result<TypeId> {
        let ty = self
            .registry()
            .define_attribute_type(owner, name, AttributeScope::Class)?;
        self.register(ty, data_type)?;
        Ok(ty)
    }

    /// Attribute type `name` declared directly by `owner`
    pub fn attribute(&self, owner: TypeId, name: &str) -> Result<Option<TypeId>> {
        let owner_name = self.registry().type_name(owner)?;
        Ok(self
            .registry()
            .find_type(&format!("{}::{}", owner_name, camelize(name))))
    }

    /// Accessor of instance attribute `ty` for `owner_instance`
    pub fn attribute_accessor(&self, ty: TypeId, owner_instance: &dyn Any) -> Result<Accessor> {
        self.accessor(ty, owner_instance)
    }

    /// Accessor of class attribute `ty`
    pub fn class_attribute_accessor(&self, ty: TypeId) -> Result<Accessor> {
        self.accessor(ty, &())
    }

    /// Delete every instance attribute of `instance`
    ///
    /// Covers attributes declared by `owner` and by each of its ancestors.
    /// Returns the number of keys removed.
    ///
    /// Every label is computed before the first delete, so an instance some
    /// attribute's label function cannot take leaves all keys in place.
    pub fn clear_attributes(&self, owner: TypeId, instance: &dyn Any) -> Result<u64> {
        let mut key_labels = Vec::new();
        for (ty, schema) in self.schemas() {
            let declared_by = match self.registry().descriptor(ty)?.attribute_of() {
                Some(AttributeOf {
                    owner: declared_by,
                    scope: AttributeScope::Instance,
                }) => declared_by,
                _ => continue,
            };
            if !self.registry().is_ancestor_or_self(declared_by, owner) {
                continue;
            }
            key_labels.push(compute_label(self.config(), &schema, instance)?);
        }
        let mut deleted = 0;
        for key_label in &key_labels {
            deleted += self.store().del(key_label)?;
        }
        debug!(
            target: "redis_model::attribute",
            owner = %owner,
            deleted,
            "Attributes cleared"
        );
        Ok(deleted)
    }
}
