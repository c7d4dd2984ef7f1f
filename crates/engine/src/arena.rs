//! Type arena: entity types with explicit parent links
//!
//! Entity types are plain descriptors held in an arena and addressed by
//! `TypeId`. A type names at most one nominal parent, and the parent must
//! already exist when the child is defined, so every ancestor chain is finite
//! and acyclic. Capability mixins are not modelled: only nominal parents take
//! part in schema resolution.

use redis_model_core::{Error, Result, TypeId};

/// Whether an attribute type belongs to instances or to the owner type itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeScope {
    /// One value per owner instance, labelled with an instance suffix
    Instance,
    /// One value per owner type, no instance suffix
    Class,
}

/// Link from an attribute type back to the type that declared it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeOf {
    /// Declaring type
    pub owner: TypeId,
    /// Instance- or type-level attribute
    pub scope: AttributeScope,
}

/// One entity type
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    id: TypeId,
    name: String,
    parent: Option<TypeId>,
    attribute_of: Option<AttributeOf>,
}

impl TypeDescriptor {
    /// Arena handle
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Type name, possibly namespaced with `::`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Nominal parent type
    pub fn parent(&self) -> Option<TypeId> {
        self.parent
    }

    /// Declaring type when this type is an attribute
    pub fn attribute_of(&self) -> Option<AttributeOf> {
        self.attribute_of
    }
}

/// Arena of type descriptors
#[derive(Debug, Default)]
pub struct TypeArena {
    types: Vec<TypeDescriptor>,
}

impl TypeArena {
    /// Create an empty arena
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a type, optionally deriving from `parent`
    ///
    /// # Errors
    ///
    /// - `UnknownTypeId` if `parent` is not in this arena
    /// - `DuplicateDefinition` if a type of that name already exists
    pub fn define(&mut self, name: impl Into<String>, parent: Option<TypeId>) -> Result<TypeId> {
        let name = name.into();
        if let Some(parent) = parent {
            self.get(parent)?;
        }
        if self.find(&name).is_some() {
            return Err(Error::DuplicateDefinition {
                type_name: name.clone(),
                defined_on: name,
            });
        }
        Ok(self.push(name, parent, None))
    }

    /// Define an attribute type declared by `owner`
    ///
    /// The attribute is named `<Owner>::<Attribute>` with the attribute name
    /// camelized, and has no parent of its own.
    ///
    /// # Errors
    ///
    /// Returns `Error::DuplicateDefinition` if the owner already declares an
    /// attribute of that name.
    pub fn define_attribute(
        &mut self,
        owner: TypeId,
        attribute: &str,
        scope: AttributeScope,
    ) -> Result<TypeId> {
        let owner_name = self.get(owner)?.name.clone();
        let name = format!("{}::{}", owner_name, camelize(attribute));
        if self.find(&name).is_some() {
            return Err(Error::DuplicateDefinition {
                type_name: name,
                defined_on: owner_name,
            });
        }
        Ok(self.push(name, None, Some(AttributeOf { owner, scope })))
    }

    fn push(
        &mut self,
        name: String,
        parent: Option<TypeId>,
        attribute_of: Option<AttributeOf>,
    ) -> TypeId {
        let id = TypeId::from_index(self.types.len());
        self.types.push(TypeDescriptor {
            id,
            name,
            parent,
            attribute_of,
        });
        id
    }

    /// Look up a descriptor
    pub fn get(&self, id: TypeId) -> Result<&TypeDescriptor> {
        self.types
            .get(id.index())
            .ok_or(Error::UnknownTypeId(id.index()))
    }

    /// Find a type by name
    pub fn find(&self, name: &str) -> Option<TypeId> {
        self.types.iter().find(|t| t.name == name).map(|t| t.id)
    }

    /// `id` followed by its ancestors, most-derived first
    ///
    /// Unknown ids yield an empty chain.
    pub fn ancestors(&self, id: TypeId) -> Vec<TypeId> {
        let mut chain = Vec::new();
        let mut current = self.types.get(id.index());
        while let Some(ty) = current {
            chain.push(ty.id);
            current = ty.parent.and_then(|p| self.types.get(p.index()));
        }
        chain
    }

    /// Whether `ancestor` is `id` or one of its ancestors
    pub fn is_ancestor_or_self(&self, ancestor: TypeId, id: TypeId) -> bool {
        self.ancestors(id).contains(&ancestor)
    }

    /// Number of defined types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether no types are defined
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// `sign_in_count` → `SignInCount`
pub fn camelize(name: &str) -> String {
    name.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}
