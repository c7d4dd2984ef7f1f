//! Tier 1: Schema resolution
//!
//! - A subtype resolves to its nearest registered ancestor's schema
//! - Resolution returns the same schema object every time
//! - A second registration anywhere in a chain is a DuplicateDefinition
//! - Type names are unique, attribute types included

use crate::test_utils::model;
use redis_model::{DataType, Error};
use std::sync::Arc;

#[test]
fn subtype_resolves_to_ancestor_schema() {
    let model = model();
    let animal = model.define_type("Animal", None).unwrap();
    let dog = model.define_type("Dog", Some(animal)).unwrap();
    let puppy = model.define_type("Puppy", Some(dog)).unwrap();
    model.register(animal, DataType::Hash).unwrap();

    let expected = model.resolve(animal).unwrap();
    for ty in [dog, puppy] {
        let resolved = model.resolve(ty).unwrap();
        assert!(Arc::ptr_eq(&resolved, &expected));
        assert_eq!(resolved.data_type(), DataType::Hash);
        assert_eq!(resolved.owner(), animal);
    }
}

#[test]
fn nearest_registration_wins() {
    let model = model();
    let root = model.define_type("Root", None).unwrap();
    let branch = model.define_type("Branch", Some(root)).unwrap();
    let leaf = model.define_type("Leaf", Some(branch)).unwrap();
    model.register(branch, DataType::List).unwrap();

    assert!(model.resolve(root).is_none());
    assert_eq!(model.resolve(leaf).unwrap().type_name(), "Branch");
}

#[test]
fn duplicate_definition_anywhere_in_chain() {
    let model = model();
    let root = model.define_type("Root", None).unwrap();
    let branch = model.define_type("Branch", Some(root)).unwrap();
    let leaf = model.define_type("Leaf", Some(branch)).unwrap();
    model.register(branch, DataType::Counter).unwrap();

    for ty in [branch, leaf] {
        assert!(matches!(
            model.register(ty, DataType::Counter),
            Err(Error::DuplicateDefinition { .. })
        ));
    }
    // Registering above the existing schema is a different chain position
    // and is allowed.
    assert!(model.register(root, DataType::Set).is_ok());
    assert_eq!(model.resolve(leaf).unwrap().type_name(), "Branch");
    assert_eq!(model.resolve(root).unwrap().type_name(), "Root");
}

#[test]
fn unknown_tag_rejected() {
    let model = model();
    let ty = model.define_type("Mystery", None).unwrap();
    assert!(matches!(
        model.register_tag(ty, "bitmap"),
        Err(Error::UnknownType(ref tag)) if tag == "bitmap"
    ));
    assert!(model.resolve(ty).is_none());
}

#[test]
fn every_tag_registers() {
    let model = model();
    for tag in [
        "value",
        "counter",
        "list",
        "sorted_set",
        "float",
        "set",
        "hash",
        "string",
        "timestamp",
        "integer",
    ] {
        let ty = model.define_type(&format!("Tagged{}", tag), None).unwrap();
        let schema = model.register_tag(ty, tag).unwrap();
        assert_eq!(schema.data_type().id(), if tag == "value" { "counter" } else { tag });
    }
    assert_eq!(model.schemas().len(), 10);
}

#[test]
fn duplicate_type_name_rejected() {
    let model = model();
    let post = model.define_type("Post", None).unwrap();
    assert!(matches!(
        model.define_type("Post", None),
        Err(Error::DuplicateDefinition { ref type_name, .. }) if type_name == "Post"
    ));

    model
        .define_attribute(post, "likes", DataType::Counter, |p: &u64| Some(*p))
        .unwrap();
    assert!(matches!(
        model.define_type("Post::Likes", None),
        Err(Error::DuplicateDefinition { .. })
    ));
}
