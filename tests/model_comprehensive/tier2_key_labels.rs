//! Tier 2: Key labels
//!
//! Labels are `namespace:environment:underscored_type[:suffix]`, deterministic
//! for a given instance, and differ between instances only in the suffix.
//! An instance the label function was not written for is an error.

use crate::test_utils::{model, registered};
use proptest::prelude::*;
use redis_model::{underscore, Config, DataType, Error, KeyAccessor, RedisModel, Store};

#[test]
fn label_layout() {
    let model = model();
    let ty = registered(&model, "Admin::LoginAttempt", DataType::Counter);
    assert_eq!(model.key_label(ty, &()).unwrap(), "app:test:admin/login_attempt");

    model.set_key_label(ty, |id: &u64| Some(*id)).unwrap();
    assert_eq!(model.key_label(ty, &15u64).unwrap(), "app:test:admin/login_attempt:15");
}

#[test]
fn missing_config_parts_are_skipped() {
    let model = RedisModel::in_memory(Config::default().with_environment(""));
    let ty = registered(&model, "Visits", DataType::Counter);
    assert_eq!(model.key_label(ty, &()).unwrap(), "visits");

    let model = RedisModel::in_memory(Config::default().with_namespace("shop").with_environment(""));
    let ty = registered(&model, "Visits", DataType::Counter);
    assert_eq!(model.key_label(ty, &()).unwrap(), "shop:visits");
}

#[test]
fn suffix_rendered_through_display() {
    let model = model();
    let ty = registered(&model, "Ratio", DataType::Float);
    model.set_key_label(ty, |x: &f64| Some(*x)).unwrap();
    assert_eq!(model.key_label(ty, &1.5f64).unwrap(), "app:test:ratio:1.5");
}

#[test]
fn none_suffix_yields_base_label() {
    let model = model();
    let ty = registered(&model, "Optional", DataType::String);
    model.set_key_label(ty, |id: &Option<u32>| *id).unwrap();
    assert_eq!(model.key_label(ty, &None::<u32>).unwrap(), "app:test:optional");
}

#[test]
fn accessor_uses_computed_label() {
    let model = model();
    let ty = registered(&model, "Greeting", DataType::String);
    model.set_key_label(ty, |lang: &String| Some(lang.clone())).unwrap();

    let english = "en".to_string();
    let greeting = model.string(ty, &english).unwrap();
    greeting.set("hello").unwrap();
    assert_eq!(greeting.key_label(), "app:test:greeting:en");
    assert_eq!(
        model.store().get("app:test:greeting:en").unwrap().as_deref(),
        Some("hello")
    );
}

#[test]
fn mistyped_instance_rejected() {
    let model = model();
    let ty = registered(&model, "Post", DataType::Counter);
    model.set_key_label(ty, |id: &u64| Some(*id)).unwrap();

    // Two different u32 ids must not collapse onto the base label.
    assert!(matches!(model.counter(ty, &7u32), Err(Error::InvalidValue(_))));
    assert!(matches!(model.counter(ty, &9u32), Err(Error::InvalidValue(_))));
    assert!(matches!(model.key_label(ty, &7u32), Err(Error::InvalidValue(_))));
    assert!(model.store().keys("*").unwrap().is_empty());

    model.counter(ty, &7u64).unwrap().incr().unwrap();
    assert_eq!(model.store().keys("*").unwrap(), vec!["app:test:post:7"]);
}

#[test]
fn underscore_rules() {
    assert_eq!(underscore("Admin::UserProfile"), "admin/user_profile");
    assert_eq!(underscore("HTTPServer"), "http_server");
    assert_eq!(underscore("SimpleXMLParser"), "simple_xml_parser");
}

proptest! {
    #[test]
    fn labels_are_deterministic(id in any::<u64>()) {
        let model = model();
        let ty = registered(&model, "Thing", DataType::Counter);
        model.set_key_label(ty, |id: &u64| Some(*id)).unwrap();

        let first = model.key_label(ty, &id).unwrap();
        let second = model.key_label(ty, &id).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first, format!("app:test:thing:{}", id));
    }

    #[test]
    fn instances_differ_only_in_suffix(a in any::<u32>(), b in any::<u32>()) {
        let model = model();
        let ty = registered(&model, "Thing", DataType::Counter);
        model.set_key_label(ty, |id: &u32| Some(*id)).unwrap();

        let left = model.key_label(ty, &a).unwrap();
        let right = model.key_label(ty, &b).unwrap();
        prop_assert_eq!(left.rsplit_once(':').unwrap().0, right.rsplit_once(':').unwrap().0);
        prop_assert_eq!(a == b, left == right);
    }
}
