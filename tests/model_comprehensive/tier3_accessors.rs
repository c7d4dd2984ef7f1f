//! Tier 3: Scalar and collection accessors
//!
//! Absence policy per family: counters read 0, integers/floats/strings/
//! timestamps read None, collections read empty.

use crate::test_utils::{model, registered};
use chrono::{TimeZone, Utc};
use redis_model::{Accessor, DataType, Error, KeyAccessor, Store};

#[test]
fn counter_sequence() {
    let model = model();
    let ty = registered(&model, "Hits", DataType::Counter);
    let hits = model.counter(ty, &()).unwrap();

    assert_eq!(hits.to_int().unwrap(), 0);
    assert_eq!(hits.incr().unwrap(), 1);
    assert_eq!(hits.incr_by(3).unwrap(), 4);
    assert_eq!(hits.to_int().unwrap(), 4);
}

#[test]
fn counter_zero_versus_absent() {
    let model = model();
    let ty = registered(&model, "Hits", DataType::Counter);
    let hits = model.counter(ty, &()).unwrap();
    assert!(!hits.exists().unwrap());
    hits.set(0).unwrap();
    assert!(hits.exists().unwrap());
    assert_eq!(hits.to_int().unwrap(), 0);
}

#[test]
fn integer_absent_is_none() {
    let model = model();
    let ty = registered(&model, "Age", DataType::Integer);
    let age = model.integer(ty, &()).unwrap();
    assert_eq!(age.to_int().unwrap(), None);

    model.store().set(age.key_label(), "2").unwrap();
    let age = model.integer(ty, &()).unwrap();
    assert_eq!(age.to_int().unwrap(), Some(2));
}

#[test]
fn float_and_string() {
    let model = model();
    let ratio_ty = registered(&model, "Ratio", DataType::Float);
    let name_ty = registered(&model, "Name", DataType::String);

    let ratio = model.float(ratio_ty, &()).unwrap();
    assert_eq!(ratio.to_float().unwrap(), None);
    ratio.set(0.75).unwrap();
    assert_eq!(ratio.to_float().unwrap(), Some(0.75));

    let name = model.string(name_ty, &()).unwrap();
    assert_eq!(name.get().unwrap(), None);
    name.set("ferris").unwrap();
    assert_eq!(name.get().unwrap().as_deref(), Some("ferris"));
}

#[test]
fn timestamp_roundtrip_and_lenient_read() {
    let model = model();
    let ty = registered(&model, "SeenAt", DataType::Timestamp);
    let seen = model.timestamp(ty, &()).unwrap();
    assert_eq!(seen.to_time().unwrap(), None);

    let time = Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap();
    seen.set(time).unwrap();
    assert_eq!(seen.get().unwrap().as_deref(), Some("2023-12-31T23:59:59Z"));
    assert_eq!(seen.to_time().unwrap(), Some(time));

    model.store().set(seen.key_label(), "not a time").unwrap();
    let seen = model.timestamp(ty, &()).unwrap();
    assert_eq!(seen.to_time().unwrap(), None);
}

#[test]
fn list_set_hash() {
    let model = model();
    let list = model
        .list(registered(&model, "Feed", DataType::List), &())
        .unwrap();
    let set = model
        .set(registered(&model, "Tags", DataType::Set), &())
        .unwrap();
    let hash = model
        .hash(registered(&model, "Profile", DataType::Hash), &())
        .unwrap();

    assert!(list.to_vec().unwrap().is_empty());
    list.push("a").unwrap();
    list.push("b").unwrap();
    assert_eq!(list.to_vec().unwrap(), vec!["a", "b"]);
    assert_eq!(list.get(-1).unwrap().as_deref(), Some("b"));
    assert_eq!(list.count().unwrap(), 2);

    assert!(set.to_vec().unwrap().is_empty());
    set.add("x").unwrap();
    assert!(set.contains("x").unwrap());
    assert_eq!(set.pick_random(4).unwrap(), vec!["x"; 4]);

    assert!(hash.to_map().unwrap().is_empty());
    hash.set("name", "ferris").unwrap();
    assert_eq!(hash.incr_by("age", 7).unwrap(), 7);
    let map = hash.to_map().unwrap();
    assert_eq!(map.get("name").map(String::as_str), Some("ferris"));
    assert_eq!(map.get("age").map(String::as_str), Some("7"));
}

#[test]
fn generic_accessor_dispatch() {
    let model = model();
    let ty = registered(&model, "Dispatch", DataType::Set);
    match model.accessor(ty, &()).unwrap() {
        Accessor::Set(set) => {
            set.add("m").unwrap();
        }
        other => panic!("wrong family: {:?}", other.data_type()),
    }
    let accessor = model.accessor(ty, &()).unwrap();
    assert!(accessor.exists().unwrap());
    assert_eq!(accessor.clear().unwrap(), 1);
    assert!(!accessor.exists().unwrap());
}

#[test]
fn wrong_family_is_rejected() {
    let model = model();
    let ty = registered(&model, "Feed", DataType::List);
    assert!(matches!(
        model.sorted_set(ty, &()),
        Err(Error::DataTypeMismatch {
            expected: DataType::SortedSet,
            actual: DataType::List,
            ..
        })
    ));
}

#[test]
fn store_kind_conflict_surfaces_wrong_type() {
    let model = model();
    let ty = registered(&model, "Clash", DataType::Counter);
    let counter = model.counter(ty, &()).unwrap();
    model.store().rpush(counter.key_label(), "x").unwrap();
    assert!(matches!(counter.incr(), Err(Error::WrongType(_))));
}
