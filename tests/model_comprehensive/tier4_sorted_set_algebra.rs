//! Tier 4: Ordered-set algebra
//!
//! Descending order by default, exclusive score ranges unless asked,
//! intersections into ephemeral keys released on every exit path.

use crate::test_utils::{model, one_two_three, registered};
use redis_model::{
    DataType, Error, IntersectOptions, KeyAccessor, RangeOptions, Result, ScoreBound, Store,
};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Duration;

#[test]
fn rank_reads() {
    let model = model();
    let set = one_two_three(&model);

    assert_eq!(set.get_range_by_rank(0, 0).unwrap(), vec!["three"]);
    assert_eq!(set.get_range_by_reverse_rank(0, 0).unwrap(), vec!["one"]);
    assert_eq!(set.get_rank("one").unwrap(), Some(2));
    assert_eq!(set.count().unwrap(), 3);
    assert!(set.contains("two").unwrap());
    assert_eq!(set.score("three").unwrap(), Some(3.0));
}

#[test]
fn score_ranges() {
    let model = model();
    let set = one_two_three(&model);

    assert_eq!(set.get_range(1, 3, RangeOptions::default()).unwrap(), vec!["two"]);
    assert_eq!(
        set.get_range(1, 3, RangeOptions::inclusive()).unwrap(),
        vec!["three", "two", "one"]
    );
    assert_eq!(set.to_vec().unwrap(), vec!["three", "two", "one"]);
    assert_eq!(set.count_in_range(1, 3).unwrap(), 3);
    assert_eq!(
        set.count_in_range(ScoreBound::Exclusive(1.0), ScoreBound::Exclusive(3.0))
            .unwrap(),
        1
    );
}

#[test]
fn remove_range_defaults_to_everything() {
    let model = model();
    let set = one_two_three(&model);
    assert_eq!(set.remove_full_range().unwrap(), 3);
    assert!(set.to_vec().unwrap().is_empty());
    assert!(!set.exists().unwrap());
}

#[test]
fn duplicate_copies_or_reports_missing() {
    let model = model();
    let set = one_two_three(&model);
    assert!(set.duplicate("backup").unwrap());
    assert_eq!(model.store().zcard("backup").unwrap(), 3);

    set.delete().unwrap();
    assert!(!set.duplicate("backup2").unwrap());
    assert!(!model.store().exists("backup2").unwrap());
}

#[test]
fn intersection_with_plain_set() {
    let model = model();
    let scores = one_two_three(&model);
    let numbers = model
        .set(registered(&model, "Numbers", DataType::Set), &())
        .unwrap();
    for member in ["three", "four", "five"] {
        numbers.add(member).unwrap();
    }

    let derived = scores.intersect(&numbers, IntersectOptions::with_seed(11));
    assert!(derived
        .key_label()
        .starts_with("app:test:scores:app:test:numbers:"));
    assert!(derived.key_label().ends_with(":11"));
    assert!(!derived.exists().unwrap());

    derived.generate(None).unwrap();
    assert_eq!(derived.to_vec().unwrap(), vec!["three"]);
    derived.clear().unwrap();
    assert!(!derived.exists().unwrap());
}

#[test]
fn intersection_generate_with_expiry() {
    let model = model();
    let scores = one_two_three(&model);
    let other = model
        .sorted_set(registered(&model, "Other", DataType::SortedSet), &())
        .unwrap();
    other.put(10.0, "two").unwrap();

    let derived = scores.intersect(&other, IntersectOptions::default());
    derived.generate(Some(Duration::from_millis(30))).unwrap();
    assert_eq!(derived.get_range_by_rank_with_scores(0, -1).unwrap(), vec![("two".to_string(), 12.0)]);

    std::thread::sleep(Duration::from_millis(80));
    assert!(!derived.exists().unwrap());
}

#[test]
fn scoped_intersection_released_after_block() {
    let model = model();
    let scores = one_two_three(&model);
    let numbers = model
        .set(registered(&model, "Numbers", DataType::Set), &())
        .unwrap();
    numbers.add("three").unwrap();

    let mut seen_key = String::new();
    let result = scores
        .intersect_with(&numbers, IntersectOptions::default(), |derived| {
            seen_key = derived.key_label().to_string();
            derived.to_vec()
        })
        .unwrap();
    assert_eq!(result, vec!["three"]);
    assert!(!model.store().exists(&seen_key).unwrap());
}

#[test]
fn scoped_intersection_released_after_error() {
    let model = model();
    let scores = one_two_three(&model);
    let numbers = model
        .set(registered(&model, "Numbers", DataType::Set), &())
        .unwrap();
    numbers.add("three").unwrap();

    let mut seen_key = String::new();
    let result: Result<()> = scores.intersect_with(&numbers, IntersectOptions::default(), |derived| {
        seen_key = derived.key_label().to_string();
        Err(Error::InvalidValue("caller failed".to_string()))
    });
    assert!(matches!(result, Err(Error::InvalidValue(_))));
    assert!(!model.store().exists(&seen_key).unwrap());
}

#[test]
fn scoped_intersection_released_after_panic() {
    let model = model();
    let scores = one_two_three(&model);
    let numbers = model
        .set(registered(&model, "Numbers", DataType::Set), &())
        .unwrap();
    numbers.add("three").unwrap();

    let seen_key = std::sync::Mutex::new(String::new());
    let outcome = catch_unwind(AssertUnwindSafe(|| {
        let _: Result<()> = scores.intersect_with(&numbers, IntersectOptions::default(), |derived| {
            *seen_key.lock().unwrap() = derived.key_label().to_string();
            panic!("caller panicked");
        });
    }));
    assert!(outcome.is_err());

    let key = seen_key.lock().unwrap_or_else(|e| e.into_inner()).clone();
    assert!(!key.is_empty());
    assert!(!model.store().exists(&key).unwrap());
}

#[test]
fn sample_draws_from_members() {
    let model = model();
    let set = one_two_three(&model);
    let picks = set.sample(6).unwrap();
    assert!(picks.len() <= 6);
    assert!(!picks.is_empty());
    for pick in picks {
        assert!(["one", "two", "three"].contains(&pick.as_str()));
    }
}
