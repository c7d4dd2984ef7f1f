//! Tier 5: Pagination
//!
//! Ten members scored 1..=10: rank pages read highest first, score bounds
//! are exclusive, and a cursor computes its page once.

use crate::test_utils::{members, model, ten_scored};
use redis_model::{IntersectOptions, KeyAccessor, SortedSetPaginator, Store};

#[test]
fn rank_pages() {
    let model = model();
    let set = ten_scored(&model);

    assert_eq!(set.paginate().per(1).page(1).result().unwrap(), members(&[10]).as_slice());
    assert_eq!(set.paginate().per(2).page(1).result().unwrap(), members(&[10, 9]).as_slice());
    assert_eq!(set.paginate().per(4).page(3).result().unwrap(), members(&[2, 1]).as_slice());
}

#[test]
fn score_bounded_pages() {
    let model = model();
    let set = ten_scored(&model);

    assert_eq!(set.paginate().since_id(8.0).result().unwrap(), members(&[10, 9]).as_slice());
    assert_eq!(set.paginate().max_id(3.0).result().unwrap(), members(&[2, 1]).as_slice());
    assert_eq!(
        set.paginate().max_id(9.0).per(3).page(2).result().unwrap(),
        members(&[5, 4, 3]).as_slice()
    );
}

#[test]
fn walking_pages_by_score_never_repeats_boundary() {
    let model = model();
    let set = ten_scored(&model);

    let mut seen = Vec::new();
    let mut max = f64::INFINITY;
    loop {
        let page = SortedSetPaginator::new(&set).max_id(max).per(3);
        let items = page.result().unwrap().to_vec();
        if items.is_empty() {
            break;
        }
        max = set.score(items.last().unwrap()).unwrap().unwrap();
        seen.extend(items);
    }
    assert_eq!(seen, members(&[10, 9, 8, 7, 6, 5, 4, 3, 2, 1]));
}

#[test]
fn cursor_is_memoized_and_reiterable() {
    let model = model();
    let set = ten_scored(&model);
    let page = set.paginate().per(3);

    let first: Vec<String> = page.iter().unwrap().cloned().collect();
    model.store().zadd(set.key_label(), 99.0, "late").unwrap();
    let second: Vec<String> = page.iter().unwrap().cloned().collect();

    assert_eq!(first, members(&[10, 9, 8]));
    assert_eq!(first, second);
    assert_eq!(set.paginate().per(1).result().unwrap(), ["late".to_string()].as_slice());
}

#[test]
fn paginate_intersection() {
    let model = model();
    let set = ten_scored(&model);
    let evens = model.store();
    for score in [2, 4, 6, 8, 10] {
        evens.zadd("evens", 0.0, &crate::test_utils::member(score)).unwrap();
    }
    let evens_set = redis_model::SortedSet::new(std::sync::Arc::clone(evens), "evens");

    let top = set
        .intersect_with(&evens_set, IntersectOptions::default(), |derived| {
            Ok(derived.paginate().per(2).result()?.to_vec())
        })
        .unwrap();
    assert_eq!(top, members(&[10, 8]));
}
