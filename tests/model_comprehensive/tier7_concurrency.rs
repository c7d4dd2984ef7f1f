//! Tier 7: Concurrent use of one context
//!
//! Increments and set/ordered-set writes are single store commands, so
//! threads sharing a model never lose updates. Concurrent scoped
//! intersections release their own derived keys.

use crate::test_utils::{model, one_two_three, registered};
use redis_model::{DataType, IntersectOptions, KeyAccessor, Store};
use std::sync::Arc;
use std::thread;

const THREADS: usize = 8;
const PER_THREAD: i64 = 250;

#[test]
fn concurrent_counter_increments() {
    let model = Arc::new(model());
    let ty = registered(&model, "Hits", DataType::Counter);

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let model = Arc::clone(&model);
            thread::spawn(move || {
                let hits = model.counter(ty, &()).unwrap();
                for _ in 0..PER_THREAD {
                    hits.incr().unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let hits = model.counter(ty, &()).unwrap();
    assert_eq!(hits.to_int().unwrap(), THREADS as i64 * PER_THREAD);
}

#[test]
fn concurrent_sorted_set_writers() {
    let model = Arc::new(model());
    let ty = registered(&model, "Board", DataType::SortedSet);

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let model = Arc::clone(&model);
            thread::spawn(move || {
                let board = model.sorted_set(ty, &()).unwrap();
                for i in 0..50 {
                    board.put((t * 100 + i) as f64, &format!("{}-{}", t, i)).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let board = model.sorted_set(ty, &()).unwrap();
    assert_eq!(board.count().unwrap(), (THREADS * 50) as u64);
    assert_eq!(board.get_range_by_rank(0, 0).unwrap(), vec![format!("{}-49", THREADS - 1)]);
}

#[test]
fn concurrent_scoped_intersections() {
    let model = Arc::new(model());
    let scores = one_two_three(&model);
    let numbers = model
        .set(registered(&model, "Numbers", DataType::Set), &())
        .unwrap();
    numbers.add("two").unwrap();
    numbers.add("three").unwrap();

    let scores = Arc::new(scores);
    let numbers = Arc::new(numbers);
    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let scores = Arc::clone(&scores);
            let numbers = Arc::clone(&numbers);
            thread::spawn(move || {
                scores
                    .intersect_with(
                        numbers.as_ref(),
                        IntersectOptions::with_seed(t as u32),
                        |derived| derived.to_vec(),
                    )
                    .unwrap()
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), vec!["three", "two"]);
    }

    let leftovers = model.store().keys("app:test:scores:*").unwrap();
    assert!(leftovers.is_empty(), "derived keys left behind: {:?}", leftovers);
    assert!(scores.exists().unwrap());
}
