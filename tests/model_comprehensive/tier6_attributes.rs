//! Tier 6: Attribute binding
//!
//! Instance attributes key on a value from the owner instance, class
//! attributes have one key per owner type, and clearing an instance removes
//! the attributes its type and ancestors declare.

use crate::test_utils::model;
use redis_model::{Accessor, DataType, KeyAccessor};

struct Post {
    id: u64,
    author_id: u64,
}

#[test]
fn instance_attributes_per_owner() {
    let model = model();
    let post = model.define_type("Post", None).unwrap();
    let likes = model
        .define_attribute(post, "likes", DataType::SortedSet, |p: &Post| Some(p.id))
        .unwrap();
    let author_posts = model
        .define_attribute(post, "author_posts", DataType::Set, |p: &Post| Some(p.author_id))
        .unwrap();

    let first = Post { id: 1, author_id: 10 };
    let second = Post { id: 2, author_id: 10 };

    model.sorted_set(likes, &first).unwrap().put(1.0, "alice").unwrap();
    assert_eq!(model.sorted_set(likes, &second).unwrap().count().unwrap(), 0);

    // Keyed by foreign key: both posts share the author's set.
    model.set(author_posts, &first).unwrap().add("1").unwrap();
    model.set(author_posts, &second).unwrap().add("2").unwrap();
    assert_eq!(model.set(author_posts, &first).unwrap().count().unwrap(), 2);
    assert_eq!(
        model.key_label(author_posts, &first).unwrap(),
        "app:test:post/author_posts:10"
    );
}

#[test]
fn class_attribute_single_key() {
    let model = model();
    let post = model.define_type("Post", None).unwrap();
    let total = model
        .define_class_attribute(post, "total", DataType::Counter)
        .unwrap();

    match model.class_attribute_accessor(total).unwrap() {
        Accessor::Counter(counter) => {
            counter.incr().unwrap();
            assert_eq!(counter.key_label(), "app:test:post/total");
        }
        other => panic!("wrong family: {:?}", other.data_type()),
    }
    assert_eq!(model.counter(total, &()).unwrap().to_int().unwrap(), 1);
}

#[test]
fn attribute_lookup_by_name() {
    let model = model();
    let post = model.define_type("Post", None).unwrap();
    let views = model
        .define_attribute(post, "view_count", DataType::Counter, |p: &Post| Some(p.id))
        .unwrap();
    assert_eq!(model.attribute(post, "view_count").unwrap(), Some(views));
    assert_eq!(model.attribute(post, "missing").unwrap(), None);
}

#[test]
fn clear_on_destroy() {
    let model = model();
    let post = model.define_type("Post", None).unwrap();
    let pinned = model.define_type("PinnedPost", Some(post)).unwrap();

    let views = model
        .define_attribute(post, "views", DataType::Counter, |p: &Post| Some(p.id))
        .unwrap();
    let pin_order = model
        .define_attribute(pinned, "pin_order", DataType::Integer, |p: &Post| Some(p.id))
        .unwrap();

    let doomed = Post { id: 5, author_id: 1 };
    let survivor = Post { id: 6, author_id: 1 };
    model.counter(views, &doomed).unwrap().incr().unwrap();
    model.integer(pin_order, &doomed).unwrap().set(1).unwrap();
    model.counter(views, &survivor).unwrap().incr().unwrap();

    assert_eq!(model.clear_attributes(pinned, &doomed).unwrap(), 2);
    assert_eq!(model.counter(views, &doomed).unwrap().to_int().unwrap(), 0);
    assert_eq!(model.integer(pin_order, &doomed).unwrap().to_int().unwrap(), None);
    assert_eq!(model.counter(views, &survivor).unwrap().to_int().unwrap(), 1);
}
