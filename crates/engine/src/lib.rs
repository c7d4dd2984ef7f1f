//! Typed accessor engine for redis-model
//!
//! This crate maps entity types onto store-native data structures:
//! - TypeArena / SchemaRegistry: types, parents and their registered data type
//! - Key labels: `namespace:environment:type_name:suffix`
//! - Accessors: one family per data type (counter, list, sorted set, ...)
//! - Ordered-set algebra: rank/score ranges, intersections, pagination
//! - RedisModel: the context that owns config, store and registry
//!
//! The engine is the only component that knows about:
//! - Ancestor resolution of schemas
//! - How a key label is derived for an instance
//! - Lifetime of derived (intersected) sets

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod arena;
pub mod attribute;
pub mod intersected;
pub mod label;
pub mod model;
pub mod paginator;
pub mod schema;
pub mod types;

pub use arena::{AttributeOf, AttributeScope, TypeArena, TypeDescriptor};
pub use intersected::Intersected;
pub use label::{compute_label, underscore};
pub use model::RedisModel;
pub use paginator::{Pager, SortedSetPaginator};
pub use schema::{KeyLabelFn, Schema, SchemaRegistry};
pub use types::{
    Accessor, Counter, FloatValue, Hash, IntegerValue, IntersectOptions, KeyAccessor, List,
    RangeOptions, Set, SortedSet, StringValue, Timestamp,
};

pub use redis_model_core::{Config, DataType, Error, Result, ScoreBound, TypeId};
pub use redis_model_storage::{MemoryStore, RedisStore, Store};
