//! Storage layer for redis-model
//!
//! This crate implements the store seam the accessors are written against:
//! - Store: one method per store command, `Send + Sync`
//! - MemoryStore: in-process backend with Redis semantics (tests, single process)
//! - RedisStore: lazily connected, shared connection to a Redis server
//!
//! Transport failures surface as `Error::Transport` and are never retried here.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod memory;
pub mod redis_store;
pub mod traits;

pub use memory::MemoryStore;
pub use redis_store::RedisStore;
pub use traits::Store;
