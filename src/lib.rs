//! redis-model - Typed accessors over Redis data structures
//!
//! redis-model maps application entity types onto store-native structures
//! (counter, string, integer, float, timestamp, list, set, sorted set, hash)
//! through a declarative schema, and derives each instance's key from the
//! configured namespace, environment, type name and an instance suffix.
//!
//! # Quick Start
//!
//! ```ignore
//! use redis_model::{Config, DataType, RedisModel};
//!
//! let model = RedisModel::connect(Config::new("my_app", "production"))?;
//!
//! let user = model.define_type("User", None)?;
//! let sign_ins = model.define_attribute(user, "sign_in_count", DataType::Counter,
//!     |id: &u64| Some(*id))?;
//!
//! model.counter(sign_ins, &42u64)?.incr()?;   // INCRBY my_app:production:user/sign_in_count:42 1
//! ```
//!
//! # Architecture
//!
//! All operations go through a [`RedisModel`] context, which owns the
//! configuration, the [`Store`] and the schema registry. Tests and
//! single-process tools can use [`MemoryStore`] in place of a server.

// Re-export the public API from redis-model-engine
pub use redis_model_engine::*;
