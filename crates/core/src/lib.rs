//! Core types for redis-model
//!
//! This crate defines the foundational types used throughout the system:
//! - DataType: Discriminates between store data structures
//! - TypeId: Handle of an entity type in a type arena
//! - ScoreBound: Inclusive/exclusive/infinite ends of ordered-set ranges
//! - Config: Namespace, environment and store URL
//! - Error: Error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod score;
pub mod types;

pub use config::{Config, DEFAULT_REDIS_URL};
pub use error::{Error, Result};
pub use score::ScoreBound;
pub use types::{DataType, TypeId};
