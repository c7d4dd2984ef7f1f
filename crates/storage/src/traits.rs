//! Store abstraction
//!
//! This module defines the `Store` trait: the single seam through which every
//! accessor reaches the key-value store. One method corresponds to one store
//! command, so atomicity is whatever the store gives a single command.
//!
//! Implementations:
//! - [`MemoryStore`](crate::MemoryStore): in-process map with Redis semantics
//! - [`RedisStore`](crate::RedisStore): shared connection to a Redis server

use std::collections::HashMap;
use std::time::Duration;

use redis_model_core::{Result, ScoreBound};

/// Command surface of the key-value store
///
/// Thread safety: all methods must be safe to call concurrently from
/// multiple threads (requires Send + Sync).
///
/// Absent keys behave as empty values of the requested kind: reads return
/// `None`, zero or an empty collection. A key holding another kind of value
/// yields `Error::WrongType`.
pub trait Store: Send + Sync {
    // ========== Keys ==========

    /// Check whether `key` exists (EXISTS)
    fn exists(&self, key: &str) -> Result<bool>;

    /// Delete `key`, returning the number of keys removed (DEL)
    fn del(&self, key: &str) -> Result<u64>;

    /// Set a time-to-live on `key` (EXPIRE). Returns false if the key is absent.
    fn expire(&self, key: &str, ttl: Duration) -> Result<bool>;

    /// List keys matching a glob pattern (KEYS)
    fn keys(&self, pattern: &str) -> Result<Vec<String>>;

    // ========== Strings ==========

    /// Read a string value (GET)
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a string value (SET)
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Atomically add `by` to an integer value (INCRBY)
    fn incr_by(&self, key: &str, by: i64) -> Result<i64>;

    // ========== Lists ==========

    /// Append to the tail, returning the new length (RPUSH)
    fn rpush(&self, key: &str, value: &str) -> Result<u64>;

    /// Elements in the index window, negative indices from the tail (LRANGE)
    fn lrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<String>>;

    /// Length of the list (LLEN)
    fn llen(&self, key: &str) -> Result<u64>;

    /// Element at `index`, negative from the tail (LINDEX)
    fn lindex(&self, key: &str, index: i64) -> Result<Option<String>>;

    // ========== Sets ==========

    /// Add a member, returning whether it was new (SADD)
    fn sadd(&self, key: &str, member: &str) -> Result<bool>;

    /// Remove a member, returning whether it was present (SREM)
    fn srem(&self, key: &str, member: &str) -> Result<bool>;

    /// All members (SMEMBERS)
    fn smembers(&self, key: &str) -> Result<Vec<String>>;

    /// Cardinality (SCARD)
    fn scard(&self, key: &str) -> Result<u64>;

    /// Membership test (SISMEMBER)
    fn sismember(&self, key: &str, member: &str) -> Result<bool>;

    /// `count` independent random picks, pipelined (SRANDMEMBER x count)
    ///
    /// Picks may repeat. An empty or absent set yields no picks.
    fn srandmember_many(&self, key: &str, count: usize) -> Result<Vec<String>>;

    // ========== Hashes ==========

    /// Set a field, returning whether the field was new (HSET)
    fn hset(&self, key: &str, field: &str, value: &str) -> Result<bool>;

    /// Read a field (HGET)
    fn hget(&self, key: &str, field: &str) -> Result<Option<String>>;

    /// Atomically add `by` to an integer field (HINCRBY)
    fn hincr_by(&self, key: &str, field: &str, by: i64) -> Result<i64>;

    /// All fields and values (HGETALL)
    fn hgetall(&self, key: &str) -> Result<HashMap<String, String>>;

    /// All field names (HKEYS)
    fn hkeys(&self, key: &str) -> Result<Vec<String>>;

    // ========== Ordered sets ==========

    /// Add or rescore a member, returning whether it was new (ZADD)
    fn zadd(&self, key: &str, score: f64, member: &str) -> Result<bool>;

    /// Remove a member, returning whether it was present (ZREM)
    fn zrem(&self, key: &str, member: &str) -> Result<bool>;

    /// Cardinality (ZCARD)
    fn zcard(&self, key: &str) -> Result<u64>;

    /// Score of a member (ZSCORE)
    fn zscore(&self, key: &str, member: &str) -> Result<Option<f64>>;

    /// Ascending rank of a member (ZRANK)
    fn zrank(&self, key: &str, member: &str) -> Result<Option<u64>>;

    /// Descending rank of a member (ZREVRANK)
    fn zrevrank(&self, key: &str, member: &str) -> Result<Option<u64>>;

    /// Number of members with score within `[min, max]` as bounded (ZCOUNT)
    fn zcount(&self, key: &str, min: ScoreBound, max: ScoreBound) -> Result<u64>;

    /// Members with scores in ascending rank window (ZRANGE WITHSCORES)
    fn zrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<(String, f64)>>;

    /// Members with scores in descending rank window (ZREVRANGE WITHSCORES)
    fn zrevrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<(String, f64)>>;

    /// Members with scores between bounds, highest first (ZREVRANGEBYSCORE WITHSCORES)
    fn zrevrangebyscore(
        &self,
        key: &str,
        max: ScoreBound,
        min: ScoreBound,
    ) -> Result<Vec<(String, f64)>>;

    /// Remove members with scores between bounds (ZREMRANGEBYSCORE)
    fn zremrangebyscore(&self, key: &str, min: ScoreBound, max: ScoreBound) -> Result<u64>;

    /// Store the union of `keys` into `dest`, summing scores (ZUNIONSTORE)
    fn zunionstore(&self, dest: &str, keys: &[&str]) -> Result<u64>;

    /// Store the intersection of `keys` into `dest`, summing scores (ZINTERSTORE)
    ///
    /// Plain sets participate with a score of 1 per member.
    fn zinterstore(&self, dest: &str, keys: &[&str]) -> Result<u64>;
}
