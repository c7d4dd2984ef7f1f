//! RedisStore: `Store` backed by a Redis server
//!
//! One client is opened from the configured URL. The connection is created
//! lazily on the first command and then shared by every caller through a
//! mutex, so concurrent callers queue on it. A dropped connection is discarded
//! and re-established on the next command; the failing command's error is
//! still returned to the caller unchanged.

use std::collections::HashMap;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use redis_model_core::{Config, Result, ScoreBound};

use crate::traits::Store;

/// Shared, lazily connected Redis handle
///
/// # Example
///
/// ```ignore
/// let store = RedisStore::open("redis://localhost:6379")?;
/// store.set("greeting", "hello")?;
/// ```
pub struct RedisStore {
    client: redis::Client,
    connection: Mutex<Option<redis::Connection>>,
}

impl RedisStore {
    /// Create a store for `url` without connecting yet
    ///
    /// # Errors
    ///
    /// Returns `Error::Transport` if the URL cannot be parsed.
    pub fn open(url: &str) -> Result<Self> {
        let client = redis::Client::open(url)?;
        debug!(target: "redis_model::store", url = %url, "Redis client created");
        Ok(Self {
            client,
            connection: Mutex::new(None),
        })
    }

    /// Create a store for the configured URL
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::open(config.redis_url())
    }

    /// Run `f` against the shared connection, connecting first if needed
    fn with_connection<T>(
        &self,
        f: impl FnOnce(&mut redis::Connection) -> redis::RedisResult<T>,
    ) -> Result<T> {
        let mut guard = self.connection.lock();
        let mut conn = match guard.take() {
            Some(conn) => conn,
            None => {
                let conn = self.client.get_connection()?;
                info!(target: "redis_model::store", "Redis connection established");
                conn
            }
        };
        match f(&mut conn) {
            Ok(value) => {
                *guard = Some(conn);
                Ok(value)
            }
            Err(e) => {
                if e.is_connection_dropped() || e.is_io_error() {
                    warn!(target: "redis_model::store", error = %e, "Dropping broken Redis connection");
                } else {
                    *guard = Some(conn);
                }
                Err(e.into())
            }
        }
    }

    fn query<T: redis::FromRedisValue>(&self, cmd: &redis::Cmd) -> Result<T> {
        self.with_connection(|conn| cmd.query(conn))
    }
}

/// `ttl` in whole milliseconds, saturating at `u64::MAX`
fn ttl_millis(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX)
}

/// `<NAME> dest numkeys key [key ...]`
fn aggregate_cmd(name: &str, dest: &str, keys: &[&str]) -> redis::Cmd {
    let mut cmd = redis::cmd(name);
    cmd.arg(dest).arg(keys.len());
    for key in keys {
        cmd.arg(*key);
    }
    cmd
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore")
            .field("connection_info", self.client.get_connection_info())
            .finish()
    }
}

impl Store for RedisStore {
    // ========== Keys ==========

    fn exists(&self, key: &str) -> Result<bool> {
        self.query(redis::cmd("EXISTS").arg(key))
    }

    fn del(&self, key: &str) -> Result<u64> {
        self.query(redis::cmd("DEL").arg(key))
    }

    fn expire(&self, key: &str, ttl: Duration) -> Result<bool> {
        self.query(redis::cmd("PEXPIRE").arg(key).arg(ttl_millis(ttl)))
    }

    fn keys(&self, pattern: &str) -> Result<Vec<String>> {
        self.query(redis::cmd("KEYS").arg(pattern))
    }

    // ========== Strings ==========

    fn get(&self, key: &str) -> Result<Option<String>> {
        self.query(redis::cmd("GET").arg(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.query(redis::cmd("SET").arg(key).arg(value))
    }

    fn incr_by(&self, key: &str, by: i64) -> Result<i64> {
        self.query(redis::cmd("INCRBY").arg(key).arg(by))
    }

    // ========== Lists ==========

    fn rpush(&self, key: &str, value: &str) -> Result<u64> {
        self.query(redis::cmd("RPUSH").arg(key).arg(value))
    }

    fn lrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<String>> {
        self.query(redis::cmd("LRANGE").arg(key).arg(start).arg(stop))
    }

    fn llen(&self, key: &str) -> Result<u64> {
        self.query(redis::cmd("LLEN").arg(key))
    }

    fn lindex(&self, key: &str, index: i64) -> Result<Option<String>> {
        self.query(redis::cmd("LINDEX").arg(key).arg(index))
    }

    // ========== Sets ==========

    fn sadd(&self, key: &str, member: &str) -> Result<bool> {
        self.query(redis::cmd("SADD").arg(key).arg(member))
    }

    fn srem(&self, key: &str, member: &str) -> Result<bool> {
        self.query(redis::cmd("SREM").arg(key).arg(member))
    }

    fn smembers(&self, key: &str) -> Result<Vec<String>> {
        self.query(redis::cmd("SMEMBERS").arg(key))
    }

    fn scard(&self, key: &str) -> Result<u64> {
        self.query(redis::cmd("SCARD").arg(key))
    }

    fn sismember(&self, key: &str, member: &str) -> Result<bool> {
        self.query(redis::cmd("SISMEMBER").arg(key).arg(member))
    }

    fn srandmember_many(&self, key: &str, count: usize) -> Result<Vec<String>> {
        if count == 0 {
            return Ok(Vec::new());
        }
        let mut pipe = redis::pipe();
        for _ in 0..count {
            pipe.cmd("SRANDMEMBER").arg(key);
        }
        let picks: Vec<Option<String>> = self.with_connection(|conn| pipe.query(conn))?;
        Ok(picks.into_iter().flatten().collect())
    }

    // ========== Hashes ==========

    fn hset(&self, key: &str, field: &str, value: &str) -> Result<bool> {
        self.query(redis::cmd("HSET").arg(key).arg(field).arg(value))
    }

    fn hget(&self, key: &str, field: &str) -> Result<Option<String>> {
        self.query(redis::cmd("HGET").arg(key).arg(field))
    }

    fn hincr_by(&self, key: &str, field: &str, by: i64) -> Result<i64> {
        self.query(redis::cmd("HINCRBY").arg(key).arg(field).arg(by))
    }

    fn hgetall(&self, key: &str) -> Result<HashMap<String, String>> {
        self.query(redis::cmd("HGETALL").arg(key))
    }

    fn hkeys(&self, key: &str) -> Result<Vec<String>> {
        self.query(redis::cmd("HKEYS").arg(key))
    }

    // ========== Ordered sets ==========

    fn zadd(&self, key: &str, score: f64, member: &str) -> Result<bool> {
        self.query(redis::cmd("ZADD").arg(key).arg(score).arg(member))
    }

    fn zrem(&self, key: &str, member: &str) -> Result<bool> {
        self.query(redis::cmd("ZREM").arg(key).arg(member))
    }

    fn zcard(&self, key: &str) -> Result<u64> {
        self.query(redis::cmd("ZCARD").arg(key))
    }

    fn zscore(&self, key: &str, member: &str) -> Result<Option<f64>> {
        self.query(redis::cmd("ZSCORE").arg(key).arg(member))
    }

    fn zrank(&self, key: &str, member: &str) -> Result<Option<u64>> {
        self.query(redis::cmd("ZRANK").arg(key).arg(member))
    }

    fn zrevrank(&self, key: &str, member: &str) -> Result<Option<u64>> {
        self.query(redis::cmd("ZREVRANK").arg(key).arg(member))
    }

    fn zcount(&self, key: &str, min: ScoreBound, max: ScoreBound) -> Result<u64> {
        self.query(redis::cmd("ZCOUNT").arg(key).arg(min).arg(max))
    }

    fn zrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<(String, f64)>> {
        self.query(
            redis::cmd("ZRANGE")
                .arg(key)
                .arg(start)
                .arg(stop)
                .arg("WITHSCORES"),
        )
    }

    fn zrevrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<(String, f64)>> {
        self.query(
            redis::cmd("ZREVRANGE")
                .arg(key)
                .arg(start)
                .arg(stop)
                .arg("WITHSCORES"),
        )
    }

    fn zrevrangebyscore(
        &self,
        key: &str,
        max: ScoreBound,
        min: ScoreBound,
    ) -> Result<Vec<(String, f64)>> {
        self.query(
            redis::cmd("ZREVRANGEBYSCORE")
                .arg(key)
                .arg(max)
                .arg(min)
                .arg("WITHSCORES"),
        )
    }

    fn zremrangebyscore(&self, key: &str, min: ScoreBound, max: ScoreBound) -> Result<u64> {
        self.query(redis::cmd("ZREMRANGEBYSCORE").arg(key).arg(min).arg(max))
    }

    fn zunionstore(&self, dest: &str, keys: &[&str]) -> Result<u64> {
        self.query(&aggregate_cmd("ZUNIONSTORE", dest, keys))
    }

    fn zinterstore(&self, dest: &str, keys: &[&str]) -> Result<u64> {
        self.query(&aggregate_cmd("ZINTERSTORE", dest, keys))
    }
}
