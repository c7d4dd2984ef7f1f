//! MemoryStore: in-process store backend with Redis command semantics
//!
//! This module implements the `Store` trait using:
//! - `HashMap<String, Entry>` keyed by label, one typed entry per key
//! - `parking_lot::RwLock` for thread-safe access
//! - a `BTreeSet<(score, member)>` index per ordered set, so ascending rank
//!   order is `(score, member)` and descending commands walk it backwards
//!
//! # Design Notes
//!
//! - **Logical TTL expiration**: expired keys are filtered at read time and
//!   purged on the next write to the same key
//! - **Empty collections vanish**: removing the last element of a list, set,
//!   hash or ordered set deletes the key, as the server does
//! - **WRONGTYPE**: a command against a key holding another kind of value
//!   fails with `Error::WrongType` and leaves the key untouched

use std::collections::{BTreeSet, HashMap};
use std::time::{Duration, Instant};

use ordered_float::OrderedFloat;
use parking_lot::RwLock;
use rand::seq::IteratorRandom;

use redis_model_core::{Error, Result, ScoreBound};

use crate::traits::Store;

/// Ordered-set value: member → score map plus a `(score, member)` order index
#[derive(Debug, Clone, Default)]
struct SortedSetEntry {
    scores: HashMap<String, f64>,
    order: BTreeSet<(OrderedFloat<f64>, String)>,
}

impl SortedSetEntry {
    fn insert(&mut self, member: &str, score: f64) -> bool {
        let was_new = match self.scores.insert(member.to_string(), score) {
            Some(old) => {
                self.order.remove(&(OrderedFloat(old), member.to_string()));
                false
            }
            None => true,
        };
        self.order.insert((OrderedFloat(score), member.to_string()));
        was_new
    }

    fn remove(&mut self, member: &str) -> bool {
        match self.scores.remove(member) {
            Some(old) => {
                self.order.remove(&(OrderedFloat(old), member.to_string()));
                true
            }
            None => false,
        }
    }

    fn len(&self) -> usize {
        self.scores.len()
    }

    fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    fn ascending(&self) -> impl DoubleEndedIterator<Item = (String, f64)> + '_ {
        self.order.iter().map(|(score, member)| (member.clone(), score.0))
    }

    fn in_range(&self, min: ScoreBound, max: ScoreBound) -> Vec<(String, f64)> {
        self.ascending()
            .filter(|(_, score)| min.admits_from_below(*score) && max.admits_from_above(*score))
            .collect()
    }

    fn rank(&self, member: &str) -> Option<usize> {
        let score = *self.scores.get(member)?;
        Some(self.order.range(..(OrderedFloat(score), member.to_string())).count())
    }
}

/// Typed value stored under one key
#[derive(Debug, Clone)]
enum Entry {
    Str(String),
    List(Vec<String>),
    Set(BTreeSet<String>),
    Hash(HashMap<String, String>),
    Sorted(SortedSetEntry),
}

impl Entry {
    fn is_empty(&self) -> bool {
        match self {
            Entry::Str(_) => false,
            Entry::List(l) => l.is_empty(),
            Entry::Set(s) => s.is_empty(),
            Entry::Hash(h) => h.is_empty(),
            Entry::Sorted(z) => z.is_empty(),
        }
    }
}

#[derive(Debug, Default)]
struct Keyspace {
    entries: HashMap<String, Entry>,
    expires: HashMap<String, Instant>,
}

impl Keyspace {
    fn is_expired(&self, key: &str) -> bool {
        self.expires
            .get(key)
            .map_or(false, |at| *at <= Instant::now())
    }

    fn lookup(&self, key: &str) -> Option<&Entry> {
        if self.is_expired(key) {
            None
        } else {
            self.entries.get(key)
        }
    }

    fn purge(&mut self, key: &str) {
        if self.is_expired(key) {
            self.entries.remove(key);
            self.expires.remove(key);
        }
    }

    fn lookup_mut(&mut self, key: &str) -> Option<&mut Entry> {
        self.purge(key);
        self.entries.get_mut(key)
    }

    fn remove(&mut self, key: &str) -> Option<Entry> {
        self.purge(key);
        self.expires.remove(key);
        self.entries.remove(key)
    }

    fn remove_if_empty(&mut self, key: &str) {
        if self.entries.get(key).map_or(false, Entry::is_empty) {
            self.remove(key);
        }
    }

    /// Entry for a write, created with `init` when absent
    fn entry_or_insert(&mut self, key: &str, init: fn() -> Entry) -> &mut Entry {
        self.purge(key);
        self.entries.entry(key.to_string()).or_insert_with(init)
    }
}

fn wrong_type(key: &str) -> Error {
    Error::WrongType(key.to_string())
}

fn not_an_integer() -> Error {
    Error::InvalidValue("value is not an integer or out of range".to_string())
}

fn parse_int(value: &str) -> Result<i64> {
    value.parse::<i64>().map_err(|_| not_an_integer())
}

/// Resolve an inclusive index window with negative indices from the end
fn rank_window(start: i64, stop: i64, len: usize) -> Option<(usize, usize)> {
    let len = len as i64;
    if len == 0 {
        return None;
    }
    let start = if start < 0 { (len + start).max(0) } else { start };
    let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };
    if start > stop || start >= len {
        return None;
    }
    Some((start as usize, stop as usize))
}

/// Glob matching with `*`, `?` and `\` escapes
fn glob_match(pattern: &[u8], text: &[u8]) -> bool {
    match (pattern.first(), text.first()) {
        (None, None) => true,
        (Some(b'*'), _) => {
            glob_match(&pattern[1..], text) || (!text.is_empty() && glob_match(pattern, &text[1..]))
        }
        (Some(b'?'), Some(_)) => glob_match(&pattern[1..], &text[1..]),
        (Some(b'\\'), Some(t)) if pattern.len() > 1 => {
            pattern[1] == *t && glob_match(&pattern[2..], &text[1..])
        }
        (Some(p), Some(t)) => p == t && glob_match(&pattern[1..], &text[1..]),
        _ => false,
    }
}

/// In-process store with Redis command semantics
///
/// Intended for tests and single-process deployments. All commands take the
/// keyspace lock once, so each command is atomic like a server command.
///
/// # Example
///
/// ```
/// use redis_model_storage::{MemoryStore, Store};
///
/// let store = MemoryStore::new();
/// store.zadd("board", 3.0, "three").unwrap();
/// store.zadd("board", 1.0, "one").unwrap();
/// assert_eq!(store.zrevrank("board", "one").unwrap(), Some(1));
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    keyspace: RwLock<Keyspace>,
}

impl MemoryStore {
    /// Create a new empty MemoryStore
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove every key (FLUSHDB)
    pub fn flush(&self) {
        let mut ks = self.keyspace.write();
        ks.entries.clear();
        ks.expires.clear();
    }

    /// Number of live keys (DBSIZE)
    pub fn len(&self) -> usize {
        let ks = self.keyspace.read();
        ks.entries.keys().filter(|k| !ks.is_expired(k)).count()
    }

    /// Whether no live keys exist
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Members of a sorted or plain set keyed by member with weight
    fn weighted_members(ks: &Keyspace, key: &str) -> Result<HashMap<String, f64>> {
        match ks.lookup(key) {
            None => Ok(HashMap::new()),
            Some(Entry::Sorted(z)) => Ok(z.scores.clone()),
            Some(Entry::Set(s)) => Ok(s.iter().map(|m| (m.clone(), 1.0)).collect()),
            Some(_) => Err(wrong_type(key)),
        }
    }

    fn store_sorted(ks: &mut Keyspace, dest: &str, members: HashMap<String, f64>) -> u64 {
        ks.remove(dest);
        let count = members.len() as u64;
        if count > 0 {
            let mut entry = SortedSetEntry::default();
            for (member, score) in members {
                entry.insert(&member, score);
            }
            ks.entries.insert(dest.to_string(), Entry::Sorted(entry));
        }
        count
    }

    fn sorted<'a>(ks: &'a Keyspace, key: &str) -> Result<Option<&'a SortedSetEntry>> {
        match ks.lookup(key) {
            None => Ok(None),
            Some(Entry::Sorted(z)) => Ok(Some(z)),
            Some(_) => Err(wrong_type(key)),
        }
    }

    fn list<'a>(ks: &'a Keyspace, key: &str) -> Result<Option<&'a Vec<String>>> {
        match ks.lookup(key) {
            None => Ok(None),
            Some(Entry::List(l)) => Ok(Some(l)),
            Some(_) => Err(wrong_type(key)),
        }
    }

    fn set_entry<'a>(ks: &'a Keyspace, key: &str) -> Result<Option<&'a BTreeSet<String>>> {
        match ks.lookup(key) {
            None => Ok(None),
            Some(Entry::Set(s)) => Ok(Some(s)),
            Some(_) => Err(wrong_type(key)),
        }
    }

    fn hash<'a>(ks: &'a Keyspace, key: &str) -> Result<Option<&'a HashMap<String, String>>> {
        match ks.lookup(key) {
            None => Ok(None),
            Some(Entry::Hash(h)) => Ok(Some(h)),
            Some(_) => Err(wrong_type(key)),
        }
    }
}

impl Store for MemoryStore {
    // ========== Keys ==========

    fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.keyspace.read().lookup(key).is_some())
    }

    fn del(&self, key: &str) -> Result<u64> {
        Ok(self.keyspace.write().remove(key).map_or(0, |_| 1))
    }

    fn expire(&self, key: &str, ttl: Duration) -> Result<bool> {
        let mut ks = self.keyspace.write();
        if ks.lookup_mut(key).is_none() {
            return Ok(false);
        }
        ks.expires.insert(key.to_string(), Instant::now() + ttl);
        Ok(true)
    }

    fn keys(&self, pattern: &str) -> Result<Vec<String>> {
        let ks = self.keyspace.read();
        let mut keys: Vec<String> = ks
            .entries
            .keys()
            .filter(|k| !ks.is_expired(k) && glob_match(pattern.as_bytes(), k.as_bytes()))
            .cloned()
            .collect();
        keys.sort();
        Ok(keys)
    }

    // ========== Strings ==========

    fn get(&self, key: &str) -> Result<Option<String>> {
        match self.keyspace.read().lookup(key) {
            None => Ok(None),
            Some(Entry::Str(s)) => Ok(Some(s.clone())),
            Some(_) => Err(wrong_type(key)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut ks = self.keyspace.write();
        ks.remove(key);
        ks.entries
            .insert(key.to_string(), Entry::Str(value.to_string()));
        Ok(())
    }

    fn incr_by(&self, key: &str, by: i64) -> Result<i64> {
        let mut ks = self.keyspace.write();
        match ks.entry_or_insert(key, || Entry::Str("0".to_string())) {
            Entry::Str(s) => {
                let next = parse_int(s)?.checked_add(by).ok_or_else(not_an_integer)?;
                *s = next.to_string();
                Ok(next)
            }
            _ => Err(wrong_type(key)),
        }
    }

    // ========== Lists ==========

    fn rpush(&self, key: &str, value: &str) -> Result<u64> {
        let mut ks = self.keyspace.write();
        match ks.entry_or_insert(key, || Entry::List(Vec::new())) {
            Entry::List(l) => {
                l.push(value.to_string());
                Ok(l.len() as u64)
            }
            _ => Err(wrong_type(key)),
        }
    }

    fn lrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<String>> {
        let ks = self.keyspace.read();
        let list = match Self::list(&ks, key)? {
            Some(l) => l,
            None => return Ok(Vec::new()),
        };
        Ok(match rank_window(start, stop, list.len()) {
            Some((from, to)) => list[from..=to].to_vec(),
            None => Vec::new(),
        })
    }

    fn llen(&self, key: &str) -> Result<u64> {
        let ks = self.keyspace.read();
        Ok(Self::list(&ks, key)?.map_or(0, |l| l.len() as u64))
    }

    fn lindex(&self, key: &str, index: i64) -> Result<Option<String>> {
        let ks = self.keyspace.read();
        let list = match Self::list(&ks, key)? {
            Some(l) => l,
            None => return Ok(None),
        };
        let len = list.len() as i64;
        let index = if index < 0 { len + index } else { index };
        if index < 0 || index >= len {
            return Ok(None);
        }
        Ok(list.get(index as usize).cloned())
    }

    // ========== Sets ==========

    fn sadd(&self, key: &str, member: &str) -> Result<bool> {
        let mut ks = self.keyspace.write();
        match ks.entry_or_insert(key, || Entry::Set(BTreeSet::new())) {
            Entry::Set(s) => Ok(s.insert(member.to_string())),
            _ => Err(wrong_type(key)),
        }
    }

    fn srem(&self, key: &str, member: &str) -> Result<bool> {
        let mut ks = self.keyspace.write();
        let removed = match ks.lookup_mut(key) {
            None => return Ok(false),
            Some(Entry::Set(s)) => s.remove(member),
            Some(_) => return Err(wrong_type(key)),
        };
        ks.remove_if_empty(key);
        Ok(removed)
    }

    fn smembers(&self, key: &str) -> Result<Vec<String>> {
        let ks = self.keyspace.read();
        Ok(Self::set_entry(&ks, key)?.map_or_else(Vec::new, |s| s.iter().cloned().collect()))
    }

    fn scard(&self, key: &str) -> Result<u64> {
        let ks = self.keyspace.read();
        Ok(Self::set_entry(&ks, key)?.map_or(0, |s| s.len() as u64))
    }

    fn sismember(&self, key: &str, member: &str) -> Result<bool> {
        let ks = self.keyspace.read();
        Ok(Self::set_entry(&ks, key)?.map_or(false, |s| s.contains(member)))
    }

    fn srandmember_many(&self, key: &str, count: usize) -> Result<Vec<String>> {
        let ks = self.keyspace.read();
        let set = match Self::set_entry(&ks, key)? {
            Some(s) => s,
            None => return Ok(Vec::new()),
        };
        let mut rng = rand::thread_rng();
        Ok((0..count)
            .filter_map(|_| set.iter().choose(&mut rng).cloned())
            .collect())
    }

    // ========== Hashes ==========

    fn hset(&self, key: &str, field: &str, value: &str) -> Result<bool> {
        let mut ks = self.keyspace.write();
        match ks.entry_or_insert(key, || Entry::Hash(HashMap::new())) {
            Entry::Hash(h) => Ok(h.insert(field.to_string(), value.to_string()).is_none()),
            _ => Err(wrong_type(key)),
        }
    }

    fn hget(&self, key: &str, field: &str) -> Result<Option<String>> {
        let ks = self.keyspace.read();
        Ok(Self::hash(&ks, key)?.and_then(|h| h.get(field).cloned()))
    }

    fn hincr_by(&self, key: &str, field: &str, by: i64) -> Result<i64> {
        let mut ks = self.keyspace.write();
        match ks.entry_or_insert(key, || Entry::Hash(HashMap::new())) {
            Entry::Hash(h) => {
                let current = match h.get(field) {
                    Some(v) => parse_int(v)?,
                    None => 0,
                };
                let next = current.checked_add(by).ok_or_else(not_an_integer)?;
                h.insert(field.to_string(), next.to_string());
                Ok(next)
            }
            _ => Err(wrong_type(key)),
        }
    }

    fn hgetall(&self, key: &str) -> Result<HashMap<String, String>> {
        let ks = self.keyspace.read();
        Ok(Self::hash(&ks, key)?.cloned().unwrap_or_default())
    }

    fn hkeys(&self, key: &str) -> Result<Vec<String>> {
        let ks = self.keyspace.read();
        Ok(Self::hash(&ks, key)?.map_or_else(Vec::new, |h| h.keys().cloned().collect()))
    }

    // ========== Ordered sets ==========

    fn zadd(&self, key: &str, score: f64, member: &str) -> Result<bool> {
        if score.is_nan() {
            return Err(Error::InvalidValue("score is not a valid float".to_string()));
        }
        let mut ks = self.keyspace.write();
        match ks.entry_or_insert(key, || Entry::Sorted(SortedSetEntry::default())) {
            Entry::Sorted(z) => Ok(z.insert(member, score)),
            _ => Err(wrong_type(key)),
        }
    }

    fn zrem(&self, key: &str, member: &str) -> Result<bool> {
        let mut ks = self.keyspace.write();
        let removed = match ks.lookup_mut(key) {
            None => return Ok(false),
            Some(Entry::Sorted(z)) => z.remove(member),
            Some(_) => return Err(wrong_type(key)),
        };
        ks.remove_if_empty(key);
        Ok(removed)
    }

    fn zcard(&self, key: &str) -> Result<u64> {
        let ks = self.keyspace.read();
        Ok(Self::sorted(&ks, key)?.map_or(0, |z| z.len() as u64))
    }

    fn zscore(&self, key: &str, member: &str) -> Result<Option<f64>> {
        let ks = self.keyspace.read();
        Ok(Self::sorted(&ks, key)?.and_then(|z| z.scores.get(member).copied()))
    }

    fn zrank(&self, key: &str, member: &str) -> Result<Option<u64>> {
        let ks = self.keyspace.read();
        Ok(Self::sorted(&ks, key)?
            .and_then(|z| z.rank(member))
            .map(|r| r as u64))
    }

    fn zrevrank(&self, key: &str, member: &str) -> Result<Option<u64>> {
        let ks = self.keyspace.read();
        Ok(Self::sorted(&ks, key)?
            .and_then(|z| z.rank(member).map(|r| (z.len() - 1 - r) as u64)))
    }

    fn zcount(&self, key: &str, min: ScoreBound, max: ScoreBound) -> Result<u64> {
        let ks = self.keyspace.read();
        Ok(Self::sorted(&ks, key)?.map_or(0, |z| z.in_range(min, max).len() as u64))
    }

    fn zrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<(String, f64)>> {
        let ks = self.keyspace.read();
        let z = match Self::sorted(&ks, key)? {
            Some(z) => z,
            None => return Ok(Vec::new()),
        };
        Ok(match rank_window(start, stop, z.len()) {
            Some((from, to)) => z.ascending().skip(from).take(to - from + 1).collect(),
            None => Vec::new(),
        })
    }

    fn zrevrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<(String, f64)>> {
        let ks = self.keyspace.read();
        let z = match Self::sorted(&ks, key)? {
            Some(z) => z,
            None => return Ok(Vec::new()),
        };
        Ok(match rank_window(start, stop, z.len()) {
            Some((from, to)) => z.ascending().rev().skip(from).take(to - from + 1).collect(),
            None => Vec::new(),
        })
    }

    fn zrevrangebyscore(
        &self,
        key: &str,
        max: ScoreBound,
        min: ScoreBound,
    ) -> Result<Vec<(String, f64)>> {
        let ks = self.keyspace.read();
        let mut members = Self::sorted(&ks, key)?.map_or_else(Vec::new, |z| z.in_range(min, max));
        members.reverse();
        Ok(members)
    }

    fn zremrangebyscore(&self, key: &str, min: ScoreBound, max: ScoreBound) -> Result<u64> {
        let mut ks = self.keyspace.write();
        let removed = match ks.lookup_mut(key) {
            None => return Ok(0),
            Some(Entry::Sorted(z)) => {
                let doomed = z.in_range(min, max);
                for (member, _) in &doomed {
                    z.remove(member);
                }
                doomed.len() as u64
            }
            Some(_) => return Err(wrong_type(key)),
        };
        ks.remove_if_empty(key);
        Ok(removed)
    }

    fn zunionstore(&self, dest: &str, keys: &[&str]) -> Result<u64> {
        let mut ks = self.keyspace.write();
        let mut union: HashMap<String, f64> = HashMap::new();
        for key in keys {
            for (member, score) in Self::weighted_members(&ks, key)? {
                *union.entry(member).or_insert(0.0) += score;
            }
        }
        Ok(Self::store_sorted(&mut ks, dest, union))
    }

    fn zinterstore(&self, dest: &str, keys: &[&str]) -> Result<u64> {
        let mut ks = self.keyspace.write();
        let mut operands = Vec::with_capacity(keys.len());
        for key in keys {
            operands.push(Self::weighted_members(&ks, key)?);
        }
        let mut rest = operands.into_iter();
        let mut inter = rest.next().unwrap_or_default();
        for operand in rest {
            inter.retain(|member, score| match operand.get(member) {
                Some(other) => {
                    *score += other;
                    true
                }
                None => false,
            });
        }
        Ok(Self::store_sorted(&mut ks, dest, inter))
    }
}
