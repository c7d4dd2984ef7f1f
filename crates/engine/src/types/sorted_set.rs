//! SortedSet: score-ordered set with leaderboard defaults
//!
//! ## Ordering
//!
//! Elements are ordered by descending score unless a method says otherwise.
//! `get_range_by_rank`, `get_rank` and `get_range` all treat rank 0 as the
//! highest score; `get_range_by_reverse_rank` is the ascending counterpart.
//!
//! ## Score ranges
//!
//! `get_range` excludes both boundary scores unless
//! `RangeOptions::include_boundaries` is set, so a caller walking pages by
//! score never sees the boundary element twice. `count_in_range` keeps the
//! store's inclusive counting.
//!
//! ## Intersections
//!
//! `intersect` names an ephemeral derived set without touching the store;
//! `intersect_with` materializes it, hands it to a closure and deletes it on
//! every exit path, panics included.

use std::sync::Arc;

use rand::Rng;
use tracing::{debug, warn};

use redis_model_core::{Result, ScoreBound};
use redis_model_storage::Store;

use super::{impl_key_accessor, Handle, KeyAccessor};
use crate::intersected::{Intersected, ScopedIntersection};
use crate::paginator::SortedSetPaginator;

/// Options for score-range reads
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RangeOptions {
    /// Include elements whose score equals a boundary
    pub include_boundaries: bool,
}

impl RangeOptions {
    /// Boundaries included
    pub fn inclusive() -> Self {
        Self {
            include_boundaries: true,
        }
    }

    /// Boundaries excluded (the default)
    pub fn exclusive() -> Self {
        Self::default()
    }
}

/// Options for intersections
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntersectOptions {
    /// Seed appended to the derived key; random below 256 when unset
    pub seed: Option<u32>,
}

impl IntersectOptions {
    /// Fixed seed
    pub fn with_seed(seed: u32) -> Self {
        Self { seed: Some(seed) }
    }
}

/// Ordered set of members with float scores
#[derive(Debug, Clone)]
pub struct SortedSet {
    handle: Handle,
}

impl SortedSet {
    /// Bind `key_label` in `store`
    pub fn new(store: Arc<dyn Store>, key_label: impl Into<String>) -> Self {
        Self {
            handle: Handle::new(store, key_label),
        }
    }

    fn key(&self) -> &str {
        self.handle.key_label()
    }

    fn members(pairs: Vec<(String, f64)>) -> Vec<String> {
        pairs.into_iter().map(|(member, _)| member).collect()
    }

    // ========== Reads ==========

    /// Every member, highest score first
    pub fn to_vec(&self) -> Result<Vec<String>> {
        self.get_range(ScoreBound::NegInf, ScoreBound::PosInf, RangeOptions::inclusive())
    }

    /// Number of members with score between `from` and `to`
    ///
    /// Plain numeric bounds are inclusive, as the store counts them. Pass
    /// `ScoreBound::Exclusive` explicitly for an open interval.
    pub fn count_in_range(
        &self,
        from: impl Into<ScoreBound>,
        to: impl Into<ScoreBound>,
    ) -> Result<u64> {
        self.handle
            .store()
            .zcount(self.key(), from.into(), to.into())
    }

    /// Whether `member` is in the set
    pub fn contains(&self, member: &str) -> Result<bool> {
        Ok(self.handle.store().zrank(self.key(), member)?.is_some())
    }

    /// Members at descending ranks `from..=to`
    ///
    /// Negative ranks count from the lowest score, as in the store.
    pub fn get_range_by_rank(&self, from: i64, to: i64) -> Result<Vec<String>> {
        Ok(Self::members(self.get_range_by_rank_with_scores(from, to)?))
    }

    /// [`get_range_by_rank`](SortedSet::get_range_by_rank) with scores
    pub fn get_range_by_rank_with_scores(&self, from: i64, to: i64) -> Result<Vec<(String, f64)>> {
        self.handle.store().zrevrange(self.key(), from, to)
    }

    /// Members at ascending ranks `from..=to`
    pub fn get_range_by_reverse_rank(&self, from: i64, to: i64) -> Result<Vec<String>> {
        Ok(Self::members(
            self.get_range_by_reverse_rank_with_scores(from, to)?,
        ))
    }

    /// [`get_range_by_reverse_rank`](SortedSet::get_range_by_reverse_rank) with scores
    pub fn get_range_by_reverse_rank_with_scores(
        &self,
        from: i64,
        to: i64,
    ) -> Result<Vec<(String, f64)>> {
        self.handle.store().zrange(self.key(), from, to)
    }

    /// Descending rank of `member`, `None` if absent
    pub fn get_rank(&self, member: &str) -> Result<Option<u64>> {
        self.handle.store().zrevrank(self.key(), member)
    }

    /// Score of `member`, `None` if absent
    pub fn score(&self, member: &str) -> Result<Option<f64>> {
        self.handle.store().zscore(self.key(), member)
    }

    /// Cardinality
    pub fn count(&self) -> Result<u64> {
        self.handle.store().zcard(self.key())
    }

    /// Alias of [`count`](SortedSet::count)
    pub fn len(&self) -> Result<u64> {
        self.count()
    }

    /// Members with score between `from` and `to`, highest first
    ///
    /// Boundary scores are excluded unless `options.include_boundaries`.
    pub fn get_range(
        &self,
        from: impl Into<ScoreBound>,
        to: impl Into<ScoreBound>,
        options: RangeOptions,
    ) -> Result<Vec<String>> {
        Ok(Self::members(
            self.get_range_with_scores(from, to, options)?,
        ))
    }

    /// [`get_range`](SortedSet::get_range) with scores
    pub fn get_range_with_scores(
        &self,
        from: impl Into<ScoreBound>,
        to: impl Into<ScoreBound>,
        options: RangeOptions,
    ) -> Result<Vec<(String, f64)>> {
        let (min, max) = (from.into(), to.into());
        let (min, max) = if options.include_boundaries {
            (min, max)
        } else {
            (min.exclusive(), max.exclusive())
        };
        self.handle.store().zrevrangebyscore(self.key(), max, min)
    }

    /// Up to `count` members picked by uniformly random descending rank
    ///
    /// Ranks are drawn independently, so a member can be picked twice. A rank
    /// that no longer holds a member when it is read is skipped, so fewer
    /// than `count` members may come back.
    pub fn sample(&self, count: usize) -> Result<Vec<String>> {
        let cardinality = self.count()?;
        self.sample_ranks(cardinality, count)
    }

    /// Draw `count` ranks below `cardinality` and read each one
    fn sample_ranks(&self, cardinality: u64, count: usize) -> Result<Vec<String>> {
        if cardinality == 0 || count == 0 {
            return Ok(Vec::new());
        }
        let mut rng = rand::thread_rng();
        let mut picks = Vec::with_capacity(count);
        for _ in 0..count {
            let rank = rng.gen_range(0..cardinality) as i64;
            if let Some((member, _)) = self
                .handle
                .store()
                .zrevrange(self.key(), rank, rank)?
                .into_iter()
                .next()
            {
                picks.push(member);
            }
        }
        Ok(picks)
    }

    /// Pagination cursor over this set
    pub fn paginate(&self) -> SortedSetPaginator<'_> {
        SortedSetPaginator::new(self)
    }

    // ========== Writes ==========

    /// Add `member` with `score`, or rescore it; returns whether it was new
    pub fn put(&self, score: f64, member: &str) -> Result<bool> {
        self.handle.store().zadd(self.key(), score, member)
    }

    /// Remove `member`, returning whether it was present
    pub fn remove(&self, member: &str) -> Result<bool> {
        self.handle.store().zrem(self.key(), member)
    }

    /// Remove members with score in `[from, to]`
    pub fn remove_range(
        &self,
        from: impl Into<ScoreBound>,
        to: impl Into<ScoreBound>,
    ) -> Result<u64> {
        self.handle
            .store()
            .zremrangebyscore(self.key(), from.into(), to.into())
    }

    /// Remove every member
    pub fn remove_full_range(&self) -> Result<u64> {
        self.remove_range(ScoreBound::NegInf, ScoreBound::PosInf)
    }

    /// Copy this set to `new_key_label`
    ///
    /// Returns `false` without touching the store if this set does not exist.
    pub fn duplicate(&self, new_key_label: &str) -> Result<bool> {
        if !self.exists()? {
            return Ok(false);
        }
        let copied = self
            .handle
            .store()
            .zunionstore(new_key_label, &[self.key()])?;
        debug!(
            target: "redis_model::sorted_set",
            from = %self.key(),
            to = %new_key_label,
            members = copied,
            "Sorted set duplicated"
        );
        Ok(true)
    }

    // ========== Intersections ==========

    /// Derived set intersecting this set with `other`
    ///
    /// Nothing is written until [`Intersected::generate`] is called. `other`
    /// may be a sorted set or a plain set; plain-set members count as score 1
    /// and scores are summed. `other` is read from this set's store.
    pub fn intersect(&self, other: &dyn KeyAccessor, options: IntersectOptions) -> Intersected {
        Intersected::new(
            Arc::clone(self.handle.shared_store()),
            &[self.key(), other.key_label()],
            options.seed,
        )
    }

    /// Materialize the intersection with `other`, run `f` on it, delete it
    ///
    /// The derived key is deleted whether `f` returns, fails or panics. When
    /// `f` fails its error is returned even if the deletion fails too.
    pub fn intersect_with<R, F>(
        &self,
        other: &dyn KeyAccessor,
        options: IntersectOptions,
        f: F,
    ) -> Result<R>
    where
        F: FnOnce(&Intersected) -> Result<R>,
    {
        let intersected = self.intersect(other, options);
        let scope = ScopedIntersection::new(&intersected);
        intersected.generate(None)?;

        let outcome = f(&intersected);
        let cleanup = scope.release();
        match (outcome, cleanup) {
            (Ok(value), Ok(_)) => Ok(value),
            (Ok(_), Err(e)) => Err(e),
            (Err(e), Ok(_)) => Err(e),
            (Err(e), Err(cleanup_err)) => {
                warn!(
                    target: "redis_model::intersect",
                    key_label = %intersected.key_label(),
                    error = %cleanup_err,
                    "Failed to delete derived set"
                );
                Err(e)
            }
        }
    }
}

impl_key_accessor!(SortedSet);
