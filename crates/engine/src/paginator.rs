//! Pagination over sorted sets
//!
//! ## Modes
//!
//! - **Rank**: with no score bound, page `p` of size `n` is the descending
//!   rank window `(p-1)*n ..= (p-1)*n + n-1`, read straight from the store.
//! - **Score**: with `since_id` and/or `max_id`, every member strictly
//!   between the bounds is read (highest first) and the page is sliced from
//!   that list by a [`Pager`].
//!
//! The computed page is memoized for the lifetime of the cursor; iterating
//! twice reads the store once.

use once_cell::sync::OnceCell;

use redis_model_core::{Result, ScoreBound};

use crate::types::{RangeOptions, SortedSet};

/// Page used when none is set
pub const DEFAULT_PAGE: u64 = 1;

/// Page size used when none is set
pub const DEFAULT_PER_PAGE: u64 = 20;

/// Page arithmetic over an in-memory list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    page: u64,
    per: u64,
}

impl Pager {
    /// Page `page` (1-based, clamped to at least 1) of `per` items
    pub fn new(page: u64, per: u64) -> Self {
        Self {
            page: page.max(1),
            per,
        }
    }

    /// Current page, 1-based
    pub fn page(&self) -> u64 {
        self.page
    }

    /// Items per page
    pub fn per(&self) -> u64 {
        self.per
    }

    /// Index of the first item on the page
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.per)
    }

    /// Inclusive rank window of the page, `None` for an empty page size
    pub fn window(&self) -> Option<(i64, i64)> {
        if self.per == 0 {
            return None;
        }
        let from = i64::try_from(self.offset()).ok()?;
        let to = from.checked_add(i64::try_from(self.per).ok()? - 1)?;
        Some((from, to))
    }

    /// Items of `items` on the page
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let len = items.len() as u64;
        let start = self.offset().min(len) as usize;
        let end = self.offset().saturating_add(self.per).min(len) as usize;
        &items[start..end]
    }

    /// Pages needed for `total` items
    pub fn total_pages(&self, total: u64) -> u64 {
        if self.per == 0 {
            return 0;
        }
        (total + self.per - 1) / self.per
    }
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE, DEFAULT_PER_PAGE)
    }
}

/// Cursor over one page of a sorted set
///
/// # Example
///
/// ```ignore
/// let page = leaderboard.paginate().per(10).page(2);
/// for member in page.iter()? {
///     println!("{member}");
/// }
/// ```
#[derive(Debug)]
pub struct SortedSetPaginator<'a> {
    set: &'a SortedSet,
    pager: Pager,
    since: Option<f64>,
    max: Option<f64>,
    result: OnceCell<Vec<String>>,
}

impl<'a> SortedSetPaginator<'a> {
    /// First page of `set`, default page size
    pub fn new(set: &'a SortedSet) -> Self {
        Self {
            set,
            pager: Pager::default(),
            since: None,
            max: None,
            result: OnceCell::new(),
        }
    }

    /// Select page `page` (1-based)
    pub fn page(mut self, page: u64) -> Self {
        self.pager = Pager::new(page, self.pager.per());
        self.reset()
    }

    /// Set the page size
    pub fn per(mut self, per: u64) -> Self {
        self.pager = Pager::new(self.pager.page(), per);
        self.reset()
    }

    /// Only members scoring strictly above `score`
    pub fn since_id(mut self, score: f64) -> Self {
        self.since = Some(score);
        self.reset()
    }

    /// Only members scoring strictly below `score`
    pub fn max_id(mut self, score: f64) -> Self {
        self.max = Some(score);
        self.reset()
    }

    fn reset(mut self) -> Self {
        self.result = OnceCell::new();
        self
    }

    /// Page arithmetic in effect
    pub fn pager(&self) -> Pager {
        self.pager
    }

    /// Whether a score bound selects score mode
    pub fn is_score_bounded(&self) -> bool {
        self.since.is_some() || self.max.is_some()
    }

    /// Members on the page, highest score first; computed once
    pub fn result(&self) -> Result<&[String]> {
        self.result
            .get_or_try_init(|| {
                if self.is_score_bounded() {
                    self.result_with_score()
                } else {
                    self.result_with_rank()
                }
            })
            .map(Vec::as_slice)
    }

    fn result_with_score(&self) -> Result<Vec<String>> {
        let since = self.since.map_or(ScoreBound::NegInf, ScoreBound::from);
        let max = self.max.map_or(ScoreBound::PosInf, ScoreBound::from);
        let members = self.set.get_range(since, max, RangeOptions::exclusive())?;
        Ok(self.pager.slice(&members).to_vec())
    }

    fn result_with_rank(&self) -> Result<Vec<String>> {
        match self.pager.window() {
            Some((from, to)) => self.set.get_range_by_rank(from, to),
            None => Ok(Vec::new()),
        }
    }

    /// Iterate the page; restartable, reads the store at most once
    pub fn iter(&self) -> Result<std::slice::Iter<'_, String>> {
        Ok(self.result()?.iter())
    }
}
