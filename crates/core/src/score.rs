//! Score bounds for ordered-set range queries
//!
//! Range commands take a lower and an upper bound, each of which may be
//! inclusive, exclusive or infinite. The Redis argument syntax is `3`
//! (inclusive), `(3` (exclusive), `-inf` and `+inf`.

use std::fmt;

/// One end of a score interval
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoreBound {
    /// Scores equal to the bound are included
    Inclusive(f64),
    /// Scores equal to the bound are excluded
    Exclusive(f64),
    /// Unbounded below
    NegInf,
    /// Unbounded above
    PosInf,
}

impl ScoreBound {
    /// Same bound with exclusivity applied
    ///
    /// Infinite bounds stay infinite.
    pub fn exclusive(self) -> Self {
        match self {
            ScoreBound::Inclusive(s) | ScoreBound::Exclusive(s) => ScoreBound::Exclusive(s),
            other => other,
        }
    }

    /// Same bound with inclusivity applied
    pub fn inclusive(self) -> Self {
        match self {
            ScoreBound::Inclusive(s) | ScoreBound::Exclusive(s) => ScoreBound::Inclusive(s),
            other => other,
        }
    }

    /// Whether `score` satisfies this bound used as the lower end
    pub fn admits_from_below(&self, score: f64) -> bool {
        match *self {
            ScoreBound::Inclusive(b) => score >= b,
            ScoreBound::Exclusive(b) => score > b,
            ScoreBound::NegInf => true,
            ScoreBound::PosInf => score == f64::INFINITY,
        }
    }

    /// Whether `score` satisfies this bound used as the upper end
    pub fn admits_from_above(&self, score: f64) -> bool {
        match *self {
            ScoreBound::Inclusive(b) => score <= b,
            ScoreBound::Exclusive(b) => score < b,
            ScoreBound::NegInf => score == f64::NEG_INFINITY,
            ScoreBound::PosInf => true,
        }
    }

    /// Render in Redis range argument syntax
    pub fn to_arg(&self) -> String {
        self.to_string()
    }
}

impl From<f64> for ScoreBound {
    fn from(score: f64) -> Self {
        if score == f64::INFINITY {
            ScoreBound::PosInf
        } else if score == f64::NEG_INFINITY {
            ScoreBound::NegInf
        } else {
            ScoreBound::Inclusive(score)
        }
    }
}

impl From<i64> for ScoreBound {
    fn from(score: i64) -> Self {
        ScoreBound::Inclusive(score as f64)
    }
}

impl From<i32> for ScoreBound {
    fn from(score: i32) -> Self {
        ScoreBound::Inclusive(f64::from(score))
    }
}

impl fmt::Display for ScoreBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreBound::Inclusive(s) => write!(f, "{}", s),
            ScoreBound::Exclusive(s) => write!(f, "({}", s),
            ScoreBound::NegInf => f.write_str("-inf"),
            ScoreBound::PosInf => f.write_str("+inf"),
        }
    }
}

impl redis::ToRedisArgs for ScoreBound {
    fn write_redis_args<W>(&self, out: &mut W)
    where
        W: ?Sized + redis::RedisWrite,
    {
        out.write_arg(self.to_arg().as_bytes())
    }
}
