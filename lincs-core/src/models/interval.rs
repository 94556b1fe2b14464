use std::cmp::Ordering;
use std::fmt::{self, Display};

use crate::errors::{LincsError, Result};
use crate::predicates::overlaps;

/// Represent a range from [start, stop]
/// 1-based, inclusive of both ends
#[derive(Eq, PartialEq, Hash, Debug, Clone, Copy)]
pub struct Interval {
    pub start: i64,
    pub stop: i64,
}

impl Interval {
    ///
    /// Create a new interval, rejecting inverted bounds.
    ///
    pub fn new(start: i64, stop: i64) -> Result<Self> {
        if start > stop {
            return Err(LincsError::MalformedFeature(format!(
                "interval start {} is greater than its stop {}",
                start, stop
            )));
        }
        Ok(Interval { start, stop })
    }

    ///
    /// Number of bases covered, endpoints included.
    ///
    #[inline]
    pub fn width(&self) -> i64 {
        self.stop - self.start + 1
    }

    /// Count of bases shared with `other` after extending both by `margin`.
    #[inline]
    pub fn overlap(&self, other: &Interval, margin: i64) -> i64 {
        overlaps(self.start, self.stop, other.start, other.stop, margin)
    }

    /// Symmetric expansion by `margin`, lower bound clamped at 0.
    #[inline]
    pub fn expand(&self, margin: i64) -> Interval {
        Interval {
            start: (self.start - margin).max(0),
            stop: self.stop + margin,
        }
    }

    #[inline]
    pub fn contains(&self, other: &Interval) -> bool {
        self.start <= other.start && other.stop <= self.stop
    }
}

impl From<(i64, i64)> for Interval {
    fn from(value: (i64, i64)) -> Self {
        Interval {
            start: value.0,
            stop: value.1,
        }
    }
}

impl Ord for Interval {
    #[inline]
    fn cmp(&self, other: &Interval) -> Ordering {
        match self.start.cmp(&other.start) {
            Ordering::Equal => self.stop.cmp(&other.stop),
            ord => ord,
        }
    }
}

impl PartialOrd for Interval {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.stop)
    }
}
