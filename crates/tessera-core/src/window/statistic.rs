use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::MAX_PERCENTILE;
use crate::error::{FilterError, Result};

/// Order statistic computed over each window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Statistic {
    Minimum,
    Maximum,
    /// Upper middle element for even window counts; never averaged.
    #[default]
    Median,
    /// Zero-based position in the sorted window.
    Rank(i64),
    /// Percentile in `[0, 100]`.
    Percentile(f64),
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statistic::Minimum => write!(f, "minimum"),
            Statistic::Maximum => write!(f, "maximum"),
            Statistic::Median => write!(f, "median"),
            Statistic::Rank(k) => write!(f, "rank({k})"),
            Statistic::Percentile(p) => write!(f, "percentile({p})"),
        }
    }
}

impl Statistic {
    /// Whether a non-integer origin is meaningful for this statistic.
    pub fn accepts_fractional_origin(&self) -> bool {
        matches!(self, Statistic::Median | Statistic::Rank(_))
    }

    /// Check the selector against a window of `count` participating cells.
    pub fn validate(&self, count: usize) -> Result<()> {
        match *self {
            Statistic::Rank(k) => {
                if k < 0 || k as u64 >= count as u64 {
                    return Err(FilterError::Value(format!(
                        "rank {k} is outside [0, {count}) for a footprint of {count} cells"
                    )));
                }
            }
            Statistic::Percentile(p) => {
                if !(0.0..=MAX_PERCENTILE).contains(&p) {
                    return Err(FilterError::Value(format!(
                        "percentile {p} is outside [0, 100]"
                    )));
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Zero-based rank selected among `count` sorted values.
    ///
    /// Callers must have passed [`Statistic::validate`] for the same count.
    pub fn rank_index(&self, count: usize) -> usize {
        let last = count.saturating_sub(1);
        match *self {
            Statistic::Minimum => 0,
            Statistic::Maximum => last,
            Statistic::Median => count / 2,
            Statistic::Rank(k) => (k.max(0) as usize).min(last),
            Statistic::Percentile(p) => {
                let rank = (count as f64 * p / MAX_PERCENTILE) as usize;
                rank.min(last)
            }
        }
    }
}
