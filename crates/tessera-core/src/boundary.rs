use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FilterError;

/// How values beyond the global array edge are synthesised.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryMode {
    /// `d c b a | a b c d | d c b a`
    #[default]
    Reflect,
    /// Fill with the constant `cval`.
    Constant,
    /// `a a a | a b c d | d d d`
    Nearest,
    /// `d c b | a b c d | c b a`
    Mirror,
    /// `a b c d | a b c d | a b c d`
    Wrap,
}

impl fmt::Display for BoundaryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BoundaryMode::Reflect => "reflect",
            BoundaryMode::Constant => "constant",
            BoundaryMode::Nearest => "nearest",
            BoundaryMode::Mirror => "mirror",
            BoundaryMode::Wrap => "wrap",
        };
        f.write_str(name)
    }
}

impl FromStr for BoundaryMode {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reflect" => Ok(BoundaryMode::Reflect),
            "constant" => Ok(BoundaryMode::Constant),
            "nearest" => Ok(BoundaryMode::Nearest),
            "mirror" => Ok(BoundaryMode::Mirror),
            "wrap" => Ok(BoundaryMode::Wrap),
            other => Err(FilterError::Config(format!(
                "unknown boundary mode '{other}' (expected reflect, constant, nearest, mirror or wrap)"
            ))),
        }
    }
}

/// Map a possibly out-of-range coordinate onto `0..len`.
///
/// Returns `None` when the value must come from `cval` (constant mode) or when
/// the axis is empty and there is nothing to map onto.
#[inline]
pub fn map_index(i: isize, len: usize, mode: BoundaryMode) -> Option<usize> {
    let n = len as isize;
    if (0..n).contains(&i) {
        return Some(i as usize);
    }
    if len == 0 {
        return None;
    }
    let mapped = match mode {
        BoundaryMode::Constant => return None,
        BoundaryMode::Nearest => i.clamp(0, n - 1),
        BoundaryMode::Wrap => i.rem_euclid(n),
        BoundaryMode::Reflect => {
            let period = 2 * n;
            let m = i.rem_euclid(period);
            if m >= n {
                period - 1 - m
            } else {
                m
            }
        }
        BoundaryMode::Mirror => {
            if n == 1 {
                0
            } else {
                let period = 2 * n - 2;
                let m = i.rem_euclid(period);
                if m >= n {
                    period - m
                } else {
                    m
                }
            }
        }
    };
    Some(mapped as usize)
}
