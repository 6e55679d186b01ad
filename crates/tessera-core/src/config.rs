use std::fmt;

use num_traits::NumCast;
use serde::{Deserialize, Serialize};

use crate::boundary::BoundaryMode;
use crate::error::{FilterError, Result};
use crate::filters::WindowArgs;
use crate::sample::Sample;
use crate::window::footprint::window_cells;
use crate::window::{Footprint, ParamValue, Statistic};

/// Serializable description of one filter run. Missing fields take the
/// values of [`FilterConfig::default`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub statistic: Statistic,
    pub size: Option<ParamValue>,
    pub footprint: Option<FootprintConfig>,
    pub origin: ParamValue,
    pub mode: BoundaryMode,
    pub cval: f64,
    /// Chunk shape used to partition the input; `None` lets the caller decide.
    pub chunks: Option<Vec<usize>>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            statistic: Statistic::Median,
            size: Some(ParamValue::Int(3)),
            footprint: None,
            origin: ParamValue::Int(0),
            mode: BoundaryMode::Reflect,
            cval: 0.0,
            chunks: None,
        }
    }
}

impl FilterConfig {
    /// Window arguments for element type `T`.
    ///
    /// Window validity is checked later by the filter itself; only `cval` and
    /// the footprint description are validated here.
    pub fn window_args<T: Sample + NumCast>(&self) -> Result<WindowArgs<T>> {
        let cval = <T as NumCast>::from(self.cval).ok_or_else(|| {
            FilterError::Config(format!("cval {} is not representable", self.cval))
        })?;
        Ok(WindowArgs {
            size: self.size.clone(),
            footprint: self.footprint.as_ref().map(FootprintConfig::build).transpose()?,
            origin: self.origin.clone(),
            mode: self.mode,
            cval,
        })
    }
}

/// Footprint as written in a config file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FootprintConfig {
    /// Full box of the given shape.
    Ones { shape: Vec<usize> },
    /// N-ball of the given radius.
    Ball { ndim: usize, radius: f64 },
    /// Explicit row-major mask.
    Mask { shape: Vec<usize>, values: Vec<bool> },
}

impl FootprintConfig {
    pub fn build(&self) -> Result<Footprint> {
        match self {
            FootprintConfig::Ones { shape } => {
                window_cells(shape)?;
                Ok(Footprint::ones(shape))
            }
            FootprintConfig::Ball { ndim, radius } => {
                if !radius.is_finite() || *radius <= 0.0 {
                    return Err(FilterError::Config(format!(
                        "ball radius must be positive, got {radius}"
                    )));
                }
                // box side 2 * ceil(r) - 1
                let side = (radius.ceil() as usize)
                    .checked_mul(2)
                    .map(|d| d - 1)
                    .filter(|&side| side <= isize::MAX as usize)
                    .ok_or_else(|| {
                        FilterError::Value(format!("ball radius {radius} is too large"))
                    })?;
                window_cells(&vec![side; *ndim])?;
                Ok(Footprint::ball(*ndim, *radius))
            }
            FootprintConfig::Mask { shape, values } => {
                Footprint::from_shape_vec(shape, values.clone())
            }
        }
    }
}

impl fmt::Display for FootprintConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FootprintConfig::Ones { shape } => write!(f, "Box {shape:?}"),
            FootprintConfig::Ball { ndim, radius } => write!(f, "Ball (ndim={ndim}, r={radius})"),
            FootprintConfig::Mask { shape, values } => {
                let active = values.iter().filter(|&&v| v).count();
                write!(f, "Mask {shape:?} ({active} active)")
            }
        }
    }
}
