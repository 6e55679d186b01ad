use tracing::debug;

use crate::consts::ORIGIN_ROUNDING_THRESHOLD;
use crate::error::{FilterError, Result};

use super::footprint::{window_cells, Footprint};
use super::param::ParamValue;
use super::statistic::Statistic;

/// Canonical, validated description of a filter window.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterShape {
    pub ndim: usize,
    pub footprint: Footprint,
    /// Per-axis origin as supplied, possibly fractional.
    pub origin: Vec<f64>,
    pub statistic: Statistic,
}

/// Per-axis halo widths a chunk must be extended by.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HaloSpec {
    pub before: Vec<usize>,
    pub after: Vec<usize>,
}

impl HaloSpec {
    pub fn zero(ndim: usize) -> Self {
        Self {
            before: vec![0; ndim],
            after: vec![0; ndim],
        }
    }

    pub fn ndim(&self) -> usize {
        self.before.len()
    }

    pub fn is_empty(&self) -> bool {
        self.before.iter().chain(&self.after).all(|&w| w == 0)
    }

    /// Shape of a tile of `shape` after extension.
    pub fn extended_shape(&self, shape: &[usize]) -> Vec<usize> {
        shape
            .iter()
            .zip(self.before.iter().zip(&self.after))
            .map(|(&len, (&b, &a))| len + b + a)
            .collect()
    }
}

/// Realises fractional origins as a shift of the output selection window.
///
/// The kernel always runs at `base` (the floored origin); taking the output
/// one element earlier along an axis with `shift == 1` yields the result for
/// origin `base + 1`.
#[derive(Clone, Debug, PartialEq)]
pub struct AlignmentShift {
    pub base: Vec<isize>,
    pub shift: Vec<usize>,
    /// `origin - (base + shift)`, in `(-0.5, 0.5]`.
    pub remainder: Vec<f64>,
}

impl AlignmentShift {
    /// True if no axis needs an output shift.
    pub fn is_aligned(&self) -> bool {
        self.shift.iter().all(|&s| s == 0)
    }

    /// Integer origin the output ends up centred on.
    pub fn effective_origin(&self) -> Vec<isize> {
        self.base
            .iter()
            .zip(&self.shift)
            .map(|(&b, &s)| b + s as isize)
            .collect()
    }
}

/// Everything the driver needs for one filter invocation.
#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedWindow {
    pub shape: FilterShape,
    pub halo: HaloSpec,
    pub alignment: AlignmentShift,
}

impl NormalizedWindow {
    /// Start of the output selection inside a computed, halo-extended tile.
    pub fn selection_start(&self) -> Vec<usize> {
        self.halo
            .before
            .iter()
            .zip(&self.alignment.shift)
            .map(|(&b, &s)| b - s)
            .collect()
    }
}

/// Validate and canonicalise the window parameters of one filter call.
///
/// Checks run in a fixed order so the same malformed input always yields the
/// same error kind: footprint resolution, origin coercion, origin range,
/// fractional-origin support, statistic selector.
pub fn normalize(
    ndim: usize,
    size: Option<&ParamValue>,
    footprint: Option<&Footprint>,
    origin: &ParamValue,
    statistic: Statistic,
) -> Result<NormalizedWindow> {
    let footprint = resolve_footprint(ndim, size, footprint)?;
    let origin = coerce_origin(ndim, origin)?;
    check_origin_range(&footprint, &origin)?;

    if !statistic.accepts_fractional_origin() {
        if let Some(o) = origin.iter().find(|o| o.fract() != 0.0) {
            return Err(FilterError::Type(format!(
                "{statistic} filter requires integer origins, got {o}"
            )));
        }
    }

    let count = footprint.count();
    statistic.validate(count)?;

    let alignment = derive_alignment(&origin);
    let halo = derive_halo(&footprint, &alignment);

    debug!(
        footprint = ?footprint.shape(),
        cells = count,
        origin = ?origin,
        before = ?halo.before,
        after = ?halo.after,
        shift = ?alignment.shift,
        "Filter window normalized"
    );

    Ok(NormalizedWindow {
        shape: FilterShape {
            ndim,
            footprint,
            origin,
            statistic,
        },
        halo,
        alignment,
    })
}

/// Pick the footprint: an explicit mask wins, otherwise a box of `size`.
pub fn resolve_footprint(
    ndim: usize,
    size: Option<&ParamValue>,
    footprint: Option<&Footprint>,
) -> Result<Footprint> {
    let footprint = match (footprint, size) {
        (Some(fp), _) => fp.clone(),
        (None, Some(size)) => Footprint::ones(&coerce_size(ndim, size)?),
        (None, None) => {
            return Err(FilterError::Shape(
                "no window specified: provide either size or footprint".into(),
            ))
        }
    };

    if footprint.ndim() != ndim {
        return Err(FilterError::Shape(format!(
            "footprint has {} dimensions but the array has {ndim}",
            footprint.ndim()
        )));
    }
    if footprint.shape().contains(&0) {
        return Err(FilterError::Shape(format!(
            "footprint shape {:?} has a zero-length axis",
            footprint.shape()
        )));
    }
    window_cells(footprint.shape())?;
    if footprint.count() == 0 {
        return Err(FilterError::Shape("footprint has no active cells".into()));
    }
    Ok(footprint)
}

/// Coerce `size` to `ndim` positive window extents.
pub fn coerce_size(ndim: usize, size: &ParamValue) -> Result<Vec<usize>> {
    let extents = match size {
        ParamValue::Seq(items) => {
            if items.len() != ndim {
                return Err(FilterError::Shape(format!(
                    "size has {} entries but the array has {ndim} dimensions",
                    items.len()
                )));
            }
            items.iter().map(size_extent).collect::<Result<Vec<_>>>()?
        }
        scalar => vec![size_extent(scalar)?; ndim],
    };
    window_cells(&extents)?;
    Ok(extents)
}

fn size_extent(value: &ParamValue) -> Result<usize> {
    match value {
        ParamValue::Int(n) if *n >= 1 => usize::try_from(*n)
            .map_err(|_| FilterError::Value(format!("window extent {n} is too large"))),
        ParamValue::Int(n) => Err(FilterError::Shape(format!(
            "window extent must be at least 1, got {n}"
        ))),
        ParamValue::Seq(_) => Err(FilterError::Shape(
            "size entries must be scalars, not sequences".into(),
        )),
        other => Err(FilterError::Type(format!(
            "window size must be an integer, got a {}",
            other.kind_name()
        ))),
    }
}

/// Coerce `origin` to `ndim` real offsets.
pub fn coerce_origin(ndim: usize, origin: &ParamValue) -> Result<Vec<f64>> {
    if origin.contains_complex() {
        return Err(FilterError::Type("origin must be real-valued".into()));
    }
    let values = match origin {
        ParamValue::Seq(items) => {
            if items.iter().any(|item| !item.is_scalar()) {
                return Err(FilterError::Shape(
                    "origin must be a scalar or a flat sequence".into(),
                ));
            }
            if items.len() != ndim {
                return Err(FilterError::Shape(format!(
                    "origin has {} entries but the array has {ndim} dimensions",
                    items.len()
                )));
            }
            items.iter().map(origin_scalar).collect()
        }
        scalar => vec![origin_scalar(scalar); ndim],
    };
    if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
        return Err(FilterError::Value(format!("origin must be finite, got {bad}")));
    }
    Ok(values)
}

fn origin_scalar(value: &ParamValue) -> f64 {
    match value {
        ParamValue::Int(n) => *n as f64,
        ParamValue::Float(f) => *f,
        // complex and nested values are rejected before this point
        ParamValue::Complex(c) => c.re,
        ParamValue::Seq(_) => f64::NAN,
    }
}

/// The truncated origin must keep the anchor inside the footprint's radius.
pub fn check_origin_range(footprint: &Footprint, origin: &[f64]) -> Result<()> {
    for (axis, (&len, &o)) in footprint.shape().iter().zip(origin).enumerate() {
        let half = (len / 2) as f64;
        if o.trunc().abs() > half {
            return Err(FilterError::Value(format!(
                "origin {o} on axis {axis} is outside [-{half}, {half}] for a window of length {len}"
            )));
        }
    }
    Ok(())
}

fn derive_alignment(origin: &[f64]) -> AlignmentShift {
    let mut base = Vec::with_capacity(origin.len());
    let mut shift = Vec::with_capacity(origin.len());
    let mut remainder = Vec::with_capacity(origin.len());
    for &o in origin {
        let floor = o.floor();
        let s = if o - floor > ORIGIN_ROUNDING_THRESHOLD { 1 } else { 0 };
        base.push(floor as isize);
        shift.push(s);
        remainder.push(o - (floor + s as f64));
    }
    AlignmentShift {
        base,
        shift,
        remainder,
    }
}

fn derive_halo(footprint: &Footprint, alignment: &AlignmentShift) -> HaloSpec {
    let effective = alignment.effective_origin();
    let mut before = Vec::with_capacity(effective.len());
    let mut after = Vec::with_capacity(effective.len());
    for ((&len, &e), &shift) in footprint.shape().iter().zip(&effective).zip(&alignment.shift) {
        let len = len as isize;
        let half = len / 2;
        // the shifted output selection itself must lie inside the tile
        before.push((half + e).max(shift as isize).max(0) as usize);
        after.push((len - 1 - half - e).max(0) as usize);
    }
    HaloSpec { before, after }
}
