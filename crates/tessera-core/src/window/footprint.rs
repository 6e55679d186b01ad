use ndarray::{ArrayD, IxDyn};

use crate::error::{FilterError, Result};

/// Number of cells in a window of `shape`, or a `Value` error when the box
/// cannot be allocated as an array.
pub fn window_cells(shape: &[usize]) -> Result<usize> {
    shape
        .iter()
        .try_fold(1usize, |acc, &len| acc.checked_mul(len))
        .filter(|&cells| cells <= isize::MAX as usize)
        .ok_or_else(|| FilterError::Value(format!("window {shape:?} is too large")))
}

/// Boolean neighbourhood mask; `true` cells take part in the order statistic.
#[derive(Clone, Debug, PartialEq)]
pub struct Footprint {
    mask: ArrayD<bool>,
}

impl Footprint {
    /// Full box of the given extent.
    pub fn ones(shape: &[usize]) -> Self {
        Self {
            mask: ArrayD::from_elem(IxDyn(shape), true),
        }
    }

    /// N-ball: cells whose squared offset from the centre is `< radius²`.
    ///
    /// The box half-extent is the largest integer strictly inside `radius`,
    /// so a radius of 2.5 yields a 5x5 (in 2-D) disk.
    pub fn ball(ndim: usize, radius: f64) -> Self {
        let half = (radius.ceil() as isize - 1).max(0) as usize;
        let side = 2 * half + 1;
        let r2 = radius * radius;
        let mask = ArrayD::from_shape_fn(IxDyn(&vec![side; ndim]), |idx| {
            let dist2: f64 = (0..ndim)
                .map(|axis| {
                    let d = idx[axis] as f64 - half as f64;
                    d * d
                })
                .sum();
            dist2 < r2
        });
        Self { mask }
    }

    pub fn from_mask(mask: ArrayD<bool>) -> Self {
        Self { mask }
    }

    /// Build from a row-major list of cells.
    pub fn from_shape_vec(shape: &[usize], values: Vec<bool>) -> Result<Self> {
        let expected: usize = shape.iter().product();
        if values.len() != expected {
            return Err(FilterError::Config(format!(
                "footprint mask has {} cells but shape {:?} needs {}",
                values.len(),
                shape,
                expected
            )));
        }
        let mask = ArrayD::from_shape_vec(IxDyn(shape), values)
            .map_err(|e| FilterError::Config(e.to_string()))?;
        Ok(Self { mask })
    }

    pub fn mask(&self) -> &ArrayD<bool> {
        &self.mask
    }

    pub fn ndim(&self) -> usize {
        self.mask.ndim()
    }

    pub fn shape(&self) -> &[usize] {
        self.mask.shape()
    }

    /// Number of participating cells.
    pub fn count(&self) -> usize {
        self.mask.iter().filter(|&&v| v).count()
    }

    /// Box coordinates of every `true` cell, in row-major order.
    pub fn cells(&self) -> Vec<Vec<usize>> {
        self.mask
            .indexed_iter()
            .filter(|(_, &v)| v)
            .map(|(idx, _)| (0..self.ndim()).map(|axis| idx[axis]).collect())
            .collect()
    }
}
