pub mod cpu;

use ndarray::{ArrayD, ArrayViewD};

use crate::boundary::BoundaryMode;
use crate::error::Result;
use crate::sample::Sample;
use crate::window::{Footprint, Statistic};

pub use cpu::CpuKernel;

/// Per-tile order-statistic computation.
///
/// Implementations return a tile with the same shape as `tile` where each
/// element holds the selected statistic over the footprint placed at that
/// element with the given integer `origin`. Reads beyond the tile follow
/// `mode`/`cval`.
pub trait OrderKernel<T: Sample>: Send + Sync {
    fn name(&self) -> &str;

    fn apply(
        &self,
        tile: ArrayViewD<'_, T>,
        footprint: &Footprint,
        origin: &[isize],
        statistic: Statistic,
        mode: BoundaryMode,
        cval: T,
    ) -> Result<ArrayD<T>>;
}
