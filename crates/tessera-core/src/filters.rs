//! Public order-statistic filter entry points.
//!
//! Each filter validates its window before any chunk work starts, then runs
//! the chunk driver with the bundled [`CpuKernel`]. Results keep the input's
//! chunk grid and equal the same filter applied to the unpartitioned array.

use tracing::info;

use crate::boundary::BoundaryMode;
use crate::driver::run_filter;
use crate::error::Result;
use crate::kernel::{CpuKernel, OrderKernel};
use crate::runtime::{ChunkRuntime, ChunkedArray};
use crate::sample::Sample;
use crate::window::{normalize, Footprint, ParamValue, Statistic};

/// Window description shared by all filters.
#[derive(Clone, Debug)]
pub struct WindowArgs<T> {
    pub size: Option<ParamValue>,
    /// Takes precedence over `size` when both are set.
    pub footprint: Option<Footprint>,
    pub origin: ParamValue,
    pub mode: BoundaryMode,
    /// Fill value for [`BoundaryMode::Constant`].
    pub cval: T,
}

impl<T: Sample> Default for WindowArgs<T> {
    fn default() -> Self {
        Self {
            size: None,
            footprint: None,
            origin: ParamValue::Int(0),
            mode: BoundaryMode::Reflect,
            cval: T::zero(),
        }
    }
}

impl<T: Sample> WindowArgs<T> {
    pub fn with_size(size: impl Into<ParamValue>) -> Self {
        Self::default().size(size)
    }

    pub fn with_footprint(footprint: Footprint) -> Self {
        Self::default().footprint(footprint)
    }

    pub fn size(mut self, size: impl Into<ParamValue>) -> Self {
        self.size = Some(size.into());
        self
    }

    pub fn footprint(mut self, footprint: Footprint) -> Self {
        self.footprint = Some(footprint);
        self
    }

    pub fn origin(mut self, origin: impl Into<ParamValue>) -> Self {
        self.origin = origin.into();
        self
    }

    pub fn mode(mut self, mode: BoundaryMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn cval(mut self, cval: T) -> Self {
        self.cval = cval;
        self
    }
}

/// Apply `statistic` over the window with a custom kernel.
pub fn order_filter_with<T, R, K>(
    input: &R,
    kernel: &K,
    statistic: Statistic,
    args: &WindowArgs<T>,
) -> Result<ChunkedArray<T>>
where
    T: Sample,
    R: ChunkRuntime<T> + ?Sized,
    K: OrderKernel<T> + ?Sized,
{
    let window = normalize(
        input.grid().ndim(),
        args.size.as_ref(),
        args.footprint.as_ref(),
        &args.origin,
        statistic,
    )?;

    info!(
        %statistic,
        shape = ?input.grid().shape(),
        footprint = ?window.shape.footprint.shape(),
        origin = ?window.shape.origin,
        mode = %args.mode,
        "Applying order filter"
    );

    run_filter(input, kernel, &window, args.mode, args.cval)
}

pub fn order_filter<T, R>(
    input: &R,
    statistic: Statistic,
    args: &WindowArgs<T>,
) -> Result<ChunkedArray<T>>
where
    T: Sample,
    R: ChunkRuntime<T> + ?Sized,
{
    order_filter_with(input, &CpuKernel, statistic, args)
}

pub fn minimum_filter<T, R>(input: &R, args: &WindowArgs<T>) -> Result<ChunkedArray<T>>
where
    T: Sample,
    R: ChunkRuntime<T> + ?Sized,
{
    order_filter(input, Statistic::Minimum, args)
}

pub fn maximum_filter<T, R>(input: &R, args: &WindowArgs<T>) -> Result<ChunkedArray<T>>
where
    T: Sample,
    R: ChunkRuntime<T> + ?Sized,
{
    order_filter(input, Statistic::Maximum, args)
}

/// Median filter; accepts fractional origins.
pub fn median_filter<T, R>(input: &R, args: &WindowArgs<T>) -> Result<ChunkedArray<T>>
where
    T: Sample,
    R: ChunkRuntime<T> + ?Sized,
{
    order_filter(input, Statistic::Median, args)
}

/// Rank filter selecting the `rank`-th smallest value; accepts fractional origins.
pub fn rank_filter<T, R>(input: &R, rank: i64, args: &WindowArgs<T>) -> Result<ChunkedArray<T>>
where
    T: Sample,
    R: ChunkRuntime<T> + ?Sized,
{
    order_filter(input, Statistic::Rank(rank), args)
}

pub fn percentile_filter<T, R>(
    input: &R,
    percentile: f64,
    args: &WindowArgs<T>,
) -> Result<ChunkedArray<T>>
where
    T: Sample,
    R: ChunkRuntime<T> + ?Sized,
{
    order_filter(input, Statistic::Percentile(percentile), args)
}
