use ndarray::{ArrayD, IxDyn};
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::boundary::BoundaryMode;
use crate::consts::PARALLEL_CHUNK_THRESHOLD;
use crate::error::Result;
use crate::kernel::OrderKernel;
use crate::runtime::{ChunkRuntime, ChunkedArray};
use crate::sample::Sample;
use crate::window::NormalizedWindow;

/// Run a normalized order filter over every chunk of `runtime`.
///
/// Chunks are independent tasks: each is extended by the halo, filtered at the
/// floored integer origin, then trimmed back to its own shape with the
/// alignment shift applied. Any chunk failure aborts the whole call.
pub fn run_filter<T, R, K>(
    runtime: &R,
    kernel: &K,
    window: &NormalizedWindow,
    mode: BoundaryMode,
    cval: T,
) -> Result<ChunkedArray<T>>
where
    T: Sample,
    R: ChunkRuntime<T> + ?Sized,
    K: OrderKernel<T> + ?Sized,
{
    let grid = runtime.grid();
    let indices = grid.chunk_indices();

    debug!(
        kernel = kernel.name(),
        chunks = indices.len(),
        grid = ?grid.grid_shape(),
        %mode,
        "Dispatching chunk filters"
    );

    let process = |idx: &Vec<usize>| filter_chunk(runtime, kernel, window, idx, mode, cval);
    let tiles: Vec<ArrayD<T>> = if indices.len() >= PARALLEL_CHUNK_THRESHOLD {
        indices.par_iter().map(process).collect::<Result<_>>()?
    } else {
        indices.iter().map(process).collect::<Result<_>>()?
    };

    ChunkedArray::from_chunks(grid.clone(), tiles)
}

fn filter_chunk<T, R, K>(
    runtime: &R,
    kernel: &K,
    window: &NormalizedWindow,
    idx: &[usize],
    mode: BoundaryMode,
    cval: T,
) -> Result<ArrayD<T>>
where
    T: Sample,
    R: ChunkRuntime<T> + ?Sized,
    K: OrderKernel<T> + ?Sized,
{
    let chunk_shape = runtime.grid().chunk_shape(idx);
    if chunk_shape.contains(&0) {
        return Ok(ArrayD::zeros(IxDyn(&chunk_shape)));
    }

    let extended = if window.halo.is_empty() {
        runtime.chunk(idx)?
    } else {
        runtime.extend(idx, &window.halo, mode, cval)?
    };
    let computed = kernel.apply(
        extended.view(),
        &window.shape.footprint,
        &window.alignment.base,
        window.shape.statistic,
        mode,
        cval,
    )?;
    let start = window.selection_start();
    trace!(chunk = ?idx, extended = ?extended.shape(), start = ?start, "Chunk filtered");

    runtime.trim(computed.view(), &start, &chunk_shape)
}
