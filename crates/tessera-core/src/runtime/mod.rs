mod chunked;
pub mod grid;

use ndarray::{ArrayD, ArrayViewD, Slice};

use crate::boundary::BoundaryMode;
use crate::error::{FilterError, Result};
use crate::sample::Sample;
use crate::window::HaloSpec;

pub use chunked::ChunkedArray;
pub use grid::ChunkGrid;

/// Chunked-array service the filter driver talks to.
///
/// The driver never sees the global array; it only asks for individual
/// chunks extended by a halo and hands computed tiles back for trimming.
pub trait ChunkRuntime<T: Sample>: Sync {
    fn grid(&self) -> &ChunkGrid;

    /// Owned copy of one chunk, without any halo.
    fn chunk(&self, chunk: &[usize]) -> Result<ArrayD<T>>;

    /// Copy of `chunk` extended by `halo`, with neighbour data where it exists
    /// and `mode`/`cval` beyond the global array edge.
    fn extend(
        &self,
        chunk: &[usize],
        halo: &HaloSpec,
        mode: BoundaryMode,
        cval: T,
    ) -> Result<ArrayD<T>>;

    /// Cut a computed tile down to `shape`, starting at `start`.
    fn trim(&self, tile: ArrayViewD<'_, T>, start: &[usize], shape: &[usize]) -> Result<ArrayD<T>> {
        trim_tile(tile, start, shape)
    }
}

/// Owned copy of the `shape`-sized window of `tile` beginning at `start`.
pub fn trim_tile<T: Sample>(
    tile: ArrayViewD<'_, T>,
    start: &[usize],
    shape: &[usize],
) -> Result<ArrayD<T>> {
    let ndim = tile.ndim();
    if start.len() != ndim || shape.len() != ndim {
        return Err(FilterError::Shape(format!(
            "trim window of rank {}/{} does not match tile rank {ndim}",
            start.len(),
            shape.len()
        )));
    }
    for axis in 0..ndim {
        if start[axis] + shape[axis] > tile.shape()[axis] {
            return Err(FilterError::Shape(format!(
                "trim window {}..{} exceeds tile length {} on axis {axis}",
                start[axis],
                start[axis] + shape[axis],
                tile.shape()[axis]
            )));
        }
    }
    let trimmed = tile.slice_each_axis(|desc| {
        let axis = desc.axis.index();
        Slice::from(start[axis]..start[axis] + shape[axis])
    });
    Ok(trimmed.to_owned())
}
