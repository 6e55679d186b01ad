use ndarray::{ArrayBase, ArrayD, Data, Dimension, IxDyn, Slice};

use crate::boundary::{map_index, BoundaryMode};
use crate::error::{FilterError, Result};
use crate::sample::Sample;
use crate::window::HaloSpec;

use super::grid::ChunkGrid;
use super::ChunkRuntime;

/// In-memory chunked array: a chunk grid plus one owned tile per chunk,
/// stored in row-major chunk order.
#[derive(Clone, Debug, PartialEq)]
pub struct ChunkedArray<T> {
    grid: ChunkGrid,
    chunks: Vec<ArrayD<T>>,
}

impl<T: Sample> ChunkedArray<T> {
    /// Partition `array` into chunks of `chunk_shape`.
    pub fn from_array<S, D>(array: &ArrayBase<S, D>, chunk_shape: &[usize]) -> Result<Self>
    where
        S: Data<Elem = T>,
        D: Dimension,
    {
        let view = array.view().into_dyn();
        let grid = ChunkGrid::regular(view.shape(), chunk_shape)?;
        let chunks = grid
            .chunk_indices()
            .iter()
            .map(|idx| {
                let offset = grid.chunk_offset(idx);
                let shape = grid.chunk_shape(idx);
                view.slice_each_axis(|desc| {
                    let axis = desc.axis.index();
                    Slice::from(offset[axis]..offset[axis] + shape[axis])
                })
                .to_owned()
            })
            .collect();
        Ok(Self { grid, chunks })
    }

    /// Whole array as one chunk.
    pub fn single_chunk<S, D>(array: &ArrayBase<S, D>) -> Self
    where
        S: Data<Elem = T>,
        D: Dimension,
    {
        let tile = array.view().into_dyn().to_owned();
        Self {
            grid: ChunkGrid::single(tile.shape()),
            chunks: vec![tile],
        }
    }

    /// Assemble from tiles already laid out on `grid` in row-major order.
    pub fn from_chunks(grid: ChunkGrid, chunks: Vec<ArrayD<T>>) -> Result<Self> {
        let indices = grid.chunk_indices();
        if indices.len() != chunks.len() {
            return Err(FilterError::Shape(format!(
                "grid has {} chunks but {} tiles were supplied",
                indices.len(),
                chunks.len()
            )));
        }
        for (idx, tile) in indices.iter().zip(&chunks) {
            let expected = grid.chunk_shape(idx);
            if tile.shape() != expected.as_slice() {
                return Err(FilterError::Shape(format!(
                    "tile for chunk {idx:?} has shape {:?}, expected {expected:?}",
                    tile.shape()
                )));
            }
        }
        Ok(Self { grid, chunks })
    }

    pub fn shape(&self) -> Vec<usize> {
        self.grid.shape()
    }

    pub fn ndim(&self) -> usize {
        self.grid.ndim()
    }

    pub fn chunks(&self) -> &[ArrayD<T>] {
        &self.chunks
    }

    /// Materialise the global array.
    pub fn to_array(&self) -> ArrayD<T> {
        let mut out = ArrayD::zeros(IxDyn(&self.grid.shape()));
        for (idx, tile) in self.grid.chunk_indices().iter().zip(&self.chunks) {
            let offset = self.grid.chunk_offset(idx);
            out.slice_each_axis_mut(|desc| {
                let axis = desc.axis.index();
                Slice::from(offset[axis]..offset[axis] + tile.shape()[axis])
            })
            .assign(tile);
        }
        out
    }

    /// Same data on a different regular grid.
    pub fn rechunk(&self, chunk_shape: &[usize]) -> Result<Self> {
        Self::from_array(&self.to_array(), chunk_shape)
    }
}

impl<T: Sample> ChunkRuntime<T> for ChunkedArray<T> {
    fn grid(&self) -> &ChunkGrid {
        &self.grid
    }

    fn chunk(&self, chunk: &[usize]) -> Result<ArrayD<T>> {
        self.grid
            .flat_index(chunk)
            .map(|flat| self.chunks[flat].clone())
            .ok_or_else(|| {
                FilterError::Shape(format!(
                    "chunk {chunk:?} is outside grid {:?}",
                    self.grid.grid_shape()
                ))
            })
    }

    fn extend(
        &self,
        chunk: &[usize],
        halo: &HaloSpec,
        mode: BoundaryMode,
        cval: T,
    ) -> Result<ArrayD<T>> {
        let ndim = self.grid.ndim();
        if self.grid.flat_index(chunk).is_none() {
            return Err(FilterError::HaloExtension(format!(
                "chunk {chunk:?} is outside grid {:?}",
                self.grid.grid_shape()
            )));
        }
        if halo.ndim() != ndim {
            return Err(FilterError::HaloExtension(format!(
                "halo of rank {} for an array of rank {ndim}",
                halo.ndim()
            )));
        }

        let shape = self.grid.shape();
        let offset = self.grid.chunk_offset(chunk);
        let extended = halo.extended_shape(&self.grid.chunk_shape(chunk));

        // Per axis: source (chunk, local) for every extended position, or
        // `None` where the constant fill applies.
        let mut sources: Vec<Vec<Option<(usize, usize)>>> = Vec::with_capacity(ndim);
        for axis in 0..ndim {
            let start = offset[axis] as isize - halo.before[axis] as isize;
            let mut axis_sources = Vec::with_capacity(extended[axis]);
            for t in 0..extended[axis] {
                let g = start + t as isize;
                let source = match map_index(g, shape[axis], mode) {
                    Some(m) => Some(self.grid.locate(axis, m).ok_or_else(|| {
                        FilterError::HaloExtension(format!(
                            "coordinate {m} is outside axis {axis} of length {}",
                            shape[axis]
                        ))
                    })?),
                    None if mode == BoundaryMode::Constant => None,
                    None => {
                        return Err(FilterError::HaloExtension(format!(
                            "cannot extend through empty axis {axis} with {mode} boundary"
                        )))
                    }
                };
                axis_sources.push(source);
            }
            sources.push(axis_sources);
        }

        let grid_shape = self.grid.grid_shape();
        let mut local = vec![0usize; ndim];
        let tile = ArrayD::from_shape_fn(IxDyn(&extended), |idx| {
            let mut flat = 0;
            for axis in 0..ndim {
                match sources[axis][idx[axis]] {
                    Some((c, l)) => {
                        flat = flat * grid_shape[axis] + c;
                        local[axis] = l;
                    }
                    None => return cval,
                }
            }
            self.chunks[flat][&local[..]]
        });
        Ok(tile)
    }
}
