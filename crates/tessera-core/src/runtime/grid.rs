use crate::error::{FilterError, Result};

/// Rectangular partition of an N-dimensional array into chunks.
///
/// Each axis is split into an ordered list of extents; chunks are addressed by
/// their position in the grid (one index per axis).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkGrid {
    extents: Vec<Vec<usize>>,
    /// Prefix sums of `extents`, one longer than each extent list.
    offsets: Vec<Vec<usize>>,
}

impl ChunkGrid {
    /// Regular grid: every chunk has `chunk_shape` except the trailing one on
    /// each axis, which may be shorter.
    pub fn regular(shape: &[usize], chunk_shape: &[usize]) -> Result<Self> {
        if shape.len() != chunk_shape.len() {
            return Err(FilterError::Shape(format!(
                "chunk shape {chunk_shape:?} does not match array rank {}",
                shape.len()
            )));
        }
        if let Some(axis) = chunk_shape.iter().position(|&c| c == 0) {
            return Err(FilterError::Shape(format!(
                "chunk extent on axis {axis} must be positive"
            )));
        }
        let extents = shape
            .iter()
            .zip(chunk_shape)
            .map(|(&len, &step)| {
                if len == 0 {
                    return vec![0];
                }
                (0..len).step_by(step).map(|start| step.min(len - start)).collect()
            })
            .collect();
        Self::from_extents(extents)
    }

    /// Grid from explicit per-axis extents, e.g. `[[5, 5], [7, 7]]`.
    pub fn from_extents(extents: Vec<Vec<usize>>) -> Result<Self> {
        for (axis, ext) in extents.iter().enumerate() {
            if ext.is_empty() {
                return Err(FilterError::Shape(format!("axis {axis} has no chunks")));
            }
            if ext.len() > 1 && ext.contains(&0) {
                return Err(FilterError::Shape(format!(
                    "axis {axis} has a zero-length chunk among {ext:?}"
                )));
            }
        }
        let offsets = extents
            .iter()
            .map(|ext| {
                let mut acc = 0;
                std::iter::once(0)
                    .chain(ext.iter().map(|&e| {
                        acc += e;
                        acc
                    }))
                    .collect()
            })
            .collect();
        Ok(Self { extents, offsets })
    }

    /// Grid with a single chunk covering `shape`.
    pub fn single(shape: &[usize]) -> Self {
        let extents: Vec<Vec<usize>> = shape.iter().map(|&len| vec![len]).collect();
        let offsets = shape.iter().map(|&len| vec![0, len]).collect();
        Self { extents, offsets }
    }

    pub fn ndim(&self) -> usize {
        self.extents.len()
    }

    /// Chunk extents along `axis`.
    pub fn extents(&self, axis: usize) -> &[usize] {
        &self.extents[axis]
    }

    /// Global array shape.
    pub fn shape(&self) -> Vec<usize> {
        self.offsets.iter().map(|o| o[o.len() - 1]).collect()
    }

    /// Number of chunks along each axis.
    pub fn grid_shape(&self) -> Vec<usize> {
        self.extents.iter().map(Vec::len).collect()
    }

    pub fn num_chunks(&self) -> usize {
        self.extents.iter().map(Vec::len).product()
    }

    /// Row-major position of a chunk in the chunk list, or `None` if out of range.
    pub fn flat_index(&self, chunk: &[usize]) -> Option<usize> {
        if chunk.len() != self.ndim() {
            return None;
        }
        let mut flat = 0;
        for (&c, ext) in chunk.iter().zip(&self.extents) {
            if c >= ext.len() {
                return None;
            }
            flat = flat * ext.len() + c;
        }
        Some(flat)
    }

    /// Global coordinate of the chunk's first element.
    pub fn chunk_offset(&self, chunk: &[usize]) -> Vec<usize> {
        chunk
            .iter()
            .zip(&self.offsets)
            .map(|(&c, o)| o[c])
            .collect()
    }

    pub fn chunk_shape(&self, chunk: &[usize]) -> Vec<usize> {
        chunk
            .iter()
            .zip(&self.extents)
            .map(|(&c, e)| e[c])
            .collect()
    }

    /// Chunk index along `axis` holding global coordinate `g`, with the local
    /// coordinate inside that chunk.
    pub fn locate(&self, axis: usize, g: usize) -> Option<(usize, usize)> {
        let offsets = &self.offsets[axis];
        if g >= offsets[offsets.len() - 1] {
            return None;
        }
        let chunk = offsets.partition_point(|&o| o <= g) - 1;
        Some((chunk, g - offsets[chunk]))
    }

    /// All chunk indices in row-major order.
    pub fn chunk_indices(&self) -> Vec<Vec<usize>> {
        let grid = self.grid_shape();
        let total = self.num_chunks();
        let mut indices = Vec::with_capacity(total);
        let mut current = vec![0usize; grid.len()];
        for _ in 0..total {
            indices.push(current.clone());
            for axis in (0..grid.len()).rev() {
                current[axis] += 1;
                if current[axis] < grid[axis] {
                    break;
                }
                current[axis] = 0;
            }
        }
        indices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regular_grid_trailing_chunk() {
        let grid = ChunkGrid::regular(&[10, 14], &[4, 7]).unwrap();
        assert_eq!(grid.extents(0), &[4, 4, 2]);
        assert_eq!(grid.extents(1), &[7, 7]);
        assert_eq!(grid.shape(), vec![10, 14]);
        assert_eq!(grid.grid_shape(), vec![3, 2]);
        assert_eq!(grid.num_chunks(), 6);
        assert_eq!(grid.chunk_offset(&[2, 1]), vec![8, 7]);
        assert_eq!(grid.chunk_shape(&[2, 1]), vec![2, 7]);
    }

    #[test]
    fn test_locate_and_flat_index() {
        let grid = ChunkGrid::from_extents(vec![vec![3, 1, 6]]).unwrap();
        assert_eq!(grid.locate(0, 0), Some((0, 0)));
        assert_eq!(grid.locate(0, 3), Some((1, 0)));
        assert_eq!(grid.locate(0, 9), Some((2, 5)));
        assert_eq!(grid.locate(0, 10), None);
        assert_eq!(grid.flat_index(&[2]), Some(2));
        assert_eq!(grid.flat_index(&[3]), None);
    }

    #[test]
    fn test_chunk_indices_row_major() {
        let grid = ChunkGrid::regular(&[4, 6], &[2, 3]).unwrap();
        assert_eq!(
            grid.chunk_indices(),
            vec![vec![0, 0], vec![0, 1], vec![1, 0], vec![1, 1]]
        );
        assert_eq!(ChunkGrid::single(&[]).chunk_indices(), vec![Vec::<usize>::new()]);
    }

    #[test]
    fn test_rejects_bad_grids() {
        assert!(matches!(
            ChunkGrid::regular(&[4, 4], &[2]),
            Err(FilterError::Shape(_))
        ));
        assert!(matches!(
            ChunkGrid::regular(&[4], &[0]),
            Err(FilterError::Shape(_))
        ));
        assert!(matches!(
            ChunkGrid::from_extents(vec![vec![]]),
            Err(FilterError::Shape(_))
        ));
        assert!(matches!(
            ChunkGrid::from_extents(vec![vec![2, 0]]),
            Err(FilterError::Shape(_))
        ));
    }

    #[test]
    fn test_empty_axis_has_single_empty_chunk() {
        let grid = ChunkGrid::regular(&[0, 3], &[2, 2]).unwrap();
        assert_eq!(grid.extents(0), &[0]);
        assert_eq!(grid.num_chunks(), 2);
        assert_eq!(grid.locate(0, 0), None);
    }
}
