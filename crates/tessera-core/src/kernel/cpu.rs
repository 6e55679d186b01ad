use ndarray::{ArrayD, ArrayViewD, Axis};
use rayon::prelude::*;

use crate::boundary::{map_index, BoundaryMode};
use crate::consts::PARALLEL_ELEMENT_THRESHOLD;
use crate::error::{FilterError, Result};
use crate::sample::Sample;
use crate::window::{Footprint, Statistic};

use super::OrderKernel;

/// CPU kernel using selection (`select_nth_unstable`) per output element and
/// Rayon for large tiles.
pub struct CpuKernel;

impl<T: Sample> OrderKernel<T> for CpuKernel {
    fn name(&self) -> &str {
        "CPU/Rayon"
    }

    fn apply(
        &self,
        tile: ArrayViewD<'_, T>,
        footprint: &Footprint,
        origin: &[isize],
        statistic: Statistic,
        mode: BoundaryMode,
        cval: T,
    ) -> Result<ArrayD<T>> {
        let ndim = tile.ndim();
        if footprint.ndim() != ndim || origin.len() != ndim {
            return Err(FilterError::Kernel(format!(
                "tile has {ndim} dimensions, footprint {} and origin {}",
                footprint.ndim(),
                origin.len()
            )));
        }
        let count = footprint.count();
        if count == 0 {
            return Err(FilterError::Kernel("footprint has no active cells".into()));
        }
        statistic.validate(count)?;
        let rank = statistic.rank_index(count);

        let contiguous = tile.as_standard_layout();
        let values = contiguous
            .as_slice()
            .ok_or_else(|| FilterError::Kernel("tile is not contiguous".into()))?;

        let offsets = cell_offsets(footprint, origin);
        let gather = WindowGather {
            values,
            shape: contiguous.shape(),
            strides: contiguous.strides(),
            offsets: &offsets,
            mode,
            cval,
            rank,
        };

        let mut out = ArrayD::from_elem(contiguous.raw_dim(), cval);
        if out.len() >= PARALLEL_ELEMENT_THRESHOLD && ndim > 0 {
            // one task per outer-axis lane
            out.axis_iter_mut(Axis(0))
                .into_par_iter()
                .enumerate()
                .for_each(|(outer, mut lane)| {
                    let mut coord = vec![0isize; ndim];
                    let mut buf = Vec::with_capacity(count);
                    coord[0] = outer as isize;
                    for (rest, v) in lane.indexed_iter_mut() {
                        for axis in 1..ndim {
                            coord[axis] = rest[axis - 1] as isize;
                        }
                        *v = gather.select(&coord, &mut buf);
                    }
                });
        } else {
            let mut coord = vec![0isize; ndim];
            let mut buf = Vec::with_capacity(count);
            for (idx, v) in out.indexed_iter_mut() {
                for axis in 0..ndim {
                    coord[axis] = idx[axis] as isize;
                }
                *v = gather.select(&coord, &mut buf);
            }
        }

        Ok(out)
    }
}

/// Relative read offsets of every active footprint cell for an output
/// element: `cell - half - origin` per axis.
fn cell_offsets(footprint: &Footprint, origin: &[isize]) -> Vec<Vec<isize>> {
    let half: Vec<isize> = footprint.shape().iter().map(|&n| (n / 2) as isize).collect();
    footprint
        .cells()
        .into_iter()
        .map(|cell| {
            cell.iter()
                .zip(half.iter().zip(origin))
                .map(|(&c, (&h, &o))| c as isize - h - o)
                .collect()
        })
        .collect()
}

struct WindowGather<'a, T> {
    values: &'a [T],
    shape: &'a [usize],
    /// Element strides of `values`, as reported by ndarray.
    strides: &'a [isize],
    offsets: &'a [Vec<isize>],
    mode: BoundaryMode,
    cval: T,
    rank: usize,
}

impl<T: Sample> WindowGather<'_, T> {
    fn select(&self, coord: &[isize], buf: &mut Vec<T>) -> T {
        buf.clear();
        'cells: for offset in self.offsets {
            let mut idx = 0isize;
            for (axis, &d) in offset.iter().enumerate() {
                match map_index(coord[axis] + d, self.shape[axis], self.mode) {
                    Some(m) => idx += m as isize * self.strides[axis],
                    None => {
                        buf.push(self.cval);
                        continue 'cells;
                    }
                }
            }
            buf.push(self.values[idx as usize]);
        }

        *buf.select_nth_unstable_by(self.rank, |a, b| a.order(b)).1
    }
}
