mod common;

use std::sync::atomic::{AtomicUsize, Ordering};

use ndarray::{s, ArrayD, ArrayViewD, Ix2};

use tessera_core::boundary::BoundaryMode;
use tessera_core::error::{ErrorKind, FilterError, Result};
use tessera_core::filters::{median_filter, order_filter, order_filter_with, WindowArgs};
use tessera_core::kernel::{CpuKernel, OrderKernel};
use tessera_core::runtime::{ChunkGrid, ChunkRuntime, ChunkedArray};
use tessera_core::window::{Footprint, HaloSpec, Statistic};

use common::{chunked, compare_statistics, scrambled};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Delegates to [`CpuKernel`] and counts invocations.
#[derive(Default)]
struct CountingKernel {
    calls: AtomicUsize,
}

impl OrderKernel<f64> for CountingKernel {
    fn name(&self) -> &str {
        "counting"
    }

    fn apply(
        &self,
        tile: ArrayViewD<'_, f64>,
        footprint: &Footprint,
        origin: &[isize],
        statistic: Statistic,
        mode: BoundaryMode,
        cval: f64,
    ) -> Result<ArrayD<f64>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        CpuKernel.apply(tile, footprint, origin, statistic, mode, cval)
    }
}

struct FailingKernel;

impl OrderKernel<f64> for FailingKernel {
    fn name(&self) -> &str {
        "failing"
    }

    fn apply(
        &self,
        _tile: ArrayViewD<'_, f64>,
        _footprint: &Footprint,
        _origin: &[isize],
        _statistic: Statistic,
        _mode: BoundaryMode,
        _cval: f64,
    ) -> Result<ArrayD<f64>> {
        Err(FilterError::Kernel("device lost".into()))
    }
}

/// Runtime whose halo extension fails for one chunk.
struct FlakyRuntime {
    inner: ChunkedArray<f64>,
    broken: Vec<usize>,
    requests: AtomicUsize,
    fetches: AtomicUsize,
}

impl FlakyRuntime {
    fn new(inner: ChunkedArray<f64>, broken: Vec<usize>) -> Self {
        Self {
            inner,
            broken,
            requests: AtomicUsize::new(0),
            fetches: AtomicUsize::new(0),
        }
    }
}

impl ChunkRuntime<f64> for FlakyRuntime {
    fn grid(&self) -> &ChunkGrid {
        self.inner.grid()
    }

    fn chunk(&self, chunk: &[usize]) -> Result<ArrayD<f64>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.inner.chunk(chunk)
    }

    fn extend(
        &self,
        chunk: &[usize],
        halo: &HaloSpec,
        mode: BoundaryMode,
        cval: f64,
    ) -> Result<ArrayD<f64>> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if chunk == self.broken.as_slice() {
            return Err(FilterError::HaloExtension(format!("chunk {chunk:?} unavailable")));
        }
        self.inner.extend(chunk, halo, mode, cval)
    }
}

// ---------------------------------------------------------------------------
// Driver behaviour
// ---------------------------------------------------------------------------

#[test]
fn test_kernel_runs_once_per_chunk() {
    let a = scrambled(10, 14);
    let input = chunked(&a);
    let kernel = CountingKernel::default();
    let args = WindowArgs::with_size(3);
    let out = order_filter_with(&input, &kernel, Statistic::Median, &args).unwrap();
    assert_eq!(kernel.calls.load(Ordering::SeqCst), 4);
    let want = order_filter(&input, Statistic::Median, &args).unwrap();
    assert_eq!(out, want);
}

#[test]
fn test_invalid_window_does_no_chunk_work() {
    let input = chunked(&scrambled(10, 14));
    let kernel = CountingKernel::default();
    let args = WindowArgs::with_size(1).origin(1);
    let err = order_filter_with(&input, &kernel, Statistic::Median, &args).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Value);
    assert_eq!(kernel.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_kernel_failure_aborts_call() {
    let input = chunked(&scrambled(10, 14));
    let args = WindowArgs::with_size(3);
    let err = order_filter_with(&input, &FailingKernel, Statistic::Maximum, &args).unwrap_err();
    assert!(matches!(err, FilterError::Kernel(_)), "got {err}");
    assert_eq!(err.kind(), ErrorKind::Runtime);
}

#[test]
fn test_halo_failure_aborts_call() {
    let runtime = FlakyRuntime::new(chunked(&scrambled(10, 14)), vec![1, 0]);
    let err = median_filter(&runtime, &WindowArgs::with_size(3)).unwrap_err();
    assert!(matches!(err, FilterError::HaloExtension(_)), "got {err}");
    assert_eq!(err.kind(), ErrorKind::Runtime);
}

#[test]
fn test_custom_runtime_matches_in_memory_runtime() {
    let inner = chunked(&scrambled(10, 14));
    let runtime = FlakyRuntime::new(inner.clone(), vec![9, 9]);
    let args = WindowArgs::with_size(5).origin((1, -2));
    let got = median_filter(&runtime, &args).unwrap();
    assert_eq!(runtime.requests.load(Ordering::SeqCst), 4);
    assert_eq!(runtime.fetches.load(Ordering::SeqCst), 0);
    assert_eq!(got, median_filter(&inner, &args).unwrap());
}

#[test]
fn test_haloless_window_fetches_plain_chunks() {
    let a = scrambled(10, 14);
    let runtime = FlakyRuntime::new(chunked(&a), vec![9, 9]);
    let got = median_filter(&runtime, &WindowArgs::with_size(1)).unwrap();
    assert_eq!(runtime.fetches.load(Ordering::SeqCst), 4);
    assert_eq!(runtime.requests.load(Ordering::SeqCst), 0);
    assert_eq!(got.to_array(), a.into_dyn());
}

// ---------------------------------------------------------------------------
// Partitionings
// ---------------------------------------------------------------------------

#[test]
fn test_irregular_grid_matches_single_chunk() {
    let a = scrambled(10, 14);
    let grid = ChunkGrid::from_extents(vec![vec![3, 6, 1], vec![1, 6, 7]]).unwrap();
    let tiles = grid
        .chunk_indices()
        .iter()
        .map(|idx| {
            let off = grid.chunk_offset(idx);
            let shape = grid.chunk_shape(idx);
            a.slice(s![off[0]..off[0] + shape[0], off[1]..off[1] + shape[1]])
                .to_owned()
                .into_dyn()
        })
        .collect();
    let input = ChunkedArray::from_chunks(grid, tiles).unwrap();
    assert_eq!(input.to_array(), a.clone().into_dyn());

    let whole = ChunkedArray::single_chunk(&a);
    let args = WindowArgs::with_footprint(common::disk()).origin((-2, 1));
    for stat in compare_statistics() {
        let got = order_filter(&input, stat, &args).unwrap();
        let want = order_filter(&whole, stat, &args).unwrap();
        assert_eq!(got.to_array(), want.to_array(), "{stat}");
    }
}

#[test]
fn test_rechunk_does_not_change_result() {
    let a = scrambled(10, 14);
    let input = chunked(&a);
    let args = WindowArgs::with_size((4, 3)).mode(BoundaryMode::Wrap);
    let base = order_filter(&input, Statistic::Rank(4), &args).unwrap().to_array();
    for chunk in [[1usize, 14], [10, 2], [3, 3]] {
        let rechunked = input.rechunk(&chunk).unwrap();
        let got = order_filter(&rechunked, Statistic::Rank(4), &args).unwrap();
        assert_eq!(got.to_array(), base, "chunks {chunk:?}");
    }
}

#[test]
fn test_integer_samples() {
    let a = scrambled(10, 14).mapv(|v| v as u16);
    let input = ChunkedArray::from_array(&a, &[4, 4]).unwrap();
    let whole = ChunkedArray::single_chunk(&a);
    let args = WindowArgs::with_size(3).mode(BoundaryMode::Constant).cval(500u16);
    let got = order_filter(&input, Statistic::Maximum, &args)
        .unwrap()
        .to_array()
        .into_dimensionality::<Ix2>()
        .unwrap();
    let want = order_filter(&whole, Statistic::Maximum, &args)
        .unwrap()
        .to_array()
        .into_dimensionality::<Ix2>()
        .unwrap();
    assert_eq!(got, want);
    // the border sees the constant fill
    assert_eq!(got[[0, 0]], 500);
    assert!(got[[5, 5]] < 23);
}

#[test]
fn test_from_chunks_rejects_mismatched_tiles() {
    let grid = ChunkGrid::regular(&[4, 4], &[2, 2]).unwrap();
    let tiles = vec![ArrayD::<f64>::zeros(ndarray::IxDyn(&[2, 2])); 3];
    assert!(matches!(
        ChunkedArray::from_chunks(grid.clone(), tiles),
        Err(FilterError::Shape(_))
    ));
    let tiles = vec![ArrayD::<f64>::zeros(ndarray::IxDyn(&[2, 3])); 4];
    assert!(matches!(
        ChunkedArray::from_chunks(grid, tiles),
        Err(FilterError::Shape(_))
    ));
}
