#![allow(dead_code)]

use ndarray::Array2;

use tessera_core::boundary::BoundaryMode;
use tessera_core::error::Result;
use tessera_core::filters::{
    maximum_filter, median_filter, minimum_filter, percentile_filter, rank_filter, WindowArgs,
};
use tessera_core::runtime::ChunkedArray;
use tessera_core::window::{Footprint, Statistic};

/// `arange(140.0).reshape(10, 14)`.
pub fn ramp() -> Array2<f64> {
    Array2::from_shape_fn((10, 14), |(r, c)| (r * 14 + c) as f64)
}

/// Pseudo-random values with repeats, so ties and unsorted windows are exercised.
pub fn scrambled(h: usize, w: usize) -> Array2<f64> {
    Array2::from_shape_fn((h, w), |(r, c)| ((r * 37 + c * 11 + r * c * 5) % 23) as f64)
}

/// `ramp()` split into `(5, 7)` chunks.
pub fn chunked(a: &Array2<f64>) -> ChunkedArray<f64> {
    ChunkedArray::from_array(a, &[5, 7]).expect("chunk (5, 7)")
}

/// `(mgrid[-2:3, -2:3] ** 2).sum(0) < 2.5 ** 2`
pub fn disk_mask() -> Array2<bool> {
    Array2::from_shape_fn((5, 5), |(r, c)| {
        let dr = r as f64 - 2.0;
        let dc = c as f64 - 2.0;
        dr * dr + dc * dc < 2.5 * 2.5
    })
}

pub fn disk() -> Footprint {
    Footprint::from_mask(disk_mask().into_dyn())
}

/// Statistics exercised by the comparison scenarios.
pub fn compare_statistics() -> Vec<Statistic> {
    vec![
        Statistic::Minimum,
        Statistic::Median,
        Statistic::Maximum,
        Statistic::Rank(1),
        Statistic::Percentile(10.0),
    ]
}

/// Statistics exercised by the validation scenarios.
pub fn validation_statistics() -> Vec<Statistic> {
    vec![
        Statistic::Minimum,
        Statistic::Median,
        Statistic::Maximum,
        Statistic::Rank(0),
        Statistic::Percentile(0.0),
    ]
}

/// Dispatch through the dedicated public entry point for `stat`.
pub fn apply(
    stat: Statistic,
    input: &ChunkedArray<f64>,
    args: &WindowArgs<f64>,
) -> Result<ChunkedArray<f64>> {
    match stat {
        Statistic::Minimum => minimum_filter(input, args),
        Statistic::Maximum => maximum_filter(input, args),
        Statistic::Median => median_filter(input, args),
        Statistic::Rank(k) => rank_filter(input, k, args),
        Statistic::Percentile(p) => percentile_filter(input, p, args),
    }
}

fn fold_reflect(mut i: isize, n: isize) -> usize {
    loop {
        if i < 0 {
            i = -i - 1;
        } else if i >= n {
            i = 2 * n - 1 - i;
        } else {
            return i as usize;
        }
    }
}

fn fold_mirror(mut i: isize, n: isize) -> usize {
    if n == 1 {
        return 0;
    }
    loop {
        if i < 0 {
            i = -i;
        } else if i >= n {
            i = 2 * n - 2 - i;
        } else {
            return i as usize;
        }
    }
}

fn fetch(a: &Array2<f64>, r: isize, c: isize, mode: BoundaryMode, cval: f64) -> f64 {
    let (h, w) = (a.nrows() as isize, a.ncols() as isize);
    let (rr, cc) = match mode {
        BoundaryMode::Reflect => (fold_reflect(r, h), fold_reflect(c, w)),
        BoundaryMode::Mirror => (fold_mirror(r, h), fold_mirror(c, w)),
        BoundaryMode::Nearest => (r.clamp(0, h - 1) as usize, c.clamp(0, w - 1) as usize),
        BoundaryMode::Wrap => (r.rem_euclid(h) as usize, c.rem_euclid(w) as usize),
        BoundaryMode::Constant => {
            if r < 0 || r >= h || c < 0 || c >= w {
                return cval;
            }
            (r as usize, c as usize)
        }
    };
    a[[rr, cc]]
}

fn pick(values: &mut [f64], stat: Statistic) -> f64 {
    values.sort_by(|x, y| x.partial_cmp(y).unwrap());
    let n = values.len();
    let idx = match stat {
        Statistic::Minimum => 0,
        Statistic::Maximum => n - 1,
        Statistic::Median => n / 2,
        Statistic::Rank(k) => k as usize,
        Statistic::Percentile(p) => ((n as f64 * p / 100.0) as usize).min(n - 1),
    };
    values[idx]
}

/// Brute-force 2-D order filter on the whole array.
///
/// Output `(i, j)` takes the footprint cell `(k, l)` from input
/// `(i + k - h0 - o0, j + l - h1 - o1)` where `h = shape / 2`.
pub fn reference_filter(
    a: &Array2<f64>,
    footprint: &Array2<bool>,
    origin: (isize, isize),
    stat: Statistic,
    mode: BoundaryMode,
    cval: f64,
) -> Array2<f64> {
    let (fh, fw) = footprint.dim();
    let (h0, h1) = ((fh / 2) as isize, (fw / 2) as isize);
    let mut values = Vec::new();
    Array2::from_shape_fn(a.dim(), |(i, j)| {
        values.clear();
        for ((k, l), &on) in footprint.indexed_iter() {
            if on {
                let r = i as isize + k as isize - h0 - origin.0;
                let c = j as isize + l as isize - h1 - origin.1;
                values.push(fetch(a, r, c, mode, cval));
            }
        }
        pick(&mut values, stat)
    })
}

pub fn ones_mask(h: usize, w: usize) -> Array2<bool> {
    Array2::from_elem((h, w), true)
}
