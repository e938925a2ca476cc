// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Full (non-circular) 2D linear convolution.

use std::ops::Range;

use ndarray::prelude::*;
use rayon::prelude::*;

use crate::math::{partition, WorkerCount};

/// Convolve `a` (`h1 x w1`) with `b` (`h2 x w2`). The result is
/// `(h1 + h2 - 1) x (w1 + w2 - 1)` with
/// `c[(i + k, j + l)] = sum(a[(i, j)] * b[(k, l)])`; there is no wraparound
/// and no normalisation. If either input has a zero-length axis, the result
/// is a 0x0 grid.
///
/// The output rows are split between `workers`, and each worker only writes
/// its own rows. Every output cell accumulates its terms in increasing `i`,
/// then `j`, regardless of which worker computes it, so the result is
/// bit-for-bit the same for any worker count.
pub fn convolve(a: ArrayView2<f64>, b: ArrayView2<f64>, workers: WorkerCount) -> Array2<f64> {
    let (h1, w1) = a.dim();
    let (h2, w2) = b.dim();
    if h1 == 0 || w1 == 0 || h2 == 0 || w2 == 0 {
        return Array2::zeros((0, 0));
    }
    let out_dim = (h1 + h2 - 1, w1 + w2 - 1);

    let bands: Vec<(Range<usize>, Array2<f64>)> = partition(out_dim.0, workers)
        .into_par_iter()
        .filter(|rows| !rows.is_empty())
        .map(|rows| {
            let mut band = Array2::zeros((rows.len(), out_dim.1));
            for (mut out_row, o) in band.outer_iter_mut().zip(rows.clone()) {
                // Rows of `a` that reach output row `o`.
                let i_start = o.saturating_sub(h2 - 1);
                let i_end = o.min(h1 - 1);
                for i in i_start..=i_end {
                    let b_row = b.row(o - i);
                    for j in 0..w1 {
                        out_row
                            .slice_mut(s![j..j + w2])
                            .scaled_add(a[(i, j)], &b_row);
                    }
                }
            }
            (rows, band)
        })
        .collect();

    let mut out = Array2::zeros(out_dim);
    for (rows, band) in bands {
        out.slice_mut(s![rows, ..]).assign(&band);
    }
    out
}
