// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Some helper mathematics, and the code that splits flat loops into chunks
//! for parallel workers.


use std::{collections::HashSet, num::NonZeroUsize, ops::Range};

use ndarray::prelude::*;

/// The number of parallel workers used when a flat loop is split into chunks.
/// This is passed explicitly to everything that partitions work, so that
/// callers (and tests) can force single-worker determinism.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WorkerCount(NonZeroUsize);

impl WorkerCount {
    /// Returns `None` if `n` is 0.
    pub fn new(n: usize) -> Option<WorkerCount> {
        NonZeroUsize::new(n).map(WorkerCount)
    }

    /// A single worker; everything runs in order.
    pub fn single() -> WorkerCount {
        WorkerCount(NonZeroUsize::MIN)
    }

    /// Three-quarters of the host's available parallelism, but at least 1.
    pub fn from_available_parallelism() -> WorkerCount {
        let num_cpus = std::thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1);
        WorkerCount::three_quarters_of(num_cpus)
    }

    pub(crate) fn three_quarters_of(num_cpus: usize) -> WorkerCount {
        WorkerCount(NonZeroUsize::new(num_cpus * 3 / 4).unwrap_or(NonZeroUsize::MIN))
    }

    pub fn get(self) -> usize {
        self.0.get()
    }
}

impl Default for WorkerCount {
    fn default() -> Self {
        WorkerCount::from_available_parallelism()
    }
}

impl std::fmt::Display for WorkerCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Split `0..total` into exactly `workers` contiguous, non-overlapping ranges.
/// The first `total % workers` ranges get one extra item each. When there are
/// more workers than items, the trailing ranges are empty.
///
/// # Examples
///
/// `partition(10, 4) == [0..3, 3..6, 6..8, 8..10]`
pub fn partition(total: usize, workers: WorkerCount) -> Vec<Range<usize>> {
    let workers = workers.get();
    let chunk_size = total / workers;
    let remainder = total % workers;

    let mut chunks = Vec::with_capacity(workers);
    let mut start = 0;
    for i in 0..workers {
        let size = if i < remainder {
            chunk_size + 1
        } else {
            chunk_size
        };
        chunks.push(start..start + size);
        start += size;
    }
    chunks
}

/// A square grid of an un-normalised, circular Gaussian centred on the pixel
/// `(size / 2, size / 2)`; the centre pixel is 1.
pub(crate) fn gaussian_grid(size: usize, sigma: f64) -> Array2<f64> {
    let centre = (size / 2) as f64;
    let two_sigma_sq = 2.0 * sigma * sigma;
    Array2::from_shape_fn((size, size), |(x, y)| {
        let dx = x as f64 - centre;
        let dy = y as f64 - centre;
        (-(dx * dx + dy * dy) / two_sigma_sq).exp()
    })
}

/// The largest value in a grid. An empty grid yields negative infinity.
pub(crate) fn max_value(grid: ArrayView2<f64>) -> f64 {
    grid.iter().copied().fold(f64::NEG_INFINITY, |acc, v| {
        // Not `f64::max`; a NaN should never win.
        if v > acc {
            v
        } else {
            acc
        }
    })
}

/// Count the distinct frequencies. Values are compared numerically, so 0.0
/// and -0.0 are the same frequency, and each NaN is distinct from every other
/// value.
pub fn count_unique_frequencies(frequencies: &[f64]) -> usize {
    let mut seen = HashSet::with_capacity(frequencies.len());
    let mut num_nans = 0;
    for &f in frequencies {
        if f.is_nan() {
            num_nans += 1;
        } else {
            // Adding 0.0 turns -0.0 into 0.0.
            seen.insert((f + 0.0).to_bits());
        }
    }
    seen.len() + num_nans
}
