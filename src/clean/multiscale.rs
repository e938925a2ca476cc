// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The multi-scale CLEAN loop.

use log::{debug, trace};
use ndarray::prelude::*;
use rayon::prelude::*;
use strum_macros::Display;

use super::{convolve, CleanError, CleanObserver, IterationEvent, Point, ScaleStack};
use crate::{
    constants::{DEFAULT_MAX_ITERATIONS, GAIN_FACTOR, INTENSITY_THRESHOLD, RESIDUAL_THRESHOLD},
    math::{max_value, WorkerCount},
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CleanConfig {
    /// The maximum number of CLEAN iterations.
    pub max_iterations: usize,

    /// The loop gain.
    pub gain: f64,

    /// Stop when the selected peak falls below this.
    pub intensity_threshold: f64,

    /// Stop when every residual is within +/- this.
    pub residual_threshold: f64,

    pub workers: WorkerCount,
}

impl Default for CleanConfig {
    fn default() -> Self {
        CleanConfig {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            gain: GAIN_FACTOR,
            intensity_threshold: INTENSITY_THRESHOLD,
            residual_threshold: RESIDUAL_THRESHOLD,
            workers: WorkerCount::default(),
        }
    }
}

/// Why CLEAN stopped.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    #[strum(serialize = "peak intensity exhausted")]
    IntensityExhausted,

    #[strum(serialize = "residuals converged")]
    ResidualConverged,

    #[strum(serialize = "iteration budget exhausted")]
    IterationBudgetExhausted,

    /// A cross-convolution needed for normalisation had a non-positive (or
    /// non-finite) maximum, so no further improvement is possible.
    #[strum(serialize = "degenerate normalisation")]
    DegenerateNormalisation,
}

#[derive(Debug, Clone)]
pub struct CleanResult {
    /// The clean components plus the leftover residuals of every scale.
    pub image: Array2<f64>,
    pub clean_components: Array2<f64>,
    /// The residual (dirty) map of each scale after the last iteration.
    pub residuals: ScaleStack,
    /// The number of iterations that updated the clean components.
    pub iterations: usize,
    pub termination: Termination,
}

/// A basis function convolved with a PSF, along with its maximum.
struct CrossConvolution {
    grid: Array2<f64>,
    max: f64,
}

/// `convolve(basis_functions[m], psfs[s])` only depends on the selected scale
/// `m` and the residual scale `s`, so they are only computed once per selected
/// scale.
struct CrossConvolutions<'a> {
    psfs: &'a ScaleStack,
    basis_functions: &'a ScaleStack,
    workers: WorkerCount,
    by_selected_scale: Vec<Option<Vec<CrossConvolution>>>,
}

impl<'a> CrossConvolutions<'a> {
    fn new(
        psfs: &'a ScaleStack,
        basis_functions: &'a ScaleStack,
        workers: WorkerCount,
    ) -> CrossConvolutions<'a> {
        CrossConvolutions {
            psfs,
            basis_functions,
            workers,
            by_selected_scale: (0..basis_functions.num_scales()).map(|_| None).collect(),
        }
    }

    /// One cross-convolution per residual scale for the selected scale.
    fn get(&mut self, selected_scale: usize) -> &[CrossConvolution] {
        let psfs = self.psfs;
        let basis_functions = self.basis_functions;
        let workers = self.workers;
        self.by_selected_scale[selected_scale].get_or_insert_with(|| {
            trace!("Computing cross-convolutions for scale {selected_scale}");
            let basis = basis_functions[selected_scale].view();
            psfs.iter()
                .collect::<Vec<_>>()
                .into_par_iter()
                .map(|psf| {
                    let grid = convolve(basis, psf.view(), workers);
                    let max = max_value(grid.view());
                    CrossConvolution { grid, max }
                })
                .collect()
        })
    }
}

/// Run multi-scale CLEAN.
///
/// Each iteration picks the scale holding the largest biased residual, then
/// the largest (unbiased) residual on that scale. A `gain` fraction of the
/// scale's basis function is added to the clean components there, and the
/// basis function convolved with each scale's PSF is subtracted from that
/// scale's residuals. `dirty_maps` is not modified.
///
/// Ties are broken in favour of the first value found, scanning scales, then
/// `x`, then `y` in increasing order.
pub fn multiscale_clean<O: CleanObserver + ?Sized>(
    dirty_maps: &ScaleStack,
    psfs: &ScaleStack,
    basis_functions: &ScaleStack,
    scale_bias: &[f64],
    config: &CleanConfig,
    observer: &mut O,
) -> Result<CleanResult, CleanError> {
    let num_scales = dirty_maps.num_scales();
    if psfs.num_scales() != num_scales || basis_functions.num_scales() != num_scales {
        return Err(CleanError::ScaleCountMismatch {
            dirty_maps: num_scales,
            psfs: psfs.num_scales(),
            basis_functions: basis_functions.num_scales(),
        });
    }
    if scale_bias.len() != num_scales {
        return Err(CleanError::ScaleBiasLength {
            expected: num_scales,
            got: scale_bias.len(),
        });
    }

    debug!("Starting multi-scale CLEAN over {num_scales} scales");
    let mut clean_components = Array2::zeros(dirty_maps.dim());
    let mut residuals = dirty_maps.clone();
    let mut cross_convolutions = CrossConvolutions::new(psfs, basis_functions, config.workers);
    let mut iterations = 0;

    let termination = loop {
        if iterations >= config.max_iterations {
            break Termination::IterationBudgetExhausted;
        }

        let scale = select_scale(&residuals, scale_bias);
        let (position, intensity) = peak(residuals[scale].view());
        observer.on_iteration(&IterationEvent {
            iteration: iterations,
            scale,
            position,
            intensity,
        });
        if intensity < config.intensity_threshold {
            break Termination::IntensityExhausted;
        }

        let cross = cross_convolutions.get(scale);
        if let Some((s, c)) = cross
            .iter()
            .enumerate()
            .find(|(_, c)| !(c.max.is_finite() && c.max > 0.0))
        {
            debug!(
                "The cross-convolution of basis {scale} with PSF {s} has maximum {}; stopping",
                c.max
            );
            break Termination::DegenerateNormalisation;
        }

        let component_scale = config.gain * (intensity / cross[scale].max);
        add_scaled_centred(
            clean_components.view_mut(),
            basis_functions[scale].view(),
            position,
            component_scale,
        );

        residuals
            .grids_mut()
            .par_iter_mut()
            .zip(cross.par_iter())
            .for_each(|(residual, c)| {
                let norm = config.gain * intensity / c.max;
                add_scaled_centred(residual.view_mut(), c.grid.view(), position, -norm);
            });

        iterations += 1;
        if residuals_converged(&residuals, config.residual_threshold) {
            break Termination::ResidualConverged;
        }
    };
    observer.on_finish(iterations, termination);
    debug!("Multi-scale CLEAN completed in {iterations} iterations ({termination})");

    let mut image = residuals.sum();
    image += &clean_components;
    Ok(CleanResult {
        image,
        clean_components,
        residuals,
        iterations,
        termination,
    })
}

/// The scale holding the largest value once each scale is multiplied by its
/// bias. The residuals themselves are left untouched.
fn select_scale(residuals: &ScaleStack, scale_bias: &[f64]) -> usize {
    let mut max_scale = 0;
    let mut max = f64::NEG_INFINITY;
    for (scale, (grid, &bias)) in residuals.iter().zip(scale_bias).enumerate() {
        for &v in grid {
            let biased = bias * v;
            if biased > max {
                max = biased;
                max_scale = scale;
            }
        }
    }
    max_scale
}

/// The position and value of the largest value in a grid. If nothing beats
/// negative infinity (e.g. every value is NaN), the origin is returned with
/// negative infinity.
fn peak(grid: ArrayView2<f64>) -> (Point, f64) {
    let mut pos = Point::default();
    let mut max = f64::NEG_INFINITY;
    for ((x, y), &v) in grid.indexed_iter() {
        if v > max {
            max = v;
            pos = Point::new(x, y);
        }
    }
    (pos, max)
}

/// Add `factor * kernel` into `target` with the kernel's centre (half its
/// dimensions, rounded down) placed on `centre`. Parts falling outside
/// `target` are dropped.
fn add_scaled_centred(
    mut target: ArrayViewMut2<f64>,
    kernel: ArrayView2<f64>,
    centre: Point,
    factor: f64,
) {
    let (x_range, kx_range) = overlap(target.nrows(), kernel.nrows(), centre.x);
    let (y_range, ky_range) = overlap(target.ncols(), kernel.ncols(), centre.y);
    if x_range.is_empty() || y_range.is_empty() {
        return;
    }
    target
        .slice_mut(s![x_range, y_range])
        .scaled_add(factor, &kernel.slice(s![kx_range, ky_range]));
}

/// Along one axis, kernel index `k` lands on target index
/// `centre + k - kernel_len / 2`. Returns the target and kernel index ranges
/// that are in bounds.
fn overlap(
    target_len: usize,
    kernel_len: usize,
    centre: usize,
) -> (std::ops::Range<usize>, std::ops::Range<usize>) {
    let offset = centre as isize - (kernel_len / 2) as isize;
    let k_start = (-offset).max(0);
    let k_end = (target_len as isize - offset).min(kernel_len as isize);
    if k_start >= k_end {
        return (0..0, 0..0);
    }
    let (k_start, k_end) = (k_start as usize, k_end as usize);
    let t_start = (offset + k_start as isize) as usize;
    (t_start..t_start + (k_end - k_start), k_start..k_end)
}

fn residuals_converged(residuals: &ScaleStack, threshold: f64) -> bool {
    residuals
        .iter()
        .all(|grid| grid.iter().all(|v| v.abs() <= threshold))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_inside() {
        // A 3-long kernel centred on index 4 of a 10-long target.
        assert_eq!(overlap(10, 3, 4), (3..6, 0..3));
    }

    #[test]
    fn test_overlap_clipped() {
        // Centred on 0: the first kernel element falls off the start.
        assert_eq!(overlap(10, 3, 0), (0..2, 1..3));
        // Centred on the last index: the last element falls off the end.
        assert_eq!(overlap(10, 3, 9), (8..10, 0..2));
        // A kernel larger than the target.
        assert_eq!(overlap(4, 15, 2), (0..4, 5..9));
    }

    #[test]
    fn test_overlap_disjoint() {
        assert_eq!(overlap(4, 3, 100), (0..0, 0..0));
    }

    #[test]
    fn test_peak_first_encountered_wins() {
        let grid = array![[0.0, 2.0, 2.0], [2.0, 1.0, 0.0]];
        assert_eq!(peak(grid.view()), (Point::new(0, 1), 2.0));
    }

    #[test]
    fn test_peak_all_nan() {
        let grid = Array2::from_elem((2, 2), f64::NAN);
        let (pos, v) = peak(grid.view());
        assert_eq!(pos, Point::new(0, 0));
        assert_eq!(v, f64::NEG_INFINITY);
    }

    #[test]
    fn test_select_scale_uses_bias() {
        let residuals = ScaleStack::new(vec![
            array![[1.0, 0.0], [0.0, 0.0]],
            array![[0.0, 0.0], [0.0, 1.5]],
        ])
        .unwrap();
        // Unbiased, scale 1 holds the largest value.
        assert_eq!(select_scale(&residuals, &[1.0, 1.0]), 1);
        // 1.5 / sqrt(2) < 1.0
        assert_eq!(select_scale(&residuals, &[1.0, 1.0 / 2.0_f64.sqrt()]), 0);
        // Ties go to the lowest scale.
        assert_eq!(select_scale(&residuals, &[1.5, 1.0]), 0);
    }

    #[test]
    fn test_add_scaled_centred_clips() {
        let mut target = Array2::zeros((3, 3));
        let kernel = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]];
        add_scaled_centred(target.view_mut(), kernel.view(), Point::new(0, 0), 2.0);
        let expected = array![[10.0, 12.0, 0.0], [16.0, 18.0, 0.0], [0.0, 0.0, 0.0]];
        assert_eq!(target, expected);
    }
}
