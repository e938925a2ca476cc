// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Construction of the per-scale dirty maps, PSFs and basis functions.

use std::ops::Range;

use log::{debug, trace};
use ndarray::prelude::*;
use rayon::prelude::*;

use super::{CleanError, ScaleStack};
use crate::{
    constants::{BASE_SIGMA, BASIS_SIGMA_STEP, PSF_SIGMA_STEP},
    math::{count_unique_frequencies, gaussian_grid, partition, WorkerCount},
};

/// Everything multi-scale CLEAN needs, index-aligned by scale.
#[derive(Debug, Clone)]
pub struct ScaleSpace {
    pub dirty_maps: ScaleStack,
    pub psfs: ScaleStack,
    pub basis_functions: ScaleStack,
    pub scale_bias: Vec<f64>,
}

/// Book-keeping on how the amplitude samples were used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisSummary {
    pub num_unique_frequencies: usize,
    /// The number of amplitude samples splatted into each scale's dirty map.
    pub samples_per_scale: Vec<usize>,
    /// Samples whose index is at or beyond the unique-frequency count. These
    /// have no scale and are ignored.
    pub num_samples_skipped: usize,
}

impl SynthesisSummary {
    pub fn num_samples_used(&self) -> usize {
        self.samples_per_scale.iter().sum()
    }
}

/// The PSF sigma for a scale \[pixels\].
pub fn psf_sigma(scale: usize) -> f64 {
    BASE_SIGMA + scale as f64 * PSF_SIGMA_STEP
}

/// The basis-function sigma for a scale \[pixels\]. Dirty-map splats use the
/// same sigma.
pub fn basis_function_sigma(scale: usize) -> f64 {
    BASE_SIGMA + scale as f64 * BASIS_SIGMA_STEP
}

/// The weight of each scale when choosing which scale to CLEAN next; larger
/// scales are progressively de-emphasised by `1 / sqrt(scale + 1)`.
pub fn default_scale_bias(num_scales: usize) -> Vec<f64> {
    (0..num_scales)
        .map(|s| 1.0 / ((s + 1) as f64).sqrt())
        .collect()
}

fn check_dims(num_scales: usize, image_size: usize) -> Result<(), CleanError> {
    if num_scales == 0 {
        return Err(CleanError::NoScales);
    }
    if image_size == 0 {
        return Err(CleanError::ZeroImageSize);
    }
    Ok(())
}

/// A centred Gaussian PSF per scale, each normalised to sum to 1.
pub fn psfs(num_scales: usize, image_size: usize) -> Result<ScaleStack, CleanError> {
    check_dims(num_scales, image_size)?;
    let grids = (0..num_scales)
        .into_par_iter()
        .map(|s| {
            let mut psf = gaussian_grid(image_size, psf_sigma(s));
            let total = psf.sum();
            if total > 0.0 {
                psf /= total;
            }
            psf
        })
        .collect();
    Ok(ScaleStack::from_checked(grids))
}

/// A centred, un-normalised Gaussian basis function per scale (peak 1).
pub fn basis_functions(num_scales: usize, image_size: usize) -> Result<ScaleStack, CleanError> {
    check_dims(num_scales, image_size)?;
    let grids = (0..num_scales)
        .into_par_iter()
        .map(|s| gaussian_grid(image_size, basis_function_sigma(s)))
        .collect();
    Ok(ScaleStack::from_checked(grids))
}

/// The scale that the amplitude sample at `index` contributes to, i.e.
/// `floor(index / num_unique_frequencies * num_scales)` clamped to the last
/// scale. Samples at or beyond `num_unique_frequencies` have no scale.
///
/// This ties a sample's position in the input, rather than its frequency or
/// magnitude, to a scale.
pub fn sample_scale_index(
    index: usize,
    num_unique_frequencies: usize,
    num_scales: usize,
) -> Option<usize> {
    if index >= num_unique_frequencies || num_scales == 0 {
        return None;
    }
    let scale =
        (index as f64 / num_unique_frequencies as f64 * num_scales as f64).floor() as usize;
    Some(scale.min(num_scales - 1))
}

/// Splat every amplitude sample as a centred Gaussian into the dirty map of
/// its scale. `splats` holds the un-normalised Gaussian of each scale (i.e.
/// the basis functions), and fixes the number of scales and the map size.
///
/// The map rows are split between `workers`; each worker writes only its own
/// rows and adds samples in index order, so the maps are bit-for-bit the same
/// for any worker count.
pub fn dirty_maps(
    amplitudes: &[f64],
    num_unique_frequencies: usize,
    splats: &ScaleStack,
    workers: WorkerCount,
) -> (ScaleStack, SynthesisSummary) {
    let num_scales = splats.num_scales();
    let dim = splats.dim();

    let sample_scales: Vec<Option<usize>> = (0..amplitudes.len())
        .map(|i| sample_scale_index(i, num_unique_frequencies, num_scales))
        .collect();
    let mut samples_per_scale = vec![0; num_scales];
    for scale in sample_scales.iter().flatten() {
        samples_per_scale[*scale] += 1;
    }

    let bands: Vec<(Range<usize>, Vec<Array2<f64>>)> = partition(dim.0, workers)
        .into_par_iter()
        .filter(|rows| !rows.is_empty())
        .map(|rows| {
            let mut local = vec![Array2::zeros((rows.len(), dim.1)); num_scales];
            for (&amplitude, scale) in amplitudes.iter().zip(&sample_scales) {
                if let Some(scale) = *scale {
                    let splat = splats[scale].slice(s![rows.clone(), ..]);
                    local[scale].scaled_add(amplitude, &splat);
                }
            }
            (rows, local)
        })
        .collect();

    let mut maps = vec![Array2::zeros(dim); num_scales];
    for (rows, local) in bands {
        for (map, band) in maps.iter_mut().zip(local) {
            map.slice_mut(s![rows.clone(), ..]).assign(&band);
        }
    }

    let num_samples_used: usize = samples_per_scale.iter().sum();
    let summary = SynthesisSummary {
        num_unique_frequencies,
        samples_per_scale,
        num_samples_skipped: amplitudes.len() - num_samples_used,
    };
    trace!("{summary:?}");
    (ScaleStack::from_checked(maps), summary)
}

/// Build the dirty maps, PSFs, basis functions and default scale bias from
/// amplitude samples. Only the number of unique `frequencies` is used.
pub fn synthesise(
    frequencies: &[f64],
    amplitudes: &[f64],
    num_scales: usize,
    image_size: usize,
    workers: WorkerCount,
) -> Result<(ScaleSpace, SynthesisSummary), CleanError> {
    let num_unique_frequencies = count_unique_frequencies(frequencies);
    debug!("Found {num_unique_frequencies} unique frequencies");
    debug!("Using {} amplitude values", amplitudes.len());

    let basis_functions = basis_functions(num_scales, image_size)?;
    let psfs = psfs(num_scales, image_size)?;
    let (dirty_maps, summary) =
        dirty_maps(amplitudes, num_unique_frequencies, &basis_functions, workers);

    Ok((
        ScaleSpace {
            dirty_maps,
            psfs,
            basis_functions,
            scale_bias: default_scale_bias(num_scales),
        },
        summary,
    ))
}
