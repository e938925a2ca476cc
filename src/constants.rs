// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Useful constants.

All constants *must* be double precision. CLEAN is done entirely in double
precision; only the renderer reduces values to 8-bit colour.
 */

/// The loop gain: the fraction of the selected peak that is transferred into
/// the clean components (and removed from the residuals) every iteration.
/// Smaller values converge more slowly but overshoot less.
pub const GAIN_FACTOR: f64 = 0.1;

/// CLEAN stops when the selected peak intensity drops below this value.
pub const INTENSITY_THRESHOLD: f64 = 1e-5;

/// CLEAN stops when every residual cell across every scale has an absolute
/// value at or below this value.
pub const RESIDUAL_THRESHOLD: f64 = 1e-5;

/// The default cap on CLEAN iterations.
pub const DEFAULT_MAX_ITERATIONS: usize = 50;

/// The default number of spatial scales.
pub const DEFAULT_NUM_SCALES: usize = 5;

/// The default side length of the (square) image \[pixels\].
pub const DEFAULT_IMAGE_SIZE: usize = 256;

/// The side length of upsampled ("high-resolution") output images \[pixels\].
pub const HIGH_RES_IMAGE_SIZE: usize = 1024;

/// The PSF sigma at scale 0 \[pixels\]. Basis functions share this base.
pub const BASE_SIGMA: f64 = 1.0;

/// How much the PSF sigma grows per scale index \[pixels\].
pub const PSF_SIGMA_STEP: f64 = 0.5;

/// How much the basis-function (and dirty-map splat) sigma grows per scale
/// index \[pixels\].
pub const BASIS_SIGMA_STEP: f64 = 2.0;

/// The default output image filename.
pub const DEFAULT_OUTPUT_FILENAME: &str = "cleaned_image.png";
