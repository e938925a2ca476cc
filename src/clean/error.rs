// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with multi-scale CLEAN.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CleanError {
    #[error("At least one scale is required")]
    NoScales,

    #[error("The image size must be at least 1 pixel")]
    ZeroImageSize,

    #[error("Grids in a scale stack must have non-zero dimensions")]
    EmptyGrid,

    #[error("The grid for scale {scale} has dimensions {got:?}, but the other scales have {expected:?}")]
    MismatchedGridShapes {
        scale: usize,
        expected: (usize, usize),
        got: (usize, usize),
    },

    #[error("The number of scales differ: {dirty_maps} dirty maps, {psfs} PSFs, {basis_functions} basis functions")]
    ScaleCountMismatch {
        dirty_maps: usize,
        psfs: usize,
        basis_functions: usize,
    },

    #[error("Expected a scale bias with {expected} values (one per scale), but got {got}")]
    ScaleBiasLength { expected: usize, got: usize },
}
