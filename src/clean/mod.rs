// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Multi-scale CLEAN.
//!
//! Amplitude samples are splatted into a "dirty map" per spatial scale, each
//! scale gets a normalised Gaussian PSF and an un-normalised Gaussian basis
//! function, and then a greedy loop repeatedly picks the brightest (scale,
//! position) pair, moves a fraction of it into the clean components and
//! removes its contamination from every scale's residual.
//!
//! Grids are indexed `[x][y]`, i.e. `grid[(x, y)]`, with `x` the outer axis.

mod convolve;
mod error;
mod multiscale;
mod observer;
mod synthesis;

pub use convolve::convolve;
pub use error::CleanError;
pub use multiscale::{multiscale_clean, CleanConfig, CleanResult, Termination};
pub use observer::{CleanObserver, IterationEvent, LogObserver, NoopObserver};
pub use synthesis::{
    basis_function_sigma, basis_functions, default_scale_bias, dirty_maps, psf_sigma, psfs,
    sample_scale_index, synthesise, ScaleSpace, SynthesisSummary,
};

use std::ops::Index;

use log::debug;
use ndarray::prelude::*;

use crate::acb::AcbData;

/// An integer position in a grid. Whether it is inside a particular grid
/// depends on that grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: usize,
    pub y: usize,
}

impl Point {
    pub fn new(x: usize, y: usize) -> Point {
        Point { x, y }
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One grid per spatial scale, index-aligned by scale. There is always at
/// least one scale, and every grid has the same (non-zero) dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleStack {
    grids: Vec<Array2<f64>>,
}

impl ScaleStack {
    pub fn new(grids: Vec<Array2<f64>>) -> Result<ScaleStack, CleanError> {
        let first = grids.first().ok_or(CleanError::NoScales)?;
        let expected = first.dim();
        if expected.0 == 0 || expected.1 == 0 {
            return Err(CleanError::EmptyGrid);
        }
        for (scale, grid) in grids.iter().enumerate() {
            if grid.dim() != expected {
                return Err(CleanError::MismatchedGridShapes {
                    scale,
                    expected,
                    got: grid.dim(),
                });
            }
        }

        Ok(ScaleStack { grids })
    }

    /// `grids` must already satisfy the invariants of [`ScaleStack::new`].
    fn from_checked(grids: Vec<Array2<f64>>) -> ScaleStack {
        debug_assert!(!grids.is_empty());
        ScaleStack { grids }
    }

    pub fn num_scales(&self) -> usize {
        self.grids.len()
    }

    /// The dimensions shared by every grid.
    pub fn dim(&self) -> (usize, usize) {
        self.grids[0].dim()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Array2<f64>> {
        self.grids.iter()
    }

    pub(crate) fn grids_mut(&mut self) -> &mut [Array2<f64>] {
        &mut self.grids
    }

    /// The cell-wise sum over all scales.
    pub fn sum(&self) -> Array2<f64> {
        let mut total = Array2::zeros(self.dim());
        for grid in &self.grids {
            total += grid;
        }
        total
    }

    pub fn into_vec(self) -> Vec<Array2<f64>> {
        self.grids
    }
}

impl Index<usize> for ScaleStack {
    type Output = Array2<f64>;

    fn index(&self, scale: usize) -> &Array2<f64> {
        &self.grids[scale]
    }
}

/// Synthesise the scale space from the amplitude samples and run multi-scale
/// CLEAN on it with the default scale bias.
pub fn clean_amplitudes<O: CleanObserver + ?Sized>(
    frequencies: &[f64],
    amplitudes: &[f64],
    num_scales: usize,
    image_size: usize,
    config: &CleanConfig,
    observer: &mut O,
) -> Result<(CleanResult, SynthesisSummary), CleanError> {
    let (scale_space, summary) = synthesise(
        frequencies,
        amplitudes,
        num_scales,
        image_size,
        config.workers,
    )?;
    debug!("Scale bias: {:?}", scale_space.scale_bias);
    let result = multiscale_clean(
        &scale_space.dirty_maps,
        &scale_space.psfs,
        &scale_space.basis_functions,
        &scale_space.scale_bias,
        config,
        observer,
    )?;
    Ok((result, summary))
}

/// Run the whole pipeline on the contents of an ACB file: synthesise the
/// scale space from its frequencies and amplitudes, then CLEAN it.
pub fn clean_acb<O: CleanObserver + ?Sized>(
    data: &AcbData,
    num_scales: usize,
    image_size: usize,
    config: &CleanConfig,
    observer: &mut O,
) -> Result<(CleanResult, SynthesisSummary), CleanError> {
    clean_amplitudes(
        &data.frequencies,
        &data.amplitudes,
        num_scales,
        image_size,
        config,
        observer,
    )
}
