// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[cfg(not(feature = "plotting"))]
    #[error("acb_clean was not compiled with the \"plotting\" feature.\nYou need to compile acb_clean from source with this feature to write PNG images.\nText output (--output-text) is still available.")]
    NoPlottingFeature,

    #[error("Cannot render an image with a zero dimension ({0}x{1})")]
    EmptyImage(usize, usize),

    #[error("Image dimensions {0}x{1} are too large to render")]
    TooLarge(usize, usize),

    #[error("Couldn't create the directory '{}' for output: {err}", .dir.display())]
    CreateDir { dir: PathBuf, err: std::io::Error },

    #[error("Error from the plotters library when writing '{}': {msg}", .path.display())]
    Plotters { path: PathBuf, msg: String },

    #[error(transparent)]
    IO(#[from] std::io::Error),
}
