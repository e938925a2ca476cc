// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type for all acb_clean-related errors. This should be the *only*
//! error enum that is publicly visible from the command line.

use thiserror::Error;

use super::clean::CleanArgsError;
use crate::{acb::ReadAcbError, clean::CleanError, params::CleanRunError, render::RenderError};

/// The *only* publicly visible error from the `acb_clean` command line. Each
/// error message should point at some help, unless it's "generic".
#[derive(Error, Debug)]
pub enum AcbCleanError {
    /// An error related to the arguments of `clean`.
    #[error("{0}\n\nSee for more info: acb_clean clean --help")]
    Clean(String),

    /// An error from the CLEAN algorithm itself.
    #[error("{0}\n\nTry turning up verbosity (-v or -vv) to see the scale space that was built.")]
    Deconvolution(String),

    /// An error related to reading ACB files.
    #[error("{0}\n\nSee for more info: acb_clean acb-info --help")]
    AcbRead(String),

    /// An error related to writing images.
    #[error("{0}\n\nSee for more info: acb_clean clean --help (--output, --output-text, --colour-map)")]
    Render(String),

    /// An error related to argument files.
    #[error("{0}\n\nArgument files are toml or json versions of the command-line arguments; --save-toml writes an example.")]
    ArgFile(String),

    /// A generic error that can't be clarified further, e.g. IO errors.
    #[error("{0}")]
    Generic(String),
}

// When changing the error propagation below, ensure `Self::from(e)` uses the
// correct `e`!

impl From<CleanArgsError> for AcbCleanError {
    fn from(e: CleanArgsError) -> Self {
        Self::Clean(e.to_string())
    }
}

impl From<CleanRunError> for AcbCleanError {
    fn from(e: CleanRunError) -> Self {
        match e {
            CleanRunError::Clean(e) => Self::from(e),
            CleanRunError::Render(e) => Self::from(e),
        }
    }
}

impl From<CleanError> for AcbCleanError {
    fn from(e: CleanError) -> Self {
        Self::Deconvolution(e.to_string())
    }
}

impl From<ReadAcbError> for AcbCleanError {
    fn from(e: ReadAcbError) -> Self {
        Self::AcbRead(e.to_string())
    }
}

impl From<RenderError> for AcbCleanError {
    fn from(e: RenderError) -> Self {
        let s = e.to_string();
        match e {
            RenderError::IO(_) | RenderError::CreateDir { .. } => Self::Generic(s),
            _ => Self::Render(s),
        }
    }
}

impl From<std::io::Error> for AcbCleanError {
    fn from(e: std::io::Error) -> Self {
        Self::Generic(e.to_string())
    }
}

impl From<toml::ser::Error> for AcbCleanError {
    fn from(e: toml::ser::Error) -> Self {
        Self::ArgFile(e.to_string())
    }
}
