// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Reading of ACB amplitude files.
//!
//! These are line-oriented text files. The first line is a header carrying
//! `timerange:`, `obscode:` and `chans:` fields. Lines starting with `source:`
//! name the source and its bandwidth (`bandw:`), lines starting with
//! `bandfreq:` give a frequency and a polarisation (`polar:`), and lines
//! starting with `" 1 LM"` carry an amplitude in their fourth column.
//! Everything else is ignored.
//!
//! Numbers that can't be parsed are skipped (and counted), so a damaged file
//! yields fewer samples rather than an error.

mod error;
mod read;

pub use error::ReadAcbError;
pub use read::{parse_acb, read_acb_file};

use crate::math::count_unique_frequencies;

/// The contents of an ACB file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AcbData {
    /// The four tokens after `timerange:`, joined with spaces.
    pub time_range: Option<String>,
    pub obs_code: Option<String>,
    /// The three tokens after `chans:`, joined with spaces.
    pub channels: Option<String>,
    pub source: Option<String>,
    /// The two tokens after `bandw:` (value and unit), joined with a space.
    pub bandwidth: Option<String>,
    /// \[Hz\]
    pub frequencies: Vec<f64>,
    pub polarisations: Vec<String>,
    pub amplitudes: Vec<f64>,

    /// How many frequency or amplitude fields could not be parsed as numbers.
    pub num_malformed_fields: usize,
}

impl AcbData {
    pub fn num_unique_frequencies(&self) -> usize {
        count_unique_frequencies(&self.frequencies)
    }
}
