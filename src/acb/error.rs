// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use thiserror::Error;

/// Errors associated with reading ACB files. Malformed numbers are not errors;
/// they are dropped and counted.
#[derive(Error, Debug)]
pub enum ReadAcbError {
    #[error("ACB file '{}' does not exist", .0.display())]
    DoesNotExist(PathBuf),

    #[error("Couldn't open ACB file '{}': {err}", .path.display())]
    Open {
        path: PathBuf,
        err: std::io::Error,
    },

    #[error("IO error when reading ACB data after line {line_num}: {err}")]
    Read { line_num: u32, err: std::io::Error },
}
