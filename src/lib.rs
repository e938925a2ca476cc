// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Multi-scale CLEAN deconvolution of ACB amplitude data.
 */

pub mod acb;
pub mod clean;
mod cli;
pub mod constants;
pub mod math;
mod params;
pub mod render;

use crossbeam_utils::atomic::AtomicCell;

/// Should progress bars be drawn? Set once by the command line.
static PROGRESS_BARS: AtomicCell<bool> = AtomicCell::new(false);

// Re-exports.
pub use acb::{read_acb_file, AcbData, ReadAcbError};
pub use clean::{
    clean_acb, clean_amplitudes, convolve, multiscale_clean, CleanConfig, CleanError,
    CleanObserver, CleanResult, IterationEvent, LogObserver, NoopObserver, Point, ScaleStack,
    Termination,
};
pub use cli::{AcbClean, AcbCleanError};
pub use math::WorkerCount;
pub use render::{ColourMap, RenderError};
