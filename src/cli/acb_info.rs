// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Print information on an ACB file.

use std::path::PathBuf;

use clap::Parser;
use itertools::Itertools;

use super::common::{display_warnings, push_acb_info, warn_about_acb, InfoPrinter};
use crate::{
    acb::{read_acb_file, AcbData},
    clean::sample_scale_index,
    constants::DEFAULT_NUM_SCALES,
    AcbCleanError,
};

#[derive(Parser, Debug, Clone, Default)]
pub(super) struct AcbInfoArgs {
    /// Path to the ACB file.
    #[clap(name = "ACB_FILE", parse(from_os_str))]
    pub(super) file: PathBuf,

    /// Also show how the amplitudes would be shared between this many
    /// scales.
    #[clap(short, long)]
    pub(super) scales: Option<usize>,
}

impl AcbInfoArgs {
    pub(super) fn run(self) -> Result<AcbData, AcbCleanError> {
        let acb = read_acb_file(&self.file)?;

        let mut printer = InfoPrinter::new(format!("{}", self.file.display()).into());
        push_acb_info(&mut printer, &acb);
        if acb.num_malformed_fields > 0 {
            printer.push_line(
                format!("{} malformed numeric fields", acb.num_malformed_fields).into(),
            );
        }
        printer.display();

        let num_scales = self.scales.unwrap_or(DEFAULT_NUM_SCALES);
        if num_scales > 0 {
            let counts = amplitudes_per_scale(&acb, num_scales);
            let mut printer =
                InfoPrinter::new(format!("Amplitudes per scale ({num_scales} scales)").into());
            printer.push_line(counts.iter().join(", ").into());
            printer.display();
        }

        warn_about_acb(&acb);
        display_warnings();
        Ok(acb)
    }
}

/// How many amplitudes land on each scale when CLEANing.
fn amplitudes_per_scale(acb: &AcbData, num_scales: usize) -> Vec<usize> {
    let num_unique = acb.num_unique_frequencies();
    let mut counts = vec![0; num_scales];
    (0..acb.amplitudes.len())
        .filter_map(|i| sample_scale_index(i, num_unique, num_scales))
        .for_each(|s| counts[s] += 1);
    counts
}
