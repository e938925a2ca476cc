// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Things shared by the `acb_clean` subcommands.

mod printers;

pub(super) use printers::{display_warnings, InfoPrinter, Warn};

use std::borrow::Cow;

use itertools::Itertools;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use crate::acb::AcbData;

lazy_static::lazy_static! {
    pub(super) static ref ARG_FILE_TYPES_COMMA_SEPARATED: String = ArgFileTypes::iter().join(", ");

    pub(super) static ref ARG_FILE_HELP: String =
        format!("All arguments may be specified in a file. Any CLI arguments override arguments set in the file. Supported formats: {}", *ARG_FILE_TYPES_COMMA_SEPARATED);
}

#[derive(Debug, Display, EnumIter, EnumString)]
pub(super) enum ArgFileTypes {
    #[strum(serialize = "toml")]
    Toml,
    #[strum(serialize = "json")]
    Json,
}

macro_rules! unpack_arg_file {
    ($arg_file:expr) => ({
        use std::{fs::File, io::Read, str::FromStr};

        use crate::cli::common::{ArgFileTypes, ARG_FILE_TYPES_COMMA_SEPARATED};

        debug!("Attempting to parse argument file {}", $arg_file.display());

        if !$arg_file.exists() {
            return Err(AcbCleanError::ArgFile(format!(
                "Argument file '{}' does not exist",
                $arg_file.display()
            )));
        }

        let mut contents = String::new();
        let arg_file_type = $arg_file
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .and_then(|e| ArgFileTypes::from_str(&e).ok());

        match arg_file_type {
            Some(ArgFileTypes::Toml) => {
                debug!("Parsing toml file...");
                let mut fh = File::open(&$arg_file)?;
                fh.read_to_string(&mut contents)?;
                match toml::from_str(&contents) {
                    Ok(p) => p,
                    Err(err) => {
                        return Err(AcbCleanError::ArgFile(format!(
                            "Couldn't decode toml structure from {:?}:\n{err}",
                            $arg_file
                        )))
                    }
                }
            }
            Some(ArgFileTypes::Json) => {
                debug!("Parsing json file...");
                let mut fh = File::open(&$arg_file)?;
                fh.read_to_string(&mut contents)?;
                match serde_json::from_str(&contents) {
                    Ok(p) => p,
                    Err(err) => {
                        return Err(AcbCleanError::ArgFile(format!(
                            "Couldn't decode json structure from {:?}:\n{err}",
                            $arg_file
                        )))
                    }
                }
            }

            _ => {
                return Err(AcbCleanError::ArgFile(format!(
                    "Argument file '{:?}' doesn't have a recognised file extension! Valid extensions are: {}", $arg_file, *ARG_FILE_TYPES_COMMA_SEPARATED)
                ))
            }
        }
    });
}

/// Put the metadata and sample counts of ACB data into an [`InfoPrinter`].
pub(super) fn push_acb_info(printer: &mut InfoPrinter, acb: &AcbData) {
    let or_unknown = |s: &Option<String>| -> Cow<'static, str> {
        match s {
            Some(s) => s.clone().into(),
            None => "<unknown>".into(),
        }
    };

    printer.push_block(vec![
        format!("Source:     {}", or_unknown(&acb.source)).into(),
        format!("Obscode:    {}", or_unknown(&acb.obs_code)).into(),
        format!("Time range: {}", or_unknown(&acb.time_range)).into(),
        format!("Channels:   {}", or_unknown(&acb.channels)).into(),
        format!("Bandwidth:  {}", or_unknown(&acb.bandwidth)).into(),
    ]);
    printer.push_block(vec![
        format!(
            "{} frequencies ({} unique)",
            acb.frequencies.len(),
            acb.num_unique_frequencies()
        )
        .into(),
        format!(
            "{} polarisations: {}",
            acb.polarisations.len(),
            acb.polarisations.iter().unique().join(", ")
        )
        .into(),
        format!("{} amplitudes", acb.amplitudes.len()).into(),
    ]);
}

/// Queue warnings about ACB data that will be quietly degraded.
pub(super) fn warn_about_acb(acb: &AcbData) {
    if acb.num_malformed_fields > 0 {
        format!(
            "{} numeric fields in the ACB file couldn't be parsed and were skipped",
            acb.num_malformed_fields
        )
        .warn();
    }
    if acb.amplitudes.is_empty() {
        "The ACB file has no amplitudes; the CLEANed image will be empty".warn();
    }
    let num_unique = acb.num_unique_frequencies();
    let num_beyond = acb.amplitudes.len().saturating_sub(num_unique);
    if num_beyond > 0 {
        vec![
            format!("{num_beyond} amplitudes will not be used").into(),
            format!("Only the first {num_unique} amplitudes (the number of unique frequencies) are assigned to scales").into(),
        ]
        .warn();
    }
}
