// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.


use std::{path::PathBuf, str::FromStr};

use clap::Parser;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

use super::common::{
    display_warnings, push_acb_info, warn_about_acb, InfoPrinter, Warn, ARG_FILE_HELP,
};
use crate::{
    acb::read_acb_file,
    clean::{CleanConfig, CleanResult},
    constants::{
        DEFAULT_IMAGE_SIZE, DEFAULT_MAX_ITERATIONS, DEFAULT_NUM_SCALES, DEFAULT_OUTPUT_FILENAME,
        HIGH_RES_IMAGE_SIZE,
    },
    math::WorkerCount,
    params::{CleanParams, OutputParams},
    render::{ColourMap, COLOUR_MAPS_COMMA_SEPARATED},
    AcbCleanError,
};

lazy_static::lazy_static! {
    static ref OUTPUT_HELP: String =
        format!("Path to the output PNG image. Its directory is created if necessary. Default: {DEFAULT_OUTPUT_FILENAME}");

    static ref HIGH_RES_HELP: String =
        format!("Bilinearly upsample the output image to {HIGH_RES_IMAGE_SIZE}x{HIGH_RES_IMAGE_SIZE} pixels. The text output is never upsampled");

    static ref COLOUR_MAP_HELP: String =
        format!("The colour map of the output image. Default: {}. Supported colour maps: {}", ColourMap::default(), *COLOUR_MAPS_COMMA_SEPARATED);

    static ref SCALES_HELP: String =
        format!("The number of spatial scales to CLEAN over. Default: {DEFAULT_NUM_SCALES}");

    static ref SIZE_HELP: String =
        format!("The side length of the (square) CLEAN grid [pixels]. Default: {DEFAULT_IMAGE_SIZE}");

    static ref MAX_ITERATIONS_HELP: String =
        format!("The maximum number of CLEAN iterations. Default: {DEFAULT_MAX_ITERATIONS}");

    static ref NUM_WORKERS_HELP: String =
        format!("The number of parallel workers. Default: {} (three quarters of the available parallelism)", WorkerCount::default());
}

#[derive(Parser, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(super) struct CleanArgs {
    #[clap(name = "ARGUMENTS_FILE", help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    pub(super) args_file: Option<PathBuf>,

    /// Path to the input ACB file.
    #[clap(short, long, parse(from_os_str), help_heading = "INPUT FILES")]
    pub(super) input: Option<PathBuf>,

    #[clap(short, long, parse(from_os_str), help = OUTPUT_HELP.as_str(), help_heading = "OUTPUT FILES")]
    pub(super) output: Option<PathBuf>,

    /// Also write the CLEANed grid to this path as text; each line is one x,
    /// with the y values separated by spaces.
    #[clap(long, parse(from_os_str), help_heading = "OUTPUT FILES")]
    pub(super) output_text: Option<PathBuf>,

    #[clap(long, help = HIGH_RES_HELP.as_str(), help_heading = "OUTPUT FILES")]
    #[serde(default)]
    pub(super) high_res: bool,

    #[clap(long, help = COLOUR_MAP_HELP.as_str(), help_heading = "OUTPUT FILES")]
    pub(super) colour_map: Option<String>,

    #[clap(short, long, help = SCALES_HELP.as_str(), help_heading = "CLEAN")]
    pub(super) scales: Option<usize>,

    #[clap(long, help = SIZE_HELP.as_str(), help_heading = "CLEAN")]
    pub(super) size: Option<usize>,

    #[clap(long, help = MAX_ITERATIONS_HELP.as_str(), help_heading = "CLEAN")]
    pub(super) max_iterations: Option<usize>,

    #[clap(long, help = NUM_WORKERS_HELP.as_str(), help_heading = "CLEAN")]
    pub(super) num_workers: Option<usize>,
}

impl CleanArgs {
    /// Both command-line and file arguments overlap in terms of what is
    /// available; this function consolidates everything that was specified into
    /// a single struct. Where applicable, it will prefer CLI parameters over
    /// those in the file.
    ///
    /// This function should only ever merge arguments, and not try to make
    /// sense of them.
    pub(super) fn merge(self) -> Result<CleanArgs, AcbCleanError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            // Read in the file arguments. Ensure all of the file args are
            // accounted for by pattern matching.
            let CleanArgs {
                args_file: _,
                input,
                output,
                output_text,
                high_res,
                colour_map,
                scales,
                size,
                max_iterations,
                num_workers,
            } = unpack_arg_file!(arg_file);

            // Merge all the arguments, preferring the CLI args when available.
            Ok(CleanArgs {
                args_file: None,
                input: cli_args.input.or(input),
                output: cli_args.output.or(output),
                output_text: cli_args.output_text.or(output_text),
                high_res: cli_args.high_res || high_res,
                colour_map: cli_args.colour_map.or(colour_map),
                scales: cli_args.scales.or(scales),
                size: cli_args.size.or(size),
                max_iterations: cli_args.max_iterations.or(max_iterations),
                num_workers: cli_args.num_workers.or(num_workers),
            })
        } else {
            Ok(cli_args)
        }
    }

    /// Check the arguments, read the input ACB file and report what will be
    /// done.
    pub(super) fn parse(self) -> Result<CleanParams, AcbCleanError> {
        debug!("{:#?}", self);

        let Self {
            args_file: _,
            input,
            output,
            output_text,
            high_res,
            colour_map,
            scales,
            size,
            max_iterations,
            num_workers,
        } = self;

        let input = input.ok_or(CleanArgsError::NoInput)?;
        let num_scales = match scales.unwrap_or(DEFAULT_NUM_SCALES) {
            0 => return Err(CleanArgsError::ZeroScales.into()),
            n => n,
        };
        let image_size = match size.unwrap_or(DEFAULT_IMAGE_SIZE) {
            0 => return Err(CleanArgsError::ZeroImageSize.into()),
            n => n,
        };
        let max_iterations = match max_iterations.unwrap_or(DEFAULT_MAX_ITERATIONS) {
            0 => return Err(CleanArgsError::ZeroIterations.into()),
            n => n,
        };
        let workers = match num_workers {
            Some(n) => WorkerCount::new(n).ok_or(CleanArgsError::ZeroWorkers)?,
            None => WorkerCount::default(),
        };
        let colour_map = match colour_map {
            Some(s) => ColourMap::from_str(&s.to_lowercase())
                .map_err(|_| CleanArgsError::InvalidColourMap(s))?,
            None => ColourMap::default(),
        };
        let output = output.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_FILENAME));
        let is_png = output
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("png"))
            .unwrap_or(false);
        if !is_png {
            format!(
                "The output image '{}' doesn't have a .png extension",
                output.display()
            )
            .warn();
        }

        let acb = read_acb_file(&input)?;
        let mut printer = InfoPrinter::new("ACB input".into());
        printer.push_line(format!("File: {}", input.display()).into());
        push_acb_info(&mut printer, &acb);
        printer.display();
        warn_about_acb(&acb);

        let config = CleanConfig {
            max_iterations,
            workers,
            ..Default::default()
        };
        let mut printer = InfoPrinter::new("Multi-scale CLEAN".into());
        printer.push_block(vec![
            format!("{num_scales} scales").into(),
            format!("{image_size}x{image_size} grid").into(),
        ]);
        printer.push_block(vec![
            format!("Gain: {}", config.gain).into(),
            format!("Maximum iterations: {max_iterations}").into(),
            format!(
                "Thresholds: peak {:e}, residual {:e}",
                config.intensity_threshold, config.residual_threshold
            )
            .into(),
        ]);
        printer.push_line(format!("Using {workers} workers").into());
        printer.display();

        let resize_to = if high_res {
            Some(HIGH_RES_IMAGE_SIZE)
        } else {
            None
        };
        let mut printer = InfoPrinter::new("Output".into());
        printer.push_block(vec![
            format!("Image: {}", output.display()).into(),
            format!(
                "{0}x{0} pixels, {colour_map}",
                resize_to.unwrap_or(image_size)
            )
            .into(),
        ]);
        if let Some(text) = &output_text {
            printer.push_line(format!("Text: {}", text.display()).into());
        }
        printer.display();

        display_warnings();

        Ok(CleanParams {
            input,
            acb,
            num_scales,
            image_size,
            config,
            output: OutputParams {
                image: output,
                text: output_text,
                colour_map,
                resize_to,
            },
        })
    }

    /// Returns the CLEAN result, unless this is a dry run.
    pub(super) fn run(self, dry_run: bool) -> Result<Option<CleanResult>, AcbCleanError> {
        debug!("Converting arguments into parameters");
        trace!("{:#?}", self);
        let params = self.parse()?;

        if dry_run {
            info!("Dry run -- exiting now.");
            return Ok(None);
        }

        let result = params.run()?;
        Ok(Some(result))
    }
}

#[derive(thiserror::Error, Debug)]
pub(super) enum CleanArgsError {
    #[error("No input ACB file was specified")]
    NoInput,

    #[error("The number of scales must be at least 1")]
    ZeroScales,

    #[error("The image size must be at least 1 pixel")]
    ZeroImageSize,

    #[error("The maximum number of CLEAN iterations must be at least 1")]
    ZeroIterations,

    #[error("The number of workers must be at least 1")]
    ZeroWorkers,

    #[error("Unrecognised colour map '{0}'. Supported colour maps: {}", *COLOUR_MAPS_COMMA_SEPARATED)]
    InvalidColourMap(String),
}
