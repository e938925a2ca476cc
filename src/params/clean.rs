// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::{debug, info};
use thiserror::Error;

use crate::{
    acb::AcbData,
    clean::{
        clean_acb, CleanConfig, CleanError, CleanObserver, CleanResult, IterationEvent,
        LogObserver, Termination,
    },
    render::{write_png, write_text, ColourMap, RenderError},
    PROGRESS_BARS,
};

/// Where and how the CLEANed image is written.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct OutputParams {
    pub(crate) image: PathBuf,

    /// If set, the grid is also written here as text.
    pub(crate) text: Option<PathBuf>,

    pub(crate) colour_map: ColourMap,

    /// If set, the image is bilinearly resampled to this square size before
    /// being written.
    pub(crate) resize_to: Option<usize>,
}

pub(crate) struct CleanParams {
    pub(crate) input: PathBuf,
    pub(crate) acb: AcbData,
    pub(crate) num_scales: usize,
    pub(crate) image_size: usize,
    pub(crate) config: CleanConfig,
    pub(crate) output: OutputParams,
}

impl CleanParams {
    pub(crate) fn run(&self) -> Result<CleanResult, CleanRunError> {
        let CleanParams {
            input,
            acb,
            num_scales,
            image_size,
            config,
            output,
        } = self;

        info!(
            "CLEANing {} with {num_scales} scales on a {image_size}x{image_size} grid",
            input.display()
        );
        let mut observer = ProgressObserver::new(config.max_iterations);
        let (result, summary) = clean_acb(acb, *num_scales, *image_size, config, &mut observer)?;
        debug!(
            "Used {} amplitude samples (per scale: {:?}); skipped {}",
            summary.num_samples_used(),
            summary.samples_per_scale,
            summary.num_samples_skipped
        );
        info!(
            "CLEAN stopped after {} iterations: {}",
            result.iterations, result.termination
        );

        let resize_to = output.resize_to.map(|s| (s, s));
        info!("Writing CLEANed image to {}", output.image.display());
        write_png(
            result.image.view(),
            &output.image,
            output.colour_map,
            resize_to,
        )?;
        if let Some(text) = &output.text {
            info!("Writing CLEANed grid to {}", text.display());
            write_text(result.image.view(), text)?;
        }

        Ok(result)
    }
}

/// Draws CLEAN's progress and logs each iteration.
struct ProgressObserver {
    bar: ProgressBar,
    log: LogObserver,
}

impl ProgressObserver {
    fn new(max_iterations: usize) -> ProgressObserver {
        let style = ProgressStyle::default_bar()
            .template(
                "{msg:17}: [{wide_bar:.blue}] {pos:2}/{len:2} iterations ({elapsed_precise}<{eta_precise})",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        let bar = ProgressBar::with_draw_target(
            Some(max_iterations as u64),
            if PROGRESS_BARS.load() {
                ProgressDrawTarget::stdout()
            } else {
                ProgressDrawTarget::hidden()
            },
        )
        .with_style(style)
        .with_position(0)
        .with_message("CLEANing");
        ProgressObserver {
            bar,
            log: LogObserver { max_iterations },
        }
    }
}

impl CleanObserver for ProgressObserver {
    fn on_iteration(&mut self, event: &IterationEvent) {
        self.log.on_iteration(event);
        self.bar.set_position(event.iteration as u64);
    }

    fn on_finish(&mut self, iterations: usize, termination: Termination) {
        self.log.on_finish(iterations, termination);
        self.bar.set_position(iterations as u64);
        self.bar.abandon_with_message("CLEANed");
    }
}

#[derive(Error, Debug)]
pub(crate) enum CleanRunError {
    #[error(transparent)]
    Clean(#[from] CleanError),

    #[error(transparent)]
    Render(#[from] RenderError),
}
