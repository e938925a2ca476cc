// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Hooks for watching multi-scale CLEAN as it runs. Observers only see what
//! happened; they cannot change the course of the loop.

use log::debug;

use super::{Point, Termination};

/// What CLEAN selected at the start of an iteration, before the convergence
/// checks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationEvent {
    /// 0-indexed.
    pub iteration: usize,
    pub scale: usize,
    pub position: Point,
    /// The (unbiased) residual value at `position` on `scale`.
    pub intensity: f64,
}

pub trait CleanObserver {
    fn on_iteration(&mut self, event: &IterationEvent);

    fn on_finish(&mut self, _iterations: usize, _termination: Termination) {}
}

impl<F: FnMut(&IterationEvent)> CleanObserver for F {
    fn on_iteration(&mut self, event: &IterationEvent) {
        self(event)
    }
}

/// Ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl CleanObserver for NoopObserver {
    fn on_iteration(&mut self, _: &IterationEvent) {}
}

/// Writes every iteration to the debug log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver {
    pub max_iterations: usize,
}

impl CleanObserver for LogObserver {
    fn on_iteration(&mut self, event: &IterationEvent) {
        debug!(
            "Iteration {}/{}: scale {}, position {}, intensity {:.6e}",
            event.iteration + 1,
            self.max_iterations,
            event.scale,
            event.position,
            event.intensity
        );
    }

    fn on_finish(&mut self, iterations: usize, termination: Termination) {
        debug!("Multi-scale CLEAN finished after {iterations} iterations: {termination}");
    }
}
