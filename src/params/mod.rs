// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Parameters for runs of `acb_clean`.
//!
//! The code here "mirrors" the code within the `cli` module; `cli` is
//! unparsed, user-facing code, whereas parameters have been parsed and are
//! ready to be used directly.

mod clean;
#[cfg(test)]
mod tests;

pub(crate) use clean::{CleanParams, CleanRunError, OutputParams};
