// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Integration tests.
//!
//! Some help for laying out these tests was taken from:
//! https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html

mod acb_info;
mod clean;
mod no_stderr;

use std::{
    fs::File,
    io::Write,
    path::{Path, PathBuf},
    process::Output,
    str::from_utf8,
};

use assert_cmd::{output::OutputError, Command};
use indoc::indoc;

/// A small but complete ACB file. The third amplitude is malformed.
const TEST_ACB: &str = indoc! {"
    timerange: 2023 001 00:00:00 00:10:00 obscode: BX123 chans: 1 to 8
    source: 3C279 bandw: 16.0 MHz
    bandfreq: 1.4e9 Hz polar: RR
    bandfreq: 1.5e9 Hz polar: LL
    bandfreq: 1.6e9 Hz polar: RR
    bandfreq: 1.7e9 Hz polar: LL
     1 LM 0 0.90 0.1
     1 LM 1 0.75 0.1
     1 LM 2 oops 0.1
     1 LM 3 0.50 0.1
"};

fn acb_clean() -> Command {
    Command::cargo_bin("acb_clean").unwrap()
}

fn get_cmd_output(result: Result<Output, OutputError>) -> (String, String) {
    let output = match result {
        Ok(o) => o,
        Err(o) => o.as_output().unwrap().clone(),
    };
    (
        from_utf8(&output.stdout).unwrap().to_string(),
        from_utf8(&output.stderr).unwrap().to_string(),
    )
}

fn make_file_in_dir<T: AsRef<Path>, U: AsRef<Path>>(filename: T, dir: U) -> (PathBuf, File) {
    let path = dir.as_ref().join(filename);
    let f = File::create(&path).expect("couldn't make file");
    (path, f)
}

/// Write [`TEST_ACB`] into a directory.
fn write_test_acb<T: AsRef<Path>>(dir: T) -> PathBuf {
    let (path, mut f) = make_file_in_dir("test.acb", dir);
    f.write_all(TEST_ACB.as_bytes()).unwrap();
    path
}
