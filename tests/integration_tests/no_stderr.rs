// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tests to ensure there is no stderr output for successful commands.

use tempfile::TempDir;

use crate::{acb_clean, get_cmd_output, write_test_acb};

#[test]
#[cfg(feature = "plotting")]
fn test_clean_no_stderr() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let input = write_test_acb(tmp_dir.path());
    let output = tmp_dir.path().join("clean.png");

    #[rustfmt::skip]
    let cmd = acb_clean()
        .args([
            "clean",
            "-i", &format!("{}", input.display()),
            "-o", &format!("{}", output.display()),
            "--size", "16",
            "--high-res",
            "--colour-map", "turbo",
        ])
        .ok();
    assert!(
        cmd.is_ok(),
        "clean failed on simple test data: {}",
        cmd.err().unwrap()
    );
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.is_empty(), "stderr wasn't empty: {stderr}");
    assert!(output.exists());
}

#[test]
fn test_dry_run_no_stderr() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let input = write_test_acb(tmp_dir.path());

    let cmd = acb_clean()
        .args([
            "clean",
            "-i",
            &format!("{}", input.display()),
            "--dry-run",
        ])
        .ok();
    assert!(cmd.is_ok(), "{}", cmd.err().unwrap());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.is_empty(), "stderr wasn't empty: {stderr}");
}
