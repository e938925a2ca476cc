// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use tempfile::TempDir;

use crate::{acb_clean, get_cmd_output, write_test_acb};

#[test]
fn prints_metadata() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let input = write_test_acb(tmp_dir.path());

    let cmd = acb_clean()
        .args(["acb-info", &format!("{}", input.display())])
        .ok();
    assert!(cmd.is_ok(), "{}", cmd.err().unwrap());
    let (stdout, stderr) = get_cmd_output(cmd);
    assert!(stderr.is_empty(), "stderr wasn't empty: {stderr}");
    assert!(stdout.contains("3C279"), "{stdout}");
    assert!(stdout.contains("BX123"), "{stdout}");
    assert!(stdout.contains("2023 001 00:00:00 00:10:00"), "{stdout}");
    assert!(stdout.contains("16.0 MHz"), "{stdout}");
    assert!(stdout.contains("4 frequencies (4 unique)"), "{stdout}");
    assert!(stdout.contains("3 amplitudes"), "{stdout}");
    assert!(stdout.contains("1 malformed numeric fields"), "{stdout}");
}

#[test]
fn scale_distribution() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let input = write_test_acb(tmp_dir.path());

    let cmd = acb_clean()
        .args(["acb-info", &format!("{}", input.display()), "--scales", "2"])
        .ok();
    assert!(cmd.is_ok(), "{}", cmd.err().unwrap());
    let (stdout, _) = get_cmd_output(cmd);
    // 4 unique frequencies and 3 amplitudes over 2 scales.
    assert!(stdout.contains("2, 1"), "{stdout}");
}

#[test]
fn missing_file_fails() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let cmd = acb_clean()
        .args([
            "acb-info",
            &format!("{}", tmp_dir.path().join("nothing.acb").display()),
        ])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("does not exist"), "{stderr}");
}
