// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::io::Write;

use tempfile::TempDir;

use crate::{acb_clean, get_cmd_output, make_file_in_dir, write_test_acb};

fn read_grid(path: &std::path::Path) -> Vec<Vec<f64>> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|l| l.split_whitespace().map(|v| v.parse().unwrap()).collect())
        .collect()
}

#[test]
fn missing_input_fails() {
    let cmd = acb_clean().args(["clean"]).ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.starts_with("Error: "), "{stderr}");
    assert!(stderr.contains("No input ACB file"), "{stderr}");
}

#[test]
fn nonexistent_input_fails() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let input = tmp_dir.path().join("missing.acb");
    let cmd = acb_clean()
        .args(["clean", "-i", &format!("{}", input.display())])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("does not exist"), "{stderr}");
}

#[test]
fn text_output_has_the_grid_size() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let input = write_test_acb(tmp_dir.path());
    let image = tmp_dir.path().join("images").join("clean.png");
    let text = tmp_dir.path().join("clean.txt");

    #[rustfmt::skip]
    let cmd = acb_clean()
        .args([
            "clean",
            "-i", &format!("{}", input.display()),
            "-o", &format!("{}", image.display()),
            "--output-text", &format!("{}", text.display()),
            "--scales", "3",
            "--size", "15",
            "--max-iterations", "10",
            "--no-progress-bars",
        ])
        .ok();

    #[cfg(feature = "plotting")]
    {
        assert!(cmd.is_ok(), "clean failed: {}", cmd.err().unwrap());
        assert!(image.exists());
        let grid = read_grid(&text);
        assert_eq!(grid.len(), 15);
        assert!(grid.iter().all(|row| row.len() == 15));
        assert!(grid.iter().flatten().all(|v| v.is_finite()));
    }
    #[cfg(not(feature = "plotting"))]
    {
        assert!(cmd.is_err());
        let _ = read_grid;
    }
}

#[test]
fn malformed_amplitudes_are_tolerated() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let input = write_test_acb(tmp_dir.path());

    let cmd = acb_clean()
        .args([
            "clean",
            "-i",
            &format!("{}", input.display()),
            "--size",
            "9",
            "--dry-run",
        ])
        .ok();
    assert!(cmd.is_ok(), "{}", cmd.err().unwrap());
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("3 amplitudes"), "{stdout}");
    assert!(stdout.contains("couldn't be parsed"), "{stdout}");
}

#[test]
fn dry_run_writes_nothing() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let input = write_test_acb(tmp_dir.path());
    let image = tmp_dir.path().join("clean.png");

    let cmd = acb_clean()
        .args([
            "clean",
            "-i",
            &format!("{}", input.display()),
            "-o",
            &format!("{}", image.display()),
            "--dry-run",
        ])
        .ok();
    assert!(cmd.is_ok(), "{}", cmd.err().unwrap());
    assert!(!image.exists());
}

#[test]
fn alias_and_saved_arguments() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let input = write_test_acb(tmp_dir.path());
    let toml = tmp_dir.path().join("args.toml");

    // Save the arguments without running anything.
    #[rustfmt::skip]
    let cmd = acb_clean()
        .args([
            "clean-acb",
            "-i", &format!("{}", input.display()),
            "--scales", "2",
            "--colour-map", "viridis",
            "--save-toml", &format!("{}", toml.display()),
            "--dry-run",
        ])
        .ok();
    assert!(cmd.is_ok(), "{}", cmd.err().unwrap());
    let saved = std::fs::read_to_string(&toml).unwrap();
    assert!(saved.contains("scales = 2"), "{saved}");
    assert!(saved.contains("viridis"), "{saved}");

    // The saved file can be used as an argument file.
    let cmd = acb_clean()
        .args(["clean", &format!("{}", toml.display()), "--dry-run"])
        .ok();
    assert!(cmd.is_ok(), "{}", cmd.err().unwrap());
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("2 scales"), "{stdout}");
    assert!(stdout.contains("viridis"), "{stdout}");
}

#[test]
fn bad_argument_file_extension() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let (path, mut f) = make_file_in_dir("args.yaml", tmp_dir.path());
    writeln!(f, "scales: 2").unwrap();

    let cmd = acb_clean()
        .args(["clean", &format!("{}", path.display())])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("recognised file extension"), "{stderr}");
}

#[test]
fn zero_scales_fails() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let input = write_test_acb(tmp_dir.path());
    let cmd = acb_clean()
        .args(["clean", "-i", &format!("{}", input.display()), "-s", "0"])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("number of scales"), "{stderr}");
}
