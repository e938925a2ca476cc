// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use approx::assert_abs_diff_eq;
use tempfile::tempdir;

use super::*;
use crate::{
    acb::AcbData,
    clean::{CleanConfig, Termination},
    math::WorkerCount,
    render::ColourMap,
};

fn params(acb: AcbData, image: PathBuf, text: Option<PathBuf>) -> CleanParams {
    CleanParams {
        input: PathBuf::from("test.acb"),
        acb,
        num_scales: 2,
        image_size: 9,
        config: CleanConfig {
            max_iterations: 5,
            workers: WorkerCount::single(),
            ..Default::default()
        },
        output: OutputParams {
            image,
            text,
            colour_map: ColourMap::Grayscale,
            resize_to: None,
        },
    }
}

#[test]
#[cfg(feature = "plotting")]
fn run_writes_image_and_text() {
    let dir = tempdir().unwrap();
    let image = dir.path().join("out").join("clean.png");
    let text = dir.path().join("text").join("clean.txt");
    let acb = AcbData {
        frequencies: vec![1.0e9, 1.1e9],
        amplitudes: vec![1.0, 0.5],
        ..Default::default()
    };

    let result = params(acb, image.clone(), Some(text.clone())).run();
    assert!(result.is_ok(), "{:?}", result.err());
    let result = result.unwrap();
    assert!(result.iterations > 0);
    assert!(image.exists());

    let contents = std::fs::read_to_string(&text).unwrap();
    let rows: Vec<Vec<f64>> = contents
        .lines()
        .map(|l| l.split_whitespace().map(|v| v.parse().unwrap()).collect())
        .collect();
    assert_eq!(rows.len(), 9);
    assert!(rows.iter().all(|r| r.len() == 9));
    assert_abs_diff_eq!(rows[4][4], result.image[(4, 4)]);
}

#[test]
#[cfg(not(feature = "plotting"))]
fn run_without_plotting_fails_to_write_png() {
    let dir = tempdir().unwrap();
    let image = dir.path().join("clean.png");
    let acb = AcbData {
        frequencies: vec![1.0e9],
        amplitudes: vec![1.0],
        ..Default::default()
    };
    let result = params(acb, image, None).run();
    assert!(matches!(result, Err(CleanRunError::Render(_))));
}

#[test]
#[cfg(feature = "plotting")]
fn run_with_no_amplitudes_gives_a_flat_image() {
    let dir = tempdir().unwrap();
    let image = dir.path().join("clean.png");
    let result = params(AcbData::default(), image.clone(), None)
        .run()
        .unwrap();
    assert_eq!(result.termination, Termination::IntensityExhausted);
    assert_eq!(result.iterations, 0);
    assert!(result.image.iter().all(|&v| v == 0.0));
    assert!(image.exists());
}

#[test]
fn zero_scales_is_a_clean_error() {
    let dir = tempdir().unwrap();
    let mut p = params(AcbData::default(), dir.path().join("x.png"), None);
    p.num_scales = 0;
    assert!(matches!(p.run(), Err(CleanRunError::Clean(_))));
}
