// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Turning CLEANed grids into images.
//!
//! A grid has no fixed value range, so it is first normalised by its own
//! minimum and maximum. Pixel (x, y) of an image takes its value from grid
//! cell `[(x, y)]`, i.e. the outer grid axis runs across the image.

mod error;

pub use error::RenderError;

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use itertools::Itertools;
use log::debug;
use ndarray::prelude::*;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

lazy_static::lazy_static! {
    pub(crate) static ref COLOUR_MAPS_COMMA_SEPARATED: String = ColourMap::iter().join(", ");
}

/// How normalised intensities are turned into colours.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumIter, EnumString)]
pub enum ColourMap {
    /// 0 (black) to 255 (white).
    #[default]
    #[strum(serialize = "grayscale")]
    Grayscale,

    #[strum(serialize = "viridis")]
    Viridis,

    #[strum(serialize = "inferno")]
    Inferno,

    #[strum(serialize = "magma")]
    Magma,

    #[strum(serialize = "plasma")]
    Plasma,

    #[strum(serialize = "turbo")]
    Turbo,

    #[strum(serialize = "cividis")]
    Cividis,
}

impl ColourMap {
    /// The colour of a normalised intensity. Values outside 0 to 1 are
    /// clamped; NaN is treated as 0.
    pub fn rgb(self, value: f64) -> [u8; 3] {
        let value = if value.is_nan() {
            0.0
        } else {
            value.clamp(0.0, 1.0)
        };
        let gradient = match self {
            ColourMap::Grayscale => {
                // Truncate rather than round, so only the maximum is white.
                let v = (value * 255.0) as u8;
                return [v, v, v];
            }
            ColourMap::Viridis => colorous::VIRIDIS,
            ColourMap::Inferno => colorous::INFERNO,
            ColourMap::Magma => colorous::MAGMA,
            ColourMap::Plasma => colorous::PLASMA,
            ColourMap::Turbo => colorous::TURBO,
            ColourMap::Cividis => colorous::CIVIDIS,
        };
        let c = gradient.eval_continuous(value);
        [c.r, c.g, c.b]
    }
}

/// Map a grid onto 0 to 1 using its own extremes. If every value is the same,
/// the result is all zeros.
pub fn normalise(grid: ArrayView2<f64>) -> Array2<f64> {
    let (min, max) = grid
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), &v| {
            (min.min(v), max.max(v))
        });
    let range = max - min;
    if range > 0.0 && range.is_finite() {
        grid.mapv(|v| ((v - min) / range).clamp(0.0, 1.0))
    } else {
        Array2::zeros(grid.dim())
    }
}

/// Resample a grid to new dimensions with bilinear interpolation. Corner cells
/// map onto corner cells. An empty grid resamples to zeros.
pub fn upsample_bilinear(grid: ArrayView2<f64>, new_dim: (usize, usize)) -> Array2<f64> {
    let (width, height) = grid.dim();
    if width == 0 || height == 0 {
        return Array2::zeros(new_dim);
    }

    let step = |len: usize, new_len: usize| {
        if len > 1 && new_len > 1 {
            (len - 1) as f64 / (new_len - 1) as f64
        } else {
            0.0
        }
    };
    let x_step = step(width, new_dim.0);
    let y_step = step(height, new_dim.1);

    // The two neighbouring source indices and the weight of the second.
    let neighbours = |i: usize, step: f64, len: usize| {
        let pos = i as f64 * step;
        let lo = (pos.floor() as usize).min(len - 1);
        let hi = (lo + 1).min(len - 1);
        (lo, hi, pos - lo as f64)
    };

    Array2::from_shape_fn(new_dim, |(i, j)| {
        let (x0, x1, tx) = neighbours(i, x_step, width);
        let (y0, y1, ty) = neighbours(j, y_step, height);
        let lower = grid[(x0, y0)] * (1.0 - ty) + grid[(x0, y1)] * ty;
        let upper = grid[(x1, y0)] * (1.0 - ty) + grid[(x1, y1)] * ty;
        lower * (1.0 - tx) + upper * tx
    })
}

/// Normalise (and optionally resize) a grid, then colour it. The result is
/// indexed `[(x, y)]` like the grid.
pub fn to_pixels(
    grid: ArrayView2<f64>,
    colour_map: ColourMap,
    resize_to: Option<(usize, usize)>,
) -> Array2<[u8; 3]> {
    let grid = match resize_to {
        Some(dim) if dim != grid.dim() => {
            debug!(
                "Upsampling {}x{} grid to {}x{}",
                grid.dim().0,
                grid.dim().1,
                dim.0,
                dim.1
            );
            upsample_bilinear(grid, dim)
        }
        _ => grid.to_owned(),
    };
    normalise(grid.view()).mapv(|v| colour_map.rgb(v))
}

/// Write a grid to a PNG file.
pub fn write_png(
    grid: ArrayView2<f64>,
    path: &Path,
    colour_map: ColourMap,
    resize_to: Option<(usize, usize)>,
) -> Result<(), RenderError> {
    let (width, height) = resize_to.unwrap_or_else(|| grid.dim());
    if width == 0 || height == 0 {
        return Err(RenderError::EmptyImage(width, height));
    }
    if i32::try_from(width).is_err() || i32::try_from(height).is_err() {
        return Err(RenderError::TooLarge(width, height));
    }
    create_output_dir(path)?;

    let pixels = to_pixels(grid, colour_map, resize_to);
    draw(&pixels, path)?;
    debug!("Wrote {width}x{height} {colour_map} image to {}", path.display());
    Ok(())
}

#[cfg(not(feature = "plotting"))]
fn draw(_pixels: &Array2<[u8; 3]>, _path: &Path) -> Result<(), RenderError> {
    Err(RenderError::NoPlottingFeature)
}

#[cfg(feature = "plotting")]
fn draw(pixels: &Array2<[u8; 3]>, path: &Path) -> Result<(), RenderError> {
    use plotters::prelude::*;

    let plotters_error = |e: &dyn std::fmt::Display| RenderError::Plotters {
        path: path.to_path_buf(),
        msg: e.to_string(),
    };

    // The dimensions have already been checked to fit in an i32.
    let (width, height) = pixels.dim();
    let root = BitMapBackend::new(path, (width as u32, height as u32)).into_drawing_area();
    for ((x, y), &[r, g, b]) in pixels.indexed_iter() {
        root.draw_pixel((x as i32, y as i32), &RGBColor(r, g, b))
            .map_err(|e| plotters_error(&e))?;
    }
    root.present().map_err(|e| plotters_error(&e))?;
    Ok(())
}

/// Write a grid as text: one line per x, with the y values separated by
/// spaces.
pub fn write_text(grid: ArrayView2<f64>, path: &Path) -> Result<(), RenderError> {
    create_output_dir(path)?;
    let mut f = BufWriter::new(File::create(path)?);
    for row in grid.outer_iter() {
        writeln!(f, "{}", row.iter().join(" "))?;
    }
    f.flush()?;
    debug!("Wrote grid text to {}", path.display());
    Ok(())
}

/// Create the directory that will contain `path`, if it doesn't exist.
pub fn create_output_dir(path: &Path) -> Result<(), RenderError> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() && !dir.exists() => {
            debug!("Creating output directory {}", dir.display());
            std::fs::create_dir_all(dir).map_err(|err| RenderError::CreateDir {
                dir: dir.to_path_buf(),
                err,
            })
        }
        _ => Ok(()),
    }
}
