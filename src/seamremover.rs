// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Remove a seam from a grid.
//!
//! Every removal builds a new grid one column (or row) smaller; the
//! input is never touched.  Horizontal removal is vertical removal
//! on the transposed grid, transposed back.

use crate::error::{CarveError, Result};
use crate::pixelgrid::PixelGrid;
use crate::twodmap::TwoDimensionalMap;
use image::Primitive;
use num_traits::NumCast;

// Check a vertical seam against a width x height field.
fn check_seam(seam: &[usize], width: usize, height: usize) -> Result<()> {
    if width < 2 {
        return Err(CarveError::invalid_input(format!(
            "cannot remove a seam from a grid {} pixel wide",
            width
        )));
    }
    if seam.len() != height {
        return Err(CarveError::invalid_seam(format!(
            "seam has {} entries for {} lines",
            seam.len(),
            height
        )));
    }
    if let Some((line, at)) = seam.iter().enumerate().find(|(_, at)| **at >= width) {
        return Err(CarveError::invalid_seam(format!(
            "seam index {} on line {} is outside 0..{}",
            at, line, width
        )));
    }
    Ok(())
}

// For every row, copy the cells before the seam unchanged and the
// cells after it shifted left by one.  A cell is `stride` values,
// which travel together.
fn remove_vertical_raw<T: Copy>(
    data: &[T],
    width: usize,
    height: usize,
    stride: usize,
    seam: &[usize],
) -> Result<Vec<T>> {
    check_seam(seam, width, height)?;
    let row_len = width * stride;
    let mut out = Vec::with_capacity((width - 1) * height * stride);
    for (row, at) in data.chunks(row_len).zip(seam.iter()) {
        out.extend_from_slice(&row[..at * stride]);
        out.extend_from_slice(&row[(at + 1) * stride..]);
    }
    Ok(out)
}

/// Removes seams from pixel grids, optionally softening the join.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GridCarver {
    blend: bool,
}

impl GridCarver {
    /// A carver that drops seam pixels and nothing else.
    pub fn new() -> Self {
        GridCarver { blend: false }
    }

    /// When `blend` is set, the pixel left of each removed pixel is
    /// replaced with the mean of its two former neighbours.  Seams on
    /// the border have only one neighbour and are removed unblended.
    pub fn with_blend(blend: bool) -> Self {
        GridCarver { blend }
    }

    /// Remove a top-to-bottom seam: `seam[y]` is the column dropped
    /// from row `y`.  The result is one column narrower.
    pub fn remove_vertical<S: Primitive>(
        &self,
        grid: &PixelGrid<S>,
        seam: &[usize],
    ) -> Result<PixelGrid<S>> {
        let (width, height, channels) = (grid.width(), grid.height(), grid.channels());
        let mut data = remove_vertical_raw(grid.as_slice(), width, height, channels, seam)?;

        if self.blend {
            let out_row = (width - 1) * channels;
            for (y, at) in seam.iter().cloned().enumerate() {
                if at == 0 || at + 1 >= width {
                    continue;
                }
                let (left, right) = (grid.pixel(at - 1, y), grid.pixel(at + 1, y));
                let target = y * out_row + (at - 1) * channels;
                for c in 0..channels {
                    data[target + c] = mean(left[c], right[c]);
                }
            }
        }

        PixelGrid::new(width - 1, height, channels, data)
    }

    /// Remove a left-to-right seam: `seam[x]` is the row dropped from
    /// column `x`.  The result is one row shorter.
    pub fn remove_horizontal<S: Primitive>(
        &self,
        grid: &PixelGrid<S>,
        seam: &[usize],
    ) -> Result<PixelGrid<S>> {
        Ok(self.remove_vertical(&grid.transpose(), seam)?.transpose())
    }
}

// Integer samples truncate, as a plain numeric cast does.
fn mean<S: Primitive>(a: S, b: S) -> S {
    let a: f64 = NumCast::from(a).unwrap_or(0.0);
    let b: f64 = NumCast::from(b).unwrap_or(0.0);
    NumCast::from((a + b) / 2.0).unwrap_or_else(S::zero)
}

/// Remove a top-to-bottom seam from a scalar map, so that a stale
/// energy map keeps the shape of the grid it describes.
pub fn remove_vertical_from_map<P: Default + Copy>(
    map: &TwoDimensionalMap<P>,
    seam: &[usize],
) -> Result<TwoDimensionalMap<P>> {
    let (width, height) = (map.width(), map.height());
    let data = remove_vertical_raw(map.as_slice(), width, height, 1, seam)?;
    TwoDimensionalMap::from_raw(width - 1, height, data)
}

/// Remove a left-to-right seam from a scalar map.
pub fn remove_horizontal_from_map<P: Default + Copy>(
    map: &TwoDimensionalMap<P>,
    seam: &[usize],
) -> Result<TwoDimensionalMap<P>> {
    Ok(remove_vertical_from_map(&map.transpose(), seam)?.transpose())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    fn ramp(width: usize, height: usize) -> PixelGrid<u8> {
        let data = (0..width * height)
            .flat_map(|i| {
                let v = (i * 10) as u8;
                vec![v, v + 1, v + 2]
            })
            .collect();
        PixelGrid::new(width, height, 3, data).unwrap()
    }

    fn is_invalid_seam<T>(r: Result<T>) -> bool {
        match r {
            Err(CarveError::InvalidSeam { .. }) => true,
            _ => false,
        }
    }

    #[test]
    fn vertical_removal_drops_one_pixel_per_row() {
        let grid = ramp(3, 3);
        let carved = GridCarver::new().remove_vertical(&grid, &[0, 1, 2]).unwrap();
        assert_eq!(carved.dimensions(), (2, 3));
        assert_eq!(carved.channels(), 3);
        assert_eq!(carved.pixel(0, 0), grid.pixel(1, 0));
        assert_eq!(carved.pixel(1, 0), grid.pixel(2, 0));
        assert_eq!(carved.pixel(0, 1), grid.pixel(0, 1));
        assert_eq!(carved.pixel(1, 1), grid.pixel(2, 1));
        assert_eq!(carved.pixel(0, 2), grid.pixel(0, 2));
        assert_eq!(carved.pixel(1, 2), grid.pixel(1, 2));
    }

    #[test]
    fn horizontal_removal_drops_one_pixel_per_column() {
        let grid = ramp(3, 3);
        let carved = GridCarver::new().remove_horizontal(&grid, &[2, 1, 0]).unwrap();
        assert_eq!(carved.dimensions(), (3, 2));
        assert_eq!(carved.pixel(0, 0), grid.pixel(0, 0));
        assert_eq!(carved.pixel(0, 1), grid.pixel(0, 1));
        assert_eq!(carved.pixel(1, 0), grid.pixel(1, 0));
        assert_eq!(carved.pixel(1, 1), grid.pixel(1, 2));
        assert_eq!(carved.pixel(2, 0), grid.pixel(2, 1));
        assert_eq!(carved.pixel(2, 1), grid.pixel(2, 2));
    }

    #[test]
    fn input_grid_is_untouched() {
        let grid = ramp(4, 2);
        let before = grid.clone();
        let _ = GridCarver::with_blend(true).remove_vertical(&grid, &[1, 2]).unwrap();
        assert_eq!(grid, before);
    }

    #[test]
    fn seam_length_must_match() {
        let grid = ramp(3, 3);
        assert!(is_invalid_seam(GridCarver::new().remove_vertical(&grid, &[0, 1])));
        assert!(is_invalid_seam(
            GridCarver::new().remove_horizontal(&grid, &[0, 1, 1, 1])
        ));
    }

    #[test]
    fn seam_values_must_be_in_bounds() {
        let grid = ramp(3, 3);
        assert!(is_invalid_seam(GridCarver::new().remove_vertical(&grid, &[0, 3, 1])));
        assert!(is_invalid_seam(GridCarver::new().remove_horizontal(&grid, &[0, 0, 7])));
    }

    #[test]
    fn one_pixel_wide_grids_cannot_shrink() {
        let grid = ramp(1, 3);
        assert!(match GridCarver::new().remove_vertical(&grid, &[0, 0, 0]) {
            Err(CarveError::InvalidInput { .. }) => true,
            _ => false,
        });
    }

    #[test]
    fn blending_softens_the_join() {
        let mut buf = ImageBuffer::new(4, 1);
        for (x, v) in [10u8, 20, 31, 40].iter().enumerate() {
            buf.put_pixel(x as u32, 0, Rgb([*v, *v, 0]));
        }
        let grid = PixelGrid::from_image(&buf).unwrap();

        let carved = GridCarver::with_blend(true).remove_vertical(&grid, &[1]).unwrap();
        assert_eq!(carved.pixel(0, 0), &[20, 20, 0]);
        assert_eq!(carved.pixel(1, 0), &[31, 31, 0]);
        assert_eq!(carved.pixel(2, 0), &[40, 40, 0]);

        let plain = GridCarver::new().remove_vertical(&grid, &[1]).unwrap();
        assert_eq!(plain.pixel(0, 0), &[10, 10, 0]);
    }

    #[test]
    fn blending_softens_a_horizontal_join() {
        let grid = PixelGrid::new(2, 3, 1, vec![10u8, 5, 20, 6, 31, 9]).unwrap();

        let carved = GridCarver::with_blend(true).remove_horizontal(&grid, &[1, 1]).unwrap();
        assert_eq!(carved.dimensions(), (2, 2));
        // Above each removed pixel: the truncated mean of above and below.
        assert_eq!(carved.as_slice(), &[20, 7, 31, 9]);

        let plain = GridCarver::new().remove_horizontal(&grid, &[1, 1]).unwrap();
        assert_eq!(plain.as_slice(), &[10, 5, 31, 9]);
    }

    #[test]
    fn blending_skips_border_seams() {
        let grid = ramp(3, 1);
        let blended = GridCarver::with_blend(true).remove_vertical(&grid, &[2]).unwrap();
        let plain = GridCarver::new().remove_vertical(&grid, &[2]).unwrap();
        assert_eq!(blended, plain);
    }

    #[test]
    fn float_samples_blend_exactly() {
        let grid = PixelGrid::new(3, 1, 1, vec![1.0f32, 5.0, 2.0]).unwrap();
        let carved = GridCarver::with_blend(true).remove_vertical(&grid, &[1]).unwrap();
        assert_eq!(carved.as_slice(), &[1.5, 2.0]);
    }

    #[test]
    fn maps_shrink_with_their_grids() {
        let map = TwoDimensionalMap::from_raw(3, 2, vec![0, 1, 2, 3, 4, 5]).unwrap();
        let narrower = remove_vertical_from_map(&map, &[1, 0]).unwrap();
        assert_eq!(narrower.as_slice(), &[0, 2, 4, 5]);
        let shorter = remove_horizontal_from_map(&map, &[0, 1, 0]).unwrap();
        assert_eq!(shorter.as_slice(), &[3, 1, 5]);
    }
}
