// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The pixel grid
//!
//! The carving engine works on a plain rectangular array of samples,
//! `channels` per pixel, row-major.  It is owned outright by whoever
//! holds it: every carve builds a new, smaller grid and the old one
//! is dropped.  Conversions to and from ImageRS buffers are the only
//! place the engine touches the image library's pixel types.

use crate::error::{CarveError, Result};
use crate::twodmap::transpose_raw;
use image::{GenericImageView, ImageBuffer, Pixel, Primitive};
use num_traits::NumCast;

/// The most channels a pixel may carry (RGBA).
pub const MAX_CHANNELS: usize = 4;

/// A rectangular image of `height` rows, `width` columns, and
/// `channels` samples per pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelGrid<S: Primitive> {
    width: usize,
    height: usize,
    channels: usize,
    data: Vec<S>,
}

impl<S: Primitive> PixelGrid<S> {
    /// Wrap a row-major sample buffer.  Rejects empty grids, channel
    /// counts outside 1..=4, and buffers of the wrong length.
    pub fn new(width: usize, height: usize, channels: usize, data: Vec<S>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(CarveError::invalid_input(format!(
                "a pixel grid must be at least 1x1, got {}x{}",
                width, height
            )));
        }
        if channels == 0 || channels > MAX_CHANNELS {
            return Err(CarveError::invalid_input(format!(
                "a pixel grid must have 1 to {} channels, got {}",
                MAX_CHANNELS, channels
            )));
        }
        if data.len() != width * height * channels {
            return Err(CarveError::invalid_input(format!(
                "a {}x{}x{} grid needs {} samples, got {}",
                width,
                height,
                channels,
                width * height * channels,
                data.len()
            )));
        }
        Ok(PixelGrid {
            width,
            height,
            channels,
            data,
        })
    }

    /// A grid in which every pixel is `fill`.
    pub fn filled(width: usize, height: usize, fill: &[S]) -> Result<Self> {
        let data = fill
            .iter()
            .cloned()
            .cycle()
            .take(width * height * fill.len())
            .collect();
        PixelGrid::new(width, height, fill.len(), data)
    }

    /// Columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Samples per pixel.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// (width, height)
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// The samples of the pixel at column `x`, row `y`.
    pub fn pixel(&self, x: usize, y: usize) -> &[S] {
        let at = (y * self.width + x) * self.channels;
        &self.data[at..at + self.channels]
    }

    /// One sample widened to `f64`.
    pub fn sample(&self, x: usize, y: usize, channel: usize) -> f64 {
        let v = self.data[(y * self.width + x) * self.channels + channel];
        <f64 as NumCast>::from(v).unwrap_or(0.0)
    }

    /// The whole grid, row-major, channels interleaved.
    pub fn as_slice(&self) -> &[S] {
        &self.data
    }

    /// Release the sample buffer.
    pub fn into_raw(self) -> Vec<S> {
        self.data
    }

    /// A materialized copy with rows and columns exchanged.
    pub fn transpose(&self) -> Self {
        PixelGrid {
            width: self.height,
            height: self.width,
            channels: self.channels,
            data: transpose_raw(&self.data, self.width, self.height, self.channels),
        }
    }

    /// Copy any ImageRS image into a grid.
    pub fn from_image<I, P>(image: &I) -> Result<Self>
    where
        I: GenericImageView<Pixel = P>,
        P: Pixel<Subpixel = S> + 'static,
        S: 'static,
    {
        let (width, height) = image.dimensions();
        let mut channels = 0;
        let mut data = Vec::new();
        for (_, _, pixel) in image.pixels() {
            let c = pixel.channels();
            channels = c.len();
            data.extend_from_slice(c);
        }
        PixelGrid::new(width as usize, height as usize, channels, data)
    }

    /// Hand the grid back as an ImageRS buffer.  The pixel type must
    /// have the same number of channels as the grid.
    pub fn into_image<P>(self) -> Result<ImageBuffer<P, Vec<S>>>
    where
        P: Pixel<Subpixel = S> + 'static,
        S: 'static,
    {
        let (width, height, channels) = (self.width, self.height, self.channels);
        let mismatch = || {
            CarveError::invalid_input(format!(
                "a {}x{} grid with {} channels does not fit the requested pixel type",
                width, height, channels
            ))
        };
        // ImageBuffer::from_raw accepts oversized buffers, so the
        // channel count is checked against a one-pixel buffer first.
        let wanted = ImageBuffer::<P, Vec<S>>::new(1, 1).into_raw().len();
        if wanted != channels {
            return Err(mismatch());
        }
        ImageBuffer::from_raw(width as u32, height as u32, self.data).ok_or_else(mismatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb, RgbImage};

    #[test]
    fn rejects_degenerate_grids() {
        let cases = vec![
            PixelGrid::<u8>::new(0, 3, 3, vec![]),
            PixelGrid::<u8>::new(3, 0, 3, vec![]),
            PixelGrid::<u8>::new(1, 1, 0, vec![]),
            PixelGrid::<u8>::new(1, 1, 5, vec![0; 5]),
            PixelGrid::<u8>::new(2, 2, 3, vec![0; 11]),
        ];
        for case in cases {
            assert!(match case {
                Err(CarveError::InvalidInput { .. }) => true,
                _ => false,
            });
        }
    }

    #[test]
    fn addresses_pixels() {
        let grid = PixelGrid::new(2, 2, 3, (0u8..12).collect()).unwrap();
        assert_eq!(grid.pixel(1, 0), &[3, 4, 5]);
        assert_eq!(grid.pixel(0, 1), &[6, 7, 8]);
        assert_eq!(grid.sample(1, 1, 2), 11.0);
    }

    #[test]
    fn transposes_whole_pixels() {
        let grid = PixelGrid::new(2, 1, 3, vec![1u8, 2, 3, 4, 5, 6]).unwrap();
        let flipped = grid.transpose();
        assert_eq!(flipped.dimensions(), (1, 2));
        assert_eq!(flipped.pixel(0, 1), &[4, 5, 6]);
        assert_eq!(flipped.transpose(), grid);
    }

    #[test]
    fn image_buffers_pass_through() {
        let mut img = RgbImage::new(3, 2);
        img.put_pixel(2, 1, Rgb([10, 20, 30]));
        let grid = PixelGrid::from_image(&img).unwrap();
        assert_eq!(grid.dimensions(), (3, 2));
        assert_eq!(grid.channels(), 3);
        assert_eq!(grid.pixel(2, 1), &[10, 20, 30]);
        let back: RgbImage = grid.into_image().unwrap();
        assert_eq!(back.dimensions(), img.dimensions());
        assert_eq!(back.into_raw(), img.into_raw());
    }

    #[test]
    fn refuses_mismatched_pixel_type() {
        let grid = PixelGrid::filled(2, 2, &[1u8, 2, 3]).unwrap();
        let back = grid.into_image::<Luma<u8>>();
        assert!(back.is_err());
    }
}
