// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Render an energy map as a grayscale image, brightest where the
//! energy is highest.  Handy for seeing where the seams will go.

use crate::energy::EnergyMap;
use image::{GrayImage, ImageBuffer, Luma};
use itertools::iproduct;

/// Scale the map so that its maximum is white.  An all-zero map is
/// all black.
pub fn energy_to_image(energy: &EnergyMap) -> GrayImage {
    let (width, height) = (energy.width(), energy.height());
    let factor = energy.as_slice().iter().cloned().fold(0.0, f64::max);
    let mut out: GrayImage = ImageBuffer::new(width as u32, height as u32);
    if factor <= 0.0 {
        return out;
    }
    for (y, x) in iproduct!(0..height, 0..width) {
        let level = (energy[(x, y)] / factor * 255.0).round().max(0.0).min(255.0);
        out.put_pixel(x as u32, y as u32, Luma([level as u8]));
    }
    out
}
