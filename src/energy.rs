// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Calculate the energy of an image
//!
//! Given a pixel grid, calculate a map of how visually important each
//! pixel is.  The base energy is the Sobel gradient magnitude of each
//! channel, weighted by that channel's share of perceived luminance:
//!
//! ```text
//!   dx = Sobel_x * I_c,  dy = Sobel_y * I_c
//! e(x,y) = Σ_c w_c · sqrt(dx² + dy²)
//! ```
//!
//! Out-of-grid neighbours are clamped to the nearest edge pixel, so a
//! border is never mistaken for an edge.
//!
//! The enhanced variant rescales that map to [0, 1] and adds a small
//! weighted term for local colour variation, which keeps seams out of
//! regions with subtle but visible shading.
//!
//! Either map may also carry a forward cost: for each pixel, the
//! cheapest of the three ways a seam could arrive from the row above,
//! priced by the new neighbour differences its removal would create.

use crate::cq;
use crate::pixelgrid::PixelGrid;
use crate::twodmap::TwoDimensionalMap;
use image::Primitive;
use itertools::{iproduct, Itertools, MinMaxResult};

/// A per-pixel importance map.  Never negative.
pub type EnergyMap = TwoDimensionalMap<f64>;

/// Perceptual luminance weights for red, green and blue.
pub const LUMA_WEIGHTS: [f64; 3] = [0.299, 0.587, 0.114];

const LUMA_ALPHA_WEIGHTS: [f64; 4] = [0.299, 0.587, 0.114, 0.0];

/// The weight given to local colour variation in the enhanced map.
pub const DEFAULT_VARIATION_WEIGHT: f64 = 0.02;

// Below this spread a map is treated as flat and left unscaled.
const FLAT_EPSILON: f64 = 1e-8;

/// How much each channel contributes to the energy.  Gray counts in
/// full; alpha, when present, not at all.
pub fn channel_weights(channels: usize) -> &'static [f64] {
    match channels {
        1 => &[1.0],
        2 => &[1.0, 0.0],
        3 => &LUMA_WEIGHTS,
        _ => &LUMA_ALPHA_WEIGHTS,
    }
}

/// Turns a pixel grid into an energy map.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EnergyEstimator {
    variation_weight: Option<f64>,
    forward_cost: bool,
}

impl EnergyEstimator {
    /// The plain luminance-weighted Sobel estimator.
    pub fn new() -> Self {
        EnergyEstimator {
            variation_weight: None,
            forward_cost: false,
        }
    }

    /// The normalized estimator with a local-variation term of the
    /// given weight.
    pub fn enhanced(weight: f64) -> Self {
        EnergyEstimator {
            variation_weight: Some(weight),
            forward_cost: false,
        }
    }

    /// Build from an optional variation weight, as carried in
    /// `CarveConfig`.
    pub fn with_variation(variation_weight: Option<f64>) -> Self {
        EnergyEstimator {
            variation_weight,
            forward_cost: false,
        }
    }

    /// Add the forward cost of each pixel to the gradient, before any
    /// normalization.  Off by default.
    pub fn with_forward_cost(mut self, forward_cost: bool) -> Self {
        self.forward_cost = forward_cost;
        self
    }

    /// Compute the energy of every pixel in the grid.  Pure and
    /// deterministic; a 1x1 or uniform grid yields all zeros.
    pub fn estimate<S: Primitive>(&self, grid: &PixelGrid<S>) -> EnergyMap {
        let (width, height) = grid.dimensions();
        let planes = weighted_planes(grid);
        let mut energy = sobel_pass(&planes, width, height);

        if self.forward_cost {
            energy
                .iter_mut()
                .zip(forward_pass(&planes, width, height))
                .for_each(|(e, f)| *e += f);
        }

        if let Some(weight) = self.variation_weight {
            normalize(&mut energy);
            let mut variation = variation_pass(&planes, width, height);
            if !normalize(&mut variation) {
                variation.iter_mut().for_each(|v| *v = 0.0);
            }
            energy
                .iter_mut()
                .zip(variation.iter())
                .for_each(|(e, v)| *e += weight * v);
        }

        TwoDimensionalMap::from_sized(width, height, energy)
    }
}

/// A convenience wrapper: the plain Sobel energy of a grid.
pub fn calculate_energy<S: Primitive>(grid: &PixelGrid<S>) -> EnergyMap {
    EnergyEstimator::new().estimate(grid)
}

// One f64 plane per channel that actually contributes, paired with
// its weight.  Zero-weight channels (alpha) are skipped entirely.
fn weighted_planes<S: Primitive>(grid: &PixelGrid<S>) -> Vec<(f64, Vec<f64>)> {
    let (width, height) = grid.dimensions();
    channel_weights(grid.channels())
        .iter()
        .enumerate()
        .filter(|(_, w)| **w > 0.0)
        .map(|(c, w)| {
            let plane: Vec<f64> = iproduct!(0..height, 0..width)
                .map(|(y, x)| grid.sample(x, y, c))
                .collect();
            (*w, plane)
        })
        .collect()
}

// The 3x3 Sobel gradient magnitude at (x, y), edges clamped.
fn sobel_at(plane: &[f64], width: usize, height: usize, x: usize, y: usize) -> f64 {
    let (xl, xr) = (cq!(x == 0, 0, x - 1), cq!(x + 1 >= width, x, x + 1));
    let (yu, yd) = (cq!(y == 0, 0, y - 1), cq!(y + 1 >= height, y, y + 1));
    let p = |x: usize, y: usize| plane[y * width + x];

    let dx = (p(xr, yu) - p(xl, yu)) + 2.0 * (p(xr, y) - p(xl, y)) + (p(xr, yd) - p(xl, yd));
    let dy = (p(xl, yd) - p(xl, yu)) + 2.0 * (p(x, yd) - p(x, yu)) + (p(xr, yd) - p(xr, yu));
    (dx * dx + dy * dy).sqrt()
}

// Fill `out`, which holds whole rows starting at `first_row`.
fn fill_rows(
    planes: &[(f64, Vec<f64>)],
    width: usize,
    height: usize,
    first_row: usize,
    out: &mut [f64],
) {
    for (i, cell) in out.iter_mut().enumerate() {
        let (x, y) = (i % width, first_row + i / width);
        *cell = planes
            .iter()
            .map(|(w, plane)| w * sobel_at(plane, width, height, x, y))
            .sum();
    }
}

#[cfg(not(feature = "threaded"))]
fn sobel_pass(planes: &[(f64, Vec<f64>)], width: usize, height: usize) -> Vec<f64> {
    let mut out = vec![0.0; width * height];
    fill_rows(planes, width, height, 0, &mut out);
    out
}

// Every output row depends only on the read-only planes, so the
// output is broken up by chunks_mut and each chunk filled in its own
// thread.
#[cfg(feature = "threaded")]
fn sobel_pass(planes: &[(f64, Vec<f64>)], width: usize, height: usize) -> Vec<f64> {
    let mut out = vec![0.0; width * height];
    let workers = num_cpus::get().max(1);
    let rows_per_chunk = ((height + workers - 1) / workers).max(1);

    let result = crossbeam::scope(|scope| {
        for (i, chunk) in out.chunks_mut(rows_per_chunk * width).enumerate() {
            scope.spawn(move |_| fill_rows(planes, width, height, i * rows_per_chunk, chunk));
        }
    });
    if let Err(panic) = result {
        std::panic::resume_unwind(panic);
    }
    out
}

// Channel-wise absolute first differences: central in the interior,
// one-sided at the borders, zero along an axis of length one.
fn variation_pass(planes: &[(f64, Vec<f64>)], width: usize, height: usize) -> Vec<f64> {
    fn slope(before: f64, after: f64, span: usize) -> f64 {
        cq!(span == 0, 0.0, (after - before) / span as f64)
    }

    iproduct!(0..height, 0..width)
        .map(|(y, x)| {
            let (xl, xr) = (cq!(x == 0, 0, x - 1), cq!(x + 1 >= width, x, x + 1));
            let (yu, yd) = (cq!(y == 0, 0, y - 1), cq!(y + 1 >= height, y, y + 1));
            planes
                .iter()
                .map(|(w, p)| {
                    let gx = slope(p[y * width + xl], p[y * width + xr], xr - xl);
                    let gy = slope(p[yu * width + x], p[yd * width + x], yd - yu);
                    w * (gx.abs() + gy.abs())
                })
                .sum::<f64>()
        })
        .collect()
}

// For every pixel below row 0, the cheapest way a seam can arrive
// from above.  Straight costs the vertical difference the removal
// leaves; a diagonal also joins the pixel to its new horizontal
// neighbour.  Differences are weighted per channel like the gradient.
fn forward_pass(planes: &[(f64, Vec<f64>)], width: usize, height: usize) -> Vec<f64> {
    let diff = |a: (usize, usize), b: (usize, usize)| -> f64 {
        planes
            .iter()
            .map(|(w, p)| w * (p[a.1 * width + a.0] - p[b.1 * width + b.0]).abs())
            .sum()
    };

    let mut out = vec![0.0; width * height];
    for (y, x) in iproduct!(1..height, 0..width) {
        let mut best = diff((x, y - 1), (x, y));
        if x > 0 {
            best = best.min(diff((x, y), (x - 1, y)) + diff((x, y - 1), (x - 1, y)));
        }
        if x + 1 < width {
            best = best.min(diff((x, y), (x + 1, y)) + diff((x, y - 1), (x + 1, y)));
        }
        out[y * width + x] = best;
    }
    out
}

// Min-max scale to [0, 1].  A flat field is left as it is, and false
// returned.
fn normalize(values: &mut [f64]) -> bool {
    if let MinMaxResult::MinMax(lo, hi) = values.iter().cloned().minmax() {
        let range = hi - lo;
        if range > FLAT_EPSILON {
            values.iter_mut().for_each(|v| *v = (*v - lo) / range);
            return true;
        }
    }
    false
}
