// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Two-dimensional scalar fields.
//!
//! The energy map, the cumulative-cost table and its back pointers
//! are all rectangular fields of small `Copy` values addressed by
//! `(x, y)`.  They share one storage type so that the index math
//! lives in exactly one place.

use crate::error::{CarveError, Result};
use std::ops::{Index, IndexMut};

/// Read-only access to a rectangular field.  The seam finder is
/// written against this trait so that it can walk either a map or a
/// transposed view of one (see `Flipper`) without copying.
pub trait Lattice {
    /// The cell type.
    type Item: Copy;

    /// Columns.
    fn width(&self) -> usize;

    /// Rows.
    fn height(&self) -> usize;

    /// The value at column `x`, row `y`.
    fn get(&self, x: usize, y: usize) -> Self::Item;

    /// (width, height)
    fn dimensions(&self) -> (usize, usize) {
        (self.width(), self.height())
    }
}

/// An addressable two-dimensional field containing an object that
/// represents one of several possible objects during processing: an
/// `f64` for the energy map, or an energy + back pointer pair for the
/// seam table.
#[derive(Debug, Clone, PartialEq)]
pub struct TwoDimensionalMap<P: Default + Copy> {
    width: usize,
    height: usize,
    data: Vec<P>,
}

impl<P: Default + Copy> TwoDimensionalMap<P> {
    /// Define a new map filled with `P::default()`.
    pub fn new(width: usize, height: usize) -> Self {
        TwoDimensionalMap {
            width,
            height,
            data: vec![P::default(); width * height],
        }
    }

    /// Wrap an existing row-major buffer.  The buffer must hold exactly
    /// `width * height` cells.
    pub fn from_raw(width: usize, height: usize, data: Vec<P>) -> Result<Self> {
        if data.len() != width * height {
            return Err(CarveError::invalid_input(format!(
                "a {}x{} map needs {} cells, got {}",
                width,
                height,
                width * height,
                data.len()
            )));
        }
        Ok(TwoDimensionalMap {
            width,
            height,
            data,
        })
    }

    // For buffers the crate sized from these same dimensions.
    pub(crate) fn from_sized(width: usize, height: usize, data: Vec<P>) -> Self {
        debug_assert_eq!(data.len(), width * height);
        TwoDimensionalMap {
            width,
            height,
            data,
        }
    }

    // Absolutely, the number one name of this game is keep the index
    // math in a singular location and never, ever mess with it.
    fn get_index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// True when the map holds no cells at all.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The whole field, row-major.
    pub fn as_slice(&self) -> &[P] {
        &self.data
    }

    /// One row of the field.
    pub fn row(&self, y: usize) -> &[P] {
        let start = self.get_index(0, y);
        &self.data[start..start + self.width]
    }

    /// Release the row-major buffer.
    pub fn into_raw(self) -> Vec<P> {
        self.data
    }

    /// A materialized copy with rows and columns exchanged.
    pub fn transpose(&self) -> Self {
        TwoDimensionalMap {
            width: self.height,
            height: self.width,
            data: transpose_raw(&self.data, self.width, self.height, 1),
        }
    }
}

impl<P: Default + Copy> Lattice for TwoDimensionalMap<P> {
    type Item = P;

    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn get(&self, x: usize, y: usize) -> P {
        self[(x, y)]
    }
}

impl<P: Default + Copy> Index<(usize, usize)> for TwoDimensionalMap<P> {
    type Output = P;

    /// A convenience addressing mode for getting values.
    fn index(&self, (x, y): (usize, usize)) -> &P {
        let index = self.get_index(x, y);
        &self.data[index]
    }
}

impl<P: Default + Copy> IndexMut<(usize, usize)> for TwoDimensionalMap<P> {
    /// A convenience addressing mode for setting values.
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut P {
        let index = self.get_index(x, y);
        &mut self.data[index]
    }
}

/// One cell of the seam table: the cheapest cumulative energy with
/// which a seam can reach this cell, and which neighbour in the row
/// above supplied it, as a column offset in {-1, 0, +1}.
#[derive(Default, Debug, Copy, Clone, PartialEq)]
pub struct EnergyAndBackPointer<P: Default + Copy> {
    pub energy: P,
    pub parent: i8,
}

impl<P: Default + Copy> EnergyAndBackPointer<P> {
    pub fn new(energy: P, parent: i8) -> Self {
        EnergyAndBackPointer { energy, parent }
    }
}

// Transpose a row-major buffer of `stride`-sized cells.  Cells move
// as a unit, so multi-channel pixels keep their channels together.
pub(crate) fn transpose_raw<T: Copy>(
    data: &[T],
    width: usize,
    height: usize,
    stride: usize,
) -> Vec<T> {
    let mut out = Vec::with_capacity(data.len());
    for x in 0..width {
        for y in 0..height {
            let at = (y * width + x) * stride;
            out.extend_from_slice(&data[at..at + stride]);
        }
    }
    out
}
