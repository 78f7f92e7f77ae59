// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Find the cheapest seam through an energy map.
//!
//! The seam table is filled top to bottom.  Row 0 costs only its own
//! energy; every later cell costs its own energy plus the cheapest of
//! the (up to) three cells above it:
//!
//! ```text
//!                      ⎧ M(x−1,y−1)
//! M(x,y) = e(x,y) + min⎨ M(x,y−1)
//!                      ⎩ M(x+1,y−1)
//! ```
//!
//! Each cell remembers which of those three supplied its minimum, so
//! the seam is recovered by walking back up from the cheapest cell in
//! the last row.
//!
//! Ties are broken the same way everywhere: straight up first, then
//! up-left, then up-right; and in the last row the leftmost minimum
//! wins.  On a perfectly flat map this yields a straight seam down
//! column 0, every time.

use crate::error::{CarveError, Result};
use crate::flipper::Flipper;
use crate::twodmap::{EnergyAndBackPointer, Lattice, TwoDimensionalMap};
use std::ops::Deref;

/// The cumulative-cost table with its back pointers.
pub type SeamTable = TwoDimensionalMap<EnergyAndBackPointer<f64>>;

/// A connected path of cells, one per row for a vertical seam (each
/// element a column) or one per column for a horizontal seam (each
/// element a row).  Neighbouring elements differ by at most one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seam(Vec<usize>);

impl Seam {
    pub fn new(indices: Vec<usize>) -> Self {
        Seam(indices)
    }

    /// True when every step moves by at most one cell.
    pub fn is_connected(&self) -> bool {
        self.0
            .windows(2)
            .all(|w| (w[0] as isize - w[1] as isize).abs() <= 1)
    }

    pub fn into_vec(self) -> Vec<usize> {
        self.0
    }
}

impl Deref for Seam {
    type Target = [usize];

    fn deref(&self) -> &[usize] {
        &self.0
    }
}

impl From<Vec<usize>> for Seam {
    fn from(indices: Vec<usize>) -> Self {
        Seam(indices)
    }
}

// 1. Given a cell *not* in the first row,
// 2. There exist up to three cells above from which a seam can arrive,
// 3. Take the cheapest, preferring straight, then left, then right,
// 4. And return the pair of (cumulative cost, which parent).
fn cheapest_parent(table: &SeamTable, x: usize, y: usize) -> EnergyAndBackPointer<f64> {
    let above = |x: usize| table[(x, y - 1)].energy;
    let mut best = EnergyAndBackPointer::new(above(x), 0);
    if x > 0 && above(x - 1) < best.energy {
        best = EnergyAndBackPointer::new(above(x - 1), -1);
    }
    if x + 1 < table.width() && above(x + 1) < best.energy {
        best = EnergyAndBackPointer::new(above(x + 1), 1);
    }
    best
}

/// Fill the cumulative-cost table for a downward seam.
pub fn seam_table<L: Lattice<Item = f64>>(energy: &L) -> Result<SeamTable> {
    let (width, height) = energy.dimensions();
    if width == 0 || height == 0 {
        return Err(CarveError::invalid_input(format!(
            "cannot find a seam in a {}x{} energy map",
            width, height
        )));
    }

    let mut table = SeamTable::new(width, height);
    for x in 0..width {
        table[(x, 0)] = EnergyAndBackPointer::new(energy.get(x, 0), 0);
    }
    for y in 1..height {
        for x in 0..width {
            let parent = cheapest_parent(&table, x, y);
            table[(x, y)] =
                EnergyAndBackPointer::new(energy.get(x, y) + parent.energy, parent.parent);
        }
    }
    Ok(table)
}

// Walk the back pointers from the cheapest cell of the last row.  An
// empty table has no seam.
fn backtrack(table: &SeamTable) -> Seam {
    let (width, height) = (table.width(), table.height());
    if width == 0 || height == 0 {
        return Seam(Vec::new());
    }
    let last = table.row(height - 1);

    // First occurrence wins.
    let mut col = 0;
    for (x, cell) in last.iter().enumerate() {
        if cell.energy < last[col].energy {
            col = x;
        }
    }

    let mut seam = vec![0; height];
    seam[height - 1] = col;
    for y in (0..height - 1).rev() {
        let below = seam[y + 1];
        let stepped = below as isize + table[(below, y + 1)].parent as isize;
        seam[y] = stepped.max(0).min(width as isize - 1) as usize;
    }
    Seam(seam)
}

/// Given an energy map, return the list of x-coordinates that, when
/// mapped with the range (0..height), give the XY coordinates for each
/// pixel in the cheapest top-to-bottom seam.
pub fn energy_to_vertical_seam<L: Lattice<Item = f64>>(energy: &L) -> Result<Seam> {
    Ok(backtrack(&seam_table(energy)?))
}

/// Given an energy map, return the list of y-coordinates that, when
/// mapped with the range (0..width), give the XY coordinates for each
/// pixel in the cheapest left-to-right seam.  This is the vertical
/// search run over the map turned on its side.
pub fn energy_to_horizontal_seam<L: Lattice<Item = f64>>(energy: &L) -> Result<Seam> {
    energy_to_vertical_seam(&Flipper::new(energy))
}
