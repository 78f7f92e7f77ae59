// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Dimensional flipper
//!
//! A proxy for any `Lattice` that maps the width to the original
//! height, and vice versa, as well as every x to y and vice versa.
//!
//! A horizontal seam through a map is a vertical seam through the
//! map turned on its side.  By virtually "flipping" the map 90° the
//! seam finder only has to know how to walk downward, and no copy of
//! the map is ever made.

use crate::twodmap::Lattice;

pub struct Flipper<'a, L: Lattice> {
    pub inner: &'a L,
}

impl<'a, L: Lattice> Flipper<'a, L> {
    pub fn new(inner: &'a L) -> Self {
        Flipper { inner }
    }
}

impl<'a, L: Lattice> Lattice for Flipper<'a, L> {
    type Item = L::Item;

    fn width(&self) -> usize {
        self.inner.height()
    }

    fn height(&self) -> usize {
        self.inner.width()
    }

    fn get(&self, x: usize, y: usize) -> L::Item {
        self.inner.get(y, x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::twodmap::TwoDimensionalMap;

    #[test]
    fn flipped_view_matches_transpose() {
        let map = TwoDimensionalMap::from_raw(3, 2, vec![0, 1, 2, 3, 4, 5]).unwrap();
        let flipped = Flipper::new(&map);
        let copied = map.transpose();
        assert_eq!(flipped.dimensions(), (2, 3));
        for y in 0..3 {
            for x in 0..2 {
                assert_eq!(flipped.get(x, y), copied[(x, y)]);
            }
        }
    }
}
