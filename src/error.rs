// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors raised by the carving pipeline.

use crate::seamcarver::Axis;
use failure::Fail;

/// Everything that can go wrong while carving.  The first two kinds
/// are contract violations and abort the whole carve; the third is
/// an expected condition that `SeamCarver::carve` reports through
/// its `CarveReport` rather than failing.
#[derive(Debug, Clone, PartialEq, Fail)]
pub enum CarveError {
    /// The grid, map, or configuration handed in cannot be processed.
    #[fail(display = "invalid input: {}", reason)]
    InvalidInput { reason: String },

    /// A seam does not fit the grid it is being removed from.
    #[fail(display = "invalid seam: {}", reason)]
    InvalidSeam { reason: String },

    /// The min-dimension floor stopped a pass before the requested
    /// number of seams was removed.
    #[fail(
        display = "{:?} reduction stopped after {} of {} seams",
        axis, removed, requested
    )]
    UnsupportedReduction {
        axis: Axis,
        requested: usize,
        removed: usize,
    },
}

impl CarveError {
    pub(crate) fn invalid_input<T: Into<String>>(reason: T) -> Self {
        CarveError::InvalidInput {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_seam<T: Into<String>>(reason: T) -> Self {
        CarveError::InvalidSeam {
            reason: reason.into(),
        }
    }
}

/// Results from anything in this crate.
pub type Result<T> = std::result::Result<T, CarveError>;
