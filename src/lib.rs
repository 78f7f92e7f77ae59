// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Seam carving: shrink an image by repeatedly removing the connected
//! path of pixels whose loss is least visible.
//!
//! The pipeline is energy → seam → removal, one seam at a time:
//!
//! ```no_run
//! use image::RgbImage;
//! use seamcarve::{CarveConfig, PixelGrid, SeamCarver};
//!
//! # fn main() -> Result<(), seamcarve::CarveError> {
//! let img = RgbImage::new(64, 48);
//! let grid = PixelGrid::from_image(&img)?;
//! let carved = SeamCarver::new(CarveConfig::default())?.carve(grid, 10, 5)?;
//! let smaller: RgbImage = carved.grid.into_image()?;
//! # Ok(())
//! # }
//! ```

mod ternary;

pub mod dump;
pub mod energy;
pub mod error;
pub mod flipper;
pub mod pixelgrid;
pub mod seamcarver;
pub mod seamfinder;
pub mod seamremover;
pub mod twodmap;

pub use energy::{calculate_energy, EnergyEstimator, EnergyMap};
pub use error::{CarveError, Result};
pub use pixelgrid::PixelGrid;
pub use seamcarver::{
    seamcarve, Axis, AxisSplit, CarveConfig, CarveReport, Carved, Direction, SeamBudget,
    SeamCarver,
};
pub use seamfinder::{energy_to_horizontal_seam, energy_to_vertical_seam, Seam};
pub use seamremover::GridCarver;
