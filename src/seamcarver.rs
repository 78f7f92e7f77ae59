// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Seamcarve - The main loop
//!
//! Repeatedly estimate, find, and remove seams until the requested
//! number have been taken from each axis.  Vertical seams (which make
//! the image narrower) go first, in one full pass, then horizontal
//! seams.
//!
//! Recomputing the energy map after every seam is the expensive part.
//! With a `recompute_interval` above one the previous map is reused,
//! carved along the same seam as the image so that the two never
//! disagree about their size; the values in it are merely stale.

use crate::energy::{EnergyEstimator, EnergyMap};
use crate::error::{CarveError, Result};
use crate::pixelgrid::PixelGrid;
use crate::seamfinder::{energy_to_horizontal_seam, energy_to_vertical_seam, Seam};
use crate::seamremover::{remove_horizontal_from_map, remove_vertical_from_map, GridCarver};
use image::Primitive;
use log::{debug, trace, warn};

/// Which way a seam runs.  A vertical seam runs top to bottom and
/// removing it makes the image one column narrower; a horizontal seam
/// runs left to right and makes it one row shorter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Vertical,
    Horizontal,
}

impl Axis {
    // The extent that shrinks when a seam along this axis is removed.
    fn extent<S: Primitive>(self, grid: &PixelGrid<S>) -> usize {
        match self {
            Axis::Vertical => grid.width(),
            Axis::Horizontal => grid.height(),
        }
    }

    fn find(self, energy: &EnergyMap) -> Result<Seam> {
        match self {
            Axis::Vertical => energy_to_vertical_seam(energy),
            Axis::Horizontal => energy_to_horizontal_seam(energy),
        }
    }
}

/// Which axes a combined seam count is spent on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Vertical,
    Horizontal,
    Both,
}

/// How a combined seam count is divided when both axes are carved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisSplit {
    /// Half each; the odd seam goes to the vertical pass.
    Even,
    /// Wide images give up to 70% of the seams to the vertical pass:
    /// `0.5 + 0.2 * clamp(width / height - 1, 0, 1)`.
    AspectWeighted,
}

impl AxisSplit {
    /// Divide `seams` into (vertical, horizontal) for a grid of the
    /// given size.
    pub fn split(self, seams: usize, width: usize, height: usize) -> (usize, usize) {
        let vertical = match self {
            AxisSplit::Even => (seams + 1) / 2,
            AxisSplit::AspectWeighted => {
                let aspect = width as f64 / height.max(1) as f64;
                let weight = (aspect - 1.0).max(0.0).min(1.0);
                (seams as f64 * (0.5 + 0.2 * weight)).floor() as usize
            }
        };
        (vertical, seams - vertical)
    }
}

/// How many seams to take, in any of the ways a caller might ask.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SeamBudget {
    /// Exactly this many from each axis.
    Explicit { vertical: usize, horizontal: usize },
    /// A combined count spent along one axis or split over both.
    Total {
        seams: usize,
        direction: Direction,
        split: AxisSplit,
    },
    /// Carve down to these dimensions.
    Target { width: usize, height: usize },
}

impl SeamBudget {
    /// The (vertical, horizontal) seam counts for a grid of the given
    /// size.
    pub fn resolve(&self, width: usize, height: usize) -> Result<(usize, usize)> {
        match *self {
            SeamBudget::Explicit {
                vertical,
                horizontal,
            } => Ok((vertical, horizontal)),
            SeamBudget::Total {
                seams,
                direction,
                split,
            } => Ok(match direction {
                Direction::Vertical => (seams, 0),
                Direction::Horizontal => (0, seams),
                Direction::Both => split.split(seams, width, height),
            }),
            SeamBudget::Target {
                width: new_width,
                height: new_height,
            } => {
                if new_width == 0 || new_height == 0 {
                    return Err(CarveError::invalid_input(format!(
                        "cannot carve down to {}x{}",
                        new_width, new_height
                    )));
                }
                if new_width > width || new_height > height {
                    return Err(CarveError::invalid_input(format!(
                        "seam carving cannot enlarge {}x{} to {}x{}",
                        width, height, new_width, new_height
                    )));
                }
                Ok((width - new_width, height - new_height))
            }
        }
    }
}

/// Tunables for the carving loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarveConfig {
    /// Neither axis is carved below this many pixels.
    pub min_dimension: usize,
    /// Recompute the energy map every this many seams.
    pub recompute_interval: usize,
    /// Blend the neighbours of each removed pixel.
    pub enable_color_blend: bool,
    /// `Some(weight)` selects the normalized energy map with a local
    /// variation term of that weight.
    pub variation_weight: Option<f64>,
    /// Add each pixel's forward cost to its energy.
    pub forward_cost: bool,
}

impl Default for CarveConfig {
    fn default() -> Self {
        CarveConfig {
            min_dimension: 2,
            recompute_interval: 1,
            enable_color_blend: false,
            variation_weight: None,
            forward_cost: false,
        }
    }
}

impl CarveConfig {
    pub fn with_min_dimension(mut self, min_dimension: usize) -> Self {
        self.min_dimension = min_dimension;
        self
    }

    pub fn with_recompute_interval(mut self, recompute_interval: usize) -> Self {
        self.recompute_interval = recompute_interval;
        self
    }

    pub fn with_color_blend(mut self, enable_color_blend: bool) -> Self {
        self.enable_color_blend = enable_color_blend;
        self
    }

    pub fn with_variation_weight(mut self, variation_weight: Option<f64>) -> Self {
        self.variation_weight = variation_weight;
        self
    }

    pub fn with_forward_cost(mut self, forward_cost: bool) -> Self {
        self.forward_cost = forward_cost;
        self
    }

    /// Reject settings the loop cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.min_dimension < 1 {
            return Err(CarveError::invalid_input("min_dimension must be at least 1"));
        }
        if self.recompute_interval < 1 {
            return Err(CarveError::invalid_input(
                "recompute_interval must be at least 1",
            ));
        }
        if let Some(weight) = self.variation_weight {
            if !weight.is_finite() || weight < 0.0 {
                return Err(CarveError::invalid_input(format!(
                    "variation weight must be a non-negative number, got {}",
                    weight
                )));
            }
        }
        Ok(())
    }
}

/// What a carve asked for and what it got.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CarveReport {
    pub vertical_requested: usize,
    pub vertical_removed: usize,
    pub horizontal_requested: usize,
    pub horizontal_removed: usize,
    /// How many energy maps were computed from scratch.
    pub energy_recomputes: usize,
}

impl CarveReport {
    /// True when every requested seam was removed.
    pub fn is_complete(&self) -> bool {
        self.vertical_removed == self.vertical_requested
            && self.horizontal_removed == self.horizontal_requested
    }

    /// The first axis on which the min-dimension floor cut the carve
    /// short, as an `UnsupportedReduction`.
    pub fn shortfall(&self) -> Option<CarveError> {
        if self.vertical_removed < self.vertical_requested {
            Some(CarveError::UnsupportedReduction {
                axis: Axis::Vertical,
                requested: self.vertical_requested,
                removed: self.vertical_removed,
            })
        } else if self.horizontal_removed < self.horizontal_requested {
            Some(CarveError::UnsupportedReduction {
                axis: Axis::Horizontal,
                requested: self.horizontal_requested,
                removed: self.horizontal_removed,
            })
        } else {
            None
        }
    }
}

/// The carved grid, with the account of how it got that way.
#[derive(Debug, Clone, PartialEq)]
pub struct Carved<S: Primitive> {
    pub grid: PixelGrid<S>,
    pub report: CarveReport,
}

// One axis pass: the grid that came out, seams removed, maps computed.
struct Pass<S: Primitive> {
    grid: PixelGrid<S>,
    removed: usize,
    recomputes: usize,
}

/// The carving engine.  Holds only configuration; every call owns its
/// own grid and maps, so one engine can carve many images, from many
/// threads, without interference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeamCarver {
    config: CarveConfig,
    estimator: EnergyEstimator,
    carver: GridCarver,
}

impl SeamCarver {
    /// Creates a new SeamCarver, checking the configuration first.
    pub fn new(config: CarveConfig) -> Result<Self> {
        config.validate()?;
        Ok(SeamCarver {
            config,
            estimator: EnergyEstimator::with_variation(config.variation_weight)
                .with_forward_cost(config.forward_cost),
            carver: GridCarver::with_blend(config.enable_color_blend),
        })
    }

    pub fn config(&self) -> &CarveConfig {
        &self.config
    }

    /// Remove `vertical` seams, then `horizontal` seams.  Running into
    /// the min-dimension floor is not an error: the pass stops and the
    /// report records the shortfall.
    pub fn carve<S: Primitive>(
        &self,
        grid: PixelGrid<S>,
        vertical: usize,
        horizontal: usize,
    ) -> Result<Carved<S>> {
        debug!(
            "carving {}x{}: {} vertical, {} horizontal seams",
            grid.width(),
            grid.height(),
            vertical,
            horizontal
        );
        let first = self.carve_axis(grid, Axis::Vertical, vertical)?;
        let second = self.carve_axis(first.grid, Axis::Horizontal, horizontal)?;
        let report = CarveReport {
            vertical_requested: vertical,
            vertical_removed: first.removed,
            horizontal_requested: horizontal,
            horizontal_removed: second.removed,
            energy_recomputes: first.recomputes + second.recomputes,
        };
        Ok(Carved {
            grid: second.grid,
            report,
        })
    }

    /// Carve by any kind of budget.
    pub fn carve_budget<S: Primitive>(
        &self,
        grid: PixelGrid<S>,
        budget: SeamBudget,
    ) -> Result<Carved<S>> {
        let (vertical, horizontal) = budget.resolve(grid.width(), grid.height())?;
        self.carve(grid, vertical, horizontal)
    }

    /// As `carve`, but a shortfall is an error.
    pub fn carve_exact<S: Primitive>(
        &self,
        grid: PixelGrid<S>,
        vertical: usize,
        horizontal: usize,
    ) -> Result<PixelGrid<S>> {
        let carved = self.carve(grid, vertical, horizontal)?;
        match carved.report.shortfall() {
            Some(err) => Err(err),
            None => Ok(carved.grid),
        }
    }

    fn carve_axis<S: Primitive>(
        &self,
        grid: PixelGrid<S>,
        axis: Axis,
        count: usize,
    ) -> Result<Pass<S>> {
        let interval = self.config.recompute_interval;
        let mut grid = grid;
        let mut stale: Option<EnergyMap> = None;
        let mut removed = 0;
        let mut recomputes = 0;

        for i in 0..count {
            let extent = axis.extent(&grid);
            if extent <= self.config.min_dimension {
                warn!(
                    "{:?} pass stopped at {} pixels after {} of {} seams",
                    axis, extent, removed, count
                );
                break;
            }

            let energy = match stale.take() {
                Some(map) if i % interval != 0 => map,
                _ => {
                    debug!("{:?} seam {}: recomputing energy", axis, i);
                    recomputes += 1;
                    self.estimator.estimate(&grid)
                }
            };

            let seam = axis.find(&energy)?;
            trace!("{:?} seam {}: {:?}", axis, i, &*seam);

            grid = match axis {
                Axis::Vertical => self.carver.remove_vertical(&grid, &seam)?,
                Axis::Horizontal => self.carver.remove_horizontal(&grid, &seam)?,
            };
            removed += 1;

            if (i + 1) % interval != 0 {
                stale = Some(match axis {
                    Axis::Vertical => remove_vertical_from_map(&energy, &seam)?,
                    Axis::Horizontal => remove_horizontal_from_map(&energy, &seam)?,
                });
            }
        }

        Ok(Pass {
            grid,
            removed,
            recomputes,
        })
    }
}

/// Given a grid and a desired new width and height, carve it down
/// with the default configuration.
pub fn seamcarve<S: Primitive>(
    grid: PixelGrid<S>,
    new_width: usize,
    new_height: usize,
) -> Result<PixelGrid<S>> {
    let carver = SeamCarver::new(CarveConfig::default())?;
    let (vertical, horizontal) = SeamBudget::Target {
        width: new_width,
        height: new_height,
    }
    .resolve(grid.width(), grid.height())?;
    carver.carve_exact(grid, vertical, horizontal)
}
