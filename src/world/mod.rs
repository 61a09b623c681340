//! Learned knowledge about one gateway world.
//!
//! A [`WorldModel`] bundles everything that survives a restart:
//!
//! - the [`Grid`] of per-direction transitions,
//! - the [`KnownCells`] the agent has stood on,
//! - the [`Target`], once a terminal reward has been observed.
//!
//! The model is mutated only by the session loop; searches borrow it
//! immutably.

pub mod grid;
pub mod known;
pub mod snapshot;

pub use grid::{Cell, Grid, Transition};
pub use known::KnownCells;
pub use snapshot::SavedWorld;

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    types::{Coord, Direction},
};

/// Where the terminal reward was triggered from.
///
/// `position` is the cell the agent stood on and `approach` the direction it
/// issued; replaying `approach` from `position` re-triggers the reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub position: Coord,
    pub approach: Direction,
}

/// Grid, known-cell set and target record of one world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldModel {
    pub grid: Grid,
    pub known: KnownCells,
    pub target: Option<Target>,
}

impl WorldModel {
    /// A fresh model: default grid, nothing known, no target.
    pub fn new(grid_size: usize) -> Self {
        Self {
            grid: Grid::new(grid_size),
            known: KnownCells::new(),
            target: None,
        }
    }

    pub fn grid_size(&self) -> usize {
        self.grid.size()
    }

    /// Record the target unless one is already set. Returns `true` if this
    /// call set it.
    pub fn record_target(&mut self, target: Target) -> bool {
        if self.target.is_some() {
            return false;
        }
        self.target = Some(target);
        true
    }

    /// Check that known cells and the target lie on the grid.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CorruptSnapshot`] naming the first off-grid entry.
    pub fn check_bounds(&self) -> Result<()> {
        if let Some(coord) = self.known.iter().find(|&c| !self.grid.contains(c)) {
            return Err(Error::CorruptSnapshot {
                reason: format!("known cell {coord} is outside the grid"),
            });
        }
        match self.target {
            Some(target) if !self.grid.contains(target.position) => Err(Error::CorruptSnapshot {
                reason: format!("target {} is outside the grid", target.position),
            }),
            _ => Ok(()),
        }
    }

    /// Coverage summary of the learned map.
    pub fn stats(&self) -> MapStats {
        let explored_directions = self
            .known
            .iter()
            .filter_map(|coord| self.grid.cell(coord))
            .map(Cell::explored_count)
            .sum();
        MapStats {
            known_cells: self.known.len(),
            total_cells: self.grid.size() * self.grid.size(),
            explored_directions,
            known_directions: self.known.len() * Direction::ALL.len(),
            target: self.target,
        }
    }
}

/// How much of the world has been mapped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapStats {
    /// Cells the agent has stood on.
    pub known_cells: usize,
    pub total_cells: usize,
    /// Explored directions summed over known cells.
    pub explored_directions: usize,
    /// Four per known cell.
    pub known_directions: usize,
    pub target: Option<Target>,
}

impl MapStats {
    /// Fraction of grid cells visited, in `[0, 1]`.
    pub fn coverage(&self) -> f64 {
        if self.total_cells == 0 {
            0.0
        } else {
            self.known_cells as f64 / self.total_cells as f64
        }
    }
}
