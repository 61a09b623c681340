//! Cell/transition store
//!
//! Every cell keeps, per direction, where that move led the last time it was
//! recorded, how many times it was attempted and the last reward seen. The
//! store starts out holding the geometric expectation and is overwritten by
//! observed outcomes (most recent wins).

use serde::{Deserialize, Serialize};

use crate::{
    Error,
    types::{Coord, Direction, DirectionMap},
};

/// Learned outcome of one (cell, direction) pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    /// Where this direction led the last time an outcome was recorded.
    pub destination: Coord,
    /// Attempts made in this direction (0 = unexplored).
    pub samples: u32,
    /// Reward of the last recorded outcome.
    pub last_reward: f64,
}

impl Transition {
    fn unexplored(destination: Coord) -> Self {
        Self {
            destination,
            samples: 0,
            last_reward: 0.0,
        }
    }

    pub fn is_explored(&self) -> bool {
        self.samples > 0
    }
}

/// The four directional transitions of one grid coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub transitions: DirectionMap<Transition>,
}

impl Cell {
    /// A cell whose transitions point at the geometric neighbours, or back at
    /// itself where the neighbour is off-grid.
    pub fn expected(coord: Coord, size: usize) -> Self {
        Self {
            transitions: DirectionMap::from_fn(|direction| {
                let neighbor = coord.step(direction);
                let destination = if neighbor.in_bounds(size) {
                    neighbor
                } else {
                    coord
                };
                Transition::unexplored(destination)
            }),
        }
    }

    /// Number of directions attempted at least once.
    pub fn explored_count(&self) -> usize {
        self.transitions
            .iter()
            .filter(|(_, t)| t.is_explored())
            .count()
    }
}

/// Fixed-size square lattice of cells, stored row-major.
///
/// Decoding checks that the cell count matches `size` and that every
/// destination lies on the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GridParts")]
pub struct Grid {
    size: usize,
    cells: Vec<Cell>,
}

#[derive(Deserialize)]
struct GridParts {
    size: usize,
    cells: Vec<Cell>,
}

impl TryFrom<GridParts> for Grid {
    type Error = Error;

    fn try_from(GridParts { size, cells }: GridParts) -> Result<Self, Self::Error> {
        let corrupt = |reason: String| Err(Error::CorruptSnapshot { reason });
        if i32::try_from(size).is_err() {
            return corrupt(format!("grid size {size} does not fit in a coordinate"));
        }
        let expected = size.checked_mul(size);
        if expected != Some(cells.len()) {
            return corrupt(format!(
                "{size}x{size} grid holds {} cells",
                cells.len()
            ));
        }
        for (index, cell) in cells.iter().enumerate() {
            for (direction, transition) in cell.transitions.iter() {
                if !transition.destination.in_bounds(size) {
                    return corrupt(format!(
                        "{} {direction} leads off the grid to {}",
                        Self::coord_at(index, size),
                        transition.destination
                    ));
                }
            }
        }
        Ok(Self { size, cells })
    }
}

impl Grid {
    /// Allocate a `size`×`size` grid with every cell at its geometric default.
    pub fn new(size: usize) -> Self {
        let cells = (0..size * size)
            .map(|i| Cell::expected(Self::coord_at(i, size), size))
            .collect();
        Self { size, cells }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn contains(&self, coord: Coord) -> bool {
        coord.in_bounds(self.size)
    }

    fn index(&self, coord: Coord) -> Option<usize> {
        self.contains(coord)
            .then(|| coord.row as usize * self.size + coord.col as usize)
    }

    fn coord_at(index: usize, size: usize) -> Coord {
        Coord::new((index / size) as i32, (index % size) as i32)
    }

    /// Row-major index of an in-grid coordinate, as used by flat tables.
    pub fn flat_index(&self, coord: Coord) -> Option<usize> {
        self.index(coord)
    }

    /// All coordinates in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.cells.len()).map(|i| Self::coord_at(i, self.size))
    }

    pub fn cell(&self, coord: Coord) -> Option<&Cell> {
        self.index(coord).map(|i| &self.cells[i])
    }

    pub fn transition(&self, coord: Coord, direction: Direction) -> Option<&Transition> {
        self.cell(coord).map(|cell| &cell.transitions[direction])
    }

    fn transition_mut(&mut self, coord: Coord, direction: Direction) -> Option<&mut Transition> {
        let index = self.index(coord)?;
        Some(&mut self.cells[index].transitions[direction])
    }

    /// The geometric neighbour of `coord`, if it lies on the grid.
    pub fn neighbor(&self, coord: Coord, direction: Direction) -> Option<Coord> {
        let next = coord.step(direction);
        self.contains(next).then_some(next)
    }

    /// Record one observed outcome: bumps the sample count and overwrites the
    /// destination and reward.
    pub fn record_outcome(
        &mut self,
        coord: Coord,
        direction: Direction,
        destination: Coord,
        reward: f64,
    ) {
        debug_assert!(
            self.contains(destination),
            "destination {destination} is off-grid"
        );
        if !self.contains(destination) {
            return;
        }
        if let Some(transition) = self.transition_mut(coord, direction) {
            transition.samples += 1;
            transition.destination = destination;
            transition.last_reward = reward;
        } else {
            debug_assert!(false, "record_outcome on off-grid cell {coord}");
        }
    }

    /// Count an attempt without trusting its outcome.
    pub fn record_attempt(&mut self, coord: Coord, direction: Direction) {
        if let Some(transition) = self.transition_mut(coord, direction) {
            transition.samples += 1;
        } else {
            debug_assert!(false, "record_attempt on off-grid cell {coord}");
        }
    }

    pub fn is_explored(&self, coord: Coord, direction: Direction) -> bool {
        self.transition(coord, direction)
            .is_some_and(Transition::is_explored)
    }

    pub fn samples(&self, coord: Coord, direction: Direction) -> u32 {
        self.transition(coord, direction).map_or(0, |t| t.samples)
    }

    /// Edges of the learned transition graph leaving `coord`.
    ///
    /// Only explored directions count, and self-loops (walls) are left out.
    pub fn explored_edges(&self, coord: Coord) -> impl Iterator<Item = (Direction, Coord)> + '_ {
        self.cell(coord)
            .into_iter()
            .flat_map(|cell| cell.transitions.iter())
            .filter(move |(_, t)| {
                t.is_explored() && t.destination != coord && self.contains(t.destination)
            })
            .map(|(direction, t)| (direction, t.destination))
    }

    /// Apply learned destinations for `path` starting at `start`.
    ///
    /// Returns `None` if a step leaves the grid or uses an unexplored
    /// direction.
    pub fn follow(&self, start: Coord, path: &[Direction]) -> Option<Coord> {
        path.iter().try_fold(start, |at, &direction| {
            self.transition(at, direction)
                .filter(|t| t.is_explored())
                .map(|t| t.destination)
        })
    }
}
