//! Exploration policy
//!
//! Picks the next direction to probe. In order of preference:
//!
//! 1. follow a learned route to the target, once one is known;
//! 2. head for the nearest unvisited cell along the dominant axis;
//! 3. move at random when every cell has been visited.
//!
//! A stuck-escape override then replaces the choice with the least-tried
//! direction whenever the agent keeps bumping into something.

use log::debug;
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    search::{nearest_unknown, shortest_path},
    types::{Coord, Direction},
    world::{Grid, WorldModel},
};

/// Run of consecutive probes that produced no displacement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stuck {
    /// Consecutive zero-displacement probes.
    pub count: u32,
    /// Direction requested by the latest of them.
    pub direction: Option<Direction>,
}

impl Stuck {
    /// Count another zero-displacement probe in `direction`.
    pub fn bump(&mut self, direction: Direction) {
        self.count += 1;
        self.direction = Some(direction);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Direction choice for the explore loop.
#[derive(Debug, Clone)]
pub struct ExplorationPolicy {
    stuck_threshold: u32,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl ExplorationPolicy {
    /// Create a policy that escapes after `stuck_threshold` no-ops.
    pub fn new(stuck_threshold: u32) -> Self {
        Self {
            stuck_threshold,
            rng: build_rng(None),
            rng_seed: None,
        }
    }

    /// Make the random fallback reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
        self
    }

    pub fn seed(&self) -> Option<u64> {
        self.rng_seed
    }

    pub fn stuck_threshold(&self) -> u32 {
        self.stuck_threshold
    }

    /// Decide the next direction to probe from `current`.
    pub fn next_move(&mut self, world: &WorldModel, current: Coord, stuck: &Stuck) -> Direction {
        let preferred = self.preferred_move(world, current);
        self.escape_if_stuck(&world.grid, current, stuck, preferred)
    }

    fn preferred_move(&mut self, world: &WorldModel, current: Coord) -> Direction {
        if let Some(target) = world.target {
            if current == target.position {
                return target.approach;
            }
            match shortest_path(&world.grid, current, target.position) {
                Some(path) if !path.is_empty() => return path[0],
                _ => debug!(
                    "no learned route from {current} to target at {}; exploring",
                    target.position
                ),
            }
        }

        if let Some(frontier) = nearest_unknown(&world.grid, &world.known, current) {
            return heading(current, frontier);
        }

        debug!("every cell is known; picking a random direction");
        self.random_direction()
    }

    fn random_direction(&mut self) -> Direction {
        Direction::ALL[self.rng.random_range(0..Direction::ALL.len())]
    }

    /// Replace `chosen` with the least-tried in-bounds direction when the
    /// agent is stuck or `chosen` has already been tried too often here.
    ///
    /// The direction of the current no-op run is skipped while any other
    /// candidate remains. Ties go to the lowest direction index.
    pub fn escape_if_stuck(
        &self,
        grid: &Grid,
        current: Coord,
        stuck: &Stuck,
        chosen: Direction,
    ) -> Direction {
        let overused = grid.samples(current, chosen) >= self.stuck_threshold;
        if stuck.count < self.stuck_threshold && !overused {
            return chosen;
        }

        let candidates: Vec<Direction> = Direction::ALL
            .into_iter()
            .filter(|&d| grid.neighbor(current, d).is_some())
            .collect();
        let fresh: Vec<Direction> = candidates
            .iter()
            .copied()
            .filter(|&d| Some(d) != stuck.direction)
            .collect();
        let pool = if fresh.is_empty() { &candidates } else { &fresh };

        let escape = pool
            .iter()
            .copied()
            .min_by_key(|&d| grid.samples(current, d))
            .unwrap_or(chosen);

        if escape != chosen {
            debug!(
                "stuck at {current} (run of {}), overriding {chosen} with {escape}",
                stuck.count
            );
        }
        escape
    }
}

/// Direction reducing the larger coordinate difference from `from` to `to`.
///
/// Ties between `|Δrow|` and `|Δcol|` go to the row axis.
pub fn heading(from: Coord, to: Coord) -> Direction {
    let (d_row, d_col) = from.delta_to(to);
    if d_row.abs() >= d_col.abs() {
        if d_row > 0 {
            Direction::East
        } else {
            Direction::West
        }
    } else if d_col > 0 {
        Direction::North
    } else {
        Direction::South
    }
}
