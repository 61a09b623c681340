//! Common test fixtures for the gridscout test suite.

#![allow(dead_code)]

use std::time::Duration;

use gridscout::{
    adapters::SimulatedWorld,
    app::ExplorerConfig,
    types::{Coord, Direction},
};

pub const TERMINAL_REWARD: f64 = 1000.0;

/// Configuration for a `size`×`size` world with no pacing and a fixed seed.
pub fn fast_config(size: usize) -> ExplorerConfig {
    ExplorerConfig::new()
        .with_grid_size(size)
        .with_inter_move_delay(Duration::ZERO)
        .with_seed(42)
}

/// Open 5×5 world, start in the corner, target in the opposite corner.
pub fn open_world() -> SimulatedWorld {
    SimulatedWorld::new(5, Coord::new(0, 0)).with_terminal(Coord::new(4, 4), TERMINAL_REWARD)
}

/// 5×5 world split by a wall between rows 2 and 3, open only at column 4.
/// The target sits behind the wall at `4:0`.
pub fn walled_world() -> SimulatedWorld {
    (0..4)
        .fold(SimulatedWorld::new(5, Coord::new(0, 0)), |world, col| {
            world.with_wall(Coord::new(2, col), Direction::East)
        })
        .with_terminal(Coord::new(4, 0), TERMINAL_REWARD)
}
