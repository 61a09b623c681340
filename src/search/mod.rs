//! Pure searches over a borrowed world model.
//!
//! - [`nearest_unknown`]: BFS over raw grid adjacency to the closest
//!   unvisited cell
//! - [`shortest_path`]: Dijkstra over the learned transition graph
//!
//! Neither function performs I/O or mutates the model.

pub mod frontier;
pub mod planner;

pub use frontier::nearest_unknown;
pub use planner::shortest_path;
