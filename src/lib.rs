//! Grid-world explorer
//!
//! This crate drives an agent through an unknown square grid behind a
//! stateful move gateway, learns the grid's transitions as it goes, and
//! walks the shortest learned route to the rewarding target once found:
//! - World model of per-cell, per-direction transitions with sample counts
//! - Breadth-first frontier search and Dijkstra route planning
//! - Frontier-driven exploration policy with stuck escape
//! - Session state machine with snapshot persistence and observers

pub mod adapters;
pub mod app;
pub mod error;
pub mod identifiers;
pub mod policy;
pub mod ports;
pub mod search;
pub mod session;
pub mod types;
pub mod world;

pub use app::{App, ExplorerConfig, RunMode};
pub use error::{Error, Result};
pub use identifiers::WorldId;
pub use session::{Phase, Session, SessionOutcome, SessionReport};
pub use types::{Coord, Direction};
pub use world::{Target, WorldModel};
