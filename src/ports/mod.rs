//! Ports (trait boundaries) for external collaborators.
//!
//! The session depends on these traits only; adapters in
//! [`crate::adapters`] implement them.

pub mod environment;
pub mod observer;
pub mod repository;

pub use environment::{Environment, MoveResponse};
pub use observer::SessionObserver;
pub use repository::SnapshotRepository;
