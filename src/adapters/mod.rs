//! Adapters implementing domain ports.
//!
//! This module contains infrastructure implementations of the traits defined
//! in the ports module. Following hexagonal architecture, adapters depend on
//! domain ports, not the other way around.

pub mod in_memory_repository;
pub mod legacy;
pub mod msgpack_repository;
pub mod simulated_environment;

pub use in_memory_repository::InMemoryRepository;
pub use legacy::LegacyTable;
pub use msgpack_repository::MsgPackRepository;
pub use simulated_environment::{Glitch, SimulatedWorld};
