//! Application layer with dependency injection container.
//!
//! The container owns infrastructure dependencies and provides factory
//! methods for sessions, following hexagonal architecture principles.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │           Application Layer (app)           │
//! │  ┌──────────────────────────────────────┐   │
//! │  │            App (DI container)        │   │
//! │  └──────────────┬───────────────────────┘   │
//! │                 │ owns                      │
//! │                 ▼                           │
//! │  ┌──────────────────────────────────────┐   │
//! │  │  Infrastructure (adapters)           │   │
//! │  │  - MsgPackRepository                 │   │
//! │  │  - InMemoryRepository (testing)      │   │
//! │  │  - SimulatedWorld                    │   │
//! │  └──────────────┬───────────────────────┘   │
//! │                 │ implements                │
//! │                 ▼                           │
//! │  ┌──────────────────────────────────────┐   │
//! │  │  Domain Ports (ports)                │   │
//! │  │  - Environment                       │   │
//! │  │  - SnapshotRepository                │   │
//! │  │  - SessionObserver                   │   │
//! │  └──────────────┬───────────────────────┘   │
//! │                 │ used by                   │
//! │                 ▼                           │
//! │  ┌──────────────────────────────────────┐   │
//! │  │  Domain Logic                        │   │
//! │  │  - Session, ExplorationPolicy        │   │
//! │  │  - WorldModel, search                │   │
//! │  └──────────────────────────────────────┘   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use std::time::Duration;
//! use gridscout::adapters::{InMemoryRepository, SimulatedWorld};
//! use gridscout::app::{App, ExplorerConfig};
//! use gridscout::types::Coord;
//!
//! let app = App::for_testing()
//!     .with_repository(InMemoryRepository::new())
//!     .with_default_seed(42)
//!     .build();
//!
//! let env = SimulatedWorld::new(4, Coord::new(0, 0)).with_terminal(Coord::new(3, 3), 1000.0);
//! let config = ExplorerConfig::new()
//!     .with_grid_size(4)
//!     .with_inter_move_delay(Duration::ZERO);
//! let report = app.create_session(env, config)?.run()?;
//! assert!(report.stats.known_cells > 1);
//! # Ok::<(), gridscout::Error>(())
//! ```

pub mod config;
pub mod container;

pub use config::{ExplorerConfig, RunMode};
pub use container::{App, AppBuilder};
