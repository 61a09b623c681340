//! Dependency injection container for the explorer.
//!
//! The container owns infrastructure dependencies and wires them into
//! sessions, following hexagonal architecture principles.

use std::{path::PathBuf, sync::Arc};

use super::config::ExplorerConfig;
use crate::{
    Result, adapters::MsgPackRepository, identifiers::WorldId, ports::Environment,
    ports::SnapshotRepository, session::Session, world::WorldModel,
};

/// Application with dependency injection.
///
/// # Examples
///
/// ## Production usage
///
/// ```no_run
/// use gridscout::adapters::SimulatedWorld;
/// use gridscout::app::{App, ExplorerConfig};
/// use gridscout::types::Coord;
///
/// let app = App::new("maps");
/// let env = SimulatedWorld::new(40, Coord::new(0, 0));
/// let mut session = app.create_session(env, ExplorerConfig::new())?;
/// let report = session.run()?;
/// # Ok::<(), gridscout::Error>(())
/// ```
///
/// ## Testing with dependency injection
///
/// ```
/// use gridscout::app::App;
/// use gridscout::adapters::InMemoryRepository;
///
/// let app = App::for_testing()
///     .with_repository(InMemoryRepository::new())
///     .with_default_seed(42)
///     .build();
/// ```
pub struct App {
    /// Repository for world snapshots
    repository: Arc<dyn SnapshotRepository + Send + Sync>,
    /// Default random seed (None = non-deterministic)
    default_seed: Option<u64>,
}

impl App {
    /// Create an app that keeps snapshots under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            repository: Arc::new(MsgPackRepository::new(root)),
            default_seed: None,
        }
    }

    /// Create a builder for constructing app with custom dependencies.
    ///
    /// Primarily used for testing with in-memory dependencies.
    pub fn for_testing() -> AppBuilder {
        AppBuilder::new()
    }

    /// Get the snapshot repository.
    pub fn repository(&self) -> Arc<dyn SnapshotRepository + Send + Sync> {
        Arc::clone(&self.repository)
    }

    /// Create a session driving `env` with the given configuration.
    ///
    /// The config's seed wins over the app default.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] if `config` is invalid.
    pub fn create_session<E: Environment>(
        &self,
        env: E,
        mut config: ExplorerConfig,
    ) -> Result<Session<E>> {
        if config.seed.is_none() {
            config.seed = self.default_seed;
        }
        Session::new(env, self.repository(), config)
    }

    /// Load the stored world model for `id`, if any.
    pub fn load_world(&self, id: WorldId) -> Result<Option<WorldModel>> {
        self.repository.load(id)
    }
}

/// Builder for constructing app with custom dependencies.
pub struct AppBuilder {
    repository: Option<Arc<dyn SnapshotRepository + Send + Sync>>,
    root: PathBuf,
    default_seed: Option<u64>,
}

impl AppBuilder {
    /// Create a new app builder.
    pub fn new() -> Self {
        Self {
            repository: None,
            root: PathBuf::from("."),
            default_seed: None,
        }
    }

    /// Set a custom snapshot repository.
    pub fn with_repository<R: SnapshotRepository + Send + Sync + 'static>(
        mut self,
        repo: R,
    ) -> Self {
        self.repository = Some(Arc::new(repo));
        self
    }

    /// Directory for the default MessagePack repository.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Set a default random seed for all sessions created by this container.
    pub fn with_default_seed(mut self, seed: u64) -> Self {
        self.default_seed = Some(seed);
        self
    }

    /// Build the app with the configured dependencies.
    ///
    /// If no repository was specified, uses `MsgPackRepository` at the root.
    pub fn build(self) -> App {
        let root = self.root;
        App {
            repository: self
                .repository
                .unwrap_or_else(|| Arc::new(MsgPackRepository::new(root))),
            default_seed: self.default_seed,
        }
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}
