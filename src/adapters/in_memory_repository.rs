//! In-memory snapshot repository for testing.
//!
//! This adapter provides a pure in-memory implementation of
//! SnapshotRepository, enabling fast tests without any file system I/O.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use crate::{
    Result,
    identifiers::WorldId,
    ports::SnapshotRepository,
    world::{SavedWorld, WorldModel},
};

/// In-memory repository for testing.
///
/// Stores encoded snapshots in a shared HashMap, so the same encoding path
/// as the file adapter is exercised without touching disk.
///
/// # Examples
///
/// ```
/// use gridscout::adapters::InMemoryRepository;
/// use gridscout::identifiers::WorldId;
/// use gridscout::ports::SnapshotRepository;
/// use gridscout::world::WorldModel;
///
/// let repo = InMemoryRepository::new();
/// repo.save(&WorldModel::new(4), WorldId::new(1))?;
///
/// let loaded = repo.load(WorldId::new(1))?;
/// assert_eq!(loaded.map(|w| w.grid_size()), Some(4));
/// # Ok::<(), gridscout::Error>(())
/// ```
///
/// # Thread Safety
///
/// This repository is thread-safe and can be safely cloned and shared across
/// threads. All clones share the same underlying storage.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    storage: Arc<Mutex<HashMap<WorldId, Vec<u8>>>>,
}

impl InMemoryRepository {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of worlds currently stored.
    pub fn count(&self) -> usize {
        self.storage().len()
    }

    /// Clear all stored snapshots.
    pub fn clear(&self) {
        self.storage().clear();
    }

    /// Check if a snapshot exists for `id`.
    pub fn contains(&self, id: WorldId) -> bool {
        self.storage().contains_key(&id)
    }

    /// Store raw bytes for `id`, bypassing encoding.
    pub fn insert_raw(&self, id: WorldId, bytes: Vec<u8>) {
        self.storage().insert(id, bytes);
    }

    fn storage(&self) -> MutexGuard<'_, HashMap<WorldId, Vec<u8>>> {
        // Values are replaced whole, so a poisoned map is still consistent.
        self.storage
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SnapshotRepository for InMemoryRepository {
    fn save(&self, world: &WorldModel, id: WorldId) -> Result<()> {
        let bytes = SavedWorld::encode(world)?;
        self.storage().insert(id, bytes);
        Ok(())
    }

    fn load(&self, id: WorldId) -> Result<Option<WorldModel>> {
        let storage = self.storage();
        storage
            .get(&id)
            .map(|bytes| SavedWorld::decode(bytes))
            .transpose()
    }
}
