//! MessagePack implementation of the snapshot repository.
//!
//! This adapter implements the SnapshotRepository port using rmp_serde for
//! compact binary serialization, one file per world under a root directory.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use log::{debug, info};

use super::legacy;
use crate::{
    Result,
    app::ExplorerConfig,
    error::Error,
    identifiers::WorldId,
    ports::SnapshotRepository,
    world::{SavedWorld, WorldModel},
};

/// MessagePack-based snapshot repository.
///
/// Snapshots live at `<root>/world_<id>_map.msgpack`. Loading also picks up
/// legacy reward tables for the same world (see [`legacy`]) and merges their
/// visited cells into the result.
///
/// # Examples
///
/// ```no_run
/// use gridscout::adapters::MsgPackRepository;
/// use gridscout::identifiers::WorldId;
/// use gridscout::ports::SnapshotRepository;
/// use gridscout::world::WorldModel;
///
/// let repo = MsgPackRepository::new("maps");
/// let world = WorldModel::new(40);
///
/// repo.save(&world, WorldId::new(1))?;
/// let loaded = repo.load(WorldId::new(1))?;
/// assert!(loaded.is_some());
/// # Ok::<(), gridscout::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct MsgPackRepository {
    root: PathBuf,
    grid_size: usize,
}

impl MsgPackRepository {
    /// Create a repository rooted at `root`. The directory is created on the
    /// first save.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            grid_size: ExplorerConfig::DEFAULT_GRID_SIZE,
        }
    }

    /// Grid size assumed when only a keyed legacy table exists.
    pub fn with_grid_size(mut self, grid_size: usize) -> Self {
        self.grid_size = grid_size;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Snapshot file for `id`.
    pub fn snapshot_path(&self, id: WorldId) -> PathBuf {
        self.root.join(format!("world_{id}_map.msgpack"))
    }

    fn read_snapshot(&self, id: WorldId) -> Result<Option<WorldModel>> {
        let path = self.snapshot_path(id);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(Error::Io {
                    operation: format!("read snapshot {path:?}"),
                    source,
                });
            }
        };
        SavedWorld::decode(&bytes).map(Some)
    }

    /// Size to interpret legacy tables with when no snapshot exists: the
    /// one implied by a flat table, else the configured size.
    fn legacy_size(&self, id: WorldId) -> usize {
        fs::read(legacy::flat_path(&self.root, id))
            .ok()
            .and_then(|bytes| legacy::LegacyTable::from_json(&bytes).ok())
            .and_then(|table| table.implied_size())
            .unwrap_or(self.grid_size)
    }
}

impl SnapshotRepository for MsgPackRepository {
    fn save(&self, world: &WorldModel, id: WorldId) -> Result<()> {
        fs::create_dir_all(&self.root).map_err(|source| Error::Io {
            operation: format!("create snapshot directory {:?}", self.root),
            source,
        })?;

        let bytes = SavedWorld::encode(world)?;
        let path = self.snapshot_path(id);
        fs::write(&path, bytes).map_err(|source| Error::Io {
            operation: format!("write snapshot {path:?}"),
            source,
        })
    }

    fn load(&self, id: WorldId) -> Result<Option<WorldModel>> {
        let snapshot = self.read_snapshot(id)?;
        let size = match &snapshot {
            Some(world) => world.grid_size(),
            None => self.legacy_size(id),
        };

        let Some(known) = legacy::load_known(&self.root, id, size)? else {
            if snapshot.is_some() {
                debug!("loaded snapshot for world {id}");
            }
            return Ok(snapshot);
        };

        info!("merging {} cells from legacy tables for world {id}", known.len());
        let mut world = snapshot.unwrap_or_else(|| WorldModel::new(size));
        world.known.merge(&known);
        Ok(Some(world))
    }
}
