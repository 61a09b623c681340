//! Repository port for world snapshot persistence.
//!
//! This module defines the trait boundary between the session and whatever
//! stores learned world models between runs.

use crate::{Result, identifiers::WorldId, world::WorldModel};

/// Port for persisting and restoring world models.
///
/// Snapshots are keyed by [`WorldId`]. Saving overwrites in place, so saving
/// the same model twice is harmless.
///
/// # Examples
///
/// ```no_run
/// use gridscout::identifiers::WorldId;
/// use gridscout::ports::SnapshotRepository;
/// use gridscout::world::WorldModel;
///
/// fn checkpoint<R: SnapshotRepository>(
///     repo: &R,
///     world: &WorldModel,
///     id: WorldId,
/// ) -> gridscout::Result<()> {
///     repo.save(world, id)
/// }
/// ```
pub trait SnapshotRepository {
    /// Save a world model, replacing any earlier snapshot for `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Serialization fails
    /// - The backing store cannot be written
    fn save(&self, world: &WorldModel, id: WorldId) -> Result<()>;

    /// Load the snapshot for `id`, or `None` if none was ever saved.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The stored data is corrupted or cannot be decoded
    /// - The stored schema version is not supported
    /// - I/O errors occur while reading
    fn load(&self, id: WorldId) -> Result<Option<WorldModel>>;
}
