//! Versioned persistence envelope for [`WorldModel`].

use serde::{Deserialize, Serialize};

use super::WorldModel;
use crate::{Error, Result};

/// On-disk form of a world model.
///
/// Version 1 was the flat reward table handled by
/// [`crate::adapters::legacy`]; version 2 is this envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedWorld {
    pub version: u32,
    pub world: WorldModel,
}

impl SavedWorld {
    pub const VERSION: u32 = 2;

    pub fn new(world: WorldModel) -> Self {
        Self {
            version: Self::VERSION,
            world,
        }
    }

    /// Unwrap the model after checking the schema version and that every
    /// stored coordinate lies on the grid.
    pub fn into_world(self) -> Result<WorldModel> {
        if self.version != Self::VERSION {
            return Err(Error::UnsupportedSnapshotVersion {
                found: self.version,
                expected: Self::VERSION,
            });
        }
        self.world.check_bounds()?;
        Ok(self.world)
    }

    /// Encode a model as MessagePack bytes.
    pub fn encode(world: &WorldModel) -> Result<Vec<u8>> {
        #[derive(Serialize)]
        struct Borrowed<'a> {
            version: u32,
            world: &'a WorldModel,
        }

        rmp_serde::to_vec_named(&Borrowed {
            version: Self::VERSION,
            world,
        })
        .map_err(|e| Error::SerializationContext {
            operation: "serialize world snapshot to MessagePack".to_string(),
            message: e.to_string(),
        })
    }

    /// Decode MessagePack bytes and check the version.
    ///
    /// An inconsistent grid fails as [`Error::SerializationContext`]; an
    /// off-grid known cell or target as [`Error::CorruptSnapshot`].
    pub fn decode(bytes: &[u8]) -> Result<WorldModel> {
        let saved: SavedWorld =
            rmp_serde::from_slice(bytes).map_err(|e| Error::SerializationContext {
                operation: "deserialize world snapshot from MessagePack".to_string(),
                message: e.to_string(),
            })?;
        saved.into_world()
    }
}
