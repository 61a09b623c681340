//! Identifier types for gateway worlds.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

/// Identifier of a gateway world.
///
/// Snapshots are keyed by world so that knowledge learned in one world never
/// leaks into another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WorldId(u32);

impl WorldId {
    /// Create a new world identifier.
    ///
    /// # Examples
    ///
    /// ```
    /// use gridscout::identifiers::WorldId;
    ///
    /// let world = WorldId::new(3);
    /// assert_eq!(world.value(), 3);
    /// assert_eq!(world.to_string(), "3");
    /// ```
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Get the inner value.
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl Default for WorldId {
    fn default() -> Self {
        Self(1)
    }
}

impl fmt::Display for WorldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for WorldId {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl From<WorldId> for u32 {
    fn from(id: WorldId) -> Self {
        id.0
    }
}

impl FromStr for WorldId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse()
            .map(WorldId)
            .map_err(|_| Error::InvalidConfiguration {
                message: format!("world id '{s}' is not a non-negative integer"),
            })
    }
}
