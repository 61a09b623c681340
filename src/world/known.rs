//! The set of coordinates the agent has physically occupied.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{Error, types::Coord};

/// Grow-only set of visited coordinates.
///
/// Serialized as a list of `"row:col"` strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct KnownCells(BTreeSet<Coord>);

impl KnownCells {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a coordinate as visited. Returns `true` if it was new.
    pub fn insert(&mut self, coord: Coord) -> bool {
        self.0.insert(coord)
    }

    pub fn contains(&self, coord: Coord) -> bool {
        self.0.contains(&coord)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Coord> + '_ {
        self.0.iter().copied()
    }

    /// Union `other` into `self`.
    pub fn merge(&mut self, other: &KnownCells) {
        self.0.extend(other.iter());
    }
}

impl FromIterator<Coord> for KnownCells {
    fn from_iter<I: IntoIterator<Item = Coord>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl TryFrom<Vec<String>> for KnownCells {
    type Error = Error;

    fn try_from(keys: Vec<String>) -> Result<Self, Self::Error> {
        keys.iter().map(|key| key.parse()).collect()
    }
}

impl From<KnownCells> for Vec<String> {
    fn from(known: KnownCells) -> Self {
        known.iter().map(|c| c.to_string()).collect()
    }
}
