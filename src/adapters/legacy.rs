//! Import of legacy reward tables.
//!
//! Older runs stored a per-cell, per-direction reward table instead of a
//! world model. Two layouts exist, both under a top-level `"Q"` key:
//!
//! - `world_<id>_tab.json`: a flat row-major array of `size²` rows, one
//!   `[N, E, S, W]` reward row per cell, `1.0` meaning "never tried"
//! - `world_<id>_tabv2.json`: an object keyed by `"row:col"`, containing
//!   only cells that were visited
//!
//! Only the set of visited cells survives the import. Neither layout
//! records transition destinations.

use std::{
    collections::BTreeMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use log::{debug, warn};
use serde::Deserialize;

use crate::{
    Error, Result,
    identifiers::WorldId,
    types::Coord,
    world::KnownCells,
};

/// Reward stored for directions that were never tried.
pub const DEFAULT_VALUE: f64 = 1.0;

/// Either layout of a legacy table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LegacyTable {
    Flat(Vec<Vec<f64>>),
    Keyed(BTreeMap<String, Vec<f64>>),
}

#[derive(Deserialize)]
struct LegacyFile {
    #[serde(rename = "Q")]
    table: LegacyTable,
}

impl LegacyTable {
    /// Parse a legacy JSON document.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let file: LegacyFile = serde_json::from_slice(bytes)?;
        Ok(file.table)
    }

    /// Side length implied by a flat table, if its row count is a square.
    pub fn implied_size(&self) -> Option<usize> {
        match self {
            LegacyTable::Flat(rows) => {
                let size = rows.len().isqrt();
                (size * size == rows.len() && size > 0).then_some(size)
            }
            LegacyTable::Keyed(_) => None,
        }
    }

    /// Cells this table marks as visited on a `size`×`size` grid.
    ///
    /// A flat row counts when any of its values differs from
    /// [`DEFAULT_VALUE`]; a keyed entry counts by being present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LegacyTableShape`] if a flat table does not have
    /// exactly `size²` rows, and [`Error::InvalidCoordinate`] for a malformed
    /// key.
    pub fn known_cells(&self, size: usize) -> Result<KnownCells> {
        let mut known = KnownCells::new();
        match self {
            LegacyTable::Flat(rows) => {
                let expected = size * size;
                if rows.len() != expected {
                    return Err(Error::LegacyTableShape {
                        size,
                        expected,
                        found: rows.len(),
                    });
                }
                for (index, values) in rows.iter().enumerate() {
                    if values.iter().any(|&v| v != DEFAULT_VALUE) {
                        known.insert(Coord::new((index / size) as i32, (index % size) as i32));
                    }
                }
            }
            LegacyTable::Keyed(entries) => {
                for key in entries.keys() {
                    let coord: Coord = key.parse()?;
                    if coord.in_bounds(size) {
                        known.insert(coord);
                    } else {
                        warn!("legacy table key {coord} is outside the {size}x{size} grid");
                    }
                }
            }
        }
        Ok(known)
    }
}

/// Path of the flat legacy table for `id`.
pub fn flat_path(root: &Path, id: WorldId) -> PathBuf {
    root.join(format!("world_{id}_tab.json"))
}

/// Path of the keyed legacy table for `id`.
pub fn keyed_path(root: &Path, id: WorldId) -> PathBuf {
    root.join(format!("world_{id}_tabv2.json"))
}

/// Read every legacy table for `id` under `root` and merge their cells.
///
/// Returns `None` when no usable legacy table exists. A table that does not
/// parse or does not fit a `size`×`size` grid is skipped with a warning.
///
/// # Errors
///
/// Returns [`Error::Io`] if a table exists but cannot be read.
pub fn load_known(root: &Path, id: WorldId, size: usize) -> Result<Option<KnownCells>> {
    let mut merged: Option<KnownCells> = None;
    for path in [flat_path(root, id), keyed_path(root, id)] {
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => continue,
            Err(source) => {
                return Err(Error::Io {
                    operation: format!("read legacy table {path:?}"),
                    source,
                });
            }
        };
        let known = match LegacyTable::from_json(&bytes).and_then(|t| t.known_cells(size)) {
            Ok(known) => known,
            Err(err) => {
                warn!("skipping legacy table {path:?}: {err}");
                continue;
            }
        };
        debug!("imported {} cells from {path:?}", known.len());
        merged.get_or_insert_with(KnownCells::new).merge(&known);
    }
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_flat_table_marks_non_default_rows() {
        let json = r#"{"Q": [[1,1,1,1],[1,-1,1,1],[1,1,1,1],[5,1,1,1]]}"#;
        let table = LegacyTable::from_json(json.as_bytes()).unwrap();
        assert_eq!(table.implied_size(), Some(2));

        let known = table.known_cells(2).unwrap();
        let cells: Vec<_> = known.iter().collect();
        assert_eq!(cells, vec![Coord::new(0, 1), Coord::new(1, 1)]);
    }

    #[test]
    fn test_flat_table_shape_is_checked() {
        let json = r#"{"Q": [[1,1,1,1],[1,1,1,1],[1,1,1,1]]}"#;
        let table = LegacyTable::from_json(json.as_bytes()).unwrap();
        assert_eq!(table.implied_size(), None);
        assert!(matches!(
            table.known_cells(2),
            Err(Error::LegacyTableShape {
                expected: 4,
                found: 3,
                ..
            })
        ));
    }

    #[test]
    fn test_keyed_table_marks_every_key() {
        let json = r#"{"Q": {"0:0": [1,1,1,1], "2:1": [0,0,0,0], "9:9": [1,1,1,1]}}"#;
        let table = LegacyTable::from_json(json.as_bytes()).unwrap();
        let known = table.known_cells(3).unwrap();
        assert_eq!(known.len(), 2);
        assert!(known.contains(Coord::new(0, 0)));
        assert!(known.contains(Coord::new(2, 1)));
    }

    #[test]
    fn test_load_known_merges_both_layouts() {
        let dir = TempDir::new().unwrap();
        let id = WorldId::new(7);
        fs::write(
            flat_path(dir.path(), id),
            r#"{"Q": [[1,1,1,1],[0,1,1,1],[1,1,1,1],[1,1,1,1]]}"#,
        )
        .unwrap();
        fs::write(keyed_path(dir.path(), id), r#"{"Q": {"1:1": [1,1,1,1]}}"#).unwrap();

        let known = load_known(dir.path(), id, 2).unwrap().unwrap();
        let cells: Vec<_> = known.iter().collect();
        assert_eq!(cells, vec![Coord::new(0, 1), Coord::new(1, 1)]);

        assert!(load_known(dir.path(), WorldId::new(8), 2).unwrap().is_none());
    }

    #[test]
    fn test_load_known_skips_misshapen_table() {
        let dir = TempDir::new().unwrap();
        let id = WorldId::new(5);
        // Three rows fit no square grid.
        fs::write(
            flat_path(dir.path(), id),
            r#"{"Q": [[0,1,1,1],[1,1,1,1],[1,1,1,1]]}"#,
        )
        .unwrap();
        assert!(load_known(dir.path(), id, 2).unwrap().is_none());

        fs::write(keyed_path(dir.path(), id), r#"{"Q": {"1:0": [1,1,1,1]}}"#).unwrap();
        let known = load_known(dir.path(), id, 2).unwrap().unwrap();
        assert_eq!(known.iter().collect::<Vec<_>>(), vec![Coord::new(1, 0)]);
    }
}
