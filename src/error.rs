//! Error types for the gridscout crate

use thiserror::Error;

use crate::types::Coord;

/// Main error type for the gridscout crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("gateway failed to {operation}: {message}")]
    Gateway { operation: String, message: String },

    #[error("move from {from} landed on {to}, which is not a single-step transition")]
    AnomalousTransition { from: Coord, to: Coord },

    #[error("no explored route from {start} to {goal}")]
    UnreachableGoal { start: Coord, goal: Coord },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("invalid coordinate '{input}' (expected format 'row:col')")]
    InvalidCoordinate { input: String },

    #[error("invalid direction '{input}' (expected one of N, E, S, W)")]
    InvalidDirection { input: String },

    #[error("snapshot grid is {found}x{found} but the session expects {expected}x{expected}")]
    SnapshotMismatch { expected: usize, found: usize },

    #[error("corrupt snapshot: {reason}")]
    CorruptSnapshot { reason: String },

    #[error("unsupported snapshot version {found} (expected {expected})")]
    UnsupportedSnapshotVersion { found: u32, expected: u32 },

    #[error("legacy table has {found} rows but a {size}x{size} grid needs {expected}")]
    LegacyTableShape {
        size: usize,
        expected: usize,
        found: usize,
    },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to {operation}: {message}")]
    SerializationContext { operation: String, message: String },
}

impl Error {
    /// Whether this error comes from the persistence layer.
    ///
    /// The session keeps exploring in memory when persistence fails.
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            Error::Io { .. }
                | Error::Serialization(_)
                | Error::SerializationContext { .. }
                | Error::SnapshotMismatch { .. }
                | Error::CorruptSnapshot { .. }
                | Error::UnsupportedSnapshotVersion { .. }
                | Error::LegacyTableShape { .. }
        )
    }
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
