//! Inferring which direction a probe actually took.
//!
//! The gateway may silently redirect a move, teleport the agent along an axis
//! or ignore the move entirely. Only the reported position is trusted.

use serde::{Deserialize, Serialize};

use crate::{
    ports::MoveResponse,
    types::{Coord, Direction},
};

/// What a single probe turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProbeOutcome {
    /// The agent moved; `direction` is the realized one, which can differ
    /// from the requested direction.
    Moved { direction: Direction, to: Coord },
    /// Zero displacement: a wall, the grid edge or a spurious report.
    NoOp,
    /// The response lacked required fields.
    Incomplete,
    /// The reported position cannot be explained by a single-direction move.
    Anomalous { to: Coord },
}

/// Classify a move response relative to the pre-move position `from`.
///
/// The displacement is normalized to `{-1, 0, 1}` per axis before matching,
/// so a straight multi-cell jump counts as a move in that direction while a
/// diagonal one is anomalous. Off-grid reports are anomalous too.
pub fn classify(from: Coord, response: &MoveResponse, grid_size: usize) -> ProbeOutcome {
    let to = match *response {
        MoveResponse::Incomplete => return ProbeOutcome::Incomplete,
        MoveResponse::Moved { position, .. } => position,
    };
    if !to.in_bounds(grid_size) {
        return ProbeOutcome::Anomalous { to };
    }

    let (d_row, d_col) = from.delta_to(to);
    let normalized = (d_row.signum(), d_col.signum());
    if normalized == (0, 0) {
        return ProbeOutcome::NoOp;
    }
    match Direction::from_delta(normalized) {
        Some(direction) => ProbeOutcome::Moved { direction, to },
        None => ProbeOutcome::Anomalous { to },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moved(row: i32, col: i32) -> MoveResponse {
        MoveResponse::Moved {
            position: Coord::new(row, col),
            reward: -1.0,
        }
    }

    #[test]
    fn test_zero_displacement_is_no_op_not_anomaly() {
        let from = Coord::new(2, 2);
        assert_eq!(classify(from, &moved(2, 2), 5), ProbeOutcome::NoOp);
    }

    #[test]
    fn test_single_steps() {
        let from = Coord::new(2, 2);
        assert_eq!(
            classify(from, &moved(2, 3), 5),
            ProbeOutcome::Moved {
                direction: Direction::North,
                to: Coord::new(2, 3)
            }
        );
        assert_eq!(
            classify(from, &moved(1, 2), 5),
            ProbeOutcome::Moved {
                direction: Direction::West,
                to: Coord::new(1, 2)
            }
        );
    }

    #[test]
    fn test_straight_jump_is_normalized() {
        let from = Coord::new(0, 0);
        assert_eq!(
            classify(from, &moved(4, 0), 5),
            ProbeOutcome::Moved {
                direction: Direction::East,
                to: Coord::new(4, 0)
            }
        );
    }

    #[test]
    fn test_diagonal_and_off_grid_are_anomalous() {
        let from = Coord::new(2, 2);
        assert_eq!(
            classify(from, &moved(3, 3), 5),
            ProbeOutcome::Anomalous {
                to: Coord::new(3, 3)
            }
        );
        assert_eq!(
            classify(from, &moved(2, 7), 5),
            ProbeOutcome::Anomalous {
                to: Coord::new(2, 7)
            }
        );
    }

    #[test]
    fn test_incomplete_response() {
        assert_eq!(
            classify(Coord::new(1, 1), &MoveResponse::Incomplete, 5),
            ProbeOutcome::Incomplete
        );
    }
}
