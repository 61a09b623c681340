//! Environment port - the remote move/query gateway.
//!
//! The explore loop only ever talks to the world through this trait, so the
//! same session drives the real HTTP gateway, a simulated world or a scripted
//! test double.

use crate::{
    Result,
    types::{Coord, Direction},
};

/// Decoded answer to a move request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveResponse {
    /// The gateway reported where the agent ended up and what it earned.
    Moved { position: Coord, reward: f64 },
    /// The response decoded but lacked a required field (usually the reward).
    Incomplete,
}

impl MoveResponse {
    /// Interpret a raw `(position, reward)` report, mapping the gateway's
    /// `-1:-1` sentinel to [`MoveResponse::Incomplete`].
    ///
    /// # Examples
    ///
    /// ```
    /// use gridscout::ports::MoveResponse;
    /// use gridscout::types::Coord;
    ///
    /// assert_eq!(
    ///     MoveResponse::from_sentinel(Coord::SENTINEL, 0.0),
    ///     MoveResponse::Incomplete
    /// );
    /// ```
    pub fn from_sentinel(position: Coord, reward: f64) -> Self {
        if position == Coord::SENTINEL {
            MoveResponse::Incomplete
        } else {
            MoveResponse::Moved { position, reward }
        }
    }

    /// Reward carried by the response; incomplete responses earn nothing.
    pub fn reward(&self) -> f64 {
        match self {
            MoveResponse::Moved { reward, .. } => *reward,
            MoveResponse::Incomplete => 0.0,
        }
    }
}

/// Port for the stateful grid gateway.
///
/// Implementations own transport, authentication and decoding. Transport or
/// decoding failures are reported as [`crate::Error::Gateway`]; a response
/// that decodes but misses fields is a successful
/// [`MoveResponse::Incomplete`].
pub trait Environment {
    /// Current position of the agent.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Gateway`] if the gateway cannot be reached or
    /// the response is malformed.
    fn locate(&mut self) -> Result<Coord>;

    /// Issue one move and report the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Gateway`] on transport or decoding failure.
    fn make_move(&mut self, direction: Direction) -> Result<MoveResponse>;
}

impl<E: Environment + ?Sized> Environment for &mut E {
    fn locate(&mut self) -> Result<Coord> {
        (**self).locate()
    }

    fn make_move(&mut self, direction: Direction) -> Result<MoveResponse> {
        (**self).make_move(direction)
    }
}

impl<E: Environment + ?Sized> Environment for Box<E> {
    fn locate(&mut self) -> Result<Coord> {
        (**self).locate()
    }

    fn make_move(&mut self, direction: Direction) -> Result<MoveResponse> {
        (**self).make_move(direction)
    }
}
