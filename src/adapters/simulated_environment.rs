//! Deterministic in-process grid world.
//!
//! Stands in for the remote gateway in tests and offline runs. It models
//! everything the explorer has to cope with: walls, redirected moves,
//! teleports, a terminal cell that resets the agent, and transient gateway
//! glitches.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::{
    Error, Result,
    ports::{Environment, MoveResponse},
    types::{Coord, Direction},
};

/// One-shot misbehaviour injected into the next move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glitch {
    /// Report the current position without moving.
    SpuriousNoOp,
    /// Answer without a reward; the move is not applied.
    Incomplete,
    /// Fail the request as a transport error.
    GatewayError,
}

/// A square grid world driven through [`Environment`].
///
/// # Examples
///
/// ```
/// use gridscout::adapters::SimulatedWorld;
/// use gridscout::ports::{Environment, MoveResponse};
/// use gridscout::types::{Coord, Direction};
///
/// let mut world = SimulatedWorld::new(3, Coord::new(0, 0))
///     .with_wall(Coord::new(0, 0), Direction::East);
///
/// let response = world.make_move(Direction::East)?;
/// assert_eq!(
///     response,
///     MoveResponse::Moved { position: Coord::new(0, 0), reward: -1.0 }
/// );
/// # Ok::<(), gridscout::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct SimulatedWorld {
    size: usize,
    start: Coord,
    position: Coord,
    walls: HashSet<(Coord, Direction)>,
    redirects: HashMap<(Coord, Direction), Direction>,
    teleports: HashMap<(Coord, Direction), Coord>,
    terminal: Option<Coord>,
    terminal_reward: f64,
    step_reward: f64,
    glitches: VecDeque<Glitch>,
    moves: usize,
    terminal_hits: usize,
}

impl SimulatedWorld {
    pub const DEFAULT_STEP_REWARD: f64 = -1.0;

    /// An open `size`×`size` world with the agent at `start`.
    pub fn new(size: usize, start: Coord) -> Self {
        Self {
            size,
            start,
            position: start,
            walls: HashSet::new(),
            redirects: HashMap::new(),
            teleports: HashMap::new(),
            terminal: None,
            terminal_reward: 0.0,
            step_reward: Self::DEFAULT_STEP_REWARD,
            glitches: VecDeque::new(),
            moves: 0,
            terminal_hits: 0,
        }
    }

    /// Block the edge between `cell` and its neighbour in `direction`, in
    /// both directions.
    pub fn with_wall(mut self, cell: Coord, direction: Direction) -> Self {
        self.walls.insert((cell, direction));
        self.walls.insert((cell.step(direction), direction.opposite()));
        self
    }

    /// Requesting `requested` at `cell` moves `actual` instead.
    pub fn with_redirect(mut self, cell: Coord, requested: Direction, actual: Direction) -> Self {
        self.redirects.insert((cell, requested), actual);
        self
    }

    /// Moving `direction` from `cell` lands on `destination`.
    pub fn with_teleport(mut self, cell: Coord, direction: Direction, destination: Coord) -> Self {
        self.teleports.insert((cell, direction), destination);
        self
    }

    /// Entering `cell` pays `reward` and sends the agent back to its start.
    pub fn with_terminal(mut self, cell: Coord, reward: f64) -> Self {
        self.terminal = Some(cell);
        self.terminal_reward = reward;
        self
    }

    pub fn with_step_reward(mut self, reward: f64) -> Self {
        self.step_reward = reward;
        self
    }

    /// Queue a glitch for an upcoming move. Glitches fire in order, one per
    /// move.
    pub fn push_glitch(&mut self, glitch: Glitch) {
        self.glitches.push_back(glitch);
    }

    pub fn with_glitch(mut self, glitch: Glitch) -> Self {
        self.push_glitch(glitch);
        self
    }

    pub fn position(&self) -> Coord {
        self.position
    }

    /// Move requests received, glitched ones included.
    pub fn moves(&self) -> usize {
        self.moves
    }

    /// How often the terminal cell has been entered.
    pub fn terminal_hits(&self) -> usize {
        self.terminal_hits
    }

    /// Where a move of `direction` from `from` lands, ignoring the terminal.
    pub fn destination(&self, from: Coord, direction: Direction) -> Coord {
        let realized = self
            .redirects
            .get(&(from, direction))
            .copied()
            .unwrap_or(direction);
        if self.walls.contains(&(from, realized)) {
            return from;
        }
        if let Some(&destination) = self.teleports.get(&(from, realized)) {
            return destination;
        }
        let next = from.step(realized);
        if next.in_bounds(self.size) { next } else { from }
    }
}

impl Environment for SimulatedWorld {
    fn locate(&mut self) -> Result<Coord> {
        Ok(self.position)
    }

    fn make_move(&mut self, direction: Direction) -> Result<MoveResponse> {
        self.moves += 1;
        match self.glitches.pop_front() {
            Some(Glitch::SpuriousNoOp) => {
                return Ok(MoveResponse::Moved {
                    position: self.position,
                    reward: self.step_reward,
                });
            }
            Some(Glitch::Incomplete) => return Ok(MoveResponse::Incomplete),
            Some(Glitch::GatewayError) => {
                return Err(Error::Gateway {
                    operation: format!("move {direction}"),
                    message: "simulated transport failure".to_string(),
                });
            }
            None => {}
        }

        let destination = self.destination(self.position, direction);
        if Some(destination) == self.terminal {
            self.terminal_hits += 1;
            self.position = self.start;
            return Ok(MoveResponse::Moved {
                position: destination,
                reward: self.terminal_reward,
            });
        }

        self.position = destination;
        Ok(MoveResponse::Moved {
            position: destination,
            reward: self.step_reward,
        })
    }
}
