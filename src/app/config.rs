//! Configuration for exploration sessions.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Error, Result, identifiers::WorldId};

/// What the caller wants out of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// Explore until the target is found or the step budget runs out.
    #[default]
    Explore,
    /// Explore only if no target is known yet, then walk the shortest learned
    /// route to it.
    Navigate,
}

/// Configuration for an exploration session.
///
/// Builder-style: start from [`ExplorerConfig::new`] (or `default()`) and
/// override what differs.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use gridscout::app::{ExplorerConfig, RunMode};
///
/// let config = ExplorerConfig::new()
///     .with_grid_size(10)
///     .with_inter_move_delay(Duration::ZERO)
///     .with_mode(RunMode::Navigate)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplorerConfig {
    /// Side length of the square grid
    pub grid_size: usize,
    /// Rewards at or above this value mark the target
    pub terminal_reward_threshold: f64,
    /// Consecutive no-ops (or attempts in one direction) before escaping
    pub stuck_threshold: u32,
    /// Maximum probes per phase
    pub step_budget: usize,
    /// Minimum time between the starts of two probes
    pub inter_move_delay: Duration,
    /// World whose snapshot is loaded and saved
    pub world_id: WorldId,
    /// Explore only, or explore then navigate
    pub mode: RunMode,
    /// Random seed for the fallback policy (None = non-deterministic)
    pub seed: Option<u64>,
}

impl ExplorerConfig {
    pub const DEFAULT_GRID_SIZE: usize = 40;
    pub const DEFAULT_TERMINAL_REWARD: f64 = 1000.0;
    pub const DEFAULT_STUCK_THRESHOLD: u32 = 4;
    pub const DEFAULT_STEP_BUDGET: usize = 5000;
    pub const DEFAULT_INTER_MOVE_DELAY: Duration = Duration::from_secs(6);

    pub fn new() -> Self {
        Self {
            grid_size: Self::DEFAULT_GRID_SIZE,
            terminal_reward_threshold: Self::DEFAULT_TERMINAL_REWARD,
            stuck_threshold: Self::DEFAULT_STUCK_THRESHOLD,
            step_budget: Self::DEFAULT_STEP_BUDGET,
            inter_move_delay: Self::DEFAULT_INTER_MOVE_DELAY,
            world_id: WorldId::default(),
            mode: RunMode::default(),
            seed: None,
        }
    }

    pub fn with_grid_size(mut self, grid_size: usize) -> Self {
        self.grid_size = grid_size;
        self
    }

    pub fn with_terminal_reward_threshold(mut self, threshold: f64) -> Self {
        self.terminal_reward_threshold = threshold;
        self
    }

    pub fn with_stuck_threshold(mut self, threshold: u32) -> Self {
        self.stuck_threshold = threshold;
        self
    }

    pub fn with_step_budget(mut self, budget: usize) -> Self {
        self.step_budget = budget;
        self
    }

    pub fn with_inter_move_delay(mut self, delay: Duration) -> Self {
        self.inter_move_delay = delay;
        self
    }

    pub fn with_world_id(mut self, world_id: impl Into<WorldId>) -> Self {
        self.world_id = world_id.into();
        self
    }

    pub fn with_mode(mut self, mode: RunMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Whether `reward` marks the target.
    pub fn is_terminal(&self, reward: f64) -> bool {
        reward >= self.terminal_reward_threshold
    }

    /// Check that the configuration can drive a session.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for a zero grid size, stuck
    /// threshold or step budget, a grid too large for `i32` coordinates, or a
    /// non-finite reward threshold.
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: &str| {
            Err(Error::InvalidConfiguration {
                message: message.to_string(),
            })
        };
        if self.grid_size == 0 {
            return invalid("grid size must be at least 1");
        }
        if i32::try_from(self.grid_size).is_err() {
            return invalid("grid size does not fit in a coordinate");
        }
        if self.stuck_threshold == 0 {
            return invalid("stuck threshold must be at least 1");
        }
        if self.step_budget == 0 {
            return invalid("step budget must be at least 1");
        }
        if !self.terminal_reward_threshold.is_finite() {
            return invalid("terminal reward threshold must be finite");
        }
        Ok(())
    }
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self::new()
    }
}
