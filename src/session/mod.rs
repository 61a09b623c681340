//! Exploration session state machine
//!
//! ```text
//! Initializing ──▶ Exploring ──▶ TargetFound ──▶ Navigating ──▶ Done
//!       │              │              │                           ▲
//!       │              └── budget ────┼───────────────────────────┤
//!       │                             └── explore mode ───────────┤
//!       └── restored target + navigate mode ──▶ Navigating        │
//! ```
//!
//! Exactly one probe is in flight at a time. Each probe is classified,
//! folded into the world model and persisted before the next one is issued.
//! Gateway errors are returned to the caller with all state intact, so
//! calling [`Session::run`] again resumes where the session stopped.

pub mod cooldown;
pub mod inference;
pub mod observers;

pub use cooldown::Cooldown;
pub use inference::{ProbeOutcome, classify};
pub use observers::{JsonlObserver, ProbeRecorder};

use std::sync::Arc;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    app::{ExplorerConfig, RunMode},
    policy::{ExplorationPolicy, Stuck},
    ports::{Environment, MoveResponse, SessionObserver, SnapshotRepository},
    search::shortest_path,
    types::{Coord, Direction},
    world::{MapStats, Target, WorldModel},
};

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Initializing,
    Exploring,
    TargetFound,
    Navigating,
    Done,
}

/// How a finished session ended.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionOutcome {
    /// The target is known; navigation was not requested.
    TargetFound { target: Target },
    /// Navigation re-triggered the terminal reward.
    TargetReached { target: Target, moves: usize },
    /// The exploration step budget ran out before the target was seen.
    BudgetExhausted,
    /// No explored route leads to the target.
    Unreachable { start: Coord, goal: Coord },
    /// Navigation used its whole budget without reaching the target.
    NavigationStalled,
}

/// One probe as seen by observers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProbeRecord {
    /// 1-based probe number within its phase
    pub step: usize,
    pub phase: Phase,
    pub from: Coord,
    pub requested: Direction,
    pub outcome: ProbeOutcome,
    pub reward: f64,
    /// Consecutive no-op count after this probe
    pub stuck: u32,
}

/// A probe whose reported position made no sense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anomaly {
    pub step: usize,
    pub from: Coord,
    pub requested: Direction,
    pub to: Coord,
}

/// Summary returned when a session reaches [`Phase::Done`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    pub outcome: SessionOutcome,
    pub exploration_steps: usize,
    pub navigation_moves: usize,
    pub total_reward: f64,
    pub anomalies: usize,
    pub persistence_failures: usize,
    pub stats: MapStats,
}

/// Drives one agent through one world.
pub struct Session<E: Environment> {
    config: ExplorerConfig,
    env: E,
    repository: Arc<dyn SnapshotRepository + Send + Sync>,
    policy: ExplorationPolicy,
    observers: Vec<Box<dyn SessionObserver>>,
    cooldown: Cooldown,
    world: WorldModel,
    phase: Phase,
    position: Coord,
    stuck: Stuck,
    steps: usize,
    navigation_moves: usize,
    needs_relocate: bool,
    total_reward: f64,
    anomalies: Vec<Anomaly>,
    persistence_failures: usize,
    outcome: Option<SessionOutcome>,
}

impl<E: Environment> Session<E> {
    /// Create a session in [`Phase::Initializing`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `config` does not validate.
    pub fn new(
        env: E,
        repository: Arc<dyn SnapshotRepository + Send + Sync>,
        config: ExplorerConfig,
    ) -> Result<Self> {
        config.validate()?;

        let mut policy = ExplorationPolicy::new(config.stuck_threshold);
        if let Some(seed) = config.seed {
            policy = policy.with_seed(seed);
        }

        Ok(Self {
            cooldown: Cooldown::new(config.inter_move_delay),
            world: WorldModel::new(config.grid_size),
            config,
            env,
            repository,
            policy,
            observers: Vec::new(),
            phase: Phase::Initializing,
            position: Coord::SENTINEL,
            stuck: Stuck::default(),
            steps: 0,
            navigation_moves: 0,
            needs_relocate: false,
            total_reward: 0.0,
            anomalies: Vec::new(),
            persistence_failures: 0,
            outcome: None,
        })
    }

    /// Attach an observer.
    pub fn with_observer(mut self, observer: Box<dyn SessionObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Last known agent position (`-1:-1` before initialization).
    pub fn position(&self) -> Coord {
        self.position
    }

    pub fn world(&self) -> &WorldModel {
        &self.world
    }

    pub fn stuck(&self) -> Stuck {
        self.stuck
    }

    /// Exploration probes issued so far.
    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn anomalies(&self) -> &[Anomaly] {
        &self.anomalies
    }

    pub fn outcome(&self) -> Option<SessionOutcome> {
        self.outcome
    }

    pub fn environment(&self) -> &E {
        &self.env
    }

    /// Consume the session, handing back the environment.
    pub fn into_environment(self) -> E {
        self.env
    }

    /// Run until [`Phase::Done`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Gateway`] when the environment fails. The session
    /// keeps its state; call `run` again to retry the failed probe.
    pub fn run(&mut self) -> Result<SessionReport> {
        while self.phase != Phase::Done {
            self.step()?;
        }
        Ok(self.report())
    }

    /// Advance the state machine by one unit of work: initialization, one
    /// probe, or one phase transition.
    pub fn step(&mut self) -> Result<()> {
        match self.phase {
            Phase::Initializing => self.initialize(),
            Phase::Exploring => self.explore_step(),
            Phase::TargetFound => {
                self.leave_target_found();
                Ok(())
            }
            Phase::Navigating => self.navigate_step(),
            Phase::Done => Ok(()),
        }
    }

    /// Current summary. The outcome is only meaningful once `Done`.
    pub fn report(&self) -> SessionReport {
        SessionReport {
            outcome: self.outcome.unwrap_or(SessionOutcome::BudgetExhausted),
            exploration_steps: self.steps,
            navigation_moves: self.navigation_moves,
            total_reward: self.total_reward,
            anomalies: self.anomalies.len(),
            persistence_failures: self.persistence_failures,
            stats: self.world.stats(),
        }
    }

    fn initialize(&mut self) -> Result<()> {
        let start = self.locate()?;
        self.restore();
        self.position = start;
        self.world.known.insert(start);

        let stats = self.world.stats();
        info!(
            "world {}: starting at {start}, {} of {} cells known",
            self.config.world_id, stats.known_cells, stats.total_cells
        );

        self.phase = match (self.world.target, self.config.mode) {
            (Some(_), RunMode::Navigate) => Phase::Navigating,
            _ => Phase::Exploring,
        };
        let phase = self.phase;
        self.notify(|o| o.on_session_start(start, phase));
        Ok(())
    }

    fn locate(&mut self) -> Result<Coord> {
        let position = self.env.locate()?;
        if !self.world.grid.contains(position) {
            return Err(Error::Gateway {
                operation: "locate agent".to_string(),
                message: format!(
                    "reported position {position} is outside the {0}x{0} grid",
                    self.config.grid_size
                ),
            });
        }
        Ok(position)
    }

    fn restore(&mut self) {
        match self.repository.load(self.config.world_id) {
            Ok(Some(world)) if world.grid_size() == self.config.grid_size => {
                info!(
                    "restored snapshot for world {} ({} known cells)",
                    self.config.world_id,
                    world.known.len()
                );
                self.world = world;
            }
            Ok(Some(world)) => {
                let err = Error::SnapshotMismatch {
                    expected: self.config.grid_size,
                    found: world.grid_size(),
                };
                warn!("ignoring snapshot for world {}: {err}", self.config.world_id);
            }
            Ok(None) => info!(
                "no snapshot for world {}; starting fresh",
                self.config.world_id
            ),
            Err(err) => warn!(
                "failed to restore world {}: {err}; starting fresh",
                self.config.world_id
            ),
        }
    }

    fn explore_step(&mut self) -> Result<()> {
        if self.world.target.is_some() {
            debug!("target already known; nothing to explore");
            self.phase = Phase::TargetFound;
            return Ok(());
        }
        self.cooldown.wait();

        let from = self.position;
        let requested = self.policy.next_move(&self.world, from, &self.stuck);
        let response = self.env.make_move(requested)?;
        self.steps += 1;

        let reward = response.reward();
        self.total_reward += reward;
        let outcome = classify(from, &response, self.config.grid_size);
        debug!("step {}: {from} {requested} -> {outcome:?} ({reward})", self.steps);

        if self.is_terminal(&response) {
            let target = Target {
                position: from,
                approach: requested,
            };
            self.world.record_target(target);
            info!(
                "target found from {from} moving {requested} with reward {reward} after {} steps",
                self.steps
            );
            self.persist();
            self.notify_probe(from, requested, outcome, reward);
            self.notify(|o| o.on_target_found(&target));
            self.phase = Phase::TargetFound;
            return Ok(());
        }

        self.apply(from, requested, outcome, reward);
        self.persist();
        self.notify_probe(from, requested, outcome, reward);

        if self.steps % 100 == 0 {
            info!(
                "exploration step {}, visited {} cells",
                self.steps,
                self.world.known.len()
            );
        }
        if self.steps >= self.config.step_budget {
            info!("step budget of {} exhausted", self.config.step_budget);
            self.finish(SessionOutcome::BudgetExhausted);
        }
        Ok(())
    }

    /// Fold one classified probe into the world model.
    fn apply(&mut self, from: Coord, requested: Direction, outcome: ProbeOutcome, reward: f64) {
        let grid = &mut self.world.grid;
        match outcome {
            ProbeOutcome::Moved { direction, to } => {
                if direction != requested {
                    debug!("requested {requested} at {from} but moved {direction}");
                }
                self.stuck.reset();
                grid.record_outcome(from, direction, to, reward);
                self.position = to;
                if self.world.known.insert(to) {
                    debug!("discovered {to}");
                }
            }
            ProbeOutcome::NoOp => {
                self.stuck.bump(requested);
                if self.stuck.count >= self.config.stuck_threshold {
                    grid.record_outcome(from, requested, from, reward);
                } else {
                    grid.record_attempt(from, requested);
                }
            }
            ProbeOutcome::Incomplete => {
                warn!("incomplete response for {requested} at {from}; treating as no-op");
                self.stuck.bump(requested);
                grid.record_attempt(from, requested);
            }
            ProbeOutcome::Anomalous { to } => {
                let err = Error::AnomalousTransition { from, to };
                warn!("step {}: {err}", self.steps);
                grid.record_attempt(from, requested);
                self.anomalies.push(Anomaly {
                    step: self.steps,
                    from,
                    requested,
                    to,
                });
                self.stuck.reset();
                if grid.contains(to) {
                    self.position = to;
                    self.world.known.insert(to);
                }
            }
        }
    }

    fn leave_target_found(&mut self) {
        let Some(target) = self.world.target else {
            self.phase = Phase::Exploring;
            return;
        };
        match self.config.mode {
            RunMode::Explore => self.finish(SessionOutcome::TargetFound { target }),
            RunMode::Navigate => {
                self.phase = Phase::Navigating;
                self.needs_relocate = true;
            }
        }
    }

    fn navigate_step(&mut self) -> Result<()> {
        let Some(target) = self.world.target else {
            self.phase = Phase::Exploring;
            return Ok(());
        };
        if self.needs_relocate {
            // The gateway puts the agent back at a start cell after a
            // terminal move.
            self.position = self.locate()?;
            self.needs_relocate = false;
            info!("navigating from {} to target at {}", self.position, target.position);
        }
        if self.navigation_moves >= self.config.step_budget {
            warn!(
                "navigation used {} moves without reaching the target",
                self.navigation_moves
            );
            self.finish(SessionOutcome::NavigationStalled);
            return Ok(());
        }

        let from = self.position;
        let path = if from == target.position {
            Vec::new()
        } else {
            let Some(path) = shortest_path(&self.world.grid, from, target.position) else {
                let err = Error::UnreachableGoal {
                    start: from,
                    goal: target.position,
                };
                warn!("{err}");
                self.finish(SessionOutcome::Unreachable {
                    start: from,
                    goal: target.position,
                });
                return Ok(());
            };
            if self.navigation_moves == 0 {
                info!("optimal path length: {}", path.len() + 1);
            }
            path
        };
        // An empty route means we stand on the target cell: take the approach.
        let (direction, expected) = match path.first() {
            Some(&direction) => (
                direction,
                self.world
                    .grid
                    .transition(from, direction)
                    .map(|t| t.destination),
            ),
            None => (target.approach, None),
        };

        self.cooldown.wait();
        let response = self.env.make_move(direction)?;
        self.navigation_moves += 1;
        let reward = response.reward();
        self.total_reward += reward;
        let outcome = classify(from, &response, self.config.grid_size);

        if self.is_terminal(&response) {
            self.notify_probe(from, direction, outcome, reward);
            info!(
                "target reached after {} moves, total reward {}",
                self.navigation_moves, self.total_reward
            );
            self.finish(SessionOutcome::TargetReached {
                target,
                moves: self.navigation_moves,
            });
            return Ok(());
        }

        // Navigation probes teach the model like exploration probes do.
        self.apply(from, direction, outcome, reward);
        self.persist();
        self.notify_probe(from, direction, outcome, reward);

        match expected {
            Some(expected) if expected != self.position => warn!(
                "moved {direction} from {from} to {} instead of {expected}; replanning",
                self.position
            ),
            None => warn!(
                "approach {direction} from {from} did not trigger the terminal reward"
            ),
            _ => {}
        }
        Ok(())
    }

    /// Only a completed move can carry the terminal reward.
    fn is_terminal(&self, response: &MoveResponse) -> bool {
        matches!(response, MoveResponse::Moved { reward, .. } if self.config.is_terminal(*reward))
    }

    fn finish(&mut self, outcome: SessionOutcome) {
        self.phase = Phase::Done;
        self.outcome = Some(outcome);
        let report = self.report();
        let stats = report.stats;
        info!(
            "session done: {outcome:?}; visited {} of {} cells, explored {} of {} directions",
            stats.known_cells, stats.total_cells, stats.explored_directions, stats.known_directions
        );
        self.notify(|o| o.on_session_end(&report));
    }

    fn persist(&mut self) {
        if let Err(err) = self.repository.save(&self.world, self.config.world_id) {
            self.persistence_failures += 1;
            warn!(
                "failed to persist world {}: {err}; continuing in memory",
                self.config.world_id
            );
        }
    }

    fn notify_probe(&mut self, from: Coord, requested: Direction, outcome: ProbeOutcome, reward: f64) {
        let record = ProbeRecord {
            step: match self.phase {
                Phase::Navigating => self.navigation_moves,
                _ => self.steps,
            },
            phase: self.phase,
            from,
            requested,
            outcome,
            reward,
            stuck: self.stuck.count,
        };
        self.notify(|o| o.on_probe(&record));
    }

    fn notify(&mut self, mut event: impl FnMut(&mut dyn SessionObserver) -> Result<()>) {
        for observer in &mut self.observers {
            if let Err(err) = event(observer.as_mut()) {
                warn!("session observer failed: {err}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::VecDeque, time::Duration};

    use super::*;
    use crate::{
        adapters::{Glitch, InMemoryRepository, SimulatedWorld},
        identifiers::WorldId,
        world::SavedWorld,
    };

    /// Replays canned responses and remembers what was asked.
    struct Scripted {
        position: Coord,
        responses: VecDeque<MoveResponse>,
        requests: Vec<Direction>,
    }

    impl Scripted {
        fn new(position: Coord, responses: impl IntoIterator<Item = MoveResponse>) -> Self {
            Self {
                position,
                responses: responses.into_iter().collect(),
                requests: Vec::new(),
            }
        }
    }

    impl Environment for Scripted {
        fn locate(&mut self) -> Result<Coord> {
            Ok(self.position)
        }

        fn make_move(&mut self, direction: Direction) -> Result<MoveResponse> {
            self.requests.push(direction);
            self.responses.pop_front().ok_or_else(|| Error::Gateway {
                operation: "move".to_string(),
                message: "script exhausted".to_string(),
            })
        }
    }

    fn moved(row: i32, col: i32, reward: f64) -> MoveResponse {
        MoveResponse::Moved {
            position: Coord::new(row, col),
            reward,
        }
    }

    fn config() -> ExplorerConfig {
        ExplorerConfig::new()
            .with_grid_size(3)
            .with_inter_move_delay(Duration::ZERO)
            .with_seed(1)
    }

    fn session<E: Environment>(env: E, config: ExplorerConfig) -> Session<E> {
        let mut session = Session::new(env, Arc::new(InMemoryRepository::new()), config).unwrap();
        session.step().unwrap();
        session
    }

    #[test]
    fn test_initialize_marks_start_known() {
        let session = session(Scripted::new(Coord::new(1, 2), []), config());
        assert_eq!(session.phase(), Phase::Exploring);
        assert_eq!(session.position(), Coord::new(1, 2));
        assert!(session.world().known.contains(Coord::new(1, 2)));
    }

    #[test]
    fn test_redirect_is_recorded_under_realized_direction() {
        let start = Coord::new(0, 0);
        let mut session = session(Scripted::new(start, [moved(0, 1, -1.0)]), config());
        session.step().unwrap();

        let requested = session.environment().requests[0];
        assert_eq!(requested, Direction::East);

        let grid = &session.world().grid;
        assert_eq!(grid.samples(start, Direction::East), 0);
        let north = grid.transition(start, Direction::North).unwrap();
        assert_eq!(north.samples, 1);
        assert_eq!(north.destination, Coord::new(0, 1));
        assert_eq!(north.last_reward, -1.0);
        assert_eq!(session.position(), Coord::new(0, 1));
        assert!(session.world().known.contains(Coord::new(0, 1)));
    }

    #[test]
    fn test_no_op_below_threshold_only_counts_attempt() {
        let start = Coord::new(0, 0);
        let mut session = session(Scripted::new(start, [moved(0, 0, -1.0)]), config());
        session.step().unwrap();

        let requested = session.environment().requests[0];
        let transition = *session.world().grid.transition(start, requested).unwrap();
        assert_eq!(transition.samples, 1);
        assert_ne!(transition.destination, start);
        assert_eq!(session.stuck().count, 1);
        assert_eq!(session.stuck().direction, Some(requested));
    }

    #[test]
    fn test_no_op_at_threshold_confirms_wall() {
        let start = Coord::new(0, 0);
        let env = Scripted::new(start, [moved(0, 0, -1.0), moved(0, 0, -1.0)]);
        let mut session = session(env, config().with_stuck_threshold(2));
        session.step().unwrap();
        session.step().unwrap();

        assert_eq!(
            session.environment().requests,
            vec![Direction::East, Direction::East]
        );
        let east = session.world().grid.transition(start, Direction::East).unwrap();
        assert_eq!(east.destination, start);
        assert_eq!(east.samples, 2);
    }

    #[test]
    fn test_incomplete_responses_never_confirm_walls() {
        let start = Coord::new(0, 0);
        let env = Scripted::new(start, [MoveResponse::Incomplete; 6]);
        let mut session = session(env, config().with_stuck_threshold(1));
        for _ in 0..6 {
            session.step().unwrap();
        }

        assert_eq!(session.stuck().count, 6);
        assert_eq!(session.position(), start);
        for direction in Direction::ALL {
            let transition = session.world().grid.transition(start, direction).unwrap();
            if session.world().grid.neighbor(start, direction).is_some() {
                assert_ne!(transition.destination, start, "{direction} became a wall");
            }
        }
    }

    #[test]
    fn test_stuck_escape_changes_direction() {
        let start = Coord::new(0, 0);
        let env = Scripted::new(start, [moved(0, 0, -1.0), moved(0, 0, -1.0)]);
        let mut session = session(env, config().with_stuck_threshold(1));
        session.step().unwrap();
        session.step().unwrap();

        let requests = &session.environment().requests;
        assert_eq!(requests[0], Direction::East);
        assert_ne!(requests[1], Direction::East);
    }

    #[test]
    fn test_terminal_probe_sets_target_without_recording() {
        let start = Coord::new(1, 1);
        let env = Scripted::new(start, [moved(2, 1, 1000.0)]);
        let mut session = session(env, config());
        session.step().unwrap();

        let approach = session.environment().requests[0];
        assert_eq!(session.phase(), Phase::TargetFound);
        assert_eq!(
            session.world().target,
            Some(Target {
                position: start,
                approach
            })
        );
        assert_eq!(session.world().grid.samples(start, approach), 0);
        assert_eq!(session.position(), start);

        session.step().unwrap();
        assert_eq!(session.phase(), Phase::Done);
        assert!(matches!(
            session.outcome(),
            Some(SessionOutcome::TargetFound { .. })
        ));
    }

    #[test]
    fn test_anomalous_report_is_kept_out_of_the_model() {
        let start = Coord::new(0, 0);
        let env = Scripted::new(start, [moved(2, 2, -1.0)]);
        let mut session = session(env, config());
        session.step().unwrap();

        let requested = session.environment().requests[0];
        let transition = *session.world().grid.transition(start, requested).unwrap();
        assert_eq!(transition.samples, 1);
        assert_eq!(transition.destination, start.step(requested));
        assert_eq!(session.anomalies().len(), 1);
        assert_eq!(session.anomalies()[0].to, Coord::new(2, 2));
        assert_eq!(session.position(), Coord::new(2, 2));
        assert_eq!(session.stuck(), Stuck::default());
    }

    #[test]
    fn test_gateway_error_keeps_state_for_retry() {
        let env = SimulatedWorld::new(3, Coord::new(0, 0))
            .with_terminal(Coord::new(2, 0), 1000.0)
            .with_glitch(Glitch::GatewayError);
        let mut session = Session::new(env, Arc::new(InMemoryRepository::new()), config()).unwrap();

        assert!(matches!(session.run(), Err(Error::Gateway { .. })));
        assert_eq!(session.phase(), Phase::Exploring);
        assert_eq!(session.steps(), 0);

        let report = session.run().unwrap();
        assert!(matches!(report.outcome, SessionOutcome::TargetFound { .. }));
    }

    #[test]
    fn test_budget_exhaustion() {
        let env = SimulatedWorld::new(3, Coord::new(0, 0));
        let mut session = Session::new(
            env,
            Arc::new(InMemoryRepository::new()),
            config().with_step_budget(3),
        )
        .unwrap();

        let report = session.run().unwrap();
        assert_eq!(report.outcome, SessionOutcome::BudgetExhausted);
        assert_eq!(report.exploration_steps, 3);
        assert_eq!(session.environment().moves(), 3);
    }

    #[test]
    fn test_mismatched_snapshot_is_ignored() {
        let repo = InMemoryRepository::new();
        let mut stale = WorldModel::new(5);
        stale.known.insert(Coord::new(4, 4));
        repo.save(&stale, WorldId::default()).unwrap();

        let session = {
            let mut session =
                Session::new(Scripted::new(Coord::new(0, 0), []), Arc::new(repo), config())
                    .unwrap();
            session.step().unwrap();
            session
        };
        assert_eq!(session.world().grid_size(), 3);
        assert_eq!(session.world().known.len(), 1);
    }

    #[test]
    fn test_off_grid_start_is_a_gateway_error() {
        let mut session = Session::new(
            Scripted::new(Coord::SENTINEL, []),
            Arc::new(InMemoryRepository::new()),
            config(),
        )
        .unwrap();
        assert!(matches!(session.step(), Err(Error::Gateway { .. })));
        assert_eq!(session.phase(), Phase::Initializing);
    }

    #[test]
    fn test_every_probe_is_persisted() {
        let repo = InMemoryRepository::new();
        let env = Scripted::new(Coord::new(0, 0), [moved(1, 0, -1.0)]);
        let mut session = Session::new(env, Arc::new(repo.clone()), config()).unwrap();
        session.step().unwrap();
        assert!(!repo.contains(WorldId::default()));

        session.step().unwrap();
        let saved = repo.load(WorldId::default()).unwrap().unwrap();
        assert!(saved.known.contains(Coord::new(1, 0)));
    }

    #[test]
    fn test_incomplete_response_is_never_terminal() {
        let env = SimulatedWorld::new(3, Coord::new(1, 1)).with_glitch(Glitch::Incomplete);
        let mut session = session(env, config().with_terminal_reward_threshold(0.0));
        session.step().unwrap();

        assert_eq!(session.phase(), Phase::Exploring);
        assert_eq!(session.world().target, None);
        assert_eq!(session.stuck().count, 1);
    }

    #[test]
    fn test_incomplete_response_does_not_end_navigation() {
        let repo = InMemoryRepository::new();
        let mut world = WorldModel::new(3);
        world.record_target(Target {
            position: Coord::new(0, 0),
            approach: Direction::East,
        });
        repo.save(&world, WorldId::default()).unwrap();

        let env = Scripted::new(
            Coord::new(0, 0),
            [MoveResponse::Incomplete, moved(1, 0, 0.0)],
        );
        let config = config()
            .with_mode(RunMode::Navigate)
            .with_terminal_reward_threshold(0.0);
        let mut session = Session::new(env, Arc::new(repo), config).unwrap();

        let report = session.run().unwrap();
        assert_eq!(
            report.outcome,
            SessionOutcome::TargetReached {
                target: world.target.unwrap(),
                moves: 2
            }
        );
    }

    #[test]
    fn test_corrupt_snapshot_falls_back_to_fresh_world() {
        let repo = InMemoryRepository::new();
        let mut value = serde_json::to_value(SavedWorld::new(WorldModel::new(2))).unwrap();
        value["world"]["grid"]["size"] = serde_json::json!(3);
        repo.insert_raw(WorldId::default(), rmp_serde::to_vec_named(&value).unwrap());

        let env = SimulatedWorld::new(3, Coord::new(0, 0)).with_terminal(Coord::new(2, 2), 1000.0);
        let mut session = Session::new(env, Arc::new(repo), config()).unwrap();

        let report = session.run().unwrap();
        assert!(matches!(report.outcome, SessionOutcome::TargetFound { .. }));
        assert_eq!(session.world().grid_size(), 3);
    }
}
