//! Observer port - abstraction for watching an exploration session
//!
//! Observers receive session events without the state machine knowing how
//! they are displayed, logged or stored.

use crate::{
    Result,
    session::{Phase, ProbeRecord, SessionReport},
    types::Coord,
    world::Target,
};

/// Observer trait for monitoring a session
///
/// # Event Sequence
///
/// 1. `on_session_start(start, phase)` - once, after initialization
/// 2. `on_probe(record)` - after every probe has been applied and persisted
/// 3. `on_target_found(target)` - at most once per session
/// 4. `on_session_end(report)` - once the session reaches `Done`
///
/// Observer errors are logged by the session and never stop exploration.
///
/// # Examples
///
/// ```no_run
/// use gridscout::{ports::SessionObserver, session::ProbeRecord};
///
/// struct StepCounter {
///     steps: usize,
/// }
///
/// impl SessionObserver for StepCounter {
///     fn on_probe(&mut self, _record: &ProbeRecord) -> gridscout::Result<()> {
///         self.steps += 1;
///         Ok(())
///     }
/// }
/// ```
pub trait SessionObserver: Send {
    /// Called once the start position is known and any snapshot restored.
    ///
    /// # Default Implementation
    ///
    /// Does nothing.
    fn on_session_start(&mut self, _start: Coord, _phase: Phase) -> Result<()> {
        Ok(())
    }

    /// Called after each probe outcome has been incorporated.
    ///
    /// # Default Implementation
    ///
    /// Does nothing.
    fn on_probe(&mut self, _record: &ProbeRecord) -> Result<()> {
        Ok(())
    }

    /// Called when the terminal reward is first observed.
    fn on_target_found(&mut self, _target: &Target) -> Result<()> {
        Ok(())
    }

    /// Called when the session finishes.
    fn on_session_end(&mut self, _report: &SessionReport) -> Result<()> {
        Ok(())
    }
}
