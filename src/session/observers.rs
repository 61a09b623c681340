//! Ready-made session observers.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
};

use serde::Serialize;

use super::{Phase, ProbeRecord, SessionReport};
use crate::{Error, Result, ports::SessionObserver, types::Coord, world::Target};

/// In-memory probe log.
///
/// Clones share the same log, so a test can keep one handle and box the
/// other into the session.
#[derive(Debug, Clone, Default)]
pub struct ProbeRecorder {
    probes: Arc<Mutex<Vec<ProbeRecord>>>,
    target: Arc<Mutex<Option<Target>>>,
}

impl ProbeRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every probe seen so far, in order.
    pub fn probes(&self) -> Vec<ProbeRecord> {
        lock(&self.probes).clone()
    }

    pub fn len(&self) -> usize {
        lock(&self.probes).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.probes).is_empty()
    }

    /// Target reported through `on_target_found`, if any.
    pub fn target(&self) -> Option<Target> {
        *lock(&self.target)
    }
}

// A panicking observer must not take the log down with it.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl SessionObserver for ProbeRecorder {
    fn on_probe(&mut self, record: &ProbeRecord) -> Result<()> {
        lock(&self.probes).push(*record);
        Ok(())
    }

    fn on_target_found(&mut self, target: &Target) -> Result<()> {
        *lock(&self.target) = Some(*target);
        Ok(())
    }
}

/// One line of a [`JsonlObserver`] log.
#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum Event<'a> {
    SessionStart { start: Coord, phase: Phase },
    Probe(&'a ProbeRecord),
    TargetFound(&'a Target),
    SessionEnd(&'a SessionReport),
}

/// JSONL observer - writes every session event as one JSON object per line
pub struct JsonlObserver {
    writer: BufWriter<File>,
}

impl JsonlObserver {
    /// Create (or truncate) the log file at `path`.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create event log {path:?}"),
            source,
        })?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    fn write(&mut self, event: &Event<'_>) -> Result<()> {
        serde_json::to_writer(&mut self.writer, event)?;
        writeln!(&mut self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

impl SessionObserver for JsonlObserver {
    fn on_session_start(&mut self, start: Coord, phase: Phase) -> Result<()> {
        self.write(&Event::SessionStart { start, phase })
    }

    fn on_probe(&mut self, record: &ProbeRecord) -> Result<()> {
        self.write(&Event::Probe(record))
    }

    fn on_target_found(&mut self, target: &Target) -> Result<()> {
        self.write(&Event::TargetFound(target))
    }

    fn on_session_end(&mut self, report: &SessionReport) -> Result<()> {
        self.write(&Event::SessionEnd(report))
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::{session::ProbeOutcome, types::Direction};

    fn record(step: usize) -> ProbeRecord {
        ProbeRecord {
            step,
            phase: Phase::Exploring,
            from: Coord::new(0, 0),
            requested: Direction::East,
            outcome: ProbeOutcome::Moved {
                direction: Direction::East,
                to: Coord::new(1, 0),
            },
            reward: -1.0,
            stuck: 0,
        }
    }

    #[test]
    fn test_recorder_clones_share_log() {
        let recorder = ProbeRecorder::new();
        let mut boxed: Box<dyn SessionObserver> = Box::new(recorder.clone());

        boxed.on_probe(&record(1)).unwrap();
        boxed.on_probe(&record(2)).unwrap();

        assert_eq!(recorder.len(), 2);
        assert_eq!(recorder.probes()[1].step, 2);
        assert!(recorder.target().is_none());
    }

    #[test]
    fn test_jsonl_writes_one_line_per_event() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("events.jsonl");

        let mut observer = JsonlObserver::new(&path).unwrap();
        observer
            .on_session_start(Coord::new(0, 0), Phase::Exploring)
            .unwrap();
        observer.on_probe(&record(1)).unwrap();
        observer
            .on_target_found(&Target {
                position: Coord::new(1, 0),
                approach: Direction::North,
            })
            .unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<serde_json::Value> = contents
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["event"], "session_start");
        assert_eq!(lines[1]["event"], "probe");
        assert_eq!(lines[1]["outcome"]["kind"], "moved");
        assert_eq!(lines[2]["event"], "target_found");
    }
}
