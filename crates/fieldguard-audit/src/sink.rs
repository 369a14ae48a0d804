//! Audit sinks
//!
//! An `AuditSink` accepts append-only events. `MemorySink` keeps them in
//! memory; `JsonlSink` appends one JSON document per line to a file.

use crate::event::AuditEvent;
use fieldguard_core::Result;
use parking_lot::{Mutex, RwLock};
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Append-only destination for audit events
pub trait AuditSink: Send + Sync {
    /// Persist one event
    fn append(&self, event: &AuditEvent) -> Result<()>;
}

/// In-memory sink, primarily for tests and embedders that forward events
/// elsewhere
#[derive(Default)]
pub struct MemorySink {
    events: RwLock<Vec<AuditEvent>>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded events
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.read().clone()
    }

    /// Number of recorded events
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// Whether no events have been recorded
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }
}

impl AuditSink for MemorySink {
    fn append(&self, event: &AuditEvent) -> Result<()> {
        self.events.write().push(event.clone());
        Ok(())
    }
}

/// JSON-lines file sink: one serialized event per line, flushed per event
pub struct JsonlSink {
    path: PathBuf,
    writer: Mutex<BufWriter<std::fs::File>>,
}

impl JsonlSink {
    /// Open (or create) the audit file, creating parent directories as
    /// needed
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        debug!(path = %path.display(), "audit file sink open");

        Ok(Self {
            path,
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    /// Path of the audit file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AuditSink for JsonlSink {
    fn append(&self, event: &AuditEvent) -> Result<()> {
        let json = serde_json::to_string(event)?;

        let mut writer = self.writer.lock();
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventStatus;
    use std::io::BufRead;

    #[test]
    fn test_memory_sink_appends() {
        let sink = MemorySink::new();
        assert!(sink.is_empty());

        sink.append(&AuditEvent::new("Function Call").with_actor("jane"))
            .unwrap();
        sink.append(
            &AuditEvent::new("Permission Check")
                .with_status(EventStatus::Failure("denied".to_string())),
        )
        .unwrap();

        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].actor, "jane");
        assert_eq!(events[1].status, EventStatus::Failure("denied".to_string()));
    }

    #[test]
    fn test_jsonl_sink_writes_one_line_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit").join("events.jsonl");

        let sink = JsonlSink::open(&path).unwrap();
        sink.append(&AuditEvent::new("Function Call").with_actor("jane"))
            .unwrap();
        sink.append(&AuditEvent::new("Function Call").with_actor("meg"))
            .unwrap();

        let file = std::fs::File::open(&path).unwrap();
        let lines: Vec<String> = std::io::BufReader::new(file)
            .lines()
            .map(|l| l.unwrap())
            .collect();
        assert_eq!(lines.len(), 2);

        let first: AuditEvent = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(first.actor, "jane");
        assert_eq!(first.status, EventStatus::Success);
    }
}
