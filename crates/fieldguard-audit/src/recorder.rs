//! Audit recorders
//!
//! Recording is strictly best-effort: a sink failure is logged to the
//! operational log and never surfaced to the caller, and failed events are
//! not retried. `AuditRecorder` appends synchronously; `SpooledRecorder`
//! hands events to a background writer thread so persistence latency never
//! blocks the caller.

use crate::event::{AuditEvent, EventStatus};
use crate::sink::AuditSink;
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use std::thread::JoinHandle;
use tokio::sync::mpsc;
use tracing::{error, warn};

/// Synchronous best-effort recorder
#[derive(Clone)]
pub struct AuditRecorder {
    sink: Arc<dyn AuditSink>,
}

impl AuditRecorder {
    /// Create a recorder over a sink
    pub fn new(sink: Arc<dyn AuditSink>) -> Self {
        Self { sink }
    }

    /// Persist one event; a sink failure is logged, never raised
    pub fn record(&self, event: AuditEvent) {
        if let Err(e) = self.sink.append(&event) {
            error!(
                action_type = %event.action_type,
                error = %e,
                "failed to persist audit event"
            );
        }
    }

    /// Record an audited function call with the canonical details payload
    pub fn record_call(
        &self,
        actor: &str,
        action_type: impl Into<String>,
        function: impl Into<String>,
        details: impl Serialize,
        status: EventStatus,
    ) {
        let event = AuditEvent::new(action_type)
            .with_actor(actor)
            .with_details(AuditEvent::function_call(function, details))
            .with_status(status);

        self.record(event);
    }
}

/// Commands sent to the background writer
enum SpoolCommand {
    Record(Box<AuditEvent>),
    Shutdown,
}

/// Fire-and-forget recorder backed by a background writer thread.
///
/// `record` only performs a channel send; the writer thread drains the
/// queue in order and appends to the sink. Events queued before a
/// shutdown are written before the thread exits.
pub struct SpooledRecorder {
    sender: mpsc::UnboundedSender<SpoolCommand>,
    writer: Mutex<Option<JoinHandle<()>>>,
}

impl SpooledRecorder {
    /// Start the background writer over a sink
    pub fn new(sink: Arc<dyn AuditSink>) -> Self {
        let (sender, mut receiver) = mpsc::unbounded_channel();

        let writer = std::thread::spawn(move || {
            while let Some(command) = receiver.blocking_recv() {
                match command {
                    SpoolCommand::Record(event) => {
                        if let Err(e) = sink.append(&event) {
                            error!(
                                action_type = %event.action_type,
                                error = %e,
                                "failed to persist audit event"
                            );
                        }
                    }
                    SpoolCommand::Shutdown => break,
                }
            }
        });

        Self {
            sender,
            writer: Mutex::new(Some(writer)),
        }
    }

    /// Queue one event; never blocks on persistence
    pub fn record(&self, event: AuditEvent) {
        if self
            .sender
            .send(SpoolCommand::Record(Box::new(event)))
            .is_err()
        {
            warn!("audit spool is closed, dropping event");
        }
    }

    /// Drain queued events and stop the writer thread
    pub fn shutdown(&self) {
        let _ = self.sender.send(SpoolCommand::Shutdown);

        if let Some(writer) = self.writer.lock().take() {
            if writer.join().is_err() {
                error!("audit writer thread panicked");
            }
        }
    }
}

impl Drop for SpooledRecorder {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;
    use fieldguard_core::Error;

    struct FailingSink;

    impl AuditSink for FailingSink {
        fn append(&self, _event: &AuditEvent) -> fieldguard_core::Result<()> {
            Err(Error::audit("store unavailable"))
        }
    }

    #[test]
    fn test_record_appends_to_sink() {
        let sink = Arc::new(MemorySink::new());
        let recorder = AuditRecorder::new(sink.clone());

        recorder.record(AuditEvent::new("Permission Check").with_actor("jane"));

        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].actor, "jane");
    }

    #[test]
    fn test_record_call_builds_canonical_payload() {
        let sink = Arc::new(MemorySink::new());
        let recorder = AuditRecorder::new(sink.clone());

        recorder.record_call(
            "jane",
            "Function Call",
            "read_safe",
            serde_json::json!({"record_type": "Invoice"}),
            EventStatus::Success,
        );

        let events = sink.events();
        let details: serde_json::Value = serde_json::from_str(&events[0].details).unwrap();
        assert_eq!(details["event_type"], "Function Call");
        assert_eq!(details["function"], "read_safe");
        assert_eq!(details["details"]["record_type"], "Invoice");
    }

    #[test]
    fn test_sink_failure_never_propagates() {
        let recorder = AuditRecorder::new(Arc::new(FailingSink));
        recorder.record(AuditEvent::new("Function Call"));
    }

    #[test]
    fn test_spooled_recorder_drains_on_shutdown() {
        let sink = Arc::new(MemorySink::new());
        let recorder = SpooledRecorder::new(sink.clone());

        for i in 0..3 {
            recorder.record(AuditEvent::new("Function Call").with_actor(format!("actor-{}", i)));
        }

        recorder.shutdown();
        assert_eq!(sink.len(), 3);
    }

    #[test]
    fn test_spooled_recorder_survives_sink_failure() {
        let recorder = SpooledRecorder::new(Arc::new(FailingSink));
        recorder.record(AuditEvent::new("Function Call"));
        recorder.shutdown();
    }
}
