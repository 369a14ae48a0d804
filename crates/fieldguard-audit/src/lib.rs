//! Fieldguard Audit
//!
//! Append-only audit event recording.
//!
//! Provides:
//! - `AuditEvent` with builder-style construction
//! - `AuditSink` implementations (in-memory, JSON-lines file)
//! - Best-effort recorders: synchronous, or spooled through a background
//!   writer thread
//!
//! Recording never raises and never blocks the caller's primary
//! operation; persistence failures go to the operational log only.

pub mod event;
pub mod recorder;
pub mod sink;

pub use event::{AuditEvent, EventStatus, UNKNOWN_SOURCE};
pub use recorder::{AuditRecorder, SpooledRecorder};
pub use sink::{AuditSink, JsonlSink, MemorySink};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::event::{AuditEvent, EventStatus};
    pub use crate::recorder::{AuditRecorder, SpooledRecorder};
    pub use crate::sink::{AuditSink, JsonlSink, MemorySink};
}
