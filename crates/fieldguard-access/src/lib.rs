//! Fieldguard Access
//!
//! Field-level access control over a pluggable record store.
//!
//! Provides:
//! - Capability traits the host implements over its store
//!   (`FieldMetadataProvider`, `PermissionSource`, `RecordSource`)
//! - `AccessGate`: a fail-closed per-field permission check
//! - `SafeReader`: masked record reads that omit denied fields
//! - `MemoryStore`: an in-memory provider for tests and embedding

pub mod gate;
pub mod provider;
pub mod reader;

pub use gate::{AccessGate, DEFAULT_OVERRIDE_ROLE};
pub use provider::{FieldMetadataProvider, MemoryStore, PermissionSource, RecordSource};
pub use reader::{ReadResult, SafeReader};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::gate::{AccessGate, DEFAULT_OVERRIDE_ROLE};
    pub use crate::provider::{FieldMetadataProvider, MemoryStore, PermissionSource, RecordSource};
    pub use crate::reader::{ReadResult, SafeReader};
}
