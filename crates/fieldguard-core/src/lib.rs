//! Fieldguard Core
//!
//! Core types and error handling shared across fieldguard components.
//!
//! This crate provides:
//! - Opaque identifier types for record types and field names
//! - Field metadata, actor, and record value types
//! - Error types and result handling

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{AccessOp, Actor, FieldMeta, FieldName, Record, RecordType};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{AccessOp, Actor, FieldMeta, FieldName, Record, RecordType};
}
