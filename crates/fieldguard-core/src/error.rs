//! Error types for fieldguard

/// Result type alias using fieldguard's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for fieldguard operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration errors (rule set unreadable, invalid scope names)
    #[error("configuration error: {0}")]
    Config(String),

    /// Individual rule errors (malformed pattern)
    #[error("rule error: {0}")]
    Rule(String),

    /// Permission / metadata evaluation errors
    #[error("access error: {0}")]
    Access(String),

    /// Record store errors (missing record, load failure)
    #[error("record error: {0}")]
    Record(String),

    /// Audit persistence errors
    #[error("audit error: {0}")]
    Audit(String),

    /// Network/IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new rule error
    pub fn rule(msg: impl Into<String>) -> Self {
        Self::Rule(msg.into())
    }

    /// Create a new access error
    pub fn access(msg: impl Into<String>) -> Self {
        Self::Access(msg.into())
    }

    /// Create a new record error
    pub fn record(msg: impl Into<String>) -> Self {
        Self::Record(msg.into())
    }

    /// Create a new audit error
    pub fn audit(msg: impl Into<String>) -> Self {
        Self::Audit(msg.into())
    }
}
