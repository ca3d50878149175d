//! Error types for murmur.

/// Top-level error type for the vault + conversation session system.
#[derive(Debug, thiserror::Error)]
pub enum MurmurError {
    /// Note vault / document store error.
    #[error("vault error: {0}")]
    Vault(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Conversation session error (connect, transport).
    #[error("session error: {0}")]
    Session(String),

    /// Wire protocol error (malformed frames, serialization).
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Channel send/receive error.
    #[error("channel error: {0}")]
    Channel(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, MurmurError>;
