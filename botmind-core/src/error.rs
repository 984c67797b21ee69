//! Error types for the BOTMIND core library.

use thiserror::Error;

/// Top-level error type for all BOTMIND operations.
#[derive(Error, Debug)]
pub enum BotError {
    /// The requested personality archetype is not in the registry.
    #[error("Unknown archetype: {0}")]
    UnknownArchetype(String),

    /// `select_action` was called with an empty candidate list.
    #[error("No candidate actions supplied")]
    NoCandidates,

    /// Serialization or deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A memory snapshot parsed but failed validation.
    #[error("Invalid memory snapshot: {reason}")]
    InvalidSnapshot {
        /// Which check the snapshot failed.
        reason: String,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, BotError>;
