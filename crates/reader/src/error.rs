//! Error types for discovery sessions

use cardprobe_core::{StatusWord, TransportError};

/// Result type for discovery session operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for discovery session operations
///
/// Every variant is terminal for the session it occurs in; none is retried.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The detected tag does not speak ISO 7816
    #[error("Tag is not ISO 7816 compatible")]
    IncompatibleTag,

    /// SELECT was rejected by the card
    #[error("Failed to select application: SW {0}")]
    SelectionFailed(StatusWord),

    /// Codec-level errors
    #[error(transparent)]
    Core(#[from] cardprobe_core::Error),

    /// Transport-related errors
    #[error(transparent)]
    Transport(#[from] TransportError),
}
