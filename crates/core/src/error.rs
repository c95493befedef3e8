//! Error types for APDU encoding and decoding

use crate::transport::TransportError;

/// Error type for codec-level APDU operations
///
/// Codec errors are precondition violations and fail fast at construction
/// or decoding time; they are never silently substituted with defaults.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// AID length outside the 5..=16 byte range allowed by ISO 7816-5
    #[error("Invalid AID length: {0} (must be 5 to 16 bytes)")]
    InvalidAid(usize),

    /// Response shorter than the two-byte status word trailer
    #[error("Malformed response: {0} byte(s), need at least 2 for the status word")]
    MalformedResponse(usize),

    /// Transport-level failure
    #[error(transparent)]
    Transport(#[from] TransportError),
}
