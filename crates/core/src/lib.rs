//! Core types and traits for APDU (Application Protocol Data Unit) operations
//!
//! This crate provides the foundational pieces for talking to smart cards
//! according to ISO/IEC 7816-4:
//!
//! - Building and serializing APDU commands (SELECT, READ RECORD)
//! - Parsing APDU responses and interpreting status words
//! - The [`CardTransport`] trait that abstracts over the physical link
//!
//! It deliberately knows nothing about radios, readers, or sessions; those
//! belong to whichever transport implementation is plugged in underneath.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![forbid(unsafe_code)]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

// Re-export bytes for convenience
pub use bytes::{Bytes, BytesMut};

pub mod command;
pub mod error;
pub mod response;
pub mod transport;
pub mod types;

pub use command::{Command, ExpectedLength};
pub use error::Error;
pub use response::Response;
pub use response::status::StatusWord;
pub use transport::{CardTransport, MockTransport, TransportError};
pub use types::{Aid, RecordLocator};

/// Prelude module containing commonly used traits and types
pub mod prelude {
    pub use crate::{Bytes, BytesMut, Error};

    pub use crate::command::{Command, ExpectedLength};

    pub use crate::response::Response;
    pub use crate::response::status::{StatusWord, common as status};

    pub use crate::transport::{CardTransport, TransportError};

    pub use crate::types::{Aid, RecordLocator};
}
