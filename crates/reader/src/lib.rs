//! Card session driver for ISO/IEC 7816-4 record discovery
//!
//! This crate orchestrates a complete discovery session against a card
//! application: SELECT the application by AID, then probe every short file
//! identifier and record number the card could expose, emitting one
//! [`DiscoveryEvent`] per attempt to a caller-supplied [`EventSink`].
//!
//! The physical link is abstracted behind [`cardprobe_core::CardTransport`];
//! this crate never touches radios or readers. Commands are issued strictly
//! one at a time, in a fixed order, and nothing is retried: a failed SELECT
//! or a transport error ends the session, while a missed record is a normal
//! outcome and enumeration continues.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![forbid(unsafe_code)]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

pub mod classify;
pub mod error;
pub mod event;
pub mod session;
pub mod tag;

pub use classify::{classify_record, classify_select};
pub use error::{Error, Result};
pub use event::{DiscoveryEvent, EventSink, Outcome, Phase, channel_sink, discovery_event_channel};
pub use session::{CardReader, SessionState};
pub use tag::{DetectedTag, TagKind};

pub use cardprobe_core as core;
