//! Detected tag handed over by the session layer

use cardprobe_core::CardTransport;

/// Protocol family of a detected tag
///
/// Only ISO 7816 tags can carry the APDU conversation; everything else is
/// rejected before any command is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    /// ISO/IEC 7816-4 capable tag
    Iso7816,
    /// Any other tag technology (NDEF-only, MIFARE Classic, ...)
    Other,
}

/// A tag the external session layer has detected, with the transport that
/// reaches it
///
/// The transport's underlying connection stays owned by the session layer;
/// the driver borrows it for the duration of one card interaction.
#[derive(Debug)]
pub struct DetectedTag<T: CardTransport> {
    /// Protocol family reported by the session layer
    pub kind: TagKind,
    /// Transport reaching this tag
    pub transport: T,
}

impl<T: CardTransport> DetectedTag<T> {
    /// Wrap a transport for an ISO 7816 tag
    pub fn iso7816(transport: T) -> Self {
        Self {
            kind: TagKind::Iso7816,
            transport,
        }
    }

    /// Wrap a transport for an unsupported tag technology
    pub fn other(transport: T) -> Self {
        Self {
            kind: TagKind::Other,
            transport,
        }
    }
}
