//! Discovery events and the sinks that consume them
//!
//! The session driver reports progress as an ordered stream of
//! [`DiscoveryEvent`] values: the SELECT result first, then one event per
//! READ RECORD attempt in locator order. Consumers (UI, log) receive them
//! through an [`EventSink`], which is implemented for closures and for
//! crossbeam channel senders.

use std::fmt;

use bytes::Bytes;
use cardprobe_core::{RecordLocator, StatusWord};
use tracing::warn;

/// Which exchange of the session an event refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// The initial SELECT of the application
    Select,
    /// One READ RECORD attempt at the given locator
    ReadRecord(RecordLocator),
}

/// Result of one driver step
///
/// A non-success status word during enumeration is a normal miss, not an
/// error; all such codes are folded into [`Outcome::RecordNotFound`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The card answered 90 00; payload may be empty
    Success(Bytes),
    /// The card answered anything else to a READ RECORD
    RecordNotFound,
    /// The card rejected the SELECT with this status word
    SelectionFailed(StatusWord),
    /// The transport failed; terminal for the session
    TransportError(String),
}

impl Outcome {
    /// Canonical text rendering of the payload: lowercase hex, two digits
    /// per byte, no separators. `None` for outcomes without a payload.
    pub fn payload_hex(&self) -> Option<String> {
        match self {
            Self::Success(payload) => Some(hex::encode(payload)),
            _ => None,
        }
    }
}

/// One entry in the ordered discovery event stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryEvent {
    /// Which exchange this event reports on
    pub phase: Phase,
    /// What came back
    pub outcome: Outcome,
}

impl DiscoveryEvent {
    /// Create a new event
    pub const fn new(phase: Phase, outcome: Outcome) -> Self {
        Self { phase, outcome }
    }
}

impl fmt::Display for DiscoveryEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.phase {
            Phase::Select => write!(f, "SELECT: ")?,
            Phase::ReadRecord(locator) => write!(f, "{}: ", locator)?,
        }
        match &self.outcome {
            Outcome::Success(payload) => write!(f, "{}", hex::encode(payload)),
            Outcome::RecordNotFound => write!(f, "not found"),
            Outcome::SelectionFailed(sw) => write!(f, "selection failed (SW {})", sw),
            Outcome::TransportError(reason) => write!(f, "transport error: {}", reason),
        }
    }
}

/// Trait for consumers of the discovery event stream
pub trait EventSink {
    /// Handle one discovery event
    fn on_event(&mut self, event: DiscoveryEvent);
}

// Implement the sink for closures
impl<F> EventSink for F
where
    F: FnMut(DiscoveryEvent),
{
    fn on_event(&mut self, event: DiscoveryEvent) {
        self(event)
    }
}

/// Sender half of a discovery event channel
pub type DiscoveryEventSender = crossbeam_channel::Sender<DiscoveryEvent>;
/// Receiver half of a discovery event channel
pub type DiscoveryEventReceiver = crossbeam_channel::Receiver<DiscoveryEvent>;

/// Create an unbounded channel for discovery events
///
/// The sender becomes a sink via [`channel_sink`]; the receiver side is
/// free to format or drop events without ever touching session state.
pub fn discovery_event_channel() -> (DiscoveryEventSender, DiscoveryEventReceiver) {
    crossbeam_channel::unbounded()
}

/// Wrap a channel sender into an [`EventSink`]
///
/// A hung-up receiver only loses the event, it never aborts the session.
pub fn channel_sink(sender: DiscoveryEventSender) -> impl EventSink {
    move |event| {
        if let Err(e) = sender.send(event) {
            warn!(error = %e, "Discovery event receiver disconnected");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_hex_is_lowercase_unseparated() {
        let outcome = Outcome::Success(Bytes::from_static(&[0xDE, 0xAD, 0xBE, 0xEF]));
        assert_eq!(outcome.payload_hex().unwrap(), "deadbeef");

        assert_eq!(Outcome::RecordNotFound.payload_hex(), None);
    }

    #[test]
    fn test_event_display() {
        let locator = RecordLocator::new(3, 2).unwrap();
        let event = DiscoveryEvent::new(
            Phase::ReadRecord(locator),
            Outcome::Success(Bytes::from_static(&[0x70, 0x0A])),
        );
        assert_eq!(event.to_string(), "SFI 3 record 2: 700a");

        let event = DiscoveryEvent::new(Phase::ReadRecord(locator), Outcome::RecordNotFound);
        assert_eq!(event.to_string(), "SFI 3 record 2: not found");
    }

    #[test]
    fn test_channel_sink_delivers_in_order() {
        let (tx, rx) = discovery_event_channel();
        let mut sink = channel_sink(tx);
        for sfi in [1, 2, 3] {
            let locator = RecordLocator::new(sfi, 1).unwrap();
            sink.on_event(DiscoveryEvent::new(
                Phase::ReadRecord(locator),
                Outcome::RecordNotFound,
            ));
        }

        let received: Vec<_> = rx.try_iter().collect();
        assert_eq!(received.len(), 3);
        for (i, event) in received.iter().enumerate() {
            match event.phase {
                Phase::ReadRecord(locator) => assert_eq!(locator.sfi() as usize, i + 1),
                Phase::Select => panic!("unexpected select event"),
            }
        }
    }
}
