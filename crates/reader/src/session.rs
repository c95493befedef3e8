//! Card session driver
//!
//! This module owns the discovery state machine: SELECT the application,
//! then walk the whole SFI × record-number space issuing one READ RECORD
//! per locator, strictly one command in flight, emitting one event per
//! exchange. The first transport failure anywhere ends the session; missed
//! records do not.

use std::fmt;

use cardprobe_core::{Aid, CardTransport, Command, RecordLocator, Response};
use tracing::{debug, warn};

use crate::classify::{classify_record, classify_select};
use crate::error::{Error, Result};
use crate::event::{DiscoveryEvent, EventSink, Outcome, Phase};
use crate::tag::{DetectedTag, TagKind};

/// State of one discovery session
///
/// Owned exclusively by the driver; transitions are driven only by
/// transport results, never by the event sink or the session layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No card interaction started yet
    Idle,
    /// A tag was detected and is being connected
    Connecting,
    /// SELECT has been issued and is awaiting classification
    Selecting,
    /// Walking the record space; the locator is the current probe
    Enumerating(RecordLocator),
    /// Session over; no further commands will be issued
    Terminated,
}

/// Driver for one record-discovery session against a card application
///
/// Created with the AID to select and a sink for the event stream, then
/// handed a [`DetectedTag`] when the session layer reports one. One driver
/// instance drives one card interaction; the transport is never shared.
pub struct CardReader<S: EventSink> {
    /// Application to select
    aid: Aid,
    /// Consumer of the discovery event stream
    sink: S,
    /// Current session state
    state: SessionState,
}

impl<S: EventSink> fmt::Debug for CardReader<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardReader")
            .field("aid", &self.aid)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<S: EventSink> CardReader<S> {
    /// Create a new driver for the given application
    pub const fn new(aid: Aid, sink: S) -> Self {
        Self {
            aid,
            sink,
            state: SessionState::Idle,
        }
    }

    /// Current session state
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Drive a full discovery session over the detected tag
    ///
    /// Blocks until the session terminates: either all 496 locators have
    /// been probed, or the first terminal condition (incompatible tag,
    /// connection failure, SELECT rejection, transport error) was hit.
    /// Every terminal path hands a human-readable reason to
    /// [`CardTransport::invalidate`] before returning.
    ///
    /// Terminated is absorbing: a driver that already ran issues no
    /// further commands.
    pub fn read_card<T: CardTransport>(&mut self, tag: DetectedTag<T>) -> Result<()> {
        if self.state != SessionState::Idle {
            warn!(state = ?self.state, "Ignoring tag, session already ran");
            return Ok(());
        }
        self.state = SessionState::Connecting;

        let DetectedTag { kind, mut transport } = tag;

        if kind != TagKind::Iso7816 {
            self.emit(Phase::Select, Outcome::TransportError("incompatible tag".into()));
            transport.invalidate("Tag not compatible.");
            self.state = SessionState::Terminated;
            return Err(Error::IncompatibleTag);
        }

        if let Err(e) = transport.connect() {
            self.emit(Phase::Select, Outcome::TransportError(e.to_string()));
            transport.invalidate("Connection failed.");
            self.state = SessionState::Terminated;
            return Err(e.into());
        }

        self.state = SessionState::Selecting;
        let select = Command::select_by_name(&self.aid);
        let response = match exchange(&mut transport, &select) {
            Ok(response) => response,
            Err(e) => {
                self.emit(Phase::Select, Outcome::TransportError(e.to_string()));
                transport.invalidate("SELECT AID command failed.");
                self.state = SessionState::Terminated;
                return Err(e);
            }
        };

        match classify_select(&response) {
            Outcome::SelectionFailed(sw) => {
                warn!(aid = %self.aid, sw = %sw, "Application selection rejected");
                self.emit(Phase::Select, Outcome::SelectionFailed(sw));
                transport.invalidate("Failed to select AID.");
                self.state = SessionState::Terminated;
                return Err(Error::SelectionFailed(sw));
            }
            outcome => {
                debug!(aid = %self.aid, "Application selected");
                self.emit(Phase::Select, outcome);
            }
        }

        for locator in RecordLocator::all() {
            self.state = SessionState::Enumerating(locator);

            let command = Command::read_record(locator);
            match exchange(&mut transport, &command) {
                Ok(response) => {
                    self.emit(Phase::ReadRecord(locator), classify_record(&response));
                }
                Err(e) => {
                    // The reference behavior: the first transport error
                    // aborts the whole enumeration, it does not skip.
                    warn!(%locator, error = %e, "Transport error, stopping enumeration");
                    self.emit(Phase::ReadRecord(locator), Outcome::TransportError(e.to_string()));
                    transport.invalidate("Read record command failed.");
                    self.state = SessionState::Terminated;
                    return Err(e);
                }
            }
        }

        debug!(aid = %self.aid, "Record discovery complete");
        transport.invalidate("Discovery complete.");
        self.state = SessionState::Terminated;
        Ok(())
    }

    fn emit(&mut self, phase: Phase, outcome: Outcome) {
        self.sink.on_event(DiscoveryEvent::new(phase, outcome));
    }
}

/// One command/response exchange: serialize, transmit, parse
///
/// The transport suspends the calling thread until the card answers; there
/// is never more than this one command outstanding on the connection.
fn exchange<T: CardTransport>(transport: &mut T, command: &Command) -> Result<Response> {
    let raw = transport.transmit_raw(&command.to_bytes())?;
    Ok(Response::from_bytes(&raw)?)
}
