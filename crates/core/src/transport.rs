//! Transport traits for APDU communication with cards
//!
//! This module provides the abstraction the record-discovery core depends
//! on: something that can carry one command to a card and bring back one
//! response. The physical layer (NFC radio, PC/SC reader, test double)
//! lives entirely behind this trait.

use std::fmt;

use bytes::Bytes;
use tracing::{debug, trace};

/// Transport error type
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    /// Connecting to the card failed
    #[error("Failed to connect to card: {0}")]
    ConnectionFailed(String),

    /// Transmission failed mid-exchange
    #[error("Failed to transmit data: {0}")]
    Transmission(String),

    /// The transport was invalidated (user cancel, radio teardown)
    #[error("Transport invalidated: {0}")]
    Invalidated(String),
}

/// Trait for card transports
///
/// A transport is responsible for carrying raw APDU bytes to a card and
/// returning the raw response. It has no knowledge of command structure or
/// protocol details. The `&mut self` receivers make overlapping exchanges
/// on one connection impossible; smart-card links are strictly half-duplex
/// with a single command in flight.
pub trait CardTransport: Send + fmt::Debug {
    /// Establish the connection to the card
    fn connect(&mut self) -> Result<(), TransportError>;

    /// Send raw APDU bytes to the card and return the raw response,
    /// including the trailing status word
    fn transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, TransportError> {
        trace!(command = ?hex::encode(command), "Transmitting raw command");
        let result = self.do_transmit_raw(command);
        match &result {
            Ok(response) => {
                trace!(response = ?hex::encode(response), "Received raw response");
            }
            Err(e) => {
                debug!(error = ?e, "Transport error during transmission");
            }
        }
        result
    }

    /// Internal implementation of transmit_raw
    /// This is the method that concrete implementations should override
    fn do_transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, TransportError>;

    /// Check if the transport is connected to a physical card
    fn is_connected(&self) -> bool;

    /// Release the transport, ending the card session
    ///
    /// The reason is a human-readable explanation of why the session ended
    /// and is shown to the user by the session layer. Any subsequent
    /// `transmit_raw` must fail.
    fn invalidate(&mut self, reason: &str);
}

/// Scriptable transport for tests and simulations
///
/// Responses are played back in order; once the script is exhausted every
/// transmit fails. Transmitted commands and the invalidation reason are
/// recorded for assertions.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    /// Scripted results to return, in order
    pub responses: Vec<Result<Bytes, TransportError>>,
    /// Commands that were sent
    pub commands: Vec<Bytes>,
    /// Whether the transport is connected
    pub connected: bool,
    /// Whether connect() should fail
    pub refuse_connection: bool,
    /// Reason passed to invalidate, if any
    pub invalidated: Option<String>,
}

impl MockTransport {
    /// Create a new mock transport with the given scripted results
    pub fn new(responses: Vec<Result<Bytes, TransportError>>) -> Self {
        Self {
            responses,
            ..Self::default()
        }
    }

    /// Create a new mock transport that returns the given raw responses
    pub fn with_responses<I>(responses: I) -> Self
    where
        I: IntoIterator<Item = Bytes>,
    {
        Self::new(responses.into_iter().map(Ok).collect())
    }

    /// Create a new mock transport that always returns success (90 00)
    pub fn with_success() -> Self {
        Self::with_responses([Bytes::from_static(&[0x90, 0x00])])
    }
}

impl CardTransport for MockTransport {
    fn connect(&mut self) -> Result<(), TransportError> {
        if self.refuse_connection {
            return Err(TransportError::ConnectionFailed("mock refused".into()));
        }
        self.connected = true;
        Ok(())
    }

    fn do_transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, TransportError> {
        if let Some(reason) = &self.invalidated {
            return Err(TransportError::Invalidated(reason.clone()));
        }
        if !self.connected {
            return Err(TransportError::ConnectionFailed("not connected".into()));
        }

        self.commands.push(Bytes::copy_from_slice(command));

        if self.responses.is_empty() {
            return Err(TransportError::Transmission("script exhausted".into()));
        }

        // Either clone the single remaining response or take the next one
        if self.responses.len() == 1 {
            self.responses[0].clone()
        } else {
            self.responses.remove(0)
        }
    }

    fn is_connected(&self) -> bool {
        self.connected && self.invalidated.is_none()
    }

    fn invalidate(&mut self, reason: &str) {
        self.connected = false;
        self.invalidated = Some(reason.to_string());
    }
}
