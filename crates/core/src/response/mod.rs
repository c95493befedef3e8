//! APDU response definitions
//!
//! This module provides types for parsing response APDUs according to
//! ISO/IEC 7816-4: a payload (possibly empty) followed by the mandatory
//! two-byte status word trailer.

pub mod status;

use bytes::{BufMut, Bytes, BytesMut};
use tracing::trace;

use crate::Error;
use status::StatusWord;

/// Basic APDU response structure
///
/// Produced exclusively by parsing transport output; immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Response payload data
    payload: Option<Bytes>,
    /// Status word
    status: StatusWord,
}

impl Response {
    /// Create a new response with payload and status
    pub fn new(payload: Option<Bytes>, status: impl Into<StatusWord>) -> Self {
        Self {
            payload,
            status: status.into(),
        }
    }

    /// Create a success response
    pub const fn success(payload: Option<Bytes>) -> Self {
        Self {
            payload,
            status: StatusWord::new(0x90, 0x00),
        }
    }

    /// Create an error response from a status word
    pub fn error(status: impl Into<StatusWord>) -> Self {
        Self {
            payload: None,
            status: status.into(),
        }
    }

    /// Parse a response from raw bytes (including status word)
    ///
    /// The last two bytes are always the status word; anything before them
    /// is the payload. Fails with [`Error::MalformedResponse`] when fewer
    /// than two bytes are present.
    pub fn from_bytes(data: &Bytes) -> Result<Self, Error> {
        if data.len() < 2 {
            return Err(Error::MalformedResponse(data.len()));
        }

        let split = data.len() - 2;
        let status = StatusWord::new(data[split], data[split + 1]);
        let payload = (split > 0).then(|| data.slice(..split));

        trace!(
            sw1 = format_args!("{:#04x}", status.sw1),
            sw2 = format_args!("{:#04x}", status.sw2),
            payload_len = payload.as_ref().map_or(0, Bytes::len),
            "Parsed APDU response"
        );

        Ok(Self { payload, status })
    }

    /// Get the response payload data
    pub const fn payload(&self) -> &Option<Bytes> {
        &self.payload
    }

    /// Get the status word
    pub const fn status(&self) -> StatusWord {
        self.status
    }

    /// Get the status word as a tuple (SW1, SW2)
    pub const fn status_tuple(&self) -> (u8, u8) {
        (self.status.sw1, self.status.sw2)
    }

    /// Check if the response indicates success (90 00)
    pub const fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

impl TryFrom<&[u8]> for Response {
    type Error = Error;

    fn try_from(data: &[u8]) -> Result<Self, Error> {
        Self::from_bytes(&Bytes::copy_from_slice(data))
    }
}

impl From<Response> for Bytes {
    fn from(response: Response) -> Self {
        let mut buf = BytesMut::with_capacity(response.payload.as_ref().map_or(0, Bytes::len) + 2);
        if let Some(payload) = response.payload {
            buf.put_slice(&payload);
        }
        buf.put_u8(response.status.sw1);
        buf.put_u8(response.status.sw2);
        buf.freeze()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_from_bytes() {
        let data = Bytes::from_static(&[0x01, 0x02, 0x03, 0x90, 0x00]);
        let resp = Response::from_bytes(&data).unwrap();
        assert_eq!(
            resp.payload().as_ref().unwrap().as_ref(),
            &[0x01, 0x02, 0x03]
        );
        assert_eq!(resp.status(), StatusWord::new(0x90, 0x00));
        assert!(resp.is_success());

        let data = Bytes::from_static(&[0x6A, 0x83]);
        let resp = Response::from_bytes(&data).unwrap();
        assert!(resp.payload().is_none());
        assert!(!resp.is_success());
    }

    #[test]
    fn test_response_too_short() {
        for raw in [&[][..], &[0x90][..]] {
            match Response::from_bytes(&Bytes::copy_from_slice(raw)) {
                Err(Error::MalformedResponse(len)) => assert_eq!(len, raw.len()),
                other => panic!("expected MalformedResponse, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_status_word_round_trip() {
        // Any fixture-built response recovers the status word it was built with
        for (sw1, sw2) in [(0x90, 0x00), (0x6A, 0x82), (0x6A, 0x83), (0x69, 0x85)] {
            let fixture = Response::new(Some(Bytes::from_static(&[0xDE, 0xAD])), (sw1, sw2));
            let raw: Bytes = fixture.into();
            let parsed = Response::from_bytes(&raw).unwrap();
            assert_eq!(parsed.status_tuple(), (sw1, sw2));
        }
    }
}
