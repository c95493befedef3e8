//! APDU command definitions
//!
//! This module provides the [`Command`] type for building command APDUs
//! according to ISO/IEC 7816-4, including the SELECT and READ RECORD
//! commands used for record discovery.

use bytes::{BufMut, Bytes, BytesMut};

use crate::types::{Aid, RecordLocator};

/// Expected length (Le) type for short APDU commands
pub type ExpectedLength = u8;

/// Instruction byte for SELECT
pub const INS_SELECT: u8 = 0xA4;
/// Instruction byte for READ RECORD
pub const INS_READ_RECORD: u8 = 0xB2;

/// Generic APDU command structure
///
/// Serialization picks the correct one of the four short-APDU cases from
/// whether `data` and `le` are present. `le: None` means "unspecified":
/// no Le byte is emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Command class byte
    pub cla: u8,
    /// Instruction byte
    pub ins: u8,
    /// Parameter 1
    pub p1: u8,
    /// Parameter 2
    pub p2: u8,
    /// Command data (optional)
    pub data: Option<Bytes>,
    /// Expected length (optional); `Some(0)` asks the card for up to 256 bytes
    pub le: Option<ExpectedLength>,
}

impl Command {
    /// Create a new command with just the header bytes (case 1)
    pub const fn new(cla: u8, ins: u8, p1: u8, p2: u8) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            data: None,
            le: None,
        }
    }

    /// Create a new command with expected response length (case 2)
    pub const fn new_with_le(cla: u8, ins: u8, p1: u8, p2: u8, le: ExpectedLength) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            data: None,
            le: Some(le),
        }
    }

    /// Create a new command with data payload (case 3)
    pub fn new_with_data<T: Into<Bytes>>(cla: u8, ins: u8, p1: u8, p2: u8, data: T) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            data: Some(data.into()),
            le: None,
        }
    }

    /// SELECT by name (DF name / AID), as used to select a card application
    ///
    /// Header is `00 A4 04 00`; the AID travels as the command data and no
    /// Le byte is sent, letting the card return its full FCI.
    pub fn select_by_name(aid: &Aid) -> Self {
        Self::new_with_data(0x00, INS_SELECT, 0x04, 0x00, Bytes::copy_from_slice(aid.as_ref()))
    }

    /// READ RECORD for one record addressed by SFI and record number
    ///
    /// P1 carries the record number, P2 carries the SFI shifted into bits
    /// 7-3 with referencing mode "record number in P1". Le of zero lets the
    /// card report its own record length.
    pub const fn read_record(locator: RecordLocator) -> Self {
        Self::new_with_le(0x00, INS_READ_RECORD, locator.record(), locator.p2(), 0)
    }

    /// Set the expected length field
    pub const fn with_le(mut self, le: ExpectedLength) -> Self {
        self.le = Some(le);
        self
    }

    /// Serialize to raw APDU bytes
    pub fn to_bytes(&self) -> Bytes {
        let mut buffer = BytesMut::with_capacity(self.command_length());

        // Header: CLA, INS, P1, P2
        buffer.put_u8(self.cla);
        buffer.put_u8(self.ins);
        buffer.put_u8(self.p1);
        buffer.put_u8(self.p2);

        // Lc and data if present
        if let Some(data) = &self.data {
            buffer.put_u8(data.len() as u8);
            buffer.put_slice(data);
        }

        // Le if present
        if let Some(le) = self.le {
            buffer.put_u8(le);
        }

        buffer.freeze()
    }

    /// Exact length of the serialized command
    pub fn command_length(&self) -> usize {
        // Header (CLA, INS, P1, P2) is always 4 bytes
        let mut length = 4;

        if let Some(data) = &self.data {
            length += 1 + data.len();
        }

        if self.le.is_some() {
            length += 1;
        }

        length
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_serialization() {
        let aid = Aid::new(&[0xA0, 0x00, 0x00, 0x00, 0x03, 0x10, 0x10]).unwrap();
        let bytes = Command::select_by_name(&aid).to_bytes();

        assert_eq!(&bytes[..4], &[0x00, 0xA4, 0x04, 0x00]);
        assert_eq!(bytes[4], 0x07); // Lc
        assert_eq!(&bytes[5..12], aid.as_ref());
        assert_eq!(bytes.len(), 12); // no Le byte
    }

    #[test]
    fn test_select_serialization_for_all_valid_aid_lengths() {
        for len in Aid::MIN_LENGTH..=Aid::MAX_LENGTH {
            let aid = Aid::new(&vec![0xA5; len]).unwrap();
            let bytes = Command::select_by_name(&aid).to_bytes();

            assert_eq!(&bytes[..4], &[0x00, 0xA4, 0x04, 0x00]);
            assert_eq!(bytes[4] as usize, len);
            assert_eq!(&bytes[5..], aid.as_ref());
        }
    }

    #[test]
    fn test_read_record_parameters() {
        for locator in RecordLocator::all() {
            let cmd = Command::read_record(locator);
            assert_eq!(cmd.cla, 0x00);
            assert_eq!(cmd.ins, 0xB2);
            assert_eq!(cmd.p1, locator.record());
            assert_eq!(cmd.p2, (locator.sfi() << 3) | 0x04);
            assert_eq!(cmd.le, Some(0));
        }
    }

    #[test]
    fn test_read_record_serialization() {
        let locator = RecordLocator::new(3, 2).unwrap();
        let bytes = Command::read_record(locator).to_bytes();

        // Case 2: header plus a single Le byte, no Lc
        assert_eq!(bytes.as_ref(), &[0x00, 0xB2, 0x02, 0x1C, 0x00]);
    }

    #[test]
    fn test_command_length() {
        let cmd1 = Command::new(0x00, 0xB0, 0x00, 0x00);
        assert_eq!(cmd1.command_length(), 4);

        let cmd2 = Command::new_with_le(0x00, 0xB0, 0x00, 0x00, 0xFF);
        assert_eq!(cmd2.command_length(), 5);

        let data = Bytes::from_static(&[0x01, 0x02, 0x03]);
        let cmd3 = Command::new_with_data(0x00, 0xD6, 0x00, 0x00, data.clone());
        assert_eq!(cmd3.command_length(), 8);

        let cmd4 = Command::new_with_data(0x00, 0xD6, 0x00, 0x00, data).with_le(0xFF);
        assert_eq!(cmd4.command_length(), 9);
    }

    #[test]
    fn test_serialized_length_matches_command_length() {
        let aid = Aid::new(&[0xA0, 0x00, 0x00, 0x00, 0x03]).unwrap();
        for cmd in [
            Command::new(0x00, 0xB0, 0x00, 0x00),
            Command::new_with_le(0x00, 0xB0, 0x00, 0x00, 0x10),
            Command::select_by_name(&aid),
            Command::read_record(RecordLocator::new(1, 1).unwrap()),
        ] {
            assert_eq!(cmd.to_bytes().len(), cmd.command_length());
        }
    }
}
