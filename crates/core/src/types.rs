//! Domain types used when addressing card applications and records

use std::fmt;

use crate::Error;

/// Application identifier (AID) per ISO/IEC 7816-5
///
/// An opaque byte sequence of 5 to 16 bytes naming a card application.
/// Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Aid(Vec<u8>);

impl Aid {
    /// Minimum AID length in bytes
    pub const MIN_LENGTH: usize = 5;
    /// Maximum AID length in bytes
    pub const MAX_LENGTH: usize = 16;

    /// Create an AID from raw bytes, validating the length
    pub fn new(bytes: &[u8]) -> Result<Self, Error> {
        if !(Self::MIN_LENGTH..=Self::MAX_LENGTH).contains(&bytes.len()) {
            return Err(Error::InvalidAid(bytes.len()));
        }
        Ok(Self(bytes.to_vec()))
    }

    /// Length of the AID in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the AID is empty (never true for a validated AID)
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for Aid {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Aid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.0))
    }
}

/// Locator for one record within one elementary file
///
/// Addresses a record by short file identifier (SFI, 1..=31) and record
/// number (1..=16). Used only while enumerating; not persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordLocator {
    sfi: u8,
    record: u8,
}

impl RecordLocator {
    /// Highest short file identifier addressable in P2
    pub const MAX_SFI: u8 = 31;
    /// Highest record number probed per file
    pub const MAX_RECORD: u8 = 16;

    /// Create a locator, checking both ranges
    pub const fn new(sfi: u8, record: u8) -> Option<Self> {
        if sfi >= 1 && sfi <= Self::MAX_SFI && record >= 1 && record <= Self::MAX_RECORD {
            Some(Self { sfi, record })
        } else {
            None
        }
    }

    /// Short file identifier, 1..=31
    pub const fn sfi(&self) -> u8 {
        self.sfi
    }

    /// Record number within the file, 1..=16
    pub const fn record(&self) -> u8 {
        self.record
    }

    /// P2 encoding for READ RECORD: SFI in bits 7-3, "record number in P1"
    /// referencing mode in bits 2-0
    pub const fn p2(&self) -> u8 {
        (self.sfi << 3) | 0x04
    }

    /// Iterate every probe-able locator in row-major order: SFI ascending,
    /// record number ascending within each SFI (496 locators total)
    pub fn all() -> impl Iterator<Item = Self> {
        (1..=Self::MAX_SFI).flat_map(|sfi| (1..=Self::MAX_RECORD).map(move |record| Self { sfi, record }))
    }
}

impl fmt::Display for RecordLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SFI {} record {}", self.sfi, self.record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aid_length_validation() {
        assert!(Aid::new(&[0xA0; 4]).is_err());
        assert!(Aid::new(&[0xA0; 5]).is_ok());
        assert!(Aid::new(&[0xA0; 16]).is_ok());
        assert!(Aid::new(&[0xA0; 17]).is_err());

        match Aid::new(&[0xA0, 0x00]) {
            Err(Error::InvalidAid(2)) => {}
            other => panic!("expected InvalidAid(2), got {:?}", other),
        }
    }

    #[test]
    fn test_aid_display_is_lowercase_hex() {
        let aid = Aid::new(&[0xA0, 0x00, 0x00, 0x00, 0x03, 0x10, 0x10]).unwrap();
        assert_eq!(aid.to_string(), "a0000000031010");
    }

    #[test]
    fn test_locator_bounds() {
        assert!(RecordLocator::new(0, 1).is_none());
        assert!(RecordLocator::new(1, 0).is_none());
        assert!(RecordLocator::new(32, 1).is_none());
        assert!(RecordLocator::new(1, 17).is_none());
        assert!(RecordLocator::new(31, 16).is_some());
    }

    #[test]
    fn test_locator_p2_encoding() {
        let locator = RecordLocator::new(1, 1).unwrap();
        assert_eq!(locator.p2(), 0x0C);

        let locator = RecordLocator::new(3, 2).unwrap();
        assert_eq!(locator.p2(), (3 << 3) | 0x04);

        let locator = RecordLocator::new(31, 16).unwrap();
        assert_eq!(locator.p2(), 0xFC);
    }

    #[test]
    fn test_locator_iteration_order() {
        let all: Vec<_> = RecordLocator::all().collect();
        assert_eq!(all.len(), 496);

        // Row-major: SFI outer, record inner
        assert_eq!(all[0], RecordLocator::new(1, 1).unwrap());
        assert_eq!(all[15], RecordLocator::new(1, 16).unwrap());
        assert_eq!(all[16], RecordLocator::new(2, 1).unwrap());
        assert_eq!(all[495], RecordLocator::new(31, 16).unwrap());

        // (sfi=3, record=2) is the 34th locator
        assert_eq!(all[33], RecordLocator::new(3, 2).unwrap());
    }
}
