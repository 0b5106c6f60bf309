//! Bill numbers
//!
//! A bill number is the human-facing identifier printed on every bill, in the
//! form `<prefix>/<seq>` where `seq` is zero-padded to four digits. Numbers
//! are issued densely within a prefix; after `9999` the prefix advances and
//! the sequence restarts at `0001`.
//!
//! The prefix and sequence are kept as integers. The text form is derived for
//! display and parsed only at the edges.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Highest sequence number within a prefix
pub const MAX_SEQ: u16 = 9999;

/// Errors produced when building or parsing a bill number
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BillNumberError {
    /// Text did not match `<prefix>/<seq>`
    #[error("Malformed bill number: '{0}'")]
    Malformed(String),

    /// Prefix is zero or does not fit
    #[error("Bill number prefix out of range: {0}")]
    PrefixOutOfRange(i64),

    /// Sequence is outside 1..=9999
    #[error("Bill number sequence out of range: {0}")]
    SeqOutOfRange(i64),

    /// No prefix is left to roll over into
    #[error("Bill number space exhausted after {0}")]
    Exhausted(BillNumber),
}

/// A `<prefix>/<seq>` bill number
///
/// Ordering is lexicographic on `(prefix, seq)`, which is also issue order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BillNumber {
    prefix: u32,
    seq: u16,
}

impl BillNumber {
    /// The number issued when no bill exists yet
    pub const FIRST: BillNumber = BillNumber { prefix: 1, seq: 1 };

    /// Creates a bill number, checking both parts
    pub fn new(prefix: u32, seq: u16) -> Result<Self, BillNumberError> {
        if prefix == 0 {
            return Err(BillNumberError::PrefixOutOfRange(0));
        }
        if seq == 0 || seq > MAX_SEQ {
            return Err(BillNumberError::SeqOutOfRange(i64::from(seq)));
        }
        Ok(Self { prefix, seq })
    }

    /// Rebuilds a bill number from stored integer columns
    pub fn from_parts(prefix: i64, seq: i64) -> Result<Self, BillNumberError> {
        let prefix = u32::try_from(prefix).map_err(|_| BillNumberError::PrefixOutOfRange(prefix))?;
        let seq = u16::try_from(seq).map_err(|_| BillNumberError::SeqOutOfRange(seq))?;
        Self::new(prefix, seq)
    }

    pub fn prefix(&self) -> u32 {
        self.prefix
    }

    pub fn seq(&self) -> u16 {
        self.seq
    }

    /// Returns the number issued directly after this one
    ///
    /// # Errors
    ///
    /// `Exhausted` when the prefix cannot advance any further
    pub fn next(&self) -> Result<Self, BillNumberError> {
        if self.seq < MAX_SEQ {
            return Ok(Self { prefix: self.prefix, seq: self.seq + 1 });
        }

        let prefix = self
            .prefix
            .checked_add(1)
            .ok_or(BillNumberError::Exhausted(*self))?;
        Ok(Self { prefix, seq: 1 })
    }

    /// Returns the number to issue given the most recently issued one
    pub fn following(last: Option<&BillNumber>) -> Result<Self, BillNumberError> {
        match last {
            Some(last) => last.next(),
            None => Ok(Self::FIRST),
        }
    }
}

impl fmt::Display for BillNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{:04}", self.prefix, self.seq)
    }
}

impl FromStr for BillNumber {
    type Err = BillNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || BillNumberError::Malformed(s.to_string());

        let (prefix, seq) = s.split_once('/').ok_or_else(malformed)?;
        if prefix.is_empty()
            || !prefix.bytes().all(|b| b.is_ascii_digit())
            || seq.len() != 4
            || !seq.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(malformed());
        }

        let prefix: u32 = prefix.parse().map_err(|_| malformed())?;
        let seq: u16 = seq.parse().map_err(|_| malformed())?;
        Self::new(prefix, seq)
    }
}

impl TryFrom<String> for BillNumber {
    type Error = BillNumberError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BillNumber> for String {
    fn from(number: BillNumber) -> String {
        number.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_pads_sequence() {
        assert_eq!(BillNumber::new(1, 1).unwrap().to_string(), "1/0001");
        assert_eq!(BillNumber::new(12, 345).unwrap().to_string(), "12/0345");
        assert_eq!(BillNumber::new(3, 9999).unwrap().to_string(), "3/9999");
    }

    #[test]
    fn test_next_within_prefix() {
        let number = BillNumber::new(2, 41).unwrap();
        assert_eq!(number.next().unwrap(), BillNumber::new(2, 42).unwrap());
    }

    #[test]
    fn test_next_rolls_prefix() {
        let number = BillNumber::new(3, 9999).unwrap();
        assert_eq!(number.next().unwrap().to_string(), "4/0001");
    }

    #[test]
    fn test_next_exhausted() {
        let number = BillNumber::new(u32::MAX, MAX_SEQ).unwrap();
        assert_eq!(number.next(), Err(BillNumberError::Exhausted(number)));
    }

    #[test]
    fn test_following_empty_store() {
        assert_eq!(BillNumber::following(None).unwrap(), BillNumber::FIRST);
    }

    #[test]
    fn test_parse() {
        let number: BillNumber = "7/0120".parse().unwrap();
        assert_eq!(number.prefix(), 7);
        assert_eq!(number.seq(), 120);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for text in ["", "1", "1/", "/0001", "1/001", "1/00001", "a/0001", "1/00a1", "1/0001/2", "-1/0001"] {
            assert!(text.parse::<BillNumber>().is_err(), "accepted {:?}", text);
        }
    }

    #[test]
    fn test_parse_rejects_zero_parts() {
        assert_eq!("0/0001".parse::<BillNumber>(), Err(BillNumberError::PrefixOutOfRange(0)));
        assert_eq!("1/0000".parse::<BillNumber>(), Err(BillNumberError::SeqOutOfRange(0)));
    }

    #[test]
    fn test_from_parts_range() {
        assert!(BillNumber::from_parts(1, 9999).is_ok());
        assert!(BillNumber::from_parts(-1, 1).is_err());
        assert!(BillNumber::from_parts(1, 10_000).is_err());
        assert!(BillNumber::from_parts(i64::from(u32::MAX) + 1, 1).is_err());
    }
}
