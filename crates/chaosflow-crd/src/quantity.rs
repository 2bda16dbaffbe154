//! Human-readable size quantities
//!
//! Stressor sizes are either a percentage of total available memory
//! (`"50%"`) or an absolute size with an optional unit (`"256MiB"`,
//! `"1.5GB"`, `"4096"`). Decimal units are powers of 1000, binary (`i`)
//! units powers of 1024.

use crate::{CrdError, Result};
use byte_unit::Byte;
use std::fmt;
use std::str::FromStr;

/// A parsed size quantity
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Quantity {
    /// Percentage of total available memory, kept verbatim (e.g. "50%")
    Percent(String),
    /// Absolute number of bytes
    Bytes(u64),
}

impl Quantity {
    pub fn is_percent(&self) -> bool {
        matches!(self, Quantity::Percent(_))
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Percent(raw) => f.write_str(raw),
            Quantity::Bytes(bytes) => write!(f, "{}", bytes),
        }
    }
}

impl FromStr for Quantity {
    type Err = CrdError;

    fn from_str(s: &str) -> Result<Self> {
        parse_quantity(s)
    }
}

/// Parse a size quantity
///
/// A trailing `%` returns the input unchanged; the percentage is left for
/// the stress tool to interpret.
pub fn parse_quantity(s: &str) -> Result<Quantity> {
    if s.ends_with('%') {
        return Ok(Quantity::Percent(s.to_string()));
    }
    parse_bytes(s).map(Quantity::Bytes)
}

/// Parse an absolute size into a byte count
///
/// Units are case-insensitive and a bare number is bytes. Sizes that do not
/// fit in a `u64` are rejected.
pub fn parse_bytes(s: &str) -> Result<u64> {
    let malformed = || CrdError::MalformedQuantity(s.to_string());

    let byte = Byte::parse_str(s.trim(), true).map_err(|_| malformed())?;
    u64::try_from(byte.as_u128()).map_err(|_| malformed())
}
