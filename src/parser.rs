//! Parser for the `_stats` payload
//!
//! The endpoint answers with a single line of seven comma separated numbers:
//!
//! ```text
//! load_average,total_memory,used_memory,total_disk,used_disk,network_bandwidth,network_usage
//! ```
//!
//! Parsing is all or nothing: a payload with a wrong field count or a single
//! malformed field produces an error and no partial [`ServerStats`].

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::ServerStats;

/// Number of fields in a valid payload
pub const FIELD_COUNT: usize = 7;

/// Positional fields of the payload, in wire order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatField {
    LoadAverage,
    TotalMemory,
    UsedMemory,
    TotalDisk,
    UsedDisk,
    NetworkBandwidth,
    NetworkUsage,
}

impl fmt::Display for StatField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StatField::LoadAverage => "load average",
            StatField::TotalMemory => "total memory",
            StatField::UsedMemory => "used memory",
            StatField::TotalDisk => "total disk",
            StatField::UsedDisk => "used disk",
            StatField::NetworkBandwidth => "network bandwidth",
            StatField::NetworkUsage => "network usage",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while parsing a stats payload
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The payload did not contain exactly [`FIELD_COUNT`] values
    #[error("invalid data format: expected {expected} values, got {actual}")]
    Format { expected: usize, actual: usize },

    /// A single field could not be parsed as its numeric type
    #[error("invalid {field}: {value:?} ({reason})")]
    Field {
        field: StatField,
        value: String,
        reason: String,
    },
}

impl ParseError {
    /// The field that failed to parse, if the error is field specific
    pub fn field(&self) -> Option<StatField> {
        match self {
            ParseError::Field { field, .. } => Some(*field),
            ParseError::Format { .. } => None,
        }
    }
}

/// Parse a raw payload into [`ServerStats`].
pub fn parse(raw: &str) -> Result<ServerStats, ParseError> {
    let parts: Vec<&str> = raw.trim().split(',').collect();
    if parts.len() != FIELD_COUNT {
        return Err(ParseError::Format {
            expected: FIELD_COUNT,
            actual: parts.len(),
        });
    }

    Ok(ServerStats {
        load_average: parse_float(parts[0], StatField::LoadAverage)?,
        total_memory: parse_unsigned(parts[1], StatField::TotalMemory)?,
        used_memory: parse_unsigned(parts[2], StatField::UsedMemory)?,
        total_disk: parse_unsigned(parts[3], StatField::TotalDisk)?,
        used_disk: parse_unsigned(parts[4], StatField::UsedDisk)?,
        network_bandwidth: parse_unsigned(parts[5], StatField::NetworkBandwidth)?,
        network_usage: parse_unsigned(parts[6], StatField::NetworkUsage)?,
    })
}

/// Unsigned base-10 integer without any sign
fn parse_unsigned(value: &str, field: StatField) -> Result<u64, ParseError> {
    if value.starts_with('+') {
        return Err(field_error(value, field, "unexpected sign"));
    }
    value
        .parse()
        .map_err(|e: std::num::ParseIntError| field_error(value, field, e))
}

/// Finite real number; literals outside the `f64` range are rejected rather
/// than rounded to infinity
fn parse_float(value: &str, field: StatField) -> Result<f64, ParseError> {
    let parsed: f64 = value
        .parse()
        .map_err(|e: std::num::ParseFloatError| field_error(value, field, e))?;

    if !parsed.is_finite() {
        return Err(field_error(value, field, "value out of range"));
    }
    Ok(parsed)
}

fn field_error(value: &str, field: StatField, reason: impl fmt::Display) -> ParseError {
    ParseError::Field {
        field,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

impl FromStr for ServerStats {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}
