//! Column token helpers shared by every table format.
//!
//! All placeholder handling lives here: a lone `-` in any column maps to
//! `None`, never to zero.

use std::fmt;

/// Token the utility prints for an empty column.
pub const PLACEHOLDER: &str = "-";

/// A column whose raw text could not be interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnError {
    pub column: &'static str,
    pub raw: String,
}

impl fmt::Display for ColumnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {} column: '{}'", self.column, self.raw)
    }
}

impl ColumnError {
    fn new(column: &'static str, raw: &str) -> Self {
        Self {
            column,
            raw: raw.to_string(),
        }
    }
}

/// Returns `true` when `raw` is the placeholder dash.
pub fn is_placeholder(raw: &str) -> bool {
    raw.trim() == PLACEHOLDER
}

/// Maps the placeholder to `None`, otherwise applies `convert`.
///
/// A `None` from `convert` is a malformed column.
pub fn parse_optional_token<T>(
    column: &'static str,
    raw: &str,
    convert: impl FnOnce(&str) -> Option<T>,
) -> Result<Option<T>, ColumnError> {
    let trimmed = raw.trim();
    if is_placeholder(trimmed) {
        return Ok(None);
    }
    convert(trimmed)
        .map(Some)
        .ok_or_else(|| ColumnError::new(column, trimmed))
}

/// Parses a base-10 integer column that may hold the placeholder.
pub fn parse_optional_u64(column: &'static str, raw: &str) -> Result<Option<u64>, ColumnError> {
    parse_optional_token(column, raw, |token| token.parse::<u64>().ok())
}

/// Parses a base-10 integer column that must hold a value.
pub fn parse_u64(column: &'static str, raw: &str) -> Result<u64, ColumnError> {
    parse_optional_u64(column, raw)?.ok_or_else(|| ColumnError::new(column, raw.trim()))
}

/// Keeps a `0x` hex token verbatim; never converts it to a number.
pub fn parse_optional_hex_token(
    column: &'static str,
    raw: &str,
) -> Result<Option<String>, ColumnError> {
    parse_optional_token(column, raw, |token| {
        let digits = token.strip_prefix("0x").or_else(|| token.strip_prefix("0X"))?;
        (!digits.is_empty() && digits.chars().all(|ch| ch.is_ascii_hexdigit()))
            .then(|| token.to_string())
    })
}

/// Converts a percentage token into a fraction (`"80%"` → `0.8`).
///
/// Values above 100% are rejected.
pub fn parse_percent_fraction(column: &'static str, raw: &str) -> Result<f64, ColumnError> {
    let trimmed = raw.trim();
    trimmed
        .strip_suffix('%')
        .and_then(|digits| digits.trim().parse::<u32>().ok())
        .filter(|percent| *percent <= 100)
        .map(|percent| f64::from(percent) / 100.0)
        .ok_or_else(|| ColumnError::new(column, trimmed))
}
