//! Row patterns and field extraction, one module per table format.
//!
//! Dispatch is a plain `match` on [`ReportFormat`]; each format module owns
//! its row regex and turns the captured columns into an entry.

pub mod ata;
pub mod nvme;
pub mod scsi;

use std::fmt;

use regex::Captures;
use smart_selftest_core::{ReportFormat, SelfTestLogEntry};

use super::util::ColumnError;

/// Why a table row produced no entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    /// The line does not have the shape of a row in this format.
    NoMatch,
    /// The shape matched but a column could not be interpreted.
    Column(ColumnError),
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoMatch => f.write_str("line does not match the row pattern"),
            Self::Column(err) => err.fmt(f),
        }
    }
}

impl From<ColumnError> for RowError {
    fn from(err: ColumnError) -> Self {
        Self::Column(err)
    }
}

/// Parses one table row in the given format.
pub fn parse_row(format: ReportFormat, line: &str) -> Result<SelfTestLogEntry, RowError> {
    match format {
        ReportFormat::Ata => ata::parse_row(line).map(SelfTestLogEntry::Ata),
        ReportFormat::Nvme => nvme::parse_row(line).map(SelfTestLogEntry::Nvme),
        ReportFormat::Scsi => scsi::parse_row(line).map(SelfTestLogEntry::Scsi),
    }
}

/// Returns a named capture, trimmed. Callers only ask for groups their
/// pattern always captures.
fn field<'t>(caps: &Captures<'t>, name: &str) -> &'t str {
    caps.name(name).map_or("", |m| m.as_str().trim())
}

fn parse_num(caps: &Captures<'_>) -> Result<u32, ColumnError> {
    let raw = field(caps, "num");
    raw.parse::<u32>().map_err(|_| ColumnError {
        column: "num",
        raw: raw.to_string(),
    })
}
