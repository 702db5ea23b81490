//! Self-test report parser for ATA, NVMe, and SCSI layouts.
//!
//! This module turns the captured text of a disk self-test utility into
//! typed records:
//!
//! - **ATA**: `# 1  Short offline  Completed without error  00%  16590  -`
//! - **NVMe**: ` 0   Short  Completed without error  18636  -  -  -  0x0 0x00`
//! - **SCSI**: `# 1  Background short  Completed  -  3943  - [-   -    -]`
//!
//! # Architecture
//!
//! Text is normalized first (escape codes, line endings). [`detect`] then
//! picks exactly one table format by its header, in a fixed priority order,
//! and [`formats`] parses each body row with that format's pattern. Rows
//! that do not fit are recorded in [`ParseDiagnostics`] and skipped; the
//! parser never fails.
//!
//! Live progress ("percent completed" of a running test) is extracted
//! independently by [`progress`].
//!
//! The primary entry point is [`SelfTestLogParser::new`] followed by
//! [`SelfTestLogParser::parse`], but most consumers should use the
//! higher-level [`parse_selftest_log`](crate::parse_selftest_log) function.

mod classify;
pub mod detect;
mod diagnostics;
pub mod formats;
mod normalize;
pub mod progress;
mod util;

use smart_selftest_core::{ReportFormat, SelfTestLogEntry};
use tracing::{debug, trace, warn};

pub use classify::classify_status;
pub use diagnostics::{ParseDiagnostics, SkippedRow};
pub use normalize::normalize_report_output;
pub use util::ColumnError;

/// Parser for the historical self-test log table of one report.
///
/// # Examples
///
/// ```
/// use smart_selftest_core::ReportFormat;
/// use smart_selftest_parser::parser::SelfTestLogParser;
///
/// let text = "\
/// Num  Test_Description    Status                  Remaining  LifeTime(hours)  LBA_of_first_error
/// ## 1  Short offline       Completed without error       00%     16590         -
/// ";
///
/// let mut parser = SelfTestLogParser::new(text);
/// let entries = parser.parse();
/// assert_eq!(entries.len(), 1);
/// assert_eq!(parser.detected_format(), Some(ReportFormat::Ata));
/// ```
#[derive(Debug, Clone)]
pub struct SelfTestLogParser {
    normalized: String,
    formats: Vec<ReportFormat>,
    diagnostics: ParseDiagnostics,
}

impl SelfTestLogParser {
    /// Creates a parser over `text` with every format enabled.
    pub fn new(text: &str) -> Self {
        Self {
            normalized: normalize_report_output(text),
            formats: ReportFormat::PRIORITY.to_vec(),
            diagnostics: ParseDiagnostics::default(),
        }
    }

    /// Restricts detection to `formats`. Priority order stays fixed.
    pub fn with_formats(mut self, formats: &[ReportFormat]) -> Self {
        self.formats = formats.to_vec();
        self
    }

    /// Extracts every row of the detected table, in document order.
    ///
    /// Unrecognized text yields an empty vector. Calling `parse` again
    /// yields the same entries and resets the diagnostics.
    pub fn parse(&mut self) -> Vec<SelfTestLogEntry> {
        self.diagnostics = ParseDiagnostics::default();
        let lines: Vec<&str> = self.normalized.lines().collect();

        let Some(header) = detect::detect_table(&lines, &self.formats) else {
            debug!("no self-test log header detected");
            return Vec::new();
        };
        self.diagnostics.detected_format = Some(header.format);
        debug!(format = %header.format, body_start = ?header.body_start, "detected self-test log");

        let Some(body_start) = header.body_start else {
            return Vec::new();
        };

        let mut entries = Vec::new();
        for (index, line) in normalize::table_body(&lines, body_start) {
            self.diagnostics.table_rows += 1;
            match formats::parse_row(header.format, line) {
                Ok(entry) => {
                    trace!(line = index, num = entry.num(), status = %entry.status(), "parsed row");
                    entries.push(entry);
                }
                Err(err) => {
                    debug!(line = index, text = line, reason = %err, "skipping self-test row");
                    self.diagnostics.skipped_rows.push(SkippedRow {
                        line: index,
                        text: line.trim().to_string(),
                        reason: err.to_string(),
                    });
                }
            }
        }
        self.diagnostics.parsed_rows = entries.len();

        if entries.is_empty() && self.diagnostics.table_rows > 0 {
            warn!(
                format = %header.format,
                rows = self.diagnostics.table_rows,
                "self-test log header found but no rows parsed"
            );
        }

        entries
    }

    /// Format of the most recent [`parse`](Self::parse), if any.
    pub fn detected_format(&self) -> Option<ReportFormat> {
        self.diagnostics.detected_format
    }

    pub fn diagnostics(&self) -> &ParseDiagnostics {
        &self.diagnostics
    }

    pub fn warnings(&self) -> Vec<String> {
        self.diagnostics.warnings()
    }
}
