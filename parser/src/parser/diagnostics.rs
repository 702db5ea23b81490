//! Diagnostics for one parse run.

use serde::{Deserialize, Serialize};
use smart_selftest_core::ReportFormat;

use super::progress::ProgressSource;

/// A table row that produced no entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRow {
    /// 0-based line index in the normalized text.
    pub line: usize,
    pub text: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseDiagnostics {
    /// Format whose header was found, even if no rows followed.
    pub detected_format: Option<ReportFormat>,
    /// Non-blank lines under the detected header.
    pub table_rows: usize,
    pub parsed_rows: usize,
    pub skipped_rows: Vec<SkippedRow>,
    /// Which live-status phrasing produced the current progress, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress_source: Option<ProgressSource>,
}

impl ParseDiagnostics {
    /// Share of table rows that became entries; `1.0` for an empty table.
    pub fn coverage(&self) -> f64 {
        if self.table_rows == 0 {
            return 1.0;
        }
        self.parsed_rows as f64 / self.table_rows as f64
    }

    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        match self.detected_format {
            None => warnings.push("No known self-test log header found".to_string()),
            Some(format) if self.table_rows > 0 && self.parsed_rows == 0 => warnings.push(format!(
                "Detected {format} self-test log but none of its {} rows parsed",
                self.table_rows
            )),
            Some(_) => {}
        }

        if !self.skipped_rows.is_empty() {
            warnings.push(format!(
                "Skipped {} malformed row(s): {}",
                self.skipped_rows.len(),
                self.skipped_rows
                    .iter()
                    .map(|row| format!("line {} ({})", row.line + 1, row.reason))
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        }

        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_run_has_no_warnings() {
        let diagnostics = ParseDiagnostics {
            detected_format: Some(ReportFormat::Ata),
            table_rows: 2,
            parsed_rows: 2,
            ..Default::default()
        };
        assert!(diagnostics.warnings().is_empty());
        assert_eq!(diagnostics.coverage(), 1.0);
    }

    #[test]
    fn test_warnings_for_skipped_rows() {
        let diagnostics = ParseDiagnostics {
            detected_format: Some(ReportFormat::Scsi),
            table_rows: 2,
            parsed_rows: 0,
            skipped_rows: vec![SkippedRow {
                line: 4,
                text: "# 1 garbage".into(),
                reason: "line does not match the row pattern".into(),
            }],
            progress_source: None,
        };
        let warnings = diagnostics.warnings();
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("scsi"));
        assert!(warnings[1].contains("line 5"));
        assert_eq!(diagnostics.coverage(), 0.0);
    }

    #[test]
    fn test_missing_header_warning() {
        let warnings = ParseDiagnostics::default().warnings();
        assert_eq!(warnings, vec!["No known self-test log header found".to_string()]);
    }
}
