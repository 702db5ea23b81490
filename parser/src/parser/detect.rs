//! Self-test log table detection.
//!
//! Each [`ReportFormat`] has a header predicate; the first enabled format
//! (in [`ReportFormat::PRIORITY`] order) whose header is present wins.

use smart_selftest_core::ReportFormat;

const NVME_LOG_TITLE: &str = "Self-test Log (NVMe Log 0x06)";
const SCSI_LOG_TITLE: &str = "SMART Self-test log";

/// Location of a detected table within the normalized lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableHeader {
    pub format: ReportFormat,
    /// Index of the first line after the column header. `None` when the
    /// format's title is present but no column header follows (an empty
    /// log).
    pub body_start: Option<usize>,
}

/// Detects the self-test table among `formats`, trying them in priority order.
pub fn detect_table(lines: &[&str], formats: &[ReportFormat]) -> Option<TableHeader> {
    ReportFormat::PRIORITY
        .iter()
        .filter(|format| formats.contains(format))
        .find_map(|format| detect_format(lines, *format))
}

fn detect_format(lines: &[&str], format: ReportFormat) -> Option<TableHeader> {
    match format {
        ReportFormat::Ata => lines
            .iter()
            .position(|line| is_ata_column_header(line))
            .map(|index| TableHeader {
                format,
                body_start: Some(index + 1),
            }),
        ReportFormat::Nvme => {
            if let Some(index) = lines.iter().position(|line| is_nvme_column_header(line)) {
                return Some(TableHeader {
                    format,
                    body_start: Some(index + 1),
                });
            }
            lines
                .iter()
                .any(|line| line.contains(NVME_LOG_TITLE))
                .then_some(TableHeader {
                    format,
                    body_start: None,
                })
        }
        ReportFormat::Scsi => {
            let title = lines
                .iter()
                .position(|line| line.trim_start().starts_with(SCSI_LOG_TITLE))?;
            let header = lines
                .iter()
                .skip(title + 1)
                .position(|line| is_scsi_column_header(line))
                .map(|offset| title + 1 + offset)?;
            // The second header line ("Description  number  (hours)") is optional.
            let body_start = match lines.get(header + 1) {
                Some(next) if is_scsi_header_continuation(next) => header + 2,
                _ => header + 1,
            };
            Some(TableHeader {
                format,
                body_start: Some(body_start),
            })
        }
    }
}

fn is_ata_column_header(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("Num")
        && trimmed.contains("Test_Description")
        && trimmed.contains("LBA_of_first_error")
}

fn is_nvme_column_header(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("Num")
        && trimmed.contains("Power_on_Hours")
        && trimmed.contains("Failing_LBA")
}

fn is_scsi_column_header(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("Num") && trimmed.contains("LBA_first_err")
}

fn is_scsi_header_continuation(line: &str) -> bool {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    tokens.first() == Some(&"Description") && tokens.contains(&"(hours)")
}
