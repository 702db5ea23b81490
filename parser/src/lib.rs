//! Offline parsing of disk self-test reports.
//!
//! This crate extracts structured self-test data from the captured text
//! output of a disk self-test utility (smartctl). It understands the ATA,
//! NVMe, and SCSI report layouts and never runs the utility itself.
//!
//! # Main entry points
//!
//! - [`parse_selftest_log`]: historical self-test log entries, in document
//!   order.
//! - [`parse_current_selftest`]: completion percentage of the self-test
//!   currently running, if the report shows one.
//! - [`parse_report`]: both of the above plus parse diagnostics.
//!
//! None of these fail: text in an unknown layout yields an empty log and no
//! progress.
//!
//! # Example
//!
//! ```
//! use smart_selftest_core::TestStatus;
//! use smart_selftest_parser::{parse_current_selftest, parse_selftest_log};
//!
//! let report = "\
//! Self-test execution status:        41% of test remaining
//! SMART Self-test log structure revision number 1
//! Num  Test_Description    Status                  Remaining  LifeTime(hours)  LBA_of_first_error
//! ## 1  Short offline       Completed without error       00%     16590         -
//! ";
//!
//! let entries = parse_selftest_log(report);
//! assert_eq!(entries.len(), 1);
//! assert_eq!(entries[0].status(), TestStatus::Success);
//!
//! let current = parse_current_selftest(report).unwrap();
//! assert_eq!(current.progress, 59);
//! ```

pub mod config;
pub mod error;
pub mod output;
pub mod parser;
pub mod report;

use smart_selftest_core::{CurrentSelfTestProgress, SelfTestLogEntry};

use config::ParseConfig;
use parser::SelfTestLogParser;
use parser::progress::detect_current_selftest;
use report::SelfTestReport;

/// Extracts every historical self-test entry from a report.
///
/// Exactly one table format is used per call. Rows that do not fit the
/// detected format are skipped.
///
/// # Examples
///
/// ```
/// use smart_selftest_parser::parse_selftest_log;
///
/// let text = "\
/// Self-test Log (NVMe Log 0x06)
/// Num  Test_Description  Status                       Power_on_Hours  Failing_LBA  NSID Seg SCT Code
///  0   Short             Completed without error               18636            -     -   - 0x0 0x00
/// ";
///
/// let entries = parse_selftest_log(text);
/// assert_eq!(entries[0].num(), 0);
/// assert_eq!(entries[0].failing_lba(), None);
/// ```
pub fn parse_selftest_log(text: &str) -> Vec<SelfTestLogEntry> {
    SelfTestLogParser::new(text).parse()
}

/// Extracts the progress of the self-test currently running.
///
/// `None` means no known live-status phrasing reported a running test.
///
/// # Examples
///
/// ```
/// use smart_selftest_parser::parse_current_selftest;
///
/// let text = "Self-test status: Short self-test in progress (3% completed)\n";
/// assert_eq!(parse_current_selftest(text).unwrap().progress, 3);
/// assert!(parse_current_selftest("Self-test status: No self-test in progress\n").is_none());
/// ```
pub fn parse_current_selftest(text: &str) -> Option<CurrentSelfTestProgress> {
    parser::progress::parse_current_selftest(text)
}

/// Runs both parsers with every format enabled and collects diagnostics.
pub fn parse_report(text: &str) -> SelfTestReport {
    parse_report_with_config(text, &ParseConfig::default())
}

/// Runs both parsers with `config` applied.
///
/// # Examples
///
/// ```
/// use smart_selftest_core::ReportFormat;
/// use smart_selftest_parser::{config::ParseConfig, parse_report_with_config};
///
/// let text = "\
/// Num  Test_Description    Status                  Remaining  LifeTime(hours)  LBA_of_first_error
/// ## 1  Short offline       Completed without error       00%     16590         -
/// ";
///
/// let report = parse_report_with_config(text, &ParseConfig::default());
/// assert_eq!(report.format, Some(ReportFormat::Ata));
/// assert!(report.current.is_none());
///
/// let scsi_only = ParseConfig { formats: vec![ReportFormat::Scsi] };
/// assert!(parse_report_with_config(text, &scsi_only).entries.is_empty());
/// ```
pub fn parse_report_with_config(text: &str, config: &ParseConfig) -> SelfTestReport {
    let mut parser = SelfTestLogParser::new(text).with_formats(&config.formats);
    let entries = parser.parse();
    let mut diagnostics = parser.diagnostics().clone();

    let current = detect_current_selftest(text).map(|(progress, source)| {
        diagnostics.progress_source = Some(source);
        progress
    });

    SelfTestReport {
        format: diagnostics.detected_format,
        entries,
        current,
        diagnostics: Some(diagnostics),
    }
}
