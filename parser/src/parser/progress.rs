//! Current self-test progress extraction.
//!
//! Recognizes the live-status phrasings the utility prints, in priority
//! order:
//!
//! 1. `Self-test execution status:  41% of test remaining` (ATA)
//! 2. `Self-test status: Short self-test in progress (3% completed)` (NVMe)
//! 3. `Self-test execution status:  ( 242)  Self-test routine in progress...`
//!    with a wrapped `20% of test remaining.` (status code)
//! 4. A SCSI self-test log whose newest row is in progress with lifetime `NOW`
//!
//! The first phrasing present decides the result. A phrasing that says no
//! test is running ends the search with `None`; a percentage outside
//! `0..=100` counts as no match.

use regex::Regex;
use serde::{Deserialize, Serialize};
use smart_selftest_core::{CurrentSelfTestProgress, ReportFormat};
use std::sync::LazyLock;
use tracing::debug;

use super::detect::{TableHeader, detect_table};
use super::formats::scsi;
use super::normalize::{join_continuation, normalize_report_output, table_body};

/// Status codes `0xF0..=0xFF` mean a routine is in progress; the low nibble
/// is the remaining percentage in tens.
const IN_PROGRESS_CODES: std::ops::RangeInclusive<u32> = 0xF0..=0xFF;

/// Which live-status phrasing a progress value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressSource {
    /// `N% of test remaining` on the execution status line.
    AtaRemaining,
    /// `(N% completed)` on the NVMe status line.
    NvmeCompleted,
    /// Parenthesized execution status code, possibly wrapped.
    StatusCode,
    /// In-progress row of a SCSI self-test log.
    ScsiLogTable,
}

/// Outcome of one phrasing matcher.
enum Phrasing {
    Running(CurrentSelfTestProgress),
    /// The phrasing is present and says nothing is running.
    Idle,
    NoMatch,
}

struct ProgressPatterns {
    ata_remaining: Regex,
    nvme_status: Regex,
    nvme_completed: Regex,
    status_code: Regex,
    remaining: Regex,
}

impl ProgressPatterns {
    fn new() -> Self {
        Self {
            ata_remaining: Regex::new(
                r"(?m)^\s*Self-test execution status:\s+(?P<remaining>\d+)% of test remaining",
            )
            .expect("static regex must compile"),
            nvme_status: Regex::new(r"(?m)^\s*Self-test status:\s*(?P<status>.*)$")
                .expect("static regex must compile"),
            nvme_completed: Regex::new(r"(?i)in progress\s*\(\s*(?P<completed>\d+)% completed\)")
                .expect("static regex must compile"),
            status_code: Regex::new(
                r"(?m)^\s*Self-test execution status:\s*\(\s*(?P<code>\d+)\)(?P<rest>.*)$",
            )
            .expect("static regex must compile"),
            remaining: Regex::new(r"(?P<remaining>\d+)% of test remaining")
                .expect("static regex must compile"),
        }
    }
}

static PATTERNS: LazyLock<ProgressPatterns> = LazyLock::new(ProgressPatterns::new);

/// Extracts the progress of the currently running self-test.
///
/// Returns `None` when no known phrasing reports a running test. `None`
/// means "no data", not proof that the device is idle.
///
/// # Examples
///
/// ```
/// use smart_selftest_parser::parser::progress::parse_current_selftest;
///
/// let text = "Self-test execution status:        41% of test remaining\n";
/// assert_eq!(parse_current_selftest(text).map(|p| p.progress), Some(59));
/// ```
pub fn parse_current_selftest(text: &str) -> Option<CurrentSelfTestProgress> {
    detect_current_selftest(text).map(|(progress, _)| progress)
}

/// Like [`parse_current_selftest`], also reporting which phrasing matched.
pub fn detect_current_selftest(text: &str) -> Option<(CurrentSelfTestProgress, ProgressSource)> {
    let normalized = normalize_report_output(text);
    let matchers: [(ProgressSource, fn(&str) -> Phrasing); 4] = [
        (ProgressSource::AtaRemaining, match_ata_remaining),
        (ProgressSource::NvmeCompleted, match_nvme_status),
        (ProgressSource::StatusCode, match_status_code),
        (ProgressSource::ScsiLogTable, match_scsi_log_table),
    ];

    for (source, matcher) in matchers {
        match matcher(&normalized) {
            Phrasing::Running(progress) => {
                debug!(?source, progress = progress.progress, "self-test in progress");
                return Some((progress, source));
            }
            Phrasing::Idle => {
                debug!(?source, "no self-test in progress");
                return None;
            }
            Phrasing::NoMatch => {}
        }
    }
    None
}

fn match_ata_remaining(text: &str) -> Phrasing {
    let Some(caps) = PATTERNS.ata_remaining.captures(text) else {
        return Phrasing::NoMatch;
    };
    from_remaining(&caps["remaining"])
}

fn match_nvme_status(text: &str) -> Phrasing {
    let Some(caps) = PATTERNS.nvme_status.captures(text) else {
        return Phrasing::NoMatch;
    };
    let status = caps["status"].trim();

    if let Some(completed) = PATTERNS.nvme_completed.captures(status) {
        return completed["completed"]
            .parse::<u32>()
            .ok()
            .and_then(CurrentSelfTestProgress::from_completed)
            .map_or_else(
                || {
                    debug!(status, "NVMe progress out of range");
                    Phrasing::NoMatch
                },
                Phrasing::Running,
            );
    }
    if status.to_ascii_lowercase().contains("in progress") && !status.starts_with("No ") {
        // Running, but without a percentage we can report.
        return Phrasing::NoMatch;
    }
    Phrasing::Idle
}

fn match_status_code(text: &str) -> Phrasing {
    let lines: Vec<&str> = text.lines().collect();
    let Some((index, caps)) = lines
        .iter()
        .enumerate()
        .find_map(|(index, line)| PATTERNS.status_code.captures(line).map(|caps| (index, caps)))
    else {
        return Phrasing::NoMatch;
    };

    let Ok(code) = caps["code"].parse::<u32>() else {
        return Phrasing::NoMatch;
    };
    if code > 0xFF {
        debug!(code, "status code out of range");
        return Phrasing::NoMatch;
    }
    if !IN_PROGRESS_CODES.contains(&code) {
        return Phrasing::Idle;
    }

    let block = join_continuation(&caps["rest"], &lines[index + 1..]);
    match PATTERNS.remaining.captures(&block) {
        Some(remaining) => from_remaining(&remaining["remaining"]),
        None => CurrentSelfTestProgress::from_remaining((code & 0x0F) * 10)
            .map_or(Phrasing::NoMatch, Phrasing::Running),
    }
}

fn match_scsi_log_table(text: &str) -> Phrasing {
    let lines: Vec<&str> = text.lines().collect();
    let Some(TableHeader {
        body_start: Some(start),
        ..
    }) = detect_table(&lines, &[ReportFormat::Scsi])
    else {
        return Phrasing::NoMatch;
    };
    let Some(&(_, newest)) = table_body(&lines, start).first() else {
        return Phrasing::NoMatch;
    };

    match scsi::parse_row(newest) {
        Ok(entry) if entry.status.is_running() && scsi::lifetime_is_now(newest) => {
            CurrentSelfTestProgress::from_completed(0).map_or(Phrasing::NoMatch, Phrasing::Running)
        }
        _ => Phrasing::NoMatch,
    }
}

fn from_remaining(raw: &str) -> Phrasing {
    raw.parse::<u32>()
        .ok()
        .and_then(CurrentSelfTestProgress::from_remaining)
        .map_or_else(
            || {
                debug!(remaining = raw, "remaining percentage out of range");
                Phrasing::NoMatch
            },
            Phrasing::Running,
        )
}
