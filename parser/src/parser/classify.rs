//! Status phrase classification.
//!
//! Maps the free-text status column of any self-test table onto
//! [`TestStatus`]. In-progress wording is checked before completion wording
//! so that "Self-test routine in progress" never reads as a failure.

use smart_selftest_core::TestStatus;

/// Normalized phrases meaning the routine finished cleanly. SCSI logs
/// print a bare "Completed".
const SUCCESS_PHRASES: [&str; 2] = ["completed without error", "completed"];

/// Classifies a status phrase.
///
/// Matching is case-insensitive and ignores runs of internal whitespace.
pub fn classify_status(phrase: &str) -> TestStatus {
    let normalized = phrase
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_lowercase();

    if normalized.is_empty() {
        return TestStatus::Unknown;
    }
    if normalized.contains("in progress") {
        return TestStatus::Running;
    }
    if SUCCESS_PHRASES.contains(&normalized.as_str()) {
        return TestStatus::Success;
    }
    if is_failure_phrase(&normalized) {
        return TestStatus::Failed;
    }
    if normalized.starts_with("aborted") || normalized.starts_with("interrupted") {
        return TestStatus::Aborted;
    }
    TestStatus::Unknown
}

// Any completion other than a success phrase carries an anomaly
// ("Completed: read failure", "Completed, segment failed").
fn is_failure_phrase(normalized: &str) -> bool {
    normalized.starts_with("completed")
        || normalized.starts_with("failed")
        || normalized.starts_with("fatal")
        || normalized.contains("failure")
        || normalized.contains("error")
}
