//! Structural validation of parsed records.
//!
//! Checks representational invariants only: fractions and percentages in
//! range, required text present, hex tokens shaped like hex. Whether a value
//! is physically plausible for a device is out of scope.
//!
//! # Examples
//!
//! ```
//! use smart_selftest_core::*;
//!
//! let progress = CurrentSelfTestProgress { progress: 59 };
//! assert!(validate_progress(&progress).is_empty());
//!
//! let bad = CurrentSelfTestProgress { progress: 150 };
//! assert_eq!(validate_progress(&bad), vec![ValidationError::ProgressOutOfRange(150)]);
//! ```

use thiserror::Error;

use crate::{CurrentSelfTestProgress, NvmeSelfTestEntry, SelfTestLogEntry};

/// Record validation errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Description column is empty or whitespace-only.
    #[error("self-test description cannot be empty")]
    EmptyDescription,
    /// Status phrase is empty or whitespace-only.
    #[error("self-test status phrase cannot be empty")]
    EmptyStatusPhrase,
    /// `remaining` fraction outside `0.0..=1.0`.
    #[error("remaining fraction out of range: {0}")]
    RemainingOutOfRange(f64),
    /// Progress percentage above 100.
    #[error("progress percentage out of range: {0}")]
    ProgressOutOfRange(u8),
    /// An NVMe `sct`/`code` column that is not a `0x` hex token.
    #[error("invalid hex token: {0}")]
    InvalidHexToken(String),
}

/// Validates one self-test log entry.
///
/// # Examples
///
/// ```
/// use smart_selftest_core::*;
///
/// let entry = SelfTestLogEntry::Ata(AtaSelfTestEntry {
///     num: 1,
///     description: "Short offline".into(),
///     status: TestStatus::Success,
///     status_verbose: "Completed without error".into(),
///     remaining: 1.5,
///     lifetime: 10,
///     lba_of_first_error: None,
/// });
/// let errors = validate_entry(&entry);
/// assert!(matches!(errors[0], ValidationError::RemainingOutOfRange(_)));
/// ```
pub fn validate_entry(entry: &SelfTestLogEntry) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if entry.description().trim().is_empty() {
        errors.push(ValidationError::EmptyDescription);
    }
    if entry.status_verbose().trim().is_empty() {
        errors.push(ValidationError::EmptyStatusPhrase);
    }

    match entry {
        SelfTestLogEntry::Ata(ata) => {
            if !(0.0..=1.0).contains(&ata.remaining) {
                errors.push(ValidationError::RemainingOutOfRange(ata.remaining));
            }
        }
        SelfTestLogEntry::Nvme(nvme) => errors.extend(validate_hex_columns(nvme)),
        SelfTestLogEntry::Scsi(_) => {}
    }

    errors
}

/// Validates a current-progress record.
pub fn validate_progress(progress: &CurrentSelfTestProgress) -> Vec<ValidationError> {
    if progress.progress > 100 {
        return vec![ValidationError::ProgressOutOfRange(progress.progress)];
    }
    Vec::new()
}

fn validate_hex_columns(entry: &NvmeSelfTestEntry) -> Vec<ValidationError> {
    [entry.sct.as_deref(), entry.code.as_deref()]
        .into_iter()
        .flatten()
        .filter(|token| !is_hex_token(token))
        .map(|token| ValidationError::InvalidHexToken(token.to_string()))
        .collect()
}

fn is_hex_token(token: &str) -> bool {
    token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .is_some_and(|digits| !digits.is_empty() && digits.chars().all(|ch| ch.is_ascii_hexdigit()))
}
