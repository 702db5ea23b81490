//! Self-test record type definitions.
//!
//! This module defines the data model produced by the self-test parsers.
//! Every record is a plain value: it is built once per parse call and never
//! mutated afterwards. The types serialize with [`serde`] into the flat
//! field-name → value mapping consumers persist or display.

use std::fmt;

use serde::{Deserialize, Serialize};

/// NVMe namespace identifier printed as `*` (all namespaces).
pub const NVME_BROADCAST_NSID: u64 = 0xFFFF_FFFF;

/// Classified outcome of one self-test execution.
///
/// Serialized in upper case (`"SUCCESS"`, `"FAILED"`, ...). `Aborted` and
/// `Unknown` cover phrases that are neither a completion, a failure, nor an
/// in-progress routine.
///
/// # Examples
///
/// ```
/// use smart_selftest_core::TestStatus;
///
/// assert_eq!(TestStatus::Success.as_str(), "SUCCESS");
/// assert!(TestStatus::Running.is_running());
/// assert!(!TestStatus::Failed.is_running());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TestStatus {
    /// Completed without error.
    Success,
    /// Completed with an anomaly, or failed outright.
    Failed,
    /// Routine still executing.
    Running,
    /// Stopped by the host, a reset, or a controller command.
    Aborted,
    /// Phrase outside the known vocabulary.
    Unknown,
}

impl TestStatus {
    /// Returns the serialized label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Failed => "FAILED",
            Self::Running => "RUNNING",
            Self::Aborted => "ABORTED",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Returns `true` for [`TestStatus::Running`].
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Self-test log table layout.
///
/// The diagnostic utility prints a different table per device protocol.
/// Detection always tries formats in [`ReportFormat::PRIORITY`] order.
///
/// # Examples
///
/// ```
/// use smart_selftest_core::ReportFormat;
///
/// assert_eq!(ReportFormat::PRIORITY[0], ReportFormat::Ata);
/// assert_eq!(ReportFormat::Scsi.label(), "scsi");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// `Num  Test_Description  Status  Remaining  LifeTime(hours)  LBA_of_first_error`
    Ata,
    /// `Self-test Log (NVMe Log 0x06)`
    Nvme,
    /// `SMART Self-test log` with the two-line `LBA_first_err [SK ASC ASQ]` header
    Scsi,
}

impl ReportFormat {
    /// Detection order.
    pub const PRIORITY: [ReportFormat; 3] = [Self::Ata, Self::Nvme, Self::Scsi];

    /// Returns the lowercase label used in reports and configuration.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ata => "ata",
            Self::Nvme => "nvme",
            Self::Scsi => "scsi",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of an ATA self-test log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtaSelfTestEntry {
    /// Log slot as printed after `#`.
    pub num: u32,
    /// Test type label, e.g. `Short offline`.
    pub description: String,
    pub status: TestStatus,
    /// Status phrase exactly as printed (trimmed).
    pub status_verbose: String,
    /// Fraction of the test remaining when it ended (`80%` → `0.8`).
    pub remaining: f64,
    /// Power-on hours when the test ran.
    pub lifetime: u64,
    pub lba_of_first_error: Option<u64>,
}

/// One row of an NVMe self-test log (log page 0x06).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NvmeSelfTestEntry {
    /// Log slot as printed, 0-based.
    pub num: u32,
    pub description: String,
    pub status: TestStatus,
    pub status_verbose: String,
    pub power_on_hours: u64,
    pub failing_lba: Option<u64>,
    /// Namespace id; `*` maps to [`NVME_BROADCAST_NSID`].
    pub nsid: Option<u64>,
    pub seg: Option<u64>,
    /// Status code type, kept verbatim (e.g. `0x0`).
    pub sct: Option<String>,
    /// Status code, kept verbatim (e.g. `0x00`).
    pub code: Option<String>,
}

/// One row of a SCSI self-test log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScsiSelfTestEntry {
    pub num: u32,
    pub description: String,
    pub status: TestStatus,
    pub status_verbose: String,
    pub segment_number: Option<u64>,
    /// Power-on hours; `None` when the utility printed `NOW` for a
    /// test still executing.
    pub lifetime: Option<u64>,
    pub lba_of_first_error: Option<u64>,
}

/// A parsed self-test log row of any supported format.
///
/// Serializes untagged, so each entry renders as the flat mapping of its
/// format-specific fields.
///
/// # Examples
///
/// ```
/// use smart_selftest_core::{ScsiSelfTestEntry, SelfTestLogEntry, TestStatus, ReportFormat};
///
/// let entry = SelfTestLogEntry::Scsi(ScsiSelfTestEntry {
///     num: 1,
///     description: "Background short".into(),
///     status: TestStatus::Failed,
///     status_verbose: "Completed, segment failed".into(),
///     segment_number: None,
///     lifetime: Some(3943),
///     lba_of_first_error: None,
/// });
/// assert_eq!(entry.format(), ReportFormat::Scsi);
/// assert_eq!(entry.status(), TestStatus::Failed);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SelfTestLogEntry {
    Ata(AtaSelfTestEntry),
    Nvme(NvmeSelfTestEntry),
    Scsi(ScsiSelfTestEntry),
}

impl SelfTestLogEntry {
    /// Returns the table format this row came from.
    pub fn format(&self) -> ReportFormat {
        match self {
            Self::Ata(_) => ReportFormat::Ata,
            Self::Nvme(_) => ReportFormat::Nvme,
            Self::Scsi(_) => ReportFormat::Scsi,
        }
    }

    pub fn num(&self) -> u32 {
        match self {
            Self::Ata(e) => e.num,
            Self::Nvme(e) => e.num,
            Self::Scsi(e) => e.num,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Self::Ata(e) => &e.description,
            Self::Nvme(e) => &e.description,
            Self::Scsi(e) => &e.description,
        }
    }

    pub fn status(&self) -> TestStatus {
        match self {
            Self::Ata(e) => e.status,
            Self::Nvme(e) => e.status,
            Self::Scsi(e) => e.status,
        }
    }

    pub fn status_verbose(&self) -> &str {
        match self {
            Self::Ata(e) => &e.status_verbose,
            Self::Nvme(e) => &e.status_verbose,
            Self::Scsi(e) => &e.status_verbose,
        }
    }

    /// Power-on hours recorded for the row, whichever column carries them.
    pub fn hours(&self) -> Option<u64> {
        match self {
            Self::Ata(e) => Some(e.lifetime),
            Self::Nvme(e) => Some(e.power_on_hours),
            Self::Scsi(e) => e.lifetime,
        }
    }

    /// First failing LBA, if the row reports one.
    pub fn failing_lba(&self) -> Option<u64> {
        match self {
            Self::Ata(e) => e.lba_of_first_error,
            Self::Nvme(e) => e.failing_lba,
            Self::Scsi(e) => e.lba_of_first_error,
        }
    }
}

/// Progress of the self-test currently executing on a device.
///
/// `progress` is always "percent completed", whatever the source text
/// reported. Construct through [`from_completed`](Self::from_completed) or
/// [`from_remaining`](Self::from_remaining), which reject values outside
/// `0..=100`.
///
/// # Examples
///
/// ```
/// use smart_selftest_core::CurrentSelfTestProgress;
///
/// assert_eq!(CurrentSelfTestProgress::from_remaining(41).unwrap().progress, 59);
/// assert_eq!(CurrentSelfTestProgress::from_completed(3).unwrap().progress, 3);
/// assert!(CurrentSelfTestProgress::from_remaining(120).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentSelfTestProgress {
    pub progress: u8,
}

impl CurrentSelfTestProgress {
    /// Builds progress from a "percent completed" value.
    pub fn from_completed(completed: u32) -> Option<Self> {
        if completed > 100 {
            return None;
        }
        u8::try_from(completed).ok().map(|progress| Self { progress })
    }

    /// Builds progress from a "percent remaining" value.
    pub fn from_remaining(remaining: u32) -> Option<Self> {
        100u32
            .checked_sub(remaining)
            .and_then(Self::from_completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ata_entry() -> AtaSelfTestEntry {
        AtaSelfTestEntry {
            num: 1,
            description: "Short offline".into(),
            status: TestStatus::Success,
            status_verbose: "Completed without error".into(),
            remaining: 0.0,
            lifetime: 16590,
            lba_of_first_error: None,
        }
    }

    #[test]
    fn test_status_serializes_upper_case() {
        let json = serde_json::to_string(&TestStatus::Running).unwrap();
        assert_eq!(json, "\"RUNNING\"");
        let back: TestStatus = serde_json::from_str("\"ABORTED\"").unwrap();
        assert_eq!(back, TestStatus::Aborted);
    }

    #[test]
    fn test_entry_serializes_as_flat_mapping() {
        let entry = SelfTestLogEntry::Ata(ata_entry());
        let value = serde_json::to_value(&entry).unwrap();

        assert_eq!(value["num"], 1);
        assert_eq!(value["status"], "SUCCESS");
        assert_eq!(value["remaining"], 0.0);
        assert!(value["lba_of_first_error"].is_null());
        assert!(value.get("Ata").is_none());
    }

    #[test]
    fn test_untagged_deserialize_picks_matching_variant() {
        let scsi = serde_json::json!({
            "num": 1,
            "description": "Background short",
            "status": "FAILED",
            "status_verbose": "Completed, segment failed",
            "segment_number": null,
            "lifetime": 3943,
            "lba_of_first_error": null
        });
        let entry: SelfTestLogEntry = serde_json::from_value(scsi).unwrap();
        assert_eq!(entry.format(), ReportFormat::Scsi);

        let ata = serde_json::to_value(SelfTestLogEntry::Ata(ata_entry())).unwrap();
        let entry: SelfTestLogEntry = serde_json::from_value(ata).unwrap();
        assert_eq!(entry.format(), ReportFormat::Ata);
    }

    #[test]
    fn test_progress_bounds() {
        assert_eq!(CurrentSelfTestProgress::from_remaining(0).unwrap().progress, 100);
        assert_eq!(CurrentSelfTestProgress::from_remaining(100).unwrap().progress, 0);
        assert!(CurrentSelfTestProgress::from_remaining(101).is_none());
        assert!(CurrentSelfTestProgress::from_completed(101).is_none());
    }

    #[test]
    fn test_entry_accessors() {
        let entry = SelfTestLogEntry::Ata(ata_entry());
        assert_eq!(entry.num(), 1);
        assert_eq!(entry.description(), "Short offline");
        assert_eq!(entry.status_verbose(), "Completed without error");
        assert_eq!(entry.hours(), Some(16590));
        assert_eq!(entry.failing_lba(), None);
    }
}
