//! Combined self-test report for one captured utility output.

use serde::{Deserialize, Serialize};
use smart_selftest_core::{CurrentSelfTestProgress, ReportFormat, SelfTestLogEntry};

use crate::parser::ParseDiagnostics;

/// Everything extracted from one report text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelfTestReport {
    /// Detected self-test log format.
    pub format: Option<ReportFormat>,
    pub entries: Vec<SelfTestLogEntry>,
    /// Progress of the currently running test, if a live status was found.
    pub current: Option<CurrentSelfTestProgress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<ParseDiagnostics>,
}
