//! SCSI self-test log rows.
//!
//! ```text
//! Num  Test              Status                 segment  LifeTime  LBA_first_err [SK ASC ASQ]
//!      Description                              number   (hours)
//! # 1  Background short  Completed, segment failed   -    3943                 - [-   -    -]
//! ```
//!
//! The trailing sense bracket is accepted but not extracted.

use regex::Regex;
use smart_selftest_core::ScsiSelfTestEntry;
use std::sync::LazyLock;

use super::{RowError, field, parse_num};
use crate::parser::classify::classify_status;
use crate::parser::util::{parse_optional_token, parse_optional_u64};

/// Lifetime token printed while the test is still executing.
pub const LIFETIME_NOW: &str = "NOW";

static ROW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*#\s*(?P<num>\d+)\s+(?P<description>\S.*?)\s{2,}(?P<status>\S.*?)\s+(?P<segment>\S+)\s+(?P<lifetime>\S+)\s+(?P<lba>\S+)(?:\s+\[[^\]]*\])?\s*$",
    )
    .expect("static regex must compile")
});

pub fn parse_row(line: &str) -> Result<ScsiSelfTestEntry, RowError> {
    let caps = ROW_RE.captures(line).ok_or(RowError::NoMatch)?;
    let status_verbose = field(&caps, "status").to_string();

    Ok(ScsiSelfTestEntry {
        num: parse_num(&caps)?,
        description: field(&caps, "description").to_string(),
        status: classify_status(&status_verbose),
        segment_number: parse_optional_u64("segment_number", field(&caps, "segment"))?,
        lifetime: parse_lifetime(field(&caps, "lifetime"))?,
        lba_of_first_error: parse_optional_u64("lba_of_first_error", field(&caps, "lba"))?,
        status_verbose,
    })
}

/// Returns `true` if `line` is a row whose lifetime column reads `NOW`.
///
/// [`parse_row`] maps both `NOW` and the `-` placeholder to `None`; only
/// `NOW` marks a test that is still executing.
pub fn lifetime_is_now(line: &str) -> bool {
    ROW_RE
        .captures(line)
        .is_some_and(|caps| field(&caps, "lifetime") == LIFETIME_NOW)
}

fn parse_lifetime(raw: &str) -> Result<Option<u64>, RowError> {
    if raw == LIFETIME_NOW {
        return Ok(None);
    }
    let hours = parse_optional_token("lifetime", raw, |token| token.parse::<u64>().ok())?;
    Ok(hours)
}
