//! ATA self-test log rows.
//!
//! ```text
//! Num  Test_Description    Status                  Remaining  LifeTime(hours)  LBA_of_first_error
//! # 1  Short offline       Completed without error       00%     16590         -
//! ```
//!
//! The status phrase is everything between the description and the first
//! percentage token.

use regex::Regex;
use smart_selftest_core::AtaSelfTestEntry;
use std::sync::LazyLock;

use super::{RowError, field, parse_num};
use crate::parser::classify::classify_status;
use crate::parser::util::{parse_optional_u64, parse_percent_fraction, parse_u64};

static ROW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*#\s*(?P<num>\d+)\s+(?P<description>\S.*?)\s{2,}(?P<status>\S.*?)\s+(?P<remaining>\d+%)\s+(?P<lifetime>\d+)\s+(?P<lba>\S+)\s*$",
    )
    .expect("static regex must compile")
});

pub fn parse_row(line: &str) -> Result<AtaSelfTestEntry, RowError> {
    let caps = ROW_RE.captures(line).ok_or(RowError::NoMatch)?;
    let status_verbose = field(&caps, "status").to_string();

    Ok(AtaSelfTestEntry {
        num: parse_num(&caps)?,
        description: field(&caps, "description").to_string(),
        status: classify_status(&status_verbose),
        remaining: parse_percent_fraction("remaining", field(&caps, "remaining"))?,
        lifetime: parse_u64("lifetime", field(&caps, "lifetime"))?,
        lba_of_first_error: parse_optional_u64("lba_of_first_error", field(&caps, "lba"))?,
        status_verbose,
    })
}
