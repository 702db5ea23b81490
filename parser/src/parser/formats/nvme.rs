//! NVMe self-test log rows (log page 0x06).
//!
//! ```text
//! Num  Test_Description  Status                       Power_on_Hours  Failing_LBA  NSID Seg SCT Code
//!  0   Short             Completed without error               18636            -     -   - 0x0 0x00
//! ```

use regex::Regex;
use smart_selftest_core::{NVME_BROADCAST_NSID, NvmeSelfTestEntry};
use std::sync::LazyLock;

use super::{RowError, field, parse_num};
use crate::parser::classify::classify_status;
use crate::parser::util::{
    parse_optional_hex_token, parse_optional_token, parse_optional_u64, parse_u64,
};

static ROW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(?P<num>\d+)\s+(?P<description>\S.*?)\s{2,}(?P<status>\S.*?)\s+(?P<hours>\d+)\s+(?P<failing_lba>\S+)\s+(?P<nsid>\S+)\s+(?P<seg>\S+)\s+(?P<sct>-|0[xX][0-9a-fA-F]+)\s+(?P<code>-|0[xX][0-9a-fA-F]+)\s*$",
    )
    .expect("static regex must compile")
});

pub fn parse_row(line: &str) -> Result<NvmeSelfTestEntry, RowError> {
    let caps = ROW_RE.captures(line).ok_or(RowError::NoMatch)?;
    let status_verbose = field(&caps, "status").to_string();

    Ok(NvmeSelfTestEntry {
        num: parse_num(&caps)?,
        description: field(&caps, "description").to_string(),
        status: classify_status(&status_verbose),
        power_on_hours: parse_u64("power_on_hours", field(&caps, "hours"))?,
        failing_lba: parse_optional_u64("failing_lba", field(&caps, "failing_lba"))?,
        nsid: parse_nsid(field(&caps, "nsid"))?,
        seg: parse_optional_u64("seg", field(&caps, "seg"))?,
        sct: parse_optional_hex_token("sct", field(&caps, "sct"))?,
        code: parse_optional_hex_token("code", field(&caps, "code"))?,
        status_verbose,
    })
}

fn parse_nsid(raw: &str) -> Result<Option<u64>, RowError> {
    let nsid = parse_optional_token("nsid", raw, |token| match token {
        "*" => Some(NVME_BROADCAST_NSID),
        other => other.parse::<u64>().ok(),
    })?;
    Ok(nsid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use smart_selftest_core::TestStatus;

    #[test]
    fn test_completed_row_keeps_hex_verbatim() {
        let entry = parse_row(
            " 0   Short             Completed without error               18636            -     -   - 0x0 0x00",
        )
        .unwrap();
        assert_eq!(
            entry,
            NvmeSelfTestEntry {
                num: 0,
                description: "Short".into(),
                status: TestStatus::Success,
                status_verbose: "Completed without error".into(),
                power_on_hours: 18636,
                failing_lba: None,
                nsid: None,
                seg: None,
                sct: Some("0x0".into()),
                code: Some("0x00".into()),
            }
        );
    }

    #[test]
    fn test_failed_segment_row_with_numeric_columns() {
        let entry = parse_row(
            " 1   Extended          Completed: failed segments      1204      1953525167     1   7 0x0 0x07",
        )
        .unwrap();
        assert_eq!(entry.num, 1);
        assert_eq!(entry.description, "Extended");
        assert_eq!(entry.status, TestStatus::Failed);
        assert_eq!(entry.status_verbose, "Completed: failed segments");
        assert_eq!(entry.failing_lba, Some(1953525167));
        assert_eq!(entry.nsid, Some(1));
        assert_eq!(entry.seg, Some(7));
        assert_eq!(entry.code.as_deref(), Some("0x07"));
    }

    #[test]
    fn test_broadcast_nsid_and_missing_status_codes() {
        let entry = parse_row(
            " 2   Vendor specific   Aborted: Controller Reset              90            -     *   -   -    -",
        )
        .unwrap();
        assert_eq!(entry.description, "Vendor specific");
        assert_eq!(entry.status, TestStatus::Aborted);
        assert_eq!(entry.nsid, Some(NVME_BROADCAST_NSID));
        assert_eq!(entry.sct, None);
        assert_eq!(entry.code, None);
    }

    #[test]
    fn test_malformed_rows() {
        assert_eq!(parse_row("No Self-tests Logged"), Err(RowError::NoMatch));
        assert!(matches!(
            parse_row(" 0   Short             Completed without error               18636            -    ns   - 0x0 0x00"),
            Err(RowError::Column(_))
        ));
    }
}
