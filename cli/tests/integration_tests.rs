use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

const ATA_REPORT: &str = "\
=== START OF READ SMART DATA SECTION ===
Self-test execution status:        41% of test remaining
SMART Self-test log structure revision number 1
Num  Test_Description    Status                  Remaining  LifeTime(hours)  LBA_of_first_error
# 1  Offline             Self-test routine in progress 100%         0         -
# 2  Short offline       Completed without error       00%     16589         -
";

const NVME_REPORT: &str = "\
Self-test Log (NVMe Log 0x06)
Self-test status: No self-test in progress
Num  Test_Description  Status                       Power_on_Hours  Failing_LBA  NSID Seg SCT Code
 0   Short             Completed without error               18636            -     -   - 0x0 0x00
 1   Extended          Completed: failed segments            18600   1953525167     1   7 0x0 0x07
";

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_smart-selftest")
}

fn write_input(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("failed to write input");
    path
}

fn run_with_stdin(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(bin())
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to run smart-selftest");
    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(stdin.as_bytes())
        .expect("failed to write stdin");
    child.wait_with_output().expect("failed to wait for smart-selftest")
}

fn stdout_json(output: &Output) -> serde_json::Value {
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

// ---------------------------------------------------------------------------
// parse-stdin
// ---------------------------------------------------------------------------

#[test]
fn parse_stdin_prints_entries_as_json() {
    let output = run_with_stdin(&["parse-stdin"], ATA_REPORT);
    let value = stdout_json(&output);

    let entries = value.as_array().expect("entries array");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["status"], "RUNNING");
    assert_eq!(entries[0]["remaining"], 1.0);
    assert_eq!(entries[1]["lifetime"], 16589);
    assert!(entries[1]["lba_of_first_error"].is_null());
}

#[test]
fn parse_stdin_with_report_includes_progress_and_diagnostics() {
    let output = run_with_stdin(&["parse-stdin", "--with-report"], ATA_REPORT);
    let value = stdout_json(&output);

    assert_eq!(value["format"], "ata");
    assert_eq!(value["current"]["progress"], 59);
    assert_eq!(value["entries"].as_array().unwrap().len(), 2);
    assert_eq!(value["diagnostics"]["parsed_rows"], 2);
    assert_eq!(value["diagnostics"]["progress_source"], "ata_remaining");
}

#[test]
fn parse_stdin_unrecognized_text_is_empty_list() {
    let output = run_with_stdin(&["parse-stdin"], "nothing to see here\n");
    let value = stdout_json(&output);
    assert_eq!(value, serde_json::json!([]));
}

#[test]
fn parse_stdin_warns_about_unparsed_rows() {
    let text = "\
Num  Test_Description    Status                  Remaining  LifeTime(hours)  LBA_of_first_error
# 1  Short offline       Completed without error       00%     16590         -
# 2  garbled
";
    let output = run_with_stdin(&["parse-stdin"], text);
    let value = stdout_json(&output);
    assert_eq!(value.as_array().unwrap().len(), 1);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("some self-test rows could not be parsed"),
        "stderr: {stderr}"
    );
}

#[test]
fn parse_stdin_clean_report_is_quiet() {
    let output = run_with_stdin(&["parse-stdin"], NVME_REPORT);
    assert!(output.status.success());
    assert!(output.stderr.is_empty(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
}

#[test]
fn parse_stdin_table_format() {
    let output = run_with_stdin(&["parse-stdin", "--format", "table"], NVME_REPORT);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("Num"));
    assert!(lines[2].contains("FAILED"));
    assert!(lines[2].contains("1953525167"));
}

// ---------------------------------------------------------------------------
// parse-file
// ---------------------------------------------------------------------------

#[test]
fn parse_file_single_input_has_no_header() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "nvme.txt", NVME_REPORT);

    let output = Command::new(bin())
        .args(["parse-file", "--input", input.to_str().unwrap()])
        .output()
        .expect("failed to run smart-selftest");
    let value = stdout_json(&output);

    assert_eq!(value[0]["sct"], "0x0");
    assert_eq!(value[1]["failing_lba"], 1953525167u64);
    assert_eq!(value[1]["nsid"], 1);
}

#[test]
fn parse_file_multiple_inputs_keep_order_with_headers() {
    let dir = tempfile::tempdir().unwrap();
    let ata = write_input(dir.path(), "ata.txt", ATA_REPORT);
    let nvme = write_input(dir.path(), "nvme.txt", NVME_REPORT);

    let output = Command::new(bin())
        .args([
            "parse-file",
            "--input",
            ata.to_str().unwrap(),
            nvme.to_str().unwrap(),
            "--format",
            "yaml",
        ])
        .output()
        .expect("failed to run smart-selftest");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let ata_header = format!("==> {} <==", ata.display());
    let nvme_header = format!("==> {} <==", nvme.display());
    let ata_at = stdout.find(&ata_header).expect("ata header");
    let nvme_at = stdout.find(&nvme_header).expect("nvme header");
    assert!(ata_at < nvme_at);
    assert!(stdout[ata_at..nvme_at].contains("status: RUNNING"));
    assert!(stdout[nvme_at..].contains("power_on_hours: 18636"));
}

#[test]
fn parse_file_missing_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.txt");

    let output = Command::new(bin())
        .args(["parse-file", "--input", missing.to_str().unwrap()])
        .output()
        .expect("failed to run smart-selftest");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error: Failed to read"), "stderr: {stderr}");
}

// ---------------------------------------------------------------------------
// --config
// ---------------------------------------------------------------------------

#[test]
fn config_restricts_formats_and_sets_output() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_input(
        dir.path(),
        "config.yml",
        "version: \"1.0\"\nparsing:\n  formats: [scsi]\noutput:\n  format: yaml\n",
    );
    let input = write_input(dir.path(), "ata.txt", ATA_REPORT);

    let output = Command::new(bin())
        .args([
            "parse-file",
            "--input",
            input.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
        ])
        .output()
        .expect("failed to run smart-selftest");
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "[]");
}

#[test]
fn format_flag_overrides_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_input(
        dir.path(),
        "config.yml",
        "version: \"1.0\"\noutput:\n  format: markdown\n  include_diagnostics: true\n",
    );

    let output = run_with_stdin(
        &["parse-stdin", "--config", config.to_str().unwrap(), "--format", "json"],
        NVME_REPORT,
    );
    let value = stdout_json(&output);
    assert_eq!(value["format"], "nvme");
    assert!(value["diagnostics"].is_object());
}

#[test]
fn unsupported_config_version_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_input(dir.path(), "config.yml", "version: \"2.0\"\n");

    let output = run_with_stdin(&["parse-stdin", "--config", config.to_str().unwrap()], NVME_REPORT);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to load config"), "stderr: {stderr}");
}

// ---------------------------------------------------------------------------
// progress
// ---------------------------------------------------------------------------

#[test]
fn progress_from_stdin() {
    let output = run_with_stdin(&["progress"], ATA_REPORT);
    assert_eq!(stdout_json(&output), serde_json::json!({"progress": 59}));
}

#[test]
fn progress_absent_prints_null() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "nvme.txt", NVME_REPORT);

    let output = Command::new(bin())
        .args(["progress", "--input", input.to_str().unwrap()])
        .output()
        .expect("failed to run smart-selftest");
    assert_eq!(stdout_json(&output), serde_json::Value::Null);
}

#[test]
fn progress_status_code_line() {
    let text = "Self-test execution status:      ( 249)\tSelf-test routine in progress...\n\t\t\t\t\t90% of test remaining.\n";
    let output = run_with_stdin(&["progress"], text);
    assert_eq!(stdout_json(&output), serde_json::json!({"progress": 10}));
}
