//! Output formatting for self-test entries, progress, and reports.

use serde::{Deserialize, Serialize};
use smart_selftest_core::{CurrentSelfTestProgress, SelfTestLogEntry};

use crate::error::Result;
use crate::report::SelfTestReport;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
    Markdown,
    Table,
}

/// Formats self-test log entries in the requested output format.
pub fn format_entries(entries: &[SelfTestLogEntry], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(entries)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(entries)?),
        OutputFormat::Markdown => Ok(entries_to_markdown(entries)),
        OutputFormat::Table => Ok(entries_to_table(entries)),
    }
}

/// Formats the current self-test progress (or its absence).
pub fn format_progress(
    progress: Option<CurrentSelfTestProgress>,
    format: OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&progress)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(&progress)?),
        OutputFormat::Markdown => Ok(format!("**Current self-test:** {}\n", progress_label(progress))),
        OutputFormat::Table => Ok(format!("Current self-test: {}\n", progress_label(progress))),
    }
}

/// Formats a full report in the requested output format.
pub fn format_report(report: &SelfTestReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(report)?),
        OutputFormat::Markdown => Ok(report_to_markdown(report)),
        OutputFormat::Table => Ok(report_to_table(report)),
    }
}

fn progress_label(progress: Option<CurrentSelfTestProgress>) -> String {
    match progress {
        Some(p) => format!("{}% complete", p.progress),
        None => "none in progress".to_string(),
    }
}

fn optional(value: Option<u64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

/// Column headers for the format of the first entry.
fn headers(entries: &[SelfTestLogEntry]) -> Vec<&'static str> {
    let mut headers = vec!["Num", "Description", "Status", "Status detail"];
    match entries.first() {
        Some(SelfTestLogEntry::Ata(_)) => headers.extend(["Remaining", "LifeTime", "LBA of first error"]),
        Some(SelfTestLogEntry::Nvme(_)) => headers.extend([
            "Power-on hours",
            "Failing LBA",
            "NSID",
            "Seg",
            "SCT",
            "Code",
        ]),
        Some(SelfTestLogEntry::Scsi(_)) => {
            headers.extend(["Segment", "LifeTime", "LBA of first error"])
        }
        None => {}
    }
    headers
}

fn cells(entry: &SelfTestLogEntry) -> Vec<String> {
    let mut cells = vec![
        entry.num().to_string(),
        entry.description().to_string(),
        entry.status().to_string(),
        entry.status_verbose().to_string(),
    ];
    match entry {
        SelfTestLogEntry::Ata(e) => cells.extend([
            format!("{:.0}%", e.remaining * 100.0),
            e.lifetime.to_string(),
            optional(e.lba_of_first_error),
        ]),
        SelfTestLogEntry::Nvme(e) => cells.extend([
            e.power_on_hours.to_string(),
            optional(e.failing_lba),
            optional(e.nsid),
            optional(e.seg),
            e.sct.clone().unwrap_or_else(|| "-".to_string()),
            e.code.clone().unwrap_or_else(|| "-".to_string()),
        ]),
        SelfTestLogEntry::Scsi(e) => cells.extend([
            optional(e.segment_number),
            e.lifetime.map_or_else(|| "NOW".to_string(), |h| h.to_string()),
            optional(e.lba_of_first_error),
        ]),
    }
    cells
}

fn entries_to_markdown(entries: &[SelfTestLogEntry]) -> String {
    if entries.is_empty() {
        return "_No self-test entries._\n".to_string();
    }

    let headers = headers(entries);
    let mut out = String::new();
    out.push_str(&format!("| {} |\n", headers.join(" | ")));
    out.push_str(&format!(
        "|{}|\n",
        headers
            .iter()
            .map(|h| "-".repeat(h.len() + 2))
            .collect::<Vec<_>>()
            .join("|")
    ));
    for entry in entries {
        out.push_str(&format!("| {} |\n", cells(entry).join(" | ")));
    }
    out
}

fn entries_to_table(entries: &[SelfTestLogEntry]) -> String {
    if entries.is_empty() {
        return "No self-test entries.\n".to_string();
    }

    let headers = headers(entries);
    let rows: Vec<Vec<String>> = entries.iter().map(cells).collect();
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            rows.iter()
                .filter_map(|row| row.get(i))
                .map(String::len)
                .chain(std::iter::once(h.len()))
                .max()
                .unwrap_or(h.len())
        })
        .collect();

    let render = |values: Vec<&str>| -> String {
        values
            .iter()
            .zip(&widths)
            .map(|(value, &width)| format!("{value:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    out.push_str(&render(headers.clone()));
    out.push('\n');
    for row in &rows {
        out.push_str(&render(row.iter().map(String::as_str).collect()));
        out.push('\n');
    }
    out
}

fn report_to_markdown(report: &SelfTestReport) -> String {
    let mut out = String::from("# Self-test report\n\n");

    let format = report.format.map_or("unknown", |f| f.label());
    out.push_str(&format!("**Log format:** {format}\n\n"));
    out.push_str(&format!(
        "**Current self-test:** {}\n\n",
        progress_label(report.current)
    ));

    out.push_str("## Log\n\n");
    out.push_str(&entries_to_markdown(&report.entries));

    if let Some(diagnostics) = &report.diagnostics {
        let warnings = diagnostics.warnings();
        if !warnings.is_empty() {
            out.push_str("\n## Warnings\n\n");
            for warning in warnings {
                out.push_str(&format!("- {warning}\n"));
            }
        }
    }

    out
}

fn report_to_table(report: &SelfTestReport) -> String {
    let mut out = String::new();

    let format = report.format.map_or("unknown", |f| f.label());
    out.push_str(&format!(
        "Log format: {format}  Current self-test: {}\n\n",
        progress_label(report.current)
    ));
    out.push_str(&entries_to_table(&report.entries));

    if let Some(diagnostics) = &report.diagnostics {
        for warning in diagnostics.warnings() {
            out.push_str(&format!("warning: {warning}\n"));
        }
    }

    out
}
