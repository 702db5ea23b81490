//! Report-text normalization utilities.

use regex::Regex;
use std::sync::LazyLock;

/// Strips terminal escapes and line-ending noise from captured output.
///
/// Every line is right-trimmed; leading indentation is kept because the
/// wrapped status blocks are recognized by it.
pub fn normalize_report_output(raw: &str) -> String {
    // SAFETY: These regexes are compile-time constants and are validated by tests.
    static ANSI_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\x1b\[[0-9;?]*[ -/]*[@-~]").expect("static regex must compile"));
    static OVERSTRIKE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r".\x08").expect("static regex must compile"));

    let stripped = ANSI_RE.replace_all(raw, "");
    let mut cleaned = stripped.into_owned();
    while OVERSTRIKE_RE.is_match(&cleaned) {
        cleaned = OVERSTRIKE_RE.replace_all(&cleaned, "").into_owned();
    }
    let replaced = cleaned.replace("\r\n", "\n").replace('\r', "\n");

    replaced
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Joins a wrapped status block into one whitespace-normalized string.
///
/// Starts with `head` (the tail of the status line itself) and appends every
/// following line in `rest` that is indented, stopping at the first blank or
/// unindented line.
pub fn join_continuation(head: &str, rest: &[&str]) -> String {
    let continuation = rest
        .iter()
        .take_while(|line| !line.trim().is_empty() && line.starts_with([' ', '\t']))
        .copied();

    std::iter::once(head)
        .chain(continuation)
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Returns the lines of a table body: everything after `start` up to the
/// first blank line, footnote, or line that cannot begin a row.
///
/// Rows start with `#`, a digit, or indentation. The ATA log may be
/// followed directly by a footnote such as `2 of 3 failed self-tests are
/// outdated by newer successful extended offline self-test #10`.
pub fn table_body<'a>(lines: &[&'a str], start: usize) -> Vec<(usize, &'a str)> {
    static FOOTNOTE_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^\d+ of \d+ failed self-tests are outdated").expect("static regex must compile")
    });

    lines
        .iter()
        .enumerate()
        .skip(start)
        .take_while(|(_, line)| {
            let could_be_row = line.starts_with([' ', '\t'])
                || line.starts_with('#')
                || line.starts_with(|c: char| c.is_ascii_digit());
            !line.trim().is_empty() && could_be_row && !FOOTNOTE_RE.is_match(line)
        })
        .map(|(index, line)| (index, *line))
        .collect()
}
