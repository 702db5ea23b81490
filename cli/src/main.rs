use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use rayon::prelude::*;
use smart_selftest_core::validate_entry;
use smart_selftest_parser::config::ReportConfig;
use smart_selftest_parser::output::{OutputFormat, format_entries, format_progress, format_report};
use smart_selftest_parser::{parse_current_selftest, parse_report_with_config};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "smart-selftest")]
#[command(about = "Offline parsing of captured smartctl self-test reports")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse report text from stdin.
    ParseStdin(ParseStdinArgs),
    /// Parse report text from one or more files.
    ParseFile(ParseFileArgs),
    /// Print the progress of the self-test currently running.
    Progress(ProgressArgs),
}

#[derive(Debug, Args)]
struct OutputArgs {
    /// Output the full report (entries, progress, diagnostics).
    #[arg(long)]
    with_report: bool,
    /// Output format (overrides the config file).
    #[arg(long)]
    format: Option<OutputFormat>,
    /// Path to a YAML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct ParseStdinArgs {
    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Debug, Args)]
struct ParseFileArgs {
    /// Files containing captured report text.
    #[arg(long, required = true, num_args = 1..)]
    input: Vec<PathBuf>,
    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Debug, Args)]
struct ProgressArgs {
    /// File containing captured report text (default: stdin).
    #[arg(long)]
    input: Option<PathBuf>,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: OutputFormat,
}

/// Effective settings after merging the config file with flags.
struct RenderSettings {
    config: ReportConfig,
    with_report: bool,
}

impl RenderSettings {
    fn resolve(args: &OutputArgs) -> Result<Self, String> {
        let mut config = match &args.config {
            Some(path) => ReportConfig::load(path)
                .map_err(|err| format!("Failed to load config '{}': {err}", path.display()))?,
            None => ReportConfig::default(),
        };
        if let Some(format) = args.format {
            config.output.format = format;
        }
        let with_report = args.with_report || config.output.include_diagnostics;
        Ok(Self {
            config,
            with_report,
        })
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::ParseStdin(args) => run_parse_stdin(args),
        Command::ParseFile(args) => run_parse_file(args),
        Command::Progress(args) => run_progress(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run_parse_stdin(args: ParseStdinArgs) -> Result<(), String> {
    let settings = RenderSettings::resolve(&args.output)?;
    let text = read_stdin()?;
    let rendered = render_text("<stdin>", &text, &settings)?;
    print!("{rendered}");
    Ok(())
}

fn run_parse_file(args: ParseFileArgs) -> Result<(), String> {
    let settings = RenderSettings::resolve(&args.output)?;

    // par_iter keeps input order on collect.
    let blocks: Vec<Result<String, String>> = args
        .input
        .par_iter()
        .map(|path| {
            let text = read_file(path)?;
            render_text(&path.display().to_string(), &text, &settings)
        })
        .collect();

    let show_headers = args.input.len() > 1;
    let mut failures = 0usize;
    for (index, (path, block)) in args.input.iter().zip(blocks).enumerate() {
        match block {
            Ok(rendered) => {
                if show_headers {
                    if index > 0 {
                        println!();
                    }
                    println!("==> {} <==", path.display());
                }
                print!("{rendered}");
            }
            Err(err) => {
                eprintln!("error: {err}");
                failures += 1;
            }
        }
    }

    if failures > 0 {
        return Err(format!("{failures} of {} input(s) failed", args.input.len()));
    }
    Ok(())
}

fn run_progress(args: ProgressArgs) -> Result<(), String> {
    let text = match &args.input {
        Some(path) => read_file(path)?,
        None => read_stdin()?,
    };
    let progress = parse_current_selftest(&text);
    let rendered = format_progress(progress, args.format)
        .map_err(|err| format!("Failed to format progress: {err}"))?;
    print!("{}", with_newline(rendered));
    Ok(())
}

fn render_text(source: &str, text: &str, settings: &RenderSettings) -> Result<String, String> {
    let report = parse_report_with_config(text, &settings.config.parsing);
    debug!(
        source,
        format = ?report.format,
        entries = report.entries.len(),
        "parsed report"
    );

    if let Some(diagnostics) = &report.diagnostics {
        let coverage = diagnostics.coverage();
        if coverage < 1.0 {
            warn!(
                source,
                coverage,
                skipped = diagnostics.skipped_rows.len(),
                "some self-test rows could not be parsed"
            );
        }
    }

    for entry in &report.entries {
        for issue in validate_entry(entry) {
            warn!(source, num = entry.num(), "invalid entry: {issue}");
        }
    }

    let format = settings.config.output.format;
    let rendered = if settings.with_report {
        format_report(&report, format)
    } else {
        format_entries(&report.entries, format)
    }
    .map_err(|err| format!("Failed to format output for {source}: {err}"))?;

    Ok(with_newline(rendered))
}

fn with_newline(mut rendered: String) -> String {
    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }
    rendered
}

fn read_stdin() -> Result<String, String> {
    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .map_err(|err| format!("Failed to read stdin: {err}"))?;
    Ok(text)
}

fn read_file(path: &Path) -> Result<String, String> {
    let bytes =
        fs::read(path).map_err(|err| format!("Failed to read '{}': {err}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
