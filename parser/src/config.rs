//! Parser and output configuration.
//!
//! Defines the YAML-serializable configuration that controls which table
//! formats are detected and how results are rendered.
//!
//! # Example YAML
//!
//! ```yaml
//! version: "1.0"
//! parsing:
//!   formats: [ata, nvme, scsi]
//! output:
//!   format: json
//!   include_diagnostics: false
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};
use smart_selftest_core::ReportFormat;

use crate::error::{Result, SelfTestError};
use crate::output::OutputFormat;

/// Configuration format version this crate reads and writes.
pub const CONFIG_VERSION: &str = "1.0";

/// Settings controlling table detection.
///
/// # Examples
///
/// ```
/// # use smart_selftest_parser::config::ParseConfig;
/// use smart_selftest_core::ReportFormat;
///
/// let config = ParseConfig::default();
/// assert_eq!(config.formats, ReportFormat::PRIORITY.to_vec());
///
/// let nvme_only: ParseConfig = serde_yaml::from_str("formats: [nvme]").unwrap();
/// assert_eq!(nvme_only.formats, vec![ReportFormat::Nvme]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseConfig {
    /// Formats the detector may pick. Detection order is always
    /// ATA, NVMe, SCSI regardless of the order listed here.
    #[serde(default = "all_formats")]
    pub formats: Vec<ReportFormat>,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            formats: all_formats(),
        }
    }
}

fn all_formats() -> Vec<ReportFormat> {
    ReportFormat::PRIORITY.to_vec()
}

/// Settings controlling rendered output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    /// Keep the diagnostics block in rendered reports.
    #[serde(default)]
    pub include_diagnostics: bool,
}

/// Top-level configuration file.
///
/// # Examples
///
/// ```no_run
/// use smart_selftest_parser::config::ReportConfig;
///
/// let config = ReportConfig::load("smart-selftest.yml").unwrap();
/// println!("{:?}", config.output.format);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Configuration format version (e.g., `"1.0"`).
    pub version: String,
    #[serde(default)]
    pub parsing: ParseConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION.to_string(),
            parsing: ParseConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl ReportConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](SelfTestError::IoError) if the file cannot be
    /// read, [`YamlError`](SelfTestError::YamlError) if parsing fails, or
    /// [`UnsupportedConfigVersion`](SelfTestError::UnsupportedConfigVersion)
    /// for a version other than [`CONFIG_VERSION`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config: Self = serde_yaml::from_reader(reader)?;
        if config.version != CONFIG_VERSION {
            return Err(SelfTestError::UnsupportedConfigVersion(config.version));
        }
        Ok(config)
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](SelfTestError::IoError) if the file cannot be
    /// written, or [`YamlError`](SelfTestError::YamlError) if serialization
    /// fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");

        let config = ReportConfig {
            parsing: ParseConfig {
                formats: vec![ReportFormat::Nvme, ReportFormat::Scsi],
            },
            output: OutputConfig {
                format: OutputFormat::Markdown,
                include_diagnostics: true,
            },
            ..Default::default()
        };
        config.save(&path).unwrap();

        assert_eq!(ReportConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config: ReportConfig = serde_yaml::from_str("version: \"1.0\"\n").unwrap();
        assert_eq!(config.parsing, ParseConfig::default());
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(!config.output.include_diagnostics);
    }

    #[test]
    fn test_lowercase_format_names() {
        let yaml = "version: \"1.0\"\nparsing:\n  formats: [scsi]\noutput:\n  format: table\n";
        let config: ReportConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.parsing.formats, vec![ReportFormat::Scsi]);
        assert_eq!(config.output.format, OutputFormat::Table);
    }

    #[test]
    fn test_unsupported_version_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        std::fs::write(&path, "version: \"9.9\"\n").unwrap();

        let err = ReportConfig::load(&path).unwrap_err();
        assert!(matches!(err, SelfTestError::UnsupportedConfigVersion(v) if v == "9.9"));
    }
}
