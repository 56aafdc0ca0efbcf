//! Configuration loading and validation.
//!
//! The configuration is a TOML file with four required sections. Unknown
//! keys are rejected and required keys have no default, so a typo fails at
//! startup instead of silently changing behavior.

use crate::constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_CONFIG_RELATIVE_PATH, DEFAULT_KLA_PATTERN, kla,
};
use crate::encoding::TextEncoding;
use crate::error::{CultureError, Result};
use crate::plotter::theme::Theme;
use crate::table::TableFormat;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Complete culture-plotter configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub data_loader: DataLoaderConfig,
    pub data_processor: DataProcessorConfig,
    pub plotter: PlotterConfig,
    pub logging: LoggingConfig,
}

/// Input file locations and their text layout
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataLoaderConfig {
    pub offline_file: PathBuf,
    pub online_file: PathBuf,
    pub kla_dir: PathBuf,
    /// Single ASCII character separating fields of the offline/online files
    pub column_separator: String,
    /// Decimal mark used by the offline/online files
    pub decimal_separator: String,
    pub encoding: TextEncoding,

    #[serde(default = "default_kla_encoding")]
    pub kla_encoding: TextEncoding,
    #[serde(default = "default_kla_marker")]
    pub kla_marker: String,
    #[serde(default = "default_kla_pattern")]
    pub kla_pattern: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataProcessorConfig {
    /// Online columns coerced to numbers after loading
    pub online_numeric_columns: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlotterConfig {
    /// Culture chart size in inches
    pub figsize_main: [f64; 2],
    /// kLa chart size in inches
    pub figsize_kla: [f64; 2],
    pub style: Theme,
    pub plot_dir: PathBuf,
    pub dpi: u32,
    /// Text drawn under the culture chart together with today's date
    #[serde(default)]
    pub footer: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    pub handlers: Vec<HandlerConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Full,
    Compact,
    Pretty,
}

/// Log destination
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum HandlerConfig {
    /// Standard error, with colors
    Stream,
    /// Appended to a file, without colors
    File { path: PathBuf },
}

fn default_kla_encoding() -> TextEncoding {
    TextEncoding::Utf16Le
}

fn default_kla_marker() -> String {
    kla::HEADER_MARKER.to_string()
}

fn default_kla_pattern() -> String {
    DEFAULT_KLA_PATTERN.to_string()
}

impl Config {
    /// Read, parse and validate a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CultureError::configuration(format!(
                "configuration file not found: {}",
                path.display()
            )));
        }

        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&text).map_err(|e| match e {
            CultureError::Configuration { message } => {
                CultureError::configuration(format!("{}: {}", path.display(), message))
            }
            other => other,
        })?;

        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse and validate configuration text
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(text).map_err(|e| CultureError::configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Semantic checks that the type system does not cover
    pub fn validate(&self) -> Result<()> {
        self.data_loader.delimiter()?;
        self.data_loader.decimal()?;

        if self.data_loader.kla_marker.trim().is_empty() {
            return Err(CultureError::configuration(
                "data_loader.kla_marker must not be empty",
            ));
        }
        if self.data_loader.kla_pattern.trim().is_empty() {
            return Err(CultureError::configuration(
                "data_loader.kla_pattern must not be empty",
            ));
        }

        for (key, size) in [
            ("figsize_main", self.plotter.figsize_main),
            ("figsize_kla", self.plotter.figsize_kla),
        ] {
            if size.iter().any(|v| !v.is_finite() || *v <= 0.0) {
                return Err(CultureError::configuration(format!(
                    "plotter.{} must contain two positive numbers, got {:?}",
                    key, size
                )));
            }
        }

        if self.plotter.dpi == 0 {
            return Err(CultureError::configuration("plotter.dpi must be positive"));
        }

        if self.logging.handlers.is_empty() {
            return Err(CultureError::configuration(
                "logging.handlers must name at least one handler",
            ));
        }

        Ok(())
    }
}

impl DataLoaderConfig {
    /// Field delimiter as a byte
    pub fn delimiter(&self) -> Result<u8> {
        let mut chars = self.column_separator.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii() => Ok(c as u8),
            _ => Err(CultureError::configuration(format!(
                "data_loader.column_separator must be a single ASCII character, got {:?}",
                self.column_separator
            ))),
        }
    }

    pub fn decimal(&self) -> Result<char> {
        let mut chars = self.decimal_separator.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(CultureError::configuration(format!(
                "data_loader.decimal_separator must be a single character, got {:?}",
                self.decimal_separator
            ))),
        }
    }

    /// Layout of the offline and online files
    pub fn table_format(&self) -> Result<TableFormat> {
        Ok(TableFormat::new(
            self.delimiter()?,
            self.decimal()?,
            self.encoding,
        ))
    }
}

impl PlotterConfig {
    /// Pixel size of a chart: inches times dpi
    pub fn pixel_size(&self, figsize: [f64; 2]) -> (u32, u32) {
        let dpi = self.dpi as f64;
        (
            (figsize[0] * dpi).round() as u32,
            (figsize[1] * dpi).round() as u32,
        )
    }
}

/// Resolve a configured path against the project root
pub fn resolve_path(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// Find the configuration file
///
/// Lookup order: the explicit path, `<root>/config/config.toml`, then
/// `culture-plotter/config.toml` in the user configuration directory.
pub fn find_config_path(explicit: Option<&Path>, root: &Path) -> Result<PathBuf> {
    if let Some(path) = explicit {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        return Err(CultureError::configuration(format!(
            "configuration file not found: {}",
            path.display()
        )));
    }

    let mut searched = vec![root.join(DEFAULT_CONFIG_RELATIVE_PATH)];
    if let Some(config_dir) = dirs::config_dir() {
        searched.push(config_dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME));
    }

    if let Some(found) = searched.iter().find(|path| path.exists()) {
        return Ok(found.clone());
    }

    let listed: Vec<String> = searched.iter().map(|p| p.display().to_string()).collect();
    Err(CultureError::configuration(format!(
        "no configuration file found, searched: {}",
        listed.join(", ")
    )))
}
