//! Configuration schema types.
//!
//! This module defines the structure of all configuration sections.

use serde::{Deserialize, Serialize};

use formwork_extract::{
    ParseConfig, DEFAULT_MAX_BODY_SIZE, DEFAULT_MAX_FIELDS, DEFAULT_MAX_FIELD_SIZE,
    DEFAULT_MAX_MEMORY,
};
use formwork_telemetry::LogConfig;

/// Request parsing limits.
///
/// # Example
///
/// ```
/// use formwork_config::ParserSection;
/// use formwork_extract::ParseConfig;
///
/// let section = ParserSection {
///     max_body_size: 1024 * 1024,
///     ..Default::default()
/// };
///
/// let parse_config = ParseConfig::from(&section);
/// assert_eq!(parse_config.max_body_size, 1024 * 1024);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ParserSection {
    /// Maximum request body size in bytes.
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,

    /// Bytes of uploaded file content kept in memory before spilling to disk.
    #[serde(default = "default_max_memory")]
    pub max_memory: usize,

    /// Maximum size of one multipart text field in bytes.
    #[serde(default = "default_max_field_size")]
    pub max_field_size: usize,

    /// Maximum number of multipart parts.
    #[serde(default = "default_max_fields")]
    pub max_fields: usize,
}

impl Default for ParserSection {
    fn default() -> Self {
        Self {
            max_body_size: default_max_body_size(),
            max_memory: default_max_memory(),
            max_field_size: default_max_field_size(),
            max_fields: default_max_fields(),
        }
    }
}

fn default_max_body_size() -> usize {
    DEFAULT_MAX_BODY_SIZE
}

fn default_max_memory() -> usize {
    DEFAULT_MAX_MEMORY
}

fn default_max_field_size() -> usize {
    DEFAULT_MAX_FIELD_SIZE
}

fn default_max_fields() -> usize {
    DEFAULT_MAX_FIELDS
}

impl From<&ParserSection> for ParseConfig {
    fn from(section: &ParserSection) -> Self {
        ParseConfig::new()
            .max_body_size(section.max_body_size)
            .max_memory(section.max_memory)
            .max_field_size(section.max_field_size)
            .max_fields(section.max_fields)
    }
}

/// Log format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON formatted logs (production).
    #[default]
    Json,
    /// Human-readable pretty format (development).
    Pretty,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingSection {
    /// Enable logging.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Filter directive, e.g. `info` or `warn,formwork_extract=debug`.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Include source file and line in logs.
    #[serde(default)]
    pub include_location: bool,

    /// Include thread IDs in logs.
    #[serde(default)]
    pub thread_ids: bool,

    /// Log span open and close events.
    #[serde(default)]
    pub span_events: bool,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
            include_location: false,
            thread_ids: false,
            span_events: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

impl From<&LoggingSection> for LogConfig {
    fn from(section: &LoggingSection) -> Self {
        LogConfig {
            enabled: section.enabled,
            level: section.level.clone(),
            json_format: section.format == LogFormat::Json,
            span_events: section.span_events,
            file_line_info: section.include_location,
            thread_ids: section.thread_ids,
            ..LogConfig::default()
        }
    }
}
