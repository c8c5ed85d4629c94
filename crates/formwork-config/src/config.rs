//! Main configuration types.
//!
//! This module provides the top-level [`FormworkConfig`] struct and its builder.

use serde::{Deserialize, Serialize};

use formwork_extract::ParseConfig;
use formwork_telemetry::LogConfig;

use crate::{ConfigError, LogFormat, LoggingSection, ParserSection};

/// Complete formwork configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load configuration from files
/// and environment variables.
///
/// # Example
///
/// ```
/// use formwork_config::FormworkConfig;
/// use formwork_extract::Parser;
///
/// let config = FormworkConfig::default();
/// let parser = Parser::new(config.parse_config());
///
/// assert_eq!(parser.config().max_fields, 1000);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct FormworkConfig {
    /// Request parsing limits.
    #[serde(default)]
    pub parser: ParserSection,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSection,
}

impl FormworkConfig {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```
    /// use formwork_config::{FormworkConfig, ParserSection};
    ///
    /// let config = FormworkConfig::builder()
    ///     .parser(ParserSection {
    ///         max_fields: 50,
    ///         ..Default::default()
    ///     })
    ///     .build();
    ///
    /// assert_eq!(config.parser.max_fields, 50);
    /// ```
    #[must_use]
    pub fn builder() -> FormworkConfigBuilder {
        FormworkConfigBuilder::new()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - A parser limit is zero
    /// - `max_field_size` is larger than `max_body_size`
    /// - The log level is not a valid filter directive
    pub fn validate(&self) -> Result<(), ConfigError> {
        let parser = &self.parser;

        for (field, value) in [
            ("parser.max_body_size", parser.max_body_size),
            ("parser.max_field_size", parser.max_field_size),
            ("parser.max_fields", parser.max_fields),
        ] {
            if value == 0 {
                return Err(ConfigError::invalid_value(field, "must be greater than 0"));
            }
        }

        if parser.max_field_size > parser.max_body_size {
            return Err(ConfigError::invalid_value(
                "parser.max_field_size",
                format!(
                    "{} exceeds parser.max_body_size ({})",
                    parser.max_field_size, parser.max_body_size
                ),
            ));
        }

        if self.logging.enabled {
            formwork_telemetry::create_env_filter(&self.logging.level)
                .map_err(|e| ConfigError::invalid_value("logging.level", e.to_string()))?;
        }

        Ok(())
    }

    /// Parser limits for [`formwork_extract::Parser::new`].
    #[must_use]
    pub fn parse_config(&self) -> ParseConfig {
        ParseConfig::from(&self.parser)
    }

    /// Logging setup for [`formwork_telemetry::init_logging`].
    #[must_use]
    pub fn log_config(&self) -> LogConfig {
        LogConfig::from(&self.logging)
    }

    /// Create a development configuration preset.
    ///
    /// Pretty debug-level logs with source locations.
    ///
    /// # Example
    ///
    /// ```
    /// use formwork_config::{FormworkConfig, LogFormat};
    ///
    /// let config = FormworkConfig::development();
    /// assert_eq!(config.logging.format, LogFormat::Pretty);
    /// ```
    #[must_use]
    pub fn development() -> Self {
        Self {
            parser: ParserSection::default(),
            logging: LoggingSection {
                enabled: true,
                level: "debug".to_string(),
                format: LogFormat::Pretty,
                include_location: true,
                thread_ids: false,
                span_events: true,
            },
        }
    }

    /// Create a production configuration preset.
    ///
    /// JSON info-level logs.
    #[must_use]
    pub fn production() -> Self {
        Self {
            parser: ParserSection::default(),
            logging: LoggingSection {
                enabled: true,
                level: "info".to_string(),
                format: LogFormat::Json,
                include_location: false,
                thread_ids: false,
                span_events: false,
            },
        }
    }
}

/// Builder for [`FormworkConfig`].
#[derive(Debug, Default)]
pub struct FormworkConfigBuilder {
    parser: Option<ParserSection>,
    logging: Option<LoggingSection>,
}

impl FormworkConfigBuilder {
    /// Create a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the parser section.
    #[must_use]
    pub fn parser(mut self, parser: ParserSection) -> Self {
        self.parser = Some(parser);
        self
    }

    /// Set the logging section.
    #[must_use]
    pub fn logging(mut self, logging: LoggingSection) -> Self {
        self.logging = Some(logging);
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> FormworkConfig {
        FormworkConfig {
            parser: self.parser.unwrap_or_default(),
            logging: self.logging.unwrap_or_default(),
        }
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if validation fails.
    pub fn build_validated(self) -> Result<FormworkConfig, ConfigError> {
        let config = self.build();
        config.validate()?;
        Ok(config)
    }
}
