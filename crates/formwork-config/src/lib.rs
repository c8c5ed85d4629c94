//! Configuration for formwork parsers and logging.
//!
//! [`FormworkConfig`] has two sections:
//!
//! - [`ParserSection`] - body, memory, field and part limits, converted into a
//!   [`formwork_extract::ParseConfig`]
//! - [`LoggingSection`] - filter level and output format, converted into a
//!   [`formwork_telemetry::LogConfig`]
//!
//! Unknown sections and keys are rejected when a file is parsed.
//!
//! # Example
//!
//! ```no_run
//! use formwork_config::ConfigLoader;
//! use formwork_extract::Parser;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConfigLoader::new()
//!     .with_dotenv()?
//!     .with_optional_file("formwork.toml")?
//!     .with_env_prefix("FORMWORK")
//!     .load()?;
//!
//! formwork_telemetry::init_logging(&config.log_config())?;
//! let parser = Parser::new(config.parse_config());
//! # let _ = parser;
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! [parser]
//! max_body_size = 52428800
//! max_memory = 10485760
//! max_field_size = 10485760
//! max_fields = 1000
//!
//! [logging]
//! enabled = true
//! level = "info,formwork_extract=debug"
//! format = "json"
//! include_location = false
//! ```
//!
//! # Environment Variable Overrides
//!
//! Keys follow `PREFIX__SECTION__KEY`:
//!
//! - `FORMWORK__PARSER__MAX_BODY_SIZE=1048576`
//! - `FORMWORK__LOGGING__LEVEL=debug`
//! - `FORMWORK__LOGGING__FORMAT=pretty`

#![warn(missing_docs)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::*;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
