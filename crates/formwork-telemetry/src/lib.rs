//! Logging setup for formwork services.
//!
//! The formwork library crates emit `tracing` events and never install a
//! subscriber themselves. Applications call [`init_logging`] once at startup
//! to route those events to stdout, either as JSON lines or as pretty text.
//!
//! # Example
//!
//! ```rust,no_run
//! use formwork_telemetry::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::development()).expect("logging");
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, init_logging, LogConfig};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
