//! # neo-observability
//!
//! Structured logging for the NEO Tracker, built on `tracing`.

pub mod logging;

pub use logging::{init_logging_with_config, LoggingConfig};
