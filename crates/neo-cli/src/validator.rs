//! Startup validation of the CLI configuration.
//!
//! Errors prevent the server from starting; warnings are printed and
//! startup continues.

use crate::config::AppConfig;
use colored::Colorize;
use neo_core::db::SqlDialect;
use std::str::FromStr;

/// Result of configuration validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Critical errors that prevent startup.
    pub errors: Vec<String>,
    /// Warnings that should be addressed but don't prevent startup.
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// Creates a new empty validation result.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Prints the validation result to the console.
    pub fn print(&self) {
        if !self.warnings.is_empty() {
            println!();
            println!("{}", "Configuration Warnings:".yellow().bold());
            for warning in &self.warnings {
                println!("  {} {}", "⚠".yellow(), warning);
            }
        }

        if !self.errors.is_empty() {
            println!();
            println!("{}", "Configuration Errors:".red().bold());
            for error in &self.errors {
                println!("  {} {}", "✗".red(), error);
            }
        }

        if self.errors.is_empty() && self.warnings.is_empty() {
            println!("  {} Configuration OK", "✓".green());
        }
    }
}

/// Validates application configuration before startup.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates the application configuration.
    pub fn validate(config: &AppConfig) -> ValidationResult {
        let mut result = ValidationResult::new();

        Self::validate_database_url(config, &mut result);
        Self::validate_pool(config, &mut result);
        Self::validate_server(config, &mut result);
        Self::validate_logging(config, &mut result);

        result
    }

    fn validate_database_url(config: &AppConfig, result: &mut ValidationResult) {
        let url = &config.database.url;

        match SqlDialect::from_url(url) {
            None => result.add_error(format!(
                "Invalid database URL '{}'. Must start with sqlite: or mysql://",
                config.redact_secrets().database.url
            )),
            Some(SqlDialect::Sqlite) if url.contains(":memory:") => result.add_warning(
                "In-memory SQLite database: the dataset is lost when the process exits. \
                 Run `neo-tracker import` in the same process or use a file URL.",
            ),
            Some(_) => {}
        }
    }

    fn validate_pool(config: &AppConfig, result: &mut ValidationResult) {
        let db = &config.database;

        if db.max_connections == 0 {
            result.add_error("database.max_connections must be at least 1");
        }
        if db.min_connections > db.max_connections {
            result.add_error(format!(
                "database.min_connections ({}) exceeds database.max_connections ({})",
                db.min_connections, db.max_connections
            ));
        }
        if db.acquire_timeout_secs == 0 {
            result.add_warning(
                "database.acquire_timeout_secs is 0: requests fail immediately \
                 whenever every connection is busy",
            );
        }
    }

    fn validate_server(config: &AppConfig, result: &mut ValidationResult) {
        if config.server.port == 0 {
            result.add_warning("server.port is 0: the OS will pick a random port");
        }
        if config.server.host.trim().is_empty() {
            result.add_error("server.host must not be empty");
        }
    }

    fn validate_logging(config: &AppConfig, result: &mut ValidationResult) {
        if tracing::Level::from_str(&config.logging.level).is_err() {
            result.add_warning(format!(
                "Unknown log level '{}'. Falling back to info.",
                config.logging.level
            ));
        }
    }
}
