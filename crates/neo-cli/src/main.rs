//! NEO Tracker CLI
//!
//! Command-line interface for the near-Earth asteroid close-approach
//! dashboard: serve it, run catalog reports, filter approaches and seed a
//! development database.

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use neo_core::ReportId;
use neo_observability::{init_logging_with_config, LoggingConfig};
use std::path::{Path, PathBuf};

mod commands;
mod config;
mod output;
mod validator;

use commands::{
    list_reports, run_filter, run_import, run_migrate, run_report_command, run_server,
    FilterArgs, ServeConfig,
};
use config::AppConfig;
use output::OutputFormat;
use validator::ConfigValidator;

const DEFAULT_CONFIG_FILE: &str = "neo-tracker.yaml";

#[derive(Parser)]
#[command(name = "neo-tracker")]
#[command(author = "NEO Tracker Team")]
#[command(version)]
#[command(about = "Near-Earth asteroid close-approach dashboard", long_about = None)]
struct Cli {
    /// Configuration file path [default: ./neo-tracker.yaml if present]
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Database URL (sqlite: or mysql://), overrides config and DATABASE_URL
    #[arg(short, long, global = true)]
    database: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    /// Output format (text, json)
    #[arg(long, default_value = "text", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the dashboard and API server
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Disable Swagger UI
        #[arg(long)]
        no_swagger: bool,

        /// Validate configuration and exit without starting the server
        #[arg(long)]
        validate_only: bool,

        /// Apply schema migrations before serving
        #[arg(long)]
        migrate: bool,
    },

    /// Run a catalog report
    Report {
        /// Report number (1-15)
        #[arg(required_unless_present = "list")]
        id: Option<ReportId>,

        /// List the catalog instead of running a report
        #[arg(short, long)]
        list: bool,
    },

    /// Filter close approaches
    Filter(FilterArgs),

    /// Load asteroid and close-approach CSV files into the database
    Import {
        /// Asteroids CSV file
        #[arg(long, value_name = "FILE")]
        asteroids: PathBuf,

        /// Close approaches CSV file
        #[arg(long, value_name = "FILE")]
        approaches: PathBuf,
    },

    /// Apply database schema migrations
    Migrate,

    /// Validate a configuration file
    Validate,

    /// Show current configuration
    Config {
        /// Show secrets (redacted by default)
        #[arg(long)]
        show_secrets: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(&cli)?;
    let config_file = config_path(&cli);

    let level = match (&cli.log_level, cli.verbose) {
        (Some(level), _) => level.clone(),
        (None, true) => "debug".to_string(),
        (None, false) => config.logging.level.clone(),
    };
    if let Err(e) = init_logging_with_config(LoggingConfig::from_level_name(
        &level,
        cli.json_logs || config.logging.json,
    )) {
        eprintln!("{}: {}", "Failed to initialize logging".yellow(), e);
    }

    match cli.command {
        Commands::Serve {
            port,
            host,
            no_swagger,
            validate_only,
            migrate,
        } => {
            let mut serve_config = ServeConfig::from_app_config(&config);
            if let Some(port) = port {
                serve_config.port = port;
            }
            if let Some(host) = host {
                serve_config.host = host;
            }
            if no_swagger {
                serve_config.enable_swagger = false;
            }
            serve_config.migrate = migrate;
            cmd_serve(serve_config, config, validate_only).await
        }
        Commands::Report { id, list } => match id {
            Some(id) if !list => run_report_command(&config, id, cli.format).await,
            _ => list_reports(cli.format),
        },
        Commands::Filter(args) => run_filter(&config, &args, cli.format).await,
        Commands::Import {
            asteroids,
            approaches,
        } => run_import(&config, &asteroids, &approaches)
            .await
            .map(|_| ()),
        Commands::Migrate => run_migrate(&config).await,
        Commands::Validate => cmd_validate(&config, &config_file),
        Commands::Config { show_secrets } => cmd_config(config, show_secrets, cli.format),
    }
}

fn config_path(cli: &Cli) -> PathBuf {
    cli.config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

/// File (explicit, or the default file when present), then environment,
/// then command-line flags.
fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            AppConfig::load(Path::new(DEFAULT_CONFIG_FILE))?
        }
        None => AppConfig::default(),
    };

    config.apply_env_overrides();

    if let Some(database) = &cli.database {
        config.database.url = database.clone();
    }
    Ok(config)
}

async fn cmd_serve(serve_config: ServeConfig, app_config: AppConfig, validate_only: bool) -> Result<()> {
    println!("{}", "Validating configuration...".cyan());

    let validation_result = ConfigValidator::validate(&app_config);
    validation_result.print();

    if validation_result.has_errors() {
        println!();
        bail!("Configuration validation failed. Fix the errors above before starting the server.");
    }

    if validate_only {
        println!();
        println!(
            "{}",
            "Configuration is valid. Server can be started."
                .green()
                .bold()
        );
        return Ok(());
    }

    println!();
    run_server(serve_config, &app_config).await
}

fn cmd_validate(config: &AppConfig, config_path: &Path) -> Result<()> {
    println!(
        "Validating configuration: {}",
        config_path.display().to_string().cyan()
    );
    if !config_path.exists() {
        println!("  (file not found, validating defaults and environment)");
    }

    let validation_result = ConfigValidator::validate(config);
    validation_result.print();

    let redacted = config.redact_secrets();
    println!();
    println!("{}", "Configuration Summary".bold());
    println!("─────────────────────");
    println!("  Database: {}", redacted.database.url);
    println!(
        "  Pool: {}-{} connections",
        redacted.database.min_connections, redacted.database.max_connections
    );
    println!("  Listen: {}:{}", redacted.server.host, redacted.server.port);

    println!();
    if validation_result.has_errors() {
        bail!("Configuration validation failed. Fix the errors above.");
    } else if validation_result.has_warnings() {
        println!(
            "{}",
            "Configuration is valid with warnings. Review the warnings above."
                .yellow()
                .bold()
        );
    } else {
        println!("{}", "Configuration is valid.".green().bold());
    }

    Ok(())
}

fn cmd_config(config: AppConfig, show_secrets: bool, format: OutputFormat) -> Result<()> {
    let display_config = if show_secrets {
        config
    } else {
        config.redact_secrets()
    };

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&display_config)?);
    } else {
        println!("{}", "Current Configuration".bold());
        println!("─────────────────────────");
        print!("{}", serde_yaml::to_string(&display_config)?);
    }

    Ok(())
}
