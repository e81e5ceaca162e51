//! Serve command - starts the dashboard and API server.

use anyhow::{Context, Result};
use colored::Colorize;
use neo_api::{ApiServer, ApiServerConfig, AppState};
use neo_core::db::run_migrations;
use std::net::SocketAddr;

use super::open_database;
use crate::config::AppConfig;

/// Server settings after CLI flags are applied over the config file.
#[derive(Debug, Clone)]
pub struct ServeConfig {
    pub host: String,
    pub port: u16,
    pub enable_swagger: bool,
    /// Apply schema migrations before serving. Without it, serving never
    /// writes to the database.
    pub migrate: bool,
}

impl ServeConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            host: config.server.host.clone(),
            port: config.server.port,
            enable_swagger: config.server.enable_swagger,
            migrate: false,
        }
    }

    pub fn bind_address(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid bind address {}:{}", self.host, self.port))
    }
}

/// Opens the database and builds the server without starting it.
///
/// Nothing is written unless `config.migrate` is set.
pub async fn prepare_server(config: &ServeConfig, app_config: &AppConfig) -> Result<ApiServer> {
    let bind_address = config.bind_address()?;
    let db_pool = open_database(app_config).await?;

    if config.migrate {
        println!("  {} Running migrations...", "→".green());
        run_migrations(&db_pool)
            .await
            .context("Failed to run database migrations")?;
        println!("  {} Migrations complete", "✓".green());
    }

    let server_config = ApiServerConfig {
        bind_address,
        enable_swagger: config.enable_swagger,
    };
    Ok(ApiServer::new(AppState::new(db_pool), server_config))
}

/// Serves until Ctrl+C or SIGTERM.
pub async fn run_server(config: ServeConfig, app_config: &AppConfig) -> Result<()> {
    println!("{} Starting NEO Tracker...", "[server]".cyan());

    let database_url = app_config.redact_secrets().database.url;
    let bind_address = config.bind_address()?;

    println!("  {} Database: {}", "→".green(), database_url);
    let server = prepare_server(&config, app_config).await?;

    println!();
    println!("{}", "NEO Tracker".bold());
    println!("{}", "═".repeat(40));
    println!("  {} http://{}", "Dashboard:".cyan(), bind_address);
    println!("  {} {}", "Database:".cyan(), database_url);
    if config.enable_swagger {
        println!(
            "  {} http://{}/swagger-ui",
            "Swagger UI:".cyan(),
            bind_address
        );
    }

    println!();
    println!("{}", "Endpoints:".bold());
    println!("  GET  /filter                  - Close-approach filter");
    println!("  GET  /queries?report=N        - Catalog report N");
    println!("  GET  /api/v1/reports          - List reports");
    println!("  GET  /api/v1/reports/:id      - Run report");
    println!("  GET  /api/v1/approaches       - Filter approaches");
    println!("  GET  /health                  - Health check");
    println!();
    println!("Press {} to stop", "Ctrl+C".yellow());
    println!();

    server.run().await.context("Server error")?;

    println!();
    println!("{} Server stopped", "[server]".cyan());

    Ok(())
}
