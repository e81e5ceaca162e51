//! Testcontainers support for integration tests.
//!
//! Starts a MySQL server matching the published dataset's backend.
//!
//! Usage:
//! ```ignore
//! use crate::integration::testcontainers_support::*;
//!
//! #[tokio::test]
//! async fn test_with_mysql() {
//!     let mysql = start_mysql().await;
//!     let db = create_mysql_pool(&mysql).await;
//!     // ... run tests
//! }
//! ```

use neo_core::db::{create_pool, run_migrations, DbPool};
use std::time::Duration;
use testcontainers::{
    core::{IntoContainerPort, WaitFor},
    runners::AsyncRunner,
    ContainerAsync, GenericImage, ImageExt,
};

/// MySQL container configuration.
pub struct MySqlContainer {
    pub container: ContainerAsync<GenericImage>,
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
}

impl MySqlContainer {
    /// Returns the connection URL for this container.
    pub fn connection_url(&self) -> String {
        format!(
            "mysql://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.database
        )
    }
}

/// Starts a MySQL 8.0 container for testing.
///
/// The container is configured with:
/// - Database: nasa_neo_test
/// - Username: test
/// - Password: test
pub async fn start_mysql() -> MySqlContainer {
    // The entrypoint's temporary init server logs "port: 0", so this line
    // only appears once the real server is listening.
    let image = GenericImage::new("mysql", "8.0")
        .with_exposed_port(3306.tcp())
        .with_wait_for(WaitFor::message_on_stderr(
            "port: 3306  MySQL Community Server",
        ))
        .with_env_var("MYSQL_DATABASE", "nasa_neo_test")
        .with_env_var("MYSQL_USER", "test")
        .with_env_var("MYSQL_PASSWORD", "test")
        .with_env_var("MYSQL_ROOT_PASSWORD", "root");

    let container = AsyncRunner::start(image)
        .await
        .expect("Failed to start MySQL container");

    tokio::time::sleep(Duration::from_secs(1)).await;

    let host = container.get_host().await.expect("Failed to get host");
    let port = container
        .get_host_port_ipv4(3306)
        .await
        .expect("Failed to get port");

    MySqlContainer {
        container,
        host: host.to_string(),
        port,
        database: "nasa_neo_test".to_string(),
        username: "test".to_string(),
        password: "test".to_string(),
    }
}

/// Connects to the container and applies the MySQL migrations.
pub async fn create_mysql_pool(mysql: &MySqlContainer) -> DbPool {
    let db = create_pool(&mysql.connection_url())
        .await
        .expect("Failed to create MySQL pool");

    run_migrations(&db)
        .await
        .expect("Failed to run MySQL migrations");

    db
}
