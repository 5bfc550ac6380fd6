use anyhow::{Context, Result};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend, Statement};
use std::time::Duration;
use tracing::info;

use crate::config::MysqlConfig;
use crate::domain::ServerVersion;

pub mod statements;

/// An open connection plus the server version probed when it was opened.
pub struct Provider {
    pub conn: DatabaseConnection,
    pub server_version: ServerVersion,
}

impl Provider {
    #[must_use]
    pub const fn new(conn: DatabaseConnection, server_version: ServerVersion) -> Self {
        Self {
            conn,
            server_version,
        }
    }

    pub async fn connect(config: &MysqlConfig) -> Result<Self> {
        let mut opt = ConnectOptions::new(config.database_url());
        opt.max_connections(config.max_connections)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .sqlx_logging(false);

        let conn = Database::connect(opt)
            .await
            .with_context(|| format!("Failed to connect to MySQL at {}", config.endpoint))?;

        let server_version = probe_server_version(&conn).await?;

        info!(
            "Connected to MySQL {} at {} (pool: 1-{})",
            server_version, config.endpoint, config.max_connections
        );

        Ok(Self::new(conn, server_version))
    }
}

pub async fn probe_server_version(conn: &DatabaseConnection) -> Result<ServerVersion> {
    let row = conn
        .query_one(Statement::from_string(
            DbBackend::MySql,
            "SELECT VERSION() AS version".to_string(),
        ))
        .await
        .context("Failed to query server version")?
        .context("Server returned no version row")?;

    let raw: String = row
        .try_get("", "version")
        .context("Failed to read server version")?;

    raw.parse()
        .with_context(|| format!("Failed to parse server version '{raw}'"))
}
