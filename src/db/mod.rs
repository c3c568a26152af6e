//! Relational command gateway.
//!
//! Runs parameterized command text against a single open connection and hands
//! back affected-row counts or rows of text values. It knows nothing about
//! accounts; failures are returned as-is without retries.

use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DatabaseTransaction, DbErr,
    SqlErr, Statement, TransactionTrait,
};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::config::DatabaseConfig;

pub mod params;
pub mod row;
pub mod schema;

pub use params::Params;
pub use row::Row;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("No value bound for parameter ${0}")]
    MissingParameter(String),

    #[error("Failed to prepare database file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GatewayError {
    /// True when the store rejected a write because of a unique index.
    #[must_use]
    pub fn is_unique_violation(&self) -> bool {
        match self {
            Self::Database(err) => {
                matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
            }
            _ => false,
        }
    }
}

/// Executes commands over one connection held for the gateway's lifetime.
///
/// Each request is expected to open its own gateway; it is deliberately not
/// `Clone`.
#[derive(Debug)]
pub struct CommandGateway {
    conn: DatabaseConnection,
}

impl CommandGateway {
    /// Opens a single connection described by `config`.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, GatewayError> {
        prepare_sqlite_file(&config.url).await?;

        let timeout = Duration::from_secs(config.connect_timeout_secs);
        let mut opt = ConnectOptions::new(config.url.clone());
        opt.max_connections(1)
            .min_connections(1)
            .connect_timeout(timeout)
            .acquire_timeout(timeout)
            .sqlx_logging(config.sqlx_logging);

        let conn = Database::connect(opt).await?;
        debug!(backend = ?conn.get_database_backend(), "Database connection opened");

        Ok(Self { conn })
    }

    /// Opens a connection to `url` with default settings.
    pub async fn open(url: &str) -> Result<Self, GatewayError> {
        let config = DatabaseConfig {
            url: url.to_string(),
            ..DatabaseConfig::default()
        };
        Self::connect(&config).await
    }

    #[must_use]
    pub const fn from_connection(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }

    /// Runs a command and returns the number of rows it affected.
    pub async fn execute(&self, command_text: &str, params: &Params) -> Result<u64, GatewayError> {
        execute_on(&self.conn, command_text, params).await
    }

    /// Runs a command and returns every row it produced.
    pub async fn query(
        &self,
        command_text: &str,
        params: &Params,
    ) -> Result<Vec<Row>, GatewayError> {
        query_on(&self.conn, command_text, params).await
    }

    /// Starts a transaction scoped to the returned guard.
    ///
    /// Dropping the guard without [`GatewayTransaction::commit`] rolls back.
    pub async fn begin(&self) -> Result<GatewayTransaction, GatewayError> {
        let txn = self.conn.begin().await?;
        Ok(GatewayTransaction { txn })
    }

    pub async fn ping(&self) -> Result<(), GatewayError> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1"))
            .await?;
        Ok(())
    }

    /// Releases the connection.
    pub async fn close(self) -> Result<(), GatewayError> {
        self.conn.close().await?;
        Ok(())
    }
}

/// Open transaction on the gateway's connection.
pub struct GatewayTransaction {
    txn: DatabaseTransaction,
}

impl GatewayTransaction {
    pub async fn execute(&self, command_text: &str, params: &Params) -> Result<u64, GatewayError> {
        execute_on(&self.txn, command_text, params).await
    }

    pub async fn query(
        &self,
        command_text: &str,
        params: &Params,
    ) -> Result<Vec<Row>, GatewayError> {
        query_on(&self.txn, command_text, params).await
    }

    pub async fn commit(self) -> Result<(), GatewayError> {
        self.txn.commit().await?;
        Ok(())
    }

    pub async fn rollback(self) -> Result<(), GatewayError> {
        self.txn.rollback().await?;
        Ok(())
    }
}

async fn execute_on<C: ConnectionTrait>(
    conn: &C,
    command_text: &str,
    params: &Params,
) -> Result<u64, GatewayError> {
    let backend = conn.get_database_backend();
    let (sql, values) = params::compile(command_text, params, backend)?;
    let result = conn
        .execute(Statement::from_sql_and_values(backend, sql, values))
        .await?;
    Ok(result.rows_affected())
}

async fn query_on<C: ConnectionTrait>(
    conn: &C,
    command_text: &str,
    params: &Params,
) -> Result<Vec<Row>, GatewayError> {
    let backend = conn.get_database_backend();
    let (sql, values) = params::compile(command_text, params, backend)?;
    let results = conn
        .query_all(Statement::from_sql_and_values(backend, sql, values))
        .await?;

    results
        .iter()
        .map(|result| Row::from_query_result(result).map_err(GatewayError::from))
        .collect()
}

/// Makes sure a file-backed SQLite database exists before connecting.
async fn prepare_sqlite_file(url: &str) -> Result<(), GatewayError> {
    let Some(rest) = url.strip_prefix("sqlite:") else {
        return Ok(());
    };
    let path_str = rest
        .trim_start_matches("//")
        .split('?')
        .next()
        .unwrap_or_default();

    if path_str.is_empty() || path_str == ":memory:" || url.contains("mode=memory") {
        return Ok(());
    }

    let path = Path::new(path_str);
    let io_err = |source| GatewayError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
    }
    if !tokio::fs::try_exists(path).await.map_err(io_err)? {
        tokio::fs::File::create(path).await.map_err(io_err)?;
    }

    Ok(())
}
