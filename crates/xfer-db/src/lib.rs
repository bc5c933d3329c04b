//! # xfer-db
//!
//! libSQL persistence for transfer requests.
//!
//! Holds the request store, the append-only audit log and the actor
//! directory, and exposes the pipeline operations through [`service::XferService`]:
//! timeline loading, list views with progress, activity logging and
//! compare-and-swap status transitions.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod service;
mod test_support;

use error::DatabaseError;
use std::path::Path;

use libsql::Builder;
use xfer_config::DatabaseConfig;

/// Central database handle for all xfer state.
///
/// Wraps a libSQL database and a single connection.
pub struct XferDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl XferDb {
    /// Open a local database at the given path with foreign keys enabled.
    ///
    /// Runs migrations automatically on open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        Self::open(&DatabaseConfig {
            path: path.to_string(),
            ..DatabaseConfig::default()
        })
        .await
    }

    /// Open the database described by `config`.
    ///
    /// A file-backed path gets its parent directory created first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        if !config.is_in_memory() {
            if let Some(parent) = Path::new(&config.path).parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await.map_err(|e| {
                        anyhow::anyhow!("create database directory {}: {e}", parent.display())
                    })?;
                }
            }
        }

        let db = Builder::new_local(&config.path).build().await?;
        let conn = db.connect()?;

        // Foreign keys must be enabled per connection in SQLite
        if config.foreign_keys {
            conn.execute("PRAGMA foreign_keys = ON", ())
                .await
                .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;
        }

        let xfer_db = Self { db, conn };
        xfer_db.run_migrations().await?;
        tracing::debug!(
            path = %config.path,
            in_memory = config.is_in_memory(),
            "database opened"
        );
        Ok(xfer_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }
}
