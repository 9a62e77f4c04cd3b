// SPDX-FileCopyrightText: 2026 Bhojan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background thread.
//! Do NOT create additional Connection instances for writes.

use bhojan_core::BhojanError;
use tokio_rusqlite::Connection;

use crate::migrations;

/// Handle to the single SQLite connection. Query modules accept `&Database`
/// and go through `connection().call()`; tokio-rusqlite serializes all
/// closure calls on one background thread, which eliminates SQLITE_BUSY
/// under concurrent access.
#[derive(Clone)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens (or creates) the database at `path` with WAL mode enabled
    /// and runs all pending migrations.
    pub async fn open(path: &str) -> Result<Self, BhojanError> {
        Self::open_with(path, true).await
    }

    /// Opens the database with an explicit WAL-mode choice.
    pub async fn open_with(path: &str, wal_mode: bool) -> Result<Self, BhojanError> {
        if let Some(parent) = std::path::Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| BhojanError::Storage {
                source: Box::new(e),
            })?;
        }

        let conn = Connection::open(path).await.map_err(|e| BhojanError::Storage {
            source: Box::new(e),
        })?;

        conn.call(move |conn| {
            if wal_mode {
                conn.pragma_update(None, "journal_mode", "WAL")?;
            }
            conn.pragma_update(None, "synchronous", "NORMAL")?;
            conn.pragma_update(None, "foreign_keys", "ON")?;
            conn.pragma_update(None, "busy_timeout", 5000)?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        conn.call(|conn| migrations::run_migrations(conn))
            .await
            .map_err(|e| match e {
                tokio_rusqlite::Error::Error(e) => e,
                other => BhojanError::Internal(other.to_string()),
            })?;

        tracing::debug!(path, wal_mode, "database opened");
        Ok(Self { conn })
    }

    /// The underlying tokio-rusqlite connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Closes the connection, flushing pending writes.
    pub async fn close(self) -> Result<(), BhojanError> {
        self.conn.close().await.map_err(map_tr_err)
    }
}

/// Maps a tokio-rusqlite error into the workspace error type.
pub fn map_tr_err(err: tokio_rusqlite::Error) -> BhojanError {
    BhojanError::Storage {
        source: Box::new(err),
    }
}
