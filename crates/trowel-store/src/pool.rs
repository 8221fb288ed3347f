//! Connection pool setup.

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use trowel_core::config::DatabaseConfig;

use crate::Result;

/// Whether `url` names an in-memory database.
pub fn is_memory_url(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

/// Connection options with the tuned pragmas applied.
pub fn connect_options(config: &DatabaseConfig) -> Result<SqliteConnectOptions> {
    let mut options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(config.busy_timeout_secs))
        .pragma("cache_size", "-64000")
        .pragma("temp_store", "MEMORY")
        .pragma("mmap_size", "268435456");
    if !is_memory_url(&config.url) {
        options = options
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);
    }
    Ok(options)
}

/// Opens a pool for `config`, creating the database file and its parent
/// directory when needed.
///
/// An in-memory database lives only as long as its connection, so it gets a
/// single connection that is never recycled.
pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool> {
    let options = connect_options(config)?;
    let memory = is_memory_url(&config.url);

    if !memory {
        if let Some(parent) = options.get_filename().parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
    }

    let pool_options = if memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(config.max_connections.max(1))
    };

    let pool = pool_options.connect_with(options).await?;
    tracing::info!(
        url = %config.url,
        max_connections = if memory { 1 } else { config.max_connections },
        "database pool opened"
    );
    Ok(pool)
}
