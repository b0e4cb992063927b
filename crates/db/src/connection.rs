use std::time::Duration;

use shopcart_core::config::DatabaseConfig;
use sqlx::sqlite::SqlitePoolOptions;

pub type DbPool = sqlx::SqlitePool;

pub async fn connect(config: &DatabaseConfig) -> Result<DbPool, sqlx::Error> {
    connect_with_settings(&config.url, config.max_connections, config.timeout_secs).await
}

/// Builds the pool every request borrows its store session from.
///
/// In-memory databases live only as long as their connection, so they are
/// pinned to a single connection that is never recycled.
pub async fn connect_with_settings(
    database_url: &str,
    max_connections: u32,
    timeout_secs: u64,
) -> Result<DbPool, sqlx::Error> {
    let in_memory = is_in_memory(database_url);
    let mut options = SqlitePoolOptions::new()
        .max_connections(if in_memory { 1 } else { max_connections.max(1) })
        .acquire_timeout(Duration::from_secs(timeout_secs.max(1)));
    if in_memory {
        options = options.min_connections(1).idle_timeout(None).max_lifetime(None);
    }

    options
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                sqlx::query("PRAGMA busy_timeout = 5000").execute(&mut *conn).await?;
                sqlx::query("PRAGMA foreign_keys = ON").execute(&mut *conn).await?;
                sqlx::query("PRAGMA journal_mode = WAL").execute(&mut *conn).await?;
                Ok(())
            })
        })
        .connect(database_url)
        .await
}

fn is_in_memory(database_url: &str) -> bool {
    let url = database_url.trim();
    url == ":memory:" || url.starts_with("sqlite::memory:") || url.contains("mode=memory")
}
