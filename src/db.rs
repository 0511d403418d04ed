//! SQLite connection pool and schema migrations

use std::{path::PathBuf, str::FromStr};

use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    Pool, Sqlite,
};

use crate::{config::DatabaseConfig, error::AppResult};

/// Open the pool described by `config`, creating the database file and its
/// parent directory when missing.
pub async fn connect(config: &DatabaseConfig) -> AppResult<Pool<Sqlite>> {
    let in_memory = config.url.contains(":memory:");

    let mut options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(true)
        .foreign_keys(true);

    if !in_memory {
        if let Some(parent) = database_path(&config.url).as_deref().and_then(|p| p.parent()) {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                tracing::info!("Creating database directory {}", parent.display());
                std::fs::create_dir_all(parent)?;
            }
        }
        options = options.journal_mode(SqliteJournalMode::Wal);
    }

    // every connection to `:memory:` is a separate database
    let max_connections = if in_memory { 1 } else { config.max_connections };

    let mut pool_options = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .min_connections(config.min_connections.min(max_connections));
    if in_memory {
        // closing the last connection drops the data
        pool_options = pool_options.idle_timeout(None).max_lifetime(None);
    }

    let pool = pool_options.connect_with(options).await?;

    Ok(pool)
}

/// Apply pending migrations from `./migrations`
pub async fn migrate(pool: &Pool<Sqlite>) -> AppResult<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Fresh in-memory database with the schema applied
pub async fn memory_pool() -> AppResult<Pool<Sqlite>> {
    let pool = connect(&DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
    })
    .await?;
    migrate(&pool).await?;
    Ok(pool)
}

/// File path of a `sqlite:` URL, without its query string
fn database_path(url: &str) -> Option<PathBuf> {
    let rest = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or_default();
    (!path.is_empty()).then(|| PathBuf::from(path))
}
