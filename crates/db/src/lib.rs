//! Database bootstrap: connection pool and module migrations.

use std::str::FromStr;

use anyhow::Context;
use bookshelf_kernel::settings::DatabaseSettings;
use bookshelf_kernel::Migration;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

const MIGRATIONS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS _migrations (
        module     TEXT NOT NULL,
        id         TEXT NOT NULL,
        applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
        PRIMARY KEY (module, id)
    );
"#;

/// Open a connection pool for the configured database.
///
/// File databases are created when missing. An in-memory database lives only
/// as long as its connection, so those pools hold exactly one connection and
/// never recycle it.
pub async fn connect(settings: &DatabaseSettings) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&settings.url)
        .with_context(|| format!("invalid database url '{}'", settings.url))?
        .create_if_missing(true)
        .foreign_keys(true);

    let mut pool_options = SqlitePoolOptions::new().max_connections(settings.max_connections);
    if settings.is_in_memory() {
        pool_options = pool_options
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
    }

    let pool = pool_options
        .connect_with(options)
        .await
        .with_context(|| format!("failed to connect to database '{}'", settings.url))?;

    tracing::info!(target: "bookshelf-db", url = %settings.url, "database pool ready");
    Ok(pool)
}

/// Apply module migrations that have not run yet, in the order given.
///
/// Returns the number of migrations applied by this call.
pub async fn migrate(pool: &SqlitePool, migrations: &[(String, Migration)]) -> anyhow::Result<usize> {
    sqlx::raw_sql(MIGRATIONS_TABLE)
        .execute(pool)
        .await
        .context("failed to create migrations table")?;

    let mut applied = 0;
    for (module, migration) in migrations {
        let already_applied: Option<(String,)> =
            sqlx::query_as("SELECT id FROM _migrations WHERE module = ? AND id = ?")
                .bind(module)
                .bind(migration.id)
                .fetch_optional(pool)
                .await
                .context("failed to read migrations table")?;
        if already_applied.is_some() {
            tracing::debug!(target: "bookshelf-db", %module, id = migration.id, "migration already applied");
            continue;
        }

        let mut tx = pool.begin().await.context("failed to open migration transaction")?;
        sqlx::raw_sql(migration.up)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("migration '{}/{}' failed", module, migration.id))?;
        sqlx::query("INSERT INTO _migrations (module, id) VALUES (?, ?)")
            .bind(module)
            .bind(migration.id)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("failed to record migration '{}/{}'", module, migration.id))?;
        tx.commit().await.context("failed to commit migration")?;

        tracing::info!(target: "bookshelf-db", %module, id = migration.id, "migration applied");
        applied += 1;
    }

    Ok(applied)
}
