//! Bookshelf application library
//!
//! Wires the project modules onto the kernel, database, and HTTP crates.

pub mod modules;
pub mod utils;

use anyhow::Context;
use bookshelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};
use sqlx::SqlitePool;

/// Connect to the database, register every module, and apply migrations.
pub async fn bootstrap(settings: &Settings) -> anyhow::Result<(ModuleRegistry, SqlitePool)> {
    let (registry, pool, _) = prepare(settings).await?;
    Ok((registry, pool))
}

/// Apply pending migrations and return how many ran.
pub async fn migrate(settings: &Settings) -> anyhow::Result<usize> {
    let (_, pool, applied) = prepare(settings).await?;
    pool.close().await;
    Ok(applied)
}

async fn prepare(settings: &Settings) -> anyhow::Result<(ModuleRegistry, SqlitePool, usize)> {
    let pool = bookshelf_db::connect(&settings.database).await?;

    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, &pool, settings)?;

    let applied = bookshelf_db::migrate(&pool, &registry.collect_migrations())
        .await
        .context("failed to apply migrations")?;
    tracing::info!(applied, "migrations complete");

    Ok((registry, pool, applied))
}

/// Run the service until a shutdown signal arrives.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let (registry, pool) = bootstrap(&settings).await?;
    let ctx = InitCtx {
        settings: &settings,
    };

    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;

    let served = bookshelf_http::start_server(&registry, &settings).await;

    registry.stop_all().await?;
    pool.close().await;
    tracing::info!("bookshelf shutdown complete");

    served
}
