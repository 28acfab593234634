pub mod books;

use std::sync::Arc;

use anyhow::Context;
use bookshelf_kernel::{settings::Settings, ModuleRegistry};
use sqlx::SqlitePool;

/// Register all project-specific modules with the registry
pub fn register_all(
    registry: &mut ModuleRegistry,
    pool: &SqlitePool,
    settings: &Settings,
) -> anyhow::Result<()> {
    let validator =
        books::load_schema(&settings.schema).context("failed to load book schema")?;
    let store = books::store::SqliteBookStore::new(pool.clone());

    registry.register(books::create_module(Arc::new(store), Arc::new(validator)));
    Ok(())
}
