pub mod models;
pub mod routes;
pub mod store;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use bookshelf_kernel::settings::SchemaSettings;
use bookshelf_kernel::{InitCtx, Migration, Module};

use crate::utils::schema::{SchemaError, SchemaValidator};
use store::BookStore;

/// Schema bundled with the binary, used unless `schema.book_path` is set.
pub const BUNDLED_BOOK_SCHEMA: &str = include_str!("../../../config/schemas/book.json");

pub const MIGRATIONS: &[Migration] = &[Migration {
    id: "001_init",
    up: r#"
        CREATE TABLE IF NOT EXISTS books (
            isbn       TEXT PRIMARY KEY NOT NULL,
            amazon_url TEXT NOT NULL,
            author     TEXT NOT NULL,
            language   TEXT NOT NULL,
            pages      INTEGER NOT NULL CHECK (pages > 0),
            publisher  TEXT NOT NULL,
            title      TEXT NOT NULL CHECK (title <> ''),
            year       INTEGER NOT NULL
        );
        "#,
}];

/// Shared handles passed to every books handler.
#[derive(Clone)]
pub struct BooksState {
    pub store: Arc<dyn BookStore>,
    pub validator: Arc<SchemaValidator>,
}

/// The `/books` endpoint group
pub struct BooksModule {
    state: BooksState,
}

impl BooksModule {
    pub fn new(store: Arc<dyn BookStore>, validator: Arc<SchemaValidator>) -> Self {
        Self {
            state: BooksState { store, validator },
        }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            schema = ?ctx.settings.schema.book_path,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.state.clone())
    }

    fn migrations(&self) -> Vec<Migration> {
        MIGRATIONS.to_vec()
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Load the book payload schema, from disk when configured.
pub fn load_schema(settings: &SchemaSettings) -> Result<SchemaValidator, SchemaError> {
    match &settings.book_path {
        Some(path) => SchemaValidator::from_path(path),
        None => {
            let schema =
                serde_json::from_str(BUNDLED_BOOK_SCHEMA).map_err(|source| SchemaError::Parse {
                    path: "<bundled>".to_string(),
                    source,
                })?;
            SchemaValidator::new(&schema)
        }
    }
}

/// Create a new instance of the books module
pub fn create_module(
    store: Arc<dyn BookStore>,
    validator: Arc<SchemaValidator>,
) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(store, validator))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload() -> serde_json::Value {
        json!({
            "book": {
                "isbn": "0001",
                "amazon_url": "http://a.co/eobPtX2",
                "author": "Testing Author",
                "language": "English",
                "pages": 101,
                "publisher": "Test Publishing",
                "title": "Testing Title",
                "year": 2024
            }
        })
    }

    #[test]
    fn bundled_schema_accepts_complete_book() {
        let validator = load_schema(&SchemaSettings::default()).unwrap();
        assert!(validator.validate(&payload()).is_ok());
    }

    #[test]
    fn bundled_schema_requires_book_member() {
        let validator = load_schema(&SchemaSettings::default()).unwrap();
        let errors = validator.validate(&json!({ "year": 1964 })).unwrap_err();
        assert!(!errors.is_empty());
        assert!(errors
            .iter()
            .any(|e| e.starts_with("/: ") && e.contains("book")));
    }

    #[test]
    fn bundled_schema_rejects_missing_title_and_wrong_types() {
        let validator = load_schema(&SchemaSettings::default()).unwrap();
        let mut body = payload();
        let book = body["book"].as_object_mut().unwrap();
        book.remove("title");
        book.insert("pages".to_string(), json!("many"));

        let errors = validator.validate(&body).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors
            .iter()
            .any(|e| e.starts_with("/book: ") && e.contains("title")));
        assert!(errors.iter().any(|e| e.starts_with("/book/pages: ")));
    }

    #[test]
    fn bundled_schema_names_the_offending_field() {
        let validator = load_schema(&SchemaSettings::default()).unwrap();
        let mut body = payload();
        body["book"]["title"] = json!(5);

        let errors = validator.validate(&body).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("/book/title: "));
        assert!(errors[0].contains("string"));

        body["book"]["title"] = json!("");
        let errors = validator.validate(&body).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("/book/title: "));
    }

    #[test]
    fn bundled_schema_rejects_values_outside_i32() {
        let validator = load_schema(&SchemaSettings::default()).unwrap();
        let mut body = payload();
        body["book"]["pages"] = json!(3_000_000_000_i64);
        body["book"]["year"] = json!(-3_000_000_000_i64);

        let errors = validator.validate(&body).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().any(|e| e.starts_with("/book/pages: ")));
        assert!(errors.iter().any(|e| e.starts_with("/book/year: ")));
    }

    #[test]
    fn bundled_schema_rejects_non_positive_pages() {
        let validator = load_schema(&SchemaSettings::default()).unwrap();
        let mut body = payload();
        body["book"]["pages"] = json!(0);
        assert!(validator.validate(&body).is_err());
    }

    #[test]
    fn configured_schema_path_is_loaded() {
        let path = std::env::temp_dir().join(format!(
            "bookshelf-schema-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, r#"{"type": "object", "required": ["isbn"]}"#).unwrap();

        let validator = load_schema(&SchemaSettings {
            book_path: Some(path.clone()),
        })
        .unwrap();
        std::fs::remove_file(&path).ok();

        assert!(validator.validate(&json!({ "isbn": "0001" })).is_ok());
        assert!(validator.validate(&payload()).is_err());
    }

    #[test]
    fn module_contributes_books_migration() {
        assert_eq!(MIGRATIONS.len(), 1);
        assert!(MIGRATIONS[0].up.contains("CREATE TABLE IF NOT EXISTS books"));
    }
}
