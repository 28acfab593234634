//! Book record store backed by the `books` table.

use async_trait::async_trait;
use bookshelf_http::error::AppError;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use thiserror::Error;

use super::models::{Book, BookFilter, FilterValue};

const BOOK_COLUMNS: &str = "isbn, amazon_url, author, language, pages, publisher, title, year";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no book with isbn '{isbn}'")]
    NotFound { isbn: String },

    #[error("a book with isbn '{isbn}' already exists")]
    Conflict { isbn: String },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => AppError::not_found(err.to_string()),
            StoreError::Conflict { .. } | StoreError::Database(_) => {
                AppError::Internal(anyhow::Error::new(err))
            }
        }
    }
}

/// CRUD operations over books, keyed by ISBN.
#[async_trait]
pub trait BookStore: Send + Sync {
    /// All books matching `filter`, ordered by title then ISBN.
    async fn find_all(&self, filter: &BookFilter) -> Result<Vec<Book>, StoreError>;

    async fn find_one(&self, isbn: &str) -> Result<Book, StoreError>;

    async fn create(&self, book: &Book) -> Result<Book, StoreError>;

    /// Replace every field of the book stored under `isbn`.
    ///
    /// The stored ISBN is kept; `book.isbn` is ignored.
    async fn update(&self, isbn: &str, book: &Book) -> Result<Book, StoreError>;

    async fn remove(&self, isbn: &str) -> Result<(), StoreError>;
}

/// SQLite implementation of [`BookStore`]
#[derive(Debug, Clone)]
pub struct SqliteBookStore {
    pool: SqlitePool,
}

impl SqliteBookStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookStore for SqliteBookStore {
    async fn find_all(&self, filter: &BookFilter) -> Result<Vec<Book>, StoreError> {
        let mut query = QueryBuilder::<Sqlite>::new(format!("SELECT {BOOK_COLUMNS} FROM books"));

        for (index, (column, value)) in filter.conditions().into_iter().enumerate() {
            query.push(if index == 0 { " WHERE " } else { " AND " });
            query.push(column).push(" = ");
            match value {
                FilterValue::Text(text) => query.push_bind(text),
                FilterValue::Integer(number) => query.push_bind(number),
            };
        }
        query.push(" ORDER BY title, isbn");

        let books = query.build_query_as::<Book>().fetch_all(&self.pool).await?;
        tracing::debug!(count = books.len(), ?filter, "listed books");
        Ok(books)
    }

    async fn find_one(&self, isbn: &str) -> Result<Book, StoreError> {
        sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE isbn = ?"
        ))
        .bind(isbn)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound {
            isbn: isbn.to_string(),
        })
    }

    async fn create(&self, book: &Book) -> Result<Book, StoreError> {
        let created = sqlx::query_as::<_, Book>(&format!(
            r#"
            INSERT INTO books ({BOOK_COLUMNS})
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {BOOK_COLUMNS}
            "#
        ))
        .bind(&book.isbn)
        .bind(&book.amazon_url)
        .bind(&book.author)
        .bind(&book.language)
        .bind(book.pages)
        .bind(&book.publisher)
        .bind(&book.title)
        .bind(book.year)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| match err {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => StoreError::Conflict {
                isbn: book.isbn.clone(),
            },
            other => StoreError::Database(other),
        })?;

        tracing::debug!(isbn = %created.isbn, "created book");
        Ok(created)
    }

    async fn update(&self, isbn: &str, book: &Book) -> Result<Book, StoreError> {
        let updated = sqlx::query_as::<_, Book>(&format!(
            r#"
            UPDATE books
            SET amazon_url = ?, author = ?, language = ?, pages = ?,
                publisher = ?, title = ?, year = ?
            WHERE isbn = ?
            RETURNING {BOOK_COLUMNS}
            "#
        ))
        .bind(&book.amazon_url)
        .bind(&book.author)
        .bind(&book.language)
        .bind(book.pages)
        .bind(&book.publisher)
        .bind(&book.title)
        .bind(book.year)
        .bind(isbn)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound {
            isbn: isbn.to_string(),
        })?;

        tracing::debug!(isbn = %updated.isbn, "updated book");
        Ok(updated)
    }

    async fn remove(&self, isbn: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM books WHERE isbn = ?")
            .bind(isbn)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                isbn: isbn.to_string(),
            });
        }

        tracing::debug!(%isbn, "removed book");
        Ok(())
    }
}
