//! HTTP handlers for the books endpoint group.
//!
//! Every handler runs the same straight line: validate the body when there
//! is one, call the store, shape the JSON response. Failures are returned
//! as [`AppError`] and rendered by the central responder.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use bookshelf_http::error::AppError;
use serde_json::Value;

use super::models::{Book, BookEnvelope, BookFilter, BookList, MessageResponse};
use super::BooksState;
use crate::utils::schema::SchemaValidator;

/// Build the books router around its injected store and validator.
pub fn router(state: BooksState) -> Router {
    tracing::info!(target: "bookshelf.routes", "registering books routes");

    Router::new()
        .route("/", get(list_books).post(create_book))
        .route(
            "/{isbn}",
            get(get_book).put(replace_book).delete(delete_book),
        )
        .with_state(state)
}

/// Validate a raw body against the schema, then read the book out of it.
///
/// Values the schema admits but the model cannot hold (such as `2024.0` for
/// an integer field) are reported in the same list form as schema failures.
fn validated_book(validator: &SchemaValidator, body: Value) -> Result<Book, AppError> {
    validator.validate(&body).map_err(AppError::validation)?;

    let BookEnvelope { book } = serde_json::from_value(body)
        .map_err(|err| AppError::validation(vec![format!("/book: {}", err)]))?;
    Ok(book)
}

/// GET / => {books: [book, ...]}
async fn list_books(
    State(state): State<BooksState>,
    filter: Result<Query<BookFilter>, QueryRejection>,
) -> Result<Json<BookList>, AppError> {
    let Query(filter) = filter?;
    let books = state.store.find_all(&filter).await?;
    Ok(Json(BookList { books }))
}

/// GET /{isbn} => {book: book}
async fn get_book(
    State(state): State<BooksState>,
    Path(isbn): Path<String>,
) -> Result<Json<BookEnvelope>, AppError> {
    let book = state.store.find_one(&isbn).await?;
    Ok(Json(BookEnvelope { book }))
}

/// POST / {book: {...}} => 201 {book: newBook}
async fn create_book(
    State(state): State<BooksState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<BookEnvelope>), AppError> {
    let Json(body) = payload?;
    let book = validated_book(&state.validator, body)?;

    let book = state.store.create(&book).await?;
    tracing::info!(isbn = %book.isbn, "book created");
    Ok((StatusCode::CREATED, Json(BookEnvelope { book })))
}

/// PUT /{isbn} {book: {...}} => {book: updatedBook}
async fn replace_book(
    State(state): State<BooksState>,
    Path(isbn): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<BookEnvelope>, AppError> {
    let Json(body) = payload?;
    let book = validated_book(&state.validator, body)?;

    let book = state.store.update(&isbn, &book).await?;
    tracing::info!(isbn = %book.isbn, "book replaced");
    Ok(Json(BookEnvelope { book }))
}

/// DELETE /{isbn} => {message: "Book deleted"}
async fn delete_book(
    State(state): State<BooksState>,
    Path(isbn): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    state.store.remove(&isbn).await?;
    tracing::info!(%isbn, "book deleted");
    Ok(Json(MessageResponse {
        message: "Book deleted".to_string(),
    }))
}
