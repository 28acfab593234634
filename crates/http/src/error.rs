//! Error handling for the bookshelf HTTP layer

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use uuid::Uuid;

/// Standard error response format for all HTTP errors
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: ErrorMessage,
    pub status: u16,
    pub trace_id: String,
    pub timestamp: String,
}

/// A single message, or one message per violated rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ErrorMessage {
    Single(String),
    List(Vec<String>),
}

/// Failure classes the responder knows how to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    BadRequest,
    NotFound,
    Internal,
}

impl ErrorKind {
    pub const fn status(self) -> StatusCode {
        match self {
            ErrorKind::Validation | ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Application error types that map to HTTP responses
#[derive(Error, Debug)]
pub enum AppError {
    #[error("validation error: {}", .details.join("; "))]
    Validation { details: Vec<String> },

    #[error("not found: {message}")]
    NotFound { message: String },

    #[error("bad request: {message}")]
    BadRequest { message: String },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Create a validation error carrying one diagnostic per violated rule
    pub fn validation(details: Vec<String>) -> Self {
        Self::Validation { details }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Validation { .. } => ErrorKind::Validation,
            AppError::NotFound { .. } => ErrorKind::NotFound,
            AppError::BadRequest { .. } => ErrorKind::BadRequest,
            AppError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.kind().status()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let trace_id = Uuid::new_v4();
        let timestamp = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_default();
        let kind = self.kind();
        let status = kind.status();

        let message = match self {
            AppError::Validation { details } => ErrorMessage::List(details),
            AppError::NotFound { message } | AppError::BadRequest { message } => {
                ErrorMessage::Single(message)
            }
            AppError::Internal(e) => {
                tracing::error!(
                    trace_id = %trace_id,
                    status_code = %status.as_u16(),
                    error = ?e,
                    "internal error"
                );
                ErrorMessage::Single(format!("{:#}", e))
            }
        };

        // Internal errors were logged above with their full chain
        if kind != ErrorKind::Internal {
            tracing::warn!(
                trace_id = %trace_id,
                status_code = %status.as_u16(),
                message = ?message,
                "Request error"
            );
        }

        // Internal details stay in the logs for release builds
        let message = if cfg!(not(debug_assertions)) && kind == ErrorKind::Internal {
            ErrorMessage::Single("An internal server error occurred".to_string())
        } else {
            message
        };

        let body = ErrorResponse {
            error: ErrorBody {
                message,
                status: status.as_u16(),
                trace_id: trace_id.to_string(),
                timestamp,
            },
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde_json::Value;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    /// Render `error` under a scoped subscriber and return the emitted log lines.
    fn logged_lines(error: AppError) -> Vec<String> {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            let _ = error.into_response();
        });

        let bytes = logs.0.lock().unwrap().clone();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_validation_error_keeps_every_detail() {
        let details = vec!["\"title\" is a required property".to_string()];
        let error = AppError::validation(details.clone());

        match &error {
            AppError::Validation { details: d } => assert_eq!(d, &details),
            _ => panic!("Expected Validation error"),
        }
        assert_eq!(error.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_status_lookup() {
        assert_eq!(ErrorKind::Validation.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorKind::BadRequest.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorKind::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorKind::Internal.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_not_found_response_body() {
        let response = AppError::not_found("no book with isbn '0'").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_json(response).await;
        assert_eq!(body["error"]["status"], 404);
        assert_eq!(body["error"]["message"], "no book with isbn '0'");
        assert!(Uuid::parse_str(body["error"]["trace_id"].as_str().unwrap()).is_ok());
        assert!(body["error"]["timestamp"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_validation_response_lists_messages() {
        let error = AppError::validation(vec!["first".to_string(), "second".to_string()]);
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"]["status"], 400);
        assert_eq!(body["error"]["message"], serde_json::json!(["first", "second"]));
    }

    #[tokio::test]
    async fn test_internal_error_mapping() {
        let error = AppError::Internal(anyhow::anyhow!("Database connection failed"));
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"]["status"], 500);
    }

    #[test]
    fn test_internal_error_is_logged_once() {
        let lines = logged_lines(AppError::Internal(anyhow::anyhow!("pool closed")));
        assert_eq!(lines.len(), 1, "{lines:?}");
        assert!(lines[0].contains("ERROR"));
        assert!(lines[0].contains("pool closed"));
    }

    #[test]
    fn test_client_error_is_logged_once_as_warning() {
        let lines = logged_lines(AppError::not_found("no book with isbn '0'"));
        assert_eq!(lines.len(), 1, "{lines:?}");
        assert!(lines[0].contains("WARN"));
    }
}
