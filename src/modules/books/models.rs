use serde::{Deserialize, Serialize};

/// A catalogued book. `isbn` is chosen by the client and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Book {
    pub isbn: String,
    pub amazon_url: String,
    pub author: String,
    pub language: String,
    pub pages: i32,
    pub publisher: String,
    pub title: String,
    pub year: i32,
}

/// Request and response envelope carrying a single book.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookEnvelope {
    pub book: Book,
}

/// Response envelope for listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookList {
    pub books: Vec<Book>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Optional exact-match filters accepted by the listing endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BookFilter {
    pub author: Option<String>,
    pub language: Option<String>,
    pub publisher: Option<String>,
    pub title: Option<String>,
    pub year: Option<i32>,
}

/// A bound value for one filter column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Text(String),
    Integer(i32),
}

impl BookFilter {
    /// Active conditions as `(column, value)` pairs in a fixed column order.
    pub fn conditions(&self) -> Vec<(&'static str, FilterValue)> {
        let text = [
            ("author", &self.author),
            ("language", &self.language),
            ("publisher", &self.publisher),
            ("title", &self.title),
        ];

        let mut conditions: Vec<(&'static str, FilterValue)> = text
            .into_iter()
            .filter_map(|(column, value)| {
                value
                    .as_ref()
                    .map(|value| (column, FilterValue::Text(value.clone())))
            })
            .collect();

        if let Some(year) = self.year {
            conditions.push(("year", FilterValue::Integer(year)));
        }

        conditions
    }
}
