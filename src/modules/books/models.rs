use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use bookshelf_http::error::AppError;

/// Identifier assigned at creation; milliseconds since the Unix epoch.
pub type BookId = i64;

const ID_FIELD: &str = "id";

/// A book record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    /// Unique identifier for the book
    pub id: BookId,
    /// Title of the book
    pub title: String,
    /// Author of the book
    pub author: String,
    /// Publication year
    pub year: i64,
    /// Fields merged in by updates beyond the core ones.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Book {
    /// Shallow-merge `patch` into this record. The id never changes and
    /// nothing is re-validated.
    ///
    /// A `null` core field in the patch is treated as absent and keeps the
    /// stored value, since `title`, `author` and `year` cannot hold null.
    /// Extra fields do take `null`.
    pub fn apply(&mut self, patch: BookPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(author) = patch.author {
            self.author = author;
        }
        if let Some(year) = patch.year {
            self.year = year;
        }
        self.extra.extend(
            patch
                .extra
                .into_iter()
                .filter(|(key, _)| key.as_str() != ID_FIELD),
        );
    }
}

/// Request body for `POST /books`. Every field is optional here so that a
/// missing field is reported as incomplete data rather than a parse error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateBook {
    pub title: Option<String>,
    pub author: Option<String>,
    pub year: Option<i64>,
}

/// A creation request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub year: i64,
}

impl CreateBook {
    /// Parse a request body. Anything that is not a JSON object with
    /// correctly typed fields counts as incomplete.
    pub fn from_json(body: &[u8]) -> Result<Self, BookError> {
        json_object(body)
            .and_then(|object| serde_json::from_value(Value::Object(object)).ok())
            .ok_or(BookError::IncompleteData)
    }

    /// Reject absent, empty or zero fields.
    pub fn validate(self) -> Result<NewBook, BookError> {
        match (self.title, self.author, self.year) {
            (Some(title), Some(author), Some(year))
                if !title.is_empty() && !author.is_empty() && year != 0 =>
            {
                Ok(NewBook {
                    title,
                    author,
                    year,
                })
            }
            _ => Err(BookError::IncompleteData),
        }
    }
}

/// Request body for `PUT /books/{id}`.
///
/// A JSON `null` for a core field leaves it unchanged. Any `id` in the body is
/// discarded. Unknown fields are carried into [`Book::extra`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub year: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BookPatch {
    /// Parse a request body. An empty body is an empty patch.
    pub fn from_json(body: &[u8]) -> Result<Self, BookError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        let mut object = json_object(body).ok_or(BookError::MalformedBody)?;
        object.remove(ID_FIELD);
        serde_json::from_value(Value::Object(object)).map_err(|_| BookError::MalformedBody)
    }
}

fn json_object(body: &[u8]) -> Option<Map<String, Value>> {
    match serde_json::from_slice(body).ok()? {
        Value::Object(object) => Some(object),
        _ => None,
    }
}

/// Query string of `GET /search`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
    /// `None` when the parameter is absent; an absent title matches no book.
    pub title: Option<String>,
}

impl SearchParams {
    /// The first `title` wins when the parameter is repeated.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let title = pairs
            .into_iter()
            .find_map(|(key, value)| (key == "title").then_some(value));
        Self { title }
    }
}

/// Parse a path id. `None` matches no book.
pub fn parse_id(raw: &str) -> Option<BookId> {
    raw.parse().ok()
}

/// Failures surfaced by the books endpoints.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BookError {
    #[error("Book not found")]
    NotFound,
    #[error("Incomplete data")]
    IncompleteData,
    #[error("Malformed request body")]
    MalformedBody,
}

impl From<BookError> for AppError {
    fn from(err: BookError) -> Self {
        match err {
            BookError::NotFound => AppError::not_found(err.to_string()),
            BookError::IncompleteData | BookError::MalformedBody => {
                AppError::bad_request(err.to_string())
            }
        }
    }
}
