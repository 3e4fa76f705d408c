//! Book model and related types

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Length of generated book identifiers
pub const BOOK_ID_LEN: usize = 16;

/// URL-safe alphabet used for book identifiers
const BOOK_ID_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

/// Draw a fresh random book identifier.
pub fn generate_book_id() -> String {
    let mut rng = rand::thread_rng();
    (0..BOOK_ID_LEN)
        .map(|_| BOOK_ID_ALPHABET[rng.gen_range(0..BOOK_ID_ALPHABET.len())] as char)
        .collect()
}

/// Full book record as held in the store
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: String,
    pub name: String,
    pub year: i32,
    pub author: String,
    pub summary: String,
    pub publisher: String,
    /// Total number of pages
    pub page_count: i64,
    /// Pages read so far (never greater than `page_count`)
    pub read_page: i64,
    /// True when `read_page == page_count`
    pub finished: bool,
    pub reading: bool,
    pub inserted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Book {
    /// Build a new record from a validated payload.
    pub fn new(id: String, payload: BookPayload) -> Self {
        let now = Utc::now();
        Self {
            id,
            finished: payload.is_finished(),
            name: payload.name,
            year: payload.year,
            author: payload.author,
            summary: payload.summary,
            publisher: payload.publisher,
            page_count: payload.page_count,
            read_page: payload.read_page,
            reading: payload.reading,
            inserted_at: now,
            updated_at: now,
        }
    }

    /// Replace every caller-editable field, keeping `id` and `inserted_at`.
    pub fn apply(&mut self, payload: BookPayload) {
        self.finished = payload.is_finished();
        self.name = payload.name;
        self.year = payload.year;
        self.author = payload.author;
        self.summary = payload.summary;
        self.publisher = payload.publisher;
        self.page_count = payload.page_count;
        self.read_page = payload.read_page;
        self.reading = payload.reading;
        self.touch();
    }

    /// Refresh `updated_at`, keeping it strictly increasing even when the
    /// clock has not advanced since the last edit.
    fn touch(&mut self) {
        let now = Utc::now();
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + Duration::nanoseconds(1)
        };
    }
}

/// Book projection returned by the list endpoint
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct BookShort {
    pub id: String,
    pub name: String,
    pub publisher: String,
}

impl From<&Book> for BookShort {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id.clone(),
            name: book.name.clone(),
            publisher: book.publisher.clone(),
        }
    }
}

/// Reason a book payload was rejected
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookRejection {
    #[error("Please provide the book name")]
    MissingName,
    #[error("readPage cannot be greater than pageCount")]
    ReadPageExceedsPageCount,
}

/// Create / replace book request.
///
/// Server-managed fields (`id`, `finished`, timestamps) are not part of the
/// payload and are ignored when sent. Absent and `null` fields both take the
/// empty value.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookPayload {
    #[serde(default, deserialize_with = "null_as_default")]
    #[validate(length(min = 1, code = "missing_name"))]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub year: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub author: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub publisher: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub page_count: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub read_page: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reading: bool,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl BookPayload {
    /// Check the payload, reporting a missing name before a page mismatch.
    pub fn check(&self) -> Result<(), BookRejection> {
        if self.validate().is_err() {
            return Err(BookRejection::MissingName);
        }
        if self.read_page > self.page_count {
            return Err(BookRejection::ReadPageExceedsPageCount);
        }
        Ok(())
    }

    pub fn is_finished(&self) -> bool {
        self.page_count == self.read_page
    }
}

/// List query parameters
#[derive(Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// Case-insensitive substring of the book name
    pub name: Option<String>,
    /// `1`/`true` for books being read, `0`/`false` otherwise
    #[param(value_type = Option<String>)]
    pub reading: Option<bool>,
    /// `1`/`true` for finished books, `0`/`false` otherwise
    #[param(value_type = Option<String>)]
    pub finished: Option<bool>,
}

impl BookQuery {
    /// Build the query from raw key/value pairs. A repeated key keeps its
    /// last value; unknown keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "name" => query.name = Some(value),
                "reading" => query.reading = Some(parse_flag(&value)),
                "finished" => query.finished = Some(parse_flag(&value)),
                _ => {}
            }
        }
        query
    }

    /// Whether `book` satisfies every filter present in the query.
    pub fn matches(&self, book: &Book) -> bool {
        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            if !book.name.to_lowercase().contains(&name.to_lowercase()) {
                return false;
            }
        }
        if self.reading.is_some_and(|reading| book.reading != reading) {
            return false;
        }
        if self.finished.is_some_and(|finished| book.finished != finished) {
            return false;
        }
        true
    }
}

/// Interpret a query flag: numbers are true when non-zero, `true`/`false`
/// are taken literally, anything else is false.
pub fn parse_flag(raw: &str) -> bool {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("true") {
        return true;
    }
    match raw.parse::<f64>() {
        Ok(n) => n != 0.0 && !n.is_nan(),
        Err(_) => false,
    }
}
