//! Core types for the book catalog
//!
//! This module defines the fundamental types used throughout the system:
//! - [`BookId`]: Store-assigned identifier for a book
//! - [`Isbn`]: Normalized, digit-only external identifier
//! - [`NewBook`]: Validated record that has not been stored yet
//! - [`Book`]: Record as held by a store

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Point in time used for creation and modification stamps
pub type Timestamp = DateTime<Utc>;

/// Unique identifier for a stored book
///
/// BookIds are generated by the store when a book is created and never
/// change afterwards. Callers never mint them.
///
/// # Examples
///
/// ```
/// use shelf_core::types::BookId;
///
/// let id1 = BookId::new();
/// let id2 = BookId::new();
/// assert_ne!(id1, id2);
///
/// let parsed: BookId = id1.to_string().parse().unwrap();
/// assert_eq!(parsed, id1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(Uuid);

impl BookId {
    /// Create a new random BookId using UUID v4
    pub fn new() -> Self {
        BookId(Uuid::new_v4())
    }
}

impl Default for BookId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BookId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(BookId)
    }
}

/// Normalized ISBN
///
/// Always 10 or 13 ASCII digits with no hyphens. The only way to build
/// one is [`Isbn::parse`], so holding an `Isbn` means the value is
/// canonical and safe to use as a uniqueness key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Isbn(String);

impl Isbn {
    /// Wrap an already normalized value. Callers must have checked the shape.
    pub(crate) fn from_normalized(digits: String) -> Self {
        Isbn(digits)
    }

    /// Borrow the digits
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of digits (10 or 13)
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for a parsed ISBN
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Isbn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Isbn {
    type Error = crate::error::Error;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Isbn::parse(&raw)
    }
}

impl From<Isbn> for String {
    fn from(isbn: Isbn) -> Self {
        isbn.0
    }
}

impl AsRef<str> for Isbn {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A validated book that has not been assigned an identifier yet
///
/// Produced by [`crate::validation::Validator::normalize_and_validate`] and
/// consumed by a repository's `create`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    /// Trimmed title
    pub title: String,
    /// Trimmed author
    pub author: String,
    /// Normalized ISBN
    pub isbn: Isbn,
    /// Construction time
    pub created_at: Timestamp,
    /// Equal to `created_at` at construction
    pub updated_at: Timestamp,
}

impl NewBook {
    /// Attach a store-assigned identifier
    pub fn assign(self, id: BookId) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            isbn: self.isbn,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// A stored book
///
/// Every `Book` handed out by a store is an owned copy; mutating it has no
/// effect on the store until it is passed back through `update`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Store-assigned identifier
    pub id: BookId,
    /// Title
    pub title: String,
    /// Author
    pub author: String,
    /// Normalized ISBN
    pub isbn: Isbn,
    /// Set once when the book was validated
    pub created_at: Timestamp,
    /// Advanced on every successful mutation
    pub updated_at: Timestamp,
}

impl Book {
    /// Advance `updated_at` to now
    ///
    /// The new stamp is strictly later than the previous one even if the
    /// system clock has not moved (or moved backwards) since.
    pub fn touch(&mut self) {
        let previous = self.updated_at;
        self.updated_at = Utc::now();
        self.advance_past(previous);
    }

    /// Raise `updated_at` so it is strictly later than `previous`
    ///
    /// Leaves a stamp that is already later untouched.
    pub fn advance_past(&mut self, previous: Timestamp) {
        self.updated_at = self.updated_at.max(previous + Duration::nanoseconds(1));
    }
}
