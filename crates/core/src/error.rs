//! Error types for the catalog
//!
//! Three outcomes cover every expected failure:
//!
//! | Code | Meaning |
//! |------|---------|
//! | INVALID_INPUT | A field failed validation |
//! | BOOK_NOT_FOUND | No book under the given id or ISBN |
//! | BOOK_ALREADY_EXISTS | ISBN uniqueness would be violated |
//!
//! None of them are fatal and none are retried internally. Translating
//! them to a transport representation is left to the caller.

use std::fmt;
use thiserror::Error;

/// Field of a book that failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Book title
    Title,
    /// Book author
    Author,
    /// Book ISBN
    Isbn,
}

impl Field {
    /// Lowercase field name as it appears in the serialized record
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Author => "author",
            Field::Isbn => "isbn",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// All catalog errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Field-level validation failure
    #[error("invalid input: {field} {reason}")]
    InvalidInput {
        /// Offending field
        field: Field,
        /// Which rule was broken
        reason: String,
    },

    /// Referenced id or ISBN has no book
    #[error("book not found: {0}")]
    NotFound(String),

    /// ISBN already used by another book
    #[error("book already exists: isbn {0}")]
    AlreadyExists(String),
}

/// Result type for catalog operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Build an `InvalidInput` error
    pub fn invalid(field: Field, reason: impl Into<String>) -> Self {
        Error::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    /// Build a `NotFound` error
    pub fn not_found(what: impl fmt::Display) -> Self {
        Error::NotFound(what.to_string())
    }

    /// Build an `AlreadyExists` error
    pub fn already_exists(isbn: impl fmt::Display) -> Self {
        Error::AlreadyExists(isbn.to_string())
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidInput { .. } => "INVALID_INPUT",
            Error::NotFound(_) => "BOOK_NOT_FOUND",
            Error::AlreadyExists(_) => "BOOK_ALREADY_EXISTS",
        }
    }

    /// Check if this is a validation error
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Error::InvalidInput { .. })
    }

    /// Check if this is a not-found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    /// Check if this is a uniqueness conflict
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Error::AlreadyExists(_))
    }

    /// Field that failed validation, if any
    pub fn field(&self) -> Option<Field> {
        match self {
            Error::InvalidInput { field, .. } => Some(*field),
            _ => None,
        }
    }
}
