//! Validation engine
//!
//! Pure functions that trim, check and normalize the fields of a candidate
//! book before it reaches a store. No shared state and no I/O; the only
//! input besides the fields is the clock used for the timestamps.
//!
//! ## Rules
//!
//! - All fields are trimmed before any check.
//! - `title`: non-empty, at most `max_title_len` characters.
//! - `author`: non-empty, at most `max_author_len` characters.
//! - `isbn`: non-empty, shaped as 10 digits, 13 digits, or 13 to 17
//!   digits and hyphens. Hyphens are then stripped and exactly 10 or 13
//!   digits must remain.
//!
//! Fields are checked in the order title, author, isbn and the first
//! failure is reported.

use crate::error::{Error, Field, Result};
use crate::types::{Isbn, NewBook};
use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Default maximum title length in characters
pub const MAX_TITLE_LEN: usize = 200;

/// Default maximum author length in characters
pub const MAX_AUTHOR_LEN: usize = 100;

/// Longest raw ISBN accepted before normalization
pub const MAX_RAW_ISBN_LEN: usize = 17;

/// Pre-normalization shape of an ISBN. ASCII digits only.
static ISBN_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[0-9]{10}|[0-9]{13}|[0-9-]{13,17})$").expect("static ISBN pattern compiles")
});

/// Length limits applied to free-text fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidationLimits {
    /// Maximum title length in characters
    pub max_title_len: usize,
    /// Maximum author length in characters
    pub max_author_len: usize,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        ValidationLimits {
            max_title_len: MAX_TITLE_LEN,
            max_author_len: MAX_AUTHOR_LEN,
        }
    }
}

/// Normalizes and validates book fields
#[derive(Debug, Clone, Default)]
pub struct Validator {
    limits: ValidationLimits,
}

impl Validator {
    /// Create a validator with the given limits
    pub fn new(limits: ValidationLimits) -> Self {
        Validator { limits }
    }

    /// Limits in effect
    pub fn limits(&self) -> &ValidationLimits {
        &self.limits
    }

    /// Validate raw input and build an unstored book
    ///
    /// On success the returned [`NewBook`] carries the trimmed title and
    /// author, the normalized ISBN, and `created_at == updated_at == now`.
    ///
    /// # Errors
    ///
    /// `Error::InvalidInput` naming the first field that failed and why.
    pub fn normalize_and_validate(&self, title: &str, author: &str, isbn: &str) -> Result<NewBook> {
        let title = self.validate_title(title)?;
        let author = self.validate_author(author)?;
        let isbn = Isbn::parse(isbn)?;

        let now = Utc::now();
        Ok(NewBook {
            title,
            author,
            isbn,
            created_at: now,
            updated_at: now,
        })
    }

    /// Trim and check a title, returning the trimmed value
    pub fn validate_title(&self, title: &str) -> Result<String> {
        bounded_text(Field::Title, title, self.limits.max_title_len)
    }

    /// Trim and check an author, returning the trimmed value
    pub fn validate_author(&self, author: &str) -> Result<String> {
        bounded_text(Field::Author, author, self.limits.max_author_len)
    }
}

/// Validate with the default limits
pub fn normalize_and_validate(title: &str, author: &str, isbn: &str) -> Result<NewBook> {
    Validator::default().normalize_and_validate(title, author, isbn)
}

fn bounded_text(field: Field, raw: &str, max_len: usize) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid(field, "cannot be empty"));
    }
    if trimmed.chars().count() > max_len {
        return Err(Error::invalid(
            field,
            format!("exceeds maximum length of {} characters", max_len),
        ));
    }
    Ok(trimmed.to_string())
}

impl Isbn {
    /// Check and normalize a raw ISBN
    ///
    /// # Examples
    ///
    /// ```
    /// use shelf_core::types::Isbn;
    ///
    /// let isbn = Isbn::parse(" 978-0-321-12521-5 ").unwrap();
    /// assert_eq!(isbn.as_str(), "9780321125215");
    /// assert!(Isbn::parse("123").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Isbn> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(Error::invalid(Field::Isbn, "cannot be empty"));
        }
        if !ISBN_SHAPE.is_match(trimmed) {
            return Err(Error::invalid(Field::Isbn, "format is invalid"));
        }

        let digits: String = trimmed.chars().filter(|c| *c != '-').collect();
        if digits.len() != 10 && digits.len() != 13 {
            return Err(Error::invalid(Field::Isbn, "must be 10 or 13 digits"));
        }
        Ok(Isbn::from_normalized(digits))
    }
}
