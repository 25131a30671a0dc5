//! Core types for the shelf catalog
//!
//! This crate defines:
//! - Book data model ([`Book`], [`NewBook`], [`BookId`], [`Isbn`])
//! - Error taxonomy ([`Error`], [`Result`])
//! - Validation engine ([`Validator`])
//! - Configuration ([`ShelfConfig`])
//! - Repository seam ([`BookRepository`])

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod traits;
pub mod types;
pub mod validation;

pub use config::{ConfigError, ShelfConfig, StoreOptions};
pub use error::{Error, Field, Result};
pub use traits::BookRepository;
pub use types::{Book, BookId, Isbn, NewBook, Timestamp};
pub use validation::{normalize_and_validate, ValidationLimits, Validator};
