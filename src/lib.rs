//! # Shelf
//!
//! Concurrent in-memory book catalog.
//!
//! Books are validated (trimmed, length-checked, ISBN normalized) and then
//! stored in a dual-indexed store that enforces ISBN uniqueness under
//! concurrent access.
//!
//! ## Quick Start
//!
//! ```
//! use shelfdb::prelude::*;
//!
//! let shelf = Shelf::in_memory();
//!
//! let book = shelf.create_book("DDD", "Eric Evans", "978-0-321-12521-5")?;
//! assert_eq!(book.isbn.as_str(), "9780321125215");
//!
//! let same = shelf.get_book_by_isbn("9780321125215")?;
//! assert_eq!(same.id, book.id);
//!
//! let dup = shelf.create_book("DDD again", "Eric Evans", "9780321125215");
//! assert!(dup.unwrap_err().is_already_exists());
//! # Ok::<(), shelfdb::Error>(())
//! ```
//!
//! ## Crates
//!
//! - `shelf-core` - data model, errors, validation, configuration
//! - `shelf-storage` - the concurrent `BookStore`

#![warn(missing_docs)]

mod database;

pub mod prelude;

pub use database::{BookPatch, Shelf, ShelfBuilder};

pub use shelf_core::{
    normalize_and_validate, Book, BookId, BookRepository, ConfigError, Error, Field, Isbn,
    NewBook, Result, ShelfConfig, StoreOptions, Timestamp, ValidationLimits, Validator,
};
pub use shelf_storage::BookStore;
