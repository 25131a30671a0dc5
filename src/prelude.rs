//! Convenient imports for Shelf.
//!
//! ```
//! use shelfdb::prelude::*;
//!
//! let shelf = Shelf::in_memory();
//! shelf.create_book("Clean Code", "Robert Martin", "0132350882").unwrap();
//! ```

// Main entry point
pub use crate::database::{BookPatch, Shelf, ShelfBuilder};

// Error handling
pub use crate::{Error, Field, Result};

// Core types
pub use crate::{Book, BookId, Isbn, NewBook, Timestamp};

// Configuration and validation
pub use crate::{ShelfConfig, ValidationLimits, Validator};

// Storage
pub use crate::{BookRepository, BookStore};
