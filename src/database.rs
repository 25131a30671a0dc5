//! Main catalog entry point.
//!
//! This module provides the `Shelf` struct, which sequences validation and
//! repository calls for every book operation.

use serde::{Deserialize, Serialize};
use shelf_core::{
    Book, BookId, BookRepository, ConfigError, Error, Isbn, Result, ShelfConfig, ValidationLimits,
    Validator,
};
use shelf_storage::BookStore;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Fields to change on an existing book
///
/// A field that is empty after trimming means "leave unchanged". There is
/// no way to clear a field through an update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookPatch {
    /// New title, or empty
    pub title: String,
    /// New author, or empty
    pub author: String,
    /// New ISBN (raw, hyphens allowed), or empty
    pub isbn: String,
}

impl BookPatch {
    /// Empty patch
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the author
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Set the ISBN
    pub fn isbn(mut self, isbn: impl Into<String>) -> Self {
        self.isbn = isbn.into();
        self
    }

    /// Check if the patch changes no field
    pub fn is_empty(&self) -> bool {
        requested(&self.title).is_none()
            && requested(&self.author).is_none()
            && requested(&self.isbn).is_none()
    }
}

fn requested(field: &str) -> Option<&str> {
    let trimmed = field.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// The book catalog.
///
/// Cloning is cheap and clones share the same repository, so a `Shelf` can
/// be handed to as many threads as needed.
///
/// # Example
///
/// ```
/// use shelfdb::prelude::*;
///
/// let shelf = Shelf::in_memory();
/// let book = shelf.create_book("Clean Code", "Robert Martin", "0132350882")?;
///
/// let patch = BookPatch::new().title("Clean Code (Revised)");
/// let updated = shelf.update_book(&book.id.to_string(), patch)?;
/// assert_eq!(updated.author, "Robert Martin");
///
/// shelf.delete_book(&book.id.to_string())?;
/// assert!(shelf.get_book(&book.id.to_string()).unwrap_err().is_not_found());
/// # Ok::<(), shelfdb::Error>(())
/// ```
pub struct Shelf<R: BookRepository = BookStore> {
    repo: Arc<R>,
    validator: Validator,
}

impl<R: BookRepository> Clone for Shelf<R> {
    fn clone(&self) -> Self {
        Shelf {
            repo: Arc::clone(&self.repo),
            validator: self.validator.clone(),
        }
    }
}

impl Shelf<BookStore> {
    /// Catalog over an empty in-memory store with default limits
    pub fn in_memory() -> Self {
        Self::builder().build()
    }

    /// Create a builder for catalog configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use shelfdb::prelude::*;
    ///
    /// let shelf = Shelf::builder()
    ///     .limits(ValidationLimits { max_title_len: 20, max_author_len: 20 })
    ///     .initial_capacity(64)
    ///     .build();
    /// assert!(shelf.create_book(&"x".repeat(21), "A", "0132350882").is_err());
    /// ```
    pub fn builder() -> ShelfBuilder {
        ShelfBuilder::new()
    }
}

impl<R: BookRepository> Shelf<R> {
    /// Catalog over any repository
    pub fn with_repository(repo: R, validator: Validator) -> Self {
        Shelf {
            repo: Arc::new(repo),
            validator,
        }
    }

    /// The underlying repository
    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Validator in use
    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    /// Validate raw fields and store a new book
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if a field fails validation
    /// - `AlreadyExists` if the normalized ISBN is taken
    pub fn create_book(&self, title: &str, author: &str, isbn: &str) -> Result<Book> {
        let book = self
            .validator
            .normalize_and_validate(title, author, isbn)
            .map_err(|e| {
                debug!(error = %e, "create validation failed");
                e
            })?;

        let book = self.repo.create(book)?;
        info!(book_id = %book.id, isbn = %book.isbn, "book created");
        Ok(book)
    }

    /// Fetch a book by id
    ///
    /// A string that is not a valid id cannot name a stored book, so it
    /// yields `NotFound`.
    pub fn get_book(&self, id: &str) -> Result<Book> {
        let id = parse_id(id)?;
        self.repo.find_by_id(&id)
    }

    /// Fetch a book by ISBN, hyphens allowed
    pub fn get_book_by_isbn(&self, isbn: &str) -> Result<Book> {
        let isbn = Isbn::parse(isbn).map_err(|_| Error::not_found(format!("isbn {}", isbn.trim())))?;
        self.repo.find_by_isbn(&isbn)
    }

    /// Snapshot of all books
    pub fn list_books(&self) -> Result<Vec<Book>> {
        self.repo.find_all()
    }

    /// Apply a partial update
    ///
    /// Supplied fields are validated with the same rules as creation before
    /// the repository is touched; empty fields keep their stored value. The
    /// patch is applied to the stored book inside the repository's write
    /// section, so concurrent patches of one book never undo each other.
    /// `updated_at` always advances, even for an empty patch.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if a supplied field fails validation
    /// - `NotFound` if no book has this id
    /// - `AlreadyExists` if the new ISBN belongs to another book
    pub fn update_book(&self, id: &str, patch: BookPatch) -> Result<Book> {
        let id = parse_id(id)?;
        let title = requested(&patch.title)
            .map(|t| self.validator.validate_title(t))
            .transpose()?;
        let author = requested(&patch.author)
            .map(|a| self.validator.validate_author(a))
            .transpose()?;
        let isbn = requested(&patch.isbn).map(Isbn::parse).transpose()?;

        let book = self.repo.modify(&id, |book| {
            if let Some(title) = title {
                book.title = title;
            }
            if let Some(author) = author {
                book.author = author;
            }
            if let Some(isbn) = isbn {
                book.isbn = isbn;
            }
            book.touch();
            Ok(())
        })?;
        debug!(book_id = %book.id, "book updated");
        Ok(book)
    }

    /// Remove a book
    pub fn delete_book(&self, id: &str) -> Result<()> {
        let id = parse_id(id)?;
        self.repo.delete(&id)?;
        info!(book_id = %id, "book deleted");
        Ok(())
    }
}

fn parse_id(raw: &str) -> Result<BookId> {
    raw.trim().parse().map_err(|_| Error::not_found(raw))
}

/// Builder for a store-backed [`Shelf`].
#[derive(Debug, Clone, Default)]
pub struct ShelfBuilder {
    config: ShelfConfig,
}

impl ShelfBuilder {
    /// Builder with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration
    pub fn config(mut self, config: ShelfConfig) -> Self {
        self.config = config;
        self
    }

    /// Read configuration from a TOML file, then apply environment overrides
    pub fn config_file(self, path: impl AsRef<Path>) -> std::result::Result<Self, ConfigError> {
        let mut config = ShelfConfig::load(path)?;
        config.merge_with_env()?;
        Ok(self.config(config))
    }

    /// Set field length limits
    pub fn limits(mut self, limits: ValidationLimits) -> Self {
        self.config.limits = limits;
        self
    }

    /// Pre-size the store
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.config.store.initial_capacity = capacity;
        self
    }

    /// Build the catalog
    pub fn build(self) -> Shelf<BookStore> {
        let store = BookStore::with_capacity(self.config.store.initial_capacity);
        Shelf::with_repository(store, Validator::new(self.config.limits))
    }
}
