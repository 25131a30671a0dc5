//! Concurrent book store
//!
//! `BookStore` owns both indexes behind a single `parking_lot::RwLock`.
//!
//! # Locking
//!
//! - Reads (`find_by_id`, `find_by_isbn`, `list_all`) take the shared lock
//!   and may run concurrently with each other.
//! - Writes (`create`, `update`, `modify`, `delete`) take the exclusive lock. The
//!   uniqueness check and both index mutations happen inside that one
//!   critical section, so no reader ever sees one index updated without
//!   the other.
//!
//! There is one lock for the pair of indexes, so there is no lock ordering
//! to get wrong.
//!
//! # Copies
//!
//! Writes take ownership of the caller's value; reads return clones. A
//! caller can never hold a reference into the store's maps.

use crate::index::Indexes;
use parking_lot::RwLock;
use shelf_core::{Book, BookId, BookRepository, Isbn, NewBook, Result};
use tracing::debug;

/// Thread-safe in-memory book store
///
/// # Example
///
/// ```
/// use shelf_core::normalize_and_validate;
/// use shelf_storage::BookStore;
///
/// let store = BookStore::new();
/// let book = normalize_and_validate("Clean Code", "Robert Martin", "0132350882").unwrap();
/// let stored = store.create(book).unwrap();
///
/// assert_eq!(store.find_by_id(&stored.id).unwrap(), stored);
/// assert_eq!(store.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct BookStore {
    indexes: RwLock<Indexes>,
}

impl BookStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store sized for `capacity` books
    pub fn with_capacity(capacity: usize) -> Self {
        BookStore {
            indexes: RwLock::new(Indexes::with_capacity(capacity)),
        }
    }

    /// Number of stored books
    pub fn len(&self) -> usize {
        self.indexes.read().len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.indexes.read().is_empty()
    }

    /// Store a validated book under a freshly generated id
    ///
    /// # Errors
    ///
    /// `AlreadyExists` if another book has the same ISBN. Nothing is stored.
    pub fn create(&self, book: NewBook) -> Result<Book> {
        let book = book.assign(BookId::new());
        let mut indexes = self.indexes.write();

        if let Err(e) = indexes.insert(book.clone()) {
            debug!(isbn = %book.isbn, error = %e, "create rejected");
            return Err(e);
        }
        debug!(book_id = %book.id, isbn = %book.isbn, "book created");
        Ok(book)
    }

    /// Copy of the book stored under `id`
    pub fn find_by_id(&self, id: &BookId) -> Result<Book> {
        self.indexes
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| shelf_core::Error::not_found(id))
    }

    /// Copy of the book that owns `isbn`
    pub fn find_by_isbn(&self, isbn: &Isbn) -> Result<Book> {
        self.indexes
            .read()
            .get_by_isbn(isbn)
            .cloned()
            .ok_or_else(|| shelf_core::Error::not_found(format!("isbn {}", isbn)))
    }

    /// Snapshot of every stored book, in id order
    ///
    /// The order is stable for an unmodified store. Each call produces a
    /// new snapshot.
    pub fn list_all(&self) -> Vec<Book> {
        self.indexes.read().iter().cloned().collect()
    }

    /// Replace the stored book with the same id
    ///
    /// `created_at` is always taken from the stored record, and `updated_at`
    /// is raised past the stored `updated_at`, so it moves forward on every
    /// successful update even when the caller sends a stale stamp. If the
    /// ISBN changed, the uniqueness check and the index move happen under
    /// the same write lock as the replacement.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no book has this id
    /// - `AlreadyExists` if the new ISBN belongs to a different book
    ///
    /// On error the stored record and both indexes are unchanged.
    pub fn update(&self, book: Book) -> Result<Book> {
        let mut indexes = self.indexes.write();
        Self::commit(&mut indexes, book)
    }

    /// Read, change and write back one book under a single write lock
    ///
    /// `f` works on a copy; the store only changes if `f` succeeds and the
    /// result passes the same checks as [`update`](Self::update). The id
    /// cannot be changed through `f`.
    pub fn modify<F>(&self, id: &BookId, f: F) -> Result<Book>
    where
        F: FnOnce(&mut Book) -> Result<()>,
    {
        let mut indexes = self.indexes.write();
        let mut book = indexes
            .get(id)
            .cloned()
            .ok_or_else(|| shelf_core::Error::not_found(id))?;

        if let Err(e) = f(&mut book) {
            debug!(book_id = %id, error = %e, "modify rejected");
            return Err(e);
        }
        book.id = *id;
        Self::commit(&mut indexes, book)
    }

    fn commit(indexes: &mut Indexes, mut book: Book) -> Result<Book> {
        if let Some(existing) = indexes.get(&book.id) {
            book.created_at = existing.created_at;
            book.advance_past(existing.updated_at);
        }

        match indexes.replace(book.clone()) {
            Ok(previous) => {
                if previous.isbn != book.isbn {
                    debug!(book_id = %book.id, from = %previous.isbn, to = %book.isbn, "isbn moved");
                }
                debug!(book_id = %book.id, "book updated");
                Ok(book)
            }
            Err(e) => {
                debug!(book_id = %book.id, error = %e, "update rejected");
                Err(e)
            }
        }
    }

    /// Remove the book stored under `id` from both indexes
    pub fn delete(&self, id: &BookId) -> Result<()> {
        let removed = self.indexes.write().remove(id);
        match removed {
            Ok(book) => {
                debug!(book_id = %id, isbn = %book.isbn, "book deleted");
                Ok(())
            }
            Err(e) => {
                debug!(book_id = %id, "delete of unknown book");
                Err(e)
            }
        }
    }

    /// Check index consistency under the shared lock
    pub fn is_consistent(&self) -> bool {
        self.indexes.read().is_consistent()
    }
}

impl BookRepository for BookStore {
    fn create(&self, book: NewBook) -> Result<Book> {
        BookStore::create(self, book)
    }

    fn find_by_id(&self, id: &BookId) -> Result<Book> {
        BookStore::find_by_id(self, id)
    }

    fn find_by_isbn(&self, isbn: &Isbn) -> Result<Book> {
        BookStore::find_by_isbn(self, isbn)
    }

    fn find_all(&self) -> Result<Vec<Book>> {
        Ok(self.list_all())
    }

    fn update(&self, book: Book) -> Result<Book> {
        BookStore::update(self, book)
    }

    fn modify<F>(&self, id: &BookId, f: F) -> Result<Book>
    where
        F: FnOnce(&mut Book) -> Result<()>,
    {
        BookStore::modify(self, id, f)
    }

    fn delete(&self, id: &BookId) -> Result<()> {
        BookStore::delete(self, id)
    }
}
