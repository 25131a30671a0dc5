//! Repository trait
//!
//! The seam between the catalog facade and whatever holds the books. The
//! in-memory `BookStore` in `shelf-storage` is the canonical implementation.

use crate::error::Result;
use crate::types::{Book, BookId, Isbn, NewBook};

/// Storage contract for books
///
/// Implementations must keep the id index and the ISBN index consistent
/// with each other at every point observable by another thread, and must
/// leave both untouched when an operation fails.
///
/// All methods take `&self`; implementations provide their own interior
/// synchronization.
pub trait BookRepository: Send + Sync {
    /// Assign an id and store the book
    ///
    /// Fails with `AlreadyExists` if another book already has this ISBN.
    fn create(&self, book: NewBook) -> Result<Book>;

    /// Look up by id. Fails with `NotFound`.
    fn find_by_id(&self, id: &BookId) -> Result<Book>;

    /// Look up by normalized ISBN. Fails with `NotFound`.
    fn find_by_isbn(&self, isbn: &Isbn) -> Result<Book>;

    /// Snapshot of every stored book
    fn find_all(&self) -> Result<Vec<Book>>;

    /// Replace the book stored under `book.id`
    ///
    /// Fails with `NotFound` if the id is unknown, or `AlreadyExists` if
    /// the ISBN changed to one owned by a different book.
    fn update(&self, book: Book) -> Result<Book>;

    /// Apply `f` to the stored book under the same exclusive section as
    /// the write-back
    ///
    /// Concurrent `modify` calls on one book see each other's changes. If
    /// `f` fails its error is returned and nothing is written. The write
    /// follows the same rules and errors as [`update`](Self::update).
    fn modify<F>(&self, id: &BookId, f: F) -> Result<Book>
    where
        F: FnOnce(&mut Book) -> Result<()>;

    /// Remove a book from both indexes. Fails with `NotFound`.
    fn delete(&self, id: &BookId) -> Result<()>;
}
