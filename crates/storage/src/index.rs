//! Primary and secondary indexes
//!
//! [`Indexes`] pairs the id → book map with the ISBN → id map. It is plain
//! data with no synchronization of its own; `BookStore` guards the whole
//! pair with one lock so both maps always change together.
//!
//! Every mutating method checks all preconditions before touching either
//! map, so a returned error means nothing changed.

use rustc_hash::FxHashMap;
use shelf_core::{Book, BookId, Error, Isbn, Result};
use std::collections::BTreeMap;

/// The two indexes over stored books
#[derive(Debug, Default)]
pub struct Indexes {
    /// Primary index. BTreeMap so iteration order is stable.
    by_id: BTreeMap<BookId, Book>,
    /// Secondary uniqueness index
    by_isbn: FxHashMap<Isbn, BookId>,
}

impl Indexes {
    /// Create empty indexes
    pub fn new() -> Self {
        Self::default()
    }

    /// Create indexes with room for `capacity` books in the hash index
    pub fn with_capacity(capacity: usize) -> Self {
        Indexes {
            by_id: BTreeMap::new(),
            by_isbn: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Number of stored books
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Check if no books are stored
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Borrow a book by id
    pub fn get(&self, id: &BookId) -> Option<&Book> {
        self.by_id.get(id)
    }

    /// Borrow a book by ISBN
    pub fn get_by_isbn(&self, isbn: &Isbn) -> Option<&Book> {
        self.by_isbn.get(isbn).and_then(|id| self.by_id.get(id))
    }

    /// Owner of an ISBN, if any
    pub fn owner_of(&self, isbn: &Isbn) -> Option<BookId> {
        self.by_isbn.get(isbn).copied()
    }

    /// Iterate books in id order
    pub fn iter(&self) -> impl Iterator<Item = &Book> {
        self.by_id.values()
    }

    /// Insert a new book into both indexes
    ///
    /// Fails with `AlreadyExists` if the ISBN is taken. The id must be
    /// fresh; ids come from UUID v4 so a collision is treated as a bug.
    pub fn insert(&mut self, book: Book) -> Result<()> {
        if self.by_isbn.contains_key(&book.isbn) {
            return Err(Error::already_exists(&book.isbn));
        }
        debug_assert!(!self.by_id.contains_key(&book.id), "duplicate book id");

        self.by_isbn.insert(book.isbn.clone(), book.id);
        self.by_id.insert(book.id, book);
        Ok(())
    }

    /// Replace the book stored under `book.id`, moving its ISBN entry if
    /// the ISBN changed
    ///
    /// Returns the previous value. Fails with `NotFound` if the id is
    /// unknown or `AlreadyExists` if the new ISBN belongs to another book.
    pub fn replace(&mut self, book: Book) -> Result<Book> {
        let old_isbn = match self.by_id.get(&book.id) {
            Some(existing) => existing.isbn.clone(),
            None => return Err(Error::not_found(book.id)),
        };

        if old_isbn != book.isbn {
            if let Some(owner) = self.by_isbn.get(&book.isbn) {
                if *owner != book.id {
                    return Err(Error::already_exists(&book.isbn));
                }
            }
            self.by_isbn.remove(&old_isbn);
            self.by_isbn.insert(book.isbn.clone(), book.id);
        }

        // Present: looked up at the top and nothing has removed it since
        let previous = self.by_id.insert(book.id, book);
        previous.ok_or_else(|| Error::not_found("book vanished during replace"))
    }

    /// Remove a book from both indexes
    pub fn remove(&mut self, id: &BookId) -> Result<Book> {
        let book = self.by_id.remove(id).ok_or_else(|| Error::not_found(id))?;
        self.by_isbn.remove(&book.isbn);
        Ok(book)
    }

    /// Check that the two indexes describe the same set of books
    pub fn is_consistent(&self) -> bool {
        self.by_id.len() == self.by_isbn.len()
            && self
                .by_isbn
                .iter()
                .all(|(isbn, id)| self.by_id.get(id).map(|b| &b.isbn == isbn).unwrap_or(false))
    }
}
