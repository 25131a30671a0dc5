//! Storage layer for the shelf catalog
//!
//! This crate implements the in-memory book store:
//! - BookStore: both indexes behind one RwLock
//! - Primary index: BTreeMap by BookId (stable listing order)
//! - Secondary index: FxHashMap by normalized ISBN (uniqueness)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod index;
pub mod store;

pub use index::Indexes;
pub use store::BookStore;
