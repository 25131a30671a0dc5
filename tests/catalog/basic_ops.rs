//! Create / read / delete through the facade.

use crate::common::*;
use std::collections::HashSet;

// ============================================================================
// Create
// ============================================================================

#[test]
fn create_normalizes_and_assigns_ids() {
    let shelf = test_shelf();
    let mut ids = HashSet::new();

    for (title, author, raw, normalized) in CLASSICS {
        let book = shelf.create_book(title, author, raw).unwrap();
        assert_eq!(book.isbn.as_str(), normalized);
        assert!(!book.isbn.as_str().contains('-'));
        assert!(!book.id.to_string().is_empty());
        assert!(ids.insert(book.id), "id reused");
    }
    assert_eq!(shelf.list_books().unwrap().len(), CLASSICS.len());
}

#[test]
fn create_rejects_invalid_fields() {
    let shelf = test_shelf();

    let cases = [
        ("", "Robert Martin", "0132350882", Field::Title),
        ("Clean Code", "", "0132350882", Field::Author),
        ("Clean Code", "Robert Martin", "", Field::Isbn),
        ("Clean Code", "Robert Martin", "123", Field::Isbn),
    ];
    for (title, author, isbn, field) in cases {
        let err = shelf.create_book(title, author, isbn).unwrap_err();
        assert!(err.is_invalid_input());
        assert_eq!(err.field(), Some(field));
        assert_eq!(err.code(), "INVALID_INPUT");
    }
    assert!(shelf.list_books().unwrap().is_empty());
}

#[test]
fn create_duplicate_isbn_fails_without_change() {
    let shelf = test_shelf();
    shelf.create_book("DDD", "Eric Evans", "9780321125215").unwrap();

    let err = shelf
        .create_book("Domain-Driven Design", "Eric Evans", "978-0-321-12521-5")
        .unwrap_err();
    assert!(err.is_already_exists());
    assert_eq!(err.code(), "BOOK_ALREADY_EXISTS");

    let books = shelf.list_books().unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].title, "DDD");
}

// ============================================================================
// Read
// ============================================================================

#[test]
fn get_by_id_and_isbn() {
    let shelf = test_shelf();
    let book = shelf.create_book("DDD", "Eric Evans", "978-0-321-12521-5").unwrap();

    assert_eq!(shelf.get_book(&book.id.to_string()).unwrap(), book);
    assert_eq!(shelf.get_book_by_isbn("9780321125215").unwrap(), book);
    assert_eq!(shelf.get_book_by_isbn("978-0-321-12521-5").unwrap(), book);
}

#[test]
fn get_unknown_is_not_found() {
    let shelf = test_shelf();

    let err = shelf.get_book("nonexistent").unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.code(), "BOOK_NOT_FOUND");

    assert!(shelf.get_book(&BookId::new().to_string()).unwrap_err().is_not_found());
    assert!(shelf.get_book_by_isbn("0132350882").unwrap_err().is_not_found());
    assert!(shelf.get_book_by_isbn("not an isbn").unwrap_err().is_not_found());
}

#[test]
fn list_is_repeatable() {
    let shelf = test_shelf();
    for i in 0..20 {
        shelf.create_book("T", "A", &isbn13(i)).unwrap();
    }

    let first = shelf.list_books().unwrap();
    let second = shelf.list_books().unwrap();
    assert_eq!(first, second);
}

#[test]
fn returned_books_do_not_alias_store() {
    let shelf = test_shelf();
    let book = shelf.create_book("Clean Code", "Robert Martin", "0132350882").unwrap();

    let mut copy = shelf.get_book(&book.id.to_string()).unwrap();
    copy.title.push_str(" (pirated)");

    assert_eq!(shelf.get_book(&book.id.to_string()).unwrap().title, "Clean Code");
}

// ============================================================================
// Delete
// ============================================================================

#[test]
fn delete_then_get_is_not_found() {
    let shelf = test_shelf();
    let book = shelf.create_book("Clean Code", "Robert Martin", "0132350882").unwrap();
    let id = book.id.to_string();

    shelf.delete_book(&id).unwrap();
    assert!(shelf.get_book(&id).unwrap_err().is_not_found());
    assert!(shelf.get_book_by_isbn("0132350882").unwrap_err().is_not_found());
}

#[test]
fn delete_unknown_keeps_count() {
    let shelf = test_shelf();
    shelf.create_book("Clean Code", "Robert Martin", "0132350882").unwrap();

    assert!(shelf.delete_book(&BookId::new().to_string()).unwrap_err().is_not_found());
    assert!(shelf.delete_book("garbage").unwrap_err().is_not_found());
    assert_eq!(shelf.list_books().unwrap().len(), 1);
}

#[test]
fn serialized_book_shape() {
    let shelf = test_shelf();
    let book = shelf.create_book("DDD", "Eric Evans", "978-0-321-12521-5").unwrap();

    let json = serde_json::to_value(&book).unwrap();
    assert_eq!(json["title"], "DDD");
    assert_eq!(json["author"], "Eric Evans");
    assert_eq!(json["isbn"], "9780321125215");
    assert_eq!(json["id"], book.id.to_string());
    assert!(json["created_at"].is_string());
    assert!(json["updated_at"].is_string());
}
