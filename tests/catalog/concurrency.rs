//! Concurrency Tests
//!
//! Tests for thread safety:
//! - Concurrent creates with distinct ISBNs
//! - Creates racing on one ISBN
//! - Updates racing for one ISBN
//! - Patches of different fields of one book
//! - Readers never observing torn index state

use crate::common::*;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

#[test]
fn concurrent_creates_distinct_isbns() {
    const NUM_WRITERS: usize = 8;
    const BOOKS_PER_THREAD: usize = 50;

    let shelf = test_shelf();
    let barrier = Arc::new(Barrier::new(NUM_WRITERS));

    let handles: Vec<_> = (0..NUM_WRITERS)
        .map(|t| {
            let shelf = shelf.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                (0..BOOKS_PER_THREAD)
                    .map(|j| {
                        let isbn = isbn13(t * BOOKS_PER_THREAD + j);
                        shelf.create_book("Title", "Author", &isbn).unwrap().id
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut ids = HashSet::new();
    for h in handles {
        ids.extend(h.join().unwrap());
    }

    let total = NUM_WRITERS * BOOKS_PER_THREAD;
    assert_eq!(ids.len(), total);

    let listed = shelf.list_books().unwrap();
    assert_eq!(listed.len(), total);
    let listed_ids: HashSet<_> = listed.iter().map(|b| b.id).collect();
    assert_eq!(listed_ids, ids);
}

#[test]
fn concurrent_creates_same_isbn_one_winner() {
    const NUM_WRITERS: usize = 16;

    let shelf = test_shelf();
    let barrier = Arc::new(Barrier::new(NUM_WRITERS));

    let handles: Vec<_> = (0..NUM_WRITERS)
        .map(|i| {
            let shelf = shelf.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                // Mix hyphenated and plain forms of the same ISBN
                let raw = if i % 2 == 0 { "9780321125215" } else { "978-0-321-12521-5" };
                shelf.create_book(&format!("Copy {}", i), "Eric Evans", raw)
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let winners = results.iter().filter(|r| r.is_ok()).count();
    let conflicts = results
        .iter()
        .filter(|r| matches!(r, Err(e) if e.is_already_exists()))
        .count();

    assert_eq!(winners, 1);
    assert_eq!(conflicts, NUM_WRITERS - 1);
    assert_eq!(shelf.list_books().unwrap().len(), 1);
}

#[test]
fn concurrent_updates_racing_for_isbn() {
    const NUM_BOOKS: usize = 12;
    const TARGET: &str = "0132350882";

    let shelf = test_shelf();
    let ids: Vec<String> = (0..NUM_BOOKS)
        .map(|i| shelf.create_book("T", "A", &isbn13(i)).unwrap().id.to_string())
        .collect();

    let barrier = Arc::new(Barrier::new(NUM_BOOKS));
    let handles: Vec<_> = ids
        .iter()
        .cloned()
        .map(|id| {
            let shelf = shelf.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                shelf.update_book(&id, BookPatch::new().isbn(TARGET))
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);

    let owner = shelf.get_book_by_isbn(TARGET).unwrap();
    let books = shelf.list_books().unwrap();
    assert_eq!(books.len(), NUM_BOOKS);
    assert_eq!(books.iter().filter(|b| b.isbn.as_str() == TARGET).count(), 1);

    // Every book is still reachable through its own ISBN
    for book in &books {
        assert_eq!(shelf.get_book_by_isbn(book.isbn.as_str()).unwrap().id, book.id);
    }
    assert!(ids.contains(&owner.id.to_string()));
}

#[test]
fn concurrent_patches_of_one_book_all_land() {
    const ROUNDS: usize = 50;

    let shelf = test_shelf();
    let book = shelf.create_book("Clean Code", "Robert Martin", "0132350882").unwrap();
    let id = book.id.to_string();

    for round in 0..ROUNDS {
        let patches = [
            BookPatch::new().title(format!("Title {}", round)),
            BookPatch::new().author(format!("Author {}", round)),
            BookPatch::new().isbn(isbn13(round)),
        ];
        let barrier = Arc::new(Barrier::new(patches.len()));
        let handles: Vec<_> = patches
            .into_iter()
            .map(|patch| {
                let shelf = shelf.clone();
                let barrier = Arc::clone(&barrier);
                let id = id.clone();
                thread::spawn(move || {
                    barrier.wait();
                    shelf.update_book(&id, patch).unwrap().updated_at
                })
            })
            .collect();

        let stamps: HashSet<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(stamps.len(), 3);

        let stored = shelf.get_book(&id).unwrap();
        assert_eq!(stored.title, format!("Title {}", round));
        assert_eq!(stored.author, format!("Author {}", round));
        assert_eq!(stored.isbn.as_str(), isbn13(round));
        assert_eq!(stored.updated_at, stamps.into_iter().max().unwrap());
    }
    assert_eq!(shelf.list_books().unwrap().len(), 1);
}

#[test]
fn readers_see_consistent_indexes() {
    const NUM_READERS: usize = 4;
    const ROUNDS: usize = 200;

    let shelf = test_shelf();
    let seed = shelf.create_book("Seed", "A", "0132350882").unwrap();
    let done = Arc::new(AtomicBool::new(false));

    let readers: Vec<_> = (0..NUM_READERS)
        .map(|_| {
            let shelf = shelf.clone();
            let done = Arc::clone(&done);
            thread::spawn(move || {
                while !done.load(Ordering::Acquire) {
                    for book in shelf.list_books().unwrap() {
                        // A listed book must resolve through its ISBN to itself,
                        // unless a writer removed or moved it since the snapshot.
                        if let Ok(found) = shelf.get_book_by_isbn(book.isbn.as_str()) {
                            assert_eq!(found.isbn, book.isbn);
                        }
                    }
                    assert!(shelf.repository().is_consistent());
                }
            })
        })
        .collect();

    for round in 0..ROUNDS {
        let book = shelf.create_book("T", "A", &isbn13(round)).unwrap();
        shelf
            .update_book(&book.id.to_string(), BookPatch::new().isbn(isbn13(ROUNDS + round)))
            .unwrap();
        if round % 2 == 0 {
            shelf.delete_book(&book.id.to_string()).unwrap();
        }
    }
    done.store(true, Ordering::Release);

    for r in readers {
        r.join().unwrap();
    }

    assert_eq!(shelf.list_books().unwrap().len(), 1 + ROUNDS / 2);
    assert_eq!(shelf.get_book(&seed.id.to_string()).unwrap(), seed);
    assert!(shelf.repository().is_consistent());
}
