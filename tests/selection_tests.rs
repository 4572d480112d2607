use std::sync::Arc;

use booksum::core::models::{NO_DESCRIPTION, SelectedBook, UNKNOWN_AUTHOR};
use booksum::core::selection::SelectionState;
use booksum::core::storage::{MemoryStorage, SELECTED_BOOK_KEY, Storage};

fn book() -> SelectedBook {
    SelectedBook::new(
        "Good Omens".to_string(),
        vec!["Terry Pratchett".to_string(), "Neil Gaiman".to_string()],
        Some("The end of the world.".to_string()),
    )
}

#[test]
fn test_placeholders_fill_missing_fields() {
    let book = SelectedBook::new("Anonymous".to_string(), Vec::new(), None);
    assert_eq!(book.authors, vec![UNKNOWN_AUTHOR.to_string()]);
    assert_eq!(book.description, NO_DESCRIPTION);
}

#[test]
fn test_author_line_joins_in_order() {
    assert_eq!(book().author_line(), "Terry Pratchett, Neil Gaiman");
}

#[test]
fn test_selection_is_persisted_and_rehydrated() {
    let storage = Arc::new(MemoryStorage::new());
    let mut state = SelectionState::new(storage.clone());
    state.select(book()).unwrap();
    assert!(storage.get(SELECTED_BOOK_KEY).unwrap().is_some());

    // A fresh state (as after a restart) loads it on demand.
    let mut reloaded = SelectionState::new(storage);
    assert_eq!(reloaded.current(), Some(&book()));
}

#[test]
fn test_clear_forgets_memory_and_storage() {
    let storage = Arc::new(MemoryStorage::new());
    let mut state = SelectionState::new(storage.clone());
    state.select(book()).unwrap();
    state.clear().unwrap();

    assert!(state.current().is_none());
    assert!(storage.get(SELECTED_BOOK_KEY).unwrap().is_none());
}

#[test]
fn test_undecodable_selection_is_ignored() {
    let storage = Arc::new(MemoryStorage::new());
    storage.set(SELECTED_BOOK_KEY, "{broken").unwrap();

    let mut state = SelectionState::new(storage);
    assert!(state.current().is_none());
}
