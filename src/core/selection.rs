use std::sync::Arc;
use tracing::warn;

use super::models::SelectedBook;
use super::storage::{SELECTED_BOOK_KEY, Storage};
use crate::errors::SummaryError;

/// The currently chosen catalog book, mirrored into [`Storage`] so it
/// survives restarts.
pub struct SelectionState {
    storage: Arc<dyn Storage>,
    current: Option<SelectedBook>,
}

impl SelectionState {
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            current: None,
        }
    }

    /// Commits `book` as the selection and persists it.
    ///
    /// # Errors
    ///
    /// Returns an error if the selection cannot be serialized or written. The
    /// in-memory selection is updated either way.
    pub fn select(&mut self, book: SelectedBook) -> Result<(), SummaryError> {
        let serialized = serde_json::to_string(&book);
        self.current = Some(book);
        self.storage.set(SELECTED_BOOK_KEY, &serialized?)
    }

    /// The resident selection, rehydrated from storage when not yet loaded.
    pub fn current(&mut self) -> Option<&SelectedBook> {
        if self.current.is_none() {
            self.current = self.rehydrate();
        }
        self.current.as_ref()
    }

    fn rehydrate(&self) -> Option<SelectedBook> {
        let raw = match self.storage.get(SELECTED_BOOK_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!("Failed to read stored selection: {}", e);
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(book) => Some(book),
            Err(e) => {
                warn!("Discarding undecodable stored selection: {}", e);
                None
            }
        }
    }

    /// Forgets the selection in memory and in storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    pub fn clear(&mut self) -> Result<(), SummaryError> {
        self.current = None;
        self.storage.remove(SELECTED_BOOK_KEY)
    }
}
