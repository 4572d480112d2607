//! Application state and command handlers.
//!
//! Front-ends translate user gestures into calls on [`App`] and implement
//! [`View`] to reflect state back. Nothing in here knows how it is drawn.

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::warn;

use crate::ai::SummaryClient;
use crate::ai::client::validate;
use crate::catalog::{CatalogItem, CatalogLookup, SearchDebouncer, SearchResults};
use crate::core::credentials::CredentialStore;
use crate::core::models::{BookForm, BookSource, Display, SelectedBook, SummaryInput};
use crate::core::selection::SelectionState;
use crate::core::storage::Storage;

pub const KEY_SAVED_NOTICE: &str = "API Key saved successfully!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    CredentialEntry,
    Main,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    ApiKey,
    Title,
    Author,
    Chapter,
    Search,
}

/// Where a submitted request takes its title and author from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Typed title and author fields.
    Manual,
    /// The book picked from a catalog search.
    Catalog,
}

pub trait View {
    fn show_panel(&mut self, panel: Panel);
    /// Immediate, blocking notice to the user.
    fn notify(&mut self, message: &str);
    fn confirm(&mut self, prompt: &str) -> bool;
    fn set_loading(&mut self, visible: bool);
    fn show_result(&mut self, html: &str);
    fn clear_result(&mut self);
    fn show_search_results(&mut self, items: &[CatalogItem]);
    fn show_selection(&mut self, book: Option<&SelectedBook>);
    fn reset_form(&mut self);
}

pub struct App<V: View> {
    mode: InputMode,
    credentials: CredentialStore,
    selection: SelectionState,
    summaries: SummaryClient,
    search: Option<(SearchDebouncer, mpsc::UnboundedReceiver<SearchResults>)>,
    search_results: Vec<CatalogItem>,
    form: BookForm,
    display: Option<Display>,
    view: V,
}

impl<V: View> App<V> {
    #[must_use]
    pub fn new(
        mode: InputMode,
        storage: Arc<dyn Storage>,
        summaries: SummaryClient,
        view: V,
    ) -> Self {
        Self {
            mode,
            credentials: CredentialStore::new(Arc::clone(&storage)),
            selection: SelectionState::new(storage),
            summaries,
            search: None,
            search_results: Vec::new(),
            form: BookForm::default(),
            display: None,
            view,
        }
    }

    /// Enables catalog search. Search input must then be handled inside a
    /// tokio runtime.
    #[must_use]
    pub fn with_catalog(mut self, lookup: Arc<dyn CatalogLookup>) -> Self {
        self.search = Some(SearchDebouncer::new(lookup));
        self
    }

    #[must_use]
    pub fn view(&self) -> &V {
        &self.view
    }

    #[must_use]
    pub fn form(&self) -> &BookForm {
        &self.form
    }

    #[must_use]
    pub fn display(&self) -> Option<&Display> {
        self.display.as_ref()
    }

    #[must_use]
    pub fn search_results(&self) -> &[CatalogItem] {
        &self.search_results
    }

    pub fn selected_book(&mut self) -> Option<&SelectedBook> {
        self.selection.current()
    }

    /// Picks the initial panel from credential presence and returns it.
    pub fn start(&mut self) -> Panel {
        let panel = if self.credentials.load().is_some() {
            Panel::Main
        } else {
            Panel::CredentialEntry
        };
        self.view.show_panel(panel);
        if self.mode == InputMode::Catalog {
            let book = self.selection.current().cloned();
            self.view.show_selection(book.as_ref());
        }
        panel
    }

    pub fn save_key(&mut self, raw: &str) {
        match self.credentials.save(raw) {
            Ok(_) => {
                self.view.show_panel(Panel::Main);
                self.view.notify(KEY_SAVED_NOTICE);
            }
            Err(e) => self.view.notify(&e.to_string()),
        }
    }

    /// Clears the credential and selection after confirmation and resets the
    /// form. A declined confirmation changes nothing.
    pub fn clear_key(&mut self) {
        let view = &mut self.view;
        let cleared = match self.credentials.clear(|prompt| view.confirm(prompt)) {
            Ok(cleared) => cleared,
            Err(e) => {
                warn!("Failed to clear credential: {}", e);
                self.view.notify(&e.to_string());
                return;
            }
        };
        if !cleared {
            return;
        }

        if let Err(e) = self.selection.clear() {
            warn!("Failed to clear selection: {}", e);
        }
        self.form = BookForm::default();
        self.display = None;
        self.search_results.clear();
        self.view.reset_form();
        self.view.clear_result();
        self.view.show_selection(None);
        self.view.show_panel(Panel::CredentialEntry);
    }

    pub fn set_field(&mut self, field: Field, value: &str) {
        match field {
            Field::Title => self.form.title = value.to_string(),
            Field::Author => self.form.author = value.to_string(),
            Field::Chapter => self.form.chapter = value.to_string(),
            Field::Search => self.search_input(value),
            Field::ApiKey => {}
        }
    }

    /// Enter in a form field behaves like pressing that panel's button.
    pub async fn on_key(&mut self, field: Field, key: &str, value: &str) {
        if key != "Enter" {
            return;
        }
        match field {
            Field::ApiKey => self.save_key(value),
            Field::Title | Field::Author | Field::Chapter => {
                self.set_field(field, value);
                self.submit().await;
            }
            Field::Search => {}
        }
    }

    /// Feeds the search box. Lookups are debounced.
    pub fn search_input(&mut self, query: &str) {
        match self.search.as_mut() {
            Some((debouncer, _)) => debouncer.input(query),
            None => warn!("Catalog search is not enabled"),
        }
    }

    /// Waits for the next fired lookup and shows its results.
    pub async fn next_search_results(&mut self) -> Option<&[CatalogItem]> {
        let (_, receiver) = self.search.as_mut()?;
        let results = receiver.recv().await?;
        self.search_results = results.items;
        self.view.show_search_results(&self.search_results);
        Some(self.search_results.as_slice())
    }

    /// Commits one search result as the selection and clears the list.
    pub fn select_result(&mut self, index: usize) -> Option<&SelectedBook> {
        let item = self.search_results.get(index)?.clone();
        if let Err(e) = self.selection.select(item.into_selection()) {
            warn!("Failed to persist selection: {}", e);
        }
        self.search_results.clear();
        self.view.show_search_results(&[]);
        let book = self.selection.current().cloned();
        self.view.show_selection(book.as_ref());
        self.selection.current()
    }

    /// Forgets the catalog selection.
    pub fn clear_selection(&mut self) {
        if let Err(e) = self.selection.clear() {
            warn!("Failed to clear selection: {}", e);
        }
        self.view.show_selection(None);
    }

    fn current_input(&mut self) -> SummaryInput {
        let source = match self.mode {
            InputMode::Manual => BookSource::Form {
                title: self.form.title.clone(),
                author: self.form.author.clone(),
            },
            InputMode::Catalog => BookSource::Selection(self.selection.current().cloned()),
        };
        SummaryInput {
            source,
            chapter: self.form.chapter.clone(),
        }
    }

    /// Runs one summary request from the current form state.
    ///
    /// Validation failures only produce a notice. Otherwise the result region
    /// is replaced by the summary or an inline error, and the loading
    /// indicator is hidden whatever the outcome.
    pub async fn submit(&mut self) -> Option<&Display> {
        let input = self.current_input();
        let credential = self.credentials.load();
        let (request, credential) = match validate(&input, credential.as_ref()) {
            Ok(validated) => validated,
            Err(e) => {
                self.view.notify(&e.to_string());
                return None;
            }
        };

        self.view.set_loading(true);
        self.view.clear_result();

        let display = match self.summaries.dispatch(&request, credential).await {
            Ok(result) => Display::Summary(result),
            Err(e) => {
                warn!("Summary request failed: {}", e);
                Display::Error(self.summaries.render_failure(&e))
            }
        };
        self.view.show_result(display.html());
        self.display = Some(display);

        self.view.set_loading(false);
        self.display.as_ref()
    }

    /// Redraws the current result region without changing it.
    pub fn render(&mut self) {
        match &self.display {
            Some(display) => self.view.show_result(display.html()),
            None => self.view.clear_result(),
        }
    }
}
