#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use booksum::ai::{HttpCall, RawResponse, Transport};
use booksum::app::{Panel, View};
use booksum::catalog::{CatalogItem, CatalogLookup};
use booksum::core::models::SelectedBook;
use booksum::errors::SummaryError;

/// Records every call and replays queued responses in order. An empty queue
/// answers `200 {}`.
#[derive(Default)]
pub struct FakeTransport {
    calls: Mutex<Vec<HttpCall>>,
    responses: Mutex<VecDeque<Result<RawResponse, String>>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, status: u16, body: &str) -> Self {
        self.responses.lock().unwrap().push_back(Ok(RawResponse {
            status,
            body: body.to_string(),
        }));
        self
    }

    pub fn fail(self, message: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<HttpCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, call: &HttpCall) -> Result<RawResponse, SummaryError> {
        self.calls.lock().unwrap().push(call.clone());
        match self.responses.lock().unwrap().pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(SummaryError::Http(message)),
            None => Ok(RawResponse {
                status: 200,
                body: "{}".to_string(),
            }),
        }
    }
}

/// Anthropic success body with one text segment.
pub fn anthropic_text(text: &str) -> String {
    serde_json::json!({
        "content": [{ "type": "text", "text": text }]
    })
    .to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    Panel(Panel),
    Notice(String),
    Confirm(String),
    Loading(bool),
    Result(String),
    ClearResult,
    SearchResults(usize),
    Selection(Option<String>),
    ResetForm,
}

pub struct RecordingView {
    pub events: Vec<ViewEvent>,
    pub confirm_answer: bool,
}

impl RecordingView {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            confirm_answer: true,
        }
    }

    pub fn declining() -> Self {
        Self {
            confirm_answer: false,
            ..Self::new()
        }
    }

    pub fn notices(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ViewEvent::Notice(n) => Some(n.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn results(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ViewEvent::Result(html) => Some(html.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn last_panel(&self) -> Option<Panel> {
        self.events.iter().rev().find_map(|e| match e {
            ViewEvent::Panel(p) => Some(*p),
            _ => None,
        })
    }
}

impl View for RecordingView {
    fn show_panel(&mut self, panel: Panel) {
        self.events.push(ViewEvent::Panel(panel));
    }

    fn notify(&mut self, message: &str) {
        self.events.push(ViewEvent::Notice(message.to_string()));
    }

    fn confirm(&mut self, prompt: &str) -> bool {
        self.events.push(ViewEvent::Confirm(prompt.to_string()));
        self.confirm_answer
    }

    fn set_loading(&mut self, visible: bool) {
        self.events.push(ViewEvent::Loading(visible));
    }

    fn show_result(&mut self, html: &str) {
        self.events.push(ViewEvent::Result(html.to_string()));
    }

    fn clear_result(&mut self) {
        self.events.push(ViewEvent::ClearResult);
    }

    fn show_search_results(&mut self, items: &[CatalogItem]) {
        self.events.push(ViewEvent::SearchResults(items.len()));
    }

    fn show_selection(&mut self, book: Option<&SelectedBook>) {
        self.events
            .push(ViewEvent::Selection(book.map(|b| b.title.clone())));
    }

    fn reset_form(&mut self) {
        self.events.push(ViewEvent::ResetForm);
    }
}

/// Catalog lookup that counts calls and returns canned items.
#[derive(Default)]
pub struct FakeLookup {
    pub queries: Mutex<Vec<String>>,
    pub items: Vec<CatalogItem>,
    count: AtomicUsize,
}

impl FakeLookup {
    pub fn with_items(items: Vec<CatalogItem>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogLookup for FakeLookup {
    async fn search(&self, query: &str) -> Vec<CatalogItem> {
        self.count.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.to_string());
        self.items.clone()
    }
}

pub fn dune_item() -> CatalogItem {
    CatalogItem {
        title: "Dune".to_string(),
        authors: vec!["Frank Herbert".to_string()],
        description: Some("Desert planet.".to_string()),
    }
}
