use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use super::client::{CatalogItem, CatalogLookup, is_searchable};

/// Pause in typing required before a lookup fires.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Results of one fired lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResults {
    pub query: String,
    pub items: Vec<CatalogItem>,
}

/// Schedules catalog lookups so that at most one fires per pause in typing.
///
/// Each call to [`SearchDebouncer::input`] cancels the pending lookup, if it
/// has not fired yet, and reschedules. Must be used inside a tokio runtime.
pub struct SearchDebouncer {
    lookup: Arc<dyn CatalogLookup>,
    delay: Duration,
    results: mpsc::UnboundedSender<SearchResults>,
    pending: Option<Pending>,
}

struct Pending {
    handle: JoinHandle<()>,
    fired: Arc<AtomicBool>,
}

impl SearchDebouncer {
    /// Returns the debouncer and the receiving end for fired lookups.
    #[must_use]
    pub fn new(lookup: Arc<dyn CatalogLookup>) -> (Self, mpsc::UnboundedReceiver<SearchResults>) {
        Self::with_delay(lookup, SEARCH_DEBOUNCE)
    }

    #[must_use]
    pub fn with_delay(
        lookup: Arc<dyn CatalogLookup>,
        delay: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<SearchResults>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                lookup,
                delay,
                results: tx,
                pending: None,
            },
            rx,
        )
    }

    /// Handles one keystroke's worth of query text.
    pub fn input(&mut self, query: &str) {
        self.cancel();
        if !is_searchable(query) {
            return;
        }

        let query = query.trim().to_string();
        let lookup = Arc::clone(&self.lookup);
        let results = self.results.clone();
        let delay = self.delay;
        let fired = Arc::new(AtomicBool::new(false));
        let fired_flag = Arc::clone(&fired);
        debug!("Scheduling catalog lookup for '{}' in {:?}", query, delay);

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            fired_flag.store(true, Ordering::SeqCst);
            let items = lookup.search(&query).await;
            // Receiver gone means nobody is listening any more.
            let _ = results.send(SearchResults { query, items });
        });
        self.pending = Some(Pending { handle, fired });
    }

    /// Cancels a scheduled lookup that has not fired yet. A lookup already
    /// in flight is left to complete.
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take()
            && !pending.fired.load(Ordering::SeqCst)
        {
            pending.handle.abort();
        }
    }
}

impl Drop for SearchDebouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
