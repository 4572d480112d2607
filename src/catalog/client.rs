use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::ai::transport::{HttpCall, Transport};
use crate::core::models::{SelectedBook, UNKNOWN_AUTHOR};
use crate::errors::SummaryError;

pub const BOOKS_SEARCH_URL: &str = "https://www.googleapis.com/books/v1/volumes";

/// Result cap sent with every lookup.
pub const MAX_RESULTS: usize = 5;

/// Queries shorter than this (in characters) never reach the network.
pub const MIN_QUERY_CHARS: usize = 3;

/// One simplified catalog hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogItem {
    pub title: String,
    pub authors: Vec<String>,
    pub description: Option<String>,
}

impl CatalogItem {
    #[must_use]
    pub fn author_line(&self) -> String {
        if self.authors.is_empty() {
            UNKNOWN_AUTHOR.to_string()
        } else {
            self.authors.join(", ")
        }
    }

    /// Converts the hit into a selection, filling placeholders.
    #[must_use]
    pub fn into_selection(self) -> SelectedBook {
        SelectedBook::new(self.title, self.authors, self.description)
    }
}

#[derive(Debug, Deserialize)]
struct VolumesResponse {
    #[serde(default)]
    items: Vec<Volume>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Volume {
    #[serde(default)]
    volume_info: VolumeInfo,
}

#[derive(Debug, Default, Deserialize)]
struct VolumeInfo {
    #[serde(default)]
    title: String,
    #[serde(default)]
    authors: Vec<String>,
    description: Option<String>,
}

fn item_from(volume: Volume) -> CatalogItem {
    let info = volume.volume_info;
    CatalogItem {
        title: info.title,
        authors: info.authors,
        description: info.description,
    }
}

/// Whether `query` is long enough to be looked up.
#[must_use]
pub fn is_searchable(query: &str) -> bool {
    query.trim().chars().count() >= MIN_QUERY_CHARS
}

#[must_use]
pub fn search_url(query: &str) -> String {
    format!(
        "{BOOKS_SEARCH_URL}?q={}&maxResults={MAX_RESULTS}",
        urlencoding::encode(query.trim())
    )
}

#[async_trait]
pub trait CatalogLookup: Send + Sync {
    /// Looks up `query`. Failures yield no results; they are never surfaced.
    async fn search(&self, query: &str) -> Vec<CatalogItem>;
}

/// Read-only client for the public book-metadata service.
pub struct CatalogClient {
    transport: Arc<dyn Transport>,
}

impl CatalogClient {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    async fn fetch(&self, query: &str) -> Result<Vec<CatalogItem>, SummaryError> {
        let response = self.transport.send(&HttpCall::get(search_url(query))).await?;
        if !response.is_success() {
            return Err(SummaryError::Lookup(format!("status {}", response.status)));
        }
        let decoded: VolumesResponse = serde_json::from_str(&response.body)
            .map_err(|e| SummaryError::Lookup(format!("decode: {e}")))?;
        Ok(decoded
            .items
            .into_iter()
            .take(MAX_RESULTS)
            .map(item_from)
            .collect())
    }
}

#[async_trait]
impl CatalogLookup for CatalogClient {
    async fn search(&self, query: &str) -> Vec<CatalogItem> {
        if !is_searchable(query) {
            return Vec::new();
        }
        match self.fetch(query).await {
            Ok(items) => {
                debug!("Catalog lookup for '{}' returned {} items", query, items.len());
                items
            }
            Err(e) => {
                warn!("Error searching books: {}", e);
                Vec::new()
            }
        }
    }
}
