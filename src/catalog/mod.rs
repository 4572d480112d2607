//! Public book-catalog lookup

pub mod client;
pub mod debounce;

pub use client::{CatalogClient, CatalogItem, CatalogLookup};
pub use debounce::{SearchDebouncer, SearchResults};
