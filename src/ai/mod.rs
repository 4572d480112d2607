//! All summarization-vendor functionality

pub mod client;
pub mod transport;
pub mod vendors;

// Re-export main types for convenience
pub use client::SummaryClient;
pub use transport::{HttpCall, HttpTransport, RawResponse, Transport};
pub use vendors::{VendorAdapter, VendorReply, adapter_for};
