//! booksum - spoiler-bounded book summaries up to a chosen chapter.
//!
//! The user stores a personal API key, optionally picks a book from a public
//! catalog search, and asks a large-language-model service for a structured
//! recap that stops at a given chapter. The result is rendered as markup.
//!
//! # Architecture
//!
//! - `core` holds the domain types, configuration and the injected
//!   key/value persistence behind the credential store and selection state
//! - `catalog` looks books up in the public catalog, with debounced input
//! - `ai` orchestrates one summary request through a per-endpoint adapter
//! - `views` turns results and errors into markup
//! - `app` owns application state and the command handlers a front-end calls
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use booksum::ai::{HttpTransport, SummaryClient, vendors::AnthropicAdapter};
//! use booksum::core::models::{BookForm, Credential, SummaryInput};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     booksum::setup_logging();
//!
//!     let client = SummaryClient::new(
//!         Box::new(AnthropicAdapter::direct(None)),
//!         Arc::new(HttpTransport::new()),
//!     );
//!     let input = SummaryInput::from(BookForm {
//!         title: "Dune".into(),
//!         author: "Frank Herbert".into(),
//!         chapter: "5".into(),
//!     });
//!     let credential = Credential::parse("sk-ant-...");
//!
//!     let result = client.request_summary(&input, credential.as_ref()).await?;
//!     println!("{}", result.rendered_html);
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod ai;
pub mod app;
pub mod catalog;
pub mod core;
pub mod errors;
pub mod prompt;
pub mod views;

/// Configure structured logging with JSON lines on stderr.
///
/// Filtering follows `RUST_LOG` and defaults to `warn`, so stdout stays free
/// for rendered output. Calling it more than once is harmless.
///
/// # Example
///
/// ```
/// booksum::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_target(true)
        .with_writer(std::io::stderr);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
