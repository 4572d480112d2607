//! Summary request orchestration
//!
//! Validates input, composes the prompt, issues exactly one call through the
//! configured [`VendorAdapter`] and converts the reply into display markup.

use std::sync::Arc;
use tracing::{debug, info};

use super::transport::Transport;
use super::vendors::{VendorAdapter, VendorReply};
use crate::core::models::{
    BookSource, Credential, RequestError, SummaryInput, SummaryRequest, SummaryResult,
};
use crate::errors::SummaryError;
use crate::prompt::build_summary_prompt;
use crate::views::{render_error, render_summary};

pub const MISSING_TITLE_NOTICE: &str = "Please enter a book title";
pub const MISSING_AUTHOR_NOTICE: &str = "Please enter the author name";
pub const MISSING_SELECTION_NOTICE: &str = "Please search for and select a book first";
pub const INVALID_CHAPTER_NOTICE: &str = "Please enter a valid chapter number";

/// Parses a chapter field. Only whole numbers of at least 1 are accepted.
#[must_use]
pub fn parse_chapter(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|n| *n >= 1)
}

/// Checks user input in the order the form presents it.
///
/// # Errors
///
/// Returns [`SummaryError::Validation`] for the first missing or invalid
/// field, or [`SummaryError::CredentialMissing`] when no credential is given.
pub fn validate<'a>(
    input: &SummaryInput,
    credential: Option<&'a Credential>,
) -> Result<(SummaryRequest, &'a Credential), SummaryError> {
    let invalid = |notice: &str| SummaryError::Validation(notice.to_string());

    let (title, author) = match &input.source {
        BookSource::Form { title, author } => {
            let title = title.trim();
            let author = author.trim();
            if title.is_empty() {
                return Err(invalid(MISSING_TITLE_NOTICE));
            }
            if author.is_empty() {
                return Err(invalid(MISSING_AUTHOR_NOTICE));
            }
            (title.to_string(), author.to_string())
        }
        BookSource::Selection(Some(book)) if !book.title.trim().is_empty() => {
            (book.title.clone(), book.author_line())
        }
        BookSource::Selection(_) => return Err(invalid(MISSING_SELECTION_NOTICE)),
    };

    let chapter = parse_chapter(&input.chapter).ok_or_else(|| invalid(INVALID_CHAPTER_NOTICE))?;
    let credential = credential.ok_or(SummaryError::CredentialMissing)?;

    Ok((
        SummaryRequest {
            title,
            author,
            chapter,
        },
        credential,
    ))
}

pub struct SummaryClient {
    adapter: Box<dyn VendorAdapter>,
    transport: Arc<dyn Transport>,
}

impl SummaryClient {
    #[must_use]
    pub fn new(adapter: Box<dyn VendorAdapter>, transport: Arc<dyn Transport>) -> Self {
        Self { adapter, transport }
    }

    #[must_use]
    pub fn adapter(&self) -> &dyn VendorAdapter {
        self.adapter.as_ref()
    }

    /// Runs one summary request end to end.
    ///
    /// # Errors
    ///
    /// Validation failures return before any network call. Transport, vendor
    /// and empty-reply failures are returned after the single call completes.
    pub async fn request_summary(
        &self,
        input: &SummaryInput,
        credential: Option<&Credential>,
    ) -> Result<SummaryResult, SummaryError> {
        let (request, credential) = validate(input, credential)?;
        self.dispatch(&request, credential).await
    }

    /// Sends an already validated request.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or the reply carries no text.
    pub async fn dispatch(
        &self,
        request: &SummaryRequest,
        credential: &Credential,
    ) -> Result<SummaryResult, SummaryError> {
        let prompt = build_summary_prompt(request);

        #[cfg(feature = "debug-logs")]
        debug!("Using prompt:\n{}", prompt);

        let call = self.adapter.build_call(request, &prompt, credential);
        info!(
            endpoint = self.adapter.kind().as_str(),
            chapter = request.chapter,
            "Dispatching summary request"
        );

        let response = self.transport.send(&call).await?;
        debug!("Summary endpoint responded with status {}", response.status);

        match self.adapter.parse_reply(&response) {
            VendorReply::Text(text) => Ok(SummaryResult {
                rendered_html: render_summary(request, &text),
                raw_text: text,
            }),
            VendorReply::Error(e) => Err(e),
        }
    }

    /// Inline markup for a failed request, with this endpoint's checklist.
    #[must_use]
    pub fn render_failure(&self, error: &SummaryError) -> RequestError {
        let message = error.to_string();
        RequestError {
            rendered_html: render_error(&message, self.adapter.troubleshooting()),
            message,
        }
    }
}
