use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder used when a catalog entry lists no authors.
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

/// Placeholder used when a catalog entry carries no description.
pub const NO_DESCRIPTION: &str = "No description available.";

/// Opaque bearer string authenticating calls to the summarization vendor.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Trims the raw input. Returns `None` for empty or whitespace-only values.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Raw form fields as typed by the user, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookForm {
    pub title: String,
    pub author: String,
    pub chapter: String,
}

/// A validated manual query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookQuery {
    pub title: String,
    pub author: String,
    pub chapter: u32,
}

/// A book committed from a catalog lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedBook {
    pub title: String,
    pub authors: Vec<String>,
    pub description: String,
}

impl SelectedBook {
    /// Builds a selection, substituting placeholders for missing authors or
    /// description.
    #[must_use]
    pub fn new(title: String, authors: Vec<String>, description: Option<String>) -> Self {
        let authors = if authors.is_empty() {
            vec![UNKNOWN_AUTHOR.to_string()]
        } else {
            authors
        };
        Self {
            title,
            authors,
            description: description.unwrap_or_else(|| NO_DESCRIPTION.to_string()),
        }
    }

    /// Authors joined for display and for the prompt.
    #[must_use]
    pub fn author_line(&self) -> String {
        self.authors.join(", ")
    }
}

/// Where the title and author of a request come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookSource {
    /// Free-text title and author fields.
    Form { title: String, author: String },
    /// The current catalog selection, if any.
    Selection(Option<SelectedBook>),
}

/// Everything the orchestrator needs from the user for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryInput {
    pub source: BookSource,
    pub chapter: String,
}

impl From<BookForm> for SummaryInput {
    fn from(form: BookForm) -> Self {
        Self {
            source: BookSource::Form {
                title: form.title,
                author: form.author,
            },
            chapter: form.chapter,
        }
    }
}

/// A validated request, ready to be composed into a prompt. Not persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRequest {
    pub title: String,
    pub author: String,
    pub chapter: u32,
}

impl From<BookQuery> for SummaryRequest {
    fn from(query: BookQuery) -> Self {
        Self {
            title: query.title,
            author: query.author,
            chapter: query.chapter,
        }
    }
}

impl SummaryRequest {
    #[must_use]
    pub fn from_selection(book: &SelectedBook, chapter: u32) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author_line(),
            chapter,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryResult {
    pub raw_text: String,
    pub rendered_html: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestError {
    pub message: String,
    pub rendered_html: String,
}

/// Content of the single result region. Each request replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Display {
    Summary(SummaryResult),
    Error(RequestError),
}

impl Display {
    #[must_use]
    pub fn html(&self) -> &str {
        match self {
            Display::Summary(result) => &result.rendered_html,
            Display::Error(error) => &error.rendered_html,
        }
    }
}
