use std::sync::Arc;
use tracing::warn;

use super::models::Credential;
use super::storage::{CREDENTIAL_KEY, Storage};
use crate::errors::SummaryError;

pub const INVALID_KEY_NOTICE: &str = "Please enter a valid API key";
pub const CLEAR_KEY_PROMPT: &str = "Are you sure you want to clear your API key?";

/// Persists the single credential under [`CREDENTIAL_KEY`].
#[derive(Clone)]
pub struct CredentialStore {
    storage: Arc<dyn Storage>,
}

impl CredentialStore {
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Trims and persists `raw`.
    ///
    /// # Errors
    ///
    /// Returns [`SummaryError::Validation`] if `raw` is empty after trimming
    /// (nothing is written), or a storage error if the write fails.
    pub fn save(&self, raw: &str) -> Result<Credential, SummaryError> {
        let credential = Credential::parse(raw)
            .ok_or_else(|| SummaryError::Validation(INVALID_KEY_NOTICE.to_string()))?;
        self.storage.set(CREDENTIAL_KEY, credential.expose())?;
        Ok(credential)
    }

    /// Returns the persisted credential. Read failures are logged and treated
    /// as absent.
    #[must_use]
    pub fn load(&self) -> Option<Credential> {
        match self.storage.get(CREDENTIAL_KEY) {
            Ok(value) => value.as_deref().and_then(Credential::parse),
            Err(e) => {
                warn!("Failed to read stored credential: {}", e);
                None
            }
        }
    }

    /// Deletes the credential once `confirm` agrees. Returns whether anything
    /// was cleared; a declined confirmation leaves the store untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    pub fn clear<F>(&self, confirm: F) -> Result<bool, SummaryError>
    where
        F: FnOnce(&str) -> bool,
    {
        if !confirm(CLEAR_KEY_PROMPT) {
            return Ok(false);
        }
        self.storage.remove(CREDENTIAL_KEY)?;
        Ok(true)
    }
}
