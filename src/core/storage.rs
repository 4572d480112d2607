//! Key/value persistence scoped to one user profile.
//!
//! The credential store and selection state never touch the disk directly;
//! they are handed a [`Storage`] so tests can swap in [`MemoryStorage`].

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

use crate::errors::SummaryError;

/// Key under which the credential is persisted.
pub const CREDENTIAL_KEY: &str = "claude_api_key";

/// Key under which the serialized catalog selection is persisted.
pub const SELECTED_BOOK_KEY: &str = "selected_book";

const STORE_FILE: &str = "store.json";

pub trait Storage: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, SummaryError>;

    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), SummaryError>;

    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn remove(&self, key: &str) -> Result<(), SummaryError>;
}

fn poisoned() -> SummaryError {
    SummaryError::Storage("storage lock poisoned".to_string())
}

/// Process-local storage. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, SummaryError> {
        let entries = self.entries.lock().map_err(|_| poisoned())?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SummaryError> {
        let mut entries = self.entries.lock().map_err(|_| poisoned())?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SummaryError> {
        let mut entries = self.entries.lock().map_err(|_| poisoned())?;
        entries.remove(key);
        Ok(())
    }
}

/// A single JSON object on disk, rewritten on every change.
///
/// On unix the directory it creates is owner-only (0700) and the store file
/// is always written 0600.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    guard: Mutex<()>,
}

impl FileStorage {
    /// Opens (or lazily creates) the store inside `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if `dir` cannot be created.
    pub fn open(dir: &Path) -> Result<Self, SummaryError> {
        create_private_dir(dir)?;
        Ok(Self {
            path: dir.join(STORE_FILE),
            guard: Mutex::new(()),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_raw(&self) -> Result<Option<String>, SummaryError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(None),
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, SummaryError> {
        match self.read_raw()? {
            Some(contents) => Ok(serde_json::from_str(&contents)?),
            None => Ok(BTreeMap::new()),
        }
    }

    /// Reads the entries ahead of a rewrite. An undecodable file is
    /// discarded so the rewrite replaces it; the flag reports that case.
    fn read_for_update(&self) -> Result<(BTreeMap<String, String>, bool), SummaryError> {
        let Some(contents) = self.read_raw()? else {
            return Ok((BTreeMap::new(), false));
        };
        match serde_json::from_str(&contents) {
            Ok(entries) => Ok((entries, false)),
            Err(e) => {
                warn!(
                    "Discarding undecodable store at {}: {}",
                    self.path.display(),
                    e
                );
                Ok((BTreeMap::new(), true))
            }
        }
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), SummaryError> {
        let tmp = self.path.with_extension("json.tmp");
        // A leftover from an interrupted write would keep its old mode.
        if let Err(e) = fs::remove_file(&tmp)
            && e.kind() != std::io::ErrorKind::NotFound
        {
            return Err(e.into());
        }
        let mut file = private_file_options().open(&tmp)?;
        file.write_all(serde_json::to_string_pretty(entries)?.as_bytes())?;
        file.sync_all()?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(unix)]
fn create_private_dir(dir: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().recursive(true).mode(0o700).create(dir)
}

#[cfg(not(unix))]
fn create_private_dir(dir: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dir)
}

fn private_file_options() -> fs::OpenOptions {
    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    options
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, SummaryError> {
        let _lock = self.guard.lock().map_err(|_| poisoned())?;
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SummaryError> {
        let _lock = self.guard.lock().map_err(|_| poisoned())?;
        let (mut entries, _) = self.read_for_update()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), SummaryError> {
        let _lock = self.guard.lock().map_err(|_| poisoned())?;
        let (mut entries, recovered) = self.read_for_update()?;
        if entries.remove(key).is_some() || recovered {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_storage_survives_reopen() {
        let dir = tempfile::tempdir().expect("tmpdir");
        {
            let store = FileStorage::open(dir.path()).expect("open");
            store.set(CREDENTIAL_KEY, "sk-test").expect("set");
        }
        let store = FileStorage::open(dir.path()).expect("reopen");
        assert_eq!(
            store.get(CREDENTIAL_KEY).expect("get"),
            Some("sk-test".to_string())
        );
    }

    #[test]
    fn file_storage_remove_missing_key_is_noop() {
        let dir = tempfile::tempdir().expect("tmpdir");
        let store = FileStorage::open(dir.path()).expect("open");
        store.remove(SELECTED_BOOK_KEY).expect("remove");
        assert!(!store.path().exists());
    }

    #[test]
    fn corrupt_file_surfaces_storage_error() {
        let dir = tempfile::tempdir().expect("tmpdir");
        let store = FileStorage::open(dir.path()).expect("open");
        fs::write(store.path(), "{not json").expect("write");
        assert!(matches!(
            store.get(CREDENTIAL_KEY),
            Err(SummaryError::Storage(_))
        ));
    }

    #[test]
    fn set_over_corrupt_file_rewrites_store() {
        let dir = tempfile::tempdir().expect("tmpdir");
        let store = FileStorage::open(dir.path()).expect("open");
        fs::write(store.path(), "{not json").expect("write");

        store.set(CREDENTIAL_KEY, "sk-new").expect("set");
        assert_eq!(
            store.get(CREDENTIAL_KEY).expect("get"),
            Some("sk-new".to_string())
        );
    }

    #[test]
    fn remove_over_corrupt_file_rewrites_store() {
        let dir = tempfile::tempdir().expect("tmpdir");
        let store = FileStorage::open(dir.path()).expect("open");
        fs::write(store.path(), "{not json").expect("write");

        store.remove(SELECTED_BOOK_KEY).expect("remove");
        assert_eq!(store.get(CREDENTIAL_KEY).expect("get"), None);
    }

    #[cfg(unix)]
    #[test]
    fn store_file_and_dir_are_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let root = tempfile::tempdir().expect("tmpdir");
        let dir = root.path().join("profile").join("booksum");
        let store = FileStorage::open(&dir).expect("open");
        store.set(CREDENTIAL_KEY, "sk-secret").expect("set");
        store.set(SELECTED_BOOK_KEY, "{}").expect("rewrite");

        let file_mode = fs::metadata(store.path()).expect("meta").permissions().mode();
        assert_eq!(file_mode & 0o777, 0o600, "store.json mode {file_mode:o}");
        let dir_mode = fs::metadata(&dir).expect("meta").permissions().mode();
        assert_eq!(dir_mode & 0o077, 0, "data dir mode {dir_mode:o}");
    }

    #[test]
    fn memory_storage_roundtrip() {
        let store = MemoryStorage::new();
        store.set("k", "v").expect("set");
        assert_eq!(store.get("k").expect("get"), Some("v".to_string()));
        store.remove("k").expect("remove");
        assert_eq!(store.get("k").expect("get"), None);
    }
}
