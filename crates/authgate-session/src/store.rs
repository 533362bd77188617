//! Session storage: where the token survives between process runs.
//!
//! [`SessionStore`] is a small synchronous key-value capability, the
//! shape of a browser's session storage. Two backends ship here:
//!
//! - [`MemorySessionStore`] — a `HashMap` behind a mutex. Lives as long
//!   as the process; the default for tests.
//! - [`FileSessionStore`] — one JSON object in one file, so a token
//!   outlives a restart.
//!
//! [`TokenStore`] sits on top of either and speaks in tokens rather than
//! raw strings.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use authgate_protocol::{decode_stored_token, encode_stored_token};

use crate::{AuthError, StoreError};

/// Key-value storage for session data.
///
/// Each call is a single atomic operation from the caller's point of view.
pub trait SessionStore: Send + Sync + 'static {
    /// Returns the value stored under `key`, if any.
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove_item(&self, key: &str) -> Result<(), StoreError>;
}

/// A shared handle is a store too. Tests keep one `Arc` to inspect what
/// the controller wrote through the other.
impl<T: SessionStore> SessionStore for Arc<T> {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove_item(key)
    }
}

// ---------------------------------------------------------------------------
// MemorySessionStore
// ---------------------------------------------------------------------------

/// In-process session storage.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    items: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.items.lock().map(|items| items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionStore for MemorySessionStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        let items = self.items.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut items = self.items.lock().map_err(|_| StoreError::Poisoned)?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        let mut items = self.items.lock().map_err(|_| StoreError::Poisoned)?;
        items.remove(key);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FileSessionStore
// ---------------------------------------------------------------------------

/// Session storage backed by a single JSON file.
///
/// The file holds one object mapping keys to string values. A missing file
/// reads as empty. Every write rewrites the file through a sibling temp
/// file and a rename, so a crash mid-write leaves the old contents intact.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileSessionStore {
    /// Creates a store over `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<HashMap<String, String>, StoreError> {
        match std::fs::read(&self.path) {
            Ok(bytes) if bytes.is_empty() => Ok(HashMap::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// `session.json` writes through `session.json.tmp`.
    fn temp_path(&self) -> Result<PathBuf, StoreError> {
        let name = self.path.file_name().ok_or_else(|| {
            std::io::Error::new(
                ErrorKind::InvalidInput,
                format!("session path {} has no file name", self.path.display()),
            )
        })?;
        let mut tmp = name.to_os_string();
        tmp.push(".tmp");
        Ok(self.path.with_file_name(tmp))
    }

    fn save(&self, items: &HashMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.temp_path()?;
        std::fs::write(&tmp, serde_json::to_vec(items)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(self.load()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        let mut items = self.load()?;
        items.insert(key.to_string(), value.to_string());
        self.save(&items)
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        let mut items = self.load()?;
        if items.remove(key).is_some() {
            self.save(&items)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// TokenStore
// ---------------------------------------------------------------------------

/// The token slot of a [`SessionStore`].
///
/// Tokens are stored JSON-encoded (`"abc"` with the quotes) under a single
/// key, the same form a web client keeps in session storage.
#[derive(Debug)]
pub struct TokenStore<S> {
    store: S,
    key: String,
}

impl<S: SessionStore> TokenStore<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Reads the persisted token. An empty token reads as none.
    ///
    /// # Errors
    /// - [`AuthError::Store`] — the backend failed
    /// - [`AuthError::InvalidToken`] — the stored value is not a JSON string
    pub fn get(&self) -> Result<Option<String>, AuthError> {
        match self.store.get_item(&self.key)? {
            Some(raw) => Ok(decode_stored_token(&raw)?.filter(|token| !token.is_empty())),
            None => Ok(None),
        }
    }

    /// Persists `token`, replacing any previous one.
    pub fn set(&self, token: &str) -> Result<(), AuthError> {
        let raw = encode_stored_token(token)?;
        self.store.set_item(&self.key, &raw)?;
        Ok(())
    }

    /// Removes the persisted token, if any.
    pub fn remove(&self) -> Result<(), StoreError> {
        self.store.remove_item(&self.key)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// The underlying store.
    pub fn inner(&self) -> &S {
        &self.store
    }
}
