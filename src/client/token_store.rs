//! Persisted session token storage.
//!
//! The client never reaches for process-wide storage: a [`TokenStore`] is
//! injected into [`super::ApiClient`] by the composition root.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde_json::{Map, Value};

/// Key the session token is stored under.
pub const TOKEN_STORAGE_KEY: &str = "ecotrack-token";

/// Synchronous key/value slot for the session token.
///
/// Implementations swallow their own I/O failures (logging them); a token
/// that cannot be persisted behaves like no token.
pub trait TokenStore: Send + Sync + fmt::Debug {
    /// Returns the persisted token, if any.
    fn load(&self) -> Option<String>;

    /// Persists `token`, replacing any previous one.
    fn save(&self, token: &str);

    /// Removes the persisted token.
    fn clear(&self);
}

/// Token kept in process memory only.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store already holding `token`.
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl fmt::Debug for MemoryTokenStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryTokenStore")
            .field("has_token", &self.load().is_some())
            .finish()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn save(&self, token: &str) {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
    }

    fn clear(&self) {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

/// Token persisted in a small JSON key/value file, the way a browser
/// keeps it in local storage.
///
/// The file is read once, on the first [`TokenStore::load`], and the token
/// is cached in memory afterwards. [`TokenStore::save`] and
/// [`TokenStore::clear`] update the cache and write through to disk with
/// blocking `std::fs` calls on the caller's thread.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    // `None` until the file has been read.
    cached: Mutex<Option<Option<String>>>,
}

impl FileTokenStore {
    /// Uses the file at `path`. It is created on first save.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cached: Mutex::new(None),
        }
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Map<String, Value> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Map::new(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "cannot read token file");
                return Map::new();
            }
        };
        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(entries)) => entries,
            _ => {
                tracing::warn!(path = %self.path.display(), "token file is not a JSON object, ignoring it");
                Map::new()
            }
        }
    }

    fn write_entries(&self, entries: Map<String, Value>) {
        let json = Value::Object(entries).to_string();
        if let Err(e) = fs::write(&self.path, json) {
            tracing::warn!(path = %self.path.display(), error = %e, "cannot write token file");
        }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Option<String> {
        let mut cached = self.cached.lock().unwrap_or_else(PoisonError::into_inner);
        cached
            .get_or_insert_with(|| {
                self.read_entries()
                    .get(TOKEN_STORAGE_KEY)
                    .and_then(Value::as_str)
                    .map(ToString::to_string)
            })
            .clone()
    }

    fn save(&self, token: &str) {
        let mut cached = self.cached.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.read_entries();
        entries.insert(TOKEN_STORAGE_KEY.to_string(), Value::String(token.to_string()));
        self.write_entries(entries);
        *cached = Some(Some(token.to_string()));
    }

    fn clear(&self) {
        let mut cached = self.cached.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.read_entries();
        if entries.remove(TOKEN_STORAGE_KEY).is_some() {
            self.write_entries(entries);
        }
        *cached = Some(None);
    }
}
