//! Session token storage.
//!
//! DESIGN
//! ======
//! The bearer token is a single string slot keyed by [`TOKEN_KEY`]. Callers
//! hold a [`Session`] handle and every authenticated request re-reads it, so
//! a token swapped between two calls is picked up by the second one.
//! Concurrent writers are last-write-wins; the locks below only keep the
//! slot memory-safe.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use serde_json::{Map, Value};

/// Storage key of the Fishon bearer token.
pub const TOKEN_KEY: &str = "fishonToken";

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced while persisting the session token.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The backing file could not be read or written.
    #[error("session storage I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing file exists but is not a JSON object.
    #[error("session storage at {path} is malformed: {message}")]
    Malformed { path: PathBuf, message: String },
}

impl SessionError {
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "E_SESSION_IO",
            Self::Malformed { .. } => "E_SESSION_MALFORMED",
        }
    }
}

// =============================================================================
// STORE TRAIT
// =============================================================================

/// A persisted slot holding at most one session token.
pub trait TokenStore: Send + Sync {
    /// Current token, if one is stored.
    fn get(&self) -> Option<String>;

    /// Replace the stored token.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn set(&self, token: &str) -> Result<(), SessionError>;

    /// Remove the stored token. Removing an absent token is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn clear(&self) -> Result<(), SessionError>;
}

/// Process-local token slot.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    slot: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_token(token: &str) -> Self {
        Self { slot: RwLock::new(Some(token.to_owned())) }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<String> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set(&self, token: &str) -> Result<(), SessionError> {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = Some(token.to_owned());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

/// Token slot persisted in a JSON key/value file.
///
/// The file plays the role of origin-scoped local storage: the token sits
/// under [`TOKEN_KEY`] and any other keys in the file are preserved across
/// writes, whatever their JSON type. A missing file means no token. A file
/// that is not a JSON object holds no token and is replaced on the next
/// write.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    lock: RwLock<()>,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), lock: RwLock::new(()) }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Map<String, Value>, SessionError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(source) => return Err(SessionError::Io { path: self.path.clone(), source }),
        };
        if raw.trim().is_empty() {
            return Ok(Map::new());
        }
        serde_json::from_str(&raw)
            .map_err(|e| SessionError::Malformed { path: self.path.clone(), message: e.to_string() })
    }

    /// Entries to rewrite, and whether the file was unparseable. A malformed
    /// file is dropped so the token slot can always be written or cleared.
    fn load_for_write(&self) -> Result<(Map<String, Value>, bool), SessionError> {
        match self.load() {
            Ok(entries) => Ok((entries, false)),
            Err(e @ SessionError::Malformed { .. }) => {
                tracing::warn!(error = %e, "resetting malformed session storage");
                Ok((Map::new(), true))
            }
            Err(e) => Err(e),
        }
    }

    fn store(&self, entries: &Map<String, Value>) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|source| SessionError::Io { path: parent.to_path_buf(), source })?;
            }
        }
        let rendered = serde_json::to_string_pretty(entries)
            .map_err(|e| SessionError::Malformed { path: self.path.clone(), message: e.to_string() })?;
        std::fs::write(&self.path, rendered).map_err(|source| SessionError::Io { path: self.path.clone(), source })
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Option<String> {
        let _guard = self.lock.read().unwrap_or_else(PoisonError::into_inner);
        match self.load() {
            Ok(entries) => match entries.get(TOKEN_KEY) {
                Some(Value::String(token)) => Some(token.clone()),
                _ => None,
            },
            Err(e) => {
                tracing::warn!(error = %e, "session storage unreadable; treating as logged out");
                None
            }
        }
    }

    fn set(&self, token: &str) -> Result<(), SessionError> {
        let _guard = self.lock.write().unwrap_or_else(PoisonError::into_inner);
        let (mut entries, _) = self.load_for_write()?;
        entries.insert(TOKEN_KEY.to_owned(), Value::String(token.to_owned()));
        self.store(&entries)
    }

    fn clear(&self) -> Result<(), SessionError> {
        let _guard = self.lock.write().unwrap_or_else(PoisonError::into_inner);
        let (mut entries, reset) = self.load_for_write()?;
        if entries.remove(TOKEN_KEY).is_none() && !reset {
            return Ok(());
        }
        self.store(&entries)
    }
}

// =============================================================================
// SESSION HANDLE
// =============================================================================

/// Shared handle over the token slot. Cloning shares the same slot.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn TokenStore>,
}

impl Session {
    pub fn new(store: impl TokenStore + 'static) -> Self {
        Self { store: Arc::new(store) }
    }

    /// Session backed by a fresh in-memory slot.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryTokenStore::new())
    }

    #[must_use]
    pub fn get(&self) -> Option<String> {
        self.store.get()
    }

    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    pub fn set(&self, token: &str) -> Result<(), SessionError> {
        self.store.set(token)
    }

    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    pub fn clear(&self) -> Result<(), SessionError> {
        self.store.clear()
    }

    #[must_use]
    pub fn is_present(&self) -> bool {
        self.get().is_some()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("present", &self.is_present())
            .finish()
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
