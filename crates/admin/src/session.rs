//! Persistence of the operator session.
//!
//! The console reads and writes the session only through [`SessionStore`]
//! (`get` / `set` / `clear`), so it can run against a file on disk in the CLI
//! and against memory in tests.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use thiserror::Error;
use tracing::debug;
use winner_core::OperatorId;

use crate::models::session::SessionDocument;

/// Directory (under the user's config dir) holding console state.
const APP_DIR: &str = "winner";

/// File name of the persisted session.
const SESSION_FILE_NAME: &str = "admin-session.json";

/// Errors that can occur when reading or writing the session.
#[derive(Debug, Error)]
pub enum SessionStoreError {
    /// Reading or writing the session file failed.
    #[error("Session file error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The session file exists but is not a valid session document.
    #[error("Session file {path} is corrupt: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Narrow storage interface for the operator identifier.
pub trait SessionStore: Send + Sync {
    /// Read the persisted identifier, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn get(&self) -> Result<Option<OperatorId>, SessionStoreError>;

    /// Persist the identifier, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn set(&self, operator: &OperatorId) -> Result<(), SessionStoreError>;

    /// Remove the persisted identifier. Clearing an empty store succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn clear(&self) -> Result<(), SessionStoreError>;
}

/// Default session file location.
///
/// Uses `$XDG_CONFIG_HOME/winner/admin-session.json`, falling back to
/// `$HOME/.config/winner/admin-session.json`.
#[must_use]
pub fn default_session_path(xdg_config_home: Option<&str>, home: Option<&str>) -> Option<PathBuf> {
    let config_dir = match (xdg_config_home, home) {
        (Some(xdg), _) if !xdg.is_empty() => PathBuf::from(xdg),
        (_, Some(home)) if !home.is_empty() => Path::new(home).join(".config"),
        _ => return None,
    };
    Some(config_dir.join(APP_DIR).join(SESSION_FILE_NAME))
}

/// Session persisted as a small JSON document on disk.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Create a store backed by `path`. The file is created on first `set`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the session file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> SessionStoreError {
        SessionStoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn write_document(&self, document: &SessionDocument) -> Result<(), SessionStoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let json = serde_json::to_vec_pretty(document).map_err(|source| SessionStoreError::Json {
            path: self.path.clone(),
            source,
        })?;
        std::fs::write(&self.path, json).map_err(|e| self.io_error(e))
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self) -> Result<Option<OperatorId>, SessionStoreError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };

        let document: SessionDocument =
            serde_json::from_slice(&bytes).map_err(|source| SessionStoreError::Json {
                path: self.path.clone(),
                source,
            })?;

        // A stored blank value is treated as no session.
        Ok(document
            .admin_steam_id
            .and_then(|raw| OperatorId::parse(&raw).ok()))
    }

    fn set(&self, operator: &OperatorId) -> Result<(), SessionStoreError> {
        debug!(path = %self.path.display(), "Persisting operator session");
        self.write_document(&SessionDocument {
            admin_steam_id: Some(operator.as_str().to_string()),
        })
    }

    fn clear(&self) -> Result<(), SessionStoreError> {
        debug!(path = %self.path.display(), "Clearing operator session");
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

/// In-memory session, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    value: RwLock<Option<OperatorId>>,
    writes: RwLock<usize>,
}

impl MemorySessionStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds a session.
    #[must_use]
    pub fn with_operator(operator: OperatorId) -> Self {
        Self {
            value: RwLock::new(Some(operator)),
            writes: RwLock::new(0),
        }
    }

    /// Number of `set` and `clear` calls made so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        *self.writes.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn record_write(&self) {
        *self.writes.write().unwrap_or_else(PoisonError::into_inner) += 1;
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Result<Option<OperatorId>, SessionStoreError> {
        Ok(self
            .value
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn set(&self, operator: &OperatorId) -> Result<(), SessionStoreError> {
        *self.value.write().unwrap_or_else(PoisonError::into_inner) = Some(operator.clone());
        self.record_write();
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionStoreError> {
        *self.value.write().unwrap_or_else(PoisonError::into_inner) = None;
        self.record_write();
        Ok(())
    }
}

impl<T: SessionStore + ?Sized> SessionStore for std::sync::Arc<T> {
    fn get(&self) -> Result<Option<OperatorId>, SessionStoreError> {
        (**self).get()
    }

    fn set(&self, operator: &OperatorId) -> Result<(), SessionStoreError> {
        (**self).set(operator)
    }

    fn clear(&self) -> Result<(), SessionStoreError> {
        (**self).clear()
    }
}
