//! Session state and its on-disk store

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::auth::types::Role;
use crate::error::Error;

/// An authenticated session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// The signed-in user's id
    pub user_id: i64,

    /// The signed-in user's email
    pub email: String,

    /// Display name of the signed-in user
    pub display_name: String,

    /// Role the session operates under
    pub role: Role,

    /// Bearer token attached to every authenticated request
    pub access_token: String,
}

/// File-backed session persistence.
///
/// Mirrors what the browser client kept in local storage: the token and
/// profile survive a restart so the user is not forced to log in again.
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Create a store backed by the given file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file this store reads and writes
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted session, if any.
    ///
    /// A missing file means logged out; a corrupt file is treated the same
    /// way rather than failing startup.
    pub fn load(&self) -> Result<Option<Session>, Error> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        match serde_json::from_slice(&bytes) {
            Ok(session) => Ok(Some(session)),
            Err(err) => {
                warn!(path = %self.path.display(), %err, "discarding unreadable session file");
                Ok(None)
            }
        }
    }

    /// Persist a session, replacing any previous one
    pub fn save(&self, session: &Session) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_vec_pretty(session)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    /// Remove the persisted session; a no-op when none exists
    pub fn clear(&self) -> Result<(), Error> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
