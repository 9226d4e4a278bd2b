//! Durable login session.
//!
//! Token and admin info are one record, so a half-written session (token
//! without admin) can never be observed.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::http::ClientError;
use crate::forum::models::AdminInfo;

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub admin: AdminInfo,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("admin", &self.admin)
            .finish()
    }
}

pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<Option<Session>, ClientError>;
    fn save(&self, session: &Session) -> Result<(), ClientError>;
    fn clear(&self) -> Result<(), ClientError>;
}

/// JSON file, replaced via write-to-temp then rename.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

fn io_error(context: &str, path: &Path, err: impl std::fmt::Display) -> ClientError {
    ClientError::Session(format!("{} {}: {}", context, path.display(), err))
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>, ClientError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_error("Failed to read", &self.path, e)),
        };

        match serde_json::from_str::<Session>(&content) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "Discarding corrupt session: {}", e);
                self.clear()?;
                Ok(None)
            }
        }
    }

    fn save(&self, session: &Session) -> Result<(), ClientError> {
        let tmp = self.temp_path();
        let json = serde_json::to_vec_pretty(session)
            .map_err(|e| ClientError::Session(e.to_string()))?;

        let mut file = fs::File::create(&tmp).map_err(|e| io_error("Failed to create", &tmp, e))?;
        file.write_all(&json)
            .and_then(|_| file.sync_all())
            .map_err(|e| io_error("Failed to write", &tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| io_error("Failed to replace", &self.path, e))
    }

    fn clear(&self) -> Result<(), ClientError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error("Failed to remove", &self.path, e)),
        }
    }
}

/// Session kept only for the life of the process
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slot: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> Result<std::sync::MutexGuard<'_, Option<Session>>, ClientError> {
        self.slot
            .lock()
            .map_err(|_| ClientError::Session("session lock poisoned".to_string()))
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>, ClientError> {
        Ok(self.slot()?.clone())
    }

    fn save(&self, session: &Session) -> Result<(), ClientError> {
        *self.slot()? = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), ClientError> {
        *self.slot()? = None;
        Ok(())
    }
}
