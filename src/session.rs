//! Signed-in user session backed by a small key-value storage.
//!
//! The profile of the signed-in user is kept as JSON under [`SESSION_KEY`].
//! The session object is passed explicitly to whoever needs it.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::user::User;
use crate::forms::auth::{SignInForm, SignInPayload};
use crate::repository::UserReader;
use crate::services::{ServiceError, ServiceResult};

pub const SESSION_KEY: &str = "usuario";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] io::Error),

    #[error("storage format error: {0}")]
    Format(#[from] serde_json::Error),
}

/// Persistent string key-value store.
pub trait SessionStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Storage kept as a single JSON object in a file.
///
/// A missing file reads as empty storage. Every write rewrites the file.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn load(&self) -> Result<HashMap<String, String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(HashMap::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, entries: &HashMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(entries)?)?;
        Ok(())
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.load()?;
        if entries.remove(key).is_some() {
            self.save(&entries)?;
        }
        Ok(())
    }
}

pub struct Session<S: SessionStorage> {
    storage: S,
    user: Option<User>,
}

impl<S: SessionStorage> Session<S> {
    /// Restores the stored profile, if any.
    ///
    /// An unreadable or malformed record leaves the session signed out.
    pub fn init(storage: S) -> Self {
        let user = match storage.get(SESSION_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => Some(user),
                Err(err) => {
                    log::warn!("Ignoring malformed session record: {err}");
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                log::warn!("Failed to read session storage: {err}");
                None
            }
        };

        Self { storage, user }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Signs in the active user registered under the form's email.
    ///
    /// Any non-blank password is accepted. A failed attempt leaves the
    /// session as it was.
    pub fn sign_in<R>(&mut self, repo: &R, form: SignInForm) -> ServiceResult<&User>
    where
        R: UserReader + ?Sized,
    {
        let user = Self::authenticate(repo, form)?;

        let record = serde_json::to_string(&user)
            .map_err(|err| ServiceError::Internal(err.to_string()))?;
        self.storage.set(SESSION_KEY, &record).map_err(|err| {
            log::error!("Failed to store session: {err}");
            ServiceError::from(err)
        })?;

        log::info!("User {} signed in", user.email);
        Ok(&*self.user.insert(user))
    }

    fn authenticate<R>(repo: &R, form: SignInForm) -> ServiceResult<User>
    where
        R: UserReader + ?Sized,
    {
        let SignInPayload { email } = SignInPayload::try_from(form).map_err(|err| {
            log::warn!("Rejected sign-in form: {err}");
            ServiceError::AuthenticationFailed
        })?;

        match repo.get_user_by_email(&email)? {
            Some(user) if user.active => Ok(user),
            Some(_) => {
                log::warn!("Sign-in attempt for inactive user {email}");
                Err(ServiceError::AuthenticationFailed)
            }
            None => {
                log::warn!("Sign-in attempt for unknown user {email}");
                Err(ServiceError::AuthenticationFailed)
            }
        }
    }

    /// Forgets the signed-in user and removes the stored record.
    pub fn sign_out(&mut self) -> Result<(), StorageError> {
        self.user = None;
        self.storage.remove(SESSION_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage_round_trips_values() {
        let mut storage = MemoryStorage::new();
        storage.set("usuario", "{}").unwrap();
        assert_eq!(storage.get("usuario").unwrap().as_deref(), Some("{}"));
        storage.remove("usuario").unwrap();
        assert_eq!(storage.get("usuario").unwrap(), None);
    }

    #[test]
    fn malformed_record_restores_signed_out() {
        let mut storage = MemoryStorage::new();
        storage.set(SESSION_KEY, "{not json").unwrap();

        let session = Session::init(storage);

        assert!(!session.is_signed_in());
    }
}
