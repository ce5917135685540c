use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use keyring::Entry;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Keyring service the bearer token is stored under.
const SERVICE_NAME: &str = "wisehire";

/// Fixed key of the persisted credential.
pub const CREDENTIAL_KEY: &str = "token";

/// File name used by [`FileStore`] inside the cache directory.
pub const CREDENTIAL_FILE: &str = "credential.json";

#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("Credential file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Credential file is malformed: {0}")]
    Format(#[from] serde_json::Error),
}

/// Durable backing storage for the bearer credential.
pub trait CredentialStore: Send + Sync {
    fn load(&self) -> Result<Option<String>, CredentialError>;
    fn save(&self, token: &str) -> Result<(), CredentialError>;
    /// Remove the stored credential. Deleting an absent credential is not an error.
    fn delete(&self) -> Result<(), CredentialError>;
}

/// Stores the token in the OS keychain.
pub struct KeyringStore {
    service: String,
}

impl KeyringStore {
    pub fn new() -> Self {
        Self {
            service: SERVICE_NAME.to_string(),
        }
    }

    fn entry(&self) -> Result<Entry, CredentialError> {
        Ok(Entry::new(&self.service, CREDENTIAL_KEY)?)
    }
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore for KeyringStore {
    fn load(&self) -> Result<Option<String>, CredentialError> {
        match self.entry()?.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, token: &str) -> Result<(), CredentialError> {
        self.entry()?.set_password(token)?;
        Ok(())
    }

    fn delete(&self) -> Result<(), CredentialError> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredCredential {
    token: String,
    saved_at: DateTime<Utc>,
}

/// Stores the token as JSON in a file, for hosts without a usable keychain.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(CREDENTIAL_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileStore {
    fn load(&self) -> Result<Option<String>, CredentialError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&self.path)?;
        let stored: StoredCredential = serde_json::from_str(&contents)?;
        Ok(Some(stored.token))
    }

    fn save(&self, token: &str) -> Result<(), CredentialError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let stored = StoredCredential {
            token: token.to_string(),
            saved_at: Utc::now(),
        };
        std::fs::write(&self.path, serde_json::to_string_pretty(&stored)?)?;
        Ok(())
    }

    fn delete(&self) -> Result<(), CredentialError> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

/// Process-local store. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryStore {
    token: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(token.to_string())),
        }
    }
}

impl CredentialStore for MemoryStore {
    fn load(&self) -> Result<Option<String>, CredentialError> {
        Ok(self.token.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }

    fn save(&self, token: &str) -> Result<(), CredentialError> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
        Ok(())
    }

    fn delete(&self) -> Result<(), CredentialError> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

type ClearListener = Box<dyn Fn() + Send + Sync>;

/// The single credential slot held by the API client.
///
/// Memory is authoritative; the durable store is written through on every
/// change. Failures of the durable store are logged and never surfaced, so
/// setting and clearing cannot fail.
pub struct Credentials {
    token: RwLock<Option<String>>,
    store: Box<dyn CredentialStore>,
    listeners: Mutex<Vec<ClearListener>>,
}

impl Credentials {
    /// An empty slot backed by `store`. The store is not read.
    pub fn new(store: Box<dyn CredentialStore>) -> Self {
        Self {
            token: RwLock::new(None),
            store,
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// A slot primed with whatever `store` has persisted.
    pub fn restore(store: Box<dyn CredentialStore>) -> Self {
        let token = match store.load() {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "Failed to read persisted credential, starting anonymous");
                None
            }
        };
        debug!(present = token.is_some(), "Credential restored");
        Self {
            token: RwLock::new(token),
            store,
            listeners: Mutex::new(Vec::new()),
        }
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn is_present(&self) -> bool {
        self.token.read().unwrap_or_else(PoisonError::into_inner).is_some()
    }

    /// Hold `token` and persist it. Last writer wins.
    pub fn set(&self, token: String) {
        if let Err(e) = self.store.save(&token) {
            warn!(error = %e, "Failed to persist credential");
        }
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    /// Drop the held token from memory and durable storage.
    ///
    /// Listeners registered with [`Credentials::on_cleared`] run only when a
    /// token was actually held, so repeated clears are no-ops for them.
    pub fn clear(&self) {
        let previous = self.token.write().unwrap_or_else(PoisonError::into_inner).take();
        if let Err(e) = self.store.delete() {
            warn!(error = %e, "Failed to delete persisted credential");
        }
        if previous.is_some() {
            debug!("Credential cleared");
            let listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
            for listener in listeners.iter() {
                listener();
            }
        }
    }

    /// Run `listener` every time a held credential is cleared.
    pub fn on_cleared(&self, listener: impl Fn() + Send + Sync + 'static) {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Box::new(listener));
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("present", &self.is_present())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_file_store_round_trip_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::in_dir(dir.path());

        assert_eq!(store.load().unwrap(), None);
        store.save("abc.def").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("abc.def"));

        store.delete().unwrap();
        assert!(!store.path().exists());
        // Deleting twice is fine.
        store.delete().unwrap();
    }

    #[test]
    fn test_file_store_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::in_dir(dir.path());
        std::fs::write(store.path(), "not json").unwrap();
        assert!(matches!(store.load(), Err(CredentialError::Format(_))));
    }

    #[test]
    fn test_restore_reads_persisted_token() {
        let credentials = Credentials::restore(Box::new(MemoryStore::with_token("persisted")));
        assert_eq!(credentials.token().as_deref(), Some("persisted"));

        let credentials = Credentials::new(Box::new(MemoryStore::with_token("persisted")));
        assert!(!credentials.is_present());
    }

    #[test]
    fn test_restore_survives_unreadable_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CREDENTIAL_FILE);
        std::fs::write(&path, "{").unwrap();
        let credentials = Credentials::restore(Box::new(FileStore::new(path)));
        assert!(!credentials.is_present());
    }

    #[test]
    fn test_set_and_clear_write_through() {
        let dir = tempfile::tempdir().unwrap();
        let credentials = Credentials::new(Box::new(FileStore::in_dir(dir.path())));

        credentials.set("t1".to_string());
        assert_eq!(FileStore::in_dir(dir.path()).load().unwrap().as_deref(), Some("t1"));

        credentials.clear();
        assert!(!credentials.is_present());
        assert_eq!(FileStore::in_dir(dir.path()).load().unwrap(), None);
    }

    #[test]
    fn test_clear_listeners_fire_only_when_token_held() {
        let credentials = Credentials::new(Box::new(MemoryStore::new()));
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        credentials.on_cleared(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        credentials.clear();
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        credentials.set("t".to_string());
        credentials.clear();
        credentials.clear();
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }
}
