//! Auth record store with pluggable persistence.
//!
//! The store holds one JSON value (or nothing). It is loaded from the
//! persistence port when opened and written back whenever a value is set.
//! Setting nothing (or a falsy value such as `null` or `false`) leaves the
//! persisted copy alone; the store never erases storage.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::Value;
use thiserror::Error;
use tokio::sync::watch;

use crate::http::payload::is_truthy;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("auth storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored auth record is not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("auth storage lock poisoned")]
    Poisoned,
}

/// Load/save capability the store is given.
pub trait AuthPersistence: Send + Sync {
    fn load(&self) -> Result<Option<Value>, AuthError>;
    fn save(&self, auth: &Value) -> Result<(), AuthError>;
}

/// Persists the auth record as a JSON file.
#[derive(Debug, Clone)]
pub struct FilePersistence {
    path: PathBuf,
}

impl FilePersistence {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AuthPersistence for FilePersistence {
    fn load(&self) -> Result<Option<Value>, AuthError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, auth: &Value) -> Result<(), AuthError> {
        fs::write(&self.path, auth.to_string())?;
        Ok(())
    }
}

/// Keeps the serialized record in memory.
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    slot: Mutex<Option<String>>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an already-serialized record.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(raw.into())),
        }
    }

    /// The serialized record currently stored.
    pub fn raw(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }
}

impl AuthPersistence for MemoryPersistence {
    fn load(&self) -> Result<Option<Value>, AuthError> {
        let slot = self.slot.lock().map_err(|_| AuthError::Poisoned)?;
        match slot.as_deref() {
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
            None => Ok(None),
        }
    }

    fn save(&self, auth: &Value) -> Result<(), AuthError> {
        let mut slot = self.slot.lock().map_err(|_| AuthError::Poisoned)?;
        *slot = Some(auth.to_string());
        Ok(())
    }
}

/// Current auth record plus change notification.
pub struct AuthStore<P: AuthPersistence> {
    persistence: P,
    tx: watch::Sender<Option<Value>>,
}

impl<P: AuthPersistence> AuthStore<P> {
    /// Open the store, seeding it from persistence.
    pub fn open(persistence: P) -> Result<Self, AuthError> {
        let initial = persistence.load()?;
        let (tx, _) = watch::channel(initial);
        Ok(Self { persistence, tx })
    }

    /// Snapshot of the current record.
    pub fn get(&self) -> Option<Value> {
        self.tx.borrow().clone()
    }

    /// Replace the record. Truthy values are persisted before subscribers see them.
    pub fn set(&self, auth: Option<Value>) -> Result<(), AuthError> {
        if let Some(value) = auth.as_ref().filter(|value| is_truthy(value)) {
            self.persistence.save(value)?;
        }
        self.tx.send_replace(auth);
        Ok(())
    }

    /// Receiver that observes every later `set`.
    pub fn subscribe(&self) -> watch::Receiver<Option<Value>> {
        self.tx.subscribe()
    }

    /// `Bearer <token>` when the record is an object with a string `token`.
    pub fn bearer_token(&self) -> Option<String> {
        self.tx
            .borrow()
            .as_ref()
            .and_then(|auth| auth.get("token"))
            .and_then(Value::as_str)
            .map(|token| format!("Bearer {token}"))
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }
}
