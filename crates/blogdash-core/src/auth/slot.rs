//! Storage slots for the persisted session record.
//!
//! A slot holds at most one [`StoredSession`]. The credential store owns
//! the policy (expiry, overwrite semantics); slots only move bytes.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;

use super::session::StoredSession;

/// Session file name in the data directory
const SESSION_FILE: &str = "session.json";

#[derive(Error, Debug)]
pub enum SlotError {
    #[error("Session storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session record is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("Keychain access failed: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("Session slot lock was poisoned")]
    Poisoned,
}

pub trait SessionSlot: Send + Sync {
    fn load(&self) -> Result<Option<StoredSession>, SlotError>;
    fn store(&self, session: &StoredSession) -> Result<(), SlotError>;
    /// Removing an empty slot is not an error.
    fn remove(&self) -> Result<(), SlotError>;
}

/// In-process slot. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemorySlot {
    inner: Mutex<Option<StoredSession>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionSlot for MemorySlot {
    fn load(&self) -> Result<Option<StoredSession>, SlotError> {
        let guard = self.inner.lock().map_err(|_| SlotError::Poisoned)?;
        Ok(guard.clone())
    }

    fn store(&self, session: &StoredSession) -> Result<(), SlotError> {
        let mut guard = self.inner.lock().map_err(|_| SlotError::Poisoned)?;
        *guard = Some(session.clone());
        Ok(())
    }

    fn remove(&self) -> Result<(), SlotError> {
        let mut guard = self.inner.lock().map_err(|_| SlotError::Poisoned)?;
        *guard = None;
        Ok(())
    }
}

/// JSON file in the data directory.
#[derive(Debug, Clone)]
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(SESSION_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionSlot for FileSlot {
    fn load(&self) -> Result<Option<StoredSession>, SlotError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&contents)?))
    }

    fn store(&self, session: &StoredSession) -> Result<(), SlotError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(session)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }

    fn remove(&self) -> Result<(), SlotError> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::session::{Role, UserInfo};

    fn sample() -> StoredSession {
        StoredSession::new(
            "T".to_string(),
            UserInfo {
                name: "A".to_string(),
                role: Role::Author,
                admin_id: 3,
                require_2fa: false,
            },
        )
    }

    #[test]
    fn test_memory_slot_overwrites() {
        let slot = MemorySlot::new();
        assert!(slot.load().unwrap().is_none());

        slot.store(&sample()).unwrap();
        let mut second = sample();
        second.token = "U".to_string();
        slot.store(&second).unwrap();
        assert_eq!(slot.load().unwrap().unwrap().token, "U");

        slot.remove().unwrap();
        slot.remove().unwrap();
        assert!(slot.load().unwrap().is_none());
    }

    #[test]
    fn test_file_slot_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");

        FileSlot::new(&nested).store(&sample()).unwrap();
        let loaded = FileSlot::new(&nested).load().unwrap().unwrap();
        assert_eq!(loaded, sample_with_time(loaded.stored_at));

        let slot = FileSlot::new(&nested);
        slot.remove().unwrap();
        assert!(!slot.path().exists());
        slot.remove().unwrap();
    }

    #[test]
    fn test_file_slot_reports_corruption() {
        let dir = tempfile::tempdir().unwrap();
        let slot = FileSlot::new(dir.path());
        std::fs::write(slot.path(), "{ not json").unwrap();
        assert!(matches!(slot.load(), Err(SlotError::Corrupt(_))));
    }

    fn sample_with_time(stored_at: chrono::DateTime<chrono::Utc>) -> StoredSession {
        StoredSession {
            stored_at,
            ..sample()
        }
    }
}
