use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tracing::warn;

use super::Draft;

/// The single well-known key drafts are stored under.
pub const DRAFT_KEY: &str = "draft-post";

#[derive(Error, Debug)]
pub enum DraftError {
    #[error("No draft recovery is pending")]
    NoPendingRecovery,

    #[error("Draft storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Draft could not be serialized: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Draft store lock was poisoned")]
    Poisoned,
}

/// Storage capability for the one draft slot.
pub trait DraftStore: Send + Sync {
    /// A corrupt record is removed and reported as no draft.
    fn load(&self) -> Result<Option<Draft>, DraftError>;
    /// Overwrites any previous draft.
    fn save(&self, draft: &Draft) -> Result<(), DraftError>;
    fn clear(&self) -> Result<(), DraftError>;
}

/// In-memory draft slot. Clones share the slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryDraftStore {
    slot: Arc<Mutex<Option<Draft>>>,
    saves: Arc<AtomicUsize>,
}

impl MemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `save` calls so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn peek(&self) -> Option<Draft> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }
}

impl DraftStore for MemoryDraftStore {
    fn load(&self) -> Result<Option<Draft>, DraftError> {
        Ok(self.slot.lock().map_err(|_| DraftError::Poisoned)?.clone())
    }

    fn save(&self, draft: &Draft) -> Result<(), DraftError> {
        *self.slot.lock().map_err(|_| DraftError::Poisoned)? = Some(draft.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn clear(&self) -> Result<(), DraftError> {
        *self.slot.lock().map_err(|_| DraftError::Poisoned)? = None;
        Ok(())
    }
}

/// Draft slot persisted as `draft-post.json` in the data directory.
#[derive(Debug, Clone)]
pub struct FileDraftStore {
    path: PathBuf,
}

impl FileDraftStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(format!("{}.json", DRAFT_KEY)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DraftStore for FileDraftStore {
    fn load(&self) -> Result<Option<Draft>, DraftError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&self.path)?;
        match serde_json::from_str(&contents) {
            Ok(draft) => Ok(Some(draft)),
            Err(e) => {
                warn!(error = %e, path = ?self.path, "Discarding corrupt draft");
                self.clear()?;
                Ok(None)
            }
        }
    }

    fn save(&self, draft: &Draft) -> Result<(), DraftError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string(draft)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), DraftError> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}
