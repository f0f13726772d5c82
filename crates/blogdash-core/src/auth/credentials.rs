use keyring::Entry;

use super::session::StoredSession;
use super::slot::{SessionSlot, SlotError};

const SERVICE_NAME: &str = "blogdash";

/// Session slot backed by the OS keychain.
///
/// The whole record is serialized into the entry's secret, so the bearer
/// token never touches the filesystem.
pub struct KeyringSlot {
    profile: String,
}

impl KeyringSlot {
    pub fn new(profile: impl Into<String>) -> Self {
        Self {
            profile: profile.into(),
        }
    }

    fn entry(&self) -> Result<Entry, SlotError> {
        Ok(Entry::new(SERVICE_NAME, &self.profile)?)
    }
}

impl SessionSlot for KeyringSlot {
    fn load(&self) -> Result<Option<StoredSession>, SlotError> {
        match self.entry()?.get_password() {
            Ok(secret) => Ok(Some(serde_json::from_str(&secret)?)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn store(&self, session: &StoredSession) -> Result<(), SlotError> {
        let secret = serde_json::to_string(session)?;
        self.entry()?.set_password(&secret)?;
        Ok(())
    }

    fn remove(&self) -> Result<(), SlotError> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
