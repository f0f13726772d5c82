use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

use super::session::{Credentials, StoredSession, UserInfo};
use super::slot::{MemorySlot, SessionSlot, SlotError};
use super::token::{decode_claims, TokenClaims};

/// Single source of truth for "who is logged in".
///
/// Clones share the same slot. Callers should re-read through the store
/// before each use instead of holding on to a token.
#[derive(Clone)]
pub struct CredentialStore {
    slot: Arc<dyn SessionSlot>,
}

impl CredentialStore {
    pub fn new(slot: Arc<dyn SessionSlot>) -> Self {
        Self { slot }
    }

    /// Store backed by process memory only.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemorySlot::new()))
    }

    /// Store a new session, replacing any prior one.
    pub fn set(&self, token: impl Into<String>, user: UserInfo) -> Result<(), SlotError> {
        let stored = StoredSession::new(token.into(), user);
        self.slot.store(&stored)?;
        info!(admin_id = stored.user.admin_id, role = %stored.user.role, "Session stored");
        Ok(())
    }

    /// Current session, or empty credentials. Never fails.
    pub fn get(&self) -> Credentials {
        self.get_at(Utc::now())
    }

    pub fn get_at(&self, now: DateTime<Utc>) -> Credentials {
        self.load_at(now).map(Credentials::from).unwrap_or_default()
    }

    /// Remove the session unconditionally.
    pub fn clear(&self) {
        match self.slot.remove() {
            Ok(()) => debug!("Session cleared"),
            Err(e) => warn!(error = %e, "Failed to remove session record"),
        }
    }

    /// Whether a token is present and its `exp` claim is in the future.
    /// Undecodable tokens count as invalid.
    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        match self.claims_at(now) {
            Some(claims) => !claims.is_expired_at(now),
            None => false,
        }
    }

    /// The current token, but only if it is still valid. Reads the slot
    /// once, so the token returned is the one that was checked.
    pub fn valid_token(&self) -> Option<String> {
        let now = Utc::now();
        let token = self.get_at(now).token?;
        match decode_claims(&token) {
            Ok(claims) if !claims.is_expired_at(now) => Some(token),
            _ => None,
        }
    }

    /// Decoded claims of the current token, if any.
    pub fn claims(&self) -> Option<TokenClaims> {
        self.claims_at(Utc::now())
    }

    /// Time until the token expires, clamped at zero.
    pub fn expires_in(&self) -> Option<Duration> {
        let now = Utc::now();
        let expiry = self.claims_at(now)?.expires_at().ok()?;
        Some((expiry - now).max(Duration::zero()))
    }

    fn claims_at(&self, now: DateTime<Utc>) -> Option<TokenClaims> {
        let token = self.get_at(now).token?;
        match decode_claims(&token) {
            Ok(claims) => Some(claims),
            Err(e) => {
                debug!(error = %e, "Stored token could not be decoded");
                None
            }
        }
    }

    fn load_at(&self, now: DateTime<Utc>) -> Option<StoredSession> {
        match self.slot.load() {
            Ok(Some(stored)) if stored.is_carrier_expired_at(now) => {
                debug!(stored_at = %stored.stored_at, "Session carrier expired");
                None
            }
            Ok(stored) => stored,
            Err(e) => {
                warn!(error = %e, "Failed to read session record");
                None
            }
        }
    }
}
