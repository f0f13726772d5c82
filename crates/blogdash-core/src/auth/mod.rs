//! Authentication module for managing admin sessions.
//!
//! This module provides:
//! - `CredentialStore`: the single source of truth for the current session
//! - Session slots: in-memory, JSON file, or OS keychain storage
//! - `guard`: route-level redirect decisions
//! - `login`: password + TOTP login against `/auth/admin/login`
//!
//! Tokens are JWTs; validity is decided by their `exp` claim.

pub mod credentials;
pub mod guard;
pub mod login;
pub mod session;
pub mod slot;
pub mod store;
pub mod token;

pub use credentials::KeyringSlot;
pub use guard::{guard, GuardDecision, Route};
pub use login::{login, logout, LoginOutcome, LoginRequest};
pub use session::{Credentials, Role, StoredSession, UserInfo};
pub use slot::{FileSlot, MemorySlot, SessionSlot, SlotError};
pub use store::CredentialStore;
pub use token::{decode_claims, TokenClaims, TokenError};
