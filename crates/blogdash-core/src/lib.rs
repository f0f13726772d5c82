//! Core library for blogdash.
//!
//! Session handling, the authenticated request gateway, the typed admin API
//! client and article draft persistence. Front ends (the `blogdash` CLI)
//! build on these and supply navigation through [`shell::Navigator`].

pub mod api;
pub mod auth;
pub mod config;
pub mod draft;
pub mod models;
pub mod shell;
pub mod utils;

pub use api::{AdminClient, ApiError, AuthFailure, Gateway, ReqwestTransport};
pub use auth::{CredentialStore, Route};
pub use config::Config;
pub use draft::{Autosave, Composer, Draft};
pub use shell::{Navigator, Shell};
