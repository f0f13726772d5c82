//! Subcommand handlers. Each protected handler runs the session guard for
//! its route before calling the API.

pub mod admins;
pub mod categories;
pub mod compose;
pub mod dashboard;
pub mod images;
pub mod links;
pub mod logs;
pub mod posts;
pub mod profile;
pub mod session;
pub mod settings;
