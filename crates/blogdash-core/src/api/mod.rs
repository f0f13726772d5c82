//! REST API access for the blog backend.
//!
//! - `Gateway`: dispatches requests and enforces the session policy
//! - `AdminClient`: typed wrappers over the `/auth/...` admin endpoints
//! - `transport`: the HTTP seam, with a `reqwest` implementation
//!
//! The backend authenticates with JWT bearer tokens obtained from
//! `/auth/admin/login`.

pub mod client;
pub mod error;
pub mod gateway;
pub mod transport;

pub use client::AdminClient;
pub use error::{ApiError, AuthFailure};
pub use gateway::{Gateway, DEFAULT_REQUEST_TIMEOUT_SECS};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, ReqwestTransport};
