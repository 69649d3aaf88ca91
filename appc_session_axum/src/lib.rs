//! appc_session_axum - Axum integration for appc_session
//!
//! Runs an [`appc_session::Strategy`] from axum middleware, keeps the
//! round-trip status in a per-request [`SessionHandle`], and hands the
//! verified user to handlers through the [`AuthUser`] extractor.

mod error;
mod middleware;
mod session;

#[cfg(test)]
mod test_utils;

pub use error::{AuthRejection, into_auth_result};
pub use middleware::{authenticate_parts, require_appc_session};
pub use session::{AuthUser, ConnectionTls, SessionHandle};

// Re-export the strategy crate so hosts need a single dependency
pub use appc_session;
