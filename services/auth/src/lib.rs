//! Authentication client for RetroRewind
//!
//! Wraps the backend's login and registration endpoints and owns the
//! [`AuthContext`] that every user-scoped call takes as input.

pub mod models;
pub mod session;
pub mod validation;

pub use models::{AuthContext, Identity, LoginCredentials, NewAccount};
pub use session::SessionManager;
