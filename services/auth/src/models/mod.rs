//! Authentication models

pub mod session;
pub mod user;

// Re-export for convenience
pub use session::{AuthContext, Identity};
pub use user::{LoginCredentials, LoginResponse, NewAccount, RegisterResponse};
