//! Account payloads exchanged with the backend

use serde::{Deserialize, Serialize};

/// User login credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

/// New account registration payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Response for a successful login
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub message: String,
    pub auth_token: String,
    pub user_id: String,
}

/// Response for a successful registration
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterResponse {
    #[serde(default)]
    pub message: String,
    pub user_id: String,
}
