//! Session management against the backend's auth endpoints

use tracing::{info, warn};

use common::http::fetch_json;
use common::{ApiRequest, ClientResult, Transport};

use crate::models::{AuthContext, LoginCredentials, LoginResponse, NewAccount, RegisterResponse};
use crate::validation::{validate_login, validate_registration};

/// Session manager holding the current user's [`AuthContext`]
pub struct SessionManager<T> {
    transport: T,
    context: AuthContext,
}

impl<T: Transport> SessionManager<T> {
    /// Create a new, anonymous session
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            context: AuthContext::anonymous(),
        }
    }

    /// The current authentication context
    pub fn context(&self) -> &AuthContext {
        &self.context
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Log in and, on success, replace the current context
    ///
    /// A failed login leaves the previous context untouched.
    pub async fn login(&mut self, credentials: &LoginCredentials) -> ClientResult<&AuthContext> {
        validate_login(credentials)?;
        info!("Login attempt for: {}", credentials.email);

        let request = ApiRequest::post("/login").json(credentials)?;
        let response: LoginResponse = fetch_json(&self.transport, request).await.map_err(|e| {
            warn!("Login failed for {}: {}", credentials.email, e);
            e
        })?;

        self.context = AuthContext::authenticated(response.user_id, response.auth_token);
        info!("Logged in as user: {:?}", self.context.user_id());
        Ok(&self.context)
    }

    /// Register a new account; returns the new user's identifier
    ///
    /// Registration does not log the user in.
    pub async fn register(
        &self,
        account: &NewAccount,
        confirm_password: &str,
    ) -> ClientResult<String> {
        validate_registration(account, confirm_password)?;
        info!("Registering user: {}", account.username);

        let request = ApiRequest::post("/register").json(account)?;
        let response: RegisterResponse = fetch_json(&self.transport, request).await?;

        info!("Registered user: {}", response.user_id);
        Ok(response.user_id)
    }

    /// Drop the current identity; purely local
    pub fn logout(&mut self) {
        if let Some(user_id) = self.context.user_id() {
            info!("Logging out user: {}", user_id);
        }
        self.context = AuthContext::anonymous();
    }
}
