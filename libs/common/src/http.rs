//! JSON-over-HTTP transport
//!
//! Client code builds an [`ApiRequest`], hands it to a [`Transport`] and gets
//! back the raw [`ApiResponse`]. Keeping the seam this narrow lets every
//! reconciler run against a scripted transport in tests.

use std::future::Future;

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// A single backend call, relative to the configured base URL
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    pub bearer: Option<String>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            bearer: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Append a query parameter
    pub fn query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    /// Attach a JSON body
    pub fn json<T: Serialize>(mut self, body: &T) -> ClientResult<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Attach an `Authorization: Bearer` token
    pub fn bearer(mut self, token: Option<&str>) -> Self {
        self.bearer = token.map(str::to_string);
        self
    }
}

/// Status and body of a completed call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Build a response from a JSON value
    pub fn json(status: u16, body: &serde_json::Value) -> Self {
        Self::new(status, body.to_string())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The backend's `error` field, falling back to the raw body text
    pub fn error_message(&self) -> String {
        serde_json::from_str::<serde_json::Value>(&self.body)
            .ok()
            .and_then(|value| {
                value
                    .get("error")
                    .and_then(|e| e.as_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| self.body.trim().to_string())
    }

    /// Turn a non-success status into [`ClientError::ServerRejected`]
    pub fn error_for_status(self) -> ClientResult<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ClientError::ServerRejected {
                status: self.status,
                message: self.error_message(),
            })
        }
    }

    /// Decode the body as JSON
    pub fn decode<T: DeserializeOwned>(&self) -> ClientResult<T> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Anything able to execute an [`ApiRequest`]
pub trait Transport: Send + Sync {
    fn send(&self, request: ApiRequest) -> impl Future<Output = ClientResult<ApiResponse>> + Send;
}

/// Send a request and decode a successful JSON body
pub async fn fetch_json<T, R>(transport: &T, request: ApiRequest) -> ClientResult<R>
where
    T: Transport,
    R: DeserializeOwned,
{
    transport.send(request).await?.error_for_status()?.decode()
}

/// Send a request, only caring whether it succeeded
pub async fn execute<T: Transport>(transport: &T, request: ApiRequest) -> ClientResult<()> {
    transport.send(request).await?.error_for_status()?;
    Ok(())
}

/// reqwest-backed transport
#[derive(Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Create a new transport for the configured backend
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ClientError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> ClientResult<ApiResponse> {
        let url = format!("{}{}", self.base_url, request.path);
        debug!("{} {}", request.method, url);

        let mut builder = self.http.request(request.method.clone(), &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let resp = builder.send().await.map_err(|e| {
            warn!("Request to {} failed: {}", url, e);
            ClientError::NetworkUnreachable(e.to_string())
        })?;

        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| ClientError::NetworkUnreachable(e.to_string()))?;

        Ok(ApiResponse { status, body })
    }
}
