//! Scripted in-memory transport for tests
//!
//! Answers every request from a closure and keeps a log of what was sent, so
//! tests can assert both on state changes and on the absence of network
//! traffic.

use std::sync::{Arc, Mutex};

use crate::error::{ClientError, ClientResult};
use crate::http::{ApiRequest, ApiResponse, Transport};

type Responder = dyn Fn(&ApiRequest) -> ClientResult<ApiResponse> + Send + Sync;

/// Transport double that replays canned responses
#[derive(Clone)]
pub struct StubTransport {
    responder: Arc<Responder>,
    sent: Arc<Mutex<Vec<ApiRequest>>>,
}

impl StubTransport {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&ApiRequest) -> ClientResult<ApiResponse> + Send + Sync + 'static,
    {
        Self {
            responder: Arc::new(responder),
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A transport whose every request fails as if the backend were down
    pub fn unreachable() -> Self {
        Self::new(|_| Err(ClientError::NetworkUnreachable("connection refused".to_string())))
    }

    /// A transport answering every request with the same status and JSON body
    pub fn always(status: u16, body: serde_json::Value) -> Self {
        Self::new(move |_| Ok(ApiResponse::json(status, &body)))
    }

    /// Every request sent so far, in order
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.sent.lock().map(|log| log.clone()).unwrap_or_default()
    }

    pub fn request_count(&self) -> usize {
        self.sent.lock().map(|log| log.len()).unwrap_or_default()
    }
}

impl Transport for StubTransport {
    async fn send(&self, request: ApiRequest) -> ClientResult<ApiResponse> {
        let result = (self.responder)(&request);
        if let Ok(mut log) = self.sent.lock() {
            log.push(request);
        }
        result
    }
}
