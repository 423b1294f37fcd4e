//! Common library for the RetroRewind client
//!
//! This crate provides shared functionality used across the client crates,
//! including configuration, the backend transport, error handling and the
//! notices shown to users after each action.

pub mod config;
pub mod error;
pub mod http;
pub mod notice;
#[cfg(any(test, feature = "test-util"))]
pub mod stub;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::{ApiRequest, ApiResponse, HttpTransport, Transport};
pub use notice::{Notice, NoticeLevel};

/// Example usage of the transport
///
/// ```rust,no_run
/// use common::{ApiRequest, ClientConfig, HttpTransport};
/// use common::http::fetch_json;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = ClientConfig::from_env()?;
///     let transport = HttpTransport::new(&config)?;
///     let threads: Vec<serde_json::Value> =
///         fetch_json(&transport, ApiRequest::get("/threads")).await?;
///     println!("{} threads", threads.len());
///     Ok(())
/// }
/// ```
pub fn example_usage() {}
