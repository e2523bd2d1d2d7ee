//! Fetching and loading introspection payloads.
//!
//! The remote service publishes its operations as a JSON array. The client
//! retries transient failures (connection errors, non-success statuses) a
//! fixed number of times with a fixed delay. A payload that arrives but is
//! not valid JSON, or not a well-formed operation array, fails immediately.

use std::fs;
use std::path::Path;
use std::time::Duration;

use indexmap::IndexMap;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::{GeneratorError, Result};
use crate::operation::{parse_operations, OperationDescription};

/// Maximum attempts per fetch.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Delay between attempts.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Timeout for a single request; a timed-out request is a failed attempt.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Fixed-delay retry budget for introspection requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one. Zero is treated as one.
    pub max_attempts: u32,
    pub delay: Duration,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: DEFAULT_RETRY_DELAY,
            timeout: REQUEST_TIMEOUT,
        }
    }
}

/// HTTP client for the introspection endpoint.
#[derive(Debug, Clone)]
pub struct IntrospectionClient {
    http: Client,
    policy: RetryPolicy,
    headers: IndexMap<String, String>,
}

impl IntrospectionClient {
    /// Creates a client with the given retry policy and request headers.
    ///
    /// ## Errors
    ///
    /// Returns [`GeneratorError::ConfigError`] if the HTTP client cannot be
    /// built (for example when TLS initialization fails).
    pub fn new(policy: RetryPolicy, headers: IndexMap<String, String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(policy.timeout)
            .build()
            .map_err(|e| GeneratorError::ConfigError(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            policy,
            headers,
        })
    }

    /// Fetches and validates the operation array served at `url`.
    ///
    /// ## Errors
    ///
    /// - [`GeneratorError::Transport`] once every attempt failed
    /// - [`GeneratorError::Decode`] if the body is not JSON
    /// - [`GeneratorError::Shape`] if the JSON is not an operation array
    #[tracing::instrument(skip(self), fields(max_attempts = self.policy.max_attempts))]
    pub async fn fetch(&self, url: &str) -> Result<Vec<OperationDescription>> {
        let body = self.fetch_body(url).await?;
        let payload: Value =
            serde_json::from_str(&body).map_err(|e| GeneratorError::Decode { source: e })?;
        let operations = parse_operations(&payload)?;
        debug!(operations = operations.len(), "fetched introspection payload");
        Ok(operations)
    }

    async fn fetch_body(&self, url: &str) -> Result<String> {
        let attempts = self.policy.max_attempts.max(1);
        let mut last_error = String::new();

        for attempt in 1..=attempts {
            match self.attempt(url).await {
                Ok(body) => return Ok(body),
                Err(message) => {
                    last_error = message;
                    if attempt < attempts {
                        warn!(
                            "Introspection request to {} failed ({}), retry {} after {:?}",
                            url, last_error, attempt, self.policy.delay
                        );
                        tokio::time::sleep(self.policy.delay).await;
                    }
                }
            }
        }

        Err(GeneratorError::Transport {
            url: url.to_string(),
            attempts,
            message: last_error,
        })
    }

    /// One request; any failure is reported as a message for retry logging.
    async fn attempt(&self, url: &str) -> std::result::Result<String, String> {
        let mut request = self.http.get(url);
        for (name, value) in &self.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().await.map_err(|e| e.to_string())?;
        let status = response.status();
        if !status.is_success() {
            return Err(format!("HTTP {status}"));
        }
        response.text().await.map_err(|e| e.to_string())
    }
}

/// Loads and validates an operation array from a local file.
///
/// ## Errors
///
/// - [`GeneratorError::ReadError`] if the file cannot be read
/// - [`GeneratorError::Decode`] if it is not JSON
/// - [`GeneratorError::Shape`] if the JSON is not an operation array
pub fn load_file(path: &Path) -> Result<Vec<OperationDescription>> {
    let content = fs::read_to_string(path).map_err(|e| GeneratorError::ReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    let payload: Value =
        serde_json::from_str(&content).map_err(|e| GeneratorError::Decode { source: e })?;
    parse_operations(&payload)
}
