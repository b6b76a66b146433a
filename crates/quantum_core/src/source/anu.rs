//! Authentic quantum source backed by the ANU QRNG JSON API.
//!
//! The service returns `uint16` values in `[0, 65535]` and accepts at most
//! [`MAX_REQUEST_LENGTH`] values per request, so larger batches are assembled
//! from several calls. A body looks like:
//!
//! ```text
//! {"type":"uint16","length":3,"data":[7731,40732,1971],"success":true}
//! ```

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use super::{Batch, RawBatchProducer, RawSample};
use crate::error::SourceError;

/// Default endpoint of the QRNG JSON API.
pub const DEFAULT_API_URL: &str = "https://qrng.anu.edu.au/API/jsonI.php";

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 7;

/// Largest `length` the API serves in one request.
pub const MAX_REQUEST_LENGTH: usize = 1024;

#[derive(Debug, Deserialize)]
struct AnuResponse {
    #[serde(default)]
    data: Option<Vec<RawSample>>,
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

/// Decode an API response body, checking it carries exactly `expected` values.
///
/// # Examples
///
/// ```
/// use quantum_core::source::parse_response;
///
/// let body = r#"{"type":"uint16","length":3,"data":[7731,40732,1971],"success":true}"#;
/// assert_eq!(parse_response(body, 3).unwrap(), vec![7731, 40732, 1971]);
/// ```
pub fn parse_response(body: &str, expected: usize) -> Result<Vec<RawSample>, SourceError> {
    let response: AnuResponse =
        serde_json::from_str(body).map_err(|e| SourceError::Malformed(e.to_string()))?;

    if !response.success {
        return Err(SourceError::Rejected(
            response
                .message
                .unwrap_or_else(|| "success flag was false".to_string()),
        ));
    }

    let data = response
        .data
        .ok_or_else(|| SourceError::Malformed("missing data array".to_string()))?;

    if data.len() != expected {
        return Err(SourceError::ShortBatch {
            expected,
            got: data.len(),
        });
    }

    Ok(data)
}

/// HTTPS client for the ANU quantum random number service.
pub struct AnuSource {
    client: reqwest::blocking::Client,
    api_url: String,
    requests: u64,
}

impl AnuSource {
    /// Create a source against `api_url` with the given request timeout.
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> Result<Self, SourceError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SourceError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            api_url: api_url.into(),
            requests: 0,
        })
    }

    /// Source against the public endpoint with the default timeout.
    pub fn with_defaults() -> Result<Self, SourceError> {
        Self::new(DEFAULT_API_URL, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Endpoint this source talks to.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// HTTP requests issued so far.
    pub fn requests(&self) -> u64 {
        self.requests
    }

    fn classify_error(e: &reqwest::Error) -> SourceError {
        if e.is_timeout() {
            SourceError::Transport(format!("timed out: {}", e))
        } else if e.is_connect() {
            SourceError::Transport(format!("connection failed: {}", e))
        } else if e.is_decode() {
            SourceError::Malformed(e.to_string())
        } else {
            SourceError::Transport(e.to_string())
        }
    }

    fn fetch(&mut self, length: usize) -> Result<Vec<RawSample>, SourceError> {
        debug!(url = %self.api_url, length, "QRNG request start");
        self.requests += 1;

        let resp = self
            .client
            .get(&self.api_url)
            .query(&[("length", length.to_string()), ("type", "uint16".to_string())])
            .send()
            .map_err(|e| {
                warn!(url = %self.api_url, error = %e, "QRNG request failed");
                Self::classify_error(&e)
            })?;

        let status = resp.status();
        if !status.is_success() {
            warn!(url = %self.api_url, status = status.as_u16(), "QRNG request rejected");
            return Err(SourceError::Status(status.as_u16()));
        }

        let body = resp.text().map_err(|e| Self::classify_error(&e))?;
        parse_response(&body, length)
    }
}

impl RawBatchProducer for AnuSource {
    fn produce(&mut self, length: usize) -> Result<Batch, SourceError> {
        let mut samples = Vec::with_capacity(length);
        while samples.len() < length {
            let chunk = (length - samples.len()).min(MAX_REQUEST_LENGTH);
            samples.extend(self.fetch(chunk)?);
        }
        Ok(Batch::from(samples))
    }

    fn name(&self) -> &str {
        "anu"
    }
}
