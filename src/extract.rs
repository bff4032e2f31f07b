//! Recovers the certificate payload from a raw request log line.
//!
//! The log line carries `event request: {...}`; the object's `body` is itself
//! a JSON document encoded as a string. Each layer is decoded by its own step
//! so a failure names the layer that broke.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::client::ResultRow;
use crate::constants::MESSAGE_FIELD;

static REQUEST_PATTERN: Lazy<Regex> = Lazy::new(|| {
    // greedy: the capture runs to the last `}` on the line
    Regex::new(r"event request: (\{.*\})").expect("request pattern is a valid regex")
});

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("no `event request: {{...}}` found in the log message")]
    MarkerNotFound,
    #[error("embedded request is not valid JSON: {0}")]
    InvalidRequestJson(#[source] serde_json::Error),
    #[error("request has no string `body` property")]
    MissingBody,
    #[error("request body is not a certificate payload: {0}")]
    InvalidBodyJson(#[source] serde_json::Error),
}

/// Inner document of the upload request.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificatePayload {
    /// base64 PKCS#12 container
    #[serde(rename = "arquivo")]
    pub file: String,
    #[serde(rename = "senha")]
    pub password: String,
}

impl std::fmt::Debug for CertificatePayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CertificatePayload")
            .field("file", &format_args!("<{} base64 chars>", self.file.len()))
            .field("password", &"***REDACTED***")
            .finish()
    }
}

/// Value of the `@message` field of a result row.
pub fn message_field(row: &ResultRow) -> Option<&str> {
    row.get(MESSAGE_FIELD)
}

/// First decode step: the object following the marker.
pub fn extract_request_json(message: &str) -> Result<Value, ExtractError> {
    let captured = REQUEST_PATTERN
        .captures(message)
        .and_then(|caps| caps.get(1))
        .ok_or(ExtractError::MarkerNotFound)?;
    serde_json::from_str(captured.as_str()).map_err(ExtractError::InvalidRequestJson)
}

/// Like [`extract_request_json`] but logs the failure and yields `None`.
pub fn extract_json_from_message(message: &str) -> Option<Value> {
    match extract_request_json(message) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::error!(error = %e, "Failed to extract request JSON from log message");
            None
        }
    }
}

/// Second decode step: parse the JSON string held in `body`.
pub fn decode_body(request: &Value) -> Result<CertificatePayload, ExtractError> {
    let body = request
        .get("body")
        .and_then(Value::as_str)
        .ok_or(ExtractError::MissingBody)?;
    serde_json::from_str(body).map_err(ExtractError::InvalidBodyJson)
}

/// Both steps on one log line.
pub fn extract_payload(message: &str) -> Result<CertificatePayload, ExtractError> {
    let request = extract_request_json(message)?;
    decode_body(&request)
}
