//! Response types for the backend API.
//!
//! Every backend response is wrapped in an [`Envelope`]. Failures that
//! happen before an envelope can be read are described by a
//! [`TransportFailure`].

use serde::Deserialize;

/// Envelope code that marks a successful call.
pub const SUCCESS_CODE: i64 = 200;

/// The uniform `{code, message, data}` wrapper of every backend response.
///
/// Missing fields deserialize to their defaults so that a body which is
/// not an envelope at all is reported as an application failure rather
/// than a decode error.
///
/// # Example
///
/// ```rust
/// use garage_client::clients::Envelope;
/// use serde_json::json;
///
/// let envelope = Envelope::from_body(json!({"code": 200, "message": "ok", "data": {"id": 1}}));
/// assert!(envelope.is_success());
/// assert_eq!(envelope.data, json!({"id": 1}));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Envelope {
    /// Application status code; `200` is the only success value.
    #[serde(default)]
    pub code: Option<i64>,
    /// Human-readable message.
    #[serde(default)]
    pub message: Option<String>,
    /// Payload.
    #[serde(default)]
    pub data: serde_json::Value,
}

impl Envelope {
    /// Reads an envelope from a response body.
    ///
    /// Bodies that are not JSON objects yield an empty envelope.
    #[must_use]
    pub fn from_body(body: serde_json::Value) -> Self {
        serde_json::from_value(body).unwrap_or_default()
    }

    /// Returns `true` if the code is `200`.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.code == Some(SUCCESS_CODE)
    }
}

/// A request that did not produce a successful HTTP response.
#[derive(Clone, Debug, PartialEq)]
pub struct TransportFailure {
    /// HTTP status, if the server answered.
    pub status: Option<u16>,
    /// Parsed response body, if the server answered with JSON.
    pub body: Option<serde_json::Value>,
    /// Transport-level description of the failure.
    pub message: String,
}

impl TransportFailure {
    /// Describes a non-success HTTP status.
    #[must_use]
    pub fn from_status(status: u16, body: Option<serde_json::Value>) -> Self {
        Self {
            status: Some(status),
            body,
            message: format!("Request failed with status code {status}"),
        }
    }

    /// Describes a failure where no response was received.
    #[must_use]
    pub fn from_reqwest(error: &reqwest::Error) -> Self {
        let message = if error.is_timeout() {
            "Request timed out".to_string()
        } else {
            error.to_string()
        };

        Self {
            status: error.status().map(|s| s.as_u16()),
            body: None,
            message,
        }
    }

    /// Returns the `message` field carried by the response body, if any.
    #[must_use]
    pub fn body_message(&self) -> Option<&str> {
        self.body
            .as_ref()
            .and_then(|body| body.get("message"))
            .and_then(serde_json::Value::as_str)
            .filter(|message| !message.is_empty())
    }
}
