use serde_json::Value;
use thiserror::Error;

/// Common errors that can occur while talking to the workflow service
#[derive(Error, Debug)]
pub enum CommonRequestError {
    /// HTTP request failed before a response was received
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization of the outgoing body failed
    #[error("JSON error: {0}")]
    Json(String),

    /// The service answered with a success status but the body could not be decoded
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// The service answered with a non-success status
    #[error("HTTP {status}: {message}")]
    Api {
        status: u16,
        message: String,
        payload: Option<Value>,
    },

    /// Error originating from the request builder
    #[error("Request builder error: {0}")]
    RequestBuilder(String),
}

/// Format a failing response into a structured [`CommonRequestError::Api`].
///
/// The body is kept as parsed JSON when possible so callers can inspect the server's own error
/// fields; otherwise the raw text becomes the message.
pub fn parse_error_response(status: reqwest::StatusCode, body: &bytes::Bytes) -> CommonRequestError {
    let payload = serde_json::from_slice::<Value>(body).ok();

    let message = payload
        .as_ref()
        .and_then(extract_error_message)
        .unwrap_or_else(|| {
            let text = String::from_utf8_lossy(body).trim().to_string();
            if text.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string()
            } else {
                text
            }
        });

    CommonRequestError::Api {
        status: status.as_u16(),
        message,
        payload,
    }
}

/// Extract an error message from the JSON error shapes the workflow service emits
fn extract_error_message(json: &Value) -> Option<String> {
    // {"error": {"message": "...", "type": "..."}}
    if let Some(message) = json
        .get("error")
        .and_then(|error| error.get("message"))
        .and_then(Value::as_str)
    {
        return Some(message.to_string());
    }

    // {"error": "..."}
    if let Some(message) = json.get("error").and_then(Value::as_str) {
        return Some(message.to_string());
    }

    json.get("message")
        .and_then(Value::as_str)
        .map(ToString::to_string)
}
