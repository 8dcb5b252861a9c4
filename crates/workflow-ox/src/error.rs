use serde::{Serialize, Serializer, ser::SerializeStruct};
use serde_json::Value;
use thiserror::Error;
use workflow_ox_common::CommonRequestError;

/// Errors surfaced by [`crate::WorkflowEngine`] operations.
///
/// Every failure reaches the caller as one of these values; nothing is retried or swallowed.
#[derive(Debug, Error)]
pub enum WorkflowRequestError {
    /// Network failure before any response arrived
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// The service returned a non-success status; `payload` is the parsed error body, if JSON
    #[error("workflow service error (HTTP {status}): {message}")]
    Api {
        status: u16,
        message: String,
        payload: Option<Value>,
    },

    /// A success response whose body is not a workflow run
    #[error("malformed workflow response: {0}")]
    MalformedResponse(String),

    /// The outgoing request could not be constructed or serialized
    #[error("invalid workflow request: {0}")]
    InvalidRequest(String),
}

impl WorkflowRequestError {
    /// HTTP status reported by the service, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            Self::MalformedResponse(_) | Self::InvalidRequest(_) => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

impl From<CommonRequestError> for WorkflowRequestError {
    fn from(err: CommonRequestError) -> Self {
        match err {
            CommonRequestError::Http(e) => Self::Transport(e),
            CommonRequestError::Api {
                status,
                message,
                payload,
            } => Self::Api {
                status,
                message,
                payload,
            },
            CommonRequestError::UnexpectedResponse(msg) => Self::MalformedResponse(msg),
            CommonRequestError::Json(msg) | CommonRequestError::RequestBuilder(msg) => {
                Self::InvalidRequest(msg)
            }
        }
    }
}

impl Serialize for WorkflowRequestError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Transport(e) => {
                let mut state = serializer.serialize_struct("WorkflowRequestError", 2)?;
                state.serialize_field("type", "Transport")?;
                state.serialize_field("error", &e.to_string())?;
                state.end()
            }
            Self::Api {
                status,
                message,
                payload,
            } => {
                let field_count = 3 + usize::from(payload.is_some());
                let mut state = serializer.serialize_struct("WorkflowRequestError", field_count)?;
                state.serialize_field("type", "Api")?;
                state.serialize_field("status", status)?;
                state.serialize_field("message", message)?;
                if let Some(p) = payload {
                    state.serialize_field("response", p)?;
                }
                state.end()
            }
            Self::MalformedResponse(msg) => {
                let mut state = serializer.serialize_struct("WorkflowRequestError", 2)?;
                state.serialize_field("type", "MalformedResponse")?;
                state.serialize_field("message", msg)?;
                state.end()
            }
            Self::InvalidRequest(msg) => {
                let mut state = serializer.serialize_struct("WorkflowRequestError", 2)?;
                state.serialize_field("type", "InvalidRequest")?;
                state.serialize_field("message", msg)?;
                state.end()
            }
        }
    }
}
