//! Errors raised while decoding platform events.

use crate::function::EventType;

/// Result type for event decoding.
pub type EventResult<T> = Result<T, EventError>;

/// Errors from decoding an event handed over by the edge platform.
///
/// Events without a response or header mapping are rejected, never defaulted
/// to an empty mapping.
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    #[error("invalid event JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("event has no `response` object")]
    MissingResponse,

    #[error("response has no `headers` object")]
    MissingHeaders,

    #[error("header '{name}' has no string `value`")]
    InvalidHeader { name: String },

    #[error("expected a viewer-response event, got {0}")]
    UnexpectedEventType(EventType),
}
