//! Viewer-response events handed to edge functions.
//!
//! Only the header mapping is typed. Every other field is kept as raw JSON in
//! its original position, so an event round-trips byte-for-byte apart from
//! the headers a function sets.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::context::RequestId;
use crate::error::{EventError, EventResult};
use crate::function::EventType;
use crate::headers::Headers;

const HEADERS_KEY: &str = "headers";
const RESPONSE_KEY: &str = "response";

/// An outbound response owned by the edge platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct EdgeResponse {
    /// Response headers.
    pub headers: Headers,
    /// Remaining response fields (`statusCode`, `cookies`, ...), untouched.
    pub extra: Map<String, Value>,
    headers_index: usize,
}

impl EdgeResponse {
    /// Create a response with the given status and headers.
    pub fn new(status_code: u16, headers: Headers) -> Self {
        let mut extra = Map::new();
        extra.insert("statusCode".to_string(), Value::from(status_code));
        Self {
            headers,
            headers_index: extra.len(),
            extra,
        }
    }

    /// Decode a bare response object.
    pub fn from_json(input: &str) -> EventResult<Self> {
        Self::from_value(serde_json::from_str(input)?)
    }

    /// Decode a bare response object from a JSON value.
    pub fn from_value(value: Value) -> EventResult<Self> {
        check_response(&value)?;
        Ok(serde_json::from_value(value)?)
    }

    /// HTTP status code, when the platform sent one as a number.
    pub fn status_code(&self) -> Option<u16> {
        self.extra
            .get("statusCode")
            .and_then(Value::as_u64)
            .and_then(|code| u16::try_from(code).ok())
    }

    /// HTTP status text, if present.
    pub fn status_description(&self) -> Option<&str> {
        self.extra.get("statusDescription").and_then(Value::as_str)
    }
}

impl TryFrom<Map<String, Value>> for EdgeResponse {
    type Error = EventError;

    fn try_from(mut fields: Map<String, Value>) -> EventResult<Self> {
        let headers_index = fields
            .keys()
            .position(|k| k == HEADERS_KEY)
            .ok_or(EventError::MissingHeaders)?;
        let headers = fields
            .shift_remove(HEADERS_KEY)
            .ok_or(EventError::MissingHeaders)?;

        Ok(Self {
            headers: serde_json::from_value(headers)?,
            extra: fields,
            headers_index,
        })
    }
}

impl From<EdgeResponse> for Map<String, Value> {
    fn from(response: EdgeResponse) -> Self {
        let headers = Value::Object(response.headers.to_json());
        splice(response.extra, HEADERS_KEY, headers, response.headers_index)
    }
}

/// The event passed to a viewer-response function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct ResponseEvent {
    /// The response about to be sent to the viewer.
    pub response: EdgeResponse,
    /// Remaining event fields (`version`, `context`, `viewer`, `request`).
    pub extra: Map<String, Value>,
    response_index: usize,
}

impl ResponseEvent {
    /// Wrap a response in an event with no other fields.
    pub fn new(response: EdgeResponse) -> Self {
        Self {
            response,
            extra: Map::new(),
            response_index: 0,
        }
    }

    /// Decode an event from JSON.
    pub fn from_json(input: &str) -> EventResult<Self> {
        Self::from_value(serde_json::from_str(input)?)
    }

    /// Decode an event from a JSON value.
    ///
    /// Events tagged with an event type other than `viewer-response` are
    /// rejected; untagged events are accepted.
    pub fn from_value(value: Value) -> EventResult<Self> {
        let response = value.get(RESPONSE_KEY).ok_or(EventError::MissingResponse)?;
        check_response(response)?;

        if let Some(event_type) = event_type_of(&value) {
            if event_type != EventType::ViewerResponse {
                return Err(EventError::UnexpectedEventType(event_type));
            }
        }

        Ok(serde_json::from_value(value)?)
    }

    /// Event type declared by the platform (`context.eventType`), if recognised.
    pub fn event_type(&self) -> Option<EventType> {
        self.extra.get("context").and_then(|context| {
            context
                .get("eventType")
                .and_then(|t| serde_json::from_value(t.clone()).ok())
        })
    }

    /// Request ID assigned by the platform (`context.requestId`), if any.
    pub fn request_id(&self) -> Option<RequestId> {
        self.extra
            .get("context")
            .and_then(|context| context.get("requestId"))
            .and_then(Value::as_str)
            .map(RequestId::from_string)
    }

    /// Take the response out of the event.
    pub fn into_response(self) -> EdgeResponse {
        self.response
    }
}

impl TryFrom<Map<String, Value>> for ResponseEvent {
    type Error = EventError;

    fn try_from(mut fields: Map<String, Value>) -> EventResult<Self> {
        let response_index = fields
            .keys()
            .position(|k| k == RESPONSE_KEY)
            .ok_or(EventError::MissingResponse)?;
        let response = fields
            .shift_remove(RESPONSE_KEY)
            .ok_or(EventError::MissingResponse)?;

        Ok(Self {
            response: serde_json::from_value(response)?,
            extra: fields,
            response_index,
        })
    }
}

impl From<ResponseEvent> for Map<String, Value> {
    fn from(event: ResponseEvent) -> Self {
        let response = Value::Object(event.response.into());
        splice(event.extra, RESPONSE_KEY, response, event.response_index)
    }
}

/// Rebuild an object with `key` re-inserted at `index`.
fn splice(
    fields: Map<String, Value>,
    key: &str,
    value: Value,
    index: usize,
) -> Map<String, Value> {
    let mut pending = Some(value);
    let mut out = Map::new();

    for (position, (name, field)) in fields.into_iter().enumerate() {
        if position == index {
            if let Some(value) = pending.take() {
                out.insert(key.to_string(), value);
            }
        }
        out.insert(name, field);
    }
    if let Some(value) = pending {
        out.insert(key.to_string(), value);
    }

    out
}

fn event_type_of(event: &Value) -> Option<EventType> {
    event
        .pointer("/context/eventType")
        .and_then(|t| serde_json::from_value(t.clone()).ok())
}

fn check_response(response: &Value) -> EventResult<()> {
    let response = response.as_object().ok_or(EventError::MissingResponse)?;
    let headers = response
        .get(HEADERS_KEY)
        .and_then(Value::as_object)
        .ok_or(EventError::MissingHeaders)?;

    for (name, entry) in headers {
        if !entry.get("value").is_some_and(Value::is_string) {
            return Err(EventError::InvalidHeader { name: name.clone() });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_event() -> Value {
        json!({
            "version": "1.0",
            "context": { "eventType": "viewer-response", "requestId": "req-123" },
            "viewer": { "ip": "198.51.100.11" },
            "request": { "method": "GET", "uri": "/video.mp4", "headers": {} },
            "response": {
                "statusCode": 200,
                "statusDescription": "OK",
                "headers": { "content-type": { "value": "video/mp4" } },
                "cookies": {}
            }
        })
    }

    // === Decode Tests ===

    #[test]
    fn test_decode_event() {
        let event = ResponseEvent::from_value(sample_event()).unwrap();

        assert_eq!(event.response.status_code(), Some(200));
        assert_eq!(event.response.status_description(), Some("OK"));
        assert_eq!(event.response.headers.get("content-type"), Some("video/mp4"));
        assert!(event.response.extra.contains_key("cookies"));
        assert_eq!(event.request_id(), Some(RequestId::from_string("req-123")));
        assert_eq!(event.event_type(), Some(EventType::ViewerResponse));
    }

    #[test]
    fn test_round_trip_is_byte_identical() {
        let input = sample_event().to_string();
        let event = ResponseEvent::from_json(&input).unwrap();
        assert_eq!(serde_json::to_string(&event).unwrap(), input);
    }

    #[test]
    fn test_null_status_description_kept() {
        let input = r#"{"response":{"statusCode":200,"statusDescription":null,"headers":{}}}"#;
        let event = ResponseEvent::from_json(input).unwrap();

        assert_eq!(event.response.status_description(), None);
        assert_eq!(serde_json::to_string(&event).unwrap(), input);
    }

    #[test]
    fn test_unusual_status_code_kept() {
        let input = r#"{"response":{"statusCode":"200","headers":{},"statusDescription":7}}"#;
        let event = ResponseEvent::from_json(input).unwrap();

        assert_eq!(event.response.status_code(), None);
        assert_eq!(serde_json::to_string(&event).unwrap(), input);

        let input = r#"{"response":{"headers":{},"statusCode":70000}}"#;
        let event = ResponseEvent::from_json(input).unwrap();
        assert_eq!(event.response.status_code(), None);
        assert_eq!(serde_json::to_string(&event).unwrap(), input);
    }

    #[test]
    fn test_new_response_shape() {
        let event = ResponseEvent::new(EdgeResponse::new(204, Headers::new()));
        assert_eq!(
            serde_json::to_string(&event).unwrap(),
            r#"{"response":{"statusCode":204,"headers":{}}}"#
        );
    }

    #[test]
    fn test_request_id_absent() {
        let event = ResponseEvent::from_value(json!({ "response": { "headers": {} } })).unwrap();
        assert_eq!(event.request_id(), None);
        assert_eq!(event.event_type(), None);
    }

    // === Malformed Input Tests ===

    #[test]
    fn test_invalid_json() {
        let err = ResponseEvent::from_json("{not json").unwrap_err();
        assert!(matches!(err, EventError::Json(_)));
    }

    #[test]
    fn test_missing_response() {
        let err = ResponseEvent::from_value(json!({ "request": {} })).unwrap_err();
        assert!(matches!(err, EventError::MissingResponse));

        let err = ResponseEvent::from_value(json!({ "response": "nope" })).unwrap_err();
        assert!(matches!(err, EventError::MissingResponse));
    }

    #[test]
    fn test_missing_headers() {
        let err =
            ResponseEvent::from_value(json!({ "response": { "statusCode": 200 } })).unwrap_err();
        assert!(matches!(err, EventError::MissingHeaders));

        let err =
            ResponseEvent::from_value(json!({ "response": { "headers": [] } })).unwrap_err();
        assert!(matches!(err, EventError::MissingHeaders));
    }

    #[test]
    fn test_header_without_value() {
        let err = ResponseEvent::from_value(json!({
            "response": { "headers": { "etag": { "multiValue": [] } } }
        }))
        .unwrap_err();

        match err {
            EventError::InvalidHeader { name } => assert_eq!(name, "etag"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_viewer_request_event_rejected() {
        let err = ResponseEvent::from_value(json!({
            "context": { "eventType": "viewer-request" },
            "response": { "headers": {} }
        }))
        .unwrap_err();
        assert!(matches!(
            err,
            EventError::UnexpectedEventType(EventType::ViewerRequest)
        ));

        let event = ResponseEvent::from_value(json!({
            "context": { "eventType": "origin-response" },
            "response": { "headers": {} }
        }))
        .unwrap();
        assert_eq!(event.event_type(), None);
    }

    #[test]
    fn test_bare_response() {
        let response =
            EdgeResponse::from_json(r#"{"headers":{"server":{"value":"CloudFront"}}}"#).unwrap();
        assert_eq!(response.status_code(), None);
        assert_eq!(response.headers.get("server"), Some("CloudFront"));

        let err = EdgeResponse::from_json(r#"{"statusCode":404}"#).unwrap_err();
        assert!(matches!(err, EventError::MissingHeaders));
    }
}
