//! Edge function definition and trait.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::event::{EdgeResponse, ResponseEvent};

/// Point in the delivery lifecycle at which a function runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventType {
    /// Before the request is forwarded to the cache or origin.
    ViewerRequest,
    /// Before the response is returned to the viewer.
    ViewerResponse,
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ViewerRequest => write!(f, "viewer-request"),
            Self::ViewerResponse => write!(f, "viewer-response"),
        }
    }
}

/// Function manifest - explicit metadata for a deployable function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionManifest {
    /// Unique name for this function.
    pub name: String,
    /// Semantic version.
    pub version: String,
    /// Event the function is attached to.
    pub event_type: EventType,
}

impl FunctionManifest {
    /// Create a new manifest for a viewer-response function.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            event_type: EventType::ViewerResponse,
        }
    }
}

/// A function invoked by the edge platform once per outbound response.
///
/// Implementations are synchronous and must not perform I/O; the platform
/// holds the response until `handle` returns.
pub trait EdgeFunction: Send + Sync {
    /// Metadata describing this function.
    fn manifest(&self) -> &FunctionManifest;

    /// Process one event and return the response to send.
    fn handle(&self, event: ResponseEvent) -> EdgeResponse;
}
