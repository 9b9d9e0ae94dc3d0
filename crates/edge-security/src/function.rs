//! `EdgeFunction` implementation for the security header policy.

use edge_core::{EdgeFunction, EdgeResponse, FunctionManifest, ResponseEvent};

use crate::policy::{ApplyReport, HeaderPolicy};

/// Function name as registered with the platform.
pub const FUNCTION_NAME: &str = "security-headers";

/// Viewer-response function that applies a `HeaderPolicy` to every response.
#[derive(Debug, Clone)]
pub struct SecurityHeadersFunction {
    manifest: FunctionManifest,
    policy: HeaderPolicy,
}

impl SecurityHeadersFunction {
    /// Function applying the fixed security header table.
    pub fn new() -> Self {
        Self::with_policy(HeaderPolicy::baseline())
    }

    /// Function applying a custom policy.
    pub fn with_policy(policy: HeaderPolicy) -> Self {
        Self {
            manifest: FunctionManifest::new(FUNCTION_NAME, env!("CARGO_PKG_VERSION")),
            policy,
        }
    }

    /// The policy this function applies.
    pub fn policy(&self) -> &HeaderPolicy {
        &self.policy
    }

    /// Apply the policy and report what changed.
    pub fn process(&self, event: ResponseEvent) -> (EdgeResponse, ApplyReport) {
        let mut response = event.into_response();
        let report = self.policy.apply(&mut response.headers);
        tracing::debug!(
            inserted = report.inserted.len(),
            overwritten = report.overwritten.len(),
            "applied security headers"
        );
        (response, report)
    }
}

impl Default for SecurityHeadersFunction {
    fn default() -> Self {
        Self::new()
    }
}

impl EdgeFunction for SecurityHeadersFunction {
    fn manifest(&self) -> &FunctionManifest {
        &self.manifest
    }

    fn handle(&self, event: ResponseEvent) -> EdgeResponse {
        self.process(event).0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edge_core::{EventType, Headers};

    #[test]
    fn test_manifest() {
        let function = SecurityHeadersFunction::new();
        assert_eq!(function.manifest().name, FUNCTION_NAME);
        assert_eq!(function.manifest().event_type, EventType::ViewerResponse);
    }

    #[test]
    fn test_handle_matches_handler() {
        let headers =
            Headers::from_iter([("content-type", "text/html"), ("x-frame-options", "SAMEORIGIN")]);
        let event = ResponseEvent::new(EdgeResponse::new(200, headers));

        let via_trait = SecurityHeadersFunction::new().handle(event.clone());
        let via_handler = crate::handler(event);

        assert_eq!(via_trait, via_handler);
    }

    #[test]
    fn test_custom_policy() {
        let policy = HeaderPolicy::baseline()
            .with_header("permissions-policy", "camera=()")
            .unwrap();
        let function = SecurityHeadersFunction::with_policy(policy);

        let event = ResponseEvent::new(EdgeResponse::new(200, Headers::new()));
        let (response, report) = function.process(event);

        assert_eq!(response.headers.len(), 7);
        assert_eq!(report.inserted.len(), 7);
        assert_eq!(response.headers.get("permissions-policy"), Some("camera=()"));
    }
}
