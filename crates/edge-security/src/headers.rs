//! The fixed security header table and the viewer-response merge.

use edge_core::{EdgeResponse, Headers, ResponseEvent};

/// Header names set on every response.
pub mod header_names {
    /// HTTP Strict Transport Security.
    pub const STRICT_TRANSPORT_SECURITY: &str = "strict-transport-security";
    /// MIME sniffing protection.
    pub const X_CONTENT_TYPE_OPTIONS: &str = "x-content-type-options";
    /// Framing protection.
    pub const X_FRAME_OPTIONS: &str = "x-frame-options";
    /// Legacy XSS auditor control.
    pub const X_XSS_PROTECTION: &str = "x-xss-protection";
    /// Referrer leakage control.
    pub const REFERRER_POLICY: &str = "referrer-policy";
    /// Content Security Policy.
    pub const CONTENT_SECURITY_POLICY: &str = "content-security-policy";
}

/// HSTS: one year, subdomains included, eligible for browser preload lists.
pub const HSTS_VALUE: &str = "max-age=31536000; includeSubdomains; preload";

/// Same-origin scripts and styles (inline allowed), images from self, data and
/// any HTTPS origin, fonts from self and data.
pub const CSP_VALUE: &str = concat!(
    "default-src 'self'; ",
    "script-src 'self' 'unsafe-inline'; ",
    "style-src 'self' 'unsafe-inline'; ",
    "img-src 'self' data: https:; ",
    "font-src 'self' data:;"
);

/// Headers applied to every response, in application order.
pub const SECURITY_HEADERS: [(&str, &str); 6] = [
    (header_names::STRICT_TRANSPORT_SECURITY, HSTS_VALUE),
    (header_names::X_CONTENT_TYPE_OPTIONS, "nosniff"),
    (header_names::X_FRAME_OPTIONS, "DENY"),
    (header_names::X_XSS_PROTECTION, "1; mode=block"),
    (header_names::REFERRER_POLICY, "strict-origin-when-cross-origin"),
    (header_names::CONTENT_SECURITY_POLICY, CSP_VALUE),
];

/// Set every security header, overwriting whatever value was there.
///
/// Headers outside the table are never touched.
pub fn apply_security_headers(headers: &mut Headers) {
    for (name, value) in SECURITY_HEADERS {
        if let Some(previous) = headers.set(name, value) {
            if previous != value {
                tracing::trace!(header = name, %previous, "overwrote header");
            }
        }
    }
}

/// Viewer-response handler: apply the security headers and hand the response back.
pub fn handler(event: ResponseEvent) -> EdgeResponse {
    let mut response = event.into_response();
    apply_security_headers(&mut response.headers);
    response
}
