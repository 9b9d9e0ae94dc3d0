//! Security response headers for edge functions.
//!
//! This crate provides:
//! - `SECURITY_HEADERS` - The fixed header table applied to every response
//! - `apply_security_headers` / `handler` - The viewer-response merge
//! - `HeaderPolicy` - Ordered header policy with apply and audit
//! - `SecurityHeadersFunction` - `EdgeFunction` implementation
//!
//! # Example
//!
//! ```ignore
//! use edge_core::ResponseEvent;
//! use edge_security::handler;
//!
//! let event = ResponseEvent::from_json(input)?;
//! let response = handler(event);
//! assert_eq!(response.headers.get("x-frame-options"), Some("DENY"));
//! ```

mod function;
mod headers;
mod policy;

pub use function::*;
pub use headers::*;
pub use policy::*;
