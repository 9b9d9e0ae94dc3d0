//! Core abstractions for edge response functions.
//!
//! This crate provides the fundamental types and traits:
//! - `ResponseEvent` / `EdgeResponse` - The event shape handed over by the edge platform
//! - `Headers` / `HeaderEntry` - Ordered, case-insensitive response header mapping
//! - `EdgeFunction` trait - Handler interface
//! - `FunctionManifest` - Function metadata
//! - `RequestId` - Correlation identifier for logs

mod context;
mod error;
mod event;
mod function;
mod headers;

pub use context::*;
pub use error::*;
pub use event::*;
pub use function::*;
pub use headers::*;
