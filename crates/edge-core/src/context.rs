//! Request correlation.

use std::sync::atomic::{AtomicU32, Ordering};

/// Unique request identifier for tracing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestId(pub String);

impl RequestId {
    /// Generate a new request ID.
    pub fn generate() -> Self {
        let id = format!(
            "{:x}-{:x}-{:x}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos(),
            rand_simple(),
            rand_simple()
        );
        Self(id)
    }

    /// Create from an existing ID string.
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Simple pseudo-random for WASM (no OS entropy)
fn rand_simple() -> u32 {
    static SEED: AtomicU32 = AtomicU32::new(12345);
    let next = SEED
        .load(Ordering::Relaxed)
        .wrapping_mul(1103515245)
        .wrapping_add(12345);
    SEED.store(next, Ordering::Relaxed);
    next
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_differ() {
        let a = RequestId::generate();
        let b = RequestId::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().split('-').count(), 3);
    }

    #[test]
    fn test_from_string_display() {
        let raw = "4TyzHTaYWb1GX1qTfsHhEqV6HUDd_BzoBZnwfnvQc_1oF26ClkoUSEQ==";
        let id = RequestId::from_string(raw);
        assert_eq!(id.to_string(), raw);
    }
}
