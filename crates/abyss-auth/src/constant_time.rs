//! Fixed-time equality checks.

use subtle::ConstantTimeEq;

/// Compares two byte strings without an early exit on the first mismatch.
///
/// The length comparison is not hidden; callers compare values whose
/// length is public (derived keys, MACs, fixed-size digests).
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && bool::from(a.ct_eq(b))
}

/// String form of [`constant_time_eq`] for secrets held as text.
pub fn safe_compare(a: &str, b: &str) -> bool {
    constant_time_eq(a.as_bytes(), b.as_bytes())
}
