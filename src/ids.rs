//! Element id issuance.
//!
//! DESIGN
//! ======
//! New elements need ids that are unique for the lifetime of the process so
//! concurrently created elements never collide. A single atomically
//! incremented counter covers that; it lives behind the `IdIssuer` trait so
//! tests can substitute a deterministic sequence. The sequence resets on
//! restart — ids only need to be unique within a room's lifetime.

use std::sync::atomic::{AtomicI64, Ordering};

/// Source of process-wide unique element ids.
pub trait IdIssuer: Send + Sync {
    /// Next id. Strictly increasing, starting above zero, never reused.
    fn next(&self) -> i64;
}

/// Production issuer: one atomic counter, created at startup.
pub struct ElementIdIssuer {
    counter: AtomicI64,
}

impl ElementIdIssuer {
    #[must_use]
    pub fn new() -> Self {
        Self { counter: AtomicI64::new(0) }
    }
}

impl Default for ElementIdIssuer {
    fn default() -> Self {
        Self::new()
    }
}

impl IdIssuer for ElementIdIssuer {
    fn next(&self) -> i64 {
        self.counter.fetch_add(1, Ordering::Relaxed) + 1
    }
}
