use crate::ir::NodeId;
use std::sync::atomic::{AtomicU64, Ordering};

static GLOBAL: IdGenerator = IdGenerator::new();

/// Monotonic source of node identities.
///
/// Identities are never recycled. A generator is safe to share between threads;
/// the process-wide instance returned by [`IdGenerator::global`] backs the
/// default conversion entry points.
#[derive(Debug)]
pub struct IdGenerator {
    next: AtomicU64,
}

impl IdGenerator {
    pub const fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    pub fn global() -> &'static IdGenerator {
        &GLOBAL
    }

    pub fn next_id(&self) -> NodeId {
        NodeId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
