//! Request-id generation.

use std::sync::atomic::{AtomicI32, Ordering};

/// Monotonic request-id counter shared between senders.
///
/// The first call to [`next`](Self::next) returns 1. After `i32::MAX` the
/// counter wraps back to 1, so 0 and negative ids are never handed out.
///
/// ```
/// use snmp_trap::RequestIdGenerator;
///
/// let ids = RequestIdGenerator::new();
/// assert_eq!(ids.current(), 0);
/// assert_eq!(ids.next(), 1);
/// assert_eq!(ids.current(), 1);
/// ```
#[derive(Debug, Default)]
pub struct RequestIdGenerator {
    last: AtomicI32,
}

impl RequestIdGenerator {
    /// Create a generator whose first id is 1.
    pub const fn new() -> Self {
        Self {
            last: AtomicI32::new(0),
        }
    }

    /// Allocate the next id.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&self) -> i32 {
        let prev = self
            .last
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |v| Some(bump(v)))
            .unwrap_or_else(|v| v);
        bump(prev)
    }

    /// The most recently allocated id, or 0 before the first allocation.
    pub fn current(&self) -> i32 {
        self.last.load(Ordering::Acquire)
    }
}

fn bump(v: i32) -> i32 {
    if v >= i32::MAX || v < 0 { 1 } else { v + 1 }
}
