//! Order-key source

use crate::storage::OrderKey;
use std::sync::atomic::{AtomicI64, Ordering};

/// Hands out strictly increasing order-keys.
///
/// Keys are microseconds since the Unix epoch. When the wall clock stalls or
/// steps backwards the previous key is bumped by one instead.
#[derive(Debug, Default)]
pub struct OrderClock {
    last: AtomicI64,
}

impl OrderClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next order-key, greater than every key handed out before.
    pub fn next(&self) -> OrderKey {
        let now = chrono::Utc::now().timestamp_micros();
        let mut last = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(last.saturating_add(1));
            match self.last.compare_exchange_weak(
                last,
                candidate,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return candidate,
                Err(observed) => last = observed,
            }
        }
    }

    /// Most recently issued key, or zero.
    pub fn last(&self) -> OrderKey {
        self.last.load(Ordering::Acquire)
    }
}
