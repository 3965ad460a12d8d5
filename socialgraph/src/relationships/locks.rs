//! Per-pair serialization of mutating operations.

use super::types::Identity;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Unordered pair key: `(a, b)` and `(b, a)` share one lock.
type PairKey = (Identity, Identity);

fn pair_key(a: &Identity, b: &Identity) -> PairKey {
    if a <= b {
        (a.clone(), b.clone())
    } else {
        (b.clone(), a.clone())
    }
}

/// Async mutex per unordered identity pair.
///
/// Holding the guard across a probe and its batch keeps a concurrent
/// `follow(b, a)` from observing the state between them. Idle entries are
/// pruned whenever a new lock is taken.
#[derive(Debug, Default)]
pub struct PairLocks {
    locks: Mutex<HashMap<PairKey, Arc<Mutex<()>>>>,
}

/// Held for the duration of one pair operation.
pub type PairGuard = OwnedMutexGuard<()>;

impl PairLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to the pair `{a, b}`.
    pub async fn lock(&self, a: &Identity, b: &Identity) -> PairGuard {
        let slot = {
            let mut locks = self.locks.lock().await;
            locks.retain(|_, slot| Arc::strong_count(slot) > 1);
            Arc::clone(locks.entry(pair_key(a, b)).or_default())
        };
        slot.lock_owned().await
    }

    /// Number of pairs currently tracked.
    pub async fn tracked(&self) -> usize {
        self.locks.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_pair_is_unordered() {
        let locks = Arc::new(PairLocks::new());
        let a = Identity::from("a");
        let b = Identity::from("b");

        let guard = locks.lock(&a, &b).await;

        let contender = {
            let locks = Arc::clone(&locks);
            let (a, b) = (a.clone(), b.clone());
            tokio::spawn(async move {
                let _guard = locks.lock(&b, &a).await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(guard);
        tokio::time::timeout(Duration::from_secs(1), contender)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_distinct_pairs_do_not_block() {
        let locks = PairLocks::new();
        let _ab = locks.lock(&Identity::from("a"), &Identity::from("b")).await;
        let cd = tokio::time::timeout(
            Duration::from_secs(1),
            locks.lock(&Identity::from("c"), &Identity::from("d")),
        )
        .await;
        assert!(cd.is_ok());
    }

    #[tokio::test]
    async fn test_idle_pairs_are_pruned() {
        let locks = PairLocks::new();
        for i in 0..10u64 {
            let _guard = locks.lock(&Identity::from(i), &Identity::from(i + 100)).await;
        }
        // The last pair was released after its slot was inserted.
        assert!(locks.tracked().await <= 1);
    }
}
