use std::hash::Hash;
use std::sync::Arc;

use moka::future::Cache;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async mutex per key, created on first use.
///
/// Entries are never evicted: an evicted mutex could be replaced while a
/// holder still owns the old one, letting a second caller in. Keys are
/// employee ids so the map stays bounded by headcount.
pub struct KeyedLocks<K> {
    locks: Cache<K, Arc<Mutex<()>>>,
}

impl<K> KeyedLocks<K>
where
    K: Hash + Eq + Send + Sync + Clone + 'static,
{
    pub fn new() -> Self {
        Self {
            locks: Cache::builder().build(),
        }
    }

    /// Waits for exclusive access to `key`. Released when the guard drops.
    pub async fn lock(&self, key: K) -> OwnedMutexGuard<()> {
        // get_with coalesces concurrent initialisation of the same key
        let mutex = self
            .locks
            .get_with(key, async { Arc::new(Mutex::new(())) })
            .await;
        mutex.lock_owned().await
    }
}

impl<K> Default for KeyedLocks<K>
where
    K: Hash + Eq + Send + Sync + Clone + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn same_key_is_exclusive() {
        let locks = KeyedLocks::new();
        let guard = locks.lock(7u64).await;

        let blocked = tokio::time::timeout(Duration::from_millis(50), locks.lock(7u64)).await;
        assert!(blocked.is_err());

        drop(guard);
        let reacquired = tokio::time::timeout(Duration::from_millis(50), locks.lock(7u64)).await;
        assert!(reacquired.is_ok());
    }

    #[tokio::test]
    async fn different_keys_do_not_block() {
        let locks = KeyedLocks::new();
        let _a = locks.lock(1u64).await;

        let other = tokio::time::timeout(Duration::from_millis(50), locks.lock(2u64)).await;
        assert!(other.is_ok());
    }
}
