//! Test helpers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use shop_cache::{Cache, CacheError, KvBackend, MemoryBackend};

/// Memory backend whose writes fail while `failing` is set.
struct FlakyBackend {
    inner: MemoryBackend,
    failing: Arc<AtomicBool>,
}

impl KvBackend for FlakyBackend {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(CacheError::StoreError {
                key: key.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
            });
        }
        self.inner.set(key, value)
    }

    fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.inner.delete(key)
    }

    fn keys(&self) -> Result<Vec<String>, CacheError> {
        self.inner.keys()
    }
}

/// A memory cache plus the switch that makes its writes fail.
pub(crate) fn flaky_cache() -> (Cache, Arc<AtomicBool>) {
    let failing = Arc::new(AtomicBool::new(false));
    let cache = Cache::new(FlakyBackend {
        inner: MemoryBackend::new(),
        failing: Arc::clone(&failing),
    });
    (cache, failing)
}
