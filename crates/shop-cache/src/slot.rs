//! Typed load/save boundary for the fixed persisted slots.

use std::marker::PhantomData;

use crate::{Cache, CacheError};
use serde::{de::DeserializeOwned, Serialize};

/// Key of the favorites list.
pub const FAVORITES_KEY: &str = "favorites";

/// Key of the recently viewed list.
pub const VIEWED_KEY: &str = "viewed";

/// Key of the chat list.
pub const CHATS_KEY: &str = "chats";

/// Every slot the application persists.
pub const STATE_KEYS: [&str; 3] = [FAVORITES_KEY, VIEWED_KEY, CHATS_KEY];

/// A single typed value persisted under a fixed key.
///
/// # Example
///
/// ```rust
/// use shop_cache::{Cache, Slot, VIEWED_KEY};
///
/// let slot: Slot<Vec<String>> = Slot::new(Cache::open_memory(), VIEWED_KEY);
/// let viewed = slot.load_or_else(Vec::new).unwrap();
/// assert!(viewed.is_empty());
/// ```
pub struct Slot<T> {
    cache: Cache,
    key: &'static str,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> Clone for Slot<T> {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
            key: self.key,
            _phantom: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for Slot<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Slot").field("key", &self.key).finish()
    }
}

impl<T> Slot<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(cache: Cache, key: &'static str) -> Self {
        Self {
            cache,
            key,
            _phantom: PhantomData,
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Load the stored value, if any.
    pub fn load(&self) -> Result<Option<T>, CacheError> {
        self.cache.get(self.key)
    }

    /// Load the stored value, or build a fallback when the slot is empty.
    ///
    /// A corrupt slot is still an error; it is never silently replaced.
    pub fn load_or_else<F>(&self, fallback: F) -> Result<T, CacheError>
    where
        F: FnOnce() -> T,
    {
        match self.load()? {
            Some(value) => Ok(value),
            None => {
                tracing::debug!(key = self.key, "slot empty, using fallback");
                Ok(fallback())
            }
        }
    }

    /// Overwrite the stored value.
    pub fn save(&self, value: &T) -> Result<(), CacheError> {
        self.cache.set(self.key, value)?;
        tracing::trace!(key = self.key, "slot saved");
        Ok(())
    }

    /// Remove the stored value.
    pub fn clear(&self) -> Result<(), CacheError> {
        self.cache.delete(self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_only_when_empty() {
        let cache = Cache::open_memory();
        let slot: Slot<Vec<String>> = Slot::new(cache, FAVORITES_KEY);

        let value = slot.load_or_else(|| vec!["seed".to_string()]).unwrap();
        assert_eq!(value, vec!["seed".to_string()]);

        slot.save(&vec![]).unwrap();
        let value = slot.load_or_else(|| vec!["seed".to_string()]).unwrap();
        assert!(value.is_empty());
    }

    #[test]
    fn test_corrupt_slot_is_reported_not_replaced() {
        let cache = Cache::open_memory();
        cache.set_raw(VIEWED_KEY, r#"{"oops": true}"#).unwrap();

        let slot: Slot<Vec<String>> = Slot::new(cache.clone(), VIEWED_KEY);
        let err = slot.load_or_else(Vec::new).unwrap_err();
        assert!(matches!(err, CacheError::Corrupt { key, .. } if key == VIEWED_KEY));
        assert_eq!(
            cache.get_raw(VIEWED_KEY).unwrap().as_deref(),
            Some(r#"{"oops": true}"#)
        );
    }

    #[test]
    fn test_clear() {
        let slot: Slot<u32> = Slot::new(Cache::open_memory(), CHATS_KEY);
        slot.save(&7).unwrap();
        slot.clear().unwrap();
        assert_eq!(slot.load().unwrap(), None);
    }
}
