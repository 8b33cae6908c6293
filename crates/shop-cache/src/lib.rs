//! Type-safe key-value persistence for ShopSmart.
//!
//! Values are stored as JSON strings under fixed keys, mirroring a
//! browser's local storage. Two backends are provided: an in-memory map
//! and a directory holding one `<key>.json` file per key.
//!
//! # Example
//!
//! ```rust
//! use shop_cache::{Cache, Slot};
//!
//! let cache = Cache::open_memory();
//! let favorites: Slot<Vec<String>> = Slot::new(cache.clone(), shop_cache::FAVORITES_KEY);
//!
//! assert_eq!(favorites.load().unwrap(), None);
//! favorites.save(&vec!["p1".to_string()]).unwrap();
//! assert_eq!(favorites.load().unwrap(), Some(vec!["p1".to_string()]));
//! ```

mod error;
mod kv;
mod slot;

pub use error::CacheError;
pub use kv::{Cache, FileBackend, KvBackend, MemoryBackend};
pub use slot::{Slot, CHATS_KEY, FAVORITES_KEY, STATE_KEYS, VIEWED_KEY};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, KvBackend, Slot};
}
