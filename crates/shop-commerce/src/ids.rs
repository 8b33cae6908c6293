//! Newtype IDs for type-safe identifiers.
//!
//! Keeps a `ChatId` from being passed where a `ProductId` is expected.
//! All IDs serialize as plain strings so persisted JSON stays readable.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to generate newtype ID structs with a generation prefix.
macro_rules! define_id {
    ($name:ident, $prefix:literal) => {
        /// A unique identifier.
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Generate a new unique ID.
            pub fn generate() -> Self {
                Self(generate_id($prefix))
            }

            /// Get the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the inner string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(ProductId, "p");
define_id!(ChatId, "c");
define_id!(MessageId, "m");
define_id!(UserId, "u");

/// Generate a unique ID from the millisecond clock and a process-wide counter.
///
/// Two IDs generated in the same millisecond differ in the counter suffix.
fn generate_id(prefix: &str) -> String {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let counter = COUNTER.fetch_add(1, Ordering::Relaxed);

    format!("{}{}-{:x}", prefix, millis, counter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_creation() {
        let id = ProductId::new("p1");
        assert_eq!(id.as_str(), "p1");
    }

    #[test]
    fn test_id_generation_is_unique_and_prefixed() {
        let a = ChatId::generate();
        let b = ChatId::generate();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with('c'));
        assert!(MessageId::generate().as_str().starts_with('m'));
    }

    #[test]
    fn test_id_serializes_as_plain_string() {
        let id = ProductId::new("p7");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""p7""#);

        let back: ProductId = serde_json::from_str(r#""p7""#).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_id_from_str() {
        let id: ChatId = "c123".into();
        assert_eq!(format!("{}", id), "c123");
    }
}
