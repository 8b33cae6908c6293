//! Bundled demo data.

use std::path::Path;

use serde::{Deserialize, Serialize};
use shop_commerce::{Catalog, Product, ProductId};

use crate::chat::Chat;
use crate::error::AssistantError;

/// Demo catalog and starting state, compiled into the binary.
pub const BUNDLED_SEED: &str = include_str!("../data/seed.json");

/// The seed document: catalog plus initial favorites, history, and chats.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppData {
    pub products: Vec<Product>,
    #[serde(default)]
    pub favorites: Vec<ProductId>,
    #[serde(default)]
    pub viewed: Vec<ProductId>,
    #[serde(default)]
    pub chats: Vec<Chat>,
}

impl AppData {
    /// Parse the bundled seed.
    pub fn bundled() -> Result<Self, AssistantError> {
        Self::from_json(BUNDLED_SEED)
    }

    pub fn from_json(json: &str) -> Result<Self, AssistantError> {
        serde_json::from_str(json).map_err(AssistantError::InvalidSeed)
    }

    /// Read and parse a seed file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, AssistantError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| AssistantError::SeedIo {
            path: path.display().to_string(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loading seed");
        Self::from_json(&json)
    }

    /// Build the catalog from the seed products.
    pub fn catalog(&self) -> Result<Catalog, AssistantError> {
        Ok(Catalog::new(self.products.clone())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_bundled_seed_parses() {
        let data = AppData::bundled().unwrap();
        let catalog = data.catalog().unwrap();
        assert_eq!(catalog.len(), 10);
        for id in ["p1", "p2", "p3", "p4", "p5", "p6", "p7"] {
            assert!(catalog.contains(&id.into()), "missing {}", id);
        }
        assert!(data.favorites.iter().all(|id| catalog.contains(id)));
        assert!(data.viewed.iter().all(|id| catalog.contains(id)));
        assert_eq!(data.chats.len(), 1);
    }

    #[test]
    fn test_collections_default() {
        let data = AppData::from_json(r#"{"products": []}"#).unwrap();
        assert!(data.favorites.is_empty());
        assert!(data.chats.is_empty());
    }

    #[test]
    fn test_invalid_product_rejected() {
        let json = r#"{"products": [{"id": "p1", "title": "x", "price": 1.0,
            "currency": "ZZZ", "rating": 4.0, "category": "c", "score": 10,
            "marketplace": "m", "buyUrl": "u", "image": "i", "alt": "a", "summary": "s"}]}"#;
        assert!(matches!(
            AppData::from_json(json),
            Err(AssistantError::InvalidSeed(_))
        ));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"products": [], "favorites": ["p1"]}"#).unwrap();
        let data = AppData::from_path(file.path()).unwrap();
        assert_eq!(data.favorites, vec![ProductId::new("p1")]);

        assert!(matches!(
            AppData::from_path("/definitely/not/here.json"),
            Err(AssistantError::SeedIo { .. })
        ));
    }
}
