//! Favorited products.

use serde::{Deserialize, Serialize};
use shop_commerce::{Catalog, Product, ProductId};

/// Result of toggling a favorite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FavoriteAction {
    Add,
    Remove,
}

impl FavoriteAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            FavoriteAction::Add => "add",
            FavoriteAction::Remove => "remove",
        }
    }
}

/// Set of favorited product ids.
///
/// Persists as a plain JSON array. Insertion order is kept only for
/// stable output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Favorites {
    ids: Vec<ProductId>,
}

impl Favorites {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from ids, dropping repeats.
    pub fn from_ids<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = ProductId>,
    {
        let mut favorites = Self::new();
        for id in ids {
            favorites.add(id);
        }
        favorites
    }

    /// Add the id if absent, otherwise remove it.
    pub fn toggle(&mut self, id: ProductId) -> FavoriteAction {
        if self.remove(&id) {
            FavoriteAction::Remove
        } else {
            self.ids.push(id);
            FavoriteAction::Add
        }
    }

    /// Add the id; returns false if it was already present.
    pub fn add(&mut self, id: ProductId) -> bool {
        if self.contains(&id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    /// Remove the id; returns false if it was absent.
    pub fn remove(&mut self, id: &ProductId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|existing| existing != id);
        self.ids.len() != before
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, id: &ProductId) -> bool {
        self.ids.contains(id)
    }

    pub fn ids(&self) -> &[ProductId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Favorited products in catalog order; unknown ids are skipped.
    pub fn products<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Product> {
        catalog
            .products()
            .iter()
            .filter(|p| self.contains(&p.id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn favorites(ids: &[&str]) -> Favorites {
        Favorites::from_ids(ids.iter().map(|id| ProductId::new(*id)))
    }

    #[test]
    fn test_toggle_twice_restores_contents() {
        let original = favorites(&["p1", "p5"]);

        for id in ["p3", "p1"] {
            let mut toggled = original.clone();
            let first = toggled.toggle(id.into());
            let second = toggled.toggle(id.into());
            assert_ne!(first, second);

            let mut before: Vec<_> = original.ids().to_vec();
            let mut after: Vec<_> = toggled.ids().to_vec();
            before.sort();
            after.sort();
            assert_eq!(before, after, "toggling {} twice", id);
        }
    }

    #[test]
    fn test_toggle_reports_action() {
        let mut favs = Favorites::new();
        assert_eq!(favs.toggle("p2".into()), FavoriteAction::Add);
        assert!(favs.contains(&"p2".into()));
        assert_eq!(favs.toggle("p2".into()), FavoriteAction::Remove);
        assert!(favs.is_empty());
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut favs = favorites(&["p1"]);
        assert!(!favs.add("p1".into()));
        assert_eq!(favs.len(), 1);
        assert!(!favs.remove(&"p9".into()));
    }

    #[test]
    fn test_persists_as_array() {
        let favs = favorites(&["p1", "p1", "p4"]);
        assert_eq!(serde_json::to_string(&favs).unwrap(), r#"["p1","p4"]"#);
    }
}
