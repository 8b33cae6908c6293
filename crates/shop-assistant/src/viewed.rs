//! Recently viewed products.

use std::collections::VecDeque;

use shop_commerce::{Catalog, Product, ProductId};

/// Default number of entries kept.
pub const VIEWED_CAPACITY: usize = 50;

/// Most-recent-first view history.
///
/// Re-viewing a product moves it to the front; once full the oldest entry
/// is evicted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewedHistory {
    ids: VecDeque<ProductId>,
    capacity: usize,
}

impl Default for ViewedHistory {
    fn default() -> Self {
        Self::new(VIEWED_CAPACITY)
    }
}

impl ViewedHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            ids: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Rebuild from a most-recent-first list.
    ///
    /// Later duplicates are dropped and the list is cut to `capacity`.
    pub fn from_ids<I>(ids: I, capacity: usize) -> Self
    where
        I: IntoIterator<Item = ProductId>,
    {
        let mut history = Self::new(capacity);
        for id in ids {
            if history.ids.len() == history.capacity {
                break;
            }
            if !history.ids.contains(&id) {
                history.ids.push_back(id);
            }
        }
        history
    }

    /// Record a view.
    pub fn record(&mut self, id: ProductId) {
        self.ids.retain(|existing| *existing != id);
        self.ids.push_front(id);
        self.ids.truncate(self.capacity);
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, id: &ProductId) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Ids, most recent first.
    pub fn iter(&self) -> impl Iterator<Item = &ProductId> {
        self.ids.iter()
    }

    pub fn to_vec(&self) -> Vec<ProductId> {
        self.ids.iter().cloned().collect()
    }

    /// Viewed products, most recent first; unknown ids are skipped.
    pub fn products<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Product> {
        catalog.resolve(self.ids.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strs(history: &ViewedHistory) -> Vec<&str> {
        history.iter().map(|id| id.as_str()).collect()
    }

    #[test]
    fn test_reviewing_moves_to_front() {
        let mut history = ViewedHistory::default();
        history.record("A".into());
        history.record("B".into());
        history.record("A".into());
        assert_eq!(strs(&history), vec!["A", "B"]);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut history = ViewedHistory::default();
        for i in 0..51 {
            history.record(ProductId::new(format!("p{}", i)));
        }
        assert_eq!(history.len(), 50);
        assert!(!history.contains(&"p0".into()));
        assert_eq!(history.iter().next().unwrap().as_str(), "p50");
        assert_eq!(history.iter().last().unwrap().as_str(), "p1");
    }

    #[test]
    fn test_from_ids_dedupes_and_caps() {
        let ids = ["p1", "p2", "p1", "p3", "p4"].map(ProductId::new);
        let history = ViewedHistory::from_ids(ids, 3);
        assert_eq!(strs(&history), vec!["p1", "p2", "p3"]);
    }
}
