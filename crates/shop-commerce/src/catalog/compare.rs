//! Side-by-side compare selection.

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Product};
use crate::error::CommerceError;
use crate::ids::ProductId;

/// Most products that can be compared at once.
pub const MAX_COMPARE: usize = 4;

/// Fewest products needed for a comparison.
pub const MIN_COMPARE: usize = 2;

/// Products picked for comparison, in selection order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompareSelection {
    ids: Vec<ProductId>,
}

impl CompareSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a selection from ids, failing past the limit.
    pub fn from_ids<I>(ids: I) -> Result<Self, CommerceError>
    where
        I: IntoIterator<Item = ProductId>,
    {
        let mut selection = Self::new();
        for id in ids {
            if !selection.contains(&id) {
                selection.toggle(id)?;
            }
        }
        Ok(selection)
    }

    /// Select or deselect a product.
    ///
    /// Returns whether the product is selected afterwards. Selecting a
    /// product when the selection is full fails and leaves it unchanged.
    pub fn toggle(&mut self, id: ProductId) -> Result<bool, CommerceError> {
        if let Some(position) = self.ids.iter().position(|selected| *selected == id) {
            self.ids.remove(position);
            return Ok(false);
        }
        if self.ids.len() >= MAX_COMPARE {
            return Err(CommerceError::CompareLimitReached(MAX_COMPARE));
        }
        self.ids.push(id);
        Ok(true)
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

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Whether enough products are selected to compare.
    pub fn is_ready(&self) -> bool {
        self.ids.len() >= MIN_COMPARE
    }

    /// Resolve the selection for display.
    ///
    /// Dangling ids are dropped before the minimum is checked.
    pub fn products<'a>(&self, catalog: &'a Catalog) -> Result<Vec<&'a Product>, CommerceError> {
        let products = catalog.resolve(&self.ids);
        if products.len() < MIN_COMPARE {
            return Err(CommerceError::CompareTooFew {
                required: MIN_COMPARE,
                selected: products.len(),
            });
        }
        Ok(products)
    }
}
