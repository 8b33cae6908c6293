//! Indexed, read-only product catalog.

use std::collections::{BTreeSet, HashMap};

use crate::catalog::Product;
use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::search::{SearchQuery, SearchResults};

/// The product catalog.
///
/// Keeps products in load order (ties in sorted searches fall back to it)
/// and an id index for lookups.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    index: HashMap<ProductId, usize>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate product ids.
    pub fn new(products: Vec<Product>) -> Result<Self, CommerceError> {
        let mut index = HashMap::with_capacity(products.len());
        for (position, product) in products.iter().enumerate() {
            if index.insert(product.id.clone(), position).is_some() {
                return Err(CommerceError::DuplicateProduct(product.id.to_string()));
            }
        }
        tracing::debug!(products = products.len(), "catalog loaded");
        Ok(Self { products, index })
    }

    /// Parse a JSON array of products.
    pub fn from_json(json: &str) -> Result<Self, CommerceError> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Self::new(products)
    }

    /// All products in load order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Look up a product by id.
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.index.get(id).map(|&position| &self.products[position])
    }

    /// Look up a product by id, failing if it is unknown.
    pub fn require(&self, id: &ProductId) -> Result<&Product, CommerceError> {
        self.get(id)
            .ok_or_else(|| CommerceError::ProductNotFound(id.to_string()))
    }

    pub fn contains(&self, id: &ProductId) -> bool {
        self.index.contains_key(id)
    }

    /// Resolve ids to products, keeping the input order.
    ///
    /// Ids with no product are dropped.
    pub fn resolve<'a, I>(&self, ids: I) -> Vec<&Product>
    where
        I: IntoIterator<Item = &'a ProductId>,
    {
        ids.into_iter().filter_map(|id| self.get(id)).collect()
    }

    /// Unique category labels, sorted.
    pub fn categories(&self) -> Vec<String> {
        self.products
            .iter()
            .map(|p| p.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Run a search over the whole catalog.
    pub fn search(&self, query: &SearchQuery) -> SearchResults<Product> {
        query.execute(&self.products)
    }
}
