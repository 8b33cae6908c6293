//! Catalog domain types and in-memory search for ShopSmart.
//!
//! - **Catalog**: products, the id index, compare selection
//! - **Search**: filters, sort options, pagination
//!
//! # Example
//!
//! ```rust
//! use shop_commerce::prelude::*;
//!
//! let json = r#"[{"id":"p1","title":"Wireless Earbuds","price":79.99,"currency":"USD",
//!   "rating":4.5,"category":"Electronics","score":92,"marketplace":"Amazon",
//!   "buyUrl":"https://example.com/p1","image":"p1.jpg","alt":"Earbuds","summary":"Noise cancelling"}]"#;
//! let products: Vec<Product> = serde_json::from_str(json).unwrap();
//! let catalog = Catalog::new(products).unwrap();
//!
//! let results = catalog.search(&SearchQuery::new().with_sort(SortOption::PriceAsc));
//! assert_eq!(results.len(), 1);
//! assert_eq!(results.items[0].price.display(), "$79.99");
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod catalog;
pub mod search;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

pub use catalog::{Catalog, CompareSelection, Product, MAX_COMPARE, MIN_COMPARE};
pub use search::{Filter, Pagination, SearchQuery, SearchResults, SortOption};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{Catalog, CompareSelection, Product, MAX_COMPARE, MIN_COMPARE};

    // Search
    pub use crate::search::{Filter, Pagination, SearchQuery, SearchResults, SortOption};
}
