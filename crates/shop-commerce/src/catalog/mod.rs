//! Product catalog module.
//!
//! Contains the product type, the indexed catalog, and compare selection.

mod compare;
mod index;
mod product;

pub use compare::{CompareSelection, MAX_COMPARE, MIN_COMPARE};
pub use index::Catalog;
pub use product::Product;

#[cfg(test)]
pub(crate) use product::fixtures;
