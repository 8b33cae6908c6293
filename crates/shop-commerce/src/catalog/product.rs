//! Product type.

use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Highest recommendation score a product can carry.
pub const MAX_SCORE: u8 = 100;

/// Highest star rating a product can carry.
pub const MAX_RATING: f64 = 5.0;

/// A product in the catalog.
///
/// Reference data: loaded once from the seed and never mutated.
/// Serializes to the seed's flat shape (`price` + `currency`, `buyUrl`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ProductRecord", into = "ProductRecord")]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Listed price.
    pub price: Money,
    /// Average star rating (0-5).
    pub rating: f64,
    /// Category label.
    pub category: String,
    /// Recommendation score (0-100).
    pub score: u8,
    /// Marketplace selling the product.
    pub marketplace: String,
    /// Purchase link.
    pub buy_url: String,
    /// Image reference.
    pub image: String,
    /// Image alt text.
    pub alt: String,
    /// Short description.
    pub summary: String,
}

impl Product {
    /// Case-insensitive substring match over title and summary.
    pub fn matches_text(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        self.title.to_lowercase().contains(&query) || self.summary.to_lowercase().contains(&query)
    }

    /// Whether the category label matches, ignoring case.
    pub fn in_category(&self, category: &str) -> bool {
        self.category.eq_ignore_ascii_case(category)
    }
}

/// Wire representation of a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductRecord {
    id: ProductId,
    title: String,
    price: f64,
    currency: String,
    rating: f64,
    category: String,
    score: f64,
    marketplace: String,
    buy_url: String,
    image: String,
    #[serde(default)]
    alt: String,
    #[serde(default)]
    summary: String,
}

impl TryFrom<ProductRecord> for Product {
    type Error = CommerceError;

    fn try_from(record: ProductRecord) -> Result<Self, Self::Error> {
        let currency = Currency::from_code(&record.currency)
            .ok_or_else(|| CommerceError::InvalidCurrency(record.currency.clone()))?;

        if !record.price.is_finite() || record.price < 0.0 {
            return Err(CommerceError::ValidationError(format!(
                "product {}: price must be a non-negative number",
                record.id
            )));
        }
        if !(0.0..=MAX_RATING).contains(&record.rating) {
            return Err(CommerceError::ValidationError(format!(
                "product {}: rating {} outside 0-{}",
                record.id, record.rating, MAX_RATING
            )));
        }
        if !(0.0..=f64::from(MAX_SCORE)).contains(&record.score) {
            return Err(CommerceError::ValidationError(format!(
                "product {}: score {} outside 0-{}",
                record.id, record.score, MAX_SCORE
            )));
        }

        Ok(Product {
            id: record.id,
            title: record.title,
            price: Money::from_decimal(record.price, currency),
            rating: record.rating,
            category: record.category,
            score: record.score.round() as u8,
            marketplace: record.marketplace,
            buy_url: record.buy_url,
            image: record.image,
            alt: record.alt,
            summary: record.summary,
        })
    }
}

impl From<Product> for ProductRecord {
    fn from(product: Product) -> Self {
        ProductRecord {
            id: product.id,
            title: product.title,
            price: product.price.to_decimal(),
            currency: product.price.currency.code().to_string(),
            rating: product.rating,
            category: product.category,
            score: f64::from(product.score),
            marketplace: product.marketplace,
            buy_url: product.buy_url,
            image: product.image,
            alt: product.alt,
            summary: product.summary,
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Build a product for tests.
    pub fn product(id: &str, category: &str, price_cents: i64, rating: f64, score: u8) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Product {}", id),
            price: Money::new(price_cents, Currency::USD),
            rating,
            category: category.to_string(),
            score,
            marketplace: "Amazon".to_string(),
            buy_url: format!("https://example.com/{}", id),
            image: format!("{}.jpg", id),
            alt: String::new(),
            summary: format!("Summary for {}", id),
        }
    }
}
