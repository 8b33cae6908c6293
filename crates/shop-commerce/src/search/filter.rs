//! Search filter types.

use crate::catalog::Product;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Category value meaning "no category filter".
pub const ALL_CATEGORIES: &str = "all";

/// A search filter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Filter {
    /// Filter by category label.
    Category(String),
    /// Filter by price range (inclusive).
    PriceRange {
        min: Option<Money>,
        max: Option<Money>,
    },
    /// Filter by minimum rating.
    Rating { min: f64 },
    /// Filter by minimum recommendation score.
    Score { min: u8 },
    /// Filter by marketplace.
    Marketplace(String),
    /// Substring search in title/summary.
    Text(String),
}

impl Filter {
    /// Create a category filter.
    pub fn category(category: impl Into<String>) -> Self {
        Filter::Category(category.into())
    }

    /// Create a price range filter.
    pub fn price_range(min: Option<Money>, max: Option<Money>) -> Self {
        Filter::PriceRange { min, max }
    }

    /// Create a minimum rating filter.
    pub fn min_rating(min: f64) -> Self {
        Filter::Rating { min }
    }

    /// Create a text search filter.
    pub fn text(query: impl Into<String>) -> Self {
        Filter::Text(query.into())
    }

    /// Whether a product passes this filter.
    ///
    /// Price bounds compare minor units and ignore currency, the same way
    /// the catalog's price sort does.
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Filter::Category(category) => {
                category.eq_ignore_ascii_case(ALL_CATEGORIES) || product.in_category(category)
            }
            Filter::PriceRange { min, max } => {
                let cents = product.price.amount_cents;
                min.map_or(true, |min| cents >= min.amount_cents)
                    && max.map_or(true, |max| cents <= max.amount_cents)
            }
            Filter::Rating { min } => product.rating >= *min,
            Filter::Score { min } => product.score >= *min,
            Filter::Marketplace(marketplace) => product.marketplace.eq_ignore_ascii_case(marketplace),
            Filter::Text(query) => product.matches_text(query),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures::product;
    use crate::money::Currency;

    #[test]
    fn test_all_category_matches_everything() {
        let p = product("p1", "Kitchen", 1000, 4.0, 80);
        assert!(Filter::category("all").matches(&p));
        assert!(Filter::category("kitchen").matches(&p));
        assert!(!Filter::category("Home").matches(&p));
    }

    #[test]
    fn test_price_range_inclusive() {
        let p = product("p1", "Kitchen", 5000, 4.0, 80);
        let range = Filter::price_range(
            Some(Money::new(5000, Currency::USD)),
            Some(Money::new(5000, Currency::USD)),
        );
        assert!(range.matches(&p));
        let above = Filter::price_range(Some(Money::new(5001, Currency::USD)), None);
        assert!(!above.matches(&p));
    }

    #[test]
    fn test_rating_and_score() {
        let p = product("p1", "Kitchen", 5000, 4.2, 70);
        assert!(Filter::min_rating(4.0).matches(&p));
        assert!(!Filter::min_rating(4.5).matches(&p));
        assert!(!Filter::Score { min: 71 }.matches(&p));
    }
}
