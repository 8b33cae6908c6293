//! Search query builder and executor.

use std::cmp::Ordering;

use crate::catalog::Product;
use crate::search::{Filter, Pagination, SearchResults};
use serde::{Deserialize, Serialize};

/// Products shown per page before "load more".
pub const DEFAULT_PAGE_SIZE: usize = 9;

/// Largest accepted page size.
const MAX_PAGE_SIZE: usize = 100;

/// Sort options for search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SortOption {
    /// Best recommendation score first.
    #[default]
    Score,
    /// Price, low to high.
    PriceAsc,
    /// Price, high to low.
    PriceDesc,
    /// Highest rated first.
    Rating,
    /// Title A-Z.
    TitleAsc,
}

impl SortOption {
    /// Order two products under this option.
    pub fn compare(&self, a: &Product, b: &Product) -> Ordering {
        match self {
            SortOption::Score => b.score.cmp(&a.score),
            SortOption::PriceAsc => a.price.amount_cents.cmp(&b.price.amount_cents),
            SortOption::PriceDesc => b.price.amount_cents.cmp(&a.price.amount_cents),
            SortOption::Rating => b.rating.total_cmp(&a.rating),
            SortOption::TitleAsc => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SortOption::Score => "Best Score",
            SortOption::PriceAsc => "Price: Low to High",
            SortOption::PriceDesc => "Price: High to Low",
            SortOption::Rating => "Rating",
            SortOption::TitleAsc => "Title: A-Z",
        }
    }

    /// Parse a sort name as typed on the command line.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "score" | "best" => Some(SortOption::Score),
            "price" | "price-asc" => Some(SortOption::PriceAsc),
            "price-desc" => Some(SortOption::PriceDesc),
            "rating" => Some(SortOption::Rating),
            "title" | "title-asc" | "name" => Some(SortOption::TitleAsc),
            _ => None,
        }
    }
}

/// A search query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Filters to apply (all must match).
    pub filters: Vec<Filter>,
    /// Sort option.
    pub sort: SortOption,
    /// Current page (1-indexed).
    pub page: usize,
    /// Items per page.
    pub per_page: usize,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchQuery {
    /// Create a new search query.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
            sort: SortOption::Score,
            page: 1,
            per_page: DEFAULT_PAGE_SIZE,
        }
    }

    /// Add a text search; empty text adds nothing.
    pub fn with_query(mut self, q: impl Into<String>) -> Self {
        let q = q.into();
        if !q.trim().is_empty() {
            self.filters.push(Filter::Text(q));
        }
        self
    }

    /// Add a filter.
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Set sort option.
    pub fn with_sort(mut self, sort: SortOption) -> Self {
        self.sort = sort;
        self
    }

    /// Set pagination.
    pub fn with_pagination(mut self, page: usize, per_page: usize) -> Self {
        self.page = page.max(1);
        self.per_page = per_page.clamp(1, MAX_PAGE_SIZE);
        self
    }

    /// Offset of the first item on the current page.
    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1) * self.per_page
    }

    /// Whether a product passes every filter.
    pub fn matches(&self, product: &Product) -> bool {
        self.filters.iter().all(|f| f.matches(product))
    }

    /// Filter, sort, and paginate.
    ///
    /// The sort is stable, so ties keep the input order.
    pub fn execute(&self, products: &[Product]) -> SearchResults<Product> {
        let mut matched: Vec<&Product> = products.iter().filter(|p| self.matches(p)).collect();
        matched.sort_by(|a, b| self.sort.compare(a, b));

        let pagination = Pagination::new(self.page, self.per_page, matched.len());
        let items = matched
            .into_iter()
            .skip(self.offset())
            .take(self.per_page)
            .cloned()
            .collect();

        SearchResults::new(items, pagination)
    }
}
