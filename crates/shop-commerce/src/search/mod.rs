//! Search module.
//!
//! In-memory filtering, sorting, and pagination over the catalog.

mod filter;
mod query;
mod results;

pub use filter::Filter;
pub use query::{SearchQuery, SortOption, DEFAULT_PAGE_SIZE};
pub use results::{Pagination, SearchResults};
