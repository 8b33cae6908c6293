//! Catalog browsing commands.

use anyhow::{bail, Result};
use serde::Serialize;
use shop_commerce::{Currency, Filter, Money, Pagination, SearchQuery, SortOption};

use super::{print_products, BrowseArgs, ProductSummary};
use crate::context::Context;

/// Run the browse command.
pub async fn run(args: BrowseArgs, ctx: &Context) -> Result<()> {
    let state = ctx.start_state().await?;
    let per_page = args.per_page.unwrap_or(state.config().page_size);
    let query = build_query(&args, per_page)?;

    let results = state.search(&query);
    let favorites = state.favorites();
    state.shutdown().await;

    if ctx.output.is_json() {
        #[derive(Serialize)]
        struct Page<'a> {
            products: Vec<ProductSummary<'a>>,
            pagination: &'a Pagination,
        }
        ctx.output.json(&Page {
            products: results.items.iter().map(ProductSummary::from).collect(),
            pagination: &results.pagination,
        });
        return Ok(());
    }

    ctx.output.header(&format!("Products ({})", query.sort.display_name()));
    if results.is_empty() {
        ctx.output.info("No products match these filters.");
        return Ok(());
    }

    let products: Vec<_> = results.items.iter().collect();
    print_products(ctx, &products);

    let page = &results.pagination;
    ctx.output.line("");
    ctx.output.info(&format!(
        "Showing {}-{} of {} (page {}/{})",
        page.start_item(),
        page.end_item(),
        page.total,
        page.page,
        page.total_pages
    ));
    if page.has_next {
        ctx.output.info(&format!(
            "{} more; use --page {} to load more",
            page.remaining(),
            page.page + 1
        ));
    }
    let favorite_count = products.iter().filter(|p| favorites.contains(&p.id)).count();
    if favorite_count > 0 {
        ctx.output.debug(&format!("{} of these are favorites", favorite_count));
    }

    Ok(())
}

/// List catalog categories.
pub async fn categories(ctx: &Context) -> Result<()> {
    let state = ctx.start_state().await?;
    let categories = state.catalog().categories();
    state.shutdown().await;

    if ctx.output.is_json() {
        ctx.output.json(&categories);
        return Ok(());
    }

    ctx.output.header("Categories");
    for category in &categories {
        ctx.output.list_item(category);
    }
    Ok(())
}

fn build_query(args: &BrowseArgs, per_page: usize) -> Result<SearchQuery> {
    let Some(sort) = SortOption::parse(&args.sort) else {
        bail!(
            "Unknown sort '{}'. Use one of: score, price, price-desc, rating, title",
            args.sort
        );
    };
    if let Some(rating) = args.min_rating {
        if !(0.0..=5.0).contains(&rating) {
            bail!("--min-rating must be between 0 and 5");
        }
    }
    if let (Some(min), Some(max)) = (args.min_price, args.max_price) {
        if min > max {
            bail!("--min-price must not exceed --max-price");
        }
    }

    let mut query = SearchQuery::new()
        .with_sort(sort)
        .with_pagination(args.page, per_page)
        .with_query(args.query.clone().unwrap_or_default());

    if let Some(category) = &args.category {
        query = query.with_filter(Filter::category(category.as_str()));
    }
    if args.min_price.is_some() || args.max_price.is_some() {
        let bound = |amount: f64| Money::from_decimal(amount, Currency::default());
        query = query.with_filter(Filter::price_range(
            args.min_price.map(bound),
            args.max_price.map(bound),
        ));
    }
    if let Some(min) = args.min_rating {
        query = query.with_filter(Filter::min_rating(min));
    }
    if let Some(min) = args.min_score {
        query = query.with_filter(Filter::Score { min });
    }
    if let Some(marketplace) = &args.marketplace {
        query = query.with_filter(Filter::Marketplace(marketplace.clone()));
    }

    Ok(query)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> BrowseArgs {
        BrowseArgs {
            category: None,
            sort: "score".to_string(),
            min_rating: None,
            min_score: None,
            min_price: None,
            max_price: None,
            marketplace: None,
            query: None,
            page: 1,
            per_page: None,
        }
    }

    #[test]
    fn test_query_from_args() {
        let mut args = args();
        args.sort = "price".to_string();
        args.category = Some("Electronics".to_string());
        args.max_price = Some(60.0);

        let query = build_query(&args, 9).unwrap();
        assert_eq!(query.sort, SortOption::PriceAsc);
        assert_eq!(query.filters.len(), 2);
    }

    #[test]
    fn test_bad_arguments_rejected() {
        let mut bad_sort = args();
        bad_sort.sort = "cheapest".to_string();
        assert!(build_query(&bad_sort, 9).is_err());

        let mut bad_range = args();
        bad_range.min_price = Some(100.0);
        bad_range.max_price = Some(10.0);
        assert!(build_query(&bad_range, 9).is_err());
    }
}
