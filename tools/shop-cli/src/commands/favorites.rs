//! Favorites commands.

use anyhow::Result;
use serde_json::json;
use shop_assistant::{AppState, FavoriteAction};
use shop_commerce::{Product, ProductId};

use super::{print_products, FavoritesArgs, FavoritesCommand, ProductSummary};
use crate::context::Context;
use crate::output::{format_rating, score_badge, truncate};

/// Run the favorites command.
pub async fn run(args: FavoritesArgs, ctx: &Context) -> Result<()> {
    let state = ctx.start_state().await?;

    let result = match args.command {
        Some(FavoritesCommand::List) | None => list_favorites(&state, ctx),
        Some(FavoritesCommand::Toggle { id }) => toggle(&ProductId::new(id), &state, ctx),
        Some(FavoritesCommand::Clear) => clear(&state, ctx),
        Some(FavoritesCommand::Compare { ids }) => {
            let ids: Vec<ProductId> = ids.into_iter().map(ProductId::new).collect();
            compare(&ids, &state, ctx)
        }
    };

    state.shutdown().await;
    result
}

fn list_favorites(state: &AppState, ctx: &Context) -> Result<()> {
    let products = state.favorite_products();

    if !ctx.output.is_json() {
        ctx.output.header("Favorites");
        if products.is_empty() {
            ctx.output.info("No favorites yet.");
            ctx.output.info("Run `shop favorites toggle <id>` to add one.");
            return Ok(());
        }
    }

    print_products(ctx, &products);
    Ok(())
}

fn toggle(id: &ProductId, state: &AppState, ctx: &Context) -> Result<()> {
    let action = state.toggle_favorite(id)?;

    if ctx.output.is_json() {
        ctx.output.json(&json!({ "id": id, "action": action }));
        return Ok(());
    }

    let title = state
        .catalog()
        .get(id)
        .map(|p| p.title.as_str())
        .unwrap_or(id.as_str());
    match action {
        FavoriteAction::Add => ctx.output.success(&format!("Added to favorites: {}", title)),
        FavoriteAction::Remove => {
            ctx.output.success(&format!("Removed from favorites: {}", title))
        }
    }
    Ok(())
}

fn clear(state: &AppState, ctx: &Context) -> Result<()> {
    state.clear_favorites()?;
    ctx.output.success("Favorites cleared");
    Ok(())
}

fn compare(ids: &[ProductId], state: &AppState, ctx: &Context) -> Result<()> {
    let products = state.compare(ids)?;

    if ctx.output.is_json() {
        let summaries: Vec<ProductSummary<'_>> =
            products.iter().map(|p| ProductSummary::from(*p)).collect();
        ctx.output.json(&summaries);
        return Ok(());
    }

    ctx.output.header("Compare");
    let width = 24;
    let mut widths = vec![12];
    widths.extend(std::iter::repeat(width).take(products.len()));

    let row = |label: &str, cell: &dyn Fn(&Product) -> String| {
        let cells: Vec<String> = products.iter().map(|p| cell(p)).collect();
        let mut cols: Vec<&str> = vec![label];
        cols.extend(cells.iter().map(String::as_str));
        ctx.output.table_row(&cols, &widths);
    };

    row("", &|p| truncate(&p.title, width));
    row("price", &|p| p.price.display());
    row("rating", &|p| format_rating(p.rating));
    row("score", &|p| score_badge(p.score));
    row("category", &|p| p.category.clone());
    row("marketplace", &|p| p.marketplace.clone());

    Ok(())
}
