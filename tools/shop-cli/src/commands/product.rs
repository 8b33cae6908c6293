//! Product detail command.

use anyhow::Result;
use console::style;
use serde_json::json;
use shop_assistant::AppState;
use shop_commerce::ProductId;

use super::{ProductArgs, ProductSummary};
use crate::context::Context;
use crate::output::{format_rating, score_badge};

/// Run the product command.
pub async fn run(args: ProductArgs, ctx: &Context) -> Result<()> {
    let state = ctx.start_state().await?;
    let result = show_product(&ProductId::new(args.id), args.buy, &state, ctx);
    state.shutdown().await;
    result
}

fn show_product(id: &ProductId, buy: bool, state: &AppState, ctx: &Context) -> Result<()> {
    let product = state.view_product(id)?;
    let favorite = state.is_favorite(id);
    if buy {
        state.buy_click(id)?;
    }

    if ctx.output.is_json() {
        ctx.output.json(&json!({
            "product": ProductSummary::from(product),
            "summary": product.summary,
            "favorite": favorite,
        }));
        return Ok(());
    }

    ctx.output.header(&product.title);
    ctx.output.line(&format!("  {}", product.summary));
    ctx.output.line("");
    ctx.output.kv("id", product.id.as_str());
    ctx.output.kv("price", &style(product.price.display()).bold().to_string());
    ctx.output.kv("rating", &format_rating(product.rating));
    ctx.output.kv("score", &score_badge(product.score));
    ctx.output.kv("category", &product.category);
    ctx.output.kv("marketplace", &product.marketplace);
    ctx.output.kv("favorite", if favorite { "yes" } else { "no" });

    if buy {
        ctx.output.success(&format!(
            "Buy on {}: {}",
            product.marketplace, product.buy_url
        ));
    }
    Ok(())
}
