//! Recently viewed commands.

use anyhow::Result;
use shop_assistant::AppState;

use super::{print_products, ViewedArgs, ViewedCommand};
use crate::context::Context;

/// Run the viewed command.
pub async fn run(args: ViewedArgs, ctx: &Context) -> Result<()> {
    let state = ctx.start_state().await?;

    let result = match args.command {
        Some(ViewedCommand::List) | None => list_viewed(&state, ctx),
        Some(ViewedCommand::Clear) => clear_viewed(&state, ctx),
    };

    state.shutdown().await;
    result
}

fn list_viewed(state: &AppState, ctx: &Context) -> Result<()> {
    let products = state.viewed_products();

    if !ctx.output.is_json() {
        ctx.output.header("Recently viewed");
        if products.is_empty() {
            ctx.output.info("Nothing viewed yet.");
            return Ok(());
        }
    }

    print_products(ctx, &products);
    Ok(())
}

fn clear_viewed(state: &AppState, ctx: &Context) -> Result<()> {
    state.clear_viewed()?;
    ctx.output.success("History cleared");
    Ok(())
}
