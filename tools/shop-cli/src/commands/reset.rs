//! Reset persisted state.

use anyhow::{Context as _, Result};
use dialoguer::Confirm;
use shop_assistant::AppState;
use shop_cache::STATE_KEYS;

use super::ResetArgs;
use crate::context::Context;

/// Run the reset command.
pub async fn run(args: ResetArgs, ctx: &Context) -> Result<()> {
    ctx.output.header("Reset");

    let cache = ctx.open_cache()?;

    // Confirmation
    if !args.yes {
        ctx.output.warn(&format!(
            "This will delete saved {} and restore the demo data",
            STATE_KEYS.join(", ")
        ));

        let confirmed = Confirm::new()
            .with_prompt("Proceed with reset?")
            .default(false)
            .interact()?;

        if !confirmed {
            ctx.output.warn("Reset cancelled");
            return Ok(());
        }
    }

    AppState::reset(&cache).context("Failed to clear saved state")?;
    ctx.output.success("Saved state cleared");

    Ok(())
}
