use crate::security::apply_toggle;
use aura_core::{Context, Error};

#[poise::command(slash_command, subcommands("enable", "disable"), category = "Security")]
pub async fn antiall(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

/// Enable all protections
#[poise::command(slash_command)]
pub async fn enable(ctx: Context<'_>) -> Result<(), Error> {
    apply_toggle(ctx, None, true, "All features enabled.").await
}

/// Disable all protections
#[poise::command(slash_command)]
pub async fn disable(ctx: Context<'_>) -> Result<(), Error> {
    apply_toggle(ctx, None, false, "All features disabled.").await
}
