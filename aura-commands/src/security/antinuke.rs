use crate::security::apply_toggle;
use aura_core::{Context, Error};
use aura_security::Feature;

#[poise::command(slash_command, subcommands("enable", "disable"), category = "Security")]
pub async fn antinuke(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

/// Enable anti-nuke protections
#[poise::command(slash_command)]
pub async fn enable(ctx: Context<'_>) -> Result<(), Error> {
    apply_toggle(ctx, Some(Feature::AntiNuke), true, "AntiNuke enabled.").await
}

/// Disable anti-nuke protections
#[poise::command(slash_command)]
pub async fn disable(ctx: Context<'_>) -> Result<(), Error> {
    apply_toggle(ctx, Some(Feature::AntiNuke), false, "AntiNuke disabled.").await
}
