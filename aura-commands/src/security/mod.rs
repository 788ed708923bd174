pub mod antiall;
pub mod antibotadd;
pub mod antinuke;
pub mod antiraid;

use poise::serenity_prelude as serenity;
use tracing::info;

use aura_core::{Context, Error};
use aura_security::{Feature, GuildSettings};
use aura_utils::embed::{STATUS_EMBED_COLOR, status_emoji, support_link_row};
use aura_utils::permissions::is_administrator;

/// Apply one toggle (or all three when `feature` is `None`) and reply with
/// the full status embed. Shared by every enable/disable subcommand.
pub(crate) async fn apply_toggle(
    ctx: Context<'_>,
    feature: Option<Feature>,
    value: bool,
    headline: &str,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say("This command only works in servers.").await?;
        return Ok(());
    };

    if !is_administrator(ctx.http(), guild_id, ctx.author().id).await? {
        return Ok(());
    }

    let security = &ctx.data().security;
    let updated = match feature {
        Some(feature) => {
            security
                .settings()
                .set_flag(guild_id.get(), feature, value)
                .await
        }
        None => security.settings().set_all(guild_id.get(), value).await,
    };

    info!(
        %guild_id,
        moderator_id = %ctx.author().id,
        feature = feature.map(Feature::display_name).unwrap_or("all"),
        value,
        "protection toggle applied"
    );

    ctx.send(
        poise::CreateReply::default()
            .ephemeral(true)
            .embed(status_embed(headline, updated))
            .components(vec![support_link_row()]),
    )
    .await?;

    Ok(())
}

/// Status embed listing all three flags on one line.
pub(crate) fn status_embed(headline: &str, settings: GuildSettings) -> serenity::CreateEmbed {
    let description = format!("{}\n\n{}", headline, status_line(settings));

    serenity::CreateEmbed::new()
        .title("SecureAura Anti Features Status")
        .color(STATUS_EMBED_COLOR)
        .description(description)
        .footer(serenity::CreateEmbedFooter::new(
            "Use the slash commands to manage features.",
        ))
}

pub(crate) fn status_line(settings: GuildSettings) -> String {
    format!(
        "AntiNuke {} | AntiBotadd {} | AntiRaid {}",
        status_emoji(settings.antinuke),
        status_emoji(settings.antibotadd),
        status_emoji(settings.antiraid),
    )
}

#[cfg(test)]
mod tests {
    use aura_security::GuildSettings;

    use super::status_line;

    #[test]
    fn status_line_reflects_each_flag() {
        assert_eq!(
            status_line(GuildSettings::all(true)),
            "AntiNuke ☑️ | AntiBotadd ☑️ | AntiRaid ☑️"
        );
        assert_eq!(
            status_line(GuildSettings {
                antinuke: true,
                antibotadd: false,
                antiraid: true,
            }),
            "AntiNuke ☑️ | AntiBotadd ❎ | AntiRaid ☑️"
        );
    }
}
