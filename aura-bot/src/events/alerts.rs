//! Security alert routing.
//!
//! Alerts go to the guild's configured log channel; without one, a channel
//! literally named `logs` is used (and remembered); with neither, the guild
//! owner gets a DM. Every hop is best-effort and a total failure drops the
//! alert.

use poise::serenity_prelude as serenity;
use tracing::{debug, warn};

use aura_core::Data;

/// Deliver a security alert for `guild_id`, optionally prefixed with a
/// mention in the message content.
pub async fn notify(
    ctx: &serenity::Context,
    data: &Data,
    guild_id: serenity::GuildId,
    embed: serenity::CreateEmbed,
    mention: Option<String>,
) {
    let mut message = serenity::CreateMessage::new().embed(embed);
    if let Some(mention) = mention {
        message = message.content(mention);
    }

    if let Some(channel_id) = resolve_log_channel(ctx, data, guild_id).await {
        match channel_id.send_message(&ctx.http, message.clone()).await {
            Ok(_) => return,
            Err(source) => {
                warn!(?source, %guild_id, %channel_id, "log channel delivery failed; falling back to owner DM");
            }
        }
    }

    owner_dm(ctx, guild_id, message).await;
}

/// Resolve the alert destination: the stored mapping first, then a text
/// channel named `logs`, which is cached into the mapping when found.
async fn resolve_log_channel(
    ctx: &serenity::Context,
    data: &Data,
    guild_id: serenity::GuildId,
) -> Option<serenity::ChannelId> {
    let store = data.security.log_channels();

    let configured = store.get(guild_id.get()).await;
    let named = match configured {
        // A configured mapping settles it; never go looking by name.
        Some(_) => None,
        None => find_named_logs_channel(ctx, guild_id).await,
    };

    let (channel_id, discovered) = choose_destination(configured, named)?;
    if discovered {
        store.set(guild_id.get(), channel_id).await;
    }

    Some(serenity::ChannelId::new(channel_id))
}

/// Destination priority: an explicitly configured channel always beats a
/// name-scan hit. The flag says whether the pick came from the scan and
/// should be cached into the mapping.
fn choose_destination(configured: Option<u64>, named: Option<u64>) -> Option<(u64, bool)> {
    match configured {
        Some(channel_id) => Some((channel_id, false)),
        None => named.map(|channel_id| (channel_id, true)),
    }
}

async fn find_named_logs_channel(
    ctx: &serenity::Context,
    guild_id: serenity::GuildId,
) -> Option<u64> {
    let channels = match guild_id.channels(&ctx.http).await {
        Ok(channels) => channels,
        Err(source) => {
            debug!(?source, %guild_id, "could not list channels while resolving log channel");
            return None;
        }
    };

    channels
        .into_values()
        .find(|channel| channel.kind == serenity::ChannelType::Text && channel.name == "logs")
        .map(|channel| channel.id.get())
}

async fn owner_dm(
    ctx: &serenity::Context,
    guild_id: serenity::GuildId,
    message: serenity::CreateMessage,
) {
    let owner_id = match guild_id.to_partial_guild(&ctx.http).await {
        Ok(guild) => guild.owner_id,
        Err(source) => {
            debug!(?source, %guild_id, "could not resolve guild owner for alert DM");
            return;
        }
    };

    let dm_channel = match owner_id.create_dm_channel(&ctx.http).await {
        Ok(channel) => channel,
        Err(source) => {
            debug!(?source, %owner_id, "could not open owner DM channel; alert dropped");
            return;
        }
    };

    if let Err(source) = dm_channel.send_message(&ctx.http, message).await {
        debug!(?source, %owner_id, "owner DM delivery failed; alert dropped");
    }
}

#[cfg(test)]
mod tests {
    use super::choose_destination;

    #[test]
    fn configured_mapping_always_beats_a_named_channel() {
        assert_eq!(choose_destination(Some(100), Some(200)), Some((100, false)));
        assert_eq!(choose_destination(Some(100), None), Some((100, false)));
    }

    #[test]
    fn named_channel_is_used_and_cached_only_without_a_mapping() {
        assert_eq!(choose_destination(None, Some(200)), Some((200, true)));
        assert_eq!(choose_destination(None, None), None);
    }
}
