//! Welcome notice when the bot is added to a new guild.

use ::serenity::model::guild::audit_log::{Action, MemberAction};
use poise::serenity_prelude as serenity;
use tracing::debug;

use aura_core::Data;
use aura_utils::embed::{STATUS_EMBED_COLOR, support_link_row};

use crate::events::antinuke::find_recent_actor;

/// Greet whoever added the bot: a DM to them (best-effort) and one post in
/// an arbitrary text channel the bot can speak in.
pub async fn handle_guild_join(ctx: &serenity::Context, _data: &Data, guild: &serenity::Guild) {
    // The bot-add audit entry names the adder; without it, address the owner.
    let adder_id = find_recent_actor(ctx, guild.id, Action::Member(MemberAction::BotAdd))
        .await
        .unwrap_or(guild.owner_id);

    let embed = serenity::CreateEmbed::new()
        .title("AntiNuke Features Enabled ☑️")
        .description(format!(
            "Hey, <@{}>, thanks for using our bot in your server.\n\
             - Secure Aura is the most powerful nuke controller bot of discord.",
            adder_id
        ))
        .color(STATUS_EMBED_COLOR)
        .timestamp(serenity::Timestamp::now());
    let message = serenity::CreateMessage::new()
        .embed(embed)
        .components(vec![support_link_row()]);

    // Closed DMs are common; the channel post below still lands.
    if let Ok(dm_channel) = adder_id.create_dm_channel(&ctx.http).await {
        if let Err(source) = dm_channel.send_message(&ctx.http, message.clone()).await {
            debug!(?source, %adder_id, "welcome DM failed");
        }
    }

    let Some(channel_id) = sendable_text_channel(ctx, guild).await else {
        return;
    };
    if let Err(source) = channel_id.send_message(&ctx.http, message).await {
        debug!(?source, %channel_id, "welcome channel post failed");
    }
}

/// Pick any text channel where the bot may send messages.
async fn sendable_text_channel(
    ctx: &serenity::Context,
    guild: &serenity::Guild,
) -> Option<serenity::ChannelId> {
    let bot_id = ctx.cache.current_user().id;
    let bot_member = match guild.id.member(&ctx.http, bot_id).await {
        Ok(member) => member,
        Err(source) => {
            debug!(?source, guild_id = %guild.id, "bot member fetch failed during welcome");
            return None;
        }
    };

    guild
        .channels
        .values()
        .find(|channel| {
            channel.kind == serenity::ChannelType::Text
                && guild
                    .user_permissions_in(channel, &bot_member)
                    .contains(serenity::Permissions::SEND_MESSAGES)
        })
        .map(|channel| channel.id)
}
