use poise::serenity_prelude as serenity;

use aura_core::{Context, Error};
use aura_utils::permissions::is_administrator;

/// Name of the locked log channel created by `/logschannel create`.
const LOG_CHANNEL_NAME: &str = "logs-secureaura";

#[poise::command(slash_command, subcommands("create"), category = "Security")]
pub async fn logschannel(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

/// Create (or reuse) the locked security log channel for this server
#[poise::command(slash_command)]
pub async fn create(ctx: Context<'_>) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say("This command only works in servers.").await?;
        return Ok(());
    };

    if !is_administrator(ctx.http(), guild_id, ctx.author().id).await? {
        return Ok(());
    }

    let guild = guild_id.to_partial_guild(ctx.http()).await?;
    let bot_id = ctx.framework().bot_id;
    let overwrites = locked_overwrites(guild_id, guild.owner_id, bot_id);

    let existing = guild_id
        .channels(ctx.http())
        .await?
        .into_values()
        .find(|channel| {
            channel.kind == serenity::ChannelType::Text && channel.name == LOG_CHANNEL_NAME
        });

    let (channel_id, created) = match existing {
        Some(channel) => {
            channel
                .id
                .edit(ctx.http(), serenity::EditChannel::new().permissions(overwrites))
                .await?;
            (channel.id, false)
        }
        None => {
            let channel = guild_id
                .create_channel(
                    ctx.http(),
                    serenity::CreateChannel::new(LOG_CHANNEL_NAME)
                        .kind(serenity::ChannelType::Text)
                        .permissions(overwrites)
                        .audit_log_reason("Logs channel for bot security and moderation."),
                )
                .await?;
            (channel.id, true)
        }
    };

    ctx.data()
        .security
        .log_channels()
        .set(guild_id.get(), channel_id.get())
        .await;

    let reply = if created {
        format!("Created and locked log channel: <#{}>", channel_id)
    } else {
        format!("Log channel set and locked: <#{}>", channel_id)
    };
    ctx.send(poise::CreateReply::default().ephemeral(true).content(reply))
        .await?;

    Ok(())
}

/// Hide the channel from `@everyone`; let the owner and the bot read/send.
fn locked_overwrites(
    guild_id: serenity::GuildId,
    owner_id: serenity::UserId,
    bot_id: serenity::UserId,
) -> Vec<serenity::PermissionOverwrite> {
    let read_and_send = serenity::Permissions::VIEW_CHANNEL | serenity::Permissions::SEND_MESSAGES;

    vec![
        serenity::PermissionOverwrite {
            allow: serenity::Permissions::empty(),
            deny: serenity::Permissions::VIEW_CHANNEL,
            kind: serenity::PermissionOverwriteType::Role(serenity::RoleId::new(guild_id.get())),
        },
        serenity::PermissionOverwrite {
            allow: read_and_send,
            deny: serenity::Permissions::empty(),
            kind: serenity::PermissionOverwriteType::Member(owner_id),
        },
        serenity::PermissionOverwrite {
            allow: read_and_send,
            deny: serenity::Permissions::empty(),
            kind: serenity::PermissionOverwriteType::Member(bot_id),
        },
    ]
}
