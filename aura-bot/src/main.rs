mod events;

use std::env;

use poise::serenity_prelude as serenity;
use tracing::{debug, error, info};
use tracing_subscriber::Layer;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use rustls::crypto::ring::default_provider;

use aura_core::{Data, Error};
use aura_security::SecurityService;
use aura_utils::embed::STATUS_EMBED_COLOR;

use crate::events::antinuke::ChannelEvent;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let fmt_layer = tracing_subscriber::fmt::layer().with_filter(filter_fn(|metadata| {
        let target = metadata.target();

        let within_info_level = *metadata.level() <= tracing::Level::INFO;
        if !within_info_level {
            return false;
        }

        !(target.starts_with("serenity::gateway::bridge::shard_manager")
            || target.starts_with("serenity::gateway::bridge::shard_runner"))
    }));

    tracing_subscriber::registry().with(fmt_layer).init();

    default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("failed to install rustls ring provider"))?;

    // Load the .env file
    dotenvy::dotenv().ok();

    let token = env::var("DISCORD_TOKEN")?;
    let log_channels_file =
        env::var("AURA_LOG_CHANNELS_FILE").unwrap_or_else(|_| "log_channels.json".to_string());

    let security = SecurityService::new(&log_channels_file);
    info!(path = %log_channels_file, "log channel mapping loaded.");

    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MEMBERS
        | serenity::GatewayIntents::GUILD_MODERATION;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: aura_commands::commands(),
            event_handler: |ctx, event, framework, data| {
                Box::pin(handle_event(ctx, event, framework, data))
            },
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, _ready, framework| {
            let security = security.clone();
            Box::pin(async move {
                info!("SecureAura has awoken!");

                poise::builtins::register_globally(ctx, &framework.options().commands).await?;

                Ok(Data { security })
            })
        })
        .build();

    info!("SecureAura is connecting...");

    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .activity(serenity::ActivityData::playing("Moderating the server!"))
        .await?;

    client.start().await?;
    Ok(())
}

async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!(?error, "command error");

            let embed = serenity::CreateEmbed::new()
                .title("Command Error")
                .description("Something went wrong while running this command.")
                .color(STATUS_EMBED_COLOR);

            let _ = ctx
                .send(poise::CreateReply::default().ephemeral(true).embed(embed))
                .await;
        }
        poise::FrameworkError::UnknownCommand { .. } => {
            debug!("unknown command invocation");
        }
        other => {
            error!(?other, "framework error");
        }
    }
}

async fn handle_event(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::ChannelCreate { channel } => {
            events::antinuke::handle_channel_event(ctx, data, channel, ChannelEvent::Create).await;
        }
        serenity::FullEvent::ChannelDelete { channel, .. } => {
            events::antinuke::handle_channel_event(ctx, data, channel, ChannelEvent::Delete).await;
        }
        serenity::FullEvent::GuildAuditLogEntryCreate { entry, guild_id } => {
            events::antinuke::handle_audit_log_entry(ctx, data, *guild_id, entry).await;
        }
        serenity::FullEvent::GuildMemberAddition { new_member } => {
            events::joins::handle_member_join(ctx, data, new_member).await;
        }
        serenity::FullEvent::GuildCreate { guild, is_new } => {
            if is_new.unwrap_or(false) {
                events::welcome::handle_guild_join(ctx, data, guild).await;
            }
        }
        _ => {}
    }

    Ok(())
}
