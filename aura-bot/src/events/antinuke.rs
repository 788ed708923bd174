//! Anti-nuke enforcement.
//!
//! Channel creations/deletions accumulate strikes against the acting user
//! (warn below the threshold, ban at it); unauthorized kicks and bans seen
//! in the audit log are punished immediately. Actors that rank at or above
//! the bot are never touched.

use std::collections::HashMap;

use ::serenity::model::guild::audit_log::{Action, AuditLogEntry, ChannelAction, MemberAction};
use poise::serenity_prelude as serenity;
use tracing::{debug, info, warn};

use aura_core::Data;
use aura_security::{Feature, STRIKE_THRESHOLD};
use aura_utils::embed::{ESCALATION_EMBED_COLOR, WARNING_EMBED_COLOR, security_alert_embed};

use crate::events::alerts;

/// Which side of a channel lifecycle event fired.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelEvent {
    Create,
    Delete,
}

impl ChannelEvent {
    fn verb(self) -> &'static str {
        match self {
            ChannelEvent::Create => "create",
            ChannelEvent::Delete => "delete",
        }
    }

    fn audit_action(self) -> Action {
        match self {
            ChannelEvent::Create => Action::Channel(ChannelAction::Create),
            ChannelEvent::Delete => Action::Channel(ChannelAction::Delete),
        }
    }
}

/// Handle a guild channel being created or deleted.
pub async fn handle_channel_event(
    ctx: &serenity::Context,
    data: &Data,
    channel: &serenity::GuildChannel,
    event: ChannelEvent,
) {
    let guild_id = channel.guild_id;
    if !data
        .security
        .settings()
        .is_enabled(guild_id.get(), Feature::AntiNuke)
        .await
    {
        return;
    }

    // Most-recent matching audit entry attributes the event; no entry means
    // no attribution, so no action.
    let Some(actor_id) = find_recent_actor(ctx, guild_id, event.audit_action()).await else {
        return;
    };

    if !bot_outranks_actor(ctx, guild_id, actor_id).await {
        return;
    }

    let count = data
        .security
        .strikes()
        .record_violation(guild_id.get(), actor_id.get())
        .await;

    let channel_label = match event {
        ChannelEvent::Create => format!("<#{}>", channel.id),
        ChannelEvent::Delete => format!("`#{}`", channel.name),
    };
    let description = format!(
        "<@{}> tried to {} a channel: {}",
        actor_id,
        event.verb(),
        channel_label
    );

    if count < STRIKE_THRESHOLD {
        let embed = security_alert_embed("Security Alert", description, WARNING_EMBED_COLOR)
            .field("Count", count.to_string(), true)
            .footer(serenity::CreateEmbedFooter::new(format!(
                "User ID: {}",
                actor_id
            )));
        alerts::notify(ctx, data, guild_id, embed, Some(format!("<@{}>", actor_id))).await;
        return;
    }

    info!(%guild_id, %actor_id, count, "strike threshold reached, banning actor");
    if let Err(source) = guild_id
        .ban_with_reason(&ctx.http, actor_id, 0, "Exceeded channel create/delete limit")
        .await
    {
        warn!(?source, %guild_id, %actor_id, "ban after strike threshold failed");
    }

    let embed = security_alert_embed(
        "User Banned",
        format!(
            "{}\nUser has been banned after {} warnings.",
            description, STRIKE_THRESHOLD
        ),
        ESCALATION_EMBED_COLOR,
    )
    .field("Count", count.to_string(), true)
    .footer(serenity::CreateEmbedFooter::new(format!(
        "User ID: {}",
        actor_id
    )));
    alerts::notify(ctx, data, guild_id, embed, Some(format!("<@{}>", actor_id))).await;

    // Reset even when the ban failed so the counter cannot wedge at the
    // threshold; the next violation starts a fresh warning cycle.
    data.security
        .strikes()
        .reset(guild_id.get(), actor_id.get())
        .await;
}

/// Handle a live audit-log entry; kicks and bans by lower-ranked users are
/// reversed onto the actor immediately, with no strike accumulation.
pub async fn handle_audit_log_entry(
    ctx: &serenity::Context,
    data: &Data,
    guild_id: serenity::GuildId,
    entry: &AuditLogEntry,
) {
    let verb = match entry.action {
        Action::Member(MemberAction::Kick) => "kick",
        Action::Member(MemberAction::BanAdd) => "ban",
        _ => return,
    };

    if !data
        .security
        .settings()
        .is_enabled(guild_id.get(), Feature::AntiNuke)
        .await
    {
        return;
    }

    let actor_id = entry.user_id;
    if !bot_outranks_actor(ctx, guild_id, actor_id).await {
        return;
    }

    info!(%guild_id, %actor_id, verb, "unauthorized privileged action, punishing actor");
    let outcome = match verb {
        "kick" => {
            guild_id
                .kick_with_reason(&ctx.http, actor_id, "Unauthorized kick attempt")
                .await
        }
        _ => {
            guild_id
                .ban_with_reason(&ctx.http, actor_id, 0, "Unauthorized ban attempt")
                .await
        }
    };
    if let Err(source) = outcome {
        warn!(?source, %guild_id, %actor_id, verb, "punishment for unauthorized action failed");
    }

    let target_label = entry
        .target_id
        .map(|target| format!("<@{}>", target))
        .unwrap_or_else(|| "a member".to_owned());
    let embed = security_alert_embed(
        "Security Action",
        format!(
            "<@{}> ({}) attempted to {} {} and was removed.",
            actor_id, actor_id, verb, target_label
        ),
        ESCALATION_EMBED_COLOR,
    );
    alerts::notify(ctx, data, guild_id, embed, None).await;
}

/// Look up the acting user of the most recent audit entry matching `action`.
pub async fn find_recent_actor(
    ctx: &serenity::Context,
    guild_id: serenity::GuildId,
    action: Action,
) -> Option<serenity::UserId> {
    let logs = match guild_id
        .audit_logs(&ctx.http, Some(action), None, None, Some(1))
        .await
    {
        Ok(logs) => logs,
        Err(source) => {
            debug!(?source, %guild_id, "audit log fetch failed, skipping event");
            return None;
        }
    };

    match logs.entries.first() {
        Some(entry) => Some(entry.user_id),
        None => {
            debug!(%guild_id, "no matching audit entry, skipping event");
            None
        }
    }
}

/// Privilege guard: the bot only acts against users whose top role sits
/// strictly below its own. Attribution or member lookups that fail count
/// as "cannot act".
async fn bot_outranks_actor(
    ctx: &serenity::Context,
    guild_id: serenity::GuildId,
    actor_id: serenity::UserId,
) -> bool {
    let bot_id = ctx.cache.current_user().id;

    let guild = match guild_id.to_partial_guild(&ctx.http).await {
        Ok(guild) => guild,
        Err(source) => {
            debug!(?source, %guild_id, "guild fetch failed during rank check");
            return false;
        }
    };

    if actor_id == guild.owner_id {
        return false;
    }

    let (actor, bot) = match (
        guild_id.member(&ctx.http, actor_id).await,
        guild_id.member(&ctx.http, bot_id).await,
    ) {
        (Ok(actor), Ok(bot)) => (actor, bot),
        _ => {
            debug!(%guild_id, %actor_id, "member fetch failed during rank check");
            return false;
        }
    };

    let actor_top = top_role_position(&actor.roles, &guild.roles);
    let bot_top = top_role_position(&bot.roles, &guild.roles);
    may_act_on(actor_top, bot_top)
}

/// The bot may act only when it strictly outranks the actor; ties protect
/// peers and the bot's own operators.
fn may_act_on(actor_top: u16, bot_top: u16) -> bool {
    bot_top > actor_top
}

fn top_role_position(
    member_roles: &[serenity::RoleId],
    guild_roles: &HashMap<serenity::RoleId, serenity::Role>,
) -> u16 {
    member_roles
        .iter()
        .filter_map(|role_id| guild_roles.get(role_id))
        .map(|role| role.position)
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::{ChannelEvent, may_act_on};

    #[test]
    fn equal_or_higher_rank_is_never_acted_on() {
        assert!(!may_act_on(5, 5));
        assert!(!may_act_on(7, 5));
        assert!(may_act_on(4, 5));
        // Roleless actor vs roleless bot: a tie, so no action.
        assert!(!may_act_on(0, 0));
    }

    #[test]
    fn channel_event_verbs() {
        assert_eq!(ChannelEvent::Create.verb(), "create");
        assert_eq!(ChannelEvent::Delete.verb(), "delete");
    }
}
