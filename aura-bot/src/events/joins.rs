//! Member-join checks: anti-bot-add and the raid window.

use std::time::{SystemTime, UNIX_EPOCH};

use poise::serenity_prelude as serenity;
use tracing::{info, warn};

use aura_core::Data;
use aura_security::{Feature, RAID_INTERVAL, RAID_THRESHOLD};
use aura_utils::embed::{ESCALATION_EMBED_COLOR, security_alert_embed};

use crate::events::alerts;

/// Largest member page the REST listing endpoint serves.
const MEMBER_PAGE_SIZE: u64 = 1000;

/// Handle a member joining a guild.
///
/// Bot accounts are banned on sight when anti-bot-add is on (and the join
/// never reaches the raid window); human joins feed the raid window, and a
/// full window triggers the mass-ban response.
pub async fn handle_member_join(ctx: &serenity::Context, data: &Data, member: &serenity::Member) {
    let guild_id = member.guild_id;
    let settings = data.security.settings().get(guild_id.get()).await;
    let bot_id = ctx.cache.current_user().id;

    if settings.get(Feature::AntiBotAdd) && member.user.bot && member.user.id != bot_id {
        if let Err(source) = guild_id
            .ban_with_reason(
                &ctx.http,
                member.user.id,
                0,
                "Bot add is disabled by SecureAura.",
            )
            .await
        {
            warn!(?source, %guild_id, bot_user_id = %member.user.id, "failed to ban added bot");
        }

        let embed = security_alert_embed(
            "Anti-Botadd Triggered",
            format!(
                "Banned bot <@{}> ({}) as antibotadd is enabled.",
                member.user.id, member.user.id
            ),
            ESCALATION_EMBED_COLOR,
        );
        alerts::notify(ctx, data, guild_id, embed, None).await;
        return;
    }

    if !settings.get(Feature::AntiRaid) || member.user.bot {
        return;
    }

    let now = SystemTime::now();
    let window_len = data.security.raid().record_join(guild_id.get(), now).await;
    if window_len < RAID_THRESHOLD {
        return;
    }

    info!(%guild_id, window_len, "raid threshold reached, starting mass remediation");
    let banned = mass_ban_recent_joins(ctx, guild_id, now).await;

    let embed = security_alert_embed(
        "Anti-Raid Triggered",
        format!("Banned {} members for suspected raid join.", banned),
        ESCALATION_EMBED_COLOR,
    );
    alerts::notify(ctx, data, guild_id, embed, None).await;
    data.security.raid().clear(guild_id.get()).await;
}

/// Ban every non-bot member that joined within the trailing raid interval.
/// Individual ban failures do not abort the batch; returns the number of
/// members targeted.
async fn mass_ban_recent_joins(
    ctx: &serenity::Context,
    guild_id: serenity::GuildId,
    now: SystemTime,
) -> usize {
    let now_unix = now
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs()) as i64;

    let to_ban = match recent_joins_from_cache(ctx, guild_id, now_unix) {
        Some(targets) => targets,
        None => recent_joins_from_rest(ctx, guild_id, now_unix).await,
    };

    let banned = to_ban.len();
    for user_id in to_ban {
        if let Err(source) = guild_id
            .ban_with_reason(
                &ctx.http,
                user_id,
                0,
                "Anti-raid triggered: suspected raid join.",
            )
            .await
        {
            warn!(?source, %guild_id, %user_id, "raid ban failed for member");
        }
    }

    banned
}

/// Scan the gateway member cache, which holds the whole guild when the
/// members intent is on. Returns `None` when the guild is not cached.
fn recent_joins_from_cache(
    ctx: &serenity::Context,
    guild_id: serenity::GuildId,
    now_unix: i64,
) -> Option<Vec<serenity::UserId>> {
    let guild = ctx.cache.guild(guild_id)?;
    Some(
        guild
            .members
            .values()
            .filter(|member| {
                is_raid_target(
                    member.user.bot,
                    member.joined_at.map(|joined| joined.unix_timestamp()),
                    now_unix,
                )
            })
            .map(|member| member.user.id)
            .collect(),
    )
}

/// Walk every REST member page. A single page is capped at
/// [`MEMBER_PAGE_SIZE`] and sorted by ascending user id, so the newest
/// accounts only appear on the later pages.
async fn recent_joins_from_rest(
    ctx: &serenity::Context,
    guild_id: serenity::GuildId,
    now_unix: i64,
) -> Vec<serenity::UserId> {
    let mut targets = Vec::new();
    let mut after: Option<serenity::UserId> = None;

    loop {
        let page = match guild_id
            .members(&ctx.http, Some(MEMBER_PAGE_SIZE), after)
            .await
        {
            Ok(page) => page,
            Err(source) => {
                warn!(?source, %guild_id, "member page fetch failed, raid response may be partial");
                return targets;
            }
        };

        after = page.last().map(|member| member.user.id);
        targets.extend(
            page.iter()
                .filter(|member| {
                    is_raid_target(
                        member.user.bot,
                        member.joined_at.map(|joined| joined.unix_timestamp()),
                        now_unix,
                    )
                })
                .map(|member| member.user.id),
        );

        if !more_pages(page.len()) {
            return targets;
        }
    }
}

/// A raid target is a human member that joined strictly inside the
/// trailing interval; joins stamped slightly ahead of our clock count too.
fn is_raid_target(is_bot: bool, joined_unix: Option<i64>, now_unix: i64) -> bool {
    !is_bot
        && joined_unix.is_some_and(|joined| now_unix - joined < RAID_INTERVAL.as_secs() as i64)
}

/// A full page means the listing is not exhausted yet.
fn more_pages(page_len: usize) -> bool {
    page_len as u64 == MEMBER_PAGE_SIZE
}

#[cfg(test)]
mod tests {
    use super::{is_raid_target, more_pages};

    #[test]
    fn raid_targets_are_recent_human_joins() {
        assert!(is_raid_target(false, Some(95), 100));
        assert!(is_raid_target(false, Some(91), 100));
        assert!(!is_raid_target(false, Some(90), 100));
        assert!(!is_raid_target(false, Some(80), 100));
        // Bots are the anti-bot-add check's problem, not the raid sweep's.
        assert!(!is_raid_target(true, Some(95), 100));
        // Unknown join time never qualifies.
        assert!(!is_raid_target(false, None, 100));
        // Joins stamped slightly ahead of our clock still count.
        assert!(is_raid_target(false, Some(101), 100));
    }

    #[test]
    fn full_pages_mean_more_members_remain() {
        assert!(more_pages(1000));
        assert!(!more_pages(999));
        assert!(!more_pages(0));
    }
}
