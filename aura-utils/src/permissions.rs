use poise::serenity_prelude as serenity;

/// Whether a member may manage security settings.
///
/// The guild owner always qualifies; everyone else must hold
/// `ADMINISTRATOR` through one of their roles (including `@everyone`).
pub async fn is_administrator(
    http: &serenity::Http,
    guild_id: serenity::GuildId,
    user_id: serenity::UserId,
) -> anyhow::Result<bool> {
    let guild = guild_id.to_partial_guild(http).await?;
    if guild.owner_id == user_id {
        return Ok(true);
    }

    let member = guild_id.member(http, user_id).await?;
    let everyone_role_id = serenity::RoleId::new(guild_id.get());

    let member_role_perms = guild
        .roles
        .values()
        .filter(|role| role.id == everyone_role_id || member.roles.contains(&role.id))
        .map(|role| role.permissions);

    Ok(any_role_grants_admin(member_role_perms))
}

fn any_role_grants_admin(
    role_perms: impl IntoIterator<Item = serenity::Permissions>,
) -> bool {
    role_perms
        .into_iter()
        .any(|perms| perms.contains(serenity::Permissions::ADMINISTRATOR))
}

#[cfg(test)]
mod tests {
    use poise::serenity_prelude::Permissions;

    use super::any_role_grants_admin;

    #[test]
    fn only_the_administrator_flag_qualifies() {
        assert!(any_role_grants_admin([Permissions::ADMINISTRATOR]));
        assert!(any_role_grants_admin([
            Permissions::BAN_MEMBERS,
            Permissions::ADMINISTRATOR | Permissions::KICK_MEMBERS,
        ]));
        // Strong moderation permissions are not administration.
        assert!(!any_role_grants_admin([
            Permissions::BAN_MEMBERS | Permissions::MANAGE_GUILD | Permissions::MANAGE_CHANNELS,
        ]));
        assert!(!any_role_grants_admin([]));
    }
}
