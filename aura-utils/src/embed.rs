use poise::serenity_prelude as serenity;

use crate::SUPPORT_SERVER_URL;

/// Color for informational/status embeds.
pub const STATUS_EMBED_COLOR: u32 = 0x34_98_DB;

/// Color for warning alerts (strikes below the ban threshold).
pub const WARNING_EMBED_COLOR: u32 = 0xE6_7E_22;

/// Color for escalated alerts (bans, raid response).
pub const ESCALATION_EMBED_COLOR: u32 = 0xE7_4C_3C;

/// Checkbox-style marker for a feature flag state.
pub fn status_emoji(enabled: bool) -> &'static str {
    if enabled { "☑️" } else { "❎" }
}

/// Base security alert embed; callers append fields/footers as needed.
pub fn security_alert_embed(title: &str, description: impl Into<String>, color: u32) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(title.to_owned())
        .color(color)
        .description(description)
}

/// Action row with the support-server link button attached to status and
/// welcome embeds.
pub fn support_link_row() -> serenity::CreateActionRow {
    serenity::CreateActionRow::Buttons(vec![
        serenity::CreateButton::new_link(SUPPORT_SERVER_URL).label("Support Server"),
    ])
}

#[cfg(test)]
mod tests {
    use super::status_emoji;

    #[test]
    fn status_emoji_matches_flag_state() {
        assert_eq!(status_emoji(true), "☑️");
        assert_eq!(status_emoji(false), "❎");
    }
}
