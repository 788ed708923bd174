/// Generic embed builders shared across commands and event handlers.
pub mod embed;
/// Permission helper utilities.
pub mod permissions;

/// Invite link shown on status and welcome embeds.
pub const SUPPORT_SERVER_URL: &str = "https://discord.gg/ERYMCnhWjG";
