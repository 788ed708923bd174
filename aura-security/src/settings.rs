use std::collections::HashMap;

use tokio::sync::RwLock;

/// The protection features that can be toggled per guild.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Feature {
    AntiNuke,
    AntiBotAdd,
    AntiRaid,
}

impl Feature {
    /// User-facing label used in status embeds and alerts.
    pub fn display_name(self) -> &'static str {
        match self {
            Feature::AntiNuke => "AntiNuke",
            Feature::AntiBotAdd => "AntiBotadd",
            Feature::AntiRaid => "AntiRaid",
        }
    }
}

/// Per-guild protection flags. Every guild starts with everything enabled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GuildSettings {
    pub antinuke: bool,
    pub antibotadd: bool,
    pub antiraid: bool,
}

impl Default for GuildSettings {
    fn default() -> Self {
        Self {
            antinuke: true,
            antibotadd: true,
            antiraid: true,
        }
    }
}

impl GuildSettings {
    /// Uniform record with every flag set to `value`.
    pub fn all(value: bool) -> Self {
        Self {
            antinuke: value,
            antibotadd: value,
            antiraid: value,
        }
    }

    pub fn get(&self, feature: Feature) -> bool {
        match feature {
            Feature::AntiNuke => self.antinuke,
            Feature::AntiBotAdd => self.antibotadd,
            Feature::AntiRaid => self.antiraid,
        }
    }

    fn set(&mut self, feature: Feature, value: bool) {
        match feature {
            Feature::AntiNuke => self.antinuke = value,
            Feature::AntiBotAdd => self.antibotadd = value,
            Feature::AntiRaid => self.antiraid = value,
        }
    }
}

/// In-memory per-guild settings. Entries are created lazily on first read
/// and never persisted; a restart returns every guild to the defaults.
#[derive(Debug, Default)]
pub struct SettingsStore {
    entries: RwLock<HashMap<u64, GuildSettings>>,
}

impl SettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a guild's settings. Never fails; unseen guilds read as
    /// all-enabled without inserting an entry.
    pub async fn get(&self, guild_id: u64) -> GuildSettings {
        self.entries
            .read()
            .await
            .get(&guild_id)
            .copied()
            .unwrap_or_default()
    }

    pub async fn is_enabled(&self, guild_id: u64, feature: Feature) -> bool {
        self.get(guild_id).await.get(feature)
    }

    /// Overwrite a single flag, creating the entry from defaults if needed.
    pub async fn set_flag(&self, guild_id: u64, feature: Feature, value: bool) -> GuildSettings {
        let mut entries = self.entries.write().await;
        let settings = entries.entry(guild_id).or_default();
        settings.set(feature, value);
        *settings
    }

    /// Overwrite every flag at once.
    pub async fn set_all(&self, guild_id: u64, value: bool) -> GuildSettings {
        let mut entries = self.entries.write().await;
        let settings = GuildSettings::all(value);
        entries.insert(guild_id, settings);
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::{Feature, GuildSettings, SettingsStore};

    #[tokio::test]
    async fn unseen_guilds_default_to_all_enabled() {
        let store = SettingsStore::new();
        assert_eq!(store.get(1).await, GuildSettings::all(true));
        assert!(store.is_enabled(1, Feature::AntiNuke).await);
        assert!(store.is_enabled(1, Feature::AntiBotAdd).await);
        assert!(store.is_enabled(1, Feature::AntiRaid).await);
    }

    #[tokio::test]
    async fn set_flag_only_touches_that_flag() {
        let store = SettingsStore::new();
        let updated = store.set_flag(1, Feature::AntiRaid, false).await;
        assert_eq!(
            updated,
            GuildSettings {
                antinuke: true,
                antibotadd: true,
                antiraid: false,
            }
        );
        assert_eq!(store.get(1).await, updated);
        // Other guilds are unaffected.
        assert_eq!(store.get(2).await, GuildSettings::all(true));
    }

    #[tokio::test]
    async fn set_all_is_idempotent() {
        let store = SettingsStore::new();
        assert_eq!(store.set_all(1, false).await, GuildSettings::all(false));
        assert_eq!(store.set_all(1, false).await, GuildSettings::all(false));
        assert_eq!(store.get(1).await, GuildSettings::all(false));
    }
}
