use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tokio::sync::RwLock;
use tracing::{error, warn};

/// Guild → log-channel mapping backed by a small JSON file.
///
/// The file is read once at startup and rewritten on every update. Writes
/// are best-effort: a failed save is logged and the in-memory mapping keeps
/// serving lookups for the life of the process.
#[derive(Debug)]
pub struct LogChannelStore {
    path: PathBuf,
    entries: RwLock<HashMap<u64, u64>>,
}

impl LogChannelStore {
    /// Load the mapping from `path`. A missing or unreadable file starts
    /// the store empty rather than failing startup.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match load_file(&path) {
            Ok(entries) => entries,
            Err(source) => {
                warn!(?source, path = %path.display(), "could not read log channel mapping; starting empty");
                HashMap::new()
            }
        };

        Self {
            path,
            entries: RwLock::new(entries),
        }
    }

    pub async fn get(&self, guild_id: u64) -> Option<u64> {
        self.entries.read().await.get(&guild_id).copied()
    }

    /// Record a mapping and rewrite the backing file.
    pub async fn set(&self, guild_id: u64, channel_id: u64) {
        let mut entries = self.entries.write().await;
        entries.insert(guild_id, channel_id);

        if let Err(source) = save_file(&self.path, &entries) {
            error!(?source, path = %self.path.display(), "failed to persist log channel mapping");
        }
    }
}

fn load_file(path: &Path) -> anyhow::Result<HashMap<u64, u64>> {
    if !path.exists() {
        return Ok(HashMap::new());
    }

    let raw = std::fs::read_to_string(path)?;
    let parsed: HashMap<String, u64> = serde_json::from_str(&raw)?;

    // Keys are stringified guild ids; skip anything unparseable instead of
    // refusing the whole file.
    Ok(parsed
        .into_iter()
        .filter_map(|(guild, channel)| guild.parse::<u64>().ok().map(|g| (g, channel)))
        .collect())
}

fn save_file(path: &Path, entries: &HashMap<u64, u64>) -> anyhow::Result<()> {
    let stringified: HashMap<String, u64> = entries
        .iter()
        .map(|(guild, channel)| (guild.to_string(), *channel))
        .collect();

    std::fs::write(path, serde_json::to_string(&stringified)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::LogChannelStore;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("aura-log-channels-{}-{}.json", name, std::process::id()))
    }

    #[tokio::test]
    async fn missing_file_starts_empty() {
        let path = temp_path("missing");
        let store = LogChannelStore::load(&path);
        assert_eq!(store.get(1).await, None);
    }

    #[tokio::test]
    async fn set_persists_and_reloads() {
        let path = temp_path("roundtrip");
        let store = LogChannelStore::load(&path);
        store.set(1, 100).await;
        store.set(2, 200).await;

        let reloaded = LogChannelStore::load(&path);
        assert_eq!(reloaded.get(1).await, Some(100));
        assert_eq!(reloaded.get(2).await, Some(200));
        assert_eq!(reloaded.get(3).await, None);

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn malformed_file_is_tolerated() {
        let path = temp_path("malformed");
        std::fs::write(&path, "not json").unwrap();

        let store = LogChannelStore::load(&path);
        assert_eq!(store.get(1).await, None);

        let _ = std::fs::remove_file(&path);
    }
}
