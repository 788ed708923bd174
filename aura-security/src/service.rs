use std::path::PathBuf;
use std::sync::Arc;

use crate::log_channels::LogChannelStore;
use crate::raid::RaidWindow;
use crate::settings::SettingsStore;
use crate::strikes::StrikeTracker;

/// Shared handle over all per-guild security state, constructed once per
/// process and cloned into every event handler and command.
#[derive(Clone, Debug)]
pub struct SecurityService {
    settings: Arc<SettingsStore>,
    strikes: Arc<StrikeTracker>,
    raid: Arc<RaidWindow>,
    log_channels: Arc<LogChannelStore>,
}

impl SecurityService {
    /// Build the service, loading the log-channel mapping from
    /// `log_channels_path`.
    pub fn new(log_channels_path: impl Into<PathBuf>) -> Self {
        Self {
            settings: Arc::new(SettingsStore::new()),
            strikes: Arc::new(StrikeTracker::new()),
            raid: Arc::new(RaidWindow::new()),
            log_channels: Arc::new(LogChannelStore::load(log_channels_path)),
        }
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn strikes(&self) -> &StrikeTracker {
        &self.strikes
    }

    pub fn raid(&self) -> &RaidWindow {
        &self.raid
    }

    pub fn log_channels(&self) -> &LogChannelStore {
        &self.log_channels
    }
}
