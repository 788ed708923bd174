use std::collections::{HashMap, VecDeque};
use std::time::{Duration, SystemTime};

use tokio::sync::Mutex;

/// Joins within the window that trip the raid response.
pub const RAID_THRESHOLD: usize = 5;

/// Trailing window inspected for burst joins.
pub const RAID_INTERVAL: Duration = Duration::from_secs(10);

/// Per-guild sliding window of recent non-bot join timestamps.
///
/// The caller compares the returned window length against
/// [`RAID_THRESHOLD`]; the detector only maintains the window.
#[derive(Debug, Default)]
pub struct RaidWindow {
    joins: Mutex<HashMap<u64, VecDeque<SystemTime>>>,
}

impl RaidWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a join at `at` and return the resulting window length.
    ///
    /// Entries older than [`RAID_INTERVAL`] relative to `at` are pruned
    /// first. Prune, append, and length all happen under one lock so two
    /// near-simultaneous joins cannot undercount each other.
    pub async fn record_join(&self, guild_id: u64, at: SystemTime) -> usize {
        let mut joins = self.joins.lock().await;
        let window = joins.entry(guild_id).or_default();

        window.retain(|joined| age_of(*joined, at) < RAID_INTERVAL);
        window.push_back(at);
        window.len()
    }

    /// Drop the whole window. Called after a raid trigger fires.
    pub async fn clear(&self, guild_id: u64) {
        self.joins.lock().await.remove(&guild_id);
    }
}

/// Age of `joined` as seen from `now`; timestamps in the future count as
/// age zero rather than erroring on clock skew.
fn age_of(joined: SystemTime, now: SystemTime) -> Duration {
    now.duration_since(joined).unwrap_or(Duration::ZERO)
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, SystemTime};

    use super::{RAID_THRESHOLD, RaidWindow};

    fn at(base: SystemTime, secs: u64) -> SystemTime {
        base + Duration::from_secs(secs)
    }

    #[tokio::test]
    async fn burst_joins_fill_the_window() {
        let window = RaidWindow::new();
        let base = SystemTime::UNIX_EPOCH;

        let mut len = 0;
        for t in [0, 2, 4, 6, 8] {
            len = window.record_join(1, at(base, t)).await;
        }
        assert_eq!(len, 5);
        assert!(len >= RAID_THRESHOLD);
    }

    #[tokio::test]
    async fn old_joins_are_pruned_on_record() {
        let window = RaidWindow::new();
        let base = SystemTime::UNIX_EPOCH;

        window.record_join(1, at(base, 0)).await;
        window.record_join(1, at(base, 2)).await;
        // 12s later the first two have aged out.
        assert_eq!(window.record_join(1, at(base, 14)).await, 1);
    }

    #[tokio::test]
    async fn clear_empties_the_window() {
        let window = RaidWindow::new();
        let base = SystemTime::UNIX_EPOCH;

        for t in [0, 2, 4, 6, 8] {
            window.record_join(1, at(base, t)).await;
        }
        window.clear(1).await;
        assert_eq!(window.record_join(1, at(base, 11)).await, 1);
    }

    #[tokio::test]
    async fn guild_windows_are_independent() {
        let window = RaidWindow::new();
        let base = SystemTime::UNIX_EPOCH;

        window.record_join(1, at(base, 0)).await;
        window.record_join(1, at(base, 1)).await;
        assert_eq!(window.record_join(2, at(base, 1)).await, 1);
    }
}
