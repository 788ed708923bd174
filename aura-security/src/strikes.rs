use std::collections::HashMap;

use tokio::sync::Mutex;

/// Number of recorded violations at which the enforcer bans and resets.
pub const STRIKE_THRESHOLD: u32 = 3;

/// Per-(guild, user) counters for suspicious privileged actions.
///
/// The tracker only counts; the escalation decision (warn vs. ban) belongs
/// to the event enforcer. Counts are in-memory only and vanish on restart.
#[derive(Debug, Default)]
pub struct StrikeTracker {
    counts: Mutex<HashMap<(u64, u64), u32>>,
}

impl StrikeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one violation and return the post-increment count.
    ///
    /// Increment and read happen under one lock so two concurrent
    /// violations can never observe the same count; the threshold is
    /// crossed by exactly one caller.
    pub async fn record_violation(&self, guild_id: u64, user_id: u64) -> u32 {
        let mut counts = self.counts.lock().await;
        let count = counts.entry((guild_id, user_id)).or_insert(0);
        *count += 1;
        *count
    }

    /// Zero the entry. Called after the threshold trips, whether or not
    /// the ban that followed succeeded.
    pub async fn reset(&self, guild_id: u64, user_id: u64) {
        self.counts.lock().await.remove(&(guild_id, user_id));
    }
}

#[cfg(test)]
mod tests {
    use super::{STRIKE_THRESHOLD, StrikeTracker};

    #[tokio::test]
    async fn counts_increment_per_guild_user_pair() {
        let tracker = StrikeTracker::new();
        assert_eq!(tracker.record_violation(1, 10).await, 1);
        assert_eq!(tracker.record_violation(1, 10).await, 2);
        // Different user and different guild count independently.
        assert_eq!(tracker.record_violation(1, 11).await, 1);
        assert_eq!(tracker.record_violation(2, 10).await, 1);
    }

    #[tokio::test]
    async fn third_strike_hits_threshold_and_reset_restarts_the_cycle() {
        let tracker = StrikeTracker::new();
        tracker.record_violation(1, 10).await;
        tracker.record_violation(1, 10).await;
        let third = tracker.record_violation(1, 10).await;
        assert_eq!(third, STRIKE_THRESHOLD);

        tracker.reset(1, 10).await;
        assert_eq!(tracker.record_violation(1, 10).await, 1);
    }

    #[tokio::test]
    async fn concurrent_violations_never_share_a_count() {
        let tracker = std::sync::Arc::new(StrikeTracker::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let tracker = tracker.clone();
            handles.push(tokio::spawn(
                async move { tracker.record_violation(1, 10).await },
            ));
        }

        let mut seen = Vec::new();
        for handle in handles {
            seen.push(handle.await.unwrap());
        }
        seen.sort_unstable();
        assert_eq!(seen, (1..=8).collect::<Vec<_>>());
    }
}
