use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CooldownKey {
    pub command: &'static str,
    pub guild_id: u64,
    pub user_id: u64,
}

impl CooldownKey {
    pub fn new(command: &'static str, guild_id: u64, user_id: u64) -> Self {
        Self {
            command,
            guild_id,
            user_id,
        }
    }
}

#[derive(Debug, Default)]
pub struct Cooldowns {
    ready_at: HashMap<CooldownKey, Instant>,
}

impl Cooldowns {
    /// Accept and start a new window at `now`, or reject with the remaining wait.
    ///
    /// A rejected hit leaves the running window in place. Accepted hits also
    /// drop every window that has already run out.
    pub fn hit(
        &mut self,
        key: CooldownKey,
        interval: Duration,
        now: Instant,
    ) -> Result<(), Duration> {
        if let Some(ready_at) = self.ready_at.get(&key)
            && now < *ready_at
        {
            return Err(*ready_at - now);
        }

        self.ready_at.retain(|_, ready_at| *ready_at > now);
        self.ready_at.insert(key, now + interval);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.ready_at.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ready_at.is_empty()
    }
}

/// Shared cooldown table handed to commands through the framework data.
#[derive(Clone, Debug, Default)]
pub struct CooldownTracker {
    inner: Arc<Mutex<Cooldowns>>,
}

impl CooldownTracker {
    pub fn hit(&self, key: CooldownKey, interval: Duration) -> Result<(), Duration> {
        self.hit_at(key, interval, Instant::now())
    }

    pub fn hit_at(&self, key: CooldownKey, interval: Duration, now: Instant) -> Result<(), Duration> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .hit(key, interval, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIVE: Duration = Duration::from_secs(5);

    #[test]
    fn first_hit_is_accepted() {
        let mut cooldowns = Cooldowns::default();
        assert!(cooldowns.hit(CooldownKey::new("alt", 1, 2), FIVE, Instant::now()).is_ok());
    }

    #[test]
    fn second_hit_inside_interval_reports_remaining() {
        let mut cooldowns = Cooldowns::default();
        let start = Instant::now();
        let key = CooldownKey::new("alt", 1, 2);

        cooldowns.hit(key.clone(), FIVE, start).unwrap();
        let remaining = cooldowns
            .hit(key, FIVE, start + Duration::from_secs(3))
            .unwrap_err();

        assert_eq!(remaining, Duration::from_secs(2));
    }

    #[test]
    fn rejection_does_not_extend_window() {
        let mut cooldowns = Cooldowns::default();
        let start = Instant::now();
        let key = CooldownKey::new("alt", 1, 2);

        cooldowns.hit(key.clone(), FIVE, start).unwrap();
        assert!(cooldowns.hit(key.clone(), FIVE, start + Duration::from_secs(4)).is_err());
        assert!(cooldowns.hit(key, FIVE, start + FIVE).is_ok());
    }

    #[test]
    fn keys_are_independent() {
        let mut cooldowns = Cooldowns::default();
        let now = Instant::now();

        cooldowns.hit(CooldownKey::new("alt", 1, 2), FIVE, now).unwrap();
        assert!(cooldowns.hit(CooldownKey::new("alt", 1, 3), FIVE, now).is_ok());
        assert!(cooldowns.hit(CooldownKey::new("alt", 9, 2), FIVE, now).is_ok());
        assert!(cooldowns.hit(CooldownKey::new("other", 1, 2), FIVE, now).is_ok());
    }

    #[test]
    fn tracker_is_shared_between_clones() {
        let tracker = CooldownTracker::default();
        let copy = tracker.clone();
        let now = Instant::now();

        tracker.hit_at(CooldownKey::new("alt", 1, 2), FIVE, now).unwrap();
        assert!(copy.hit_at(CooldownKey::new("alt", 1, 2), FIVE, now).is_err());
    }

    #[test]
    fn expired_windows_are_pruned() {
        let mut cooldowns = Cooldowns::default();
        let start = Instant::now();

        for user_id in 0..50 {
            cooldowns.hit(CooldownKey::new("alt", 1, user_id), FIVE, start).unwrap();
        }
        assert_eq!(cooldowns.len(), 50);

        cooldowns
            .hit(CooldownKey::new("alt", 1, 999), FIVE, start + FIVE)
            .unwrap();
        assert_eq!(cooldowns.len(), 1);
    }

    #[test]
    fn longer_windows_survive_pruning() {
        let mut cooldowns = Cooldowns::default();
        let start = Instant::now();
        let slow = CooldownKey::new("slow", 1, 2);

        cooldowns.hit(slow.clone(), Duration::from_secs(60), start).unwrap();
        cooldowns
            .hit(CooldownKey::new("alt", 1, 3), FIVE, start + Duration::from_secs(10))
            .unwrap();

        assert_eq!(cooldowns.len(), 2);
        assert!(cooldowns.hit(slow, Duration::from_secs(60), start + Duration::from_secs(30)).is_err());
    }
}
