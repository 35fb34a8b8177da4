use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use slice_alt::AltService;
use slice_store::{CooldownTracker, RegistryStore, SnipeCache};

pub type Error = anyhow::Error;

pub const DEFAULT_ALT_COOLDOWN: Duration = Duration::from_secs(5);

/// Runtime switches read from the environment at startup.
#[derive(Clone, Debug)]
pub struct Settings {
    pub alt_enabled: bool,
    pub alt_cooldown: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            alt_enabled: false,
            alt_cooldown: DEFAULT_ALT_COOLDOWN,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Data {
    pub registry: RegistryStore,
    pub snipes: SnipeCache,
    pub cooldowns: CooldownTracker,
    pub settings: Settings,
    pub alt: Option<AltService>,
    pub blacklist: Arc<RwLock<HashSet<u64>>>,
    pub prefix: Arc<RwLock<String>>,
    pub started_at: Instant,
    cases: Arc<AtomicU64>,
}

impl Data {
    pub fn new(
        registry: RegistryStore,
        settings: Settings,
        alt: Option<AltService>,
        blacklist: HashSet<u64>,
        prefix: String,
    ) -> Self {
        Self {
            registry,
            snipes: SnipeCache::default(),
            cooldowns: CooldownTracker::default(),
            settings,
            alt,
            blacklist: Arc::new(RwLock::new(blacklist)),
            prefix: Arc::new(RwLock::new(prefix)),
            started_at: Instant::now(),
            cases: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Process-local moderation case number, starting at 1.
    pub fn next_case(&self) -> u64 {
        self.cases.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub async fn is_blacklisted(&self, guild_id: u64) -> bool {
        self.blacklist.read().await.contains(&guild_id)
    }

    pub async fn replace_blacklist(&self, ids: HashSet<u64>) -> usize {
        let mut blacklist = self.blacklist.write().await;
        *blacklist = ids;
        blacklist.len()
    }

    pub async fn current_prefix(&self) -> String {
        self.prefix.read().await.clone()
    }

    pub async fn set_prefix(&self, prefix: String) {
        *self.prefix.write().await = prefix;
    }
}

pub type Context<'a> = poise::Context<'a, Data, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    fn data() -> Data {
        Data::new(
            RegistryStore::memory("test"),
            Settings::default(),
            None,
            HashSet::from([99]),
            "!".to_owned(),
        )
    }

    #[test]
    fn case_numbers_increase_across_clones() {
        let data = data();
        let copy = data.clone();

        assert_eq!(data.next_case(), 1);
        assert_eq!(copy.next_case(), 2);
        assert_eq!(data.next_case(), 3);
    }

    #[tokio::test]
    async fn blacklist_can_be_reloaded() {
        let data = data();
        assert!(data.is_blacklisted(99).await);

        assert_eq!(data.replace_blacklist(HashSet::from([1, 2])).await, 2);
        assert!(!data.is_blacklisted(99).await);
        assert!(data.is_blacklisted(2).await);
    }

    #[tokio::test]
    async fn prefix_is_shared() {
        let data = data();
        let copy = data.clone();

        copy.set_prefix("?".to_owned()).await;
        assert_eq!(data.current_prefix().await, "?");
    }
}
