use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::RwLock;

use super::RegistryKind;

type Sets = HashMap<(RegistryKind, u64), HashSet<u64>>;

#[derive(Clone, Debug, Default)]
pub struct MemoryRegistryStore {
    sets: Arc<RwLock<Sets>>,
}

impl MemoryRegistryStore {
    pub async fn add(&self, kind: RegistryKind, guild_id: u64, id: u64) -> bool {
        let mut sets = self.sets.write().await;
        sets.entry((kind, guild_id)).or_default().insert(id)
    }

    pub async fn remove(&self, kind: RegistryKind, guild_id: u64, id: u64) -> bool {
        let mut sets = self.sets.write().await;
        let Some(set) = sets.get_mut(&(kind, guild_id)) else {
            return false;
        };

        let removed = set.remove(&id);
        if set.is_empty() {
            sets.remove(&(kind, guild_id));
        }
        removed
    }

    pub async fn contains(&self, kind: RegistryKind, guild_id: u64, id: u64) -> bool {
        self.sets
            .read()
            .await
            .get(&(kind, guild_id))
            .is_some_and(|set| set.contains(&id))
    }

    pub async fn members(&self, kind: RegistryKind, guild_id: u64) -> Vec<u64> {
        self.sets
            .read()
            .await
            .get(&(kind, guild_id))
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }
}
