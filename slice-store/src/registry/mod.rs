mod memory_store;
mod redis_store;

use std::fmt;

use tracing::debug;

use memory_store::MemoryRegistryStore;
use redis_store::RedisRegistryStore;

/// Which guild-scoped id set an operation targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RegistryKind {
    /// Users allowed to run `alt` without Manage Server.
    AltUsers,
    /// Roles whose members may run `alt` without Manage Server.
    AltRoles,
    /// Roles granted moderator permissions on the bot.
    ModRoles,
}

impl RegistryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AltUsers => "alt_users",
            Self::AltRoles => "alt_roles",
            Self::ModRoles => "mod_roles",
        }
    }
}

impl fmt::Display for RegistryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug)]
enum RegistryBackend {
    Memory(MemoryRegistryStore),
    Redis(RedisRegistryStore),
}

/// Guild-scoped whitelist sets.
///
/// The backend is picked once at startup and every whitelist goes through
/// this handle.
#[derive(Clone, Debug)]
pub struct RegistryStore {
    key_prefix: String,
    backend: RegistryBackend,
}

impl RegistryStore {
    pub fn memory(prefix: impl Into<String>) -> Self {
        Self {
            key_prefix: prefix.into(),
            backend: RegistryBackend::Memory(MemoryRegistryStore::default()),
        }
    }

    pub fn redis(redis_url: &str, prefix: impl Into<String>) -> anyhow::Result<Self> {
        Ok(Self {
            key_prefix: prefix.into(),
            backend: RegistryBackend::Redis(RedisRegistryStore::from_url(redis_url)?),
        })
    }

    pub fn is_persistent(&self) -> bool {
        matches!(self.backend, RegistryBackend::Redis(_))
    }

    pub fn backend_name(&self) -> &'static str {
        match self.backend {
            RegistryBackend::Memory(_) => "memory",
            RegistryBackend::Redis(_) => "redis",
        }
    }

    pub fn key(&self, kind: RegistryKind, guild_id: u64) -> String {
        format!("{}:registry:{}:{}", self.key_prefix, kind, guild_id)
    }

    /// Insert `id`; returns `true` when it was not present before.
    pub async fn add(&self, kind: RegistryKind, guild_id: u64, id: u64) -> anyhow::Result<bool> {
        let added = match &self.backend {
            RegistryBackend::Memory(store) => store.add(kind, guild_id, id).await,
            RegistryBackend::Redis(store) => store.add(&self.key(kind, guild_id), id).await?,
        };

        debug!(%kind, guild_id, id, added, "registry add");
        Ok(added)
    }

    /// Remove `id`; returns `false` when it was absent.
    pub async fn remove(
        &self,
        kind: RegistryKind,
        guild_id: u64,
        id: u64,
    ) -> anyhow::Result<bool> {
        let removed = match &self.backend {
            RegistryBackend::Memory(store) => store.remove(kind, guild_id, id).await,
            RegistryBackend::Redis(store) => store.remove(&self.key(kind, guild_id), id).await?,
        };

        debug!(%kind, guild_id, id, removed, "registry remove");
        Ok(removed)
    }

    pub async fn contains(
        &self,
        kind: RegistryKind,
        guild_id: u64,
        id: u64,
    ) -> anyhow::Result<bool> {
        match &self.backend {
            RegistryBackend::Memory(store) => Ok(store.contains(kind, guild_id, id).await),
            RegistryBackend::Redis(store) => store.contains(&self.key(kind, guild_id), id).await,
        }
    }

    /// Current members of the set, ascending.
    pub async fn list(&self, kind: RegistryKind, guild_id: u64) -> anyhow::Result<Vec<u64>> {
        let mut ids = match &self.backend {
            RegistryBackend::Memory(store) => store.members(kind, guild_id).await,
            RegistryBackend::Redis(store) => store.members(&self.key(kind, guild_id)).await?,
        };

        ids.sort_unstable();
        Ok(ids)
    }

    /// Whether any of `ids` is in the set, e.g. a member's roles.
    pub async fn contains_any(
        &self,
        kind: RegistryKind,
        guild_id: u64,
        ids: &[u64],
    ) -> anyhow::Result<bool> {
        if ids.is_empty() {
            return Ok(false);
        }

        let members = self.list(kind, guild_id).await?;
        Ok(ids.iter().any(|id| members.binary_search(id).is_ok()))
    }

    pub async fn ping(&self) -> anyhow::Result<()> {
        match &self.backend {
            RegistryBackend::Memory(_) => Ok(()),
            RegistryBackend::Redis(store) => store.ping().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn add_then_contains() {
        let store = RegistryStore::memory("test");

        assert!(store.add(RegistryKind::AltUsers, 1, 42).await.unwrap());
        assert!(store.contains(RegistryKind::AltUsers, 1, 42).await.unwrap());
        assert!(!store.add(RegistryKind::AltUsers, 1, 42).await.unwrap());
    }

    #[tokio::test]
    async fn remove_then_absent() {
        let store = RegistryStore::memory("test");
        store.add(RegistryKind::ModRoles, 1, 7).await.unwrap();

        assert!(store.remove(RegistryKind::ModRoles, 1, 7).await.unwrap());
        assert!(!store.contains(RegistryKind::ModRoles, 1, 7).await.unwrap());
        assert!(!store.remove(RegistryKind::ModRoles, 1, 7).await.unwrap());
    }

    #[tokio::test]
    async fn remove_absent_returns_false() {
        let store = RegistryStore::memory("test");
        assert!(!store.remove(RegistryKind::AltRoles, 9, 1).await.unwrap());
    }

    #[tokio::test]
    async fn list_is_sorted_and_exact() {
        let store = RegistryStore::memory("test");
        for id in [30, 10, 20, 10] {
            store.add(RegistryKind::AltUsers, 5, id).await.unwrap();
        }
        store.remove(RegistryKind::AltUsers, 5, 20).await.unwrap();

        assert_eq!(
            store.list(RegistryKind::AltUsers, 5).await.unwrap(),
            vec![10, 30]
        );
    }

    #[tokio::test]
    async fn guilds_and_kinds_are_isolated() {
        let store = RegistryStore::memory("test");
        store.add(RegistryKind::AltUsers, 1, 100).await.unwrap();

        assert!(!store.contains(RegistryKind::AltUsers, 2, 100).await.unwrap());
        assert!(!store.contains(RegistryKind::AltRoles, 1, 100).await.unwrap());
        assert!(store.list(RegistryKind::ModRoles, 1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn contains_any_matches_roles() {
        let store = RegistryStore::memory("test");
        store.add(RegistryKind::AltRoles, 1, 55).await.unwrap();

        assert!(store.contains_any(RegistryKind::AltRoles, 1, &[3, 55]).await.unwrap());
        assert!(!store.contains_any(RegistryKind::AltRoles, 1, &[3, 4]).await.unwrap());
        assert!(!store.contains_any(RegistryKind::AltRoles, 1, &[]).await.unwrap());
    }

    #[test]
    fn keys_are_namespaced() {
        let store = RegistryStore::memory("slice:test");
        assert_eq!(
            store.key(RegistryKind::ModRoles, 12),
            "slice:test:registry:mod_roles:12"
        );
        assert_eq!(store.backend_name(), "memory");
        assert!(!store.is_persistent());
    }
}
