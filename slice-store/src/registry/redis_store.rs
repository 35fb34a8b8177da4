use deadpool_redis::{Config, Connection, Pool, Runtime};
use redis::AsyncCommands;

#[derive(Clone)]
pub struct RedisRegistryStore {
    pool: Pool,
}

impl std::fmt::Debug for RedisRegistryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisRegistryStore").finish_non_exhaustive()
    }
}

impl RedisRegistryStore {
    pub fn from_url(redis_url: &str) -> anyhow::Result<Self> {
        let config = Config::from_url(redis_url);
        let pool = config
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| anyhow::anyhow!("failed to create redis pool: {e}"))?;

        Ok(Self { pool })
    }

    async fn connection(&self) -> anyhow::Result<Connection> {
        self.pool
            .get()
            .await
            .map_err(|e| anyhow::anyhow!("failed to get redis connection: {e}"))
    }

    pub async fn add(&self, key: &str, id: u64) -> anyhow::Result<bool> {
        let mut conn = self.connection().await?;
        let added = conn
            .sadd::<_, _, u64>(key, id)
            .await
            .map_err(|e| anyhow::anyhow!("redis SADD failed for key `{key}`: {e}"))?;

        Ok(added > 0)
    }

    pub async fn remove(&self, key: &str, id: u64) -> anyhow::Result<bool> {
        let mut conn = self.connection().await?;
        let removed = conn
            .srem::<_, _, u64>(key, id)
            .await
            .map_err(|e| anyhow::anyhow!("redis SREM failed for key `{key}`: {e}"))?;

        Ok(removed > 0)
    }

    pub async fn contains(&self, key: &str, id: u64) -> anyhow::Result<bool> {
        let mut conn = self.connection().await?;
        conn.sismember::<_, _, bool>(key, id)
            .await
            .map_err(|e| anyhow::anyhow!("redis SISMEMBER failed for key `{key}`: {e}"))
    }

    pub async fn members(&self, key: &str) -> anyhow::Result<Vec<u64>> {
        let mut conn = self.connection().await?;
        conn.smembers::<_, Vec<u64>>(key)
            .await
            .map_err(|e| anyhow::anyhow!("redis SMEMBERS failed for key `{key}`: {e}"))
    }

    pub async fn ping(&self) -> anyhow::Result<()> {
        let mut conn = self.connection().await?;
        redis::cmd("PING")
            .query_async::<String>(&mut conn)
            .await
            .map_err(|e| anyhow::anyhow!("redis PING failed: {e}"))?;

        Ok(())
    }
}
