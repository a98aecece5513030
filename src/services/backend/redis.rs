use std::time::Duration;

use redis::AsyncCommands;
use redis::aio::ConnectionManager;

use super::{BackendError, CacheBackend};

/// 基于 Redis 的共享缓存后端
///
/// 连接管理器自带断线重连，键过期由服务端 TTL 负责。
#[derive(Clone)]
pub struct RedisBackend {
    connection: ConnectionManager,
}

impl std::fmt::Debug for RedisBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisBackend").finish_non_exhaustive()
    }
}

impl RedisBackend {
    /// 连接 Redis 并建立连接管理器
    pub async fn connect(url: &str) -> Result<Self, BackendError> {
        let client = redis::Client::open(url)?;
        let connection = client.get_connection_manager().await?;

        tracing::info!(url = %url, "Connected to Redis backend");

        Ok(Self { connection })
    }
}

#[async_trait::async_trait]
impl CacheBackend for RedisBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        let mut conn = self.connection.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), BackendError> {
        let mut conn = self.connection.clone();
        let _: () = conn.set_ex(key, value, ttl.as_secs()).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), BackendError> {
        let mut conn = self.connection.clone();
        let _: () = conn.del(key).await?;
        Ok(())
    }

    async fn add_to_set(
        &self,
        set_key: &str,
        member: &str,
        ttl: Duration,
    ) -> Result<(), BackendError> {
        let mut conn = self.connection.clone();
        // SADD 和 EXPIRE 合并为一次往返
        let _: () = redis::pipe()
            .sadd(set_key, member)
            .ignore()
            .expire(set_key, ttl.as_secs() as i64)
            .ignore()
            .query_async(&mut conn)
            .await?;
        Ok(())
    }

    async fn remove_from_set(&self, set_key: &str, member: &str) -> Result<(), BackendError> {
        let mut conn = self.connection.clone();
        let _: () = conn.srem(set_key, member).await?;
        Ok(())
    }

    async fn members(&self, set_key: &str) -> Result<Vec<String>, BackendError> {
        let mut conn = self.connection.clone();
        let members: Vec<String> = conn.smembers(set_key).await?;
        Ok(members)
    }

    async fn publish(&self, channel: &str, message: &str) -> Result<(), BackendError> {
        let mut conn = self.connection.clone();
        let _: () = conn.publish(channel, message).await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), BackendError> {
        let mut conn = self.connection.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}
