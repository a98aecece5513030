//! Cache backend module
//!
//! This module contains the shared cache abstraction split into logical components:
//! - `error`: Backend error type
//! - `redis`: Live Redis-backed implementation
//! - `memory`: In-process implementation with TTL enforced on read
//! - `noop`: Degraded no-op implementation used when no cache is configured

pub mod error;
pub mod memory;
pub mod noop;
pub mod redis;

pub use error::BackendError;
pub use memory::MemoryBackend;
pub use noop::NoopBackend;
pub use self::redis::RedisBackend;

use std::time::Duration;

use async_trait::async_trait;

/// 共享缓存后端抽象
///
/// 带 TTL 的键值存储、集合成员管理与发布订阅。
/// 任何操作都可能因后端不可用而失败，调用方不得假设成功。
#[async_trait]
pub trait CacheBackend: Send + Sync + std::fmt::Debug {
    /// 读取键值，不存在或已过期时返回 None
    async fn get(&self, key: &str) -> Result<Option<String>, BackendError>;

    /// 写入键值并设置过期时间
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), BackendError>;

    /// 删除键
    async fn delete(&self, key: &str) -> Result<(), BackendError>;

    /// 向集合添加成员，同时刷新集合键的过期时间
    async fn add_to_set(
        &self,
        set_key: &str,
        member: &str,
        ttl: Duration,
    ) -> Result<(), BackendError>;

    /// 从集合移除成员
    async fn remove_from_set(&self, set_key: &str, member: &str) -> Result<(), BackendError>;

    /// 读取集合的全部成员
    async fn members(&self, set_key: &str) -> Result<Vec<String>, BackendError>;

    /// 向频道发布消息，无投递保证
    async fn publish(&self, channel: &str, message: &str) -> Result<(), BackendError>;

    /// 连通性探测
    async fn ping(&self) -> Result<(), BackendError>;
}
