use std::time::Duration;

use super::{BackendError, CacheBackend};

/// 未配置共享缓存时的降级后端，所有操作都是安全空操作
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopBackend;

impl NoopBackend {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl CacheBackend for NoopBackend {
    async fn get(&self, _key: &str) -> Result<Option<String>, BackendError> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<(), BackendError> {
        Ok(())
    }

    async fn delete(&self, _key: &str) -> Result<(), BackendError> {
        Ok(())
    }

    async fn add_to_set(
        &self,
        _set_key: &str,
        _member: &str,
        _ttl: Duration,
    ) -> Result<(), BackendError> {
        Ok(())
    }

    async fn remove_from_set(&self, _set_key: &str, _member: &str) -> Result<(), BackendError> {
        Ok(())
    }

    async fn members(&self, _set_key: &str) -> Result<Vec<String>, BackendError> {
        Ok(Vec::new())
    }

    async fn publish(&self, _channel: &str, _message: &str) -> Result<(), BackendError> {
        Ok(())
    }

    async fn ping(&self) -> Result<(), BackendError> {
        Ok(())
    }
}
