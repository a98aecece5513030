use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use super::backend::CacheBackend;

/// 缓存后端可用性守卫
///
/// 包装所有后端调用：任何一次失败都把共享标志翻转为不可用，
/// 之后的调用直接短路返回安全默认值。标志只能由重连探测的
/// ping 成功来恢复，普通读写即使意外成功也不会清除它。
#[derive(Debug)]
pub struct AvailabilityGuard {
    backend: Arc<dyn CacheBackend>,
    available: AtomicBool,
}

impl AvailabilityGuard {
    pub fn new(backend: Arc<dyn CacheBackend>) -> Self {
        Self {
            backend,
            available: AtomicBool::new(true),
        }
    }

    /// 后端当前是否可用
    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    fn mark_unavailable(&self) {
        self.available.store(false, Ordering::SeqCst);
    }

    /// 读取键值，降级或失败时返回 None
    pub async fn get(&self, key: &str) -> Option<String> {
        if !self.is_available() {
            return None;
        }
        match self.backend.get(key).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Cache backend get failed, entering degraded mode");
                self.mark_unavailable();
                None
            }
        }
    }

    /// 写入键值，降级或失败时静默跳过
    pub async fn set(&self, key: &str, value: &str, ttl: Duration) {
        if !self.is_available() {
            return;
        }
        if let Err(e) = self.backend.set(key, value, ttl).await {
            tracing::warn!(key = %key, error = %e, "Cache backend set failed, entering degraded mode");
            self.mark_unavailable();
        }
    }

    /// 删除键，降级或失败时静默跳过
    pub async fn delete(&self, key: &str) {
        if !self.is_available() {
            return;
        }
        if let Err(e) = self.backend.delete(key).await {
            tracing::warn!(key = %key, error = %e, "Cache backend delete failed, entering degraded mode");
            self.mark_unavailable();
        }
    }

    /// 向集合添加成员并刷新集合过期时间
    pub async fn add_to_set(&self, set_key: &str, member: &str, ttl: Duration) {
        if !self.is_available() {
            return;
        }
        if let Err(e) = self.backend.add_to_set(set_key, member, ttl).await {
            tracing::warn!(set_key = %set_key, error = %e, "Cache backend set-add failed, entering degraded mode");
            self.mark_unavailable();
        }
    }

    /// 从集合移除成员
    pub async fn remove_from_set(&self, set_key: &str, member: &str) {
        if !self.is_available() {
            return;
        }
        if let Err(e) = self.backend.remove_from_set(set_key, member).await {
            tracing::warn!(set_key = %set_key, error = %e, "Cache backend set-remove failed, entering degraded mode");
            self.mark_unavailable();
        }
    }

    /// 读取集合成员，降级或失败时返回空列表
    pub async fn members(&self, set_key: &str) -> Vec<String> {
        if !self.is_available() {
            return Vec::new();
        }
        match self.backend.members(set_key).await {
            Ok(members) => members,
            Err(e) => {
                tracing::warn!(set_key = %set_key, error = %e, "Cache backend members failed, entering degraded mode");
                self.mark_unavailable();
                Vec::new()
            }
        }
    }

    /// 发布消息，返回是否成功投递到后端
    pub async fn publish(&self, channel: &str, message: &str) -> bool {
        if !self.is_available() {
            return false;
        }
        match self.backend.publish(channel, message).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(channel = %channel, error = %e, "Cache backend publish failed, entering degraded mode");
                self.mark_unavailable();
                false
            }
        }
    }

    /// 重连探测专用：ping 成功时恢复可用标志
    pub async fn try_restore(&self) -> bool {
        match self.backend.ping().await {
            Ok(()) => {
                if !self.is_available() {
                    tracing::info!("Cache backend connection restored, leaving degraded mode");
                }
                self.available.store(true, Ordering::SeqCst);
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Cache backend ping failed, staying in degraded mode");
                false
            }
        }
    }
}
