use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;

use super::keys::{self, ACTIVE_SERVICES_KEY};
use super::publisher::StatusPublisher;
use super::types::{ServiceMetrics, ServiceStatus};
use crate::config::RegistryConfig;
use crate::services::guard::AvailabilityGuard;

/// 状态存储
///
/// 按服务名读写状态记录，并维护活跃服务名集合。
/// 所有读取在后端降级或数据损坏时返回空值，从不向调用方抛错。
#[derive(Debug, Clone)]
pub struct StatusStore {
    guard: Arc<AvailabilityGuard>,
    publisher: StatusPublisher,
    status_ttl: Duration,
    metrics_ttl: Duration,
}

impl StatusStore {
    pub fn new(
        guard: Arc<AvailabilityGuard>,
        publisher: StatusPublisher,
        config: &RegistryConfig,
    ) -> Self {
        Self {
            guard,
            publisher,
            status_ttl: config.status_ttl(),
            metrics_ttl: config.metrics_ttl(),
        }
    }

    /// 写入状态记录并广播
    ///
    /// 同名记录直接覆盖；活跃集合的过期时间随每次写入刷新。
    pub async fn update(&self, mut status: ServiceStatus) {
        status.published = true;
        let delivered = self.publisher.publish_status(&status).await;
        status.published = delivered;

        let payload = match serde_json::to_string(&status) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!(
                    service_name = %status.service_name,
                    error = %e,
                    "Failed to serialize service status"
                );
                return;
            }
        };

        let key = keys::status_key(&status.service_name);
        self.guard.set(&key, &payload, self.status_ttl).await;
        self.guard
            .add_to_set(ACTIVE_SERVICES_KEY, &status.service_name, self.status_ttl)
            .await;
    }

    /// 读取状态记录；未命中、降级或反序列化失败都返回 None
    pub async fn get(&self, service_name: &str) -> Option<ServiceStatus> {
        let payload = self.guard.get(&keys::status_key(service_name)).await?;

        match serde_json::from_str(&payload) {
            Ok(status) => Some(status),
            Err(e) => {
                // 损坏的记录当作未命中，留给 TTL 自然过期
                tracing::warn!(
                    service_name = %service_name,
                    error = %e,
                    "Failed to deserialize stored status, treating as missing"
                );
                None
            }
        }
    }

    /// 读取全部活跃服务的状态，单个记录缺失时跳过
    pub async fn get_all(&self) -> Vec<ServiceStatus> {
        let names = self.guard.members(ACTIVE_SERVICES_KEY).await;
        let lookups = names.iter().map(|name| self.get(name));
        join_all(lookups).await.into_iter().flatten().collect()
    }

    /// 读取活跃服务名集合
    pub async fn active_names(&self) -> Vec<String> {
        self.guard.members(ACTIVE_SERVICES_KEY).await
    }

    /// 注销服务：删除状态、心跳和指标键，移出活跃集合，并广播终态 OFFLINE
    pub async fn remove(&self, service_name: &str) {
        self.guard.delete(&keys::status_key(service_name)).await;
        self.guard.delete(&keys::heartbeat_key(service_name)).await;
        self.guard.delete(&keys::metrics_key(service_name)).await;
        self.guard
            .remove_from_set(ACTIVE_SERVICES_KEY, service_name)
            .await;

        let terminal = ServiceStatus::offline(service_name);
        self.publisher.publish_status(&terminal).await;

        tracing::info!(service_name = %service_name, "Service deregistered");
    }

    /// 写入服务指标，独立于状态记录的键和 TTL
    pub async fn store_metrics(&self, service_name: &str, metrics: &ServiceMetrics) {
        let payload = match serde_json::to_string(metrics) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!(
                    service_name = %service_name,
                    error = %e,
                    "Failed to serialize service metrics"
                );
                return;
            }
        };

        self.guard
            .set(&keys::metrics_key(service_name), &payload, self.metrics_ttl)
            .await;
    }

    /// 读取服务指标
    pub async fn get_metrics(&self, service_name: &str) -> Option<ServiceMetrics> {
        let payload = self.guard.get(&keys::metrics_key(service_name)).await?;

        match serde_json::from_str(&payload) {
            Ok(metrics) => Some(metrics),
            Err(e) => {
                tracing::warn!(
                    service_name = %service_name,
                    error = %e,
                    "Failed to deserialize stored metrics, treating as missing"
                );
                None
            }
        }
    }
}
