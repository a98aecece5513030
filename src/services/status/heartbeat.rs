use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use super::keys;
use super::publisher::StatusPublisher;
use super::store::StatusStore;
use super::types::{HealthState, ServiceStatus};
use crate::config::RegistryConfig;
use crate::services::guard::AvailabilityGuard;

/// 心跳记录器
///
/// 记录服务的存活信号并维护对应状态记录。
/// 从未见过心跳的服务一律视为过期，这是故障安全的默认值。
#[derive(Debug, Clone)]
pub struct HeartbeatRecorder {
    guard: Arc<AvailabilityGuard>,
    store: StatusStore,
    publisher: StatusPublisher,
    heartbeat_ttl: Duration,
}

impl HeartbeatRecorder {
    pub fn new(
        guard: Arc<AvailabilityGuard>,
        store: StatusStore,
        publisher: StatusPublisher,
        config: &RegistryConfig,
    ) -> Self {
        Self {
            guard,
            store,
            publisher,
            heartbeat_ttl: config.heartbeat_ttl(),
        }
    }

    /// 记录一次心跳：刷新原始时间戳键，更新 (或创建) 状态记录，广播心跳事件
    pub async fn record_heartbeat(&self, service_name: &str, service_id: Option<i64>) {
        let now = Utc::now();

        self.guard
            .set(
                &keys::heartbeat_key(service_name),
                &now.to_rfc3339(),
                self.heartbeat_ttl,
            )
            .await;

        // 已有记录则刷新，没有则合成初始记录；有心跳就意味着 HEALTHY
        let mut status = self
            .store
            .get(service_name)
            .await
            .unwrap_or_else(|| ServiceStatus::new(service_name, service_id));
        status.last_heartbeat = Some(now);
        status.health_state = HealthState::Healthy;
        self.store.update(status).await;

        self.publisher.publish_heartbeat(service_name, now).await;
    }

    /// 读取最近一次心跳时间
    pub async fn get_last_heartbeat(&self, service_name: &str) -> Option<DateTime<Utc>> {
        let raw = self.guard.get(&keys::heartbeat_key(service_name)).await?;

        match DateTime::parse_from_rfc3339(&raw) {
            Ok(timestamp) => Some(timestamp.with_timezone(&Utc)),
            Err(e) => {
                tracing::warn!(
                    service_name = %service_name,
                    error = %e,
                    "Stored heartbeat timestamp is not parseable, treating as missing"
                );
                None
            }
        }
    }

    /// 是否超过给定阈值没有心跳；缺失的心跳一律视为过期
    pub async fn is_stale(&self, service_name: &str, threshold: Duration) -> bool {
        match self.get_last_heartbeat(service_name).await {
            Some(last_heartbeat) => {
                let threshold = chrono::Duration::from_std(threshold)
                    .unwrap_or_else(|_| chrono::Duration::zero());
                Utc::now() - threshold > last_heartbeat
            }
            None => true,
        }
    }
}
