use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::keys::{HEARTBEAT_CHANNEL, STATUS_CHANNEL};
use super::types::{HeartbeatEvent, ServiceStatus};
use crate::services::guard::AvailabilityGuard;

/// 状态事件发布器
///
/// 两个频道：完整状态更新与轻量心跳。发布即忘，
/// 失败只记录日志，从不重试，也不会阻塞触发它的写入路径。
#[derive(Debug, Clone)]
pub struct StatusPublisher {
    guard: Arc<AvailabilityGuard>,
}

impl StatusPublisher {
    pub fn new(guard: Arc<AvailabilityGuard>) -> Self {
        Self { guard }
    }

    /// 在状态频道广播完整状态，返回是否成功投递到后端
    pub async fn publish_status(&self, status: &ServiceStatus) -> bool {
        let payload = match serde_json::to_string(status) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!(
                    service_name = %status.service_name,
                    error = %e,
                    "Failed to serialize status event"
                );
                return false;
            }
        };

        let delivered = self.guard.publish(STATUS_CHANNEL, &payload).await;
        if delivered {
            tracing::debug!(
                service_name = %status.service_name,
                health_state = ?status.health_state,
                "Published status update"
            );
        }
        delivered
    }

    /// 在心跳频道广播轻量心跳事件
    pub async fn publish_heartbeat(&self, service_name: &str, timestamp: DateTime<Utc>) -> bool {
        let event = HeartbeatEvent {
            service_name: service_name.to_string(),
            timestamp,
        };

        let payload = match serde_json::to_string(&event) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!(
                    service_name = %service_name,
                    error = %e,
                    "Failed to serialize heartbeat event"
                );
                return false;
            }
        };

        self.guard.publish(HEARTBEAT_CHANNEL, &payload).await
    }
}
