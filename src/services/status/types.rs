use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 服务健康状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HealthState {
    Healthy,
    Unhealthy,
    Degraded,
    Unknown,
    Offline,
    Starting,
    Stopping,
}

/// 服务指标集合，独立于状态记录存储 (TTL 更短，负载更大，变化更频繁)
pub type ServiceMetrics = HashMap<String, serde_json::Value>;

/// 服务状态记录，每个服务名一条 (不区分实例)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStatus {
    /// 目录中的服务 ID，可空，仅供参考
    pub service_id: Option<i64>,
    /// 服务名，唯一主键
    pub service_name: String,
    pub health_state: HealthState,
    /// 最近一次心跳时间
    pub last_heartbeat: Option<DateTime<Utc>>,
    /// 最近一次显式健康检查时间 (区别于心跳)
    pub last_health_check: Option<DateTime<Utc>>,
    /// 可达地址
    pub endpoint: Option<String>,
    pub response_time_ms: Option<u64>,
    pub active_connections: Option<u32>,
    /// 内联指标快照；常规路径下指标单独存储，见 StatusStore::store_metrics
    pub metrics: Option<ServiceMetrics>,
    /// 不健康时的最近错误描述
    pub error_message: Option<String>,
    /// 最近一次写入是否成功广播，仅用于诊断
    #[serde(default)]
    pub published: bool,
}

impl ServiceStatus {
    /// 创建初始状态记录，健康状态为 UNKNOWN
    pub fn new(service_name: impl Into<String>, service_id: Option<i64>) -> Self {
        Self {
            service_id,
            service_name: service_name.into(),
            health_state: HealthState::Unknown,
            last_heartbeat: None,
            last_health_check: None,
            endpoint: None,
            response_time_ms: None,
            active_connections: None,
            metrics: None,
            error_message: None,
            published: false,
        }
    }

    /// 服务注销时广播的终态记录
    pub fn offline(service_name: impl Into<String>) -> Self {
        Self {
            health_state: HealthState::Offline,
            ..Self::new(service_name, None)
        }
    }
}

/// 心跳频道上的轻量事件，订阅方无需反序列化完整状态
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeartbeatEvent {
    pub service_name: String,
    pub timestamp: DateTime<Utc>,
}
