//! 缓存键与频道命名约定
//!
//! 这套命名是后端数据契约的一部分，任何替代后端实现都必须保持一致。

/// 活跃服务名集合键
pub const ACTIVE_SERVICES_KEY: &str = "services:active";

/// 完整状态事件频道
pub const STATUS_CHANNEL: &str = "service-status-updates";

/// 轻量心跳事件频道
pub const HEARTBEAT_CHANNEL: &str = "service-heartbeats";

pub fn status_key(service_name: &str) -> String {
    format!("status:{}", service_name)
}

pub fn heartbeat_key(service_name: &str) -> String {
    format!("heartbeat:{}", service_name)
}

pub fn metrics_key(service_name: &str) -> String {
    format!("metrics:{}", service_name)
}
