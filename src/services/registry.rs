use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::backend::CacheBackend;
use super::guard::AvailabilityGuard;
use super::status::heartbeat::HeartbeatRecorder;
use super::status::publisher::StatusPublisher;
use super::status::store::StatusStore;
use super::status::types::{ServiceMetrics, ServiceStatus};
use super::tasks::{ReconnectProbe, StalenessSweeper, TaskSupervisor};
use crate::config::RegistryConfig;

/// 服务状态注册中心
///
/// 组合缓存后端、可用性守卫、状态存储与心跳记录器，
/// 对外暴露 REST 层需要的查询和写入接口。后端降级时所有
/// 操作退化为空结果或空操作，绝不阻塞调用方的请求路径。
#[derive(Debug, Clone)]
pub struct StatusRegistry {
    guard: Arc<AvailabilityGuard>,
    store: StatusStore,
    recorder: HeartbeatRecorder,
    config: RegistryConfig,
}

impl StatusRegistry {
    pub fn new(backend: Arc<dyn CacheBackend>, config: RegistryConfig) -> Self {
        let guard = Arc::new(AvailabilityGuard::new(backend));
        let publisher = StatusPublisher::new(guard.clone());
        let store = StatusStore::new(guard.clone(), publisher.clone(), &config);
        let recorder = HeartbeatRecorder::new(guard.clone(), store.clone(), publisher, &config);

        Self {
            guard,
            store,
            recorder,
            config,
        }
    }

    /// 记录一次服务心跳，发布即忘
    pub async fn record_heartbeat(&self, service_name: &str, service_id: Option<i64>) {
        self.recorder.record_heartbeat(service_name, service_id).await;
    }

    /// 显式写入一条状态记录 (健康检查等路径)
    pub async fn update_status(&self, status: ServiceStatus) {
        self.store.update(status).await;
    }

    /// 查询单个服务的状态
    pub async fn get_service_status(&self, service_name: &str) -> Option<ServiceStatus> {
        self.store.get(service_name).await
    }

    /// 查询全部活跃服务的状态
    pub async fn get_all_service_statuses(&self) -> Vec<ServiceStatus> {
        self.store.get_all().await
    }

    /// 查询最近一次心跳时间
    pub async fn get_last_heartbeat(&self, service_name: &str) -> Option<DateTime<Utc>> {
        self.recorder.get_last_heartbeat(service_name).await
    }

    /// 按配置的阈值判断服务是否过期
    pub async fn is_service_stale(&self, service_name: &str) -> bool {
        self.recorder
            .is_stale(service_name, self.config.stale_threshold())
            .await
    }

    /// 写入服务指标
    pub async fn store_metrics(&self, service_name: &str, metrics: ServiceMetrics) {
        self.store.store_metrics(service_name, &metrics).await;
    }

    /// 读取服务指标
    pub async fn get_metrics(&self, service_name: &str) -> Option<ServiceMetrics> {
        self.store.get_metrics(service_name).await
    }

    /// 注销服务并广播终态 OFFLINE
    pub async fn remove_service(&self, service_name: &str) {
        self.store.remove(service_name).await;
    }

    /// 诊断接口：缓存后端当前是否可用
    pub fn is_backend_healthy(&self) -> bool {
        self.guard.is_available()
    }

    /// 启动过期扫描与重连探测两个周期任务
    pub fn start_background_tasks(&self) -> TaskSupervisor {
        let sweeper = StalenessSweeper::new(
            self.store.clone(),
            self.recorder.clone(),
            self.config.stale_threshold(),
            self.config.sweep_interval(),
        );
        let probe = ReconnectProbe::new(self.guard.clone(), self.config.reconnect_interval());

        TaskSupervisor::start(sweeper, probe)
    }
}
