use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::services::status::heartbeat::HeartbeatRecorder;
use crate::services::status::store::StatusStore;
use crate::services::status::types::HealthState;

/// 过期扫描任务
///
/// 周期性枚举活跃服务，把心跳超过阈值的服务降级为 OFFLINE。
/// 已经离线的服务直接跳过，避免每轮重复广播；
/// 单个服务的失败不会中断整轮扫描。
#[derive(Debug, Clone)]
pub struct StalenessSweeper {
    store: StatusStore,
    recorder: HeartbeatRecorder,
    stale_threshold: Duration,
    sweep_interval: Duration,
}

impl StalenessSweeper {
    pub fn new(
        store: StatusStore,
        recorder: HeartbeatRecorder,
        stale_threshold: Duration,
        sweep_interval: Duration,
    ) -> Self {
        Self {
            store,
            recorder,
            stale_threshold,
            sweep_interval,
        }
    }

    /// 周期运行，直到收到停止信号
    pub async fn run(self, shutdown: CancellationToken) {
        let mut interval = tokio::time::interval(self.sweep_interval);
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    tracing::debug!("Executing staleness sweep...");
                    self.run_once().await;
                }
                _ = shutdown.cancelled() => {
                    tracing::debug!("Staleness sweeper stopped");
                    break;
                }
            }
        }
    }

    /// 执行一轮扫描
    pub async fn run_once(&self) {
        let names = self.store.active_names().await;
        let mut demoted = 0usize;

        for service_name in names {
            if !self
                .recorder
                .is_stale(&service_name, self.stale_threshold)
                .await
            {
                continue;
            }

            // 记录缺失或已经离线的服务跳过，保持扫描幂等
            let Some(mut status) = self.store.get(&service_name).await else {
                continue;
            };
            if status.health_state == HealthState::Offline {
                continue;
            }

            tracing::warn!(
                service_name = %service_name,
                threshold_secs = self.stale_threshold.as_secs(),
                "Service heartbeat expired, demoting to OFFLINE"
            );
            status.health_state = HealthState::Offline;
            self.store.update(status).await;
            demoted += 1;
        }

        if demoted > 0 {
            tracing::info!(
                demoted_count = demoted,
                "Staleness sweep completed, demoted stale services"
            );
        }
    }
}
