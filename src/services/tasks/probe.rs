use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::services::guard::AvailabilityGuard;

/// 重连探测任务
///
/// 后端降级期间周期性 ping，成功后恢复可用标志。
/// 这是降级后唯一的恢复路径。
#[derive(Debug, Clone)]
pub struct ReconnectProbe {
    guard: Arc<AvailabilityGuard>,
    probe_interval: Duration,
}

impl ReconnectProbe {
    pub fn new(guard: Arc<AvailabilityGuard>, probe_interval: Duration) -> Self {
        Self {
            guard,
            probe_interval,
        }
    }

    /// 周期运行，直到收到停止信号
    pub async fn run(self, shutdown: CancellationToken) {
        let mut interval = tokio::time::interval(self.probe_interval);
        loop {
            tokio::select! {
                _ = interval.tick() => self.run_once().await,
                _ = shutdown.cancelled() => {
                    tracing::debug!("Reconnect probe stopped");
                    break;
                }
            }
        }
    }

    /// 仅在后端处于降级状态时才发起 ping
    pub async fn run_once(&self) {
        if self.guard.is_available() {
            return;
        }
        self.guard.try_restore().await;
    }
}
