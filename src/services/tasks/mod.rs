//! Background tasks module
//!
//! This module contains the periodic tasks running alongside the request path:
//! - `sweeper`: Demotes services whose heartbeat exceeded the staleness threshold
//! - `probe`: Retries the backend connection while the guard reports unavailable

pub mod probe;
pub mod sweeper;

pub use probe::ReconnectProbe;
pub use sweeper::StalenessSweeper;

use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

/// 后台任务监督器
///
/// 持有周期任务的停止信号；任务不会在一轮执行中途被取消，
/// 收到停止信号后在下一个调度点退出。
#[derive(Debug)]
pub struct TaskSupervisor {
    tracker: TaskTracker,
    shutdown: CancellationToken,
}

impl TaskSupervisor {
    /// 启动过期扫描与重连探测任务
    pub fn start(sweeper: StalenessSweeper, probe: ReconnectProbe) -> Self {
        let tracker = TaskTracker::new();
        let shutdown = CancellationToken::new();

        tracker.spawn(sweeper.run(shutdown.clone()));
        tracker.spawn(probe.run(shutdown.clone()));
        tracker.close();

        Self { tracker, shutdown }
    }

    /// 通知所有周期任务停止并等待退出
    pub async fn shutdown(&self) {
        self.shutdown.cancel();
        self.tracker.wait().await;
    }
}
