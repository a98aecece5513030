use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;

use status_registry::config::RegistryConfig;
use status_registry::services::backend::MemoryBackend;
use status_registry::services::registry::StatusRegistry;
use status_registry::services::status::keys::{HEARTBEAT_CHANNEL, STATUS_CHANNEL};
use status_registry::services::status::types::{HealthState, HeartbeatEvent, ServiceStatus};

fn build_registry() -> (StatusRegistry, Arc<MemoryBackend>) {
    let backend = Arc::new(MemoryBackend::new());
    let registry = StatusRegistry::new(backend.clone(), RegistryConfig::default());
    (registry, backend)
}

#[tokio::test]
async fn test_first_heartbeat_marks_service_healthy() {
    let (registry, _backend) = build_registry();

    // 第一次心跳应该创建状态记录并立即标记为 HEALTHY
    registry.record_heartbeat("svc-a", Some(1)).await;

    let status = registry
        .get_service_status("svc-a")
        .await
        .expect("Status should exist after heartbeat");

    assert_eq!(status.service_name, "svc-a");
    assert_eq!(status.service_id, Some(1));
    assert_eq!(status.health_state, HealthState::Healthy);
    assert!(status.last_heartbeat.is_some());
    assert!(status.published);

    // 刚记录过心跳的服务不应过期
    assert!(!registry.is_service_stale("svc-a").await);
    assert!(registry.get_last_heartbeat("svc-a").await.is_some());
}

#[tokio::test]
async fn test_unseen_service_is_always_stale() {
    let (registry, _backend) = build_registry();

    // 从未上报过心跳的服务一律视为过期
    assert!(registry.is_service_stale("ghost").await);
    assert!(registry.get_last_heartbeat("ghost").await.is_none());
    assert!(registry.get_service_status("ghost").await.is_none());

    // 阈值为 0 时同样成立
    let backend = Arc::new(MemoryBackend::new());
    let config = RegistryConfig {
        stale_threshold_seconds: 0,
        ..RegistryConfig::default()
    };
    let registry = StatusRegistry::new(backend, config);
    assert!(registry.is_service_stale("ghost").await);
}

#[tokio::test]
async fn test_heartbeat_events_published_on_both_channels() {
    let (registry, backend) = build_registry();

    // 先订阅再触发心跳
    let mut status_stream = BroadcastStream::new(backend.subscribe(STATUS_CHANNEL));
    let mut heartbeat_stream = BroadcastStream::new(backend.subscribe(HEARTBEAT_CHANNEL));

    registry.record_heartbeat("svc-events", None).await;

    // 状态频道收到完整状态，字段为 camelCase，健康状态为大写枚举名
    let status_payload = timeout(Duration::from_secs(1), status_stream.next())
        .await
        .expect("Timeout waiting for status event")
        .expect("Status stream ended unexpectedly")
        .expect("Status stream error");

    let status_json: serde_json::Value =
        serde_json::from_str(&status_payload).expect("Status event should be valid JSON");
    assert_eq!(status_json["serviceName"], "svc-events");
    assert_eq!(status_json["healthState"], "HEALTHY");
    assert!(status_json["lastHeartbeat"].is_string());

    let status: ServiceStatus =
        serde_json::from_str(&status_payload).expect("Status event should deserialize");
    assert_eq!(status.health_state, HealthState::Healthy);

    // 心跳频道只有轻量事件
    let heartbeat_payload = timeout(Duration::from_secs(1), heartbeat_stream.next())
        .await
        .expect("Timeout waiting for heartbeat event")
        .expect("Heartbeat stream ended unexpectedly")
        .expect("Heartbeat stream error");

    let event: HeartbeatEvent =
        serde_json::from_str(&heartbeat_payload).expect("Heartbeat event should deserialize");
    assert_eq!(event.service_name, "svc-events");

    let event_json: serde_json::Value =
        serde_json::from_str(&heartbeat_payload).expect("Heartbeat event should be valid JSON");
    assert!(event_json["timestamp"].is_string());
}

#[tokio::test]
async fn test_remove_service_publishes_terminal_offline() {
    let (registry, backend) = build_registry();

    registry.record_heartbeat("svc-c", Some(3)).await;
    assert!(registry.get_service_status("svc-c").await.is_some());

    // 注销前订阅，只会看到终态事件
    let mut status_stream = BroadcastStream::new(backend.subscribe(STATUS_CHANNEL));

    registry.remove_service("svc-c").await;

    assert!(registry.get_service_status("svc-c").await.is_none());
    assert!(registry.get_last_heartbeat("svc-c").await.is_none());
    assert!(registry.get_all_service_statuses().await.is_empty());

    let payload = timeout(Duration::from_secs(1), status_stream.next())
        .await
        .expect("Timeout waiting for terminal event")
        .expect("Status stream ended unexpectedly")
        .expect("Status stream error");

    let terminal: ServiceStatus =
        serde_json::from_str(&payload).expect("Terminal event should deserialize");
    assert_eq!(terminal.service_name, "svc-c");
    assert_eq!(terminal.health_state, HealthState::Offline);
}

#[tokio::test]
async fn test_metrics_round_trip() {
    let (registry, _backend) = build_registry();

    let metrics = HashMap::from([
        ("cpu".to_string(), serde_json::json!(42)),
        ("region".to_string(), serde_json::json!("eu-west-1")),
    ]);

    registry.store_metrics("svc-d", metrics.clone()).await;

    let stored = registry
        .get_metrics("svc-d")
        .await
        .expect("Metrics should exist before TTL elapses");
    assert_eq!(stored, metrics);

    // 指标独立于状态记录存储
    assert!(registry.get_service_status("svc-d").await.is_none());
}

#[tokio::test]
async fn test_concurrent_heartbeats_never_corrupt_record() {
    let (registry, _backend) = build_registry();

    // 同名服务的并发心跳，最终记录必须是某个写入者的完整值
    let mut handles = Vec::new();
    for _ in 0..16 {
        let registry = registry.clone();
        handles.push(tokio::spawn(async move {
            registry.record_heartbeat("svc-n", Some(7)).await;
        }));
    }
    for handle in handles {
        handle.await.expect("Heartbeat task panicked");
    }

    let status = registry
        .get_service_status("svc-n")
        .await
        .expect("Status should exist after concurrent heartbeats");
    assert_eq!(status.health_state, HealthState::Healthy);
    assert!(status.last_heartbeat.is_some());

    // 活跃集合里只有一条记录
    assert_eq!(registry.get_all_service_statuses().await.len(), 1);
}
