use std::sync::Arc;
use std::time::Duration;

use status_registry::config::RegistryConfig;
use status_registry::services::backend::{CacheBackend, MemoryBackend};
use status_registry::services::registry::StatusRegistry;
use status_registry::services::status::keys::{self, ACTIVE_SERVICES_KEY};
use status_registry::services::status::types::{HealthState, ServiceStatus};

fn build_registry() -> (StatusRegistry, Arc<MemoryBackend>) {
    let backend = Arc::new(MemoryBackend::new());
    let registry = StatusRegistry::new(backend.clone(), RegistryConfig::default());
    (registry, backend)
}

#[tokio::test]
async fn test_malformed_record_treated_as_missing() {
    let (registry, backend) = build_registry();

    // 直接往后端塞一条无法反序列化的记录
    backend
        .set(&keys::status_key("corrupt"), "not-json{{", Duration::from_secs(300))
        .await
        .expect("Seeding the backend should succeed");
    backend
        .add_to_set(ACTIVE_SERVICES_KEY, "corrupt", Duration::from_secs(300))
        .await
        .expect("Seeding the active set should succeed");

    // 损坏的记录表现为未命中，而不是错误
    assert!(registry.get_service_status("corrupt").await.is_none());

    // 批量查询跳过损坏的记录
    registry.record_heartbeat("svc-good", None).await;
    let all = registry.get_all_service_statuses().await;
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].service_name, "svc-good");

    // 损坏的键没有被主动删除，留给 TTL 处理
    assert!(
        backend
            .get(&keys::status_key("corrupt"))
            .await
            .expect("Backend read should succeed")
            .is_some()
    );
}

#[tokio::test]
async fn test_same_name_overwrites_previous_record() {
    let (registry, _backend) = build_registry();

    let mut first = ServiceStatus::new("svc-dup", Some(10));
    first.endpoint = Some("http://old:8080".to_string());
    registry.update_status(first).await;

    let mut second = ServiceStatus::new("svc-dup", Some(10));
    second.endpoint = Some("http://new:8080".to_string());
    second.health_state = HealthState::Degraded;
    registry.update_status(second).await;

    // 服务名是唯一标识，重复写入只保留最后一条
    let all = registry.get_all_service_statuses().await;
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].endpoint.as_deref(), Some("http://new:8080"));
    assert_eq!(all[0].health_state, HealthState::Degraded);
}

#[tokio::test]
async fn test_update_sets_published_flag() {
    let (registry, _backend) = build_registry();

    registry
        .update_status(ServiceStatus::new("svc-pub", None))
        .await;

    let status = registry
        .get_service_status("svc-pub")
        .await
        .expect("Status should exist");
    assert!(status.published);
}

#[tokio::test]
async fn test_remove_deletes_every_key() {
    let (registry, backend) = build_registry();

    registry.record_heartbeat("svc-gone", None).await;
    registry
        .store_metrics(
            "svc-gone",
            std::collections::HashMap::from([("cpu".to_string(), serde_json::json!(1))]),
        )
        .await;

    registry.remove_service("svc-gone").await;

    // 状态、心跳、指标键以及集合成员全部清理
    assert!(backend.get(&keys::status_key("svc-gone")).await.unwrap().is_none());
    assert!(backend.get(&keys::heartbeat_key("svc-gone")).await.unwrap().is_none());
    assert!(backend.get(&keys::metrics_key("svc-gone")).await.unwrap().is_none());
    assert!(
        !backend
            .members(ACTIVE_SERVICES_KEY)
            .await
            .unwrap()
            .contains(&"svc-gone".to_string())
    );
}

#[tokio::test]
async fn test_backend_never_returns_expired_values() {
    let backend = MemoryBackend::new();

    backend
        .set("status:short-lived", "{}", Duration::from_millis(20))
        .await
        .expect("Set should succeed");
    backend
        .add_to_set(ACTIVE_SERVICES_KEY, "short-lived", Duration::from_millis(20))
        .await
        .expect("Set-add should succeed");

    assert!(backend.get("status:short-lived").await.unwrap().is_some());

    tokio::time::sleep(Duration::from_millis(50)).await;

    // 过期后即使还没有任何清扫，读取也必须返回空
    assert!(backend.get("status:short-lived").await.unwrap().is_none());
    assert!(backend.members(ACTIVE_SERVICES_KEY).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_wire_format_uses_upper_case_states() {
    // 健康状态在 JSON 里是大写枚举名，这是频道消息的数据契约
    let healthy = serde_json::to_string(&HealthState::Healthy).expect("Serialize should succeed");
    assert_eq!(healthy, "\"HEALTHY\"");

    let offline: HealthState =
        serde_json::from_str("\"OFFLINE\"").expect("Deserialize should succeed");
    assert_eq!(offline, HealthState::Offline);
}
