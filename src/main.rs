use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use status_registry::config::Config;
use status_registry::services::backend::{CacheBackend, NoopBackend, RedisBackend};
use status_registry::services::registry::StatusRegistry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::load_or_default();

    // 未配置 Redis 时以降级模式启动，所有缓存操作都是空操作
    let backend: Arc<dyn CacheBackend> = match config.redis.url.as_deref() {
        Some(url) => Arc::new(RedisBackend::connect(url).await?),
        None => {
            tracing::warn!("No Redis url configured, running with no-op cache backend");
            Arc::new(NoopBackend::new())
        }
    };

    let registry = StatusRegistry::new(backend, config.registry.clone());
    let supervisor = registry.start_background_tasks();

    tracing::info!("Status registry started");

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received, stopping background tasks...");
    supervisor.shutdown().await;

    Ok(())
}
