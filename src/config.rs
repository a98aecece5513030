use std::fs;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// 顶层配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub redis: RedisConfig,
    pub registry: RegistryConfig,
}

/// Redis 连接配置；不设置 url 时以无缓存的降级模式运行
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RedisConfig {
    pub url: Option<String>,
}

/// 注册中心核心配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// 状态记录 TTL 秒数
    pub status_ttl_seconds: u64,
    /// 心跳时间戳 TTL 秒数
    pub heartbeat_ttl_seconds: u64,
    /// 指标记录 TTL 秒数
    pub metrics_ttl_seconds: u64,
    /// 心跳过期阈值秒数
    pub stale_threshold_seconds: u64,
    /// 过期扫描间隔秒数
    pub sweep_interval_seconds: u64,
    /// 重连探测间隔秒数
    pub reconnect_interval_seconds: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            status_ttl_seconds: 300,
            heartbeat_ttl_seconds: 60,
            metrics_ttl_seconds: 120,
            stale_threshold_seconds: 90,
            sweep_interval_seconds: 30,
            reconnect_interval_seconds: 60,
        }
    }
}

impl RegistryConfig {
    pub fn status_ttl(&self) -> Duration {
        Duration::from_secs(self.status_ttl_seconds)
    }

    pub fn heartbeat_ttl(&self) -> Duration {
        Duration::from_secs(self.heartbeat_ttl_seconds)
    }

    pub fn metrics_ttl(&self) -> Duration {
        Duration::from_secs(self.metrics_ttl_seconds)
    }

    pub fn stale_threshold(&self) -> Duration {
        Duration::from_secs(self.stale_threshold_seconds)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_seconds)
    }

    pub fn reconnect_interval(&self) -> Duration {
        Duration::from_secs(self.reconnect_interval_seconds)
    }
}

/// 环境变量覆盖项 (REGISTRY_ 前缀)
#[derive(Debug, Deserialize)]
struct EnvOverrides {
    redis_url: Option<String>,
}

impl Config {
    /// 从 config.toml 加载配置
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let config_str = fs::read_to_string("config.toml")?;
        let config: Config = toml::from_str(&config_str)?;
        Ok(config)
    }

    /// 加载配置，文件缺失时退回默认值，最后套用环境变量覆盖
    pub fn load_or_default() -> Self {
        let mut config = match Self::load() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "config.toml not loaded, using default configuration");
                Self::default()
            }
        };

        match envy::prefixed("REGISTRY_").from_env::<EnvOverrides>() {
            Ok(overrides) => {
                if overrides.redis_url.is_some() {
                    config.redis.url = overrides.redis_url;
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read environment overrides");
            }
        }

        config
    }
}
