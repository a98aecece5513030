use thiserror::Error;

/// 缓存后端错误类型
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}
