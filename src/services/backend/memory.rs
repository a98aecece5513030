use std::collections::HashSet;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tokio::sync::broadcast;

use super::{BackendError, CacheBackend};

/// 广播通道容量
const CHANNEL_CAPACITY: usize = 256;

// 带过期时间的存储值
#[derive(Debug, Clone)]
struct StoredValue {
    value: String,
    expires_at: Instant,
}

// 带过期时间的集合
#[derive(Debug, Clone)]
struct StoredSet {
    members: HashSet<String>,
    expires_at: Instant,
}

/// 进程内缓存后端
///
/// 过期在读取路径上强制检查，逻辑上已过期的值绝不会被返回。
/// 发布订阅基于 Tokio broadcast 通道，单进程部署和测试都用它。
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: DashMap<String, StoredValue>,
    sets: DashMap<String, StoredSet>,
    channels: DashMap<String, broadcast::Sender<String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// 订阅指定频道，返回广播接收端
    pub fn subscribe(&self, channel: &str) -> broadcast::Receiver<String> {
        self.get_or_create_channel(channel).subscribe()
    }

    // 获取或创建频道的广播发送端
    fn get_or_create_channel(&self, channel: &str) -> broadcast::Sender<String> {
        if let Some(sender) = self.channels.get(channel) {
            sender.clone()
        } else {
            let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
            self.channels.insert(channel.to_string(), sender.clone());
            sender
        }
    }
}

#[async_trait::async_trait]
impl CacheBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        let expired = match self.entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => {
                return Ok(Some(entry.value.clone()));
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            self.entries
                .remove_if(key, |_, entry| entry.expires_at <= Instant::now());
        }

        Ok(None)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), BackendError> {
        self.entries.insert(
            key.to_string(),
            StoredValue {
                value: value.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), BackendError> {
        self.entries.remove(key);
        Ok(())
    }

    async fn add_to_set(
        &self,
        set_key: &str,
        member: &str,
        ttl: Duration,
    ) -> Result<(), BackendError> {
        let expires_at = Instant::now() + ttl;

        self.sets
            .entry(set_key.to_string())
            .and_modify(|set| {
                // 已过期的集合先清空再复用
                if set.expires_at <= Instant::now() {
                    set.members.clear();
                }
                set.members.insert(member.to_string());
                set.expires_at = expires_at;
            })
            .or_insert_with(|| StoredSet {
                members: HashSet::from([member.to_string()]),
                expires_at,
            });

        Ok(())
    }

    async fn remove_from_set(&self, set_key: &str, member: &str) -> Result<(), BackendError> {
        if let Some(mut set) = self.sets.get_mut(set_key) {
            set.members.remove(member);
        }
        Ok(())
    }

    async fn members(&self, set_key: &str) -> Result<Vec<String>, BackendError> {
        let expired = match self.sets.get(set_key) {
            Some(set) if set.expires_at > Instant::now() => {
                return Ok(set.members.iter().cloned().collect());
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            self.sets
                .remove_if(set_key, |_, set| set.expires_at <= Instant::now());
        }

        Ok(Vec::new())
    }

    async fn publish(&self, channel: &str, message: &str) -> Result<(), BackendError> {
        if let Some(sender) = self.channels.get(channel) {
            // 没有活跃订阅者时发送失败，按无投递保证的语义忽略
            let _ = sender.send(message.to_string());
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), BackendError> {
        Ok(())
    }
}
