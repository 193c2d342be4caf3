//! Redis 缓存后端
//!
//! 所有键都带 `cache.redis.key_prefix` 前缀，多实例共享同一 Redis 时
//! 已认证用户的缓存与失效对所有实例可见。

use async_trait::async_trait;
use redis::{AsyncCommands, aio::MultiplexedConnection};
use tracing::{debug, error, info};

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::declare_object_cache_plugin;

declare_object_cache_plugin!("redis", RedisObjectCache);

/// SCAN 每批返回的键数量
const SCAN_BATCH: usize = 200;

pub struct RedisObjectCache {
    client: redis::Client,
    key_prefix: String,
    default_ttl: u64,
}

impl RedisObjectCache {
    pub fn new() -> Result<Self, String> {
        let config = AppConfig::get();
        let redis_config = &config.cache.redis;

        let client = redis::Client::open(redis_config.url.as_str())
            .map_err(|e| format!("Invalid Redis URL '{}': {e}", redis_config.url))?;

        // 启动时用同步连接确认服务可达，失败则由调用方回退到内存缓存
        let pong = client
            .get_connection()
            .and_then(|mut conn| redis::cmd("PING").query::<String>(&mut conn))
            .map_err(|e| {
                error!("Redis at {} is unreachable: {}", redis_config.url, e);
                format!("Redis ping failed: {e}")
            })?;

        info!(
            "Redis cache ready ({}), prefix '{}', default TTL {}s",
            pong, redis_config.key_prefix, config.cache.default_ttl
        );

        Ok(Self {
            client,
            key_prefix: redis_config.key_prefix.clone(),
            default_ttl: config.cache.default_ttl,
        })
    }

    async fn connection(&self) -> Option<MultiplexedConnection> {
        match self.client.get_multiplexed_async_connection().await {
            Ok(conn) => Some(conn),
            Err(e) => {
                error!("Failed to get Redis connection: {}", e);
                None
            }
        }
    }

    fn make_key(&self, key: &str) -> String {
        prefixed_key(&self.key_prefix, key)
    }

    fn effective_ttl(&self, ttl: u64) -> u64 {
        if ttl == 0 { self.default_ttl } else { ttl }
    }
}

fn prefixed_key(prefix: &str, key: &str) -> String {
    format!("{prefix}{key}")
}

/// 匹配前缀下所有键的 SCAN 模式，前缀中的通配符按字面匹配
fn prefix_pattern(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for c in prefix.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('*');
    pattern
}

#[async_trait]
impl ObjectCache for RedisObjectCache {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        let Some(mut conn) = self.connection().await else {
            return CacheResult::ExistsButNoValue;
        };

        match conn.get::<_, Option<String>>(self.make_key(key)).await {
            Ok(Some(data)) => CacheResult::Found(data),
            Ok(None) => CacheResult::NotFound,
            Err(e) => {
                error!("Failed to get cache key '{}': {}", key, e);
                CacheResult::ExistsButNoValue
            }
        }
    }

    async fn insert_raw(&self, key: String, value: String, ttl: u64) {
        let Some(mut conn) = self.connection().await else {
            return;
        };

        let ttl = self.effective_ttl(ttl);
        if let Err(e) = conn
            .set_ex::<_, _, ()>(self.make_key(&key), value, ttl)
            .await
        {
            error!("Failed to cache key '{}': {}", key, e);
        } else {
            debug!("Cached key {} for {}s", key, ttl);
        }
    }

    async fn remove(&self, key: &str) {
        let Some(mut conn) = self.connection().await else {
            return;
        };

        if let Err(e) = conn.del::<_, i64>(self.make_key(key)).await {
            error!("Failed to remove cache key '{}': {}", key, e);
        }
    }

    /// 删除本前缀下的全部键，不影响共用 Redis 的其他应用
    async fn invalidate_all(&self) {
        let Some(mut conn) = self.connection().await else {
            return;
        };

        let pattern = prefix_pattern(&self.key_prefix);
        let mut cursor: u64 = 0;
        let mut removed: i64 = 0;
        loop {
            let scanned = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async::<(u64, Vec<String>)>(&mut conn)
                .await;
            let (next, keys) = match scanned {
                Ok(batch) => batch,
                Err(e) => {
                    error!("Failed to scan cache keys: {}", e);
                    return;
                }
            };

            if !keys.is_empty() {
                match conn.del::<_, i64>(keys).await {
                    Ok(count) => removed += count,
                    Err(e) => error!("Failed to remove cache keys: {}", e),
                }
            }

            if next == 0 {
                break;
            }
            cursor = next;
        }

        info!("Invalidated {} Redis cache entries", removed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixed_key() {
        assert_eq!(prefixed_key("skilllink:", "user:42"), "skilllink:user:42");
    }

    #[test]
    fn test_prefix_pattern_escapes_glob() {
        assert_eq!(prefix_pattern("skilllink:"), "skilllink:*");
        assert_eq!(prefix_pattern("app[1]*:"), "app\\[1\\]\\*:*");
    }
}
