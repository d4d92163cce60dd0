use redis::{Client, RedisError, aio::ConnectionManager};
use serde::{Serialize, de::DeserializeOwned};
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct RedisCache {
    connection: ConnectionManager,
    config: CacheConfig,
}

impl RedisCache {
    pub async fn new(redis_url: &str, config: CacheConfig) -> Result<Self, RedisError> {
        let client = Client::open(redis_url)?;
        let connection = ConnectionManager::new(client).await?;
        Ok(Self { connection, config })
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Get a value from cache
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> redis::RedisResult<Option<T>> {
        let value: Option<String> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut self.connection.clone())
            .await?;

        match value {
            Some(v) => {
                let deserialized = serde_json::from_str(&v).map_err(|e| {
                    redis::RedisError::from((
                        redis::ErrorKind::TypeError,
                        "Deserialization error",
                        e.to_string(),
                    ))
                })?;
                Ok(Some(deserialized))
            }
            None => Ok(None),
        }
    }

    /// Set a value in cache with a TTL
    pub async fn set<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> redis::RedisResult<()> {
        let serialized = serde_json::to_string(value).map_err(|e| {
            redis::RedisError::from((
                redis::ErrorKind::TypeError,
                "Serialization error",
                e.to_string(),
            ))
        })?;

        redis::cmd("SET")
            .arg(key)
            .arg(serialized)
            .arg("EX")
            .arg(ttl.as_secs().max(1))
            .query_async(&mut self.connection.clone())
            .await
    }

    /// Delete multiple keys matching a pattern
    pub async fn delete_pattern(&self, pattern: &str) -> redis::RedisResult<()> {
        let keys: Vec<String> = redis::cmd("KEYS")
            .arg(pattern)
            .query_async(&mut self.connection.clone())
            .await?;

        if !keys.is_empty() {
            let _: () = redis::cmd("DEL")
                .arg(&keys)
                .query_async(&mut self.connection.clone())
                .await?;
        }

        Ok(())
    }

    /// Cached read: a cache miss or a Redis failure falls through to `load`.
    ///
    /// Redis problems are logged and never fail the request.
    pub async fn get_or_load<T, E, F, Fut>(&self, key: &str, ttl: Duration, load: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<T, E>>,
    {
        match self.get::<T>(key).await {
            Ok(Some(hit)) => return Ok(hit),
            Ok(None) => {}
            Err(e) => tracing::warn!(key, "Cache read failed: {e}"),
        }

        let value = load().await?;
        if let Err(e) = self.set(key, &value, ttl).await {
            tracing::warn!(key, "Cache write failed: {e}");
        }
        Ok(value)
    }

    /// Drop every cached entry under `prefix`; failures are only logged.
    pub async fn invalidate(&self, prefix: &str) {
        if let Err(e) = self.delete_pattern(&format!("{prefix}*")).await {
            tracing::warn!(prefix, "Cache invalidation failed: {e}");
        }
    }
}

/// Cache key generators
pub mod keys {
    pub const PARTIES_PREFIX: &str = "parties:";
    pub const PROMOTERS_PREFIX: &str = "promoters:";

    /// Party listing for a given search/page combination
    pub fn party_list(search: &str, page: u64, limit: u64) -> String {
        format!("{PARTIES_PREFIX}list:{search}:{page}:{limit}")
    }

    /// Promoter listing page
    pub fn promoter_list(page: u64, limit: u64) -> String {
        format!("{PROMOTERS_PREFIX}list:{page}:{limit}")
    }

    /// Dashboard contract counts
    pub fn dashboard_stats() -> String {
        "dashboard:stats".to_string()
    }
}

/// Cache configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub list_ttl: Duration,
    pub stats_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            list_ttl: Duration::from_secs(300), // 5 minutes
            stats_ttl: Duration::from_secs(30),
        }
    }
}

impl CacheConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            list_ttl: parse_duration_secs("CACHE_TTL_LISTS", defaults.list_ttl),
            stats_ttl: parse_duration_secs("CACHE_TTL_STATS", defaults.stats_ttl),
        }
    }
}

fn parse_duration_secs(env_var: &str, default: Duration) -> Duration {
    std::env::var(env_var)
        .ok()
        .and_then(|v| v.parse().ok())
        .map(Duration::from_secs)
        .unwrap_or(default)
}

/// Wrapper type for Actix-web app data
pub type CacheData = Arc<RedisCache>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_share_their_invalidation_prefix() {
        assert!(keys::party_list("falcon", 1, 20).starts_with(keys::PARTIES_PREFIX));
        assert!(keys::promoter_list(2, 50).starts_with(keys::PROMOTERS_PREFIX));
        assert_ne!(
            keys::party_list("", 1, 20),
            keys::party_list("", 2, 20)
        );
    }
}
