//! Read-through redis cache for slow-moving reference data.
//!
//! The cache never fails a request: every error is logged and treated as a
//! miss, so a broken or missing redis never takes the API down with it.
//! Administrators can switch the cache off and back on at runtime.

#[macro_use]
extern crate lazy_static;

#[macro_use]
extern crate serde_derive;

use std::fmt::{Debug, Display};

use deadpool_redis::cmd;
use deadpool_redis::Connection;
use deadpool_redis::Pool as RedisPool;
use redis::RedisError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, error};

mod stats;

pub use stats::Stats;

/// cached objects expire after 6 hours, admins can force
/// earlier refreshes by updating the object through the API
const DEFAULT_TTL_SECONDS: i32 = 3600 * 6;

lazy_static! {
    static ref CACHE: RwLock<Cache> = RwLock::new(Cache::empty());
    static ref CONFIGURED_URL: RwLock<Option<String>> = RwLock::new(None);
}

pub struct Cache {
    pool: Option<RedisPool>,
    ttl: i32,
}

#[derive(Serialize, Debug)]
pub struct CacheStatus {
    /// true when a redis url has been configured and accepted
    pub enabled: bool,
    /// true when the cache is disabled, or enabled and reachable
    pub healthy: bool,
}

/// Types that can be cached know how to derive their own cache key.
pub trait CacheIdentifier {
    fn cache_key<T: Display>(id: T) -> String;
}

impl Cache {
    fn empty() -> Self {
        Cache {
            pool: None,
            ttl: DEFAULT_TTL_SECONDS,
        }
    }

    /// Connect the cache to redis.
    ///
    /// The url is remembered so the cache can be re-enabled later
    /// without having to pass it around again.
    pub async fn init(url: String) -> Result<(), RedisError> {
        let cfg = deadpool_redis::Config {
            url: Some(url.clone()),
            ..Default::default()
        };

        let pool = cfg.create_pool()?;

        let mut cache = CACHE.write().await;
        cache.pool = Some(pool);

        let mut configured = CONFIGURED_URL.write().await;
        *configured = Some(url);

        Ok(())
    }

    /// returns true when the cache is connected and ready for usage
    pub async fn is_enabled() -> bool {
        CACHE.read().await.pool.is_some()
    }

    #[tracing::instrument]
    async fn connection() -> Option<Connection> {
        let cache = CACHE.read().await;

        match cache.pool.as_ref()?.get().await {
            Ok(connection) => Some(connection),
            Err(err) => {
                error!("unable to get cache connection: {}", err);
                None
            }
        }
    }

    #[tracing::instrument(name = "cache::get")]
    pub async fn get<T: DeserializeOwned + CacheIdentifier, I: Display + Debug>(
        id: I,
    ) -> Option<T> {
        let mut conn = Cache::connection().await?;
        let cache_key = T::cache_key(id);

        let res: Result<Vec<u8>, RedisError> =
            cmd("GET").arg(&cache_key).query_async(&mut conn).await;

        match res {
            Ok(res) => {
                let cache_hit = serde_json::from_slice::<T>(&res).ok();

                if cache_hit.is_some() {
                    Stats::record_hit();
                    debug!("found {} in cache", &cache_key);
                } else {
                    Stats::record_miss();
                }

                cache_hit
            }
            Err(err) => {
                error!("unable to fetch {} from cache: {}", &cache_key, err);
                None
            }
        }
    }

    #[tracing::instrument(name = "cache::set", skip(object))]
    pub async fn set<T: Serialize + CacheIdentifier, I: Display + Debug>(object: &T, id: I) {
        let mut conn = match Cache::connection().await {
            Some(conn) => conn,
            None => return,
        };

        let cache_key = T::cache_key(id);

        let payload = match serde_json::to_vec(object) {
            Ok(res) => res,
            Err(err) => {
                error!("unable to serialize {} for the cache: {}", &cache_key, err);
                return;
            }
        };

        let ttl = CACHE.read().await.ttl;

        let res = cmd("SETEX")
            .arg(&cache_key)
            .arg(ttl)
            .arg(payload)
            .execute_async(&mut conn)
            .await;

        if let Err(err) = res {
            error!("unable to store {} in cache: {}", &cache_key, err);
        }
    }

    #[tracing::instrument(name = "cache::delete")]
    pub async fn delete(cache_key: String) {
        let mut conn = match Cache::connection().await {
            Some(conn) => conn,
            None => return,
        };

        let res = cmd("DEL").arg(&cache_key).execute_async(&mut conn).await;

        if let Err(err) = res {
            error!("unable to delete {} from cache: {}", &cache_key, err);
        }
    }

    /// Drop the connection pool, turning every get into a miss.
    pub async fn disable() {
        let mut cache = CACHE.write().await;

        cache.pool = None;
    }

    /// Reconnect using the url that `init` stored.
    pub async fn enable() -> Result<(), RedisError> {
        let url = CONFIGURED_URL.read().await.clone();

        match url {
            Some(url) => Cache::init(url).await,
            None => Err(RedisError::from((
                redis::ErrorKind::InvalidClientConfig,
                "no redis url was configured at startup",
            ))),
        }
    }

    pub async fn status() -> CacheStatus {
        let enabled = Cache::is_enabled().await;
        let mut healthy = true;
        if enabled {
            healthy = Cache::connection().await.is_some();
        }
        CacheStatus { enabled, healthy }
    }
}
