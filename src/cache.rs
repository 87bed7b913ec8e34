use std::time::{Duration, Instant};

use async_trait::async_trait;
use axum::body::Bytes;
use derive_more::{Deref, DerefMut};
use moka::future::Cache as MokaCache;
use moka::Expiry;

use crate::config::CacheConfig;
use crate::error::Error;

/// Key-value store holding the serialized document between requests.
///
/// `get` returning `Ok(None)` is the not-found sentinel; `Err` means the
/// backend itself is unreachable, which readers treat as a miss (fail open).
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Bytes>, Error>;
    async fn set(&self, key: &str, value: Bytes, ttl: Duration) -> Result<(), Error>;
    async fn delete(&self, key: &str) -> Result<(), Error>;
}

#[derive(Deref, DerefMut, Clone, Debug)]
pub struct MokaStore(pub MokaCache<String, (Bytes, Duration), ahash::RandomState>);

struct PerEntryTtl;

impl Expiry<String, (Bytes, Duration)> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &(Bytes, Duration),
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.1)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &(Bytes, Duration),
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.1)
    }
}

impl MokaStore {
    pub fn new(config: &CacheConfig) -> MokaStore {
        Self(
            MokaCache::builder()
                .name("calliope")
                .expire_after(PerEntryTtl)
                .weigher(|key: &String, (bytes, _): &(Bytes, Duration)| -> u32 {
                    (key.len() + bytes.len()) as u32
                })
                .max_capacity(config.size_limit * 1024 * 1024)
                .build_with_hasher(ahash::RandomState::new()),
        )
    }
}

#[async_trait]
impl CacheStore for MokaStore {
    async fn get(&self, key: &str) -> Result<Option<Bytes>, Error> {
        Ok(self.0.get(key).await.map(|(bytes, _)| bytes))
    }

    async fn set(&self, key: &str, value: Bytes, ttl: Duration) -> Result<(), Error> {
        self.0.insert(key.to_string(), (value, ttl)).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), Error> {
        self.0.invalidate(key).await;
        Ok(())
    }
}
