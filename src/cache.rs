use moka::future::Cache;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default lifetime of a cached report or image URL.
pub const DEFAULT_TTL: Duration = Duration::from_millis(60_000);

#[derive(Clone, Debug)]
pub struct CacheEntry<V> {
    pub value: V,
    pub stored_at: Instant,
}

impl<V> CacheEntry<V> {
    fn new(value: V) -> Self {
        Self {
            value,
            stored_at: Instant::now(),
        }
    }

    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.stored_at.elapsed() <= ttl
    }
}

/// String-keyed store whose entries expire `ttl` after they were written.
///
/// There is no capacity bound. Stale entries are dropped when a lookup finds
/// them; moka's own expiry reclaims the ones nobody asks for again.
#[derive(Clone)]
pub struct TtlCache<V> {
    cache: Cache<String, CacheEntry<V>>,
    ttl: Duration,
}

impl<V> TtlCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub fn new(ttl: Duration) -> Self {
        let cache = Cache::builder().time_to_live(ttl).build();
        Self { cache, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn lookup(&self, key: &str) -> Option<V> {
        let entry = self.cache.get(key).await?;
        if entry.is_fresh(self.ttl) {
            Some(entry.value)
        } else {
            self.cache.invalidate(key).await;
            None
        }
    }

    pub async fn store(&self, key: String, value: V) {
        self.cache.insert(key, CacheEntry::new(value)).await;
    }

    /// Cache-aside with single-flight: concurrent misses for the same key
    /// await one `init` future. Errors are shared with every waiter and never
    /// stored.
    pub async fn get_or_try_insert_with<F, E>(&self, key: String, init: F) -> Result<V, Arc<E>>
    where
        F: Future<Output = Result<V, E>>,
        E: Send + Sync + 'static,
    {
        if let Some(value) = self.lookup(&key).await {
            return Ok(value);
        }

        let entry = self
            .cache
            .try_get_with(key, async move { init.await.map(CacheEntry::new) })
            .await?;
        Ok(entry.value)
    }

    pub async fn entry_count(&self) -> u64 {
        self.cache.run_pending_tasks().await;
        self.cache.entry_count()
    }
}

impl<V> Default for TtlCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}
