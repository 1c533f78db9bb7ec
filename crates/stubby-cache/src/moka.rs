use async_trait::async_trait;
use moka::future::Cache;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use stubby_core::{Clock, LinkRecord, ResolutionCache, ShortCode, SystemClock};
use tracing::{debug, trace};
use typed_builder::TypedBuilder;

/// Default bound on the number of cached links.
pub const DEFAULT_MAX_CAPACITY: u64 = 10_000;

/// An in-memory resolution cache backed by Moka.
///
/// Moka gives per-key linearizable reads and writes across threads and
/// bounds the cache by entry count. On top of that, `get` applies lazy
/// expiry against each record's `valid_until` using the configured clock.
/// Expired entries are left in place until they are overwritten,
/// invalidated or evicted.
#[derive(Clone)]
pub struct MokaResolutionCache {
    cache: Cache<String, LinkRecord>,
    clock: Arc<dyn Clock>,
}

impl MokaResolutionCache {
    /// Creates a cache holding at most [`DEFAULT_MAX_CAPACITY`] entries.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_CAPACITY)
    }

    /// Creates a cache with a custom maximum capacity.
    pub fn with_capacity(max_capacity: u64) -> Self {
        CacheConfig::builder().max_capacity(max_capacity).build().into()
    }

    /// Creates a cache whose entries also drop out `ttl` after insertion,
    /// regardless of the link's own expiry.
    pub fn with_ttl(max_capacity: u64, ttl: Duration) -> Self {
        CacheConfig::builder()
            .max_capacity(max_capacity)
            .ttl(ttl)
            .build()
            .into()
    }

    /// Returns a builder for creating a custom cache configuration.
    pub fn builder() -> CacheConfigBuilder {
        CacheConfig::builder()
    }

    /// Number of entries currently held, including expired ones not yet
    /// evicted. Moka updates this lazily.
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

impl Default for MokaResolutionCache {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MokaResolutionCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MokaResolutionCache")
            .field("entry_count", &self.cache.entry_count())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ResolutionCache for MokaResolutionCache {
    async fn get(&self, code: &ShortCode) -> Option<LinkRecord> {
        let Some(record) = self.cache.get(code.as_str()).await else {
            trace!(code = %code, "resolution cache miss");
            return None;
        };

        // Strictly in the future: a link expiring right now is not served.
        if record
            .valid_until
            .is_some_and(|until| until <= self.clock.now())
        {
            debug!(code = %code, "cached link has expired");
            return None;
        }

        trace!(code = %code, "resolution cache hit");
        Some(record)
    }

    async fn put(&self, code: &ShortCode, record: LinkRecord) {
        self.cache.insert(code.as_str().to_owned(), record).await;
        trace!(code = %code, "cached link");
    }

    async fn invalidate(&self, code: &ShortCode) {
        self.cache.invalidate(code.as_str()).await;
        debug!(code = %code, "invalidated cached link (if present)");
    }
}

/// Configuration for creating a [`MokaResolutionCache`].
#[derive(TypedBuilder)]
pub struct CacheConfig {
    /// Maximum number of entries the cache can hold.
    #[builder(default = DEFAULT_MAX_CAPACITY)]
    max_capacity: u64,
    /// Time-to-live for cache entries.
    #[builder(default, setter(strip_option))]
    ttl: Option<Duration>,
    /// Clock used for lazy expiry.
    #[builder(default = Arc::new(SystemClock) as Arc<dyn Clock>)]
    clock: Arc<dyn Clock>,
}

impl From<CacheConfig> for MokaResolutionCache {
    fn from(config: CacheConfig) -> Self {
        let mut builder = Cache::builder().max_capacity(config.max_capacity);

        if let Some(ttl) = config.ttl {
            builder = builder.time_to_live(ttl);
        }

        MokaResolutionCache {
            cache: builder.build(),
            clock: config.clock,
        }
    }
}
