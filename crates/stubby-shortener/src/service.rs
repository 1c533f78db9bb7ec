use crate::error::{LinkError, Result};
use crate::shortener::{ShortenParams, Shortener};
use async_trait::async_trait;
use jiff::{SignedDuration, Timestamp};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use stubby_core::{
    normalize_code_length, Clock, LinkId, LinkPatch, LinkRecord, LinkStore, NewLink,
    ResolutionCache, ShortCode, SystemClock,
};
use stubby_generator::{Generator, HashGenerator};
use tracing::{debug, info, trace, warn};
use typed_builder::TypedBuilder;
use url::Url;

/// Default cap on generated candidates per create.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 1000;

/// Tunables for [`LinkService`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct ServiceConfig {
    /// How many candidate codes a create may generate before giving up
    /// with `CodeSpaceExhausted`.
    #[builder(default = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: u32,
    /// Codes that must never be handed out, such as path segments the HTTP
    /// layer routes elsewhere. Generated candidates matching one are
    /// treated as collisions.
    #[builder(default, setter(into))]
    pub reserved_codes: Vec<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// The link service.
///
/// This service composes a [`LinkStore`], a [`ResolutionCache`] and a
/// [`Generator`] to handle:
/// - creation, deduplicated by original URL, with collision retry
/// - partial updates and deletes that invalidate the cache
/// - resolution of codes, cache first and store second
///
/// The cache is owned by the service for its whole lifetime; every path
/// that changes a stored link invalidates the cached copy after the store
/// call returns.
pub struct LinkService<S, C, G = HashGenerator> {
    store: Arc<S>,
    cache: Arc<C>,
    generator: G,
    clock: Arc<dyn Clock>,
    config: ServiceConfig,
    /// Bumped after every stored change, so a resolve that raced one can
    /// drop the record it just cached.
    revision: AtomicU64,
}

impl<S: LinkStore, C: ResolutionCache> LinkService<S, C> {
    /// Creates a service using the hash generator, the system clock and the
    /// default configuration.
    pub fn new(store: S, cache: C) -> Self {
        Self {
            store: Arc::new(store),
            cache: Arc::new(cache),
            generator: HashGenerator::new(),
            clock: Arc::new(SystemClock),
            config: ServiceConfig::default(),
            revision: AtomicU64::new(0),
        }
    }
}

impl<S: LinkStore, C: ResolutionCache, G: Generator> LinkService<S, C, G> {
    /// Replaces the code generator.
    pub fn with_generator<H: Generator>(self, generator: H) -> LinkService<S, C, H> {
        LinkService {
            store: self.store,
            cache: self.cache,
            generator,
            clock: self.clock,
            config: self.config,
            revision: self.revision,
        }
    }

    /// Replaces the clock used for timestamps and expiry checks.
    pub fn with_clock(mut self, clock: impl Clock) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn with_config(mut self, config: ServiceConfig) -> Self {
        self.config = config;
        self
    }

    /// Validates that the URL is absolute, uses http(s) and names a host.
    fn validate_url(url: &str) -> Result<()> {
        let parsed = Url::parse(url)
            .map_err(|e| LinkError::InvalidInput(format!("invalid url '{url}': {e}")))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(LinkError::InvalidInput(format!(
                "URL scheme must be http or https: {}",
                parsed.scheme()
            )));
        }

        if parsed.host().is_none() {
            return Err(LinkError::InvalidInput(format!("URL has no host: {url}")));
        }

        Ok(())
    }

    /// Generates candidates until one is neither reserved nor taken in the
    /// store.
    ///
    /// Each retry hashes a strictly later timestamp (at microsecond
    /// resolution) at the same length.
    async fn next_free_code(&self, original_url: &str, length: usize) -> Result<ShortCode> {
        let mut timestamp = self.clock.now();

        for attempt in 1..=self.config.max_attempts {
            let candidate = self.generator.generate(original_url, timestamp, length)?;

            let reserved = self.is_reserved(&candidate);
            if !reserved && self.store.find_latest_by_code(&candidate).await?.is_none() {
                return Ok(candidate);
            }

            warn!(code = %candidate, attempt, reserved, "short code collision, regenerating");
            timestamp = next_timestamp(timestamp, self.clock.now());
        }

        Err(LinkError::CodeSpaceExhausted {
            attempts: self.config.max_attempts,
        })
    }

    fn is_reserved(&self, code: &ShortCode) -> bool {
        self.config
            .reserved_codes
            .iter()
            .any(|reserved| reserved == code.as_str())
    }

    /// Drops `code` from the cache once a stored change has landed.
    async fn forget(&self, code: &ShortCode) {
        self.revision.fetch_add(1, Ordering::SeqCst);
        self.cache.invalidate(code).await;
    }

    async fn find(&self, id: LinkId) -> Result<LinkRecord> {
        self.store
            .get_link_by_id(id)
            .await?
            .ok_or_else(|| LinkError::link_not_found(id))
    }
}

/// The hash input only carries microseconds, so a re-sampled instant that
/// does not move past the previous microsecond is bumped by one.
fn next_timestamp(previous: Timestamp, sampled: Timestamp) -> Timestamp {
    if sampled.as_microsecond() > previous.as_microsecond() {
        sampled
    } else {
        previous + SignedDuration::from_micros(1)
    }
}

#[async_trait]
impl<S: LinkStore, C: ResolutionCache, G: Generator> Shortener for LinkService<S, C, G> {
    async fn shorten(&self, params: ShortenParams) -> Result<ShortCode> {
        Self::validate_url(&params.original_url)?;
        let length = normalize_code_length(params.length);

        // An existing link for the same URL wins over the requested length.
        if let Some(existing) = self
            .store
            .find_latest_by_original_url(&params.original_url)
            .await?
        {
            debug!(id = existing.id, code = %existing.short_code, "reusing existing link");
            return Ok(existing.short_code);
        }

        let short_code = self.next_free_code(&params.original_url, length).await?;

        let id = self
            .store
            .insert_link(NewLink {
                original_url: params.original_url,
                short_code: short_code.clone(),
                created_at: self.clock.now(),
                valid_until: params.valid_until,
            })
            .await?;

        info!(id, code = %short_code, "created short link");
        Ok(short_code)
    }

    async fn get(&self, id: LinkId) -> Result<LinkRecord> {
        self.find(id).await
    }

    async fn list(&self) -> Result<Vec<LinkRecord>> {
        Ok(self.store.list_links().await?)
    }

    async fn update(&self, id: LinkId, patch: LinkPatch) -> Result<LinkRecord> {
        let mut record = self.find(id).await?;

        if let Some(url) = &patch.original_url {
            Self::validate_url(url)?;
        }
        record.apply(patch);

        if !self.store.update_link(&record).await? {
            return Err(LinkError::link_not_found(id));
        }
        // The code never changes, but the cached target or expiry may now be stale.
        self.forget(&record.short_code).await;
        info!(id, code = %record.short_code, "updated short link");

        self.find(id).await
    }

    async fn delete(&self, id: LinkId) -> Result<()> {
        let record = self.find(id).await?;

        if !self.store.delete_link(id).await? {
            return Err(LinkError::link_not_found(id));
        }
        self.forget(&record.short_code).await;
        info!(id, code = %record.short_code, "deleted short link");

        Ok(())
    }

    async fn resolve(&self, code: &ShortCode) -> Result<String> {
        trace!(code = %code, "resolving short code");

        if let Some(record) = self.cache.get(code).await {
            debug!(code = %code, url = %record.original_url, "resolved from cache");
            return Ok(record.original_url);
        }

        let revision = self.revision.load(Ordering::SeqCst);
        let now = self.clock.now();
        let Some(record) = self.store.find_latest_valid_by_code(code, now).await? else {
            trace!(code = %code, "short code not found or expired");
            return Err(LinkError::NotFound(
                "the link does not exist or has expired".to_string(),
            ));
        };

        self.cache.put(code, record.clone()).await;
        if self.revision.load(Ordering::SeqCst) != revision {
            // A change landed after the store read; what was cached may be stale.
            debug!(code = %code, "link changed during resolve, dropping cached copy");
            self.cache.invalidate(code).await;
        }
        debug!(code = %code, url = %record.original_url, "resolved from store");
        Ok(record.original_url)
    }
}
