use crate::record::LinkRecord;
use crate::shortcode::ShortCode;
use async_trait::async_trait;

/// A process-local cache of code → link record for the redirect path.
///
/// The cache is a shadow of the store: it never owns a record, and every
/// mutation of a stored link must be followed by [`invalidate`] for its code.
/// Implementations must be safe to share across concurrent requests and must
/// never hand out a partially written record.
///
/// [`invalidate`]: ResolutionCache::invalidate
#[async_trait]
pub trait ResolutionCache: Send + Sync + 'static {
    /// Returns the cached record if present and not yet expired.
    ///
    /// A record whose `valid_until` is at or before the current instant is
    /// treated as absent.
    async fn get(&self, code: &ShortCode) -> Option<LinkRecord>;

    /// Stores or overwrites the record cached under `code`.
    async fn put(&self, code: &ShortCode, record: LinkRecord);

    /// Removes the record cached under `code`.
    ///
    /// It is not an error if the key does not exist.
    async fn invalidate(&self, code: &ShortCode);
}
