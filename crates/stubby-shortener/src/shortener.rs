use crate::error::Result;
use async_trait::async_trait;
use jiff::Timestamp;
use stubby_core::{LinkId, LinkPatch, LinkRecord, ShortCode};

/// Parameters for creating a shortened URL.
#[derive(Debug, Clone)]
pub struct ShortenParams {
    /// The original URL to be shortened.
    pub original_url: String,
    /// When the link stops resolving, if ever.
    pub valid_until: Option<Timestamp>,
    /// Requested code length; out-of-range values fall back to the default.
    pub length: Option<i64>,
}

impl ShortenParams {
    pub fn new(original_url: impl Into<String>) -> Self {
        Self {
            original_url: original_url.into(),
            valid_until: None,
            length: None,
        }
    }

    pub fn valid_until(mut self, valid_until: Timestamp) -> Self {
        self.valid_until = Some(valid_until);
        self
    }

    pub fn length(mut self, length: i64) -> Self {
        self.length = Some(length);
        self
    }
}

/// The operations the HTTP layer needs from the link service.
#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Creates a shortened URL, or returns the code already assigned to the
    /// same URL.
    async fn shorten(&self, params: ShortenParams) -> Result<ShortCode>;

    /// Fetches one link by id.
    async fn get(&self, id: LinkId) -> Result<LinkRecord>;

    /// Lists every stored link.
    async fn list(&self) -> Result<Vec<LinkRecord>>;

    /// Applies a partial update and returns the stored result.
    async fn update(&self, id: LinkId, patch: LinkPatch) -> Result<LinkRecord>;

    /// Deletes a link by id.
    async fn delete(&self, id: LinkId) -> Result<()>;

    /// Resolves a short code to the URL to redirect to.
    /// Fails with `NotFound` if the code does not exist or has expired.
    async fn resolve(&self, code: &ShortCode) -> Result<String>;
}
