use crate::error::StorageError;
use crate::record::{LinkId, LinkRecord, NewLink};
use crate::shortcode::ShortCode;
use async_trait::async_trait;
use jiff::Timestamp;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// A read-only view of a link store.
///
/// Every `find_latest_*` lookup returns the matching record with the
/// highest id.
#[async_trait]
pub trait ReadLinkStore: Send + Sync + 'static {
    /// Retrieves a record by id.
    async fn get_link_by_id(&self, id: LinkId) -> Result<Option<LinkRecord>>;

    /// Most recent record stored under `code`, expired or not.
    async fn find_latest_by_code(&self, code: &ShortCode) -> Result<Option<LinkRecord>>;

    /// Most recent record pointing at `url`, expired or not.
    async fn find_latest_by_original_url(&self, url: &str) -> Result<Option<LinkRecord>>;

    /// Most recent record stored under `code` that is still valid at `now`
    /// (`valid_until` unset or `>= now`).
    async fn find_latest_valid_by_code(
        &self,
        code: &ShortCode,
        now: Timestamp,
    ) -> Result<Option<LinkRecord>>;

    /// All records, ordered by ascending id.
    async fn list_links(&self) -> Result<Vec<LinkRecord>>;
}

#[async_trait]
pub trait LinkStore: ReadLinkStore {
    /// Inserts a new link and returns the id assigned to it.
    async fn insert_link(&self, link: NewLink) -> Result<LinkId>;

    /// Overwrites the stored record with the same id.
    /// Returns `false` if no such record exists.
    async fn update_link(&self, record: &LinkRecord) -> Result<bool>;

    /// Deletes the record with the given id.
    /// Returns `true` if the record existed and was removed.
    async fn delete_link(&self, id: LinkId) -> Result<bool>;
}
