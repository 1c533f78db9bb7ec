use async_trait::async_trait;
use dashmap::DashMap;
use jiff::Timestamp;
use std::sync::atomic::{AtomicI64, Ordering};
use stubby_core::store::Result;
use stubby_core::{LinkId, LinkRecord, LinkStore, NewLink, ReadLinkStore, ShortCode};

/// In-memory implementation of the link store using DashMap.
///
/// DashMap provides better concurrency than RwLock<HashMap> because it
/// uses sharded locks, allowing concurrent reads and writes to different
/// buckets without blocking. Ids come from an atomic counter and are never
/// reused, so "latest" lookups can rely on id order.
#[derive(Debug)]
pub struct InMemoryLinkStore {
    links: DashMap<LinkId, LinkRecord>,
    next_id: AtomicI64,
}

impl InMemoryLinkStore {
    /// Creates a new, empty store.
    pub fn new() -> Self {
        Self {
            links: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }

    /// Creates a new store with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            links: DashMap::with_capacity(capacity),
            next_id: AtomicI64::new(1),
        }
    }

    /// Number of stored links.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    fn latest_where(&self, predicate: impl Fn(&LinkRecord) -> bool) -> Option<LinkRecord> {
        self.links
            .iter()
            .filter(|entry| predicate(entry.value()))
            .max_by_key(|entry| *entry.key())
            .map(|entry| entry.value().clone())
    }
}

impl Default for InMemoryLinkStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReadLinkStore for InMemoryLinkStore {
    async fn get_link_by_id(&self, id: LinkId) -> Result<Option<LinkRecord>> {
        Ok(self.links.get(&id).map(|entry| entry.value().clone()))
    }

    async fn find_latest_by_code(&self, code: &ShortCode) -> Result<Option<LinkRecord>> {
        Ok(self.latest_where(|record| &record.short_code == code))
    }

    async fn find_latest_by_original_url(&self, url: &str) -> Result<Option<LinkRecord>> {
        Ok(self.latest_where(|record| record.original_url == url))
    }

    async fn find_latest_valid_by_code(
        &self,
        code: &ShortCode,
        now: Timestamp,
    ) -> Result<Option<LinkRecord>> {
        Ok(self.latest_where(|record| &record.short_code == code && record.is_valid_at(now)))
    }

    async fn list_links(&self) -> Result<Vec<LinkRecord>> {
        let mut links: Vec<LinkRecord> = self
            .links
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        links.sort_by_key(|record| record.id);
        Ok(links)
    }
}

#[async_trait]
impl LinkStore for InMemoryLinkStore {
    async fn insert_link(&self, link: NewLink) -> Result<LinkId> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.links.insert(id, link.into_record(id));
        Ok(id)
    }

    async fn update_link(&self, record: &LinkRecord) -> Result<bool> {
        match self.links.get_mut(&record.id) {
            Some(mut entry) => {
                *entry = record.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_link(&self, id: LinkId) -> Result<bool> {
        Ok(self.links.remove(&id).is_some())
    }
}
