//! Link store implementations.
//!
//! The store contract lives in `stubby_core::store`; this crate provides an
//! in-memory backend and a SQLite backend.

pub mod memory;
pub mod sqlite;

pub use memory::InMemoryLinkStore;
pub use sqlite::SqliteLinkStore;
pub use stubby_core::{LinkStore, ReadLinkStore, StorageError};
