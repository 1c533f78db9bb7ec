//! Core types and traits for the Stubby URL shortener.
//!
//! This crate provides the shared vocabulary used by the generator, the
//! resolution cache, the link stores and the link service: the persisted
//! [`LinkRecord`], the validated [`ShortCode`], the [`Clock`] abstraction
//! and the [`LinkStore`] / [`ResolutionCache`] seams.

pub mod cache;
pub mod clock;
pub mod error;
pub mod record;
pub mod shortcode;
pub mod store;

pub use cache::ResolutionCache;
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{CoreError, StorageError};
pub use record::{LinkId, LinkPatch, LinkRecord, NewLink};
pub use shortcode::{
    normalize_code_length, ShortCode, DEFAULT_CODE_LENGTH, MAX_CODE_LENGTH, MIN_CODE_LENGTH,
};
pub use store::{LinkStore, ReadLinkStore};
