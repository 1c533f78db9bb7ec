//! Resolution cache implementations.

pub mod moka;

pub use crate::moka::{CacheConfig, MokaResolutionCache, DEFAULT_MAX_CAPACITY};
