//! Link service: creation with dedup and collision retry, CRUD, and the
//! cached redirect path.

pub mod error;
pub mod service;
pub mod shortener;

pub use error::{LinkError, Result};
pub use service::{LinkService, ServiceConfig, DEFAULT_MAX_ATTEMPTS};
pub use shortener::{ShortenParams, Shortener};
