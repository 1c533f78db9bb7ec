//! Short code generation.
//!
//! Codes are derived from the original URL and the instant of creation, so
//! the same inputs always give the same code. Callers escape a collision by
//! generating again with a different timestamp.

pub mod hash;

pub use hash::{HashGenerator, DIGEST_CODE_LENGTH};

use jiff::Timestamp;
use stubby_core::ShortCode;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeneratorError {
    #[error("invalid code length {length}; expected 1..={max}")]
    InvalidLength { length: usize, max: usize },
}

/// Trait for generating short codes.
///
/// Implementations are pure: they don't interact with storage, and the
/// output depends only on the arguments.
pub trait Generator: Send + Sync + 'static {
    /// Derives a code of exactly `length` characters.
    fn generate(
        &self,
        original_url: &str,
        timestamp: Timestamp,
        length: usize,
    ) -> Result<ShortCode, GeneratorError>;
}
