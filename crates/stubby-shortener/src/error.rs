use stubby_core::{LinkId, StorageError};
use stubby_generator::GeneratorError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LinkError>;

#[derive(Debug, Clone, Error)]
pub enum LinkError {
    /// The id or code does not exist, or the link has expired.
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("no free short code after {attempts} attempts")]
    CodeSpaceExhausted { attempts: u32 },
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[from] StorageError),
}

impl LinkError {
    pub(crate) fn link_not_found(id: LinkId) -> Self {
        Self::NotFound(format!("link id={id} not found"))
    }
}

impl From<GeneratorError> for LinkError {
    fn from(value: GeneratorError) -> Self {
        Self::InvalidInput(value.to_string())
    }
}
