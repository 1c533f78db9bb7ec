use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Shortest code a caller may request.
pub const MIN_CODE_LENGTH: usize = 3;
/// Longest code a caller may request.
pub const MAX_CODE_LENGTH: usize = 64;
/// Length used when the request omits one or asks for an out-of-range value.
pub const DEFAULT_CODE_LENGTH: usize = 3;

/// Clamps a requested code length into the accepted range.
///
/// Out-of-range requests are not rejected: they fall back to
/// [`DEFAULT_CODE_LENGTH`], the same as an absent request.
pub fn normalize_code_length(requested: Option<i64>) -> usize {
    match requested {
        Some(len) if (MIN_CODE_LENGTH as i64..=MAX_CODE_LENGTH as i64).contains(&len) => {
            len as usize
        }
        _ => DEFAULT_CODE_LENGTH,
    }
}

/// A validated short code identifier for a shortened URL.
///
/// Short codes are 3-64 characters long and drawn from the URL-safe base64
/// alphabet (`A-Z a-z 0-9 - _`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ShortCode(String);

impl ShortCode {
    /// Creates a new `ShortCode` after validating the input.
    pub fn new(code: impl Into<String>) -> Result<Self, CoreError> {
        let code = code.into();
        Self::validate(&code)?;
        Ok(Self(code))
    }

    /// Creates a `ShortCode` without validation.
    ///
    /// Use this only for codes produced by trusted internal sources
    /// (the hash generator, or rows read back from a store).
    pub fn new_unchecked(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Generates the full shortened URL based on the provided base URL.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.0)
    }

    /// Returns the short code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of characters in the code.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn validate(code: &str) -> Result<(), CoreError> {
        if code.len() < MIN_CODE_LENGTH || code.len() > MAX_CODE_LENGTH {
            return Err(CoreError::InvalidShortCode(format!(
                "length must be between {} and {}, got {}",
                MIN_CODE_LENGTH,
                MAX_CODE_LENGTH,
                code.len()
            )));
        }

        if !code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(CoreError::InvalidShortCode(format!(
                "must contain only alphanumeric characters, hyphens, or underscores: '{}'",
                code
            )));
        }

        Ok(())
    }
}

impl TryFrom<String> for ShortCode {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ShortCode> for String {
    fn from(code: ShortCode) -> Self {
        code.0
    }
}

impl Display for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
