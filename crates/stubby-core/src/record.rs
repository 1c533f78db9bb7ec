use crate::shortcode::ShortCode;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Surrogate key assigned by a store on insert.
pub type LinkId = i64;

/// A stored short link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    /// Store-assigned id; larger ids are more recent.
    pub id: LinkId,
    /// The original URL that was shortened.
    pub original_url: String,
    /// The code the link resolves under.
    pub short_code: ShortCode,
    /// When the record was inserted.
    pub created_at: Timestamp,
    /// When the record stops resolving, if ever.
    pub valid_until: Option<Timestamp>,
}

impl LinkRecord {
    /// Whether the link still resolves at `now` (inclusive of the expiry instant).
    pub fn is_valid_at(&self, now: Timestamp) -> bool {
        self.valid_until.is_none_or(|until| until >= now)
    }

    /// Applies the fields present in `patch`, leaving the others untouched.
    pub fn apply(&mut self, patch: LinkPatch) {
        if let Some(url) = patch.original_url {
            self.original_url = url;
        }
        if let Some(valid_until) = patch.valid_until {
            self.valid_until = Some(valid_until);
        }
    }
}

/// A link about to be inserted; the store assigns its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub original_url: String,
    pub short_code: ShortCode,
    pub created_at: Timestamp,
    pub valid_until: Option<Timestamp>,
}

impl NewLink {
    pub fn into_record(self, id: LinkId) -> LinkRecord {
        LinkRecord {
            id,
            original_url: self.original_url,
            short_code: self.short_code,
            created_at: self.created_at,
            valid_until: self.valid_until,
        }
    }
}

/// Partial update of a link.
///
/// `None` means "leave unchanged"; a patch cannot clear `valid_until`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkPatch {
    pub original_url: Option<String>,
    pub valid_until: Option<Timestamp>,
}
