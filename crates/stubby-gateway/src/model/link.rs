use jiff::Timestamp;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use stubby_core::{LinkId, LinkPatch, LinkRecord};

use crate::state::AppState;

/// Body of `POST /shorten`.
#[derive(Debug, Deserialize)]
pub struct ShortenRequest {
    pub url: String,
    pub valid_until: Option<Timestamp>,
    /// Requested code length; values outside 3..=64 fall back to 3.
    #[serde(default, deserialize_with = "lenient_length")]
    pub short_len: Option<i64>,
}

/// Stand-in for numbers that are not an `i64` integer. Never a valid length.
const UNUSABLE_LENGTH: i64 = 0;

/// Accepts any JSON number for a length. Whole floats become integers, and
/// numbers that do not fit or have a fraction map to [`UNUSABLE_LENGTH`], so
/// the service falls back to its default instead of the request failing.
fn lenient_length<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    struct LengthVisitor;

    impl<'de> Visitor<'de> for LengthVisitor {
        type Value = Option<i64>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a number or null")
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
            deserializer.deserialize_any(self)
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
            Ok(Some(value))
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
            Ok(Some(i64::try_from(value).unwrap_or(UNUSABLE_LENGTH)))
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
            if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
                Ok(Some(value as i64))
            } else {
                Ok(Some(UNUSABLE_LENGTH))
            }
        }
    }

    deserializer.deserialize_any(LengthVisitor)
}

#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub short_code: String,
    pub short_url: String,
}

/// Body of `PUT /links/{id}`. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateLinkRequest {
    pub url: Option<String>,
    pub valid_until: Option<Timestamp>,
}

impl From<UpdateLinkRequest> for LinkPatch {
    fn from(value: UpdateLinkRequest) -> Self {
        LinkPatch {
            original_url: value.url,
            valid_until: value.valid_until,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub id: LinkId,
    pub original_url: String,
    pub short_code: String,
    pub short_url: String,
    pub created_at: Timestamp,
    pub valid_until: Option<Timestamp>,
}

impl LinkResponse {
    pub fn new(state: &AppState, record: LinkRecord) -> Self {
        Self {
            id: record.id,
            short_url: state.short_url(&record.short_code),
            short_code: record.short_code.into(),
            original_url: record.original_url,
            created_at: record.created_at,
            valid_until: record.valid_until,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteLinkResponse {
    pub ok: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn short_len(body: &str) -> Option<i64> {
        serde_json::from_str::<ShortenRequest>(body).unwrap().short_len
    }

    #[test]
    fn short_len_is_optional() {
        assert_eq!(short_len(r#"{"url":"https://a.example"}"#), None);
        assert_eq!(short_len(r#"{"url":"https://a.example","short_len":null}"#), None);
    }

    #[test]
    fn short_len_accepts_integers_and_whole_floats() {
        assert_eq!(short_len(r#"{"url":"https://a.example","short_len":5}"#), Some(5));
        assert_eq!(short_len(r#"{"url":"https://a.example","short_len":-7}"#), Some(-7));
        assert_eq!(short_len(r#"{"url":"https://a.example","short_len":5.0}"#), Some(5));
    }

    #[test]
    fn unusable_numbers_become_out_of_range() {
        for value in ["99999999999999999999", "1e20", "18446744073709551615", "5.5", "-1e300"] {
            let body = format!(r#"{{"url":"https://a.example","short_len":{value}}}"#);
            assert_eq!(short_len(&body), Some(UNUSABLE_LENGTH), "{value}");
        }
    }

    #[test]
    fn non_numeric_short_len_is_rejected() {
        let body = r#"{"url":"https://a.example","short_len":"five"}"#;
        assert!(serde_json::from_str::<ShortenRequest>(body).is_err());
    }
}
