use crate::{Generator, GeneratorError};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use jiff::Timestamp;
use sha2::{Digest, Sha512};
use stubby_core::ShortCode;

/// Characters available from one encoded SHA-512 digest (64 bytes, unpadded).
pub const DIGEST_CODE_LENGTH: usize = 86;

/// Derives codes from `SHA-512(url ++ epoch_seconds)` encoded as URL-safe
/// base64.
///
/// The timestamp is rendered as Unix seconds with a microsecond fraction,
/// e.g. `1700000000.123456`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HashGenerator;

impl HashGenerator {
    pub fn new() -> Self {
        Self
    }
}

fn epoch_seconds(timestamp: Timestamp) -> f64 {
    timestamp.as_microsecond() as f64 / 1_000_000.0
}

impl Generator for HashGenerator {
    fn generate(
        &self,
        original_url: &str,
        timestamp: Timestamp,
        length: usize,
    ) -> Result<ShortCode, GeneratorError> {
        if length == 0 || length > DIGEST_CODE_LENGTH {
            return Err(GeneratorError::InvalidLength {
                length,
                max: DIGEST_CODE_LENGTH,
            });
        }

        let mut hasher = Sha512::new();
        hasher.update(original_url.as_bytes());
        hasher.update(epoch_seconds(timestamp).to_string().as_bytes());
        let mut encoded = URL_SAFE_NO_PAD.encode(hasher.finalize());
        encoded.truncate(length);

        Ok(ShortCode::new_unchecked(encoded))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::SignedDuration;

    fn ts(micros: i64) -> Timestamp {
        Timestamp::from_microsecond(micros).unwrap()
    }

    #[test]
    fn known_answers() {
        let generator = HashGenerator::new();

        let code = generator
            .generate("https://example.com", ts(1_700_000_000_500_000), 7)
            .unwrap();
        assert_eq!(code.as_str(), "3n0dVa-");

        let code = generator
            .generate("https://example.com", ts(1_700_000_000_123_456), 12)
            .unwrap();
        assert_eq!(code.as_str(), "kkl_X502nCkv");
    }

    #[test]
    fn is_deterministic() {
        let generator = HashGenerator::new();
        let at = ts(1_712_345_678_901_234);

        for length in [3, 5, 17, 64] {
            let first = generator.generate("https://example.com/a", at, length).unwrap();
            let second = generator.generate("https://example.com/a", at, length).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn output_has_requested_length() {
        let generator = HashGenerator::new();
        let at = Timestamp::now();

        for length in 1..=DIGEST_CODE_LENGTH {
            let code = generator.generate("https://example.com", at, length).unwrap();
            assert_eq!(code.len(), length);
        }
    }

    #[test]
    fn shorter_codes_are_prefixes() {
        let generator = HashGenerator::new();
        let at = ts(1_700_000_000_000_001);

        let long = generator.generate("https://example.com", at, 64).unwrap();
        let short = generator.generate("https://example.com", at, 5).unwrap();
        assert!(long.as_str().starts_with(short.as_str()));
    }

    #[test]
    fn output_is_a_valid_short_code() {
        let generator = HashGenerator::new();
        let mut at = ts(1_700_000_000_000_000);

        for _ in 0..200 {
            let code = generator.generate("https://example.com", at, 64).unwrap();
            assert!(ShortCode::new(code.as_str()).is_ok(), "{code}");
            at += SignedDuration::from_micros(1);
        }
    }

    #[test]
    fn changing_timestamp_changes_code() {
        let generator = HashGenerator::new();
        let at = ts(1_700_000_000_000_000);

        let first = generator.generate("https://example.com", at, 16).unwrap();
        let second = generator
            .generate("https://example.com", at + SignedDuration::from_micros(1), 16)
            .unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn rejects_invalid_lengths() {
        let generator = HashGenerator::new();
        let at = Timestamp::now();

        assert_eq!(
            generator.generate("https://example.com", at, 0).unwrap_err(),
            GeneratorError::InvalidLength { length: 0, max: 86 }
        );
        assert!(generator
            .generate("https://example.com", at, DIGEST_CODE_LENGTH + 1)
            .is_err());
    }
}
