use crate::error::{AppError, Result};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::header::LOCATION;
use axum::http::{HeaderValue, StatusCode};
use axum::response::IntoResponse;
use stubby_core::ShortCode;
use stubby_shortener::LinkError;
use url::Url;

/// Resolves `code` and answers with a 307 to the original URL.
///
/// Codes that cannot exist (wrong length or alphabet) are reported as not
/// found, the same as unknown or expired ones.
pub async fn redirect_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<impl IntoResponse> {
    let code = ShortCode::new(code)
        .map_err(|_| LinkError::NotFound("the link does not exist or has expired".to_string()))?;

    let target = state.shortener().resolve(&code).await?;

    Ok((StatusCode::TEMPORARY_REDIRECT, [(LOCATION, location(&target)?)]))
}

/// Header value for `target`, falling back to its percent-encoded form
/// when the raw string holds non-ASCII characters.
fn location(target: &str) -> Result<HeaderValue> {
    if target.is_ascii() {
        if let Ok(value) = HeaderValue::from_str(target) {
            return Ok(value);
        }
    }

    Url::parse(target)
        .ok()
        .and_then(|url| HeaderValue::from_str(url.as_str()).ok())
        .ok_or_else(|| AppError::Internal(format!("cannot redirect to '{target}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_targets_are_used_verbatim() {
        assert_eq!(
            location("https://example.com/a?b=c").unwrap(),
            "https://example.com/a?b=c"
        );
    }

    #[test]
    fn non_ascii_targets_are_encoded() {
        assert_eq!(
            location("https://example.com/caf\u{e9}").unwrap(),
            "https://example.com/caf%C3%A9"
        );
    }
}
