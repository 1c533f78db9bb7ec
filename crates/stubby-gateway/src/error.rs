use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use stubby_shortener::LinkError;
use tracing::error;

use crate::model::ErrorResponse;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    /// A failure reported by the link service.
    Link(LinkError),
    /// The request could not be decoded.
    BadRequest(String),
    /// The gateway itself could not build a response.
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Link(LinkError::NotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Link(LinkError::InvalidInput(_)) | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Link(LinkError::CodeSpaceExhausted { .. }) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Link(LinkError::StoreUnavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn message(&self) -> String {
        match self {
            AppError::Link(err) => err.to_string(),
            AppError::BadRequest(message) | AppError::Internal(message) => message.clone(),
        }
    }
}

impl From<LinkError> for AppError {
    fn from(value: LinkError) -> Self {
        AppError::Link(value)
    }
}

impl From<JsonRejection> for AppError {
    fn from(value: JsonRejection) -> Self {
        AppError::BadRequest(value.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(value: PathRejection) -> Self {
        AppError::BadRequest(value.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();

        if status.is_server_error() {
            error!(status = status.as_u16(), error = %message, "request failed");
        }

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
