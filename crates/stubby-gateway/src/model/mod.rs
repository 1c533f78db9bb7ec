mod health;
mod link;

pub use health::HealthResponse;
pub use link::{
    DeleteLinkResponse, ErrorResponse, LinkResponse, ShortenRequest, ShortenResponse,
    UpdateLinkRequest,
};
