use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    delete_link_handler, get_link_handler, health_handler, list_links_handler, redirect_handler,
    shorten_handler, update_link_handler,
};
use crate::state::AppState;

/// First path segments routed to something other than a redirect.
pub const RESERVED_SEGMENTS: [&str; 3] = ["health", "shorten", "links"];

pub struct App {}

impl App {
    /// Codes the link service must not hand out, since `GET /{code}` would
    /// never reach the redirect handler for them.
    pub fn reserved_codes() -> Vec<String> {
        RESERVED_SEGMENTS.iter().map(|segment| segment.to_string()).collect()
    }

    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .route("/shorten", post(shorten_handler))
            .route("/links", get(list_links_handler))
            .route(
                "/links/{id}",
                get(get_link_handler)
                    .put(update_link_handler)
                    .delete(delete_link_handler),
            )
            .route("/{code}", get(redirect_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }
}
