//! HTTP gateway for the Stubby URL shortener.
//!
//! Exposes link management under `/shorten` and `/links`, and the redirect
//! path under `/{code}`, on top of a [`Shortener`][stubby_shortener::Shortener].

pub mod app;
pub mod error;
pub mod handlers;
pub mod model;
pub mod state;

pub use app::App;
pub use state::AppState;
