use axum::{http::header, Router};
use std::path::Path;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub mod bookings;
pub mod error;
pub mod extract;
pub mod state;

pub use state::AppState;

/// Build the HTTP application. When `static_dir` is set, unmatched paths are
/// served from it so the single-page client ships alongside the API.
pub fn app(state: AppState, static_dir: Option<&Path>) -> Router {
    // CORS is wide open; the client is served from arbitrary dev origins.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([header::CONTENT_DISPOSITION, header::LOCATION]);

    let mut router = Router::new().merge(bookings::routes());
    if let Some(dir) = static_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
