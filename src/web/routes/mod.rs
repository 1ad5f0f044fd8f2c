//! Contains all the routes that this application can handle.

mod subscribe;

// re-export errors
pub use subscribe::{subscribe, SubscribeError};

use crate::AppState;

use axum::{
    http::StatusCode,
    routing::{on, MethodFilter},
    Router,
};

async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// All the routes of the server.
/// Every path is handled by `subscribe`, only `GET /health-check` is answered separately.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/health-check",
            on(MethodFilter::GET, health_check).fallback(subscribe),
        )
        .fallback(subscribe)
        .with_state(app_state)
}
