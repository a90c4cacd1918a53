//! HTTP API server

use axum::{http::StatusCode, routing::get, Router};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

pub mod handlers;
pub mod response;
pub mod state;

pub use state::AppState;

/// Build the API router using the provided application state
pub fn create_router(state: AppState) -> Router {
    let request_timeout = state.request_timeout;

    Router::new()
        .route(
            "/health",
            get(handlers::health).fallback(handlers::not_found),
        )
        .nest(
            "/api",
            Router::new()
                .route(
                    "/users",
                    get(handlers::list_users)
                        .post(handlers::create_user)
                        .fallback(handlers::not_found),
                )
                .route(
                    "/users/:id",
                    get(handlers::get_user)
                        .put(handlers::update_user)
                        .delete(handlers::delete_user)
                        .fallback(handlers::not_found),
                ),
        )
        .fallback(handlers::not_found)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
