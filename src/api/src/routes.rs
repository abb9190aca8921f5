//! Router assembly

use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace = TraceLayer::new_for_http()
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        // Health check
        .route("/health", get(handlers::health::health_check))

        // Serializer-style users API
        .route("/v1/users", get(handlers::users::list_users))
        .route(
            "/v1/users/:id",
            get(handlers::users::get_user).patch(handlers::users::update_user),
        )

        // Resource-style users API
        .route("/v2/users", get(handlers::resources::list_users))
        .route(
            "/v2/users/:id",
            get(handlers::resources::get_user).patch(handlers::resources::update_user),
        )

        // Middleware
        .layer(ServiceBuilder::new().layer(trace).layer(cors))
        .with_state(state)
}
