use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod metrics;
pub mod middlewares;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::ProxyError;
pub use services::AppState;

pub fn create_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Metrics endpoint with Basic Auth protection
        .route(
            "/metrics",
            get(handlers::metrics_handler).layer(middleware::from_fn_with_state(
                app_state.clone(),
                handlers::metrics_auth_middleware,
            )),
        )
        .nest("/functions/v1", function_routes())
        .with_state(app_state)
        .layer(middleware::from_fn(
            middlewares::metrics::metrics_middleware,
        ))
        .layer(middleware::from_fn(
            middlewares::trace::trace_context_middleware,
        ))
        .layer(TraceLayer::new_for_http())
}

/// The two AI proxies. CORS wraps each route so the pre-flight is answered
/// before method routing would turn OPTIONS into a 405.
fn function_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/generate-quiz", post(handlers::functions::generate_quiz))
        .route(
            "/generate-study-plan",
            post(handlers::functions::generate_study_plan),
        )
        .layer(middleware::from_fn(middlewares::cors::cors_middleware))
}
