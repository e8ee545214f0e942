pub mod health;
pub mod proxy;

use axum::{
    routing::{get, post},
    Router,
};

use crate::foresight::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Foresight API
        .route("/api/v1/reports", post(handlers::handle_generate_report))
        .route(
            "/api/v1/reports/document",
            post(handlers::handle_report_document),
        )
        .route(
            "/api/v1/opportunities/extract",
            post(handlers::handle_extract),
        )
        // Secondary backend proxy
        .route(
            "/api/generate-report",
            post(proxy::handle_generate_report_proxy).fallback(proxy::method_not_allowed),
        )
        .with_state(state)
}
