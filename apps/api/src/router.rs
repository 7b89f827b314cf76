use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;
use tracing::error;

use auth_cell::router::auth_routes;
use booking_cell::router::{booking_routes, panel_routes};
use shared_config::AppConfig;
use shared_database::PostgrestClient;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "Clinic desk API is running!" }))
        .route("/health", get(health_check))
        .with_state(state.clone())
        .nest("/auth", auth_routes(state.clone()))
        .nest("/appointments", booking_routes(state.clone()))
        .nest("/admin", panel_routes(state))
}

/// Storage reachability probe for the hosting platform.
async fn health_check(State(state): State<Arc<AppConfig>>) -> impl IntoResponse {
    match PostgrestClient::new(&state).ping().await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "ok" }))),
        Err(e) => {
            error!("Health check failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "status": "error", "msg": e.to_string() })),
            )
        }
    }
}
