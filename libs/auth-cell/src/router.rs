use std::sync::Arc;

use axum::{routing::post, Router};

use shared_config::AppConfig;

use crate::handlers;

pub fn auth_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/login", post(handlers::login))
        .route("/verify", post(handlers::verify_token))
        .with_state(state)
}
