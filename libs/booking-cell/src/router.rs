// libs/booking-cell/src/router.rs
use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::staff_auth_middleware;

use crate::handlers;

/// Public booking surface. No authentication.
pub fn booking_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", post(handlers::request_appointment))
        .with_state(state)
}

/// Staff panel. Every route sits behind the PIN-token gate.
pub fn panel_routes(state: Arc<AppConfig>) -> Router {
    let protected_routes = Router::new()
        .route(
            "/appointments",
            get(handlers::list_appointments).post(handlers::add_appointment),
        )
        .route("/appointments/recent", get(handlers::recent_appointments))
        .route(
            "/appointments/{appointment_id}/confirm",
            post(handlers::confirm_appointment),
        )
        .route(
            "/appointments/{appointment_id}/complete",
            post(handlers::complete_appointment),
        )
        .route(
            "/appointments/{appointment_id}/cancel",
            post(handlers::cancel_appointment),
        )
        .route(
            "/appointments/{appointment_id}",
            delete(handlers::delete_appointment),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            staff_auth_middleware,
        ));

    Router::new().merge(protected_routes).with_state(state)
}
