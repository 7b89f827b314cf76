// libs/booking-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::StaffContext;
use shared_models::error::AppError;

use crate::models::{AppointmentAction, BookingError, NewAppointmentRequest};
use crate::services::notify::WhatsappNotifier;
use crate::services::scheduler::SlotScheduler;
use crate::services::store::{AppointmentStore, PostgrestAppointmentStore};

// ==============================================================================
// QUERY PARAMETER STRUCTS
// ==============================================================================

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<i32>,
}

const DEFAULT_RECENT_LIMIT: i32 = 20;

fn map_booking_error(err: BookingError) -> AppError {
    match &err {
        BookingError::NotFound => AppError::NotFound(err.to_string()),
        BookingError::Validation { .. } => AppError::ValidationError(err.to_string()),
        BookingError::InvalidTransition { .. } => AppError::BadRequest(err.to_string()),
        BookingError::SlotTaken { .. } => AppError::Conflict(err.to_string()),
        BookingError::Storage(msg) => AppError::Database(msg.clone()),
    }
}

// ==============================================================================
// PUBLIC BOOKING HANDLERS
// ==============================================================================

/// Public booking form submission. Lands as a `requested` appointment for
/// the desk to confirm later.
#[axum::debug_handler]
pub async fn request_appointment(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<NewAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let store = PostgrestAppointmentStore::new(&state);
    let scheduler = SlotScheduler::new(&store);

    let appointment = scheduler
        .create_request(request)
        .await
        .map_err(map_booking_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment,
        "message": "Appointment request received"
    })))
}

// ==============================================================================
// STAFF PANEL HANDLERS
// ==============================================================================

/// Panel listing, ordered by date then time.
#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<Arc<AppConfig>>,
    Extension(_staff): Extension<StaffContext>,
) -> Result<Json<Value>, AppError> {
    let store = PostgrestAppointmentStore::new(&state);

    let appointments = store.list_ordered().await.map_err(map_booking_error)?;
    let count = appointments.len();

    Ok(Json(json!({
        "appointments": appointments,
        "count": count
    })))
}

/// Latest records for the direct-entry sidebar.
#[axum::debug_handler]
pub async fn recent_appointments(
    State(state): State<Arc<AppConfig>>,
    Extension(_staff): Extension<StaffContext>,
    Query(query): Query<RecentQuery>,
) -> Result<Json<Value>, AppError> {
    let store = PostgrestAppointmentStore::new(&state);

    let limit = query.limit.unwrap_or(DEFAULT_RECENT_LIMIT);
    let appointments = store.list_recent(limit).await.map_err(map_booking_error)?;
    let count = appointments.len();

    Ok(Json(json!({
        "appointments": appointments,
        "count": count
    })))
}

/// Staff direct entry: the record lands already confirmed, so the slot must
/// be free.
#[axum::debug_handler]
pub async fn add_appointment(
    State(state): State<Arc<AppConfig>>,
    Extension(staff): Extension<StaffContext>,
    Json(request): Json<NewAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let store = PostgrestAppointmentStore::new(&state);
    let scheduler = SlotScheduler::new(&store);

    let appointment = scheduler
        .create_confirmed(request)
        .await
        .map_err(map_booking_error)?;

    info!(
        "{} added {} to the book",
        staff.subject, appointment.patient_name
    );

    let message = format!("{} added successfully", appointment.patient_name);

    Ok(Json(json!({
        "success": true,
        "appointment": appointment,
        "message": message
    })))
}

#[axum::debug_handler]
pub async fn confirm_appointment(
    State(state): State<Arc<AppConfig>>,
    Extension(staff): Extension<StaffContext>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let store = PostgrestAppointmentStore::new(&state);
    let scheduler = SlotScheduler::new(&store);

    let appointment = scheduler
        .transition(appointment_id, AppointmentAction::Confirm)
        .await
        .map_err(map_booking_error)?;

    info!("{} confirmed appointment {}", staff.subject, appointment.id);

    // Notification is best effort and never undoes the confirmation
    let notifier = WhatsappNotifier::new(&state);
    let message = if notifier.notify_confirmed(&appointment) {
        format!("{} confirmed and notified", appointment.patient_name)
    } else {
        warn!(
            "No WhatsApp link could be built for appointment {}",
            appointment.id
        );
        format!("{} confirmed (no notification)", appointment.patient_name)
    };

    Ok(Json(json!({
        "success": true,
        "appointment": appointment,
        "message": message
    })))
}

#[axum::debug_handler]
pub async fn complete_appointment(
    State(state): State<Arc<AppConfig>>,
    Extension(_staff): Extension<StaffContext>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let store = PostgrestAppointmentStore::new(&state);
    let scheduler = SlotScheduler::new(&store);

    let appointment = scheduler
        .transition(appointment_id, AppointmentAction::Complete)
        .await
        .map_err(map_booking_error)?;

    let message = format!("{} marked as attended", appointment.patient_name);

    Ok(Json(json!({
        "success": true,
        "appointment": appointment,
        "message": message
    })))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<Arc<AppConfig>>,
    Extension(_staff): Extension<StaffContext>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let store = PostgrestAppointmentStore::new(&state);
    let scheduler = SlotScheduler::new(&store);

    let appointment = scheduler
        .transition(appointment_id, AppointmentAction::Cancel)
        .await
        .map_err(map_booking_error)?;

    let message = format!("{} cancelled", appointment.patient_name);

    Ok(Json(json!({
        "success": true,
        "appointment": appointment,
        "message": message
    })))
}

/// Permanent removal, any status. There is no further lifecycle.
#[axum::debug_handler]
pub async fn delete_appointment(
    State(state): State<Arc<AppConfig>>,
    Extension(staff): Extension<StaffContext>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let store = PostgrestAppointmentStore::new(&state);

    let appointment = store
        .find_by_id(appointment_id)
        .await
        .map_err(map_booking_error)?
        .ok_or_else(|| AppError::NotFound("Appointment not found".to_string()))?;

    store.delete(appointment_id).await.map_err(map_booking_error)?;

    info!(
        "{} permanently removed appointment {}",
        staff.subject, appointment_id
    );

    Ok(Json(json!({
        "success": true,
        "message": format!("{} permanently removed", appointment.patient_name)
    })))
}
