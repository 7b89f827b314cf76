// libs/booking-cell/src/models.rs
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ==============================================================================
// CORE APPOINTMENT MODEL
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_name: String,
    pub phone: Option<String>,
    pub service: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub note: Option<String>,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
}

impl Appointment {
    /// The (date, time) pair this appointment occupies.
    pub fn slot(&self) -> (NaiveDate, NaiveTime) {
        (self.date, self.time)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Requested,
    Confirmed,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    /// Active statuses hold their slot against new confirmations;
    /// completed/cancelled history never blocks rebooking.
    pub fn is_active(&self) -> bool {
        matches!(self, AppointmentStatus::Requested | AppointmentStatus::Confirmed)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AppointmentStatus::Completed | AppointmentStatus::Cancelled)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Requested => write!(f, "requested"),
            AppointmentStatus::Confirmed => write!(f, "confirmed"),
            AppointmentStatus::Completed => write!(f, "completed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentAction {
    Confirm,
    Complete,
    Cancel,
}

impl fmt::Display for AppointmentAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentAction::Confirm => write!(f, "confirm"),
            AppointmentAction::Complete => write!(f, "complete"),
            AppointmentAction::Cancel => write!(f, "cancel"),
        }
    }
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

/// Raw booking submission, public form or staff direct entry. Date and time
/// arrive as strings (`YYYY-MM-DD`, `HH:MM`) and are parsed during
/// validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAppointmentRequest {
    pub patient_name: String,
    pub phone: Option<String>,
    pub service: String,
    pub date: String,
    pub time: String,
    pub note: Option<String>,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum BookingError {
    #[error("Appointment not found")]
    NotFound,

    #[error("Missing or invalid field: {field}")]
    Validation { field: &'static str },

    #[error("Cannot {action} an appointment that is {status}")]
    InvalidTransition {
        status: AppointmentStatus,
        action: AppointmentAction,
    },

    #[error("Slot {date} {time} is already taken by {patient_name} ({id})")]
    SlotTaken {
        id: Uuid,
        patient_name: String,
        date: NaiveDate,
        time: NaiveTime,
    },

    #[error("Storage error: {0}")]
    Storage(String),
}
