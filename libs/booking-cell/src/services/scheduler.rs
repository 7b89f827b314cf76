use chrono::{NaiveDate, NaiveTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::{
    Appointment, AppointmentAction, AppointmentStatus, BookingError, NewAppointmentRequest,
};
use crate::services::store::AppointmentStore;

/// Legal status edges. Confirm additionally requires a free slot, checked by
/// the scheduler against the store. Completed and cancelled are terminal.
pub fn validate_transition(
    current: AppointmentStatus,
    action: AppointmentAction,
) -> Result<AppointmentStatus, BookingError> {
    match (current, action) {
        (AppointmentStatus::Requested, AppointmentAction::Confirm) => {
            Ok(AppointmentStatus::Confirmed)
        }
        (AppointmentStatus::Requested | AppointmentStatus::Confirmed, AppointmentAction::Complete) => {
            Ok(AppointmentStatus::Completed)
        }
        (AppointmentStatus::Requested | AppointmentStatus::Confirmed, AppointmentAction::Cancel) => {
            Ok(AppointmentStatus::Cancelled)
        }
        _ => Err(BookingError::InvalidTransition {
            status: current,
            action,
        }),
    }
}

struct ValidatedBooking {
    patient_name: String,
    phone: Option<String>,
    service: String,
    date: NaiveDate,
    time: NaiveTime,
    note: Option<String>,
}

impl ValidatedBooking {
    /// Trim everything, require name/service/date/time, parse the slot key.
    /// The failing field is named so the form can point at it.
    fn parse(request: NewAppointmentRequest) -> Result<Self, BookingError> {
        let patient_name = request.patient_name.trim().to_string();
        if patient_name.is_empty() {
            return Err(BookingError::Validation {
                field: "patient_name",
            });
        }

        let service = request.service.trim().to_string();
        if service.is_empty() {
            return Err(BookingError::Validation { field: "service" });
        }

        let date = NaiveDate::parse_from_str(request.date.trim(), "%Y-%m-%d")
            .map_err(|_| BookingError::Validation { field: "date" })?;

        let time = NaiveTime::parse_from_str(request.time.trim(), "%H:%M")
            .map_err(|_| BookingError::Validation { field: "time" })?;

        let phone = request
            .phone
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());

        let note = request
            .note
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        Ok(Self {
            patient_name,
            phone,
            service,
            date,
            time,
            note,
        })
    }

    fn into_appointment(self, status: AppointmentStatus) -> Appointment {
        Appointment {
            id: Uuid::new_v4(),
            patient_name: self.patient_name,
            phone: self.phone,
            service: self.service,
            date: self.date,
            time: self.time,
            note: self.note,
            status,
            created_at: Utc::now(),
        }
    }
}

/// Decision logic for slot occupancy and status transitions. Queries the
/// store, decides, and hands the result back; the store owns durability.
pub struct SlotScheduler<'a, S: AppointmentStore> {
    store: &'a S,
}

impl<'a, S: AppointmentStore> SlotScheduler<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// The active appointment holding a slot, if any. `exclude` skips a
    /// record when it is checked against itself (confirming a request).
    pub async fn slot_holder(
        &self,
        date: NaiveDate,
        time: NaiveTime,
        exclude: Option<Uuid>,
    ) -> Result<Option<Appointment>, BookingError> {
        debug!("Checking slot {} {} (exclude: {:?})", date, time, exclude);

        let records = self.store.find_by_slot(date, time).await?;

        Ok(records
            .into_iter()
            .find(|a| a.status.is_active() && Some(a.id) != exclude))
    }

    pub async fn has_conflict(
        &self,
        date: NaiveDate,
        time: NaiveTime,
        exclude: Option<Uuid>,
    ) -> Result<bool, BookingError> {
        Ok(self.slot_holder(date, time, exclude).await?.is_some())
    }

    /// Public booking submission. Lands as `requested` without a slot
    /// check: several requests may compete for one slot until the desk
    /// confirms one of them.
    pub async fn create_request(
        &self,
        request: NewAppointmentRequest,
    ) -> Result<Appointment, BookingError> {
        let appointment =
            ValidatedBooking::parse(request)?.into_appointment(AppointmentStatus::Requested);

        self.store.insert(&appointment).await?;

        info!(
            "Appointment request {} stored for {} at {} {}",
            appointment.id, appointment.patient_name, appointment.date, appointment.time
        );
        Ok(appointment)
    }

    /// Staff direct entry, landing already confirmed. The slot check and
    /// the insert compose atomically from the caller's perspective: on
    /// conflict nothing is persisted.
    pub async fn create_confirmed(
        &self,
        request: NewAppointmentRequest,
    ) -> Result<Appointment, BookingError> {
        let validated = ValidatedBooking::parse(request)?;

        if let Some(holder) = self
            .slot_holder(validated.date, validated.time, None)
            .await?
        {
            warn!(
                "Direct entry rejected, slot {} {} held by {}",
                validated.date, validated.time, holder.id
            );
            return Err(BookingError::SlotTaken {
                id: holder.id,
                patient_name: holder.patient_name,
                date: validated.date,
                time: validated.time,
            });
        }

        let appointment = validated.into_appointment(AppointmentStatus::Confirmed);
        self.store.insert(&appointment).await?;

        info!(
            "Appointment {} added directly as confirmed for {}",
            appointment.id, appointment.patient_name
        );
        Ok(appointment)
    }

    /// Apply one action to one appointment. Only `status` changes; on any
    /// failure the record is left untouched.
    pub async fn transition(
        &self,
        id: Uuid,
        action: AppointmentAction,
    ) -> Result<Appointment, BookingError> {
        let mut appointment = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(BookingError::NotFound)?;

        let next_status = validate_transition(appointment.status, action)?;

        if action == AppointmentAction::Confirm {
            if let Some(holder) = self
                .slot_holder(appointment.date, appointment.time, Some(id))
                .await?
            {
                warn!(
                    "Confirm rejected for {}, slot {} {} held by {}",
                    id, appointment.date, appointment.time, holder.id
                );
                return Err(BookingError::SlotTaken {
                    id: holder.id,
                    patient_name: holder.patient_name,
                    date: appointment.date,
                    time: appointment.time,
                });
            }
        }

        appointment.status = next_status;
        self.store.update(&appointment).await?;

        info!("Appointment {} is now {}", appointment.id, appointment.status);
        Ok(appointment)
    }
}
