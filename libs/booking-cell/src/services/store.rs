use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use reqwest::Method;
use serde_json::Value;
use std::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::PostgrestClient;

use crate::models::{Appointment, BookingError};

pub const APPOINTMENTS_PATH: &str = "/rest/v1/appointments";

/// Persistence contract for appointment records. The scheduler treats the
/// store as a queryable collaborator and never commits state itself;
/// storage failures surface as `BookingError::Storage` and are propagated
/// unchanged.
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    async fn insert(&self, appointment: &Appointment) -> Result<(), BookingError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Appointment>, BookingError>;

    /// Every record at the slot, any status, oldest first.
    async fn find_by_slot(
        &self,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<Vec<Appointment>, BookingError>;

    async fn update(&self, appointment: &Appointment) -> Result<(), BookingError>;

    async fn delete(&self, id: Uuid) -> Result<(), BookingError>;

    /// Full listing ordered by date asc, time asc (the panel view).
    async fn list_ordered(&self) -> Result<Vec<Appointment>, BookingError>;

    /// Most recently created records first (the direct-entry sidebar).
    async fn list_recent(&self, limit: i32) -> Result<Vec<Appointment>, BookingError>;
}

// ==============================================================================
// POSTGREST BACKEND
// ==============================================================================

pub struct PostgrestAppointmentStore {
    client: PostgrestClient,
}

impl PostgrestAppointmentStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: PostgrestClient::new(config),
        }
    }

    fn parse_rows(rows: Vec<Value>) -> Result<Vec<Appointment>, BookingError> {
        rows.into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Appointment>, _>>()
            .map_err(|e| BookingError::Storage(format!("Failed to parse appointments: {}", e)))
    }

    async fn fetch(&self, path: &str) -> Result<Vec<Appointment>, BookingError> {
        let rows: Vec<Value> = self
            .client
            .request(Method::GET, path, None)
            .await
            .map_err(|e| BookingError::Storage(e.to_string()))?;

        Self::parse_rows(rows)
    }
}

#[async_trait]
impl AppointmentStore for PostgrestAppointmentStore {
    async fn insert(&self, appointment: &Appointment) -> Result<(), BookingError> {
        debug!("Inserting appointment {}", appointment.id);

        let body = serde_json::to_value(appointment)
            .map_err(|e| BookingError::Storage(e.to_string()))?;

        self.client
            .execute(Method::POST, APPOINTMENTS_PATH, Some(body))
            .await
            .map_err(|e| BookingError::Storage(e.to_string()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Appointment>, BookingError> {
        let path = format!("{}?id=eq.{}", APPOINTMENTS_PATH, id);
        let mut rows = self.fetch(&path).await?;

        if rows.is_empty() {
            Ok(None)
        } else {
            Ok(Some(rows.remove(0)))
        }
    }

    async fn find_by_slot(
        &self,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<Vec<Appointment>, BookingError> {
        let path = format!(
            "{}?date=eq.{}&time=eq.{}&order=created_at.asc",
            APPOINTMENTS_PATH, date, time
        );
        self.fetch(&path).await
    }

    async fn update(&self, appointment: &Appointment) -> Result<(), BookingError> {
        debug!("Updating appointment {}", appointment.id);

        let path = format!("{}?id=eq.{}", APPOINTMENTS_PATH, appointment.id);
        let body = serde_json::to_value(appointment)
            .map_err(|e| BookingError::Storage(e.to_string()))?;

        self.client
            .execute(Method::PATCH, &path, Some(body))
            .await
            .map_err(|e| BookingError::Storage(e.to_string()))
    }

    async fn delete(&self, id: Uuid) -> Result<(), BookingError> {
        debug!("Deleting appointment {}", id);

        let path = format!("{}?id=eq.{}", APPOINTMENTS_PATH, id);
        self.client
            .execute(Method::DELETE, &path, None)
            .await
            .map_err(|e| BookingError::Storage(e.to_string()))
    }

    async fn list_ordered(&self) -> Result<Vec<Appointment>, BookingError> {
        let path = format!("{}?order=date.asc,time.asc", APPOINTMENTS_PATH);
        self.fetch(&path).await
    }

    async fn list_recent(&self, limit: i32) -> Result<Vec<Appointment>, BookingError> {
        let path = format!(
            "{}?order=created_at.desc&limit={}",
            APPOINTMENTS_PATH, limit
        );
        self.fetch(&path).await
    }
}

// ==============================================================================
// IN-MEMORY BACKEND
// ==============================================================================

/// Mutex-guarded in-process store. Backs the scheduler test suite and runs
/// the service without a database.
#[derive(Default)]
pub struct MemoryAppointmentStore {
    rows: Mutex<Vec<Appointment>>,
}

impl MemoryAppointmentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AppointmentStore for MemoryAppointmentStore {
    async fn insert(&self, appointment: &Appointment) -> Result<(), BookingError> {
        let mut rows = self.rows.lock().unwrap();

        if rows.iter().any(|a| a.id == appointment.id) {
            return Err(BookingError::Storage(format!(
                "Duplicate appointment id {}",
                appointment.id
            )));
        }

        rows.push(appointment.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Appointment>, BookingError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|a| a.id == id).cloned())
    }

    async fn find_by_slot(
        &self,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<Vec<Appointment>, BookingError> {
        let rows = self.rows.lock().unwrap();

        let mut matches: Vec<Appointment> = rows
            .iter()
            .filter(|a| a.date == date && a.time == time)
            .cloned()
            .collect();
        matches.sort_by_key(|a| a.created_at);

        Ok(matches)
    }

    async fn update(&self, appointment: &Appointment) -> Result<(), BookingError> {
        let mut rows = self.rows.lock().unwrap();

        match rows.iter_mut().find(|a| a.id == appointment.id) {
            Some(row) => {
                *row = appointment.clone();
                Ok(())
            }
            None => Err(BookingError::NotFound),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), BookingError> {
        let mut rows = self.rows.lock().unwrap();

        let before = rows.len();
        rows.retain(|a| a.id != id);

        if rows.len() == before {
            Err(BookingError::NotFound)
        } else {
            Ok(())
        }
    }

    async fn list_ordered(&self) -> Result<Vec<Appointment>, BookingError> {
        let rows = self.rows.lock().unwrap();

        let mut all: Vec<Appointment> = rows.clone();
        all.sort_by_key(|a| (a.date, a.time));

        Ok(all)
    }

    async fn list_recent(&self, limit: i32) -> Result<Vec<Appointment>, BookingError> {
        let rows = self.rows.lock().unwrap();

        let mut all: Vec<Appointment> = rows.clone();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        all.truncate(limit.max(0) as usize);

        Ok(all)
    }
}
