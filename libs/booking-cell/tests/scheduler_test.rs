use assert_matches::assert_matches;
use chrono::{NaiveDate, NaiveTime};

use booking_cell::models::{AppointmentAction, AppointmentStatus, BookingError, NewAppointmentRequest};
use booking_cell::services::scheduler::SlotScheduler;
use booking_cell::services::store::{AppointmentStore, MemoryAppointmentStore};

fn request(name: &str, date: &str, time: &str) -> NewAppointmentRequest {
    NewAppointmentRequest {
        patient_name: name.to_string(),
        phone: Some("947236123".to_string()),
        service: "Limpieza dental".to_string(),
        date: date.to_string(),
        time: time.to_string(),
        note: None,
    }
}

fn slot() -> (NaiveDate, NaiveTime) {
    (
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
    )
}

#[tokio::test]
async fn booking_request_lands_as_requested() {
    let store = MemoryAppointmentStore::new();
    let scheduler = SlotScheduler::new(&store);

    let appointment = scheduler
        .create_request(request("  Maria Lopez  ", "2024-06-01", "09:00"))
        .await
        .unwrap();

    assert_eq!(appointment.status, AppointmentStatus::Requested);
    assert_eq!(appointment.patient_name, "Maria Lopez");
    assert_eq!(appointment.slot(), slot());

    let stored = store.find_by_id(appointment.id).await.unwrap().unwrap();
    assert_eq!(stored.status, AppointmentStatus::Requested);
}

#[tokio::test]
async fn validation_names_the_offending_field() {
    let store = MemoryAppointmentStore::new();
    let scheduler = SlotScheduler::new(&store);

    let blank_name = scheduler
        .create_request(request("   ", "2024-06-01", "09:00"))
        .await;
    assert_matches!(
        blank_name,
        Err(BookingError::Validation { field: "patient_name" })
    );

    let mut no_service = request("Maria Lopez", "2024-06-01", "09:00");
    no_service.service = "".to_string();
    assert_matches!(
        scheduler.create_request(no_service).await,
        Err(BookingError::Validation { field: "service" })
    );

    assert_matches!(
        scheduler
            .create_request(request("Maria Lopez", "01/06/2024", "09:00"))
            .await,
        Err(BookingError::Validation { field: "date" })
    );

    assert_matches!(
        scheduler
            .create_request(request("Maria Lopez", "2024-06-01", "9am"))
            .await,
        Err(BookingError::Validation { field: "time" })
    );

    // Nothing was persisted along the way
    assert!(store.list_ordered().await.unwrap().is_empty());
}

#[tokio::test]
async fn two_requests_may_share_a_slot() {
    let store = MemoryAppointmentStore::new();
    let scheduler = SlotScheduler::new(&store);

    scheduler
        .create_request(request("Maria Lopez", "2024-06-01", "09:00"))
        .await
        .unwrap();
    let second = scheduler
        .create_request(request("Jose Quispe", "2024-06-01", "09:00"))
        .await;

    assert!(second.is_ok());
    assert_eq!(store.list_ordered().await.unwrap().len(), 2);
}

#[tokio::test]
async fn confirm_checks_the_slot_against_itself_only() {
    let store = MemoryAppointmentStore::new();
    let scheduler = SlotScheduler::new(&store);

    let appointment = scheduler
        .create_request(request("Maria Lopez", "2024-06-01", "09:00"))
        .await
        .unwrap();

    let confirmed = scheduler
        .transition(appointment.id, AppointmentAction::Confirm)
        .await
        .unwrap();

    assert_eq!(confirmed.status, AppointmentStatus::Confirmed);
    // Only the status moved
    assert_eq!(confirmed.patient_name, appointment.patient_name);
    assert_eq!(confirmed.slot(), appointment.slot());
    assert_eq!(confirmed.created_at, appointment.created_at);
}

#[tokio::test]
async fn second_confirm_at_the_slot_names_the_holder() {
    let store = MemoryAppointmentStore::new();
    let scheduler = SlotScheduler::new(&store);

    let first = scheduler
        .create_request(request("Maria Lopez", "2024-06-01", "09:00"))
        .await
        .unwrap();
    scheduler
        .transition(first.id, AppointmentAction::Confirm)
        .await
        .unwrap();

    let second = scheduler
        .create_request(request("Jose Quispe", "2024-06-01", "09:00"))
        .await
        .unwrap();

    let err = scheduler
        .transition(second.id, AppointmentAction::Confirm)
        .await
        .unwrap_err();

    assert_matches!(err, BookingError::SlotTaken { id, .. } if id == first.id);

    // The losing request is untouched
    let unchanged = store.find_by_id(second.id).await.unwrap().unwrap();
    assert_eq!(unchanged.status, AppointmentStatus::Requested);
}

#[tokio::test]
async fn competing_requests_block_each_others_confirmation() {
    let store = MemoryAppointmentStore::new();
    let scheduler = SlotScheduler::new(&store);

    let first = scheduler
        .create_request(request("Maria Lopez", "2024-06-01", "09:00"))
        .await
        .unwrap();
    let second = scheduler
        .create_request(request("Jose Quispe", "2024-06-01", "09:00"))
        .await
        .unwrap();

    // A requested rival also holds the slot; one of them has to go first
    let err = scheduler
        .transition(first.id, AppointmentAction::Confirm)
        .await
        .unwrap_err();
    assert_matches!(err, BookingError::SlotTaken { id, .. } if id == second.id);
}

#[tokio::test]
async fn direct_entry_rejects_an_occupied_slot_without_persisting() {
    let store = MemoryAppointmentStore::new();
    let scheduler = SlotScheduler::new(&store);

    let holder = scheduler
        .create_confirmed(request("Maria Lopez", "2024-06-01", "09:00"))
        .await
        .unwrap();
    assert_eq!(holder.status, AppointmentStatus::Confirmed);

    let err = scheduler
        .create_confirmed(request("Jose Quispe", "2024-06-01", "09:00"))
        .await
        .unwrap_err();

    assert_matches!(err, BookingError::SlotTaken { id, .. } if id == holder.id);
    assert_eq!(store.list_ordered().await.unwrap().len(), 1);
}

#[tokio::test]
async fn cancelling_frees_the_slot() {
    let store = MemoryAppointmentStore::new();
    let scheduler = SlotScheduler::new(&store);

    let appointment = scheduler
        .create_confirmed(request("Maria Lopez", "2024-06-01", "09:00"))
        .await
        .unwrap();
    scheduler
        .transition(appointment.id, AppointmentAction::Cancel)
        .await
        .unwrap();

    let (date, time) = slot();
    assert!(!scheduler.has_conflict(date, time, None).await.unwrap());

    // Rebooking the same slot goes through
    let rebooked = scheduler
        .create_confirmed(request("Jose Quispe", "2024-06-01", "09:00"))
        .await
        .unwrap();
    assert_eq!(rebooked.status, AppointmentStatus::Confirmed);
}

#[tokio::test]
async fn completed_history_does_not_block_rebooking() {
    let store = MemoryAppointmentStore::new();
    let scheduler = SlotScheduler::new(&store);

    let appointment = scheduler
        .create_confirmed(request("Maria Lopez", "2024-06-01", "09:00"))
        .await
        .unwrap();
    scheduler
        .transition(appointment.id, AppointmentAction::Complete)
        .await
        .unwrap();

    assert!(scheduler
        .create_confirmed(request("Jose Quispe", "2024-06-01", "09:00"))
        .await
        .is_ok());
}

#[tokio::test]
async fn complete_works_from_requested_and_confirmed() {
    let store = MemoryAppointmentStore::new();
    let scheduler = SlotScheduler::new(&store);

    let walk_in = scheduler
        .create_request(request("Maria Lopez", "2024-06-01", "09:00"))
        .await
        .unwrap();
    let completed = scheduler
        .transition(walk_in.id, AppointmentAction::Complete)
        .await
        .unwrap();
    assert_eq!(completed.status, AppointmentStatus::Completed);

    let booked = scheduler
        .create_confirmed(request("Jose Quispe", "2024-06-02", "10:30"))
        .await
        .unwrap();
    let attended = scheduler
        .transition(booked.id, AppointmentAction::Complete)
        .await
        .unwrap();
    assert_eq!(attended.status, AppointmentStatus::Completed);
}

#[tokio::test]
async fn terminal_records_reject_every_action_unchanged() {
    let store = MemoryAppointmentStore::new();
    let scheduler = SlotScheduler::new(&store);

    let appointment = scheduler
        .create_confirmed(request("Maria Lopez", "2024-06-01", "09:00"))
        .await
        .unwrap();
    scheduler
        .transition(appointment.id, AppointmentAction::Cancel)
        .await
        .unwrap();

    for action in [
        AppointmentAction::Confirm,
        AppointmentAction::Complete,
        AppointmentAction::Cancel,
    ] {
        let err = scheduler.transition(appointment.id, action).await.unwrap_err();
        assert_matches!(
            err,
            BookingError::InvalidTransition {
                status: AppointmentStatus::Cancelled,
                ..
            }
        );
    }

    let stored = store.find_by_id(appointment.id).await.unwrap().unwrap();
    assert_eq!(stored.status, AppointmentStatus::Cancelled);
}

#[tokio::test]
async fn transition_on_unknown_id_is_not_found() {
    let store = MemoryAppointmentStore::new();
    let scheduler = SlotScheduler::new(&store);

    let err = scheduler
        .transition(uuid::Uuid::new_v4(), AppointmentAction::Cancel)
        .await
        .unwrap_err();
    assert_matches!(err, BookingError::NotFound);
}

#[tokio::test]
async fn at_most_one_active_appointment_per_slot() {
    let store = MemoryAppointmentStore::new();
    let scheduler = SlotScheduler::new(&store);

    // A full life at one slot: confirm, complete, rebook, cancel, rebook
    let first = scheduler
        .create_confirmed(request("Maria Lopez", "2024-06-01", "09:00"))
        .await
        .unwrap();
    scheduler
        .transition(first.id, AppointmentAction::Complete)
        .await
        .unwrap();

    let second = scheduler
        .create_confirmed(request("Jose Quispe", "2024-06-01", "09:00"))
        .await
        .unwrap();
    scheduler
        .transition(second.id, AppointmentAction::Cancel)
        .await
        .unwrap();

    scheduler
        .create_confirmed(request("Ana Torres", "2024-06-01", "09:00"))
        .await
        .unwrap();

    let (date, time) = slot();
    let active: Vec<_> = store
        .find_by_slot(date, time)
        .await
        .unwrap()
        .into_iter()
        .filter(|a| a.status.is_active())
        .collect();

    assert_eq!(active.len(), 1);
    assert_eq!(active[0].patient_name, "Ana Torres");
}
