// src/services/appointments.rs

use chrono::NaiveDate;
use tracing::info;
use uuid::Uuid;

use crate::{
    error::{InfraError, InfraResult},
    models::{AppointmentChanges, AppointmentRecord, AppointmentView, NameQuery, NewAppointment},
    outcome::{Outcome, Rejection},
    scheduling::{
        overlap::check_overlap, ownership::check_patient_ownership,
        time_range::validate_time_range,
    },
    store::Store,
};

fn rejected<T>(op: &'static str, rejection: Rejection) -> Outcome<T> {
    info!(op, kind = ?rejection.kind, reason = rejection.message, "appointment rejected");
    rejection.into()
}

/* ============================================================
   insert
   ============================================================ */

/// Books a new appointment.
///
/// The checks and the write are separate round trips with no transaction
/// around them: two concurrent requests for overlapping slots of the same
/// user can both pass `check_overlap` and both be written.
pub async fn insert_appointment(
    store: &dyn Store,
    new: NewAppointment,
) -> InfraResult<Outcome<AppointmentView>> {
    if let Err(r) = validate_time_range(new.start_time, new.end_time) {
        return Ok(rejected("insert", r));
    }

    // an unknown booker would otherwise become the patient's owner
    if !store.user_exists(new.user_id).await? {
        return Ok(rejected("insert", Rejection::no_such_user()));
    }

    if let Some(r) = check_patient_ownership(store, new.p_id, new.user_id).await? {
        return Ok(rejected("insert", r));
    }

    if let Some(r) =
        check_overlap(store, new.user_id, new.doa, new.start_time, new.end_time, None).await?
    {
        return Ok(rejected("insert", r));
    }

    let appointment_num = store.insert_appointment(&new).await?;
    info!(%appointment_num, user_id = %new.user_id, p_id = %new.p_id, doa = %new.doa, "appointment created");

    let view = store
        .appointment_view(appointment_num, new.user_id)
        .await?
        .ok_or(InfraError::MissingRow("appointment"))?;

    Ok(Outcome::Accepted(view))
}

/* ============================================================
   update
   ============================================================ */

/// Reschedules an appointment owned by `changes.user_id`.
///
/// The row being moved is left out of the overlap scan, so saving an
/// appointment with unchanged times succeeds. Someone else's appointment
/// id matches zero rows and reads as not found.
pub async fn update_appointment(
    store: &dyn Store,
    changes: AppointmentChanges,
) -> InfraResult<Outcome<AppointmentView>> {
    if let Err(r) = validate_time_range(changes.start_time, changes.end_time) {
        return Ok(rejected("update", r));
    }

    if let Some(r) = check_overlap(
        store,
        changes.user_id,
        changes.doa,
        changes.start_time,
        changes.end_time,
        Some(changes.appointment_num),
    )
    .await?
    {
        return Ok(rejected("update", r));
    }

    let affected = store.update_appointment(&changes).await?;
    if affected > 0 {
        info!(appointment_num = %changes.appointment_num, user_id = %changes.user_id, "appointment updated");
    }

    match store
        .appointment_view(changes.appointment_num, changes.user_id)
        .await?
    {
        Some(view) => Ok(Outcome::Accepted(view)),
        None => Ok(rejected("update", Rejection::no_such_appointment())),
    }
}

/* ============================================================
   delete
   ============================================================ */

/// Returns the row as it was before deletion.
pub async fn delete_appointment(
    store: &dyn Store,
    appointment_num: Uuid,
    user_id: Uuid,
) -> InfraResult<Outcome<AppointmentRecord>> {
    let Some(existing) = store.find_appointment(appointment_num, user_id).await? else {
        return Ok(rejected("delete", Rejection::no_such_appointment()));
    };

    store.delete_appointment(appointment_num, user_id).await?;
    info!(%appointment_num, %user_id, "appointment deleted");

    Ok(Outcome::Accepted(existing))
}

/* ============================================================
   queries
   ============================================================ */

pub async fn list_appointments(
    store: &dyn Store,
    user_id: Uuid,
) -> InfraResult<Outcome<Vec<AppointmentRecord>>> {
    let rows = store.appointments_for_user(user_id).await?;
    Ok(Outcome::non_empty(rows, Rejection::no_appointments()))
}

pub async fn appointments_by_date(
    store: &dyn Store,
    user_id: Uuid,
    doa: NaiveDate,
) -> InfraResult<Outcome<Vec<AppointmentView>>> {
    let rows = store.appointment_views_on_date(user_id, doa).await?;
    Ok(Outcome::non_empty(rows, Rejection::no_matching_appointment()))
}

pub async fn appointments_for_patient(
    store: &dyn Store,
    user_id: Uuid,
    query: NameQuery,
) -> InfraResult<Outcome<Vec<AppointmentView>>> {
    let rows = store.search_appointment_views(user_id, &query).await?;
    Ok(Outcome::non_empty(rows, Rejection::no_matching_appointment()))
}
