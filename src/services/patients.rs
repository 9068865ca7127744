// src/services/patients.rs

use tracing::info;
use uuid::Uuid;

use crate::{
    error::InfraResult,
    models::{NameQuery, PatientChanges, PatientDetails, PatientRecord},
    outcome::{Outcome, Rejection},
    store::Store,
};

/// Registers a patient. The record belongs to no user until its first
/// appointment is booked.
pub async fn insert_patient(
    store: &dyn Store,
    details: PatientDetails,
) -> InfraResult<PatientRecord> {
    let record = store.insert_patient(&details).await?;
    info!(p_id = %record.p_id, "patient created");
    Ok(record)
}

/// Only a user who holds an appointment with the patient may edit them.
pub async fn update_patient(
    store: &dyn Store,
    changes: PatientChanges,
) -> InfraResult<Outcome<PatientRecord>> {
    match store.update_owned_patient(&changes).await? {
        Some(record) => {
            info!(p_id = %record.p_id, user_id = %changes.user_id, "patient updated");
            Ok(Outcome::Accepted(record))
        }
        None => Ok(Rejection::no_such_patient().into()),
    }
}

/// Deleting a patient removes their appointments too. Returns the row as it
/// was before deletion.
pub async fn delete_patient(
    store: &dyn Store,
    p_id: Uuid,
    user_id: Uuid,
) -> InfraResult<Outcome<PatientRecord>> {
    let Some(existing) = store.find_owned_patient(p_id, user_id).await? else {
        return Ok(Rejection::no_such_patient().into());
    };

    store.delete_patient(p_id).await?;
    info!(%p_id, %user_id, "patient deleted");

    Ok(Outcome::Accepted(existing))
}

/// Patients the user has booked at least once. An empty list is a valid answer.
pub async fn list_patients(store: &dyn Store, user_id: Uuid) -> InfraResult<Vec<PatientRecord>> {
    store.patients_for_user(user_id).await
}

pub async fn search_patients(
    store: &dyn Store,
    user_id: Uuid,
    query: NameQuery,
) -> InfraResult<Outcome<Vec<PatientRecord>>> {
    let rows = store.search_patients(user_id, &query).await?;
    Ok(Outcome::non_empty(rows, Rejection::no_matching_patient()))
}
