//! Persistence contract consumed by the scheduling services.
//!
//! Every method is a short request/response round trip. Nothing here is
//! transactional across calls: services that read then write (overlap
//! checks before an insert) can race with a concurrent writer.

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::InfraResult;
use crate::models::{
    AppointmentChanges, AppointmentRecord, AppointmentView, NameQuery, NewAppointment,
    PatientChanges, PatientDetails, PatientRecord, UserCredentials, UserRecord, UserWrite,
};

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgStore;

#[async_trait]
pub trait Store: Send + Sync {
    async fn ping(&self) -> InfraResult<()>;

    /* ---------- patients ---------- */

    async fn patient_exists(&self, p_id: Uuid) -> InfraResult<bool>;

    /// True when any appointment for the patient is owned by someone other
    /// than `user_id`.
    async fn patient_booked_by_other_user(&self, p_id: Uuid, user_id: Uuid) -> InfraResult<bool>;

    async fn insert_patient(&self, patient: &PatientDetails) -> InfraResult<PatientRecord>;

    /// Patient visible to `user_id`, i.e. with at least one of their appointments.
    async fn find_owned_patient(&self, p_id: Uuid, user_id: Uuid)
        -> InfraResult<Option<PatientRecord>>;

    /// Applies only when the patient is visible to `changes.user_id`.
    async fn update_owned_patient(&self, changes: &PatientChanges)
        -> InfraResult<Option<PatientRecord>>;

    /// Removes the patient and, with it, their appointments.
    async fn delete_patient(&self, p_id: Uuid) -> InfraResult<u64>;

    async fn patients_for_user(&self, user_id: Uuid) -> InfraResult<Vec<PatientRecord>>;

    /// Case-insensitive substring match on first OR last name.
    async fn search_patients(&self, user_id: Uuid, query: &NameQuery)
        -> InfraResult<Vec<PatientRecord>>;

    /* ---------- appointments ---------- */

    async fn appointments_on_date(&self, user_id: Uuid, doa: NaiveDate)
        -> InfraResult<Vec<AppointmentRecord>>;

    async fn insert_appointment(&self, appointment: &NewAppointment) -> InfraResult<Uuid>;

    /// Scoped by `(appointment_num, user_id)`; returns rows affected.
    async fn update_appointment(&self, changes: &AppointmentChanges) -> InfraResult<u64>;

    async fn find_appointment(&self, appointment_num: Uuid, user_id: Uuid)
        -> InfraResult<Option<AppointmentRecord>>;

    async fn appointment_view(&self, appointment_num: Uuid, user_id: Uuid)
        -> InfraResult<Option<AppointmentView>>;

    async fn delete_appointment(&self, appointment_num: Uuid, user_id: Uuid) -> InfraResult<u64>;

    async fn appointments_for_user(&self, user_id: Uuid) -> InfraResult<Vec<AppointmentRecord>>;

    async fn appointment_views_on_date(&self, user_id: Uuid, doa: NaiveDate)
        -> InfraResult<Vec<AppointmentView>>;

    /// Case-insensitive substring match on the patient's first OR last name.
    async fn search_appointment_views(&self, user_id: Uuid, query: &NameQuery)
        -> InfraResult<Vec<AppointmentView>>;

    /* ---------- users ---------- */

    async fn user_exists(&self, user_id: Uuid) -> InfraResult<bool>;

    async fn user_name_taken(&self, user_name: &str, except: Option<Uuid>) -> InfraResult<bool>;

    async fn insert_user(&self, user: &UserWrite) -> InfraResult<UserRecord>;

    async fn update_user(&self, user_id: Uuid, user: &UserWrite) -> InfraResult<Option<UserRecord>>;

    async fn find_user(&self, user_id: Uuid) -> InfraResult<Option<UserRecord>>;

    /// Removes the user and, with it, their appointments.
    async fn delete_user(&self, user_id: Uuid) -> InfraResult<u64>;

    async fn list_users(&self) -> InfraResult<Vec<UserRecord>>;

    async fn find_credentials(&self, user_name: &str) -> InfraResult<Option<UserCredentials>>;
}
