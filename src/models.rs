use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Serialize, Serializer};
use sqlx::FromRow;
use uuid::Uuid;

use crate::config::AdminCredentials;
use crate::store::Store;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub admin: AdminCredentials,
}

/* -------------------------
   Commands (validated input)
--------------------------*/

#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub doa: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub appointment_description: String,
    pub p_id: Uuid,
    pub user_id: Uuid,
}

#[derive(Debug, Clone)]
pub struct AppointmentChanges {
    pub appointment_num: Uuid,
    pub doa: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub appointment_description: String,
    pub user_id: Uuid,
}

#[derive(Debug, Clone)]
pub struct PatientDetails {
    pub p_first_name: String,
    pub p_last_name: String,
    pub p_email: String,
    pub dob: NaiveDate,
    pub phone_number: String,
}

#[derive(Debug, Clone)]
pub struct PatientChanges {
    pub p_id: Uuid,
    pub user_id: Uuid,
    pub details: PatientDetails,
}

#[derive(Debug, Clone)]
pub struct NameQuery {
    pub first_name: String,
    pub last_name: String,
}

/// User fields as submitted; the password is still plain text here.
#[derive(Debug, Clone)]
pub struct UserDetails {
    pub user_name: String,
    pub password: String,
    pub user_email: String,
    pub user_description: String,
}

/// User fields as persisted.
#[derive(Debug, Clone)]
pub struct UserWrite {
    pub user_name: String,
    pub password_hash: String,
    pub user_email: String,
    pub user_description: String,
}

/* -------------------------
   DB Row Models / projections
--------------------------*/

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct AppointmentRecord {
    pub appointment_num: Uuid,
    pub doa: NaiveDate,
    #[serde(serialize_with = "serialize_clock")]
    pub start_time: NaiveTime,
    #[serde(serialize_with = "serialize_clock")]
    pub end_time: NaiveTime,
    pub appointment_description: String,
    pub p_id: Uuid,
    pub user_id: Uuid,
}

/// Appointment joined with its patient's name.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct AppointmentView {
    pub appointment_num: Uuid,
    pub p_first_name: String,
    pub p_last_name: String,
    pub doa: NaiveDate,
    #[serde(serialize_with = "serialize_clock")]
    pub start_time: NaiveTime,
    #[serde(serialize_with = "serialize_clock")]
    pub end_time: NaiveTime,
    pub appointment_description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct PatientRecord {
    pub p_id: Uuid,
    pub p_first_name: String,
    pub p_last_name: String,
    pub p_email: String,
    pub dob: NaiveDate,
    pub phone_number: String,
}

/// Public view of a user; the password hash never leaves the store layer.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct UserRecord {
    pub user_id: Uuid,
    pub user_name: String,
    pub user_email: String,
    pub user_description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct UserCredentials {
    pub user_id: Uuid,
    pub password_hash: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
}

/* -------------------------
   Helpers
--------------------------*/

/// Wall-clock times go out as `HH:MM`; dates use chrono's `YYYY-MM-DD`.
pub fn serialize_clock<S: Serializer>(t: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&t.format("%H:%M"))
}
