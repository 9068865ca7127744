// src/routes/patient_routes.rs

use axum::{
    Json, Router,
    extract::State,
    routing::{delete, get, post, put},
};
use serde::Deserialize;

use crate::{
    error::{ApiError, FieldError},
    models::{AppState, PatientChanges, PatientDetails, PatientRecord},
    outcome::Outcome,
    routes::{
        JsonBody, QueryParams, Reply,
        appointment_routes::{PatientNameSearch, UserScope},
        reply,
    },
    services::patients,
    validation::{date, email, id, non_empty, phone},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/insertPatient", post(insert_patient))
        .route("/deletePatient", delete(delete_patient))
        .route("/updatePatient", put(update_patient))
        .route("/getPatients", get(get_patients))
        .route("/searchPatient", post(search_patient))
}

/* ============================================================
   Request DTOs
   ============================================================ */

#[derive(Debug, Deserialize)]
pub struct PatientFields {
    pub p_first_name: Option<String>,
    pub p_last_name: Option<String>,
    pub p_email: Option<String>,
    pub dob: Option<String>,
    pub phone_number: Option<String>,
}

impl PatientFields {
    fn validate(&self) -> Result<PatientDetails, Vec<FieldError>> {
        match (
            non_empty("p_first_name", &self.p_first_name, "First Name is required"),
            non_empty("p_last_name", &self.p_last_name, "Last Name is required"),
            date("dob", &self.dob),
            phone("phone_number", &self.phone_number),
            email("p_email", &self.p_email),
        ) {
            (Ok(p_first_name), Ok(p_last_name), Ok(dob), Ok(phone_number), Ok(p_email)) => {
                Ok(PatientDetails {
                    p_first_name,
                    p_last_name,
                    p_email,
                    dob,
                    phone_number,
                })
            }
            (a, b, c, d, e) => Err([a.err(), b.err(), c.err(), d.err(), e.err()]
                .into_iter()
                .flatten()
                .collect()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdatePatientRequest {
    pub p_id: Option<String>,
    pub user_id: Option<String>,
    #[serde(flatten)]
    pub fields: PatientFields,
}

impl UpdatePatientRequest {
    fn validate(self) -> Result<PatientChanges, ApiError> {
        match (
            id("p_id", &self.p_id),
            id("user_id", &self.user_id),
            self.fields.validate(),
        ) {
            (Ok(p_id), Ok(user_id), Ok(details)) => Ok(PatientChanges {
                p_id,
                user_id,
                details,
            }),
            (a, b, details) => {
                let mut errors: Vec<FieldError> = [a.err(), b.err()].into_iter().flatten().collect();
                errors.extend(details.err().unwrap_or_default());
                Err(ApiError::Validation(errors))
            }
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DeletePatientRequest {
    pub id: Option<String>,
    pub user_id: Option<String>,
}

/* ============================================================
   Handlers
   ============================================================ */

pub async fn insert_patient(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<PatientFields>,
) -> Result<Json<Reply<PatientRecord>>, ApiError> {
    let details = req.validate().map_err(ApiError::Validation)?;

    let record = patients::insert_patient(state.store.as_ref(), details).await?;
    Ok(reply(record))
}

pub async fn update_patient(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<UpdatePatientRequest>,
) -> Result<Json<Reply<Outcome<PatientRecord>>>, ApiError> {
    let changes = req.validate()?;
    let outcome = patients::update_patient(state.store.as_ref(), changes).await?;
    Ok(reply(outcome))
}

pub async fn delete_patient(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<DeletePatientRequest>,
) -> Result<Json<Reply<Outcome<PatientRecord>>>, ApiError> {
    let (p_id, user_id) = match (id("id", &req.id), id("user_id", &req.user_id)) {
        (Ok(p_id), Ok(user_id)) => (p_id, user_id),
        (a, b) => return Err(ApiError::from_checks([a.err(), b.err()])),
    };

    let outcome = patients::delete_patient(state.store.as_ref(), p_id, user_id).await?;
    Ok(reply(outcome))
}

pub async fn get_patients(
    State(state): State<AppState>,
    QueryParams(q): QueryParams<UserScope>,
) -> Result<Json<Reply<Vec<PatientRecord>>>, ApiError> {
    let user_id = id("user_id", &q.user_id).map_err(|e| ApiError::Validation(vec![e]))?;
    let rows = patients::list_patients(state.store.as_ref(), user_id).await?;
    Ok(reply(rows))
}

pub async fn search_patient(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<PatientNameSearch>,
) -> Result<Json<Reply<Outcome<Vec<PatientRecord>>>>, ApiError> {
    let (user_id, query) = req.validate()?;
    let outcome = patients::search_patients(state.store.as_ref(), user_id, query).await?;
    Ok(reply(outcome))
}
