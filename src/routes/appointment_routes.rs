// src/routes/appointment_routes.rs

use axum::{
    Json, Router,
    extract::State,
    routing::{delete, get, post, put},
};
use serde::{Deserialize, Serialize};

use crate::{
    error::ApiError,
    models::{
        AppState, AppointmentChanges, AppointmentRecord, AppointmentView, NameQuery,
        NewAppointment,
    },
    outcome::Outcome,
    routes::{JsonBody, QueryParams, Reply, reply},
    services::appointments,
    validation::{appointment_num, date, id, non_empty, time},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/insertAppointment", post(insert_appointment))
        .route("/deleteAppointment", delete(delete_appointment))
        .route("/getAppointments", get(get_appointments))
        .route("/updateAppointment", put(update_appointment))
        .route("/searchAppointmentsForPatient", post(search_for_patient))
        .route("/searchAppointmentsByDate", post(search_by_date))
}

/* ============================================================
   Request DTOs
   ============================================================ */

#[derive(Debug, Deserialize)]
pub struct InsertAppointmentRequest {
    pub doa: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub appointment_description: Option<String>,
    pub p_id: Option<String>,
    pub user_id: Option<String>,
}

impl InsertAppointmentRequest {
    fn validate(self) -> Result<NewAppointment, ApiError> {
        match (
            time("start_time", &self.start_time),
            time("end_time", &self.end_time),
            id("user_id", &self.user_id),
            id("p_id", &self.p_id),
            non_empty(
                "appointment_description",
                &self.appointment_description,
                "Description is required",
            ),
            date("doa", &self.doa),
        ) {
            (Ok(start_time), Ok(end_time), Ok(user_id), Ok(p_id), Ok(description), Ok(doa)) => {
                Ok(NewAppointment {
                    doa,
                    start_time,
                    end_time,
                    appointment_description: description,
                    p_id,
                    user_id,
                })
            }
            (a, b, c, d, e, f) => Err(ApiError::from_checks([
                a.err(),
                b.err(),
                c.err(),
                d.err(),
                e.err(),
                f.err(),
            ])),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateAppointmentRequest {
    pub appointment_num: Option<String>,
    pub doa: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub appointment_description: Option<String>,
    pub user_id: Option<String>,
}

impl UpdateAppointmentRequest {
    fn validate(self) -> Result<AppointmentChanges, ApiError> {
        match (
            time("start_time", &self.start_time),
            time("end_time", &self.end_time),
            id("user_id", &self.user_id),
            appointment_num(&self.appointment_num),
            non_empty(
                "appointment_description",
                &self.appointment_description,
                "Description is required",
            ),
            date("doa", &self.doa),
        ) {
            (Ok(start_time), Ok(end_time), Ok(user_id), Ok(num), Ok(description), Ok(doa)) => {
                Ok(AppointmentChanges {
                    appointment_num: num,
                    doa,
                    start_time,
                    end_time,
                    appointment_description: description,
                    user_id,
                })
            }
            (a, b, c, d, e, f) => Err(ApiError::from_checks([
                a.err(),
                b.err(),
                c.err(),
                d.err(),
                e.err(),
                f.err(),
            ])),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DeleteAppointmentRequest {
    pub appointment_num: Option<String>,
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UserScope {
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PatientNameSearch {
    pub p_first_name: Option<String>,
    pub p_last_name: Option<String>,
    pub user_id: Option<String>,
}

impl PatientNameSearch {
    /// Shared with the patient search endpoint.
    pub fn validate(self) -> Result<(uuid::Uuid, NameQuery), ApiError> {
        match (
            non_empty("p_first_name", &self.p_first_name, "First Name is required"),
            non_empty("p_last_name", &self.p_last_name, "Last Name is required"),
            id("user_id", &self.user_id),
        ) {
            (Ok(first_name), Ok(last_name), Ok(user_id)) => Ok((
                user_id,
                NameQuery {
                    first_name,
                    last_name,
                },
            )),
            (a, b, c) => Err(ApiError::from_checks([a.err(), b.err(), c.err()])),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DateSearch {
    pub doa: Option<String>,
    pub user_id: Option<String>,
}

/* ============================================================
   Response DTOs
   ============================================================ */

#[derive(Debug, Serialize)]
pub struct AppointmentsReply {
    pub appointments: Outcome<Vec<AppointmentRecord>>,
}

/* ============================================================
   Handlers
   ============================================================ */

pub async fn insert_appointment(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<InsertAppointmentRequest>,
) -> Result<Json<Reply<Outcome<AppointmentView>>>, ApiError> {
    let new = req.validate()?;
    let outcome = appointments::insert_appointment(state.store.as_ref(), new).await?;
    Ok(reply(outcome))
}

pub async fn update_appointment(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<UpdateAppointmentRequest>,
) -> Result<Json<Reply<Outcome<AppointmentView>>>, ApiError> {
    let changes = req.validate()?;
    let outcome = appointments::update_appointment(state.store.as_ref(), changes).await?;
    Ok(reply(outcome))
}

pub async fn delete_appointment(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<DeleteAppointmentRequest>,
) -> Result<Json<Reply<Outcome<AppointmentRecord>>>, ApiError> {
    let (num, user_id) = match (id("user_id", &req.user_id), appointment_num(&req.appointment_num)) {
        (Ok(user_id), Ok(num)) => (num, user_id),
        (a, b) => return Err(ApiError::from_checks([a.err(), b.err()])),
    };

    let outcome = appointments::delete_appointment(state.store.as_ref(), num, user_id).await?;
    Ok(reply(outcome))
}

pub async fn get_appointments(
    State(state): State<AppState>,
    QueryParams(q): QueryParams<UserScope>,
) -> Result<Json<AppointmentsReply>, ApiError> {
    let user_id = id("user_id", &q.user_id).map_err(|e| ApiError::Validation(vec![e]))?;
    let appointments = appointments::list_appointments(state.store.as_ref(), user_id).await?;
    Ok(Json(AppointmentsReply { appointments }))
}

pub async fn search_for_patient(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<PatientNameSearch>,
) -> Result<Json<Reply<Outcome<Vec<AppointmentView>>>>, ApiError> {
    let (user_id, query) = req.validate()?;
    let outcome = appointments::appointments_for_patient(state.store.as_ref(), user_id, query).await?;
    Ok(reply(outcome))
}

pub async fn search_by_date(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<DateSearch>,
) -> Result<Json<Reply<Outcome<Vec<AppointmentView>>>>, ApiError> {
    let (user_id, doa) = match (id("user_id", &req.user_id), date("doa", &req.doa)) {
        (Ok(user_id), Ok(doa)) => (user_id, doa),
        (a, b) => return Err(ApiError::from_checks([a.err(), b.err()])),
    };

    let outcome = appointments::appointments_by_date(state.store.as_ref(), user_id, doa).await?;
    Ok(reply(outcome))
}
