use axum::{
    Json, Router,
    extract::{FromRequest, FromRequestParts, Query},
};
use serde::Serialize;

use crate::error::ApiError;
use crate::models::AppState;

pub mod appointment_routes;
pub mod health_routes;
pub mod patient_routes;
pub mod user_routes;

pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/api/appointments", appointment_routes::router())
        .nest("/api/patients", patient_routes::router())
        .nest("/api/users", user_routes::router())
        .merge(health_routes::router())
        .with_state(state)
}

/* ============================================================
   Extractors: malformed bodies and query strings become 400s
   in the same shape as field validation failures.
   ============================================================ */

#[derive(FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(Query), rejection(ApiError))]
pub struct QueryParams<T>(pub T);

/* ============================================================
   Response envelopes
   ============================================================ */

#[derive(Debug, Serialize)]
pub struct Reply<T> {
    pub response: T,
}

pub fn reply<T>(response: T) -> Json<Reply<T>> {
    Json(Reply { response })
}
