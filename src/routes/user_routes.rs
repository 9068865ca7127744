// src/routes/user_routes.rs

use axum::{
    Json, Router,
    extract::State,
    routing::{delete, post, put},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{ApiError, FieldError},
    models::{AppState, AuthenticatedUser, UserDetails, UserRecord},
    outcome::Outcome,
    routes::{JsonBody, Reply, reply},
    services::users,
    validation::{credentials, email, id, non_empty, password},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/insertUser", post(insert_user))
        .route("/updateUser", put(update_user))
        .route("/deleteUser", delete(delete_user))
        .route("/getAllUsers", post(get_all_users))
        .route("/authenticateUser", post(authenticate_user))
}

/* ============================================================
   Request DTOs
   ============================================================ */

#[derive(Debug, Deserialize)]
pub struct UserFields {
    pub user_name: Option<String>,
    pub password: Option<String>,
    pub user_email: Option<String>,
    pub user_description: Option<String>,
}

impl UserFields {
    fn validate(&self) -> Result<UserDetails, Vec<FieldError>> {
        match (
            non_empty("user_name", &self.user_name, "Name is required"),
            password("password", &self.password),
            email("user_email", &self.user_email),
            non_empty(
                "user_description",
                &self.user_description,
                "Description is required",
            ),
        ) {
            (Ok(user_name), Ok(password), Ok(user_email), Ok(user_description)) => {
                Ok(UserDetails {
                    user_name,
                    password,
                    user_email,
                    user_description,
                })
            }
            (a, b, c, d) => {
                let mut errors: Vec<FieldError> = a.err().into_iter().collect();
                errors.extend(b.err().unwrap_or_default());
                errors.extend(c.err());
                errors.extend(d.err());
                Err(errors)
            }
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub user_id: Option<String>,
    #[serde(flatten)]
    pub fields: UserFields,
}

#[derive(Debug, Deserialize)]
pub struct DeleteUserRequest {
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub user_name: Option<String>,
    pub password: Option<String>,
}

impl CredentialsRequest {
    fn validate(self) -> Result<(String, String), ApiError> {
        match credentials(&self.user_name, &self.password) {
            (Ok(user_name), Ok(password)) => Ok((user_name, password)),
            (a, b) => Err(ApiError::from_checks([a.err(), b.err()])),
        }
    }
}

/* ============================================================
   Response DTOs
   ============================================================ */

#[derive(Debug, Serialize)]
pub struct UsersReply {
    pub users: Outcome<Vec<UserRecord>>,
}

/* ============================================================
   Handlers
   ============================================================ */

pub async fn insert_user(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<UserFields>,
) -> Result<Json<Reply<Outcome<UserRecord>>>, ApiError> {
    let details = req.validate().map_err(ApiError::Validation)?;
    let outcome = users::insert_user(state.store.as_ref(), details).await?;
    Ok(reply(outcome))
}

pub async fn update_user(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<UpdateUserRequest>,
) -> Result<Json<Reply<Outcome<UserRecord>>>, ApiError> {
    let (user_id, details) = match (id("user_id", &req.user_id), req.fields.validate()) {
        (Ok(user_id), Ok(details)) => (user_id, details),
        (a, details) => {
            let mut errors: Vec<FieldError> = a.err().into_iter().collect();
            errors.extend(details.err().unwrap_or_default());
            return Err(ApiError::Validation(errors));
        }
    };

    let outcome = users::update_user(state.store.as_ref(), user_id, details).await?;
    Ok(reply(outcome))
}

pub async fn delete_user(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<DeleteUserRequest>,
) -> Result<Json<Reply<Outcome<UserRecord>>>, ApiError> {
    let user_id: Uuid = id("user_id", &req.user_id).map_err(|e| ApiError::Validation(vec![e]))?;
    let outcome = users::delete_user(state.store.as_ref(), user_id).await?;
    Ok(reply(outcome))
}

pub async fn get_all_users(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CredentialsRequest>,
) -> Result<Json<UsersReply>, ApiError> {
    let (user_name, password) = req.validate()?;
    let users = users::list_users(state.store.as_ref(), &state.admin, &user_name, &password).await?;
    Ok(Json(UsersReply { users }))
}

pub async fn authenticate_user(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CredentialsRequest>,
) -> Result<Json<Reply<Outcome<AuthenticatedUser>>>, ApiError> {
    let (user_name, password) = req.validate()?;
    let outcome = users::authenticate(state.store.as_ref(), &user_name, &password).await?;
    Ok(reply(outcome))
}
