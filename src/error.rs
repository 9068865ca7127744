use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Failures below the business rules: the store is unreachable, a query
/// failed, or hashing a credential failed. Never retried here.
#[derive(Debug, thiserror::Error)]
pub enum InfraError {
    #[error("db error: {0}")]
    Db(#[from] sqlx::Error),
    #[error("{0} row missing")]
    MissingRow(&'static str),
    #[error("password hash error: {0}")]
    PasswordHash(String),
}

pub type InfraResult<T> = Result<T, InfraError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ValidationResponse {
    pub errors: Vec<FieldError>,
}

#[derive(Debug, Serialize)]
pub struct InternalResponse {
    pub message: &'static str,
}

#[derive(Debug)]
pub enum ApiError {
    Validation(Vec<FieldError>),
    Internal(String),
}

impl ApiError {
    /// Collects the failed checks of one request into a single 400.
    pub fn from_checks<I>(checks: I) -> Self
    where
        I: IntoIterator<Item = Option<FieldError>>,
    {
        ApiError::Validation(checks.into_iter().flatten().collect())
    }
}

impl From<InfraError> for ApiError {
    fn from(e: InfraError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        ApiError::Validation(vec![FieldError::new("body", &e.body_text())])
    }
}

impl From<QueryRejection> for ApiError {
    fn from(e: QueryRejection) -> Self {
        ApiError::Validation(vec![FieldError::new("query", &e.body_text())])
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, Json(ValidationResponse { errors })).into_response()
            }
            ApiError::Internal(msg) => {
                // details stay in the log
                tracing::error!(error = %msg, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(InternalResponse {
                        message: "Internal Error",
                    }),
                )
                    .into_response()
            }
        }
    }
}
