//! Result of a scheduling operation as seen by the boundary layer.
//!
//! Business-rule failures are values, not errors: an operation either
//! produces its projection or a [`Rejection`] naming what went wrong.
//! Infrastructure failures travel separately as `InfraError`.

use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionKind {
    InvalidTimeRange,
    InvalidPatient,
    Conflict,
    NotFound,
    DuplicateUsername,
    InvalidCredentials,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rejection {
    pub kind: RejectionKind,
    pub message: &'static str,
}

impl Rejection {
    const fn new(kind: RejectionKind, message: &'static str) -> Self {
        Self { kind, message }
    }

    pub const fn end_before_start() -> Self {
        Self::new(
            RejectionKind::InvalidTimeRange,
            "End Time can't be earlier than Start Time",
        )
    }

    pub const fn end_equals_start() -> Self {
        Self::new(
            RejectionKind::InvalidTimeRange,
            "End Time can't be equal Start Time",
        )
    }

    pub const fn unknown_patient() -> Self {
        Self::new(RejectionKind::InvalidPatient, "Wrong patient id")
    }

    pub const fn patient_of_other_user() -> Self {
        Self::new(RejectionKind::InvalidPatient, "Wrong Patient Id.")
    }

    pub const fn appointment_conflict() -> Self {
        Self::new(RejectionKind::Conflict, "Appointment already assigned.")
    }

    pub const fn no_such_appointment() -> Self {
        Self::new(RejectionKind::NotFound, "No appointment with such number")
    }

    pub const fn no_appointments() -> Self {
        Self::new(RejectionKind::NotFound, "No appointments found.")
    }

    pub const fn no_matching_appointment() -> Self {
        Self::new(RejectionKind::NotFound, "No matching appointment found.")
    }

    pub const fn no_such_patient() -> Self {
        Self::new(RejectionKind::NotFound, "No patient with such ID.")
    }

    pub const fn no_matching_patient() -> Self {
        Self::new(RejectionKind::NotFound, "No matching patient")
    }

    pub const fn username_taken() -> Self {
        Self::new(RejectionKind::DuplicateUsername, "Username already used")
    }

    pub const fn no_such_user() -> Self {
        Self::new(RejectionKind::NotFound, "User not found")
    }

    pub const fn invalid_credentials() -> Self {
        Self::new(
            RejectionKind::InvalidCredentials,
            "Invalid username or password",
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Accepted(T),
    Rejected(Rejection),
}

#[cfg(test)]
impl<T> Outcome<T> {
    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            Outcome::Accepted(_) => None,
            Outcome::Rejected(r) => Some(*r),
        }
    }

    pub fn into_accepted(self) -> Option<T> {
        match self {
            Outcome::Accepted(v) => Some(v),
            Outcome::Rejected(_) => None,
        }
    }
}

impl<T> Outcome<Vec<T>> {
    /// Rejects an empty collection instead of returning it.
    pub fn non_empty(items: Vec<T>, when_empty: Rejection) -> Self {
        if items.is_empty() {
            Outcome::Rejected(when_empty)
        } else {
            Outcome::Accepted(items)
        }
    }
}

impl<T> From<Rejection> for Outcome<T> {
    fn from(r: Rejection) -> Self {
        Outcome::Rejected(r)
    }
}

/// Accepted values serialize as themselves; rejections as their bare
/// message string, which is what boundary clients match on.
impl<T: Serialize> Serialize for Outcome<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Outcome::Accepted(v) => v.serialize(serializer),
            Outcome::Rejected(r) => serializer.serialize_str(r.message),
        }
    }
}
