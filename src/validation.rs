//! Field checks applied at the request boundary.
//!
//! Each check turns one raw request field into a typed value or a
//! [`FieldError`]. Handlers run every check for a request and report all
//! failures together.

use chrono::{NaiveDate, NaiveTime, Timelike};
use uuid::Uuid;

use crate::error::FieldError;

pub type Check<T> = Result<T, FieldError>;

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
const TIME_FORMATS: [&str; 2] = ["%H:%M", "%H:%M:%S"];

fn present<'a>(value: &'a Option<String>) -> Option<&'a str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Required UUID with distinct messages for missing and malformed input.
pub fn uuid_field(
    field: &str,
    value: &Option<String>,
    missing: &str,
    malformed: &str,
) -> Check<Uuid> {
    let raw = present(value).ok_or_else(|| FieldError::new(field, missing))?;
    Uuid::parse_str(raw).map_err(|_| FieldError::new(field, malformed))
}

pub fn id(field: &str, value: &Option<String>) -> Check<Uuid> {
    uuid_field(field, value, "Id is required", "Invalid id")
}

pub fn appointment_num(value: &Option<String>) -> Check<Uuid> {
    uuid_field(
        "appointment_num",
        value,
        "Appointment number is required",
        "Invalid appointment number",
    )
}

pub fn date(field: &str, value: &Option<String>) -> Check<NaiveDate> {
    let err = || FieldError::new(field, "Wrong Date Format");
    let raw = present(value).ok_or_else(err)?;
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .ok_or_else(err)
}

/// 24h wall-clock time. Seconds are accepted and dropped.
pub fn time(field: &str, value: &Option<String>) -> Check<NaiveTime> {
    let err = || FieldError::new(field, "Wrong Time format");
    let raw = present(value).ok_or_else(err)?;
    let parsed = TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(raw, fmt).ok())
        .ok_or_else(err)?;
    parsed.with_second(0).ok_or_else(err)
}

pub fn non_empty(field: &str, value: &Option<String>, message: &str) -> Check<String> {
    present(value)
        .map(str::to_string)
        .ok_or_else(|| FieldError::new(field, message))
}

pub fn email(field: &str, value: &Option<String>) -> Check<String> {
    let raw = present(value).ok_or_else(|| FieldError::new(field, "Wrong Email format"))?;
    if is_email(raw) {
        Ok(raw.to_string())
    } else {
        Err(FieldError::new(field, "Wrong Email format"))
    }
}

fn is_email(email: &str) -> bool {
    if email.len() > 254 || email.contains("..") {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || local.len() > 64 || domain.is_empty() || domain.contains('@') {
        return false;
    }

    let invalid_chars = ['<', '>', '(', ')', '[', ']', '\\', ',', ';', ':', '"', ' '];
    if email.chars().any(|c| invalid_chars.contains(&c)) {
        return false;
    }

    // at least one dot, no empty labels, alphabetic TLD
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2
        && labels.iter().all(|l| !l.is_empty() && !l.starts_with('-') && !l.ends_with('-'))
        && labels
            .last()
            .is_some_and(|tld| tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()))
}

/// Mobile-shaped number: optional leading `+`, then 7 to 15 digits once
/// spaces, dashes and parentheses are stripped. Stored as submitted.
pub fn phone(field: &str, value: &Option<String>) -> Check<String> {
    let err = || FieldError::new(field, "Wrong Phone Format");
    let raw = present(value).ok_or_else(err)?;

    let compact: String = raw
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect();
    let digits = compact.strip_prefix('+').unwrap_or(&compact);

    if (7..=15).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit()) {
        Ok(raw.to_string())
    } else {
        Err(err())
    }
}

/// Not trimmed: surrounding whitespace is part of the secret. Every failed
/// rule is reported, so a short weak password yields two errors.
pub fn password(field: &str, value: &Option<String>) -> Result<String, Vec<FieldError>> {
    let raw = value.as_deref().unwrap_or_default();
    let mut errors = Vec::new();
    if raw.chars().count() < 6 {
        errors.push(FieldError::new(field, "Your password is too short"));
    }
    if !is_strong_password(raw) {
        errors.push(FieldError::new(
            field,
            "Use combination of lower case, uppercase, numbers and special characters for your password",
        ));
    }
    if errors.is_empty() {
        Ok(raw.to_string())
    } else {
        Err(errors)
    }
}

fn is_strong_password(password: &str) -> bool {
    password.chars().count() >= 8
        && password.chars().any(|c| c.is_lowercase())
        && password.chars().any(|c| c.is_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| !c.is_alphanumeric() && !c.is_whitespace())
}

/// Credential pair for login and the admin listing: presence only.
pub fn credentials(
    user_name: &Option<String>,
    password: &Option<String>,
) -> (Check<String>, Check<String>) {
    let name = non_empty("user_name", user_name, "User name is required");
    let pass = match password.as_deref() {
        Some(p) if !p.is_empty() => Ok(p.to_string()),
        _ => Err(FieldError::new("password", "Password is required")),
    };
    (name, pass)
}
