use chrono::{NaiveDate, NaiveTime};
use tracing::debug;
use uuid::Uuid;

use super::clock;
use crate::error::InfraResult;
use crate::models::AppointmentRecord;
use crate::outcome::Rejection;
use crate::store::Store;

/// Closed-interval intersection on (hour, minute).
///
/// Equivalent to the disjunction "either interval contains a bound of the
/// other". Ranges that merely touch (`[9:00,10:00]` and `[10:00,11:00]`)
/// conflict.
pub fn intervals_conflict(
    existing: (NaiveTime, NaiveTime),
    candidate: (NaiveTime, NaiveTime),
) -> bool {
    let (s, e) = (clock(existing.0), clock(existing.1));
    let (cs, ce) = (clock(candidate.0), clock(candidate.1));
    s <= ce && cs <= e
}

/// First booking in `existing` that collides with the candidate range.
/// `exclude` skips the row being rescheduled.
pub fn find_conflict<'a>(
    existing: &'a [AppointmentRecord],
    start: NaiveTime,
    end: NaiveTime,
    exclude: Option<Uuid>,
) -> Option<&'a AppointmentRecord> {
    existing
        .iter()
        .filter(|a| Some(a.appointment_num) != exclude)
        .find(|a| intervals_conflict((a.start_time, a.end_time), (start, end)))
}

/// Scans the user's bookings for `doa`.
pub async fn check_overlap(
    store: &dyn Store,
    user_id: Uuid,
    doa: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
    exclude: Option<Uuid>,
) -> InfraResult<Option<Rejection>> {
    let day = store.appointments_on_date(user_id, doa).await?;
    debug!(%user_id, %doa, booked = day.len(), "scanning day for overlaps");

    Ok(find_conflict(&day, start, end, exclude).map(|hit| {
        debug!(conflicts_with = %hit.appointment_num, "overlap found");
        Rejection::appointment_conflict()
    }))
}
