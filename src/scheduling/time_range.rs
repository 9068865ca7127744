use chrono::NaiveTime;

use super::clock;
use crate::outcome::Rejection;

/// Intra-day ordering check, compared on (hour, minute).
pub fn validate_time_range(start: NaiveTime, end: NaiveTime) -> Result<(), Rejection> {
    let (start, end) = (clock(start), clock(end));

    if start > end {
        return Err(Rejection::end_before_start());
    }
    if start == end {
        return Err(Rejection::end_equals_start());
    }
    Ok(())
}
