//! Appointment validation engine: the rules deciding whether a proposed
//! time range may be booked for a user.
//!
//! Checks run in a fixed order and the first failure wins:
//! [`time_range`] (no I/O), then [`ownership`], then [`overlap`].

pub mod overlap;
pub mod ownership;
pub mod time_range;

use chrono::{NaiveTime, Timelike};

/// Scheduling works at minute granularity; seconds never take part in a
/// comparison.
pub fn clock(t: NaiveTime) -> (u32, u32) {
    (t.hour(), t.minute())
}
