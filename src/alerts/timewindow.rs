//! Pure time-window predicates.
//!
//! Both predicates are total: an interval with `end` before `start` is
//! simply never active, which is accepted behavior, not a fault.

use chrono::{DateTime, Utc};

/// Whether `now` falls inside `[start, end]`, inclusive on both ends.
pub fn is_active(now: DateTime<Utc>, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
    start <= now && now <= end
}

/// Whether the window has not started yet.
pub fn is_upcoming(now: DateTime<Utc>, start: DateTime<Utc>) -> bool {
    now < start
}
