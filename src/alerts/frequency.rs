//! Dismissal-frequency policy.
//!
//! Given a window's alert frequency and the date it was last dismissed,
//! decides whether a fresh alert is due. Comparisons use calendar dates,
//! never time-of-day, so a window dismissed in the morning does not
//! re-alert the same evening.

use chrono::{DateTime, NaiveDate, Utc};

use crate::maintenance::AlertFrequency;

/// Minimum age in calendar days before a `Weekly` window re-alerts.
const WEEKLY_SPAN_DAYS: i64 = 7;

/// Whether a fresh alert is due for a window with the given frequency.
///
/// A window that was never dismissed is always due. Unknown frequencies
/// ([`AlertFrequency::Other`]) never suppress an alert.
///
/// # Arguments
///
/// * `frequency` - The window's re-alert policy.
/// * `last_dismissed` - The stored last-dismissed date, if any.
/// * `now` - The current time; only its calendar date is consulted.
pub fn is_fresh_alert_due(
    frequency: &AlertFrequency,
    last_dismissed: Option<NaiveDate>,
    now: DateTime<Utc>,
) -> bool {
    let Some(last_dismissed) = last_dismissed else {
        return true;
    };

    match frequency {
        AlertFrequency::EveryVisit => true,
        AlertFrequency::Daily => last_dismissed != now.date_naive(),
        // Due again on the seventh calendar day after the dismissal,
        // whatever the time-of-day
        AlertFrequency::Weekly => {
            now.date_naive().signed_duration_since(last_dismissed).num_days() >= WEEKLY_SPAN_DAYS
        }
        AlertFrequency::Other(_) => true,
    }
}
