//! Alert evaluation over a batch of maintenance windows.
//!
//! This is the decision core of the engine: given the full record batch,
//! the current time, and the dismissal store, [`evaluate`] computes which
//! windows must be surfaced, whether each of them can be dismissed, and
//! whether the application is partially or fully locked.
//!
//! Evaluation is a pure function of its inputs: no side effects, no
//! caching, nothing is written to the dismissal store.

use chrono::{DateTime, Utc};

use crate::alerts::dismissal_store::DismissalStore;
use crate::alerts::frequency::is_fresh_alert_due;
use crate::alerts::timewindow::{is_active, is_upcoming};
use crate::maintenance::MaintenanceWindow;

/// Badge shown for an active-locking window that affects the whole application.
pub const SYSTEM_LOCK_BADGE: &str = "Requires System Lock";
/// Badge shown for an active-locking window scoped to specific applications.
pub const APP_LOCK_BADGE: &str = "Requires App Lock";

/// Title used while some window is currently active.
pub const ALERT_TITLE: &str = "Scheduled Maintenance Alert";
/// Title used while every surfaced window is still upcoming.
pub const REMINDER_TITLE: &str = "Scheduled Maintenance Reminder";

/// A maintenance window selected for display, with its computed display fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleAlert {
    /// The underlying window record
    pub window: MaintenanceWindow,
    /// Formatted start timestamp
    pub start_label: String,
    /// Formatted end timestamp
    pub end_label: String,
    /// Whether this alert can be individually dismissed right now
    pub dismissible: bool,
    /// Lock badge, empty for windows that are dismissible by default
    pub badge_label: String,
}

/// The outcome of one evaluation cycle.
///
/// Recomputed from scratch on every cycle and published as a whole, so
/// readers never observe a half-updated surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationResult {
    /// Windows to surface, in input record order
    pub visible: Vec<VisibleAlert>,
    /// Some window's interval contains now
    pub is_in_maintenance: bool,
    /// An active window affects the whole application
    pub is_system_maintenance: bool,
    /// An active, system-scoped, non-dismissible window is in effect
    pub is_full_lock: bool,
    /// The surfaced alerts may be dismissed as a whole
    pub is_dismissible: bool,
    /// Derived display title, following `is_in_maintenance`
    pub title: String,
}

impl Default for EvaluationResult {
    /// The empty-input result: nothing visible, no locks, dismissible.
    fn default() -> Self {
        EvaluationResult {
            visible: Vec::new(),
            is_in_maintenance: false,
            is_system_maintenance: false,
            is_full_lock: false,
            is_dismissible: true,
            title: REMINDER_TITLE.to_string(),
        }
    }
}

/// Evaluates a batch of maintenance windows against the current time.
///
/// Each record is decided independently:
///
/// 1. It is surfaced when it is active and not dismissible by default (an
///    active lock always surfaces, prior dismissals notwithstanding), or
///    when the frequency policy says a fresh alert is due.
/// 2. A surfaced record is individually dismissible unless it is active
///    and not dismissible by default.
/// 3. Display fields are computed: formatted interval labels and a lock
///    badge for windows that are not dismissible by default.
///
/// The aggregate flags scan the full, unfiltered input, independent of
/// which records were selected for display: a window suppressed by a
/// prior dismissal still counts towards the maintenance and lock state.
pub fn evaluate(
    windows: &[MaintenanceWindow],
    now: DateTime<Utc>,
    store: &dyn DismissalStore,
) -> EvaluationResult {
    let visible = windows
        .iter()
        .filter(|window| should_show(window, now, store))
        .map(|window| VisibleAlert {
            window: window.clone(),
            start_label: format_label(window.start),
            end_label: format_label(window.end),
            dismissible: alert_dismissible(window, now),
            badge_label: badge_label(window).to_string(),
        })
        .collect();

    let mut is_in_maintenance = false;
    let mut is_system_maintenance = false;
    let mut is_full_lock = false;
    // Every record is inactive or dismissible by default
    let mut all_clear = true;

    for window in windows {
        if !is_active(now, window.start, window.end) {
            continue;
        }
        is_in_maintenance = true;
        if !is_system_maintenance && window.affects_system() {
            is_system_maintenance = true;
        }
        if !window.dismissible_by_default {
            all_clear = false;
            if window.affects_system() {
                is_full_lock = true;
            }
        }
    }

    let title = if is_in_maintenance {
        ALERT_TITLE
    } else {
        REMINDER_TITLE
    };

    EvaluationResult {
        visible,
        is_in_maintenance,
        is_system_maintenance,
        is_full_lock,
        is_dismissible: !is_full_lock && all_clear,
        title: title.to_string(),
    }
}

/// Whether a window must be surfaced right now.
fn should_show(window: &MaintenanceWindow, now: DateTime<Utc>, store: &dyn DismissalStore) -> bool {
    // An active, non-dismissible lock always surfaces
    if is_active(now, window.start, window.end) && !window.dismissible_by_default {
        return true;
    }
    is_fresh_alert_due(
        &window.alert_frequency,
        store.last_dismissed(&window.id),
        now,
    )
}

/// Whether a surfaced window can be individually dismissed right now.
fn alert_dismissible(window: &MaintenanceWindow, now: DateTime<Utc>) -> bool {
    if is_active(now, window.start, window.end) && !window.dismissible_by_default {
        return false;
    }
    is_upcoming(now, window.start) || window.dismissible_by_default
}

/// Lock badge for a window, empty when it is dismissible by default.
fn badge_label(window: &MaintenanceWindow) -> &'static str {
    if window.dismissible_by_default {
        return "";
    }
    if window.affects_system() {
        SYSTEM_LOCK_BADGE
    } else {
        APP_LOCK_BADGE
    }
}

/// Formats a timestamp for display, two-digit fields with a 12-hour clock.
fn format_label(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%m/%d/%y %I:%M %p").to_string()
}
