//! Internal data structures for representing maintenance windows.
//!
//! This module defines the core data structures used internally to represent
//! scheduled maintenance windows, their scope, and their re-alert frequency.

use std::{collections::HashSet, fmt};

use chrono::{DateTime, Utc};

/// Scope tag marking a window as affecting the entire application.
///
/// Windows carrying this tag can fully lock the application when they are
/// active and not dismissible by default.
pub const SYSTEM_SCOPE: &str = "System";

/// Represents a scheduled maintenance window.
///
/// Instances are converted from the wire representation once per poll cycle
/// and discarded after evaluation; the engine never caches them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaintenanceWindow {
    /// Unique identifier for the window record
    pub id: String,
    /// Display text, not interpreted by the engine
    pub subject: String,
    /// Start of the maintenance interval
    pub start: DateTime<Utc>,
    /// End of the maintenance interval
    ///
    /// `start <= end` is treated as given, never enforced. A window with
    /// `end < start` is simply never active.
    pub end: DateTime<Utc>,
    /// Whether the window may be dismissed even while active
    pub dismissible_by_default: bool,
    /// Scope tags the window applies to
    ///
    /// The controlled vocabulary includes at least [`SYSTEM_SCOPE`];
    /// other tags name specific applications.
    pub applicable_scope: HashSet<String>,
    /// How often a dismissed window may re-alert
    pub alert_frequency: AlertFrequency,
}

impl MaintenanceWindow {
    /// Whether this window applies to the whole application.
    pub fn affects_system(&self) -> bool {
        self.applicable_scope.contains(SYSTEM_SCOPE)
    }
}

impl fmt::Display for MaintenanceWindow {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "id={}, subject={}, start={}, end={}, dismissible={}, scope={:?}, frequency={:?}",
            self.id,
            self.subject,
            self.start,
            self.end,
            self.dismissible_by_default,
            self.applicable_scope,
            self.alert_frequency
        )
    }
}

/// How often a dismissed maintenance window alerts again.
///
/// Unknown wire values are carried as [`AlertFrequency::Other`] and never
/// suppress an alert, so a policy the engine does not recognize fails open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertFrequency {
    /// Alert on every evaluation, regardless of prior dismissals.
    EveryVisit,
    /// Alert at most once per calendar day.
    Daily,
    /// Alert at most once per seven calendar days.
    Weekly,
    /// Unrecognized policy, treated as always-alert.
    Other(String),
}
