//! Response structures for the maintenance service API.
//!
//! This module contains structures for deserializing JSON responses from
//! the maintenance service endpoints.

use serde::Deserialize;
use std::fmt;

/// Representation of a maintenance window record from `/api/maintenance/windows`.
///
/// Timestamps stay raw strings here; parsing into [`chrono`] types happens
/// during conversion so that one malformed record never fails a whole batch.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct WindowRecord {
    /// Unique identifier for the window record.
    pub id: String,
    /// Display text for the alert surface.
    #[serde(default)]
    pub subject: String,
    /// Start timestamp, RFC 3339.
    #[serde(default)]
    pub start_date_time: Option<String>,
    /// End timestamp, RFC 3339.
    #[serde(default)]
    pub end_date_time: Option<String>,
    /// Whether the window may be dismissed while active.
    #[serde(default)]
    pub dismissible: bool,
    /// Semicolon-separated scope tags, e.g. `"System;Sales"`.
    #[serde(default)]
    pub applicable_scope: String,
    /// Re-alert frequency, e.g. `"Every Visit"`, `"Daily"`, `"Weekly"`.
    #[serde(default)]
    pub alert_frequency: String,
}

impl fmt::Display for WindowRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "id={}, subject={}, start={:?}, end={:?}",
            self.id, self.subject, self.start_date_time, self.end_date_time
        )
    }
}

/// Representation of an application id lookup from `/api/apps/id`.
///
/// The id is optional: an unknown application name is not an error, the
/// service just returns nothing navigable.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AppIdResponse {
    /// Navigable application identifier, absent when the name is unknown.
    #[serde(default)]
    pub app_id: Option<String>,
}
