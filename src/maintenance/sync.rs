//! Fetch-and-convert layer for maintenance window records.
//!
//! This module provides the [`MaintenanceSync`] struct that turns wire
//! records from the maintenance service into [`MaintenanceWindow`] values,
//! one batch per poll cycle. Failures degrade to an empty batch and
//! malformed records are dropped individually, so one bad record or one
//! unreachable service never takes the alert surface down with an error.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};

use crate::maintenance::requester::RecordSource;
use crate::maintenance::response_structs::WindowRecord;
use crate::maintenance::structs::{AlertFrequency, MaintenanceWindow};

/// Converts wire records from a [`RecordSource`] into maintenance windows.
///
/// Stateless: windows are re-fetched on every cycle and discarded after
/// evaluation, there is no caching across cycles.
///
/// # Examples
///
/// ```no_run
/// use upkeep::maintenance::{MaintenanceRequester, MaintenanceSync};
/// use std::sync::Arc;
///
/// # #[tokio::main]
/// # async fn main() {
/// let requester = Arc::new(MaintenanceRequester::new("http://service", "api_key"));
/// let sync = MaintenanceSync::new(requester);
/// let windows = sync.fetch_windows("Sales").await;
/// # }
/// ```
pub struct MaintenanceSync<R: RecordSource> {
    /// Requester to interact with the maintenance service
    requester: Arc<R>,
}

impl<R: RecordSource> MaintenanceSync<R> {
    /// Create a new [MaintenanceSync].
    ///
    /// # Arguments
    ///
    /// * `requester` - An implementation of the [RecordSource] trait.
    pub fn new(requester: Arc<R>) -> Self {
        MaintenanceSync { requester }
    }

    /// Fetches and converts the maintenance windows for an application context.
    ///
    /// On a fetch failure the error is logged and an empty batch is
    /// returned; the next poll cycle retries automatically. Records with
    /// missing or unparseable timestamps are dropped with a warning, the
    /// rest of the batch survives.
    pub async fn fetch_windows(&self, app_context: &str) -> Vec<MaintenanceWindow> {
        info!("request maintenance windows from the maintenance service");

        let records = match self.requester.fetch_active_windows(app_context).await {
            Ok(records) => records,
            Err(e) => {
                error!("error while fetching maintenance windows: {}", e);
                return Vec::new();
            }
        };

        let windows: Vec<MaintenanceWindow> = records
            .into_iter()
            .filter_map(|record| self.convert_window(record))
            .collect();

        debug!("converted windows {:?}", windows);
        info!("finished requesting maintenance windows");

        windows
    }

    /// Converts a wire record into a [`MaintenanceWindow`].
    ///
    /// Returns `None` for records whose timestamps are missing or do not
    /// parse; such a record is never active and never shown.
    fn convert_window(&self, record: WindowRecord) -> Option<MaintenanceWindow> {
        debug!("convert window record {}", record);

        let Some(start) = self.parse_timestamp(&record.id, record.start_date_time.as_deref())
        else {
            return None;
        };
        let Some(end) = self.parse_timestamp(&record.id, record.end_date_time.as_deref()) else {
            return None;
        };

        if start > end {
            // Kept with its never-active semantics rather than dropped
            warn!(
                "window {} has start after end ({} > {}), it will never be active",
                record.id, start, end
            );
        }

        Some(MaintenanceWindow {
            id: record.id,
            subject: record.subject,
            start,
            end,
            dismissible_by_default: record.dismissible,
            applicable_scope: self.convert_scope(&record.applicable_scope),
            alert_frequency: self.convert_frequency(&record.alert_frequency),
        })
    }

    /// Parses an RFC 3339 timestamp from the wire.
    ///
    /// Logs a warning naming the offending record when the value is
    /// missing or malformed.
    fn parse_timestamp(&self, record_id: &str, value: Option<&str>) -> Option<DateTime<Utc>> {
        let Some(value) = value else {
            warn!("window {} is missing a timestamp, dropping it", record_id);
            return None;
        };

        match DateTime::parse_from_rfc3339(value) {
            Ok(timestamp) => Some(timestamp.with_timezone(&Utc)),
            Err(e) => {
                warn!(
                    "window {} has a malformed timestamp '{}' ({}), dropping it",
                    record_id, value, e
                );
                None
            }
        }
    }

    /// Splits the semicolon-separated scope field into a tag set.
    fn convert_scope(&self, scope: &str) -> HashSet<String> {
        scope
            .split(';')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Converts a frequency string from the API into an [`AlertFrequency`].
    ///
    /// Unknown values fall back to [`AlertFrequency::Other`], which never
    /// suppresses an alert.
    fn convert_frequency(&self, frequency: &str) -> AlertFrequency {
        match frequency {
            "Every Visit" => AlertFrequency::EveryVisit,
            "Daily" => AlertFrequency::Daily,
            "Weekly" => AlertFrequency::Weekly,
            other => {
                warn!("unknown alert frequency '{}', treating as always-alert", other);
                AlertFrequency::Other(other.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maintenance::SourceError;
    use crate::maintenance::requester::MockRecordSource;

    fn make_record(id: &str, start: Option<&str>, end: Option<&str>) -> WindowRecord {
        WindowRecord {
            id: id.to_string(),
            subject: format!("Maintenance {}", id),
            start_date_time: start.map(str::to_string),
            end_date_time: end.map(str::to_string),
            dismissible: true,
            applicable_scope: "System;Sales".to_string(),
            alert_frequency: "Daily".to_string(),
        }
    }

    fn sync_with(mock: MockRecordSource) -> MaintenanceSync<MockRecordSource> {
        MaintenanceSync::new(Arc::new(mock))
    }

    #[tokio::test]
    async fn test_fetch_windows() {
        let mut mock_source = MockRecordSource::new();

        mock_source
            .expect_fetch_active_windows()
            .with(mockall::predicate::eq("Sales"))
            .times(1)
            .returning(|_| {
                Box::pin(async {
                    Ok(vec![
                        make_record(
                            "a01",
                            Some("2024-01-10T00:00:00Z"),
                            Some("2024-01-12T00:00:00Z"),
                        ),
                        make_record(
                            "a02",
                            Some("2024-02-01T08:30:00Z"),
                            Some("2024-02-01T10:00:00Z"),
                        ),
                    ])
                })
            });

        let sync = sync_with(mock_source);
        let windows = sync.fetch_windows("Sales").await;

        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].id, "a01");
        assert_eq!(windows[0].subject, "Maintenance a01");
        assert!(windows[0].dismissible_by_default);
        assert!(windows[0].affects_system());
        assert!(windows[0].applicable_scope.contains("Sales"));
        assert_eq!(windows[0].alert_frequency, AlertFrequency::Daily);
        assert_eq!(
            windows[0].start,
            DateTime::parse_from_rfc3339("2024-01-10T00:00:00Z").unwrap()
        );
        assert_eq!(windows[1].id, "a02");
    }

    #[tokio::test]
    async fn test_fetch_windows_degrades_to_empty_on_error() {
        let mut mock_source = MockRecordSource::new();

        mock_source
            .expect_fetch_active_windows()
            .times(1)
            .returning(|_| Box::pin(async { Err(SourceError::Permission(403)) }));

        let sync = sync_with(mock_source);
        let windows = sync.fetch_windows("Sales").await;

        assert!(windows.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_windows_drops_malformed_records() {
        let mut mock_source = MockRecordSource::new();

        mock_source
            .expect_fetch_active_windows()
            .times(1)
            .returning(|_| {
                Box::pin(async {
                    Ok(vec![
                        make_record("bad-ts", Some("not a timestamp"), Some("2024-01-12T00:00:00Z")),
                        make_record("no-end", Some("2024-01-10T00:00:00Z"), None),
                        make_record(
                            "good",
                            Some("2024-01-10T00:00:00Z"),
                            Some("2024-01-12T00:00:00Z"),
                        ),
                    ])
                })
            });

        let sync = sync_with(mock_source);
        let windows = sync.fetch_windows("Sales").await;

        // The malformed siblings are dropped, the valid record survives
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].id, "good");
    }

    #[tokio::test]
    async fn test_fetch_windows_keeps_inverted_interval() {
        let mut mock_source = MockRecordSource::new();

        mock_source
            .expect_fetch_active_windows()
            .times(1)
            .returning(|_| {
                Box::pin(async {
                    Ok(vec![make_record(
                        "inverted",
                        Some("2024-01-12T00:00:00Z"),
                        Some("2024-01-10T00:00:00Z"),
                    )])
                })
            });

        let sync = sync_with(mock_source);
        let windows = sync.fetch_windows("Sales").await;

        // Parseable but inverted: kept, it is just never active
        assert_eq!(windows.len(), 1);
        assert!(windows[0].start > windows[0].end);
    }

    #[test]
    fn test_convert_frequency() {
        let sync = sync_with(MockRecordSource::new());

        assert_eq!(
            sync.convert_frequency("Every Visit"),
            AlertFrequency::EveryVisit
        );
        assert_eq!(sync.convert_frequency("Daily"), AlertFrequency::Daily);
        assert_eq!(sync.convert_frequency("Weekly"), AlertFrequency::Weekly);
        assert_eq!(
            sync.convert_frequency("Fortnightly"),
            AlertFrequency::Other("Fortnightly".to_string())
        );
        assert_eq!(
            sync.convert_frequency(""),
            AlertFrequency::Other(String::new())
        );
    }

    #[test]
    fn test_convert_scope() {
        let sync = sync_with(MockRecordSource::new());

        let scope = sync.convert_scope("System; Sales;");
        assert_eq!(scope.len(), 2);
        assert!(scope.contains("System"));
        assert!(scope.contains("Sales"));

        assert!(sync.convert_scope("").is_empty());
    }
}
