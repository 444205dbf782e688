//! Persistence layer for last-dismissed dates.
//!
//! This module provides the [`DismissalLoader`] for persisting dismissal
//! state between restarts. The stored-key → date map is serialized to JSON
//! and written to a file in the data directory.

use std::collections::HashMap;

use chrono::NaiveDate;
use log::{error, info, warn};
use tokio::fs;

/// Handles loading and persisting dismissal dates to disk.
///
/// File I/O is fault-tolerant: if loading fails because the file is
/// missing or corrupted, an empty map is returned rather than an error,
/// so the engine can always start.
///
/// # Examples
///
/// ```no_run
/// use upkeep::alerts::DismissalLoader;
///
/// # async fn example() {
/// let loader = DismissalLoader::new("dismissals.json".to_string());
/// let entries = loader.load().await;
/// loader.persist(&entries).await;
/// # }
/// ```
#[derive(Clone)]
pub struct DismissalLoader {
    /// Path to the JSON file where dismissal dates are stored.
    path: String,
}

impl DismissalLoader {
    /// Creates a new `DismissalLoader` for the specified file path.
    pub fn new(path: String) -> Self {
        DismissalLoader { path }
    }

    /// Loads dismissal dates from disk.
    ///
    /// # Error Handling
    ///
    /// - If the file doesn't exist: logs a warning and returns an empty map
    /// - If deserialization fails: logs an error and returns an empty map
    pub async fn load(&self) -> HashMap<String, NaiveDate> {
        let Ok(serialized_entries) = fs::read_to_string(&self.path).await else {
            warn!("no persisted dismissals found, starting with an empty map");
            return HashMap::new();
        };

        let Ok(entries) = serde_json::from_str(&serialized_entries) else {
            error!("failed to deserialize persisted dismissals, starting with an empty map");
            return HashMap::new();
        };

        info!("loaded persisted dismissals {}", serialized_entries);

        entries
    }

    /// Persists the dismissal map to disk.
    ///
    /// Errors are logged but not propagated; the engine keeps operating
    /// even if persistence fails, it only loses durability.
    pub async fn persist(&self, entries: &HashMap<String, NaiveDate>) {
        let serialized_entries = match serde_json::to_string(entries) {
            Ok(serialized) => serialized,
            Err(e) => {
                error!("failed to serialize dismissals: {}", e);
                return;
            }
        };

        if let Err(e) = fs::write(&self.path, &serialized_entries).await {
            error!("failed to persist dismissals: {}", e);
            return;
        }

        info!("persisted dismissals");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn loader_at(temp_file: &NamedTempFile) -> DismissalLoader {
        DismissalLoader::new(temp_file.path().to_str().unwrap().to_string())
    }

    #[tokio::test]
    async fn test_load_nonexistent_file_returns_empty_map() {
        let loader = DismissalLoader::new("nonexistent_dismissals.json".to_string());
        let entries = loader.load().await;

        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn test_persist_and_load_round_trip() {
        let temp_file = NamedTempFile::new().unwrap();
        let loader = loader_at(&temp_file);

        let mut entries = HashMap::new();
        entries.insert(
            "maintenanceDismissed_a01".to_string(),
            NaiveDate::from_ymd_opt(2024, 1, 11).unwrap(),
        );
        entries.insert(
            "maintenanceDismissed_a02".to_string(),
            NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
        );

        loader.persist(&entries).await;
        let loaded = loader.load().await;

        assert_eq!(loaded, entries);
    }

    #[tokio::test]
    async fn test_persist_and_load_empty_map() {
        let temp_file = NamedTempFile::new().unwrap();
        let loader = loader_at(&temp_file);

        loader.persist(&HashMap::new()).await;
        let loaded = loader.load().await;

        assert!(loaded.is_empty());
    }

    #[tokio::test]
    async fn test_load_corrupted_json_returns_empty_map() {
        let temp_file = NamedTempFile::new().unwrap();
        let loader = loader_at(&temp_file);

        fs::write(temp_file.path(), "{ this is not valid json ")
            .await
            .unwrap();

        let entries = loader.load().await;

        assert!(entries.is_empty());
    }
}
