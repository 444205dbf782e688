//! Keyed storage of last-dismissed dates.
//!
//! The engine consults this store during every evaluation and writes to it
//! only when the user dismisses the visible alerts. The [`DismissalStore`]
//! trait keeps the storage mechanism swappable; the in-memory
//! [`KeyedDismissalStore`] is both the production implementation (hydrated
//! from disk by the loader) and the fake used in evaluator tests.

use std::collections::HashMap;

use chrono::NaiveDate;

/// Prefix applied to every stored key, namespacing dismissal entries
/// per window record id.
pub const KEY_PREFIX: &str = "maintenanceDismissed_";

/// Read/write access to last-dismissed dates, keyed by window record id.
///
/// Reads on missing ids return `None`, never an error. Writes are
/// idempotent and independent per id; no transactionality is required.
pub trait DismissalStore {
    /// Returns the stored date for `id`, or `None` if never dismissed.
    fn last_dismissed(&self, id: &str) -> Option<NaiveDate>;

    /// Records `date` as the latest dismissal for `id`, overwriting any
    /// prior value.
    fn set_dismissed(&mut self, id: &str, date: NaiveDate);
}

/// In-memory dismissal store with [`KEY_PREFIX`]-namespaced keys.
///
/// # Examples
///
/// ```no_run
/// use upkeep::alerts::{DismissalStore, KeyedDismissalStore};
/// use chrono::NaiveDate;
///
/// let mut store = KeyedDismissalStore::default();
/// store.set_dismissed("a01", NaiveDate::from_ymd_opt(2024, 1, 11).unwrap());
/// assert!(store.last_dismissed("a01").is_some());
/// assert!(store.last_dismissed("a02").is_none());
/// ```
#[derive(Debug, Default)]
pub struct KeyedDismissalStore {
    /// Stored entries, keyed by `maintenanceDismissed_<id>`.
    entries: HashMap<String, NaiveDate>,
}

impl KeyedDismissalStore {
    /// Creates a store over previously persisted entries.
    ///
    /// The map is expected to already carry prefixed keys, as produced by
    /// [`entries`](Self::entries) and persisted by the loader.
    pub fn new(entries: HashMap<String, NaiveDate>) -> Self {
        KeyedDismissalStore { entries }
    }

    /// The raw prefixed-key map, as handed to the loader for persistence.
    pub fn entries(&self) -> &HashMap<String, NaiveDate> {
        &self.entries
    }

    fn key(id: &str) -> String {
        format!("{}{}", KEY_PREFIX, id)
    }
}

impl DismissalStore for KeyedDismissalStore {
    fn last_dismissed(&self, id: &str) -> Option<NaiveDate> {
        self.entries.get(&Self::key(id)).copied()
    }

    fn set_dismissed(&mut self, id: &str, date: NaiveDate) {
        self.entries.insert(Self::key(id), date);
    }
}
