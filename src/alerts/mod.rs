//! Maintenance alert engine: evaluation, dismissal, and polling.
//!
//! This module is the decision core of the application. It decides which
//! maintenance windows to surface, whether they can be dismissed, and
//! whether the host application must be locked, and re-evaluates on an
//! adaptive schedule. The pieces compose leaf-first:
//!
//! - [`timewindow`] - pure predicates over the current time and a window
//! - [`frequency`] - per-record re-alert policy against the last dismissal
//! - [`DismissalStore`] / [`DismissalLoader`] - last-dismissed dates,
//!   in memory with JSON-file persistence
//! - [`evaluate`] - the per-cycle decision pipeline
//! - [`PollScheduler`] - two-phase adaptive re-evaluation
//! - [`MaintenanceEngine`] - the facade the presentation layer talks to
//!
//! # Example Usage
//!
//! ```no_run
//! use upkeep::alerts::MaintenanceEngine;
//! use upkeep::config::App;
//! use upkeep::maintenance::MaintenanceRequester;
//!
//! # async fn example() {
//! let requester = MaintenanceRequester::new("https://service.example.com", "api_key");
//! let app = App { context: "Sales".to_string(), home: "Welcome".to_string() };
//!
//! let mut engine = MaintenanceEngine::new(requester, app, "dismissals.json".to_string()).await;
//! engine.start(|result| {
//!     println!("{}: {} alert(s)", result.title, result.visible.len());
//! });
//! # }
//! ```

mod dismissal_loader;
mod dismissal_store;
mod engine;
mod evaluator;
pub mod frequency;
mod scheduler;
pub mod timewindow;

pub use crate::alerts::dismissal_loader::DismissalLoader;
pub use crate::alerts::dismissal_store::{DismissalStore, KEY_PREFIX, KeyedDismissalStore};
pub use crate::alerts::engine::{MaintenanceEngine, NavigateError};
pub use crate::alerts::evaluator::{EvaluationResult, VisibleAlert, evaluate};
pub use crate::alerts::scheduler::{PollPlan, PollScheduler};
