//! Engine facade orchestrating the maintenance alert pipeline.
//!
//! This module provides the [`MaintenanceEngine`], which wires the record
//! source, the evaluator, the dismissal store, and the poll scheduler into
//! one cycle: fetch, evaluate, publish. The presentation layer consumes the
//! published [`EvaluationResult`] and calls back into the facade for user
//! actions (dismiss, navigate).
//!
//! # Thread Safety
//!
//! Shared state is wrapped in `Arc<Mutex<_>>` and updated from the single
//! scheduler task; `dismiss_all` locks the same store the evaluator reads
//! under, so dismissals are atomic with respect to evaluation.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{error, info, warn};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time;

use crate::alerts::dismissal_loader::DismissalLoader;
use crate::alerts::dismissal_store::{DismissalStore, KeyedDismissalStore};
use crate::alerts::evaluator::{EvaluationResult, evaluate};
use crate::alerts::scheduler::{PollPlan, PollScheduler};
use crate::config::App;
use crate::maintenance::{AppDirectory, MaintenanceSync, RecordSource, SourceError};

/// Interval in seconds between automatic dismissal persistence operations.
const SAVE_INTERVAL_SECS: u64 = 60; // 1 minute

/// Errors surfaced by [`MaintenanceEngine::navigate`].
///
/// Navigation failures are reportable but never fatal: the caller shows
/// the message and stays where it is.
#[derive(Debug, thiserror::Error)]
pub enum NavigateError {
    /// The directory knows no navigable id for the application name.
    #[error("no navigable application id found for '{0}'")]
    Unresolved(String),

    /// The directory itself could not be reached.
    #[error("failed to resolve application id: {0}")]
    Directory(#[from] SourceError),
}

/// Orchestrates fetch, evaluation, and publication of maintenance alerts.
///
/// The engine owns:
///
/// - the latest published [`EvaluationResult`], readable via
///   [`current`](Self::current)
/// - the dismissal store, hydrated from disk at construction and persisted
///   after every dismissal plus periodically
/// - the [`PollScheduler`] driving the evaluation cycles
///
/// # Examples
///
/// ```no_run
/// use upkeep::alerts::MaintenanceEngine;
/// use upkeep::config::App;
/// use upkeep::maintenance::MaintenanceRequester;
///
/// # async fn example() {
/// let requester = MaintenanceRequester::new("https://service.example.com", "api_key");
/// let app = App { context: "Sales".to_string(), home: "Welcome".to_string() };
///
/// let mut engine = MaintenanceEngine::new(requester, app, "dismissals.json".to_string()).await;
/// engine.start(|result| println!("{} alert(s)", result.visible.len()));
/// // ...
/// engine.stop();
/// # }
/// ```
pub struct MaintenanceEngine<R>
where
    R: RecordSource + AppDirectory + Send + Sync + 'static,
{
    /// Remote service client, shared with the fetch layer
    requester: Arc<R>,
    /// Fetch-and-convert layer over the requester
    sync: Arc<MaintenanceSync<R>>,
    /// Last-dismissed dates, shared with the scheduler task
    store: Arc<Mutex<KeyedDismissalStore>>,
    /// Persistence for the dismissal store
    loader: DismissalLoader,
    /// Latest published evaluation result
    state: Arc<Mutex<EvaluationResult>>,
    /// Cached navigable id for the home application
    app_id: Arc<Mutex<Option<String>>>,
    /// Application context and home app name
    app: App,
    /// Poll scheduler, present while the engine is running
    scheduler: Option<PollScheduler>,
    /// Periodic dismissal persistence task, present while running
    persistence_handle: Option<JoinHandle<()>>,
}

impl<R> MaintenanceEngine<R>
where
    R: RecordSource + AppDirectory + Send + Sync + 'static,
{
    /// Creates a new engine and hydrates the dismissal store from disk.
    ///
    /// # Arguments
    ///
    /// * `requester` - Client for the record source and app directory.
    /// * `app` - Application context and home app name from configuration.
    /// * `dismissals_path` - File backing the dismissal store.
    pub async fn new(requester: R, app: App, dismissals_path: String) -> Self {
        let requester = Arc::new(requester);
        let sync = Arc::new(MaintenanceSync::new(Arc::clone(&requester)));
        let loader = DismissalLoader::new(dismissals_path);
        let store = Arc::new(Mutex::new(KeyedDismissalStore::new(loader.load().await)));

        MaintenanceEngine {
            requester,
            sync,
            store,
            loader,
            state: Arc::new(Mutex::new(EvaluationResult::default())),
            app_id: Arc::new(Mutex::new(None)),
            app,
            scheduler: None,
            persistence_handle: None,
        }
    }

    /// Starts the polling schedule and the persistence task.
    ///
    /// The first cycle runs immediately. Each cycle fetches the window
    /// records (degrading to an empty batch on failure), evaluates them,
    /// stores the result, and hands it to `on_publish`. Calling `start`
    /// on a running engine does nothing.
    pub fn start<F>(&mut self, on_publish: F)
    where
        F: Fn(&EvaluationResult) + Send + Sync + 'static,
    {
        if self.scheduler.is_some() {
            warn!("maintenance engine already started");
            return;
        }

        self.start_persistence_task();

        let on_publish: Arc<dyn Fn(&EvaluationResult) + Send + Sync> = Arc::new(on_publish);
        let sync = Arc::clone(&self.sync);
        let store = Arc::clone(&self.store);
        let state = Arc::clone(&self.state);
        let context = self.app.context.clone();

        let cycle = move || {
            let sync = Arc::clone(&sync);
            let store = Arc::clone(&store);
            let state = Arc::clone(&state);
            let on_publish = Arc::clone(&on_publish);
            let context = context.clone();

            async move {
                let now = Utc::now();
                let windows = sync.fetch_windows(&context).await;

                // The store guard is released before the result is
                // published, a dismissal never waits on a publish
                let result = {
                    let store = store.lock().await;
                    evaluate(&windows, now, &*store)
                };

                *state.lock().await = result.clone();
                on_publish(&result);
            }
        };

        self.scheduler = Some(PollScheduler::start(PollPlan::default(), cycle));
        info!("maintenance engine started");
    }

    /// Stops polling and persistence. Safe to call more than once.
    ///
    /// No cycle starts after this returns; a fetch in flight dies with
    /// its task and is never published.
    pub fn stop(&mut self) {
        if let Some(mut scheduler) = self.scheduler.take() {
            scheduler.stop();
        }
        if let Some(handle) = self.persistence_handle.take() {
            handle.abort();
        }
        info!("maintenance engine stopped");
    }

    /// Returns a clone of the latest published evaluation result.
    pub async fn current(&self) -> EvaluationResult {
        self.state.lock().await.clone()
    }

    /// Dismisses every currently visible alert.
    ///
    /// Writes `now`'s calendar date into the dismissal store for each
    /// visible record, persists the store, and clears the visible set
    /// immediately, without waiting for the next cycle. Calling it again
    /// with no new windows leaves the store unchanged.
    pub async fn dismiss_all(&self, now: DateTime<Utc>) {
        let today = now.date_naive();
        let mut state = self.state.lock().await;

        if !state.visible.is_empty() {
            let mut store = self.store.lock().await;
            for alert in &state.visible {
                store.set_dismissed(&alert.window.id, today);
            }
            self.loader.persist(store.entries()).await;
        }

        state.visible.clear();
        info!("dismissed all visible maintenance alerts");
    }

    /// Resolves the navigable id of the configured home application.
    ///
    /// The first successful resolution is cached. An unknown name or an
    /// unreachable directory yields a reportable [`NavigateError`]; the
    /// actual navigation is the presentation layer's job.
    pub async fn navigate(&self) -> Result<String, NavigateError> {
        let cached = self.app_id.lock().await.clone();
        if let Some(id) = cached {
            return Ok(id);
        }

        match self.requester.resolve_app_id(&self.app.home).await {
            Ok(Some(id)) => {
                info!("resolved application id for {}", self.app.home);
                *self.app_id.lock().await = Some(id.clone());
                Ok(id)
            }
            Ok(None) => {
                warn!("no application id found for {}", self.app.home);
                Err(NavigateError::Unresolved(self.app.home.clone()))
            }
            Err(e) => {
                error!("error while resolving application id: {}", e);
                Err(NavigateError::Directory(e))
            }
        }
    }

    /// Starts the background task persisting the dismissal store every
    /// [`SAVE_INTERVAL_SECS`] seconds.
    fn start_persistence_task(&mut self) {
        let store = Arc::clone(&self.store);
        let loader = self.loader.clone();

        self.persistence_handle = Some(tokio::spawn(async move {
            let mut interval = time::interval(Duration::from_secs(SAVE_INTERVAL_SECS));
            loop {
                interval.tick().await;
                let store = store.lock().await;
                loader.persist(store.entries()).await;
            }
        }));
    }
}
