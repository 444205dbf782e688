//! Adaptive polling for the evaluation pipeline.
//!
//! This module provides the [`PollScheduler`], a timer-driven controller
//! that re-runs the full evaluation cycle on a two-phase backoff: a short
//! interval while the alert surface is fresh, a long interval afterwards.
//!
//! Cycles are strictly sequential. The next delay is armed only after the
//! current cycle future has completed, so a slow fetch can never overlap
//! the next firing or publish results out of order.

use std::future::Future;
use std::time::Duration;

use log::{debug, info};
use tokio::{task::JoinHandle, time};

/// Five minutes, the initial polling interval.
const PHASE_ONE_INTERVAL_SECS: u64 = 5 * 60;
/// How many firings the initial interval covers, counting the immediate
/// first one: 30 minutes of scheduled time.
const PHASE_ONE_FIRINGS: u32 = 6;
/// Thirty minutes, the steady-state polling interval.
const PHASE_TWO_INTERVAL_SECS: u64 = 30 * 60;

/// The two-phase firing plan driving a [`PollScheduler`].
///
/// The phase transition is count-based: once `phase_one_firings` cycles
/// have completed, every later delay uses `phase_two`. Counting scheduled
/// intervals rather than wall-clock time is an accepted simplification;
/// a slow cycle stretches the phase accordingly.
#[derive(Debug, Clone)]
pub struct PollPlan {
    /// Delay between firings during the initial phase
    pub phase_one: Duration,
    /// Number of firings, counting the immediate first one, served by the
    /// initial phase
    pub phase_one_firings: u32,
    /// Delay between firings after the transition
    pub phase_two: Duration,
}

impl Default for PollPlan {
    fn default() -> Self {
        PollPlan {
            phase_one: Duration::from_secs(PHASE_ONE_INTERVAL_SECS),
            phase_one_firings: PHASE_ONE_FIRINGS,
            phase_two: Duration::from_secs(PHASE_TWO_INTERVAL_SECS),
        }
    }
}

/// Drives periodic re-evaluation with two-phase backoff.
///
/// The scheduler owns its driving task and its cancellation: [`stop`]
/// aborts the task, guaranteeing no further firings after it returns. A
/// cycle in flight at that moment dies at its next await point and its
/// result is never applied. Dropping the scheduler aborts the task too.
///
/// [`stop`]: PollScheduler::stop
///
/// # Examples
///
/// ```no_run
/// use upkeep::alerts::{PollPlan, PollScheduler};
///
/// # async fn example() {
/// let mut scheduler = PollScheduler::start(PollPlan::default(), || async {
///     // fetch, evaluate, publish
/// });
/// // ...
/// scheduler.stop();
/// # }
/// ```
pub struct PollScheduler {
    /// Handle of the driving task, taken on stop
    handle: Option<JoinHandle<()>>,
}

impl PollScheduler {
    /// Starts the schedule, firing `cycle` immediately and then on every
    /// delay the plan prescribes.
    ///
    /// Each firing awaits the cycle future to completion before arming
    /// the next delay, which keeps cycles serialized.
    pub fn start<C, Fut>(plan: PollPlan, mut cycle: C) -> Self
    where
        C: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        info!(
            "polling every {:?} for the first {} firings, then every {:?}",
            plan.phase_one, plan.phase_one_firings, plan.phase_two
        );

        let handle = tokio::spawn(async move {
            let mut fired: u32 = 0;
            loop {
                cycle().await;
                fired = fired.saturating_add(1);

                let delay = if fired < plan.phase_one_firings {
                    plan.phase_one
                } else {
                    plan.phase_two
                };
                debug!("cycle {} complete, next firing in {:?}", fired, delay);
                time::sleep(delay).await;
            }
        });

        PollScheduler {
            handle: Some(handle),
        }
    }

    /// Cancels the schedule. No firing starts after this returns.
    ///
    /// Safe to call more than once.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            info!("poll scheduler stopped");
        }
    }
}

impl Drop for PollScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::sleep;

    fn counting_plan(phase_one_ms: u64, firings: u32, phase_two_ms: u64) -> PollPlan {
        PollPlan {
            phase_one: Duration::from_millis(phase_one_ms),
            phase_one_firings: firings,
            phase_two: Duration::from_millis(phase_two_ms),
        }
    }

    #[tokio::test]
    async fn test_first_firing_is_immediate() {
        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = Arc::clone(&counter);

        let mut scheduler = PollScheduler::start(counting_plan(5_000, 6, 5_000), move || {
            let counter = Arc::clone(&counter_clone);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        sleep(Duration::from_millis(50)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        scheduler.stop();
    }

    #[tokio::test]
    async fn test_phase_transition_after_configured_firings() {
        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = Arc::clone(&counter);

        // Two quick firings, then a long steady-state delay
        let mut scheduler = PollScheduler::start(counting_plan(20, 2, 60_000), move || {
            let counter = Arc::clone(&counter_clone);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        sleep(Duration::from_millis(300)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 2);

        scheduler.stop();
    }

    #[tokio::test]
    async fn test_cycles_never_overlap() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let overlapped = Arc::new(AtomicUsize::new(0));
        let in_flight_clone = Arc::clone(&in_flight);
        let overlapped_clone = Arc::clone(&overlapped);

        // Cycle duration far exceeds the firing interval
        let mut scheduler = PollScheduler::start(counting_plan(1, 100, 1), move || {
            let in_flight = Arc::clone(&in_flight_clone);
            let overlapped = Arc::clone(&overlapped_clone);
            async move {
                if in_flight.fetch_add(1, Ordering::SeqCst) > 0 {
                    overlapped.fetch_add(1, Ordering::SeqCst);
                }
                sleep(Duration::from_millis(20)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
            }
        });

        sleep(Duration::from_millis(200)).await;
        scheduler.stop();

        assert_eq!(overlapped.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_stop_halts_firings() {
        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = Arc::clone(&counter);

        let mut scheduler = PollScheduler::start(counting_plan(10, 100, 10), move || {
            let counter = Arc::clone(&counter_clone);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        sleep(Duration::from_millis(50)).await;
        scheduler.stop();
        let fired_at_stop = counter.load(Ordering::SeqCst);
        assert!(fired_at_stop >= 1);

        sleep(Duration::from_millis(100)).await;
        assert_eq!(counter.load(Ordering::SeqCst), fired_at_stop);
    }

    #[tokio::test]
    async fn test_stop_is_idempotent() {
        let mut scheduler = PollScheduler::start(counting_plan(10, 2, 10), || async {});

        scheduler.stop();
        scheduler.stop();
    }
}
