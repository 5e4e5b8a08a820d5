//! Progress tracking, cancellation, and deadlines for long runs

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Shared progress handle.
///
/// Clones share the same counters, so a caller can hand one clone to the
/// engine and poll or cancel through another.
#[derive(Debug, Clone)]
pub struct SimulationProgress {
    /// Completed iterations across all scenarios
    completed: Arc<AtomicUsize>,
    /// Total iterations expected
    total: Arc<AtomicUsize>,
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
    /// Stop once this many iterations have completed
    iteration_limit: Option<usize>,
}

impl SimulationProgress {
    #[must_use]
    pub fn new(total: usize) -> Self {
        Self {
            completed: Arc::new(AtomicUsize::new(0)),
            total: Arc::new(AtomicUsize::new(total)),
            cancelled: Arc::new(AtomicBool::new(false)),
            deadline: None,
            iteration_limit: None,
        }
    }

    /// Stop scheduling new work once `timeout` has elapsed from now
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Stop scheduling new work once `limit` iterations have completed.
    ///
    /// Batches already running when the limit is reached still finish, so
    /// the completed count may overshoot it by up to one batch per thread.
    #[must_use]
    pub fn with_iteration_limit(mut self, limit: usize) -> Self {
        self.iteration_limit = Some(limit);
        self
    }

    #[must_use]
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.total.load(Ordering::Relaxed)
    }

    /// Completed fraction in `[0, 1]`
    #[must_use]
    pub fn fraction(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            (self.completed() as f64 / total as f64).min(1.0)
        }
    }

    pub fn add_completed(&self, count: usize) {
        self.completed.fetch_add(count, Ordering::Relaxed);
    }

    pub fn add_total(&self, count: usize) {
        self.total.fetch_add(count, Ordering::Relaxed);
    }

    pub fn reset(&self, total: usize) {
        self.completed.store(0, Ordering::Relaxed);
        self.total.store(total, Ordering::Relaxed);
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Cancelled, past the deadline, or at the iteration limit
    #[must_use]
    pub fn should_stop(&self) -> bool {
        self.is_cancelled()
            || self.deadline.is_some_and(|d| Instant::now() >= d)
            || self.iteration_limit.is_some_and(|l| self.completed() >= l)
    }
}

impl Default for SimulationProgress {
    fn default() -> Self {
        Self::new(0)
    }
}
