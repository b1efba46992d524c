//! Search limits, deadlines and cancellation.
//!
//! Every search entry point takes a `CancelToken` (directly or through
//! `SearchLimits`). Searches poll it at fixed points: between MCTS
//! iterations, between deepening passes and between root moves of the
//! exact solver.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

/// Shared stop flag. Cloning yields another handle to the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Fast atomic load, suitable for calling every iteration.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Search limits that control when an engine should stop searching.
///
/// The exact solver runs to completion unless cancelled or out of time;
/// the iteration budget only applies to MCTS.
#[derive(Debug, Clone, Default)]
pub struct SearchLimits {
    /// MCTS iteration budget (None = until time runs out or the root is proven)
    pub iterations: Option<u64>,
    /// Maximum time allowed for this move (None = infinite)
    pub move_time: Option<Duration>,
    /// Time controller for checking if search should stop
    pub time_control: TimeControl,
}

impl SearchLimits {
    /// No limits: search until finished or cancelled.
    pub fn infinite() -> Self {
        Self::default()
    }

    /// Create limits with only an iteration budget.
    pub fn iterations(iterations: u64) -> Self {
        Self {
            iterations: Some(iterations),
            ..Self::default()
        }
    }

    /// Create limits with only a time constraint.
    pub fn time(move_time: Duration) -> Self {
        Self {
            iterations: None,
            move_time: Some(move_time),
            time_control: TimeControl::new(Some(move_time)),
        }
    }

    /// Create limits with both an iteration budget and a time constraint.
    pub fn iterations_and_time(iterations: u64, move_time: Duration) -> Self {
        Self {
            iterations: Some(iterations),
            ..Self::time(move_time)
        }
    }

    /// Use an externally owned stop flag.
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.time_control.cancel = token;
        self
    }

    /// The stop flag searches should poll.
    pub fn cancel_token(&self) -> CancelToken {
        self.time_control.cancel.clone()
    }

    #[inline]
    pub fn should_stop(&self) -> bool {
        self.time_control.is_stopped()
    }

    /// Start the clock. Call this when search begins.
    pub fn start(&self) {
        self.time_control.start();
    }
}

/// Thread-safe time controller that tracks whether search should stop.
///
/// Cheap to clone and share across worker threads.
#[derive(Debug, Clone)]
pub struct TimeControl {
    cancel: CancelToken,
    start_time: Arc<RwLock<Option<Instant>>>,
    /// Time limit for this search (None = infinite)
    time_limit: Option<Duration>,
    /// How many iterations pass between clock reads.
    check_interval: u64,
}

impl TimeControl {
    pub fn new(time_limit: Option<Duration>) -> Self {
        Self {
            cancel: CancelToken::new(),
            start_time: Arc::new(RwLock::new(None)),
            time_limit,
            check_interval: 256,
        }
    }

    /// Start the clock. A token that was already cancelled stays cancelled.
    pub fn start(&self) {
        let mut start = self.start_time.write().unwrap_or_else(|e| e.into_inner());
        *start = Some(Instant::now());
    }

    /// Force stop the search immediately.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Reads the clock and raises the stop flag if the time limit passed.
    pub fn check_time(&self) -> bool {
        if self.is_stopped() {
            return true;
        }

        if let Some(limit) = self.time_limit
            && let Some(start) = self.started_at()
            && start.elapsed() >= limit
        {
            self.stop();
            return true;
        }

        false
    }

    /// Returns true every `check_interval` iterations.
    #[inline]
    pub fn should_check_time(&self, iterations: u64) -> bool {
        iterations.is_multiple_of(self.check_interval)
    }

    /// Get elapsed time since search started.
    pub fn elapsed(&self) -> Duration {
        self.started_at().map(|s| s.elapsed()).unwrap_or(Duration::ZERO)
    }

    /// Get remaining time (None if no limit).
    pub fn remaining(&self) -> Option<Duration> {
        let limit = self.time_limit?;
        Some(limit.saturating_sub(self.elapsed()))
    }

    fn started_at(&self) -> Option<Instant> {
        *self.start_time.read().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for TimeControl {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
#[path = "time_control_tests.rs"]
mod time_control_tests;
