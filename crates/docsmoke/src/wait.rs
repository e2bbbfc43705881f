//! Bounded polling.
//!
//! Every element query resolves through a polling window: probe, sleep,
//! probe again, until the target appears or the deadline expires. The
//! async loops live next to the browser session; this module carries the
//! bookkeeping so the timing logic stays testable without a browser.

use std::time::{Duration, Instant};

/// Default polling interval (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// How many consecutive identical snapshots count as settled
pub const SETTLE_STABLE_SNAPSHOTS: usize = 2;

/// Polling parameters for one wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Total window in milliseconds
    pub timeout_ms: u64,
    /// Interval between probes in milliseconds
    pub interval_ms: u64,
}

impl PollConfig {
    /// Create a poll config with the default interval
    #[must_use]
    pub const fn new(timeout_ms: u64) -> Self {
        Self {
            timeout_ms,
            interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }

    /// Set the probe interval
    #[must_use]
    pub const fn with_interval(mut self, interval_ms: u64) -> Self {
        self.interval_ms = interval_ms;
        self
    }

    /// Probe interval as a `Duration`
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// A running deadline for one polling window
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    start: Instant,
    timeout: Duration,
}

impl Deadline {
    /// Start a deadline of `timeout_ms` milliseconds from now
    #[must_use]
    pub fn start(timeout_ms: u64) -> Self {
        Self {
            start: Instant::now(),
            timeout: Duration::from_millis(timeout_ms),
        }
    }

    /// Whether the window has elapsed
    #[must_use]
    pub fn expired(&self) -> bool {
        self.start.elapsed() >= self.timeout
    }

    /// Time spent so far
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Consecutive-failure tracker for probe loops.
///
/// A single failed probe is tolerated (evaluation during a navigation can
/// fail transiently); a run of consecutive failures means the probe itself
/// is broken and the loop should stop with that error.
#[derive(Debug, Clone, Copy)]
pub struct FailureStreak {
    count: usize,
    tolerance: usize,
}

impl FailureStreak {
    /// Tracker that trips after `tolerance` consecutive failures
    #[must_use]
    pub const fn new(tolerance: usize) -> Self {
        Self {
            count: 0,
            tolerance,
        }
    }

    /// Record a failed probe; returns true once the streak reaches tolerance
    pub fn failed(&mut self) -> bool {
        self.count += 1;
        self.count >= self.tolerance
    }

    /// Record a successful probe, resetting the streak
    pub fn succeeded(&mut self) {
        self.count = 0;
    }
}

/// Stability detector for a re-rendering DOM fragment.
///
/// The search result list detaches and re-renders after input; clicking a
/// stale node misses. Instead of a blind fixed pause, the scenario snapshots
/// the fragment each probe and proceeds once consecutive snapshots stop
/// changing.
#[derive(Debug, Clone)]
pub struct Settle<T> {
    last: Option<T>,
    stable: usize,
    required: usize,
}

impl<T: PartialEq> Settle<T> {
    /// Detector requiring the default number of identical snapshots
    #[must_use]
    pub fn new() -> Self {
        Self {
            last: None,
            stable: 1,
            required: SETTLE_STABLE_SNAPSHOTS,
        }
    }

    /// Detector requiring `required` consecutive identical snapshots
    #[must_use]
    pub fn with_required(required: usize) -> Self {
        Self {
            last: None,
            stable: 1,
            required: required.max(1),
        }
    }

    /// Feed a snapshot; returns true once the fragment is settled
    pub fn observe(&mut self, snapshot: T) -> bool {
        match &self.last {
            Some(prev) if *prev == snapshot => {
                self.stable += 1;
            }
            _ => {
                self.stable = 1;
                self.last = Some(snapshot);
            }
        }
        self.stable >= self.required
    }

    /// Feed a probe outcome. A failed probe is a non-observation: it never
    /// advances stability, and it does not reset it either, since it says
    /// nothing about the fragment.
    pub fn observe_probe<E>(&mut self, probe: Result<T, E>) -> bool {
        match probe {
            Ok(snapshot) => self.observe(snapshot),
            Err(_) => false,
        }
    }
}

impl<T: PartialEq> Default for Settle<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod poll_config_tests {
        use super::*;

        #[test]
        fn test_default_interval() {
            let config = PollConfig::new(5000);
            assert_eq!(config.timeout_ms, 5000);
            assert_eq!(config.interval_ms, DEFAULT_POLL_INTERVAL_MS);
        }

        #[test]
        fn test_with_interval() {
            let config = PollConfig::new(1000).with_interval(10);
            assert_eq!(config.interval(), Duration::from_millis(10));
        }
    }

    mod deadline_tests {
        use super::*;

        #[test]
        fn test_fresh_deadline_not_expired() {
            let deadline = Deadline::start(60_000);
            assert!(!deadline.expired());
        }

        #[test]
        fn test_zero_deadline_expires_immediately() {
            let deadline = Deadline::start(0);
            assert!(deadline.expired());
        }

        #[test]
        fn test_elapsed_advances() {
            let deadline = Deadline::start(60_000);
            std::thread::sleep(Duration::from_millis(5));
            assert!(deadline.elapsed() >= Duration::from_millis(5));
        }
    }

    mod settle_tests {
        use super::*;

        #[test]
        fn test_settles_after_two_identical_snapshots() {
            let mut settle = Settle::new();
            assert!(!settle.observe("a, b, c"));
            assert!(settle.observe("a, b, c"));
        }

        #[test]
        fn test_change_resets_stability() {
            let mut settle = Settle::new();
            assert!(!settle.observe("a"));
            assert!(!settle.observe("b"));
            assert!(!settle.observe("c"));
            assert!(settle.observe("c"));
        }

        #[test]
        fn test_required_count_honored() {
            let mut settle = Settle::with_required(3);
            assert!(!settle.observe(1));
            assert!(!settle.observe(1));
            assert!(settle.observe(1));
        }

        #[test]
        fn test_required_zero_clamps_to_one() {
            let mut settle = Settle::with_required(0);
            assert!(settle.observe("anything"));
        }

        #[test]
        fn test_errored_probes_never_settle() {
            let mut settle: Settle<&str> = Settle::new();
            assert!(!settle.observe_probe(Err::<&str, &str>("gone")));
            assert!(!settle.observe_probe(Err::<&str, &str>("gone")));
        }

        #[test]
        fn test_errored_probe_does_not_advance_or_reset_stability() {
            let mut settle = Settle::new();
            assert!(!settle.observe_probe(Ok::<&str, &str>("a, b, c")));
            assert!(!settle.observe_probe(Err::<&str, &str>("gone")));
            assert!(settle.observe_probe(Ok::<&str, &str>("a, b, c")));
        }
    }

    mod failure_streak_tests {
        use super::*;

        #[test]
        fn test_trips_at_tolerance() {
            let mut streak = FailureStreak::new(3);
            assert!(!streak.failed());
            assert!(!streak.failed());
            assert!(streak.failed());
        }

        #[test]
        fn test_success_resets_the_streak() {
            let mut streak = FailureStreak::new(2);
            assert!(!streak.failed());
            streak.succeeded();
            assert!(!streak.failed());
            assert!(streak.failed());
        }
    }
}
