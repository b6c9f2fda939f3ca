//! Bounded polling primitive
//!
//! The portal exposes no events or webhooks: export completion, page
//! idleness, and download completion are all observable only by re-checking
//! state. `PollWatcher` is the single primitive for those waits, with a
//! configurable interval and either a wall-clock deadline or an iteration
//! cap.
//!
//! Probes never propagate errors; each call site maps its errors to a
//! [`PollDecision`] according to its own policy (the idle-wait treats a read
//! error as "still busy", the status check logs it and keeps polling).

use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

/// Outcome of a bounded poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The probe reported `Done` before the budget ran out
    Completed,
    /// The budget ran out first
    TimedOut,
}

/// Decision returned by a probe on each tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollDecision {
    /// Condition reached, stop polling
    Done,
    /// Keep waiting
    Continue,
}

/// Polling budget: wall-clock deadline or probe-count cap
#[derive(Debug, Clone, Copy)]
enum PollBudget {
    Deadline(Duration),
    MaxIterations(usize),
}

/// Bounded poller: probe, sleep, repeat until done or out of budget
///
/// The first probe runs immediately, so a condition that already holds
/// completes with zero sleeps. [`PollWatcher::delay_first`] shifts the
/// cadence to sleep one interval before the first probe, which the
/// download-completion wait uses.
#[derive(Debug, Clone, Copy)]
pub struct PollWatcher {
    interval: Duration,
    budget: PollBudget,
    delay_first: bool,
}

impl PollWatcher {
    /// Poll every `interval` until `deadline` of wall-clock time has elapsed
    pub fn with_deadline(interval: Duration, deadline: Duration) -> Self {
        Self {
            interval,
            budget: PollBudget::Deadline(deadline),
            delay_first: false,
        }
    }

    /// Poll every `interval`, at most `max_iterations` probes
    pub fn with_max_iterations(interval: Duration, max_iterations: usize) -> Self {
        Self {
            interval,
            budget: PollBudget::MaxIterations(max_iterations),
            delay_first: false,
        }
    }

    /// Sleep one interval before the first probe
    pub fn delay_first(mut self) -> Self {
        self.delay_first = true;
        self
    }

    /// Run the poll loop
    ///
    /// Returns [`PollOutcome::Completed`] as soon as the probe reports
    /// [`PollDecision::Done`]; no further probes run after that.
    pub async fn poll<F, Fut>(&self, mut probe: F) -> PollOutcome
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = PollDecision>,
    {
        let start = Instant::now();

        if self.delay_first {
            tokio::time::sleep(self.interval).await;
        }

        match self.budget {
            PollBudget::Deadline(deadline) => loop {
                if probe().await == PollDecision::Done {
                    return PollOutcome::Completed;
                }
                if start.elapsed() >= deadline {
                    return PollOutcome::TimedOut;
                }
                tokio::time::sleep(self.interval).await;
            },
            PollBudget::MaxIterations(max) => {
                for iteration in 0..max {
                    if probe().await == PollDecision::Done {
                        return PollOutcome::Completed;
                    }
                    if iteration + 1 < max {
                        tokio::time::sleep(self.interval).await;
                    }
                }
                PollOutcome::TimedOut
            }
        }
    }
}
