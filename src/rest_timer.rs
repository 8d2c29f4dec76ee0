use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{debug, trace};

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestTimerState {
    Idle,
    Running(u64),
}

/// Emitted when a countdown reaches zero on its own
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerSignal {
    Expired,
}

/// Delivers the recurring tick of a running countdown.
///
/// Implementations tag every tick with the generation passed to `schedule`.
/// Once `schedule` is called again, or `stop` is called, the previous
/// sequence must stop producing ticks (a tick already in flight is tolerated:
/// the timer discards it by generation).
pub trait TickScheduler: Send + fmt::Debug {
    fn schedule(&mut self, generation: u64, interval: Duration);
    fn stop(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleRequest {
    Start(u64),
    Stop,
}

/// Scheduler that never ticks by itself; callers feed `RestTimer::on_tick`.
/// Clones share the request log, so a test can keep one handle for inspection.
#[derive(Debug, Clone, Default)]
pub struct ManualTickScheduler {
    log: Arc<Mutex<Vec<ScheduleRequest>>>,
}

impl ManualTickScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> Vec<ScheduleRequest> {
        self.log.lock().map(|log| log.clone()).unwrap_or_default()
    }

    fn record(&self, req: ScheduleRequest) {
        if let Ok(mut log) = self.log.lock() {
            log.push(req);
        }
    }
}

impl TickScheduler for ManualTickScheduler {
    fn schedule(&mut self, generation: u64, _interval: Duration) {
        self.record(ScheduleRequest::Start(generation));
    }

    fn stop(&mut self) {
        self.record(ScheduleRequest::Stop);
    }
}

/// Cancellable countdown used as the pause between sets
#[derive(Debug)]
pub struct RestTimer {
    state: RestTimerState,
    generation: u64,
    interval: Duration,
    scheduler: Box<dyn TickScheduler>,
}

impl RestTimer {
    pub fn new(scheduler: Box<dyn TickScheduler>) -> Self {
        Self::with_interval(scheduler, DEFAULT_TICK_INTERVAL)
    }

    pub fn with_interval(scheduler: Box<dyn TickScheduler>, interval: Duration) -> Self {
        Self {
            state: RestTimerState::Idle,
            generation: 0,
            interval,
            scheduler,
        }
    }

    pub fn state(&self) -> RestTimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, RestTimerState::Running(_))
    }

    pub fn remaining_secs(&self) -> Option<u64> {
        match self.state {
            RestTimerState::Running(secs) => Some(secs),
            RestTimerState::Idle => None,
        }
    }

    /// Generation of the current (or most recently retired) countdown
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Begin a new countdown, superseding whatever was running.
    /// A zero duration behaves like `cancel`.
    pub fn start(&mut self, duration_secs: u64) {
        debug_assert!(duration_secs > 0, "rest duration must be positive");
        if duration_secs == 0 {
            self.cancel();
            return;
        }

        // retire the old sequence before the new one can tick
        self.generation += 1;
        self.state = RestTimerState::Running(duration_secs);
        self.scheduler.schedule(self.generation, self.interval);
        debug!(generation = self.generation, duration_secs, "rest started");
    }

    /// Add (or with a negative delta, remove) time from a running countdown.
    /// Shortening to zero expires the rest just like the final tick would.
    pub fn extend(&mut self, delta_secs: i64) -> Option<TimerSignal> {
        let RestTimerState::Running(remaining) = self.state else {
            return None;
        };

        let updated = if delta_secs >= 0 {
            remaining.saturating_add(delta_secs.unsigned_abs())
        } else {
            remaining.saturating_sub(delta_secs.unsigned_abs())
        };
        debug!(generation = self.generation, remaining = updated, "rest extended");

        if updated == 0 {
            self.expire()
        } else {
            self.state = RestTimerState::Running(updated);
            None
        }
    }

    pub fn cancel(&mut self) {
        if self.is_running() {
            self.generation += 1;
            self.scheduler.stop();
            debug!(generation = self.generation, "rest cancelled");
        }
        self.state = RestTimerState::Idle;
    }

    /// Apply one tick of `generation`. Ticks from retired countdowns are ignored.
    pub fn on_tick(&mut self, generation: u64) -> Option<TimerSignal> {
        if generation != self.generation {
            trace!(generation, current = self.generation, "stale rest tick");
            return None;
        }

        match self.state {
            RestTimerState::Idle => None,
            RestTimerState::Running(remaining) => {
                let remaining = remaining.saturating_sub(1);
                if remaining == 0 {
                    self.expire()
                } else {
                    self.state = RestTimerState::Running(remaining);
                    None
                }
            }
        }
    }

    fn expire(&mut self) -> Option<TimerSignal> {
        self.generation += 1;
        self.state = RestTimerState::Idle;
        self.scheduler.stop();
        debug!("rest expired");
        Some(TimerSignal::Expired)
    }
}
