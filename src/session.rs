use std::collections::BTreeSet;

use chrono::{DateTime, Local};
use tracing::{debug, info, warn};

use crate::exercise::{ExerciseStep, SessionQueue};
use crate::rest_timer::{RestTimer, TickScheduler, TimerSignal};
use crate::util::percent;

/// Rest between sets unless the config says otherwise
pub const DEFAULT_REST_SECS: u64 = 45;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub rest_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            rest_secs: DEFAULT_REST_SECS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum SessionPhase {
    Active,
    Finished,
    Empty,
}

/// Notifications for the host, drained with `SessionEngine::take_signals`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionSignal {
    RestExpired,
    SessionComplete,
}

/// Walks a user through a session queue one exercise at a time.
///
/// Set toggles are an undo-able checklist for the current exercise; only
/// `advance` marks an exercise done, so progress never goes backwards.
#[derive(Debug)]
pub struct SessionEngine {
    config: SessionConfig,
    queue: SessionQueue,
    phase: SessionPhase,
    cursor: usize,
    set_vector: Vec<bool>,
    completed: BTreeSet<usize>,
    timer: RestTimer,
    signals: Vec<SessionSignal>,
    started_at: DateTime<Local>,
    finished_at: Option<DateTime<Local>>,
}

impl SessionEngine {
    pub fn new(queue: SessionQueue, config: SessionConfig, timer: RestTimer) -> Self {
        let phase = if queue.is_empty() {
            SessionPhase::Empty
        } else {
            SessionPhase::Active
        };
        let set_vector = queue
            .get(0)
            .map(|step| vec![false; step.target_sets])
            .unwrap_or_default();

        info!(exercises = queue.len(), %phase, "session created");

        Self {
            config,
            queue,
            phase,
            cursor: 0,
            set_vector,
            completed: BTreeSet::new(),
            timer,
            signals: Vec::new(),
            started_at: Local::now(),
            finished_at: None,
        }
    }

    /// Convenience constructor wiring a fresh timer onto `scheduler`
    pub fn with_scheduler(
        queue: SessionQueue,
        config: SessionConfig,
        scheduler: Box<dyn TickScheduler>,
    ) -> Self {
        Self::new(queue, config, RestTimer::new(scheduler))
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == SessionPhase::Active
    }

    pub fn queue(&self) -> &SessionQueue {
        &self.queue
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn set_vector(&self) -> &[bool] {
        &self.set_vector
    }

    pub fn completed_sets_in_current(&self) -> usize {
        self.set_vector.iter().filter(|done| **done).count()
    }

    pub fn completed_exercises(&self) -> &BTreeSet<usize> {
        &self.completed
    }

    pub fn rest_timer(&self) -> &RestTimer {
        &self.timer
    }

    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<DateTime<Local>> {
        self.finished_at
    }

    /// The exercise under the cursor; `None` unless the session is active
    pub fn current_exercise(&self) -> Option<&ExerciseStep> {
        match self.phase {
            SessionPhase::Active => self.queue.get(self.cursor),
            SessionPhase::Finished | SessionPhase::Empty => None,
        }
    }

    pub fn next_exercise(&self) -> Option<&ExerciseStep> {
        match self.phase {
            SessionPhase::Active => self.queue.get(self.cursor + 1),
            SessionPhase::Finished | SessionPhase::Empty => None,
        }
    }

    pub fn progress_percent(&self) -> u8 {
        percent(self.completed.len(), self.queue.len())
    }

    /// Flip one set of the current exercise. Completing a set starts the rest.
    pub fn toggle_set(&mut self, set_index: usize) -> &[bool] {
        if !self.is_active() {
            return &[];
        }

        debug_assert!(
            set_index < self.set_vector.len(),
            "set index {set_index} out of range for {} sets",
            self.set_vector.len()
        );
        let Some(done) = self.set_vector.get_mut(set_index) else {
            warn!(set_index, sets = self.set_vector.len(), "ignoring out of range set toggle");
            return &self.set_vector;
        };

        *done = !*done;
        let now_done = *done;
        debug!(cursor = self.cursor, set_index, now_done, "set toggled");

        if now_done {
            self.timer.start(self.config.rest_secs);
        }

        &self.set_vector
    }

    /// Mark the current exercise done and move on, or finish after the last one.
    /// Always ends any rest in progress.
    pub fn advance(&mut self) -> SessionPhase {
        if !self.is_active() {
            return self.phase;
        }

        self.timer.cancel();
        self.completed.insert(self.cursor);

        if self.cursor + 1 >= self.queue.len() {
            self.phase = SessionPhase::Finished;
            self.set_vector.clear();
            self.finished_at = Some(Local::now());
            self.signals.push(SessionSignal::SessionComplete);
            info!(exercises = self.queue.len(), "session complete");
        } else {
            self.cursor += 1;
            self.set_vector = self
                .queue
                .get(self.cursor)
                .map(|step| vec![false; step.target_sets])
                .unwrap_or_default();
            info!(
                cursor = self.cursor,
                progress = self.progress_percent(),
                "advanced to next exercise"
            );
        }

        self.phase
    }

    /// Start the same queue over from the first exercise
    pub fn restart(&mut self) {
        self.timer.cancel();
        self.phase = if self.queue.is_empty() {
            SessionPhase::Empty
        } else {
            SessionPhase::Active
        };
        self.cursor = 0;
        self.set_vector = self
            .queue
            .get(0)
            .map(|step| vec![false; step.target_sets])
            .unwrap_or_default();
        self.completed.clear();
        self.signals.clear();
        self.started_at = Local::now();
        self.finished_at = None;
        info!("session restarted");
    }

    /// End the current rest early without touching the cursor
    pub fn skip_rest(&mut self) {
        self.timer.cancel();
    }

    pub fn extend_rest(&mut self, delta_secs: i64) {
        if let Some(signal) = self.timer.extend(delta_secs) {
            self.forward(signal);
        }
    }

    /// Route a tick from the scheduler to the rest timer
    pub fn on_rest_tick(&mut self, generation: u64) {
        if let Some(signal) = self.timer.on_tick(generation) {
            self.forward(signal);
        }
    }

    pub fn take_signals(&mut self) -> Vec<SessionSignal> {
        std::mem::take(&mut self.signals)
    }

    fn forward(&mut self, signal: TimerSignal) {
        match signal {
            TimerSignal::Expired => self.signals.push(SessionSignal::RestExpired),
        }
    }
}
