use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent};
use tracing::trace;

use crate::rest_timer::TickScheduler;

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum RuntimeEvent {
    Key(KeyEvent),
    Resize,
    /// Redraw tick, produced when no other event arrives in time
    Tick,
    /// One-second tick of the rest countdown with the given generation
    RestTick(u64),
}

/// Source of terminal and timer events
pub trait RuntimeEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<RuntimeEvent, RecvTimeoutError>;

    /// Handle other producers (such as the rest tick thread) can post into
    fn sender(&self) -> Sender<RuntimeEvent>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    tx: Sender<RuntimeEvent>,
    rx: Receiver<RuntimeEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        let key_tx = tx.clone();

        thread::spawn(move || loop {
            match event::read() {
                Ok(CtEvent::Key(key)) => {
                    if key_tx.send(RuntimeEvent::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(CtEvent::Resize(_, _)) => {
                    if key_tx.send(RuntimeEvent::Resize).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            }
        });

        Self { tx, rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl RuntimeEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<RuntimeEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }

    fn sender(&self) -> Sender<RuntimeEvent> {
        self.tx.clone()
    }
}

/// Test event source fed by a channel the test owns
pub struct TestEventSource {
    tx: Sender<RuntimeEvent>,
    rx: Receiver<RuntimeEvent>,
}

impl TestEventSource {
    pub fn new(tx: Sender<RuntimeEvent>, rx: Receiver<RuntimeEvent>) -> Self {
        Self { tx, rx }
    }
}

impl RuntimeEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<RuntimeEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }

    fn sender(&self) -> Sender<RuntimeEvent> {
        self.tx.clone()
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Runner that advances the application one event/tick at a time
pub struct Runner<E: RuntimeEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: RuntimeEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    /// Blocks up to tick interval and returns the next event, or Tick on timeout
    pub fn step(&self) -> RuntimeEvent {
        match self.event_source.recv_timeout(self.ticker.interval()) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                RuntimeEvent::Tick
            }
        }
    }

    pub fn sender(&self) -> Sender<RuntimeEvent> {
        self.event_source.sender()
    }
}

/// Rest tick source backed by one sleeper thread per countdown.
///
/// The thread posts `RestTick(generation)` every interval for as long as its
/// generation is the active one; rescheduling or stopping makes it exit after
/// its current sleep.
#[derive(Debug)]
pub struct ThreadTickScheduler {
    tx: Sender<RuntimeEvent>,
    active: Arc<AtomicU64>,
}

impl ThreadTickScheduler {
    pub fn new(tx: Sender<RuntimeEvent>) -> Self {
        Self {
            tx,
            active: Arc::new(AtomicU64::new(0)),
        }
    }
}

impl TickScheduler for ThreadTickScheduler {
    fn schedule(&mut self, generation: u64, interval: Duration) {
        self.active.store(generation, Ordering::SeqCst);

        let tx = self.tx.clone();
        let active = Arc::clone(&self.active);
        thread::spawn(move || loop {
            thread::sleep(interval);
            if active.load(Ordering::SeqCst) != generation {
                trace!(generation, "rest tick thread retired");
                break;
            }
            if tx.send(RuntimeEvent::RestTick(generation)).is_err() {
                break;
            }
        });
    }

    fn stop(&mut self) {
        // generations start at 1, so 0 never matches a live thread
        self.active.store(0, Ordering::SeqCst);
    }
}

impl Drop for ThreadTickScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
