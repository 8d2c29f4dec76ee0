// Session engine, rest timer and plan sources. The TUI front end lives in
// the binary and only talks to these through their public types.
pub mod app_dirs;
pub mod celebration;
pub mod config;
pub mod error;
pub mod exercise;
pub mod logging;
pub mod plan;
pub mod rest_timer;
pub mod runtime;
pub mod session;
pub mod util;

pub use exercise::{ExerciseStep, SessionQueue};
pub use rest_timer::{RestTimer, RestTimerState};
pub use session::{SessionEngine, SessionPhase, SessionSignal};
