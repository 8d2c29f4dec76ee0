use repflow::rest_timer::{ManualTickScheduler, RestTimerState};
use repflow::session::{SessionConfig, DEFAULT_REST_SECS};
use repflow::{ExerciseStep, SessionEngine, SessionPhase, SessionQueue, SessionSignal};

/// Checks the session invariants over a spread of queue shapes.
/// Each shape lists the target set count of every exercise.
const SHAPES: &[&[usize]] = &[
    &[1],
    &[3],
    &[3, 3, 3],
    &[1, 2, 3, 4],
    &[5, 1, 5, 1, 5, 1, 5],
    &[2; 11],
    &[1; 40],
];

fn queue(sets: &[usize]) -> SessionQueue {
    sets.iter()
        .enumerate()
        .map(|(i, &n)| ExerciseStep::new(format!("exercise {i}"), "legs", n, "8-12"))
        .collect()
}

fn engine(sets: &[usize]) -> SessionEngine {
    SessionEngine::with_scheduler(
        queue(sets),
        SessionConfig::default(),
        Box::new(ManualTickScheduler::new()),
    )
}

fn expected_percent(k: usize, n: usize) -> u8 {
    (100.0 * k as f64 / n as f64).round() as u8
}

#[test]
fn fresh_session_starts_at_first_exercise() {
    for shape in SHAPES {
        let e = engine(shape);
        assert_eq!(e.progress_percent(), 0);
        assert_eq!(e.current_exercise(), queue(shape).get(0));
        assert_eq!(e.set_vector().len(), shape[0]);
        assert!(e.set_vector().iter().all(|done| !done));
    }
}

#[test]
fn toggling_alone_never_moves_progress() {
    for shape in SHAPES {
        let mut e = engine(shape);
        let sets = shape[0];
        for round in 0..3 {
            for i in 0..sets {
                e.toggle_set((i + round) % sets);
            }
        }
        assert!(e.completed_exercises().is_empty());
        assert_eq!(e.progress_percent(), 0);
        assert_eq!(e.cursor(), 0);
    }
}

#[test]
fn double_toggle_restores_bit() {
    for shape in SHAPES {
        let mut e = engine(shape);
        for i in 0..shape[0] {
            let before = e.set_vector()[i];
            e.toggle_set(i);
            e.toggle_set(i);
            assert_eq!(e.set_vector()[i], before);
        }
    }
}

#[test]
fn advancing_k_times_moves_cursor_and_progress() {
    for shape in SHAPES {
        let n = shape.len();
        let mut e = engine(shape);
        for k in 1..n {
            e.toggle_set(0);
            assert_eq!(e.advance(), SessionPhase::Active);

            assert_eq!(e.cursor(), k);
            assert_eq!(e.set_vector(), vec![false; shape[k]].as_slice());
            assert_eq!(e.progress_percent(), expected_percent(k, n));
            assert!(!e.rest_timer().is_running());
        }
    }
}

#[test]
fn advancing_len_times_finishes_once() {
    for shape in SHAPES {
        let mut e = engine(shape);
        let mut completions = 0;
        for _ in 0..shape.len() {
            e.advance();
            completions += e
                .take_signals()
                .iter()
                .filter(|s| **s == SessionSignal::SessionComplete)
                .count();
        }

        assert_eq!(e.phase(), SessionPhase::Finished);
        assert_eq!(e.progress_percent(), 100);
        assert_eq!(completions, 1);

        // extra advances are inert
        e.advance();
        assert!(e.take_signals().is_empty());
        assert_eq!(e.progress_percent(), 100);
    }
}

#[test]
fn progress_rounds_exact_halves_up() {
    let mut e = engine(&[1; 40]);
    for _ in 0..23 {
        e.advance();
    }
    // 23 of 40 is exactly 57.5%
    assert_eq!(e.cursor(), 23);
    assert_eq!(e.progress_percent(), 58);
}

#[test]
fn only_completing_a_set_starts_rest() {
    let mut e = engine(&[3, 3]);

    e.toggle_set(0);
    assert_eq!(e.rest_timer().state(), RestTimerState::Running(DEFAULT_REST_SECS));
    let generation = e.rest_timer().generation();

    for _ in 0..10 {
        e.on_rest_tick(generation);
    }
    e.toggle_set(0);
    assert_eq!(
        e.rest_timer().state(),
        RestTimerState::Running(DEFAULT_REST_SECS - 10)
    );
    assert_eq!(e.rest_timer().generation(), generation);

    // re-completing restarts the full rest
    e.toggle_set(0);
    assert_eq!(e.rest_timer().state(), RestTimerState::Running(DEFAULT_REST_SECS));
}

#[test]
fn advance_always_clears_rest() {
    let mut e = engine(&[2, 2, 2]);
    e.toggle_set(1);
    assert!(e.rest_timer().is_running());
    let stale = e.rest_timer().generation();

    e.advance();
    assert_eq!(e.rest_timer().state(), RestTimerState::Idle);

    // a tick already in flight for the cancelled rest is ignored
    e.on_rest_tick(stale);
    assert_eq!(e.rest_timer().state(), RestTimerState::Idle);
    assert!(e.take_signals().is_empty());
}

#[test]
fn three_by_three_walkthrough() {
    let mut e = engine(&[3, 3, 3]);

    e.toggle_set(0);
    assert_eq!(e.rest_timer().state(), RestTimerState::Running(45));

    e.advance();
    assert_eq!(e.rest_timer().state(), RestTimerState::Idle);
    assert_eq!(e.cursor(), 1);
    assert_eq!(e.progress_percent(), 33);

    for i in 0..3 {
        e.toggle_set(i);
    }
    e.toggle_set(1);
    assert_eq!(e.set_vector(), &[true, false, true]);
    assert_eq!(e.completed_exercises().iter().copied().collect::<Vec<_>>(), vec![0]);
    assert_eq!(e.progress_percent(), 33);

    e.advance();
    assert!(e.take_signals().is_empty());
    e.advance();
    assert_eq!(e.phase(), SessionPhase::Finished);
    assert_eq!(e.progress_percent(), 100);
    assert_eq!(e.take_signals(), vec![SessionSignal::SessionComplete]);
}

#[test]
fn empty_queue_is_terminal() {
    let mut e = engine(&[]);
    assert_eq!(e.phase(), SessionPhase::Empty);
    assert_eq!(e.progress_percent(), 0);
    assert!(e.current_exercise().is_none());

    e.advance();
    e.toggle_set(0);
    assert_eq!(e.phase(), SessionPhase::Empty);
    assert!(!e.rest_timer().is_running());
}
