use std::sync::Once;

use timeline_core::{update, AppState, Effect, Msg, RunResultKind, SessionState, DEFAULT_DELAY_MS};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(harvest_logging::initialize_for_tests);
}

fn started() -> AppState {
    let (state, _) = update(AppState::new(), Msg::StartClicked);
    state
}

#[test]
fn start_begins_a_run_with_the_current_delay() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::StartClicked);

    assert_eq!(state.session(), SessionState::Running);
    assert_eq!(
        effects,
        vec![Effect::StartRun {
            run_id: 1,
            delay_ms: DEFAULT_DELAY_MS,
        }]
    );
    assert!(state.view().dirty);
}

#[test]
fn start_is_ignored_while_running() {
    init_logging();
    let (state, effects) = update(started(), Msg::StartClicked);

    assert_eq!(state.active_run(), Some(1));
    assert!(effects.is_empty());
}

#[test]
fn stop_is_sent_once_and_run_stays_active_until_finished() {
    init_logging();
    let (state, effects) = update(started(), Msg::StopClicked);
    assert_eq!(effects, vec![Effect::StopRun]);
    assert_eq!(state.session(), SessionState::Running);
    assert!(state.view().stop_requested);
    assert!(state.view().status_line().starts_with("Stopping"));

    let (state, effects) = update(state, Msg::StopClicked);
    assert!(effects.is_empty());

    let (state, _) = update(
        state,
        Msg::RunFinished {
            run_id: 1,
            result: RunResultKind::Cancelled,
            rows: 3,
            export: Some("alice.tsv".to_string()),
        },
    );
    let view = state.view();
    assert_eq!(view.session, SessionState::Idle);
    assert!(!view.stop_requested);
    assert_eq!(view.rows, 3);
    assert_eq!(view.last_result, Some(RunResultKind::Cancelled));
    assert_eq!(
        view.status_line(),
        "Idle | delay 1000 ms | posts 0 | rows 3 | last run cancelled -> alice.tsv"
    );
}

#[test]
fn stop_when_idle_does_nothing() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::StopClicked);
    assert_eq!(state.session(), SessionState::Idle);
    assert!(effects.is_empty());
}

#[test]
fn valid_delay_input_updates_the_delay_even_mid_run() {
    init_logging();
    let (state, effects) = update(started(), Msg::DelayInputChanged(" 2500 ".to_string()));

    assert_eq!(effects, vec![Effect::SetDelay { delay_ms: 2500 }]);
    assert_eq!(state.delay_ms(), 2500);
    assert!(!state.view().delay_rejected);
}

#[test]
fn invalid_delay_input_keeps_the_previous_delay() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::DelayInputChanged("abc".to_string()));

    assert!(effects.is_empty());
    assert_eq!(state.delay_ms(), DEFAULT_DELAY_MS);
    let view = state.view();
    assert!(view.delay_rejected);
    assert_eq!(view.delay_input, "abc");
}

#[test]
fn next_run_uses_the_new_delay_and_a_new_id() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::DelayInputChanged("300".to_string()));
    let (state, _) = update(state, Msg::StartClicked);
    let (state, _) = update(
        state,
        Msg::RunFinished {
            run_id: 1,
            result: RunResultKind::Done,
            rows: 0,
            export: None,
        },
    );
    let (_, effects) = update(state, Msg::StartClicked);

    assert_eq!(
        effects,
        vec![Effect::StartRun {
            run_id: 2,
            delay_ms: 300,
        }]
    );
}

#[test]
fn progress_from_a_stale_run_is_ignored() {
    init_logging();
    let (state, _) = update(
        started(),
        Msg::RunProgress {
            run_id: 1,
            visited: 5,
            rows: 4,
        },
    );
    let (mut state, _) = update(
        state,
        Msg::RunProgress {
            run_id: 9,
            visited: 50,
            rows: 40,
        },
    );

    let view = state.view();
    assert_eq!((view.visited, view.rows), (5, 4));
    assert!(state.consume_dirty());
    assert!(!state.consume_dirty());
}
