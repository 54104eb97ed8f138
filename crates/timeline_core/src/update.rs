use crate::{AppState, Effect, Msg, SessionState};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::StartClicked => {
            // One run at a time; a second Start while running is ignored.
            if state.session() == SessionState::Idle {
                let run_id = state.start_run();
                vec![Effect::StartRun {
                    run_id,
                    delay_ms: state.delay_ms(),
                }]
            } else {
                Vec::new()
            }
        }
        Msg::StopClicked => {
            if state.session() == SessionState::Running && !state.stop_requested() {
                state.request_stop();
                vec![Effect::StopRun]
            } else {
                Vec::new()
            }
        }
        Msg::DelayInputChanged(input) => match state.set_delay_input(input) {
            Some(delay_ms) => vec![Effect::SetDelay { delay_ms }],
            None => Vec::new(),
        },
        Msg::RunProgress {
            run_id,
            visited,
            rows,
        } => {
            state.apply_progress(run_id, visited, rows);
            Vec::new()
        }
        Msg::RunFinished {
            run_id,
            result,
            rows,
            export,
        } => {
            state.finish_run(run_id, result, rows, export);
            Vec::new()
        }
    };

    (state, effects)
}
