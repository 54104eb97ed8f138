use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use harvest_logging::{harvest_info, harvest_warn};
use timeline_core::{Effect, Msg, RunResultKind};
use timeline_engine::{EngineEvent, EngineHandle, RunOutcome, RunRequest, RunSummary};

/// Executes core effects against the engine and feeds engine events back
/// as messages.
pub struct EffectRunner {
    engine: EngineHandle,
    request: RunRequest,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, request: RunRequest, msg_tx: mpsc::Sender<Msg>) -> Self {
        let runner = Self { engine, request };
        runner.spawn_event_loop(msg_tx);
        runner
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartRun { run_id, delay_ms } => {
                    harvest_info!("StartRun run_id={} delay_ms={}", run_id, delay_ms);
                    self.engine.set_delay(Duration::from_millis(delay_ms));
                    self.engine.start(run_id, self.request.clone());
                }
                Effect::StopRun => self.engine.stop(),
                Effect::SetDelay { delay_ms } => {
                    harvest_info!("SetDelay delay_ms={}", delay_ms);
                    self.engine.set_delay(Duration::from_millis(delay_ms));
                }
            }
        }
    }

    fn spawn_event_loop(&self, msg_tx: mpsc::Sender<Msg>) {
        let engine = self.engine.clone();
        thread::spawn(move || loop {
            let Some(event) = engine.recv_timeout(Duration::from_millis(50)) else {
                continue;
            };
            if msg_tx.send(map_event(event)).is_err() {
                break;
            }
        });
    }
}

pub fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::Progress(progress) => Msg::RunProgress {
            run_id: progress.run_id,
            visited: progress.visited,
            rows: progress.rows,
        },
        EngineEvent::RunCompleted { run_id, result } => match result {
            Ok(summary) => finished(run_id, &summary),
            Err(failure) => {
                harvest_warn!("Run {} failed: {}", run_id, failure);
                Msg::RunFinished {
                    run_id,
                    result: RunResultKind::Failed,
                    rows: 0,
                    export: None,
                }
            }
        },
    }
}

fn finished(run_id: u64, summary: &RunSummary) -> Msg {
    let export = match &summary.export.path {
        Some(path) => path.display().to_string(),
        None => summary.export.filename.clone(),
    };
    Msg::RunFinished {
        run_id,
        result: match summary.outcome {
            RunOutcome::Done => RunResultKind::Done,
            RunOutcome::Cancelled => RunResultKind::Cancelled,
        },
        rows: summary.rows,
        export: Some(export),
    }
}
