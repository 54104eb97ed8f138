use crate::{RunId, RunResultKind, SessionState};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub session: SessionState,
    pub delay_ms: u64,
    /// Delay field text as last typed.
    pub delay_input: String,
    /// The last delay input was not a valid number of milliseconds.
    pub delay_rejected: bool,
    pub active_run: Option<RunId>,
    pub stop_requested: bool,
    pub visited: usize,
    pub rows: usize,
    pub last_result: Option<RunResultKind>,
    pub last_export: Option<String>,
    pub dirty: bool,
}

impl AppViewModel {
    /// One-line status for the front end.
    pub fn status_line(&self) -> String {
        let session = match (self.session, self.stop_requested) {
            (SessionState::Idle, _) => "Idle",
            (SessionState::Running, false) => "Running",
            (SessionState::Running, true) => "Stopping",
        };
        let mut line = format!(
            "{session} | delay {} ms | posts {} | rows {}",
            self.delay_ms, self.visited, self.rows
        );
        if let Some(result) = self.last_result {
            let label = match result {
                RunResultKind::Done => "done",
                RunResultKind::Cancelled => "cancelled",
                RunResultKind::Failed => "failed",
            };
            line.push_str(&format!(" | last run {label}"));
            if let Some(export) = &self.last_export {
                line.push_str(&format!(" -> {export}"));
            }
        }
        line
    }
}
