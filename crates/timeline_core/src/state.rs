use crate::view_model::AppViewModel;

pub type RunId = u64;

pub const DEFAULT_DELAY_MS: u64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Running,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunResultKind {
    Done,
    Cancelled,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    session: SessionState,
    delay_ms: u64,
    delay_input: String,
    delay_rejected: bool,
    next_run_id: RunId,
    active_run: Option<RunId>,
    stop_requested: bool,
    visited: usize,
    rows: usize,
    last_result: Option<RunResultKind>,
    last_export: Option<String>,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            session: SessionState::Idle,
            delay_ms: DEFAULT_DELAY_MS,
            delay_input: DEFAULT_DELAY_MS.to_string(),
            delay_rejected: false,
            next_run_id: 1,
            active_run: None,
            stop_requested: false,
            visited: 0,
            rows: 0,
            last_result: None,
            last_export: None,
            dirty: false,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> SessionState {
        self.session
    }

    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    pub fn active_run(&self) -> Option<RunId> {
        self.active_run
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            session: self.session,
            delay_ms: self.delay_ms,
            delay_input: self.delay_input.clone(),
            delay_rejected: self.delay_rejected,
            active_run: self.active_run,
            stop_requested: self.stop_requested,
            visited: self.visited,
            rows: self.rows,
            last_result: self.last_result,
            last_export: self.last_export.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn start_run(&mut self) -> RunId {
        let run_id = self.next_run_id;
        self.next_run_id += 1;
        self.session = SessionState::Running;
        self.active_run = Some(run_id);
        self.stop_requested = false;
        self.visited = 0;
        self.rows = 0;
        self.dirty = true;
        run_id
    }

    pub(crate) fn request_stop(&mut self) {
        self.stop_requested = true;
        self.dirty = true;
    }

    pub(crate) fn stop_requested(&self) -> bool {
        self.stop_requested
    }

    /// Stores the typed text; returns the new delay when it parses.
    pub(crate) fn set_delay_input(&mut self, input: String) -> Option<u64> {
        let parsed = parse_delay(&input);
        match parsed {
            Some(delay_ms) => {
                self.delay_ms = delay_ms;
                self.delay_rejected = false;
            }
            None => self.delay_rejected = true,
        }
        self.delay_input = input;
        self.dirty = true;
        parsed
    }

    pub(crate) fn apply_progress(&mut self, run_id: RunId, visited: usize, rows: usize) {
        if self.active_run != Some(run_id) {
            return;
        }
        self.visited = visited;
        self.rows = rows;
        self.dirty = true;
    }

    pub(crate) fn finish_run(
        &mut self,
        run_id: RunId,
        result: RunResultKind,
        rows: usize,
        export: Option<String>,
    ) {
        if self.active_run != Some(run_id) {
            return;
        }
        self.session = SessionState::Idle;
        self.active_run = None;
        self.stop_requested = false;
        self.rows = rows;
        self.last_result = Some(result);
        self.last_export = export;
        self.dirty = true;
    }
}

/// Delay field contents as milliseconds; surrounding whitespace is allowed,
/// anything but a non-negative integer is rejected.
pub fn parse_delay(input: &str) -> Option<u64> {
    input.trim().parse::<u64>().ok()
}
