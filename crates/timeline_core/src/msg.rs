#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User clicked Start.
    StartClicked,
    /// User clicked Stop.
    StopClicked,
    /// User edited the delay field (milliseconds, as typed).
    DelayInputChanged(String),
    /// Engine progress for a run.
    RunProgress {
        run_id: crate::RunId,
        visited: usize,
        rows: usize,
    },
    /// Engine finished a run, exported or failed.
    RunFinished {
        run_id: crate::RunId,
        result: crate::RunResultKind,
        rows: usize,
        export: Option<String>,
    },
}
