#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    StartRun { run_id: crate::RunId, delay_ms: u64 },
    StopRun,
    SetDelay { delay_ms: u64 },
}
