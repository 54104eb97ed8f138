use std::fmt;

use crate::export::ExportReceipt;

pub type RunId = u64;

/// Lifecycle of one harvest run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunPhase {
    #[default]
    Idle,
    Running,
    Cancelled,
    Done,
}

/// How a run ended. Both outcomes export what was collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The sibling walk ran off the end of the timeline.
    Done,
    /// A stop request was seen at the top of an iteration.
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunProgress {
    pub run_id: RunId,
    pub visited: usize,
    pub rows: usize,
    pub scrolls: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub outcome: RunOutcome,
    pub rows: usize,
    pub visited: usize,
    pub skipped: usize,
    pub scrolls: usize,
    pub export: ExportReceipt,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Progress(RunProgress),
    RunCompleted {
        run_id: RunId,
        result: Result<RunSummary, FailureKind>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidDocument(String),
    Export(String),
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidDocument(message) => write!(f, "invalid document: {message}"),
            FailureKind::Export(message) => write!(f, "export failed: {message}"),
        }
    }
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelProgressSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Discards progress events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgressSink;

impl ProgressSink for NullProgressSink {
    fn emit(&self, _event: EngineEvent) {}
}
