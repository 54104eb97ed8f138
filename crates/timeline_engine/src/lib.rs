//! Timeline engine: page traversal, post extraction and TSV export.
mod control;
mod document;
mod engine;
mod export;
mod extract;
mod filename;
mod harvest;
mod pause;
mod snapshot;
mod tsv;
mod types;
mod viewport;

pub use control::{RunControl, DEFAULT_DELAY};
pub use document::{HostDocument, Role};
pub use engine::{EngineConfig, EngineHandle, RunRequest};
pub use export::{ensure_output_dir, ExportError, ExportReceipt, ExportSink, FileExportSink, MemoryExportSink};
pub use extract::{extract_author, extract_body};
pub use filename::export_filename;
pub use harvest::{HarvestSettings, Harvester, RunReport};
pub use pause::{jittered_delay, Pause, TokioPause, JITTER};
pub use snapshot::{DocumentError, LayoutSettings, Selectors, SnapshotDocument};
pub use tsv::{normalize, Row, TsvBuffer, NEWLINE_PLACEHOLDER, TAB_PLACEHOLDER};
pub use types::{
    ChannelProgressSink, EngineEvent, FailureKind, NullProgressSink, ProgressSink, RunId,
    RunOutcome, RunPhase, RunProgress, RunSummary,
};
pub use viewport::{ensure_visible, DEFAULT_SCROLL_FRACTION};
