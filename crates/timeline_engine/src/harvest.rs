use harvest_logging::{harvest_info, harvest_trace, harvest_warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::control::RunControl;
use crate::document::HostDocument;
use crate::export::{ExportError, ExportSink};
use crate::extract::{extract_author, extract_body};
use crate::filename::export_filename;
use crate::pause::{jittered_delay, Pause, TokioPause, JITTER};
use crate::tsv::{Row, TsvBuffer};
use crate::types::{EngineEvent, ProgressSink, RunId, RunOutcome, RunPhase, RunProgress, RunSummary};
use crate::viewport::{ensure_visible, DEFAULT_SCROLL_FRACTION};

#[derive(Debug, Clone, PartialEq)]
pub struct HarvestSettings {
    /// Share of the viewport scrolled when a post is below the fold.
    pub scroll_fraction: f64,
    /// Relative spread of the settle wait around the configured delay.
    pub jitter: f64,
}

impl Default for HarvestSettings {
    fn default() -> Self {
        Self {
            scroll_fraction: DEFAULT_SCROLL_FRACTION,
            jitter: JITTER,
        }
    }
}

/// What a run collected, before export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub outcome: RunOutcome,
    pub buffer: TsvBuffer,
    pub visited: usize,
    pub skipped: usize,
    pub scrolls: usize,
}

/// Walks the timeline post by post, scrolling when the next post is
/// below the fold, and collects one row per post that has both an
/// author and a body.
///
/// The only suspension point is the settle wait after a scroll; the stop
/// flag is checked once at the top of every iteration. The flag is cleared
/// by whoever requests the run (`RunControl::begin_run`), not here.
pub struct Harvester<P = TokioPause, R = StdRng> {
    settings: HarvestSettings,
    pause: P,
    rng: R,
    phase: RunPhase,
}

impl Harvester<TokioPause, StdRng> {
    pub fn new(settings: HarvestSettings) -> Self {
        Self::with_parts(settings, TokioPause, StdRng::from_entropy())
    }
}

impl<P: Pause, R: Rng> Harvester<P, R> {
    pub fn with_parts(settings: HarvestSettings, pause: P, rng: R) -> Self {
        Self {
            settings,
            pause,
            rng,
            phase: RunPhase::Idle,
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn pause_mut(&mut self) -> &mut P {
        &mut self.pause
    }

    pub async fn run<D: HostDocument>(
        &mut self,
        run_id: RunId,
        doc: &mut D,
        control: &RunControl,
        progress: &dyn ProgressSink,
    ) -> RunReport {
        self.phase = RunPhase::Running;

        let mut report = RunReport {
            outcome: RunOutcome::Done,
            buffer: TsvBuffer::new(),
            visited: 0,
            skipped: 0,
            scrolls: 0,
        };

        let Some(container) = doc.container() else {
            harvest_warn!("Run {run_id}: timeline container not found");
            self.phase = RunPhase::Done;
            return report;
        };

        let mut cursor = doc.first_child(container);
        report.outcome = loop {
            let Some(post) = cursor else {
                break RunOutcome::Done;
            };
            if control.is_cancelled() {
                break RunOutcome::Cancelled;
            }

            let was_visible = ensure_visible(doc, post, self.settings.scroll_fraction);
            if !was_visible {
                report.scrolls += 1;
            }

            match (extract_author(doc, post), extract_body(doc, post)) {
                (Some(author), Some(body)) => report.buffer.append(&Row::new(&author, &body)),
                (author, body) => {
                    report.skipped += 1;
                    harvest_trace!(
                        "Run {run_id}: skipping post {post:?} (author: {}, body: {})",
                        author.is_some(),
                        body.is_some()
                    );
                }
            }
            report.visited += 1;
            progress.emit(EngineEvent::Progress(RunProgress {
                run_id,
                visited: report.visited,
                rows: report.buffer.row_count(),
                scrolls: report.scrolls,
            }));

            if !was_visible {
                let wait = jittered_delay(control.delay(), self.settings.jitter, &mut self.rng);
                self.pause.pause(wait).await;
            }

            cursor = doc.next_sibling(post);
        };

        self.phase = match report.outcome {
            RunOutcome::Done => RunPhase::Done,
            RunOutcome::Cancelled => RunPhase::Cancelled,
        };
        harvest_info!(
            "Run {run_id} {:?}: {} rows from {} posts ({} skipped, {} scrolls)",
            report.outcome,
            report.buffer.row_count(),
            report.visited,
            report.skipped,
            report.scrolls
        );
        report
    }

    /// Runs to completion or cancellation, then hands the buffer to `sink`
    /// under a name derived from `location`.
    pub async fn run_and_export<D: HostDocument>(
        &mut self,
        run_id: RunId,
        doc: &mut D,
        location: &str,
        control: &RunControl,
        sink: &dyn ExportSink,
        progress: &dyn ProgressSink,
    ) -> Result<RunSummary, ExportError> {
        let report = self.run(run_id, doc, control, progress).await;
        let rows = report.buffer.row_count();
        let filename = export_filename(location);
        let exported = sink.export(&filename, report.buffer.into_string());
        self.phase = RunPhase::Idle;

        let export = exported?;
        harvest_info!("Run {run_id}: exported {} bytes as {}", export.bytes, export.filename);
        Ok(RunSummary {
            outcome: report.outcome,
            rows,
            visited: report.visited,
            skipped: report.skipped,
            scrolls: report.scrolls,
            export,
        })
    }
}
