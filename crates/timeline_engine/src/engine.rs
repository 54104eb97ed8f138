use std::path::PathBuf;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use harvest_logging::{harvest_error, harvest_info, harvest_warn};

use crate::control::{RunControl, DEFAULT_DELAY};
use crate::export::{ExportSink, FileExportSink};
use crate::harvest::{HarvestSettings, Harvester};
use crate::snapshot::{LayoutSettings, Selectors, SnapshotDocument};
use crate::types::{ChannelProgressSink, EngineEvent, FailureKind, RunId, RunSummary};

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub harvest: HarvestSettings,
    pub output_dir: PathBuf,
    pub initial_delay: Duration,
}

impl EngineConfig {
    pub fn default_with_output(output_dir: PathBuf) -> Self {
        Self {
            harvest: HarvestSettings::default(),
            output_dir,
            initial_delay: DEFAULT_DELAY,
        }
    }
}

/// A page to harvest: the saved HTML, further batches that load as the
/// page is scrolled, and the location it was saved from.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub html: String,
    pub batches: Vec<String>,
    pub selectors: Selectors,
    pub layout: LayoutSettings,
    pub location: String,
}

impl RunRequest {
    pub fn new(html: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            batches: Vec::new(),
            selectors: Selectors::default(),
            layout: LayoutSettings::default(),
            location: location.into(),
        }
    }
}

enum EngineCommand {
    Start { run_id: RunId, request: RunRequest },
}

/// Runs harvests one at a time on a worker thread. Stop and delay
/// changes bypass the command queue and reach the running loop directly.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Arc<Mutex<mpsc::Receiver<EngineEvent>>>,
    control: RunControl,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> Self {
        let sink = Arc::new(FileExportSink::new(config.output_dir.clone()));
        Self::with_sink(config, sink)
    }

    pub fn with_sink(config: EngineConfig, sink: Arc<dyn ExportSink>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let control = RunControl::new(config.initial_delay);
        let worker_control = control.clone();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()
            {
                Ok(runtime) => runtime,
                Err(err) => {
                    harvest_error!("Failed to start harvest runtime: {err}");
                    return;
                }
            };
            let mut harvester = Harvester::new(config.harvest);
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::Start { run_id, request } => {
                        let progress = ChannelProgressSink::new(event_tx.clone());
                        let result = runtime.block_on(execute(
                            &mut harvester,
                            run_id,
                            request,
                            &worker_control,
                            sink.as_ref(),
                            &progress,
                        ));
                        match &result {
                            Err(failure @ FailureKind::Export(_)) => {
                                harvest_error!("Run {run_id} failed: {failure}");
                            }
                            Err(failure) => harvest_warn!("Run {run_id} failed: {failure}"),
                            Ok(_) => {}
                        }
                        let _ = event_tx.send(EngineEvent::RunCompleted { run_id, result });
                    }
                }
            }
        });

        Self {
            cmd_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
            control,
        }
    }

    /// Clears the stop flag, then queues the run. A `stop` issued after this
    /// call applies to this run even before the worker picks it up.
    pub fn start(&self, run_id: RunId, request: RunRequest) {
        self.control.begin_run();
        harvest_info!(
            "Starting run {run_id} for {} (delay {:?})",
            request.location,
            self.control.delay()
        );
        let _ = self.cmd_tx.send(EngineCommand::Start { run_id, request });
    }

    pub fn stop(&self) {
        harvest_info!("Stop requested");
        self.control.stop();
    }

    pub fn set_delay(&self, delay: Duration) {
        self.control.set_delay(delay);
    }

    pub fn control(&self) -> &RunControl {
        &self.control
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.try_recv().ok()
    }

    /// Waits up to `timeout` for the next event.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.recv_timeout(timeout).ok()
    }
}

async fn execute(
    harvester: &mut Harvester,
    run_id: RunId,
    request: RunRequest,
    control: &RunControl,
    sink: &dyn ExportSink,
    progress: &ChannelProgressSink,
) -> Result<RunSummary, FailureKind> {
    let mut doc = SnapshotDocument::with_batches(
        &request.html,
        request.batches,
        &request.selectors,
        request.layout,
    )
    .map_err(|err| FailureKind::InvalidDocument(err.to_string()))?;

    harvester
        .run_and_export(run_id, &mut doc, &request.location, control, sink, progress)
        .await
        .map_err(|err| FailureKind::Export(err.to_string()))
}
