use std::sync::Arc;
use std::time::{Duration, Instant};

use timeline_engine::{
    EngineConfig, EngineEvent, EngineHandle, FailureKind, LayoutSettings, MemoryExportSink,
    RunOutcome, RunRequest, RunSummary, Selectors,
};

fn page(posts: usize) -> String {
    let body: String = (0..posts)
        .map(|n| {
            format!(
                r#"<article><div data-testid="User-Name"><a href="/u{n}"></a><a href="/u{n}">@u{n}</a></div><div data-testid="tweetText">text {n}</div></article>"#
            )
        })
        .collect();
    format!("<html><body><section><div><div>{body}</div></div></section></body></html>")
}

fn config() -> EngineConfig {
    let mut config = EngineConfig::default_with_output(std::env::temp_dir());
    config.initial_delay = Duration::ZERO;
    config
}

fn wait_for_completion(engine: &EngineHandle) -> (Vec<EngineEvent>, Result<RunSummary, FailureKind>) {
    let deadline = Instant::now() + Duration::from_secs(10);
    let mut progress = Vec::new();
    while Instant::now() < deadline {
        match engine.recv_timeout(Duration::from_millis(100)) {
            Some(EngineEvent::RunCompleted { result, .. }) => return (progress, result),
            Some(event) => progress.push(event),
            None => {}
        }
    }
    panic!("run did not complete");
}

#[test]
fn engine_runs_and_exports_on_its_worker() {
    let sink = Arc::new(MemoryExportSink::new());
    let engine = EngineHandle::with_sink(config(), sink.clone());

    let mut request = RunRequest::new(page(6), "https://x.com/u0/status/100");
    request.layout = LayoutSettings {
        viewport_height: 800.0,
        post_height: 300.0,
        load_threshold: 0.0,
    };
    engine.start(1, request);

    let (progress, result) = wait_for_completion(&engine);
    let summary = result.expect("run succeeds");
    assert_eq!(summary.outcome, RunOutcome::Done);
    assert_eq!(summary.rows, 6);
    assert!(summary.scrolls > 0);
    assert_eq!(progress.len(), 6);

    let exports = sink.take();
    assert_eq!(exports.len(), 1);
    assert_eq!(exports[0].0, "u0-100.tsv");
    assert!(exports[0].1.starts_with("User\tText\n@u0\ttext 0\n"));
    assert!(exports[0].1.ends_with("@u5\ttext 5\n"));
}

#[test]
fn invalid_selectors_fail_the_run() {
    let sink = Arc::new(MemoryExportSink::new());
    let engine = EngineHandle::with_sink(config(), sink.clone());

    let mut request = RunRequest::new(page(1), "/u0");
    request.selectors = Selectors {
        container: ">>".to_string(),
        ..Selectors::default()
    };
    engine.start(2, request);

    let (_, result) = wait_for_completion(&engine);
    assert!(matches!(result, Err(FailureKind::InvalidDocument(_))));
    assert!(sink.take().is_empty());
}

#[test]
fn runs_are_processed_one_after_another() {
    let sink = Arc::new(MemoryExportSink::new());
    let engine = EngineHandle::with_sink(config(), sink.clone());

    engine.start(1, RunRequest::new(page(2), "/first"));
    engine.start(2, RunRequest::new(page(3), "/second"));

    let (_, first) = wait_for_completion(&engine);
    let (_, second) = wait_for_completion(&engine);
    assert_eq!(first.unwrap().rows, 2);
    assert_eq!(second.unwrap().rows, 3);

    let names: Vec<String> = sink.take().into_iter().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["first.tsv", "second.tsv"]);
}

#[test]
fn stop_right_after_start_cancels_the_queued_run() {
    let sink = Arc::new(MemoryExportSink::new());
    let engine = EngineHandle::with_sink(config(), sink.clone());

    engine.start(1, RunRequest::new(page(3_000), "/alice"));
    engine.stop();

    let (progress, result) = wait_for_completion(&engine);
    let summary = result.expect("cancelled run still exports");
    assert_eq!(summary.outcome, RunOutcome::Cancelled);
    assert_eq!(summary.visited, 0);
    assert_eq!(summary.rows, 0);
    assert!(progress.is_empty());
    assert_eq!(sink.take(), vec![("alice.tsv".to_string(), "User\tText\n".to_string())]);
}

#[test]
fn start_clears_a_stop_left_over_from_an_earlier_run() {
    let sink = Arc::new(MemoryExportSink::new());
    let engine = EngineHandle::with_sink(config(), sink.clone());

    engine.stop();
    engine.start(1, RunRequest::new(page(3), "/bob"));

    let (_, result) = wait_for_completion(&engine);
    let summary = result.unwrap();
    assert_eq!(summary.outcome, RunOutcome::Done);
    assert_eq!(summary.rows, 3);
}

#[test]
fn export_failure_is_reported_as_an_export_error() {
    let not_a_dir = tempfile::NamedTempFile::new().unwrap();
    let mut config = config();
    config.output_dir = not_a_dir.path().to_path_buf();
    let engine = EngineHandle::new(config);

    engine.start(1, RunRequest::new(page(2), "/carol"));

    let (_, result) = wait_for_completion(&engine);
    assert!(matches!(result, Err(FailureKind::Export(_))));
}
