use std::fs;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;

use harvest_logging::harvest_info;
use timeline_core::{update, AppState, Msg, SessionState};
use timeline_engine::{EngineConfig, EngineHandle, RunRequest};

use crate::commands::{parse_input, Input, HELP};
use crate::effects::EffectRunner;

pub const USAGE: &str = "usage: timeline_app <location> <output_dir> <page.html> [more.html ...]";

/// Command-line arguments: where the page was saved from, where exports
/// go, the saved page and any further batches revealed by scrolling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub location: String,
    pub output_dir: PathBuf,
    pub page: PathBuf,
    pub batches: Vec<PathBuf>,
}

impl Args {
    pub fn parse<I: IntoIterator<Item = String>>(args: I) -> Option<Self> {
        let mut args = args.into_iter();
        let location = args.next()?;
        let output_dir = PathBuf::from(args.next()?);
        let page = PathBuf::from(args.next()?);
        Some(Self {
            location,
            output_dir,
            page,
            batches: args.map(PathBuf::from).collect(),
        })
    }
}

enum Event {
    Msg(Msg),
    Status,
    Quit,
    /// Input closed; leave once no run is active.
    InputClosed,
}

pub fn run(args: Args) -> io::Result<()> {
    let request = load_request(&args)?;
    let engine = EngineHandle::new(EngineConfig::default_with_output(args.output_dir.clone()));

    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let runner = EffectRunner::new(engine, request, msg_tx.clone());
    let (event_tx, event_rx) = mpsc::channel::<Event>();

    let stdin_tx = event_tx.clone();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            let event = match parse_input(&line) {
                None => continue,
                Some(Input::Msg(msg)) => Event::Msg(msg),
                Some(Input::Status) => Event::Status,
                Some(Input::Quit) => Event::Quit,
                Some(Input::Help) => {
                    println!("{HELP}");
                    continue;
                }
                Some(Input::Unknown(line)) => {
                    println!("unknown command {line:?}; {HELP}");
                    continue;
                }
            };
            if stdin_tx.send(event).is_err() {
                return;
            }
        }
        let _ = stdin_tx.send(Event::InputClosed);
    });
    thread::spawn(move || {
        while let Ok(msg) = msg_rx.recv() {
            if event_tx.send(Event::Msg(msg)).is_err() {
                break;
            }
        }
    });

    println!("{HELP}");
    let mut state = AppState::new();
    let mut input_closed = false;
    while let Ok(event) = event_rx.recv() {
        match event {
            Event::Quit => break,
            Event::InputClosed => input_closed = true,
            Event::Status => println!("{}", state.view().status_line()),
            Event::Msg(msg) => {
                let quiet = matches!(msg, Msg::RunProgress { .. });
                let (next, effects) = update(state, msg);
                state = next;
                runner.run(effects);
                if state.consume_dirty() && !quiet {
                    println!("{}", state.view().status_line());
                }
            }
        }
        if input_closed && state.session() == SessionState::Idle {
            break;
        }
    }

    harvest_info!("Console closed");
    Ok(())
}

fn load_request(args: &Args) -> io::Result<RunRequest> {
    let mut request = RunRequest::new(read_page(&args.page)?, args.location.clone());
    for batch in &args.batches {
        request.batches.push(read_page(batch)?);
    }
    harvest_info!(
        "Loaded {:?} with {} further batches for {}",
        args.page,
        request.batches.len(),
        request.location
    );
    Ok(request)
}

fn read_page(path: &Path) -> io::Result<String> {
    fs::read_to_string(path)
        .map_err(|err| io::Error::new(err.kind(), format!("{}: {err}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::{load_request, Args};
    use std::fs;
    use std::path::PathBuf;

    fn args(list: &[&str]) -> Option<Args> {
        Args::parse(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn needs_location_output_and_page() {
        assert_eq!(args(&["https://x.com/a", "out"]), None);
        let parsed = args(&["https://x.com/a", "out", "page.html", "b1.html", "b2.html"]).unwrap();
        assert_eq!(parsed.output_dir, PathBuf::from("out"));
        assert_eq!(parsed.page, PathBuf::from("page.html"));
        assert_eq!(parsed.batches.len(), 2);
    }

    #[test]
    fn request_carries_page_and_batches() {
        let temp = tempfile::TempDir::new().unwrap();
        let page = temp.path().join("page.html");
        let batch = temp.path().join("more.html");
        fs::write(&page, "<html></html>").unwrap();
        fs::write(&batch, "<article></article>").unwrap();

        let parsed = Args {
            location: "/alice".to_string(),
            output_dir: temp.path().to_path_buf(),
            page,
            batches: vec![batch],
        };
        let request = load_request(&parsed).unwrap();
        assert_eq!(request.html, "<html></html>");
        assert_eq!(request.batches, vec!["<article></article>".to_string()]);
        assert_eq!(request.location, "/alice");
    }

    #[test]
    fn missing_page_names_the_file() {
        let parsed = Args {
            location: "/alice".to_string(),
            output_dir: PathBuf::from("out"),
            page: PathBuf::from("/definitely/not/here.html"),
            batches: Vec::new(),
        };
        let err = load_request(&parsed).unwrap_err();
        assert!(err.to_string().contains("here.html"));
    }
}
