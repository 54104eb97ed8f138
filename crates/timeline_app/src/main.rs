mod app;
mod commands;
mod effects;

use std::process::ExitCode;

use harvest_logging::{harvest_error, LogDestination};

fn main() -> ExitCode {
    harvest_logging::initialize(LogDestination::Both, log::LevelFilter::Info);

    let Some(args) = app::Args::parse(std::env::args().skip(1)) else {
        eprintln!("{}", app::USAGE);
        return ExitCode::from(2);
    };

    match app::run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            harvest_error!("{err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
