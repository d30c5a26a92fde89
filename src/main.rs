use std::process::ExitCode;

use clap::Parser;
use d4m_tables::cli::{self, CliParser, messages::error_report};
use d4m_tables::config::Settings;
use d4m_tables::logging;
use log::LevelFilter;

fn main() -> ExitCode {
    let parser = CliParser::parse();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(error) => {
            eprintln!("{}", error_report(&error));
            return ExitCode::FAILURE;
        }
    };

    let level = parser
        .log_level
        .map(LevelFilter::from)
        .unwrap_or(settings.log_level);
    if let Err(error) = logging::init(level) {
        eprintln!("logging disabled: {}", error);
    }

    match cli::run(parser, settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{}", error_report(&error));
            ExitCode::FAILURE
        }
    }
}
