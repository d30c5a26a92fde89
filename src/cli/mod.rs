use std::path::PathBuf;

use crate::{
    cli::commands::CommandExecutor,
    config::Settings,
    provisioning::ProvisionResult,
    store::MemoryStore,
};

mod colors;
mod commands;
pub mod messages;
pub mod parsers;

pub use parsers::{CliCommand, CliParser, LogLevel};

pub fn run(parser: CliParser, settings: Settings) -> ProvisionResult<()> {
    //! Load the store, run the command, and save the store again if the
    //! command may have changed it.

    let state_file: PathBuf = parser.state.unwrap_or(settings.state_file);
    let store = MemoryStore::load(&state_file)?;
    let mutates = parser.command.mutates_store();

    let executor = CommandExecutor::new(parser.command, &store, &settings.base_name);
    let result = executor.execute();

    if mutates {
        // Tables created before a failure are kept, as they would be in a real store.
        match (store.save(&state_file), &result) {
            (Ok(()), _) => log::debug!("saved store to {}", state_file.display()),
            (Err(e), Err(_)) => log::warn!("could not save store after failed command: {}", e),
            (Err(e), Ok(())) => return Err(e.into()),
        }
    }

    result
}
