//! Settings of the `d4m` binary.
//!
//! Values come from the process environment, after an optional `.env` file
//! has been loaded into it:
//!
//! - `D4M_BASE_NAME`: root of the table names (default `edge`)
//! - `D4M_LOG_LEVEL`: `off`, `error`, `warn`, `info`, `debug` or `trace` (default `info`)
//! - `D4M_STATE_FILE`: JSON file holding the in-memory store (default `d4m-state.json`)
//!
//! Command line flags take precedence over all of these.

use std::path::PathBuf;
use std::str::FromStr;

use log::LevelFilter;

use crate::provisioning::{DEFAULT_BASE_NAME, ProvisionError, ProvisionResult};

pub const BASE_NAME_VAR: &str = "D4M_BASE_NAME";
pub const LOG_LEVEL_VAR: &str = "D4M_LOG_LEVEL";
pub const STATE_FILE_VAR: &str = "D4M_STATE_FILE";

const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Info;
const DEFAULT_STATE_FILE: &str = "d4m-state.json";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub base_name: String,
    pub log_level: LevelFilter,
    pub state_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            base_name: DEFAULT_BASE_NAME.to_string(),
            log_level: DEFAULT_LOG_LEVEL,
            state_file: PathBuf::from(DEFAULT_STATE_FILE),
        }
    }
}

impl Settings {
    pub fn from_env() -> ProvisionResult<Settings> {
        //! Load `.env` if there is one, then read the settings from the
        //! environment.

        // Runs before the logger is installed, so there is nothing to report to.
        let _ = dotenvy::dotenv();

        Settings::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> ProvisionResult<Settings>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Settings::default();

        let log_level = match lookup(LOG_LEVEL_VAR) {
            Some(level) => LevelFilter::from_str(level.trim()).map_err(|_| {
                ProvisionError::Configuration(format!(
                    "{} has an unknown log level '{}'",
                    LOG_LEVEL_VAR, level
                ))
            })?,
            None => defaults.log_level,
        };

        Ok(Settings {
            base_name: lookup(BASE_NAME_VAR).unwrap_or(defaults.base_name),
            log_level,
            state_file: lookup(STATE_FILE_VAR)
                .map(PathBuf::from)
                .unwrap_or(defaults.state_file),
        })
    }
}
