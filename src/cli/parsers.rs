//! The place where the command line parser is defined.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;

#[derive(Parser)]
#[command(name = "d4m")]
#[command(about = "Provision the five D4M tables on a sorted key-value store", long_about = None)]
#[command(version)]
pub struct CliParser {
    /// JSON file the store is loaded from and saved back to.
    #[arg(long, global = true)]
    pub state: Option<PathBuf>,

    #[arg(long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand)]
pub enum CliCommand {
    /// Create the five tables unless they all exist already.
    Provision {
        #[arg(long)]
        base_name: Option<String>,

        /// Also pre-split the edge and text tables for hex digest rows.
        #[arg(long)]
        presplit: bool,
    },

    /// Pre-split the edge and text tables for hex digest rows.
    Presplit {
        #[arg(long)]
        base_name: Option<String>,
    },

    /// Print the five table names for a base name.
    Names {
        #[arg(long)]
        base_name: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Describe the tables of a base name as they are in the store.
    Show {
        #[arg(long)]
        base_name: Option<String>,
    },
}

impl CliCommand {
    pub fn base_name(&self) -> Option<&str> {
        match self {
            CliCommand::Provision { base_name, .. }
            | CliCommand::Presplit { base_name }
            | CliCommand::Names { base_name, .. }
            | CliCommand::Show { base_name } => base_name.as_deref(),
        }
    }

    pub fn mutates_store(&self) -> bool {
        matches!(self, CliCommand::Provision { .. } | CliCommand::Presplit { .. })
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}
