//! This module is where all the commands are run.
//!
//! D4M command line syntax:
//!
//! - d4m provision [--base-name B] [--presplit] | create the five tables
//! - d4m presplit [--base-name B]               | pre-split edge and text tables
//! - d4m names [--base-name B] [--json]         | print the table names
//! - d4m show [--base-name B]                   | describe the tables in the store
//!
//! Every command works on a [`MemoryStore`] handed in by the caller.

use std::sync::Arc;

use colored::Colorize;

use crate::cli::colors::{D4M_BLUE, MISSING_GREY};
use crate::cli::messages::{highlight_argument, printable_bytes, system_message};
use crate::cli::parsers::CliCommand;
use crate::provisioning::{ProvisionOutcome, ProvisionResult, TableProvisioner};
use crate::store::{MemoryStore, TableOperations};

/// Runs one parsed [`CliCommand`] against a store.
pub struct CommandExecutor {
    command: CliCommand,
    store: MemoryStore,
    base_name: String,
}

impl CommandExecutor {
    pub fn new(command: CliCommand, store: &MemoryStore, default_base_name: &str) -> Self {
        //! The `--base-name` flag of the command wins over `default_base_name`.

        let base_name = command
            .base_name()
            .unwrap_or(default_base_name)
            .to_string();

        CommandExecutor {
            command,
            store: store.clone(),
            base_name,
        }
    }

    fn _provisioner(&self) -> ProvisionResult<TableProvisioner> {
        TableProvisioner::from_connector(Arc::new(self.store.clone()))
            .with_base_name(&self.base_name)
    }

    pub fn execute(&self) -> ProvisionResult<()> {
        match &self.command {
            CliCommand::Provision { presplit, .. } => self.provision(*presplit),
            CliCommand::Presplit { .. } => self.presplit(),
            CliCommand::Names { json, .. } => self.names(*json),
            CliCommand::Show { .. } => self.show(),
        }
    }

    fn provision(&self, presplit: bool) -> ProvisionResult<()> {
        let mut provisioner = self._provisioner()?;

        match provisioner.provision(None)? {
            ProvisionOutcome::Created(tables) => println!(
                "{}",
                system_message(
                    "d4m",
                    format!(
                        "Created {}.",
                        highlight_argument(&tables.names().join(", "))
                    )
                )
            ),
            ProvisionOutcome::AlreadyProvisioned(_) => println!(
                "{}",
                system_message(
                    "d4m",
                    format!(
                        "All tables for base name '{}' already exist; nothing to do.",
                        highlight_argument(provisioner.base_name().as_str())
                    )
                )
            ),
        }

        if presplit {
            self.presplit()?;
        }
        Ok(())
    }

    fn presplit(&self) -> ProvisionResult<()> {
        let provisioner = self._provisioner()?;
        provisioner.pre_split_for_content_hash_keys()?;

        println!(
            "{}",
            system_message(
                "d4m",
                format!(
                    "Pre-split {} and {} for content hash row keys.",
                    highlight_argument(&provisioner.edge_table()),
                    highlight_argument(&provisioner.text_table())
                )
            )
        );
        Ok(())
    }

    fn names(&self, json: bool) -> ProvisionResult<()> {
        let tables = self._provisioner()?.table_set();

        if json {
            println!("{}", serde_json::to_string_pretty(&tables)?);
        } else {
            for (role, name) in ["edge", "transpose", "degree", "metadata", "text"]
                .iter()
                .zip(tables.names())
            {
                println!("{:10} {}", role.color(D4M_BLUE), name);
            }
        }
        Ok(())
    }

    fn show(&self) -> ProvisionResult<()> {
        //! Lists every table of the set with its split points and iterators.
        //! The metadata table also lists its entries.

        let tables = self._provisioner()?.table_set();

        for name in tables.names() {
            if !self.store.exists(name)? {
                println!("{}", format!("{} (missing)", name).color(MISSING_GREY));
                continue;
            }

            println!("{}", highlight_argument(name).bold());

            let splits: Vec<String> = self
                .store
                .list_splits(name)?
                .iter()
                .map(|s| printable_bytes(s))
                .collect();
            println!("  splits    : {}", splits.join(" "));

            for setting in self.store.iterators(name)? {
                let columns: Vec<String> = setting
                    .columns
                    .iter()
                    .map(|c| format!("{}:{}", c.family, c.qualifier))
                    .collect();
                println!(
                    "  iterator  : {} ({}, {}) priority {} on {}",
                    setting.name,
                    setting.combiner,
                    setting.encoding,
                    setting.priority,
                    columns.join(", ")
                );
            }

            if name == tables.metadata {
                for entry in self.store.scan(name)? {
                    println!(
                        "  entry     : {} {}:{} = {}",
                        printable_bytes(&entry.key.row),
                        printable_bytes(&entry.key.family),
                        printable_bytes(&entry.key.qualifier),
                        printable_bytes(&entry.value)
                    );
                }
            }
        }
        Ok(())
    }
}
