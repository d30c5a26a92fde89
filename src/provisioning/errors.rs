//! Provisioning error definitions

use std::fmt::Display;

use thiserror::Error;

use crate::store::StoreError;

/// The store call that was running when provisioning failed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProvisionStep {
    CreateTable(String),
    AttachIterator(String),
    WriteConfiguration(String),
}

impl Display for ProvisionStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProvisionStep::CreateTable(table) => write!(f, "creating table [{}]", table),
            ProvisionStep::AttachIterator(table) => {
                write!(f, "attaching iterator to table [{}]", table)
            }
            ProvisionStep::WriteConfiguration(table) => {
                write!(f, "writing configuration to table [{}]", table)
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SplitFailureCause {
    TableNotFound,
    /// Permission or availability problems.
    Rejected,
}

/// Everything that can go wrong while provisioning or splitting D4M tables.
///
/// None of these are retried; they are reported to the operator as is.
#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error(
        "D4M: base name [{base_name}] inconsistent state - {present} of 5 D4M tables exist, missing {missing:?}"
    )]
    InconsistentSchema {
        base_name: String,
        present: usize,
        missing: Vec<String>,
    },

    #[error("error provisioning tables while {step}")]
    Provisioning {
        step: ProvisionStep,
        #[source]
        source: StoreError,
    },

    #[error("{}", split_message(.table, .cause))]
    Split {
        table: String,
        cause: SplitFailureCause,
        #[source]
        source: StoreError,
    },

    #[error("unable to render output")]
    Render(#[from] serde_json::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

fn split_message(table: &str, cause: &SplitFailureCause) -> String {
    match cause {
        SplitFailureCause::TableNotFound => format!("unable to find table [{}]", table),
        SplitFailureCause::Rejected => format!("unable to add splits to table [{}]", table),
    }
}

impl ProvisionError {
    pub fn split(table: &str, source: StoreError) -> ProvisionError {
        let cause = match source {
            StoreError::TableNotFound(_) => SplitFailureCause::TableNotFound,
            _ => SplitFailureCause::Rejected,
        };

        ProvisionError::Split {
            table: table.to_string(),
            cause,
            source,
        }
    }
}

pub type ProvisionResult<T> = Result<T, ProvisionError>;
