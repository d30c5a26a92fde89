//! The management surface of the sorted key-value store, as seen by the
//! provisioner.
//!
//! Everything the provisioner needs from the store goes through three traits:
//! - [`TableOperations`]: existence checks, table creation, iterators, splits
//! - [`Connector`]: hands out the [`TableOperations`] handle and batch writers
//! - [`BatchWriter`]: buffered writes of [`Mutation`]s, released with `close`
//!
//! The store itself lives behind these traits. [`MemoryStore`] is the in-process
//! implementation used by the `d4m` binary and the end-to-end tests.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::combiners::{CombinerKind, LongEncoding};

pub mod memory;

pub use memory::{MemoryStore, StoreSnapshot};

/// Failures reported by the store for a single management call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("table not found: {0}")]
    TableNotFound(String),

    #[error("table already exists: {0}")]
    TableExists(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("iterator conflict on table {table}: {explanation}")]
    IteratorConflict { table: String, explanation: String },

    #[error("timed out: {0}")]
    Timeout(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

pub fn is_valid_table_name(name: &str) -> bool {
    //! Table names are non-empty runs of ASCII letters, digits and `_`.

    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Table administration calls. Each call is a blocking round trip to the store.
pub trait TableOperations: Send + Sync {
    fn exists(&self, table: &str) -> StoreResult<bool>;

    /// Fails with [`StoreError::TableExists`] when the table is already there.
    fn create(&self, table: &str) -> StoreResult<()>;

    fn attach_iterator(&self, table: &str, setting: &IteratorSetting) -> StoreResult<()>;

    fn add_splits(&self, table: &str, splits: &BTreeSet<Vec<u8>>) -> StoreResult<()>;

    fn list_splits(&self, table: &str) -> StoreResult<Vec<Vec<u8>>>;
}

/// A connection to the store.
pub trait Connector: Send + Sync {
    fn table_operations(&self) -> Arc<dyn TableOperations>;

    fn create_batch_writer(
        &self,
        table: &str,
        config: &BatchWriterConfig,
    ) -> StoreResult<Box<dyn BatchWriter>>;
}

/// Client side buffer of pending writes to one table.
pub trait BatchWriter: Send {
    fn add_mutation(&mut self, mutation: Mutation) -> StoreResult<()>;

    /// Flush whatever is still buffered and release the writer.
    fn close(self: Box<Self>) -> StoreResult<()>;
}

/// A single column update inside a [`Mutation`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnUpdate {
    pub family: Vec<u8>,
    pub qualifier: Vec<u8>,
    pub value: Vec<u8>,
}

/// All updates to one row, applied together.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mutation {
    row: Vec<u8>,
    updates: Vec<ColumnUpdate>,
}

impl Mutation {
    pub fn new(row: impl Into<Vec<u8>>) -> Mutation {
        Mutation {
            row: row.into(),
            updates: vec![],
        }
    }

    pub fn put(
        &mut self,
        family: impl Into<Vec<u8>>,
        qualifier: impl Into<Vec<u8>>,
        value: impl Into<Vec<u8>>,
    ) {
        self.updates.push(ColumnUpdate {
            family: family.into(),
            qualifier: qualifier.into(),
            value: value.into(),
        });
    }

    pub fn row(&self) -> &[u8] {
        &self.row
    }

    pub fn updates(&self) -> &[ColumnUpdate] {
        &self.updates
    }

    pub fn size(&self) -> usize {
        //! Approximate number of bytes this mutation holds in a write buffer.

        self.row.len()
            + self
                .updates
                .iter()
                .map(|u| u.family.len() + u.qualifier.len() + u.value.len())
                .sum::<usize>()
    }
}

/// A column an iterator applies to. An empty qualifier covers the whole family.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IteratorColumn {
    pub family: String,
    pub qualifier: String,
}

impl IteratorColumn {
    pub fn new(family: &str, qualifier: &str) -> IteratorColumn {
        IteratorColumn {
            family: family.to_string(),
            qualifier: qualifier.to_string(),
        }
    }

    pub fn covers(&self, family: &[u8], qualifier: &[u8]) -> bool {
        self.family.as_bytes() == family
            && (self.qualifier.is_empty() || self.qualifier.as_bytes() == qualifier)
    }
}

/// A server-side combining iterator to attach to a table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IteratorSetting {
    pub priority: u32,
    pub name: String,
    pub combiner: CombinerKind,
    pub encoding: LongEncoding,
    pub columns: Vec<IteratorColumn>,
}

impl IteratorSetting {
    pub fn summing(priority: u32, encoding: LongEncoding, columns: Vec<IteratorColumn>) -> Self {
        IteratorSetting {
            priority,
            name: "SummingCombiner".to_string(),
            combiner: CombinerKind::Sum,
            encoding,
            columns,
        }
    }

    pub fn covers(&self, family: &[u8], qualifier: &[u8]) -> bool {
        self.columns.iter().any(|c| c.covers(family, qualifier))
    }
}

/// Bounds for a [`BatchWriter`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchWriterConfig {
    pub max_latency: Duration,
    pub max_memory: u64,
    pub max_write_threads: u32,
    pub timeout: Duration,
}

impl Default for BatchWriterConfig {
    fn default() -> Self {
        BatchWriterConfig {
            max_latency: Duration::from_secs(120),
            max_memory: 50 * 1024 * 1024,
            max_write_threads: 3,
            timeout: Duration::MAX,
        }
    }
}
