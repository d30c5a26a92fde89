//! An in-process sorted key-value store that speaks the management contract
//! of [`super::TableOperations`] and [`super::Connector`].
//!
//! Tables live in an [`IndexMap`] registry so they list in creation order. Each
//! table keeps its entries sorted by `(row, family, qualifier)`, its split
//! points and its attached iterators. The whole store can be written out as a
//! JSON [`StoreSnapshot`] and read back, which is how the `d4m` binary keeps
//! state between invocations.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::combiners;

use super::{
    BatchWriter, BatchWriterConfig, Connector, IteratorSetting, Mutation, StoreError, StoreResult,
    TableOperations, is_valid_table_name,
};

/// Sort key of a stored cell.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Key {
    pub row: Vec<u8>,
    pub family: Vec<u8>,
    pub qualifier: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub key: Key,
    pub value: Vec<u8>,
}

#[derive(Default)]
struct MemoryTable {
    entries: BTreeMap<Key, Vec<u8>>,
    splits: BTreeSet<Vec<u8>>,
    iterators: Vec<IteratorSetting>,
}

impl MemoryTable {
    fn apply(&mut self, mutation: &Mutation) {
        //! Write every update of the mutation, combining with the stored value
        //! when an attached iterator covers the column.

        for update in mutation.updates() {
            let key = Key {
                row: mutation.row().to_vec(),
                family: update.family.clone(),
                qualifier: update.qualifier.clone(),
            };

            let combiner = self
                .iterators
                .iter()
                .find(|setting| setting.covers(&key.family, &key.qualifier));

            let value = match (combiner, self.entries.get(&key)) {
                (Some(setting), Some(existing)) => {
                    combiners::run(setting.combiner, setting.encoding, existing, &update.value)
                }
                _ => update.value.clone(),
            };

            self.entries.insert(key, value);
        }
    }
}

/// A serializable copy of one table.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSnapshot {
    pub entries: Vec<Entry>,
    pub splits: Vec<Vec<u8>>,
    pub iterators: Vec<IteratorSetting>,
}

/// A serializable copy of the whole store.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub tables: IndexMap<String, TableSnapshot>,
}

/// The in-memory store. Clones share the same tables.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<IndexMap<String, MemoryTable>>>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    fn _read(&self) -> StoreResult<RwLockReadGuard<'_, IndexMap<String, MemoryTable>>> {
        self.tables
            .read()
            .map_err(|_| StoreError::Unavailable("table registry lock poisoned".to_string()))
    }

    fn _write(&self) -> StoreResult<RwLockWriteGuard<'_, IndexMap<String, MemoryTable>>> {
        self.tables
            .write()
            .map_err(|_| StoreError::Unavailable("table registry lock poisoned".to_string()))
    }

    fn _with_table<T>(&self, table: &str, f: impl FnOnce(&MemoryTable) -> T) -> StoreResult<T> {
        let tables = self._read()?;
        let found = tables
            .get(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;
        Ok(f(found))
    }

    fn _with_table_mut<T>(
        &self,
        table: &str,
        f: impl FnOnce(&mut MemoryTable) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let mut tables = self._write()?;
        let found = tables
            .get_mut(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;
        f(found)
    }

    pub fn table_names(&self) -> StoreResult<Vec<String>> {
        //! Names of all tables, in creation order.

        Ok(self._read()?.keys().cloned().collect())
    }

    pub fn scan(&self, table: &str) -> StoreResult<Vec<Entry>> {
        //! Returns a copy of every entry of the table in key order.

        self._with_table(table, |t| {
            t.entries
                .iter()
                .map(|(key, value)| Entry {
                    key: key.clone(),
                    value: value.clone(),
                })
                .collect()
        })
    }

    pub fn iterators(&self, table: &str) -> StoreResult<Vec<IteratorSetting>> {
        self._with_table(table, |t| t.iterators.clone())
    }

    pub fn snapshot(&self) -> StoreResult<StoreSnapshot> {
        let tables = self._read()?;
        let tables = tables
            .iter()
            .map(|(name, table)| {
                let snapshot = TableSnapshot {
                    entries: table
                        .entries
                        .iter()
                        .map(|(key, value)| Entry {
                            key: key.clone(),
                            value: value.clone(),
                        })
                        .collect(),
                    splits: table.splits.iter().cloned().collect(),
                    iterators: table.iterators.clone(),
                };
                (name.clone(), snapshot)
            })
            .collect();

        Ok(StoreSnapshot { tables })
    }

    pub fn restore(snapshot: StoreSnapshot) -> MemoryStore {
        let tables = snapshot
            .tables
            .into_iter()
            .map(|(name, table)| {
                let restored = MemoryTable {
                    entries: table
                        .entries
                        .into_iter()
                        .map(|entry| (entry.key, entry.value))
                        .collect(),
                    splits: table.splits.into_iter().collect(),
                    iterators: table.iterators,
                };
                (name, restored)
            })
            .collect();

        MemoryStore {
            tables: Arc::new(RwLock::new(tables)),
        }
    }

    pub fn load(path: &Path) -> StoreResult<MemoryStore> {
        //! Read a store back from a JSON snapshot. A missing file gives an
        //! empty store.

        if !path.exists() {
            log::debug!("no state file at {}; starting empty", path.display());
            return Ok(MemoryStore::new());
        }

        let contents = fs::read_to_string(path).map_err(|e| {
            StoreError::Unavailable(format!("cannot read {}: {}", path.display(), e))
        })?;
        let snapshot: StoreSnapshot = serde_json::from_str(&contents).map_err(|e| {
            StoreError::InvalidArgument(format!("corrupt state file {}: {}", path.display(), e))
        })?;

        Ok(MemoryStore::restore(snapshot))
    }

    pub fn save(&self, path: &Path) -> StoreResult<()> {
        let snapshot = self.snapshot()?;
        let contents = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| StoreError::InvalidArgument(e.to_string()))?;

        fs::write(path, contents).map_err(|e| {
            StoreError::Unavailable(format!("cannot write {}: {}", path.display(), e))
        })
    }

    fn _apply(&self, table: &str, mutations: &[Mutation]) -> StoreResult<()> {
        self._with_table_mut(table, |t| {
            mutations.iter().for_each(|m| t.apply(m));
            Ok(())
        })
    }
}

impl TableOperations for MemoryStore {
    fn exists(&self, table: &str) -> StoreResult<bool> {
        Ok(self._read()?.contains_key(table))
    }

    fn create(&self, table: &str) -> StoreResult<()> {
        if !is_valid_table_name(table) {
            return Err(StoreError::InvalidArgument(format!(
                "invalid table name '{}'",
                table
            )));
        }

        let mut tables = self._write()?;
        if tables.contains_key(table) {
            return Err(StoreError::TableExists(table.to_string()));
        }

        tables.insert(table.to_string(), MemoryTable::default());
        Ok(())
    }

    fn attach_iterator(&self, table: &str, setting: &IteratorSetting) -> StoreResult<()> {
        self._with_table_mut(table, |t| {
            if let Some(other) = t
                .iterators
                .iter()
                .find(|i| i.name == setting.name || i.priority == setting.priority)
            {
                return Err(StoreError::IteratorConflict {
                    table: table.to_string(),
                    explanation: format!(
                        "'{}' already attached at priority {}",
                        other.name, other.priority
                    ),
                });
            }

            t.iterators.push(setting.clone());
            t.iterators.sort_by_key(|i| i.priority);
            Ok(())
        })
    }

    fn add_splits(&self, table: &str, splits: &BTreeSet<Vec<u8>>) -> StoreResult<()> {
        self._with_table_mut(table, |t| {
            t.splits.extend(splits.iter().cloned());
            Ok(())
        })
    }

    fn list_splits(&self, table: &str) -> StoreResult<Vec<Vec<u8>>> {
        self._with_table(table, |t| t.splits.iter().cloned().collect())
    }
}

impl Connector for MemoryStore {
    fn table_operations(&self) -> Arc<dyn TableOperations> {
        Arc::new(self.clone())
    }

    fn create_batch_writer(
        &self,
        table: &str,
        config: &BatchWriterConfig,
    ) -> StoreResult<Box<dyn BatchWriter>> {
        if !self.exists(table)? {
            return Err(StoreError::TableNotFound(table.to_string()));
        }

        Ok(Box::new(MemoryBatchWriter {
            store: self.clone(),
            table: table.to_string(),
            max_memory: config.max_memory,
            buffer: vec![],
            buffered: 0,
        }))
    }
}

/// Buffers mutations and applies them once `max_memory` is exceeded or the
/// writer is closed.
struct MemoryBatchWriter {
    store: MemoryStore,
    table: String,
    max_memory: u64,
    buffer: Vec<Mutation>,
    buffered: u64,
}

impl MemoryBatchWriter {
    fn _flush(&mut self) -> StoreResult<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        log::debug!(
            "flushing {} mutation(s) ({} bytes) to {}",
            self.buffer.len(),
            self.buffered,
            self.table
        );
        self.store._apply(&self.table, &self.buffer)?;
        self.buffer.clear();
        self.buffered = 0;
        Ok(())
    }
}

impl BatchWriter for MemoryBatchWriter {
    fn add_mutation(&mut self, mutation: Mutation) -> StoreResult<()> {
        if mutation.updates().is_empty() {
            return Err(StoreError::InvalidArgument(
                "mutation has no column updates".to_string(),
            ));
        }

        self.buffered += mutation.size() as u64;
        self.buffer.push(mutation);

        if self.buffered > self.max_memory {
            self._flush()?;
        }
        Ok(())
    }

    fn close(mut self: Box<Self>) -> StoreResult<()> {
        self._flush()
    }
}
