//! A store that records every management call and can be told which tables
//! exist and which call should fail.

#![allow(dead_code)]

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::{Arc, Mutex};

use d4m_tables::store::{
    BatchWriter, BatchWriterConfig, Connector, IteratorSetting, Mutation, StoreError, StoreResult,
    TableOperations,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    Exists(String),
    Create(String),
    AttachIterator(String, IteratorSetting),
    AddSplits(String, BTreeSet<Vec<u8>>),
    ListSplits(String),
    CreateBatchWriter(String, BatchWriterConfig),
    AddMutation(String, Mutation),
    Close(String),
}

impl Call {
    pub fn is_exists(&self) -> bool {
        matches!(self, Call::Exists(_))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Op {
    Exists,
    Create,
    AttachIterator,
    AddSplits,
    CreateBatchWriter,
    AddMutation,
    Close,
}

#[derive(Default)]
struct State {
    existing: HashSet<String>,
    failures: HashMap<(Op, String), StoreError>,
    calls: Vec<Call>,
}

#[derive(Clone, Default)]
pub struct RecordingStore {
    state: Arc<Mutex<State>>,
}

impl RecordingStore {
    pub fn new() -> RecordingStore {
        RecordingStore::default()
    }

    pub fn with_existing(tables: &[&str]) -> RecordingStore {
        let store = RecordingStore::new();
        store
            .state
            .lock()
            .unwrap()
            .existing
            .extend(tables.iter().map(|t| t.to_string()));
        store
    }

    pub fn fail_on(&self, op: Op, table: &str, error: StoreError) {
        self.state
            .lock()
            .unwrap()
            .failures
            .insert((op, table.to_string()), error);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub fn count<F: Fn(&Call) -> bool>(&self, filter: F) -> usize {
        self.calls().iter().filter(|c| filter(*c)).count()
    }

    fn _record(&self, op: Op, table: &str, call: Call) -> StoreResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);

        match state.failures.get(&(op, table.to_string())) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

impl TableOperations for RecordingStore {
    fn exists(&self, table: &str) -> StoreResult<bool> {
        self._record(Op::Exists, table, Call::Exists(table.to_string()))?;
        Ok(self.state.lock().unwrap().existing.contains(table))
    }

    fn create(&self, table: &str) -> StoreResult<()> {
        self._record(Op::Create, table, Call::Create(table.to_string()))?;
        self.state.lock().unwrap().existing.insert(table.to_string());
        Ok(())
    }

    fn attach_iterator(&self, table: &str, setting: &IteratorSetting) -> StoreResult<()> {
        self._record(
            Op::AttachIterator,
            table,
            Call::AttachIterator(table.to_string(), setting.clone()),
        )
    }

    fn add_splits(&self, table: &str, splits: &BTreeSet<Vec<u8>>) -> StoreResult<()> {
        self._record(
            Op::AddSplits,
            table,
            Call::AddSplits(table.to_string(), splits.clone()),
        )
    }

    fn list_splits(&self, table: &str) -> StoreResult<Vec<Vec<u8>>> {
        self.state
            .lock()
            .unwrap()
            .calls
            .push(Call::ListSplits(table.to_string()));
        Ok(vec![])
    }
}

impl Connector for RecordingStore {
    fn table_operations(&self) -> Arc<dyn TableOperations> {
        Arc::new(self.clone())
    }

    fn create_batch_writer(
        &self,
        table: &str,
        config: &BatchWriterConfig,
    ) -> StoreResult<Box<dyn BatchWriter>> {
        self._record(
            Op::CreateBatchWriter,
            table,
            Call::CreateBatchWriter(table.to_string(), config.clone()),
        )?;

        Ok(Box::new(RecordingWriter {
            table: table.to_string(),
            store: self.clone(),
        }))
    }
}

struct RecordingWriter {
    table: String,
    store: RecordingStore,
}

impl BatchWriter for RecordingWriter {
    fn add_mutation(&mut self, mutation: Mutation) -> StoreResult<()> {
        self.store._record(
            Op::AddMutation,
            &self.table,
            Call::AddMutation(self.table.clone(), mutation),
        )
    }

    fn close(self: Box<Self>) -> StoreResult<()> {
        self.store
            ._record(Op::Close, &self.table, Call::Close(self.table.clone()))
    }
}
