use std::collections::BTreeSet;
use std::sync::Arc;

use crate::provisioning::errors::{ProvisionError, ProvisionResult, ProvisionStep};
use crate::provisioning::names::{BaseName, TableSet};
use crate::provisioning::schema;
use crate::store::{BatchWriter, Connector, Mutation, StoreResult, TableOperations};

/// The result of a successful [`TableProvisioner::provision`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProvisionOutcome {
    /// None of the tables existed; all five were created and configured.
    Created(TableSet),
    /// All five tables were already there; nothing was touched.
    AlreadyProvisioned(TableSet),
}

impl ProvisionOutcome {
    pub fn tables(&self) -> &TableSet {
        match self {
            ProvisionOutcome::Created(tables) => tables,
            ProvisionOutcome::AlreadyProvisioned(tables) => tables,
        }
    }
}

/// Creates and names the five tables of a D4M schema.
///
/// The provisioner is handed its store handles up front. A handle that was
/// never given is only reported when an operation needs it, and always before
/// any call reaches the store.
///
/// Apart from the base name, which configures later calls, it holds no state:
/// every call looks at the store afresh.
///
/// # Issues
/// - Creation is not atomic. If the store fails half way through, the tables
/// created so far stay behind and the next [`TableProvisioner::provision`]
/// reports an inconsistent schema.
/// - Two provisioners racing on the same base name both see zero tables; the
/// slower one fails on `create` with a table-exists error.
pub struct TableProvisioner {
    base_name: BaseName,
    connector: Option<Arc<dyn Connector>>,
    table_operations: Option<Arc<dyn TableOperations>>,
}

impl Default for TableProvisioner {
    fn default() -> Self {
        TableProvisioner::new()
    }
}

impl TableProvisioner {
    pub fn new() -> TableProvisioner {
        //! A provisioner for the default base name with no store handles.

        TableProvisioner {
            base_name: BaseName::default(),
            connector: None,
            table_operations: None,
        }
    }

    pub fn from_connector(connector: Arc<dyn Connector>) -> TableProvisioner {
        //! Takes the table operations handle from the connector itself.

        let table_operations = connector.table_operations();
        TableProvisioner::new()
            .with_connector(connector)
            .with_table_operations(table_operations)
    }

    pub fn with_connector(mut self, connector: Arc<dyn Connector>) -> TableProvisioner {
        self.connector = Some(connector);
        self
    }

    pub fn with_table_operations(
        mut self,
        table_operations: Arc<dyn TableOperations>,
    ) -> TableProvisioner {
        self.table_operations = Some(table_operations);
        self
    }

    pub fn with_base_name(mut self, base_name: &str) -> ProvisionResult<TableProvisioner> {
        self.set_base_name(base_name)?;
        Ok(self)
    }

    pub fn set_base_name(&mut self, base_name: &str) -> ProvisionResult<()> {
        self.base_name = BaseName::new(base_name)?;
        Ok(())
    }

    pub fn base_name(&self) -> &BaseName {
        &self.base_name
    }

    pub fn table_set(&self) -> TableSet {
        TableSet::new(&self.base_name)
    }

    pub fn edge_table(&self) -> String {
        self.table_set().edge
    }

    pub fn transpose_table(&self) -> String {
        self.table_set().transpose
    }

    pub fn degree_table(&self) -> String {
        self.table_set().degree
    }

    pub fn metadata_table(&self) -> String {
        self.table_set().metadata
    }

    pub fn text_table(&self) -> String {
        self.table_set().text
    }

    fn _connector(&self) -> ProvisionResult<&Arc<dyn Connector>> {
        self.connector
            .as_ref()
            .ok_or_else(|| ProvisionError::Configuration("connector must not be null".to_string()))
    }

    fn _table_operations(&self) -> ProvisionResult<&Arc<dyn TableOperations>> {
        self.table_operations.as_ref().ok_or_else(|| {
            ProvisionError::Configuration("table operations must not be null".to_string())
        })
    }

    pub fn provision(&mut self, base_name: Option<&str>) -> ProvisionResult<ProvisionOutcome> {
        //! Make sure the five D4M tables exist for the base name.
        //!
        //! - When `base_name` is given it replaces the stored one first.
        //! - If all five tables exist they are assumed to be correct and nothing
        //! else happens.
        //! - If only some of them exist the schema is inconsistent and has to be
        //! fixed by hand; nothing is created.
        //! - If none exist, all five are created, the summing iterators are
        //! attached to the degree and metadata tables, and the default
        //! configuration record is written to the metadata table.

        if let Some(name) = base_name {
            self.set_base_name(name)?;
        }

        let connector = self._connector()?;
        let table_operations = self._table_operations()?;
        let tables = self.table_set();

        let mut missing = vec![];
        for table in tables.names() {
            if !table_operations.exists(table)? {
                missing.push(table.to_string());
            }
        }
        let present = tables.names().len() - missing.len();

        log::debug!(
            "base name [{}]: {} of {} D4M tables present",
            self.base_name,
            present,
            tables.names().len()
        );

        if present == tables.names().len() {
            log::info!(
                "D4M tables for base name [{}] already exist",
                self.base_name
            );
            return Ok(ProvisionOutcome::AlreadyProvisioned(tables));
        }

        if present > 0 {
            log::error!(
                "D4M tables for base name [{}] are inconsistent; missing {:?}",
                self.base_name,
                missing
            );
            return Err(ProvisionError::InconsistentSchema {
                base_name: self.base_name.to_string(),
                present,
                missing,
            });
        }

        Self::_create_tables(connector.as_ref(), table_operations.as_ref(), &tables)?;

        log::info!(
            "created D4M tables for base name [{}]: {}",
            self.base_name,
            tables.names().join(", ")
        );
        Ok(ProvisionOutcome::Created(tables))
    }

    fn _create_tables(
        connector: &dyn Connector,
        table_operations: &dyn TableOperations,
        tables: &TableSet,
    ) -> ProvisionResult<()> {
        for table in tables.names() {
            log::info!("creating table {}", table);
            table_operations
                .create(table)
                .map_err(|source| ProvisionError::Provisioning {
                    step: ProvisionStep::CreateTable(table.to_string()),
                    source,
                })?;
        }

        for (table, setting) in [
            (&tables.degree, schema::degree_iterator()),
            (&tables.metadata, schema::field_iterator()),
        ] {
            log::info!(
                "attaching {} at priority {} to {}",
                setting.name,
                setting.priority,
                table
            );
            table_operations
                .attach_iterator(table, &setting)
                .map_err(|source| ProvisionError::Provisioning {
                    step: ProvisionStep::AttachIterator(table.to_string()),
                    source,
                })?;
        }

        Self::_write_configuration(connector, &tables.metadata).map_err(|source| {
            ProvisionError::Provisioning {
                step: ProvisionStep::WriteConfiguration(tables.metadata.clone()),
                source,
            }
        })
    }

    fn _write_configuration(connector: &dyn Connector, table: &str) -> StoreResult<()> {
        //! Seed the default delimiters through a single bounded batch write.

        let writer = connector.create_batch_writer(table, &schema::bootstrap_writer_config())?;
        let mut writer = ScopedWriter::new(table, writer);
        writer.add_mutation(schema::configuration_record())?;
        writer.close()
    }

    pub fn pre_split_for_content_hash_keys(&self) -> ProvisionResult<()> {
        //! Pre-split the edge and text tables for rows keyed by hex digests.
        //!
        //! Each table gets its own split call; the first failure is returned
        //! naming its table.

        self._table_operations()?;
        let splits = schema::content_hash_split_points();
        let tables = self.table_set();

        for table in [&tables.edge, &tables.text] {
            self.add_splits(table, &splits)?;
            log::info!("added {} split points to {}", splits.len(), table);
        }

        Ok(())
    }

    pub fn add_splits(&self, table: &str, splits: &BTreeSet<Vec<u8>>) -> ProvisionResult<()> {
        self._table_operations()?
            .add_splits(table, splits)
            .map_err(|source| ProvisionError::split(table, source))
    }
}

/// Holds a [`BatchWriter`] and closes it exactly once: through
/// [`ScopedWriter::close`] on success, or on drop when an error cut the
/// write short.
struct ScopedWriter {
    table: String,
    writer: Option<Box<dyn BatchWriter>>,
}

impl ScopedWriter {
    fn new(table: &str, writer: Box<dyn BatchWriter>) -> ScopedWriter {
        ScopedWriter {
            table: table.to_string(),
            writer: Some(writer),
        }
    }

    fn add_mutation(&mut self, mutation: Mutation) -> StoreResult<()> {
        match self.writer.as_mut() {
            Some(writer) => writer.add_mutation(mutation),
            None => Ok(()),
        }
    }

    fn close(mut self) -> StoreResult<()> {
        match self.writer.take() {
            Some(writer) => writer.close(),
            None => Ok(()),
        }
    }
}

impl Drop for ScopedWriter {
    fn drop(&mut self) {
        if let Some(writer) = self.writer.take() {
            if let Err(e) = writer.close() {
                log::warn!("closing batch writer for {} failed: {}", self.table, e);
            }
        }
    }
}
