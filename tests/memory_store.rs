use std::collections::BTreeSet;
use std::sync::Arc;

use d4m_tables::combiners::LongEncoding;
use d4m_tables::provisioning::schema::content_hash_split_points;
use d4m_tables::provisioning::{ProvisionError, ProvisionOutcome, TableProvisioner};
use d4m_tables::store::{
    BatchWriterConfig, Connector, IteratorColumn, IteratorSetting, MemoryStore, Mutation,
    StoreError, TableOperations,
};

fn _provisioned_store(base_name: &str) -> (MemoryStore, TableProvisioner) {
    let store = MemoryStore::new();
    let mut provisioner = TableProvisioner::from_connector(Arc::new(store.clone()));
    provisioner.provision(Some(base_name)).unwrap();
    (store, provisioner)
}

fn _write(store: &MemoryStore, table: &str, mutations: Vec<Mutation>) {
    let mut writer = store
        .create_batch_writer(table, &BatchWriterConfig::default())
        .unwrap();
    for mutation in mutations {
        writer.add_mutation(mutation).unwrap();
    }
    writer.close().unwrap();
}

fn _value(
    store: &MemoryStore,
    table: &str,
    row: &str,
    family: &str,
    qualifier: &str,
) -> Option<Vec<u8>> {
    store
        .scan(table)
        .unwrap()
        .into_iter()
        .find(|e| {
            e.key.row == row.as_bytes()
                && e.key.family == family.as_bytes()
                && e.key.qualifier == qualifier.as_bytes()
        })
        .map(|e| e.value)
}

fn _put(row: &str, family: &str, qualifier: &str, value: &str) -> Mutation {
    let mut mutation = Mutation::new(row);
    mutation.put(family, qualifier, value);
    mutation
}

#[test]
fn provision_creates_tables_in_order() {
    let (store, _) = _provisioned_store("TEST");

    assert_eq!(
        store.table_names().unwrap(),
        vec!["TTEST", "TTESTTranspose", "TTESTDegree", "TTESTMetadata", "TTESTText"]
    );
}

#[test]
fn provision_seeds_default_delimiters() {
    let (store, _) = _provisioned_store("TEST");

    let entries = store.scan("TTESTMetadata").unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(
        _value(&store, "TTESTMetadata", "property", "field.delimiter", ""),
        Some(b"\t".to_vec())
    );
    assert_eq!(
        _value(&store, "TTESTMetadata", "property", "fact.delimiter", ""),
        Some(b"|".to_vec())
    );
}

#[test]
fn provision_attaches_iterators_only_to_degree_and_metadata() {
    let (store, _) = _provisioned_store("edge");

    assert_eq!(store.iterators("Tedge").unwrap().len(), 0);
    assert_eq!(store.iterators("TedgeTranspose").unwrap().len(), 0);
    assert_eq!(store.iterators("TedgeText").unwrap().len(), 0);
    assert_eq!(store.iterators("TedgeDegree").unwrap().len(), 1);
    assert_eq!(store.iterators("TedgeMetadata").unwrap().len(), 1);
}

#[test]
fn second_provision_leaves_operator_changes_alone() {
    let (store, mut provisioner) = _provisioned_store("edge");
    _write(
        &store,
        "TedgeMetadata",
        vec![_put("property", "field.delimiter", "", ",")],
    );

    let outcome = provisioner.provision(None).unwrap();

    assert!(matches!(outcome, ProvisionOutcome::AlreadyProvisioned(_)));
    assert_eq!(
        _value(&store, "TedgeMetadata", "property", "field.delimiter", ""),
        Some(b",".to_vec())
    );
}

#[test]
fn table_created_out_of_band_makes_schema_inconsistent() {
    let store = MemoryStore::new();
    store.create("TedgeText").unwrap();
    let mut provisioner = TableProvisioner::from_connector(Arc::new(store.clone()));

    let result = provisioner.provision(None);

    assert!(matches!(
        result,
        Err(ProvisionError::InconsistentSchema { present: 1, .. })
    ));
    assert_eq!(store.table_names().unwrap(), vec!["TedgeText"]);
}

#[test]
fn degree_counts_are_summed() {
    let (store, _) = _provisioned_store("edge");

    _write(
        &store,
        "TedgeDegree",
        vec![
            _put("alice", "", "degree", "3"),
            _put("alice", "", "degree", "4"),
            _put("bob", "", "degree", "1"),
        ],
    );

    assert_eq!(
        _value(&store, "TedgeDegree", "alice", "", "degree"),
        Some(b"7".to_vec())
    );
    assert_eq!(
        _value(&store, "TedgeDegree", "bob", "", "degree"),
        Some(b"1".to_vec())
    );
}

#[test]
fn field_counts_are_summed_for_any_qualifier() {
    let (store, _) = _provisioned_store("edge");

    _write(
        &store,
        "TedgeMetadata",
        vec![
            _put("name", "field", "count", "2"),
            _put("name", "field", "count", "5"),
        ],
    );

    assert_eq!(
        _value(&store, "TedgeMetadata", "name", "field", "count"),
        Some(b"7".to_vec())
    );
}

#[test]
fn uncovered_columns_are_overwritten() {
    let (store, _) = _provisioned_store("edge");

    _write(
        &store,
        "Tedge",
        vec![_put("alice", "", "bob", "1"), _put("alice", "", "bob", "1")],
    );
    _write(
        &store,
        "TedgeDegree",
        vec![_put("alice", "", "other", "2"), _put("alice", "", "other", "2")],
    );

    assert_eq!(_value(&store, "Tedge", "alice", "", "bob"), Some(b"1".to_vec()));
    assert_eq!(
        _value(&store, "TedgeDegree", "alice", "", "other"),
        Some(b"2".to_vec())
    );
}

#[test]
fn pre_split_adds_fourteen_splits_to_edge_and_text() {
    let (store, provisioner) = _provisioned_store("edge");

    provisioner.pre_split_for_content_hash_keys().unwrap();

    let expected: Vec<Vec<u8>> = content_hash_split_points().into_iter().collect();
    assert_eq!(store.list_splits("Tedge").unwrap(), expected);
    assert_eq!(store.list_splits("TedgeText").unwrap(), expected);
    assert!(store.list_splits("TedgeTranspose").unwrap().is_empty());
}

#[test]
fn pre_split_before_provision_reports_missing_table() {
    let store = MemoryStore::new();
    let provisioner = TableProvisioner::from_connector(Arc::new(store));

    let result = provisioner.pre_split_for_content_hash_keys();

    match result {
        Err(error @ ProvisionError::Split { .. }) => {
            assert_eq!(error.to_string(), "unable to find table [Tedge]")
        }
        other => panic!("expected split failure, got {:?}", other),
    }
}

#[test]
fn create_twice_fails_with_table_exists() {
    let store = MemoryStore::new();
    store.create("Tedge").unwrap();

    assert_eq!(
        store.create("Tedge"),
        Err(StoreError::TableExists("Tedge".to_string()))
    );
    assert!(matches!(
        store.create("T edge"),
        Err(StoreError::InvalidArgument(_))
    ));
}

#[test]
fn attach_iterator_conflicts_on_priority() {
    let store = MemoryStore::new();
    store.create("Tedge").unwrap();
    let setting =
        IteratorSetting::summing(7, LongEncoding::String, vec![IteratorColumn::new("", "")]);
    store.attach_iterator("Tedge", &setting).unwrap();

    let mut other = setting.clone();
    other.name = "OtherCombiner".to_string();

    assert!(matches!(
        store.attach_iterator("Tedge", &other),
        Err(StoreError::IteratorConflict { .. })
    ));
}

#[test]
fn operations_on_missing_table_fail() {
    let store = MemoryStore::new();

    assert!(!store.exists("Tnothing").unwrap());
    assert!(matches!(
        store.add_splits("Tnothing", &BTreeSet::new()),
        Err(StoreError::TableNotFound(_))
    ));
    assert!(matches!(
        store.create_batch_writer("Tnothing", &BatchWriterConfig::default()),
        Err(StoreError::TableNotFound(_))
    ));
}

#[test]
fn writer_flushes_when_memory_bound_is_exceeded() {
    let store = MemoryStore::new();
    store.create("Tedge").unwrap();
    let config = BatchWriterConfig {
        max_memory: 8,
        ..BatchWriterConfig::default()
    };

    let mut writer = store.create_batch_writer("Tedge", &config).unwrap();
    writer.add_mutation(_put("a", "", "b", "1")).unwrap();
    assert!(store.scan("Tedge").unwrap().is_empty());

    writer.add_mutation(_put("row-long", "family", "q", "1")).unwrap();
    assert_eq!(store.scan("Tedge").unwrap().len(), 2);
    writer.close().unwrap();
}

#[test]
fn empty_mutation_is_rejected() {
    let store = MemoryStore::new();
    store.create("Tedge").unwrap();

    let mut writer = store
        .create_batch_writer("Tedge", &BatchWriterConfig::default())
        .unwrap();

    assert!(matches!(
        writer.add_mutation(Mutation::new("row")),
        Err(StoreError::InvalidArgument(_))
    ));
}

#[test]
fn state_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    let (store, provisioner) = _provisioned_store("TEST");
    provisioner.pre_split_for_content_hash_keys().unwrap();

    store.save(&path).unwrap();
    let loaded = MemoryStore::load(&path).unwrap();

    assert_eq!(loaded.snapshot().unwrap(), store.snapshot().unwrap());

    let mut again = TableProvisioner::from_connector(Arc::new(loaded));
    assert!(matches!(
        again.provision(Some("TEST")).unwrap(),
        ProvisionOutcome::AlreadyProvisioned(_)
    ));
}

#[test]
fn missing_state_file_loads_empty_store() {
    let dir = tempfile::tempdir().unwrap();

    let store = MemoryStore::load(&dir.path().join("absent.json")).unwrap();

    assert!(store.table_names().unwrap().is_empty());
}

#[test]
fn corrupt_state_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, "{ not json").unwrap();

    assert!(matches!(
        MemoryStore::load(&path),
        Err(StoreError::InvalidArgument(_))
    ));
}
