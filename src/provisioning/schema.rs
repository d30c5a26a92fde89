//! Fixed parts of the D4M schema: the two summing iterators, the default
//! configuration record of the metadata table, the bounds of the bootstrap
//! write, and the split points for content-hash row keys.
//!
//! Operators change the delimiters by writing new values to the metadata
//! table after provisioning, not by changing the defaults here.

use std::collections::BTreeSet;
use std::time::Duration;

use crate::combiners::LongEncoding;
use crate::store::{BatchWriterConfig, IteratorColumn, IteratorSetting, Mutation};

pub const ITERATOR_PRIORITY: u32 = 7;

pub const PROPERTY_ROW: &str = "property";
pub const FIELD_DELIMITER_PROPERTY: &str = "field.delimiter";
pub const FACT_DELIMITER_PROPERTY: &str = "fact.delimiter";
pub const DEFAULT_FIELD_DELIMITER: &[u8] = b"\t";
pub const DEFAULT_FACT_DELIMITER: &[u8] = b"|";

const EMPTY_QUALIFIER: &str = "";
const DEGREE_FAMILY: &str = "";
const DEGREE_QUALIFIER: &str = "degree";
const FIELD_FAMILY: &str = "field";

/// Leading characters of hex digests used as split points. `0` and `f` are
/// left out so neither the first nor the last tablet ends up nearly empty.
pub const CONTENT_HASH_SPLIT_ALPHABET: &str = "123456789abcde";

pub fn degree_iterator() -> IteratorSetting {
    //! Sums the `degree` counts of the degree table.

    IteratorSetting::summing(
        ITERATOR_PRIORITY,
        LongEncoding::String,
        vec![IteratorColumn::new(DEGREE_FAMILY, DEGREE_QUALIFIER)],
    )
}

pub fn field_iterator() -> IteratorSetting {
    //! Sums the per-field counts kept in the `field` family of the metadata
    //! table.

    IteratorSetting::summing(
        ITERATOR_PRIORITY,
        LongEncoding::String,
        vec![IteratorColumn::new(FIELD_FAMILY, EMPTY_QUALIFIER)],
    )
}

pub fn configuration_record() -> Mutation {
    let mut mutation = Mutation::new(PROPERTY_ROW);
    mutation.put(FIELD_DELIMITER_PROPERTY, EMPTY_QUALIFIER, DEFAULT_FIELD_DELIMITER);
    mutation.put(FACT_DELIMITER_PROPERTY, EMPTY_QUALIFIER, DEFAULT_FACT_DELIMITER);
    mutation
}

pub fn bootstrap_writer_config() -> BatchWriterConfig {
    BatchWriterConfig {
        max_latency: Duration::from_secs(10_000 * 60),
        max_memory: 10_000_000,
        max_write_threads: 5,
        timeout: Duration::from_secs(5 * 60),
    }
}

pub fn content_hash_split_points() -> BTreeSet<Vec<u8>> {
    CONTENT_HASH_SPLIT_ALPHABET
        .bytes()
        .map(|b| vec![b])
        .collect()
}
