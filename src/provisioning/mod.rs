//! Provisioning of the D4M schema needs the following components
//! - Names (the five tables derived from one base name)
//! - Schema (iterators, configuration record and split points the tables start with)
//! - Provisioner (checks the store and creates what is missing, all or nothing)
//!

//  All modules of this lib
mod errors;
mod names;
mod provisioner;
pub mod schema;

//  External API
pub use errors::{ProvisionError, ProvisionResult, ProvisionStep, SplitFailureCause};
pub use names::{
    BaseName, DEFAULT_BASE_NAME, TableSet, degree_table, edge_table, metadata_table, text_table,
    transpose_table,
};
pub use provisioner::{ProvisionOutcome, TableProvisioner};
