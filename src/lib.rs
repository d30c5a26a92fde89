//! Provisioning of the five D4M tables (edge, transpose, degree, metadata,
//! text) on a sorted key-value store.

pub mod cli;
pub mod combiners;
pub mod config;
pub mod logging;
pub mod provisioning;
pub mod store;
