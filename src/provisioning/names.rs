//! Derivation of the five D4M table names from a base name.
//!
//! `T<base>`, `T<base>Transpose`, `T<base>Degree`, `T<base>Metadata`,
//! `T<base>Text`. Already provisioned environments are found again through
//! these names, so the prefix and suffixes must never change.

use std::fmt::Display;

use serde::Serialize;

use crate::provisioning::errors::{ProvisionError, ProvisionResult};
use crate::store::is_valid_table_name;

pub const DEFAULT_BASE_NAME: &str = "edge";

const TABLE_PREFIX: &str = "T";
const EDGE_SUFFIX: &str = "";
const TRANSPOSE_SUFFIX: &str = "Transpose";
const DEGREE_SUFFIX: &str = "Degree";
const METADATA_SUFFIX: &str = "Metadata";
const TEXT_SUFFIX: &str = "Text";

/// The operator-chosen root of all five table names.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BaseName(String);

impl BaseName {
    pub fn new(name: &str) -> ProvisionResult<BaseName> {
        //! Accepts only names that still form a legal table name once the
        //! prefix and suffixes are added.

        if !is_valid_table_name(name) {
            return Err(ProvisionError::Configuration(format!(
                "invalid base name '{}': use ASCII letters, digits or '_'",
                name
            )));
        }

        Ok(BaseName(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for BaseName {
    fn default() -> Self {
        BaseName(DEFAULT_BASE_NAME.to_string())
    }
}

impl Display for BaseName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn _table_name(base: &str, suffix: &str) -> String {
    format!("{}{}{}", TABLE_PREFIX, base, suffix)
}

pub fn edge_table(base: &str) -> String {
    _table_name(base, EDGE_SUFFIX)
}

pub fn transpose_table(base: &str) -> String {
    _table_name(base, TRANSPOSE_SUFFIX)
}

pub fn degree_table(base: &str) -> String {
    _table_name(base, DEGREE_SUFFIX)
}

pub fn metadata_table(base: &str) -> String {
    _table_name(base, METADATA_SUFFIX)
}

pub fn text_table(base: &str) -> String {
    _table_name(base, TEXT_SUFFIX)
}

/// The five tables that make up one D4M schema.
///
/// They exist together or not at all; anything in between is an
/// inconsistent schema.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TableSet {
    pub edge: String,
    pub transpose: String,
    pub degree: String,
    pub metadata: String,
    pub text: String,
}

impl TableSet {
    pub fn new(base: &BaseName) -> TableSet {
        let base = base.as_str();

        TableSet {
            edge: edge_table(base),
            transpose: transpose_table(base),
            degree: degree_table(base),
            metadata: metadata_table(base),
            text: text_table(base),
        }
    }

    pub fn names(&self) -> [&str; 5] {
        //! All five names, in creation order.

        [
            self.edge.as_str(),
            self.transpose.as_str(),
            self.degree.as_str(),
            self.metadata.as_str(),
            self.text.as_str(),
        ]
    }
}
