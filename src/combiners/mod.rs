//! Value combiners that a table applies when two values land on the same key.
//!
//! The store consults the iterators attached to a table on every write. When
//! a written column is covered by one of them, the stored value and the new
//! value go through [`run`] instead of the new one simply replacing the old.
//!
//! Only summing is needed for the D4M tables (degree counts and field
//! frequencies), but each combiner sits in its own file so more can be added
//! with another match arm.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

mod encoding;
mod sum;

pub use encoding::LongEncoding;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombinerKind {
    Sum,
}

impl Display for CombinerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CombinerKind::Sum => sum::COMBINER_NAME,
        };
        write!(f, "{}", name)
    }
}

/// A central method that works as a registry for all combiners.
///
/// Returns the combined value, or `incoming` unchanged when either side does
/// not decode under `encoding`.
pub fn run(
    kind: CombinerKind,
    encoding: LongEncoding,
    existing: &[u8],
    incoming: &[u8],
) -> Vec<u8> {
    let combined = match kind {
        CombinerKind::Sum => sum::run(encoding, existing, incoming),
    };

    combined.unwrap_or_else(|| {
        log::warn!(
            "{} combiner could not decode values as {}; keeping the newer value",
            kind,
            encoding
        );
        incoming.to_vec()
    })
}
