/// The SUM combiner.
///
/// Adds two encoded longs. Overflow saturates at the `i64` bounds instead of
/// wrapping around.
use super::LongEncoding;

pub(super) const COMBINER_NAME: &str = "SUM";

pub(super) fn run(encoding: LongEncoding, existing: &[u8], incoming: &[u8]) -> Option<Vec<u8>> {
    let total = encoding
        .decode(existing)?
        .saturating_add(encoding.decode(incoming)?);

    Some(encoding.encode(total))
}
