use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// How a combiner reads and writes 64-bit integers inside a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LongEncoding {
    /// Decimal text, e.g. `b"42"`.
    String,
    /// Eight bytes, big-endian.
    Fixed,
}

impl LongEncoding {
    pub fn decode(&self, value: &[u8]) -> Option<i64> {
        match self {
            LongEncoding::String => std::str::from_utf8(value).ok()?.trim().parse::<i64>().ok(),
            LongEncoding::Fixed => {
                let bytes: [u8; 8] = value.try_into().ok()?;
                Some(i64::from_be_bytes(bytes))
            }
        }
    }

    pub fn encode(&self, value: i64) -> Vec<u8> {
        match self {
            LongEncoding::String => value.to_string().into_bytes(),
            LongEncoding::Fixed => value.to_be_bytes().to_vec(),
        }
    }
}

impl Display for LongEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let encoding = match self {
            LongEncoding::String => "STRING",
            LongEncoding::Fixed => "FIXEDLEN",
        };
        write!(f, "{}", encoding)
    }
}
