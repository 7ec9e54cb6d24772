//! Common core types stored in the index.

use serde::{Deserialize, Serialize};

use crate::bits::BitVector;

/// Opaque row identifier supplied by the caller at build time and handed
/// back verbatim by queries. Identifiers need not be unique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RowId(pub u64);

impl From<u64> for RowId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl From<RowId> for u64 {
    fn from(id: RowId) -> Self {
        id.0
    }
}

/// An immutable pairing of a fingerprint vector and its row identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// The packed feature bits for this row.
    pub vector: BitVector,
    /// The caller-supplied identifier joined back after a query.
    pub row: RowId,
}

impl Record {
    /// Pair a vector with its row identifier.
    pub fn new(vector: BitVector, row: impl Into<RowId>) -> Self {
        Self {
            vector,
            row: row.into(),
        }
    }
}
