//! Tree node model: a tagged Leaf/Internal variant with committed-bit sets.

use serde::{Deserialize, Serialize};

use crate::bits::BitVector;
use crate::errors::{BitsieveError, Result};
use crate::types::Record;

/// A node of the partition tree.
///
/// `zero_bits` and `one_bits` are the committed bits of the node's path:
/// positions guaranteed clear (respectively set) in every record stored
/// beneath it, accumulated from ancestor split decisions. The left branch
/// of a split commits the split bit to `zero_bits`, the right branch to
/// `one_bits`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Node {
    /// A terminal bucket of records.
    Leaf {
        /// Bits guaranteed clear in every record of this bucket.
        zero_bits: BitVector,
        /// Bits guaranteed set in every record of this bucket.
        one_bits: BitVector,
        /// The stored records, in build partition order.
        records: Vec<Record>,
    },
    /// A split over one bit position.
    Internal {
        /// The bit this node partitions on; never already committed.
        split_bit: usize,
        /// Bits guaranteed clear in every record beneath this node.
        zero_bits: BitVector,
        /// Bits guaranteed set in every record beneath this node.
        one_bits: BitVector,
        /// Records with `split_bit` clear.
        left: Box<Node>,
        /// Records with `split_bit` set.
        right: Box<Node>,
    },
}

impl Node {
    /// The bits guaranteed set in every record beneath this node.
    pub fn one_bits(&self) -> &BitVector {
        match self {
            Node::Leaf { one_bits, .. } => one_bits,
            Node::Internal { one_bits, .. } => one_bits,
        }
    }

    /// The bits guaranteed clear in every record beneath this node.
    pub fn zero_bits(&self) -> &BitVector {
        match self {
            Node::Leaf { zero_bits, .. } => zero_bits,
            Node::Internal { zero_bits, .. } => zero_bits,
        }
    }

    /// Total records stored in this subtree.
    pub fn record_count(&self) -> usize {
        match self {
            Node::Leaf { records, .. } => records.len(),
            Node::Internal { left, right, .. } => left.record_count() + right.record_count(),
        }
    }

    /// Walk the subtree and verify the structural invariants.
    ///
    /// Committed-bit sets must be disjoint, split bits must be in range and
    /// uncommitted, and every leaf record must honor its committed bits.
    /// Used by tests and as a corruption check after deserialization.
    pub fn check_invariants(&self, width: usize) -> Result<()> {
        match self {
            Node::Leaf {
                zero_bits,
                one_bits,
                records,
            } => {
                if zero_bits.intersects(one_bits) {
                    return Err(BitsieveError::Corrupt(
                        "leaf committed-bit sets overlap".into(),
                    ));
                }
                for record in records {
                    if let Some(high) = record.vector.highest_set_bit() {
                        if high >= width {
                            return Err(BitsieveError::Corrupt(format!(
                                "leaf record bit {high} exceeds width {width}"
                            )));
                        }
                    }
                    if !record.vector.is_superset_of(one_bits) {
                        return Err(BitsieveError::Corrupt(
                            "leaf record missing a committed one-bit".into(),
                        ));
                    }
                    if record.vector.intersects(zero_bits) {
                        return Err(BitsieveError::Corrupt(
                            "leaf record sets a committed zero-bit".into(),
                        ));
                    }
                }
                Ok(())
            }
            Node::Internal {
                split_bit,
                zero_bits,
                one_bits,
                left,
                right,
            } => {
                if *split_bit >= width {
                    return Err(BitsieveError::Corrupt(format!(
                        "split bit {split_bit} exceeds width {width}"
                    )));
                }
                if zero_bits.intersects(one_bits) {
                    return Err(BitsieveError::Corrupt(
                        "internal committed-bit sets overlap".into(),
                    ));
                }
                if zero_bits.get(*split_bit) || one_bits.get(*split_bit) {
                    return Err(BitsieveError::Corrupt(format!(
                        "split bit {split_bit} already committed"
                    )));
                }
                if !left.zero_bits().get(*split_bit) || !right.one_bits().get(*split_bit) {
                    return Err(BitsieveError::Corrupt(format!(
                        "children of split bit {split_bit} do not commit it"
                    )));
                }
                left.check_invariants(width)?;
                right.check_invariants(width)
            }
        }
    }
}
