//! The superset index: batch construction, queries, persistence entry points.

mod builder;
pub mod node;

use serde::{Deserialize, Serialize};

use crate::bits::BitVector;
use crate::config::BuildConfig;
use crate::errors::{BitsieveError, Result};
use crate::query::{self, SupersetIter};
use crate::types::{Record, RowId};
use node::Node;

/// An immutable superset-containment index over packed bit-vectors.
///
/// Built once from a batch of [`Record`]s, then queried freely: all query
/// methods take `&self` and never mutate the tree, so a built index can be
/// shared across threads without locking. There is no incremental insertion;
/// changing the underlying data means rebuilding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupersetIndex {
    width: usize,
    bin_size: usize,
    len: usize,
    root: Node,
}

impl SupersetIndex {
    /// Build an index over `records`.
    ///
    /// Fails fast with [`BitsieveError::BitOutOfRange`] if any record has a
    /// set bit at or beyond `config.width`, and with
    /// [`BitsieveError::InvalidConfig`] on a degenerate configuration. An
    /// empty batch is valid and yields an index that matches nothing.
    pub fn build(records: Vec<Record>, config: &BuildConfig) -> Result<Self> {
        let len = records.len();
        let root = builder::build_tree(records, config)?;
        Ok(Self {
            width: config.width,
            bin_size: config.bin_size,
            len,
            root,
        })
    }

    /// The configured bit width.
    pub fn width(&self) -> usize {
        self.width
    }

    /// The configured leaf capacity.
    pub fn bin_size(&self) -> usize {
        self.bin_size
    }

    /// Number of records stored.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True iff no records are stored.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The root of the partition tree.
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Fast existence probe: is any stored vector a superset of `query`?
    ///
    /// When a whole subtree's committed one-bits already cover the query the
    /// probe reports `(true, Some(subtree))` without descending further; use
    /// [`query::collect_under`] on that node to enumerate its matches. A hit
    /// found by a leaf scan reports `(true, None)`.
    pub fn probe<'a>(&'a self, query: &BitVector) -> (bool, Option<&'a Node>) {
        if self.is_empty() {
            return (false, None);
        }
        query::probe_node(&self.root, query)
    }

    /// Collect up to `max_results` matching records in depth-first order.
    ///
    /// Pass `usize::MAX` for an unbounded collection. A bounded result is
    /// always a prefix of the unbounded one. Query bits the tree does not
    /// cover (at or beyond [`width`](Self::width)) can match nothing; a
    /// query with no bits set matches every stored record.
    pub fn collect(&self, query: &BitVector, max_results: usize) -> Vec<Record> {
        query::collect_under(&self.root, query, max_results)
    }

    /// Like [`collect`](Self::collect), returning only the row identifiers.
    pub fn collect_rows(&self, query: &BitVector, max_results: usize) -> Vec<RowId> {
        self.collect(query, max_results)
            .into_iter()
            .map(|record| record.row)
            .collect()
    }

    /// Lazy cursor over matching records, in the same depth-first order as
    /// [`collect`](Self::collect).
    pub fn iter<'a>(&'a self, query: &BitVector) -> SupersetIter<'a> {
        SupersetIter::new(&self.root, query.clone())
    }

    /// Structural self-check: committed-bit bookkeeping, split-bit ranges,
    /// and the stored record count. Run automatically after deserialization.
    pub fn validate(&self) -> Result<()> {
        self.root.check_invariants(self.width)?;
        let counted = self.root.record_count();
        if counted != self.len {
            return Err(BitsieveError::Corrupt(format!(
                "record count mismatch: header says {}, tree holds {counted}",
                self.len
            )));
        }
        if self.bin_size < 1 || self.width < 1 {
            return Err(BitsieveError::Corrupt(
                "stored configuration is degenerate".into(),
            ));
        }
        Ok(())
    }
}
