//! Pruned depth-first traversal: existence probe, bounded collect, and the
//! lazy cursor.
//!
//! All three modes share one pruning rule. At an internal node, a query with
//! the split bit set can only find supersets under the right child; a query
//! with the bit clear must visit both. At a leaf, a record matches iff its
//! vector contains every query bit. When both children are eligible the
//! right (bit-set) branch is visited first, and every mode yields matches in
//! that same depth-first order.

use crate::bits::BitVector;
use crate::index::node::Node;
use crate::types::Record;

/// Short-circuiting existence probe.
///
/// At an internal node whose committed one-bits already cover the query,
/// the whole subtree is reported as a hit without descending: every record
/// beneath it carries those bits. The returned node is a starting point for
/// a follow-up [`collect_under`] when the caller needs the records
/// themselves. Otherwise the probe recurses under the pruning rule and scans
/// leaves linearly, stopping at the first match.
pub(crate) fn probe_node<'a>(node: &'a Node, query: &BitVector) -> (bool, Option<&'a Node>) {
    match node {
        Node::Leaf { records, .. } => {
            let hit = records
                .iter()
                .any(|record| record.vector.is_superset_of(query));
            (hit, None)
        }
        Node::Internal {
            split_bit,
            one_bits,
            left,
            right,
            ..
        } => {
            if one_bits.is_superset_of(query) {
                return (true, Some(node));
            }
            let (hit, subtree) = probe_node(right, query);
            if hit {
                return (hit, subtree);
            }
            if query.get(*split_bit) {
                (false, None)
            } else {
                probe_node(left, query)
            }
        }
    }
}

/// Collect every record under `node` whose vector contains all query bits,
/// in depth-first order, stopping after `max_results`.
///
/// The bound is checked before each leaf scan; a started leaf is always
/// scanned whole and the overshoot trimmed afterwards, so at most one
/// leaf's worth of extra work happens past the limit.
pub fn collect_under(node: &Node, query: &BitVector, max_results: usize) -> Vec<Record> {
    let mut results = Vec::new();
    let mut stack = vec![node];

    while let Some(node) = stack.pop() {
        if results.len() >= max_results {
            break;
        }
        match node {
            Node::Leaf { records, .. } => {
                for record in records {
                    if record.vector.is_superset_of(query) {
                        results.push(record.clone());
                    }
                }
            }
            Node::Internal {
                split_bit,
                left,
                right,
                ..
            } => {
                // Left pushed first so the right branch pops first.
                if !query.get(*split_bit) {
                    stack.push(left.as_ref());
                }
                stack.push(right.as_ref());
            }
        }
    }

    results.truncate(max_results);
    results
}

/// Lazy resumable cursor over superset matches.
///
/// Yields exactly the records an unbounded [`collect_under`] would return,
/// in the same depth-first order, computing each one on demand. [`peek`]
/// does only the work needed to cache the next match or prove exhaustion
/// and never consumes it; [`Iterator::next`] returns and clears the cache.
///
/// [`peek`]: SupersetIter::peek
#[derive(Debug)]
pub struct SupersetIter<'a> {
    query: BitVector,
    stack: Vec<&'a Node>,
    leaf: std::slice::Iter<'a, Record>,
    pending: Option<&'a Record>,
}

impl<'a> SupersetIter<'a> {
    pub(crate) fn new(root: &'a Node, query: BitVector) -> Self {
        Self {
            query,
            stack: vec![root],
            leaf: [].iter(),
            pending: None,
        }
    }

    /// The next matching record without consuming it, or `None` when the
    /// cursor is exhausted. Repeated peeks return the same record.
    pub fn peek(&mut self) -> Option<&'a Record> {
        if self.pending.is_none() {
            self.pending = self.advance();
        }
        self.pending
    }

    /// True iff at least one more match remains.
    pub fn has_next(&mut self) -> bool {
        self.peek().is_some()
    }

    fn advance(&mut self) -> Option<&'a Record> {
        loop {
            for record in self.leaf.by_ref() {
                if record.vector.is_superset_of(&self.query) {
                    return Some(record);
                }
            }
            match self.stack.pop()? {
                Node::Leaf { records, .. } => {
                    self.leaf = records.iter();
                }
                Node::Internal {
                    split_bit,
                    left,
                    right,
                    ..
                } => {
                    if !self.query.get(*split_bit) {
                        self.stack.push(left.as_ref());
                    }
                    self.stack.push(right.as_ref());
                }
            }
        }
    }
}

impl<'a> Iterator for SupersetIter<'a> {
    type Item = &'a Record;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pending.is_none() {
            self.pending = self.advance();
        }
        self.pending.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BuildConfig;
    use crate::index::SupersetIndex;
    use crate::types::RowId;

    fn record(bits: &[usize], row: u64) -> Record {
        Record::new(BitVector::from_bits(bits), RowId(row))
    }

    /// The three-record scenario: vectors {2}, {2,3}, {0,1,2,3} over width 8.
    fn scenario_index(bin_size: usize) -> SupersetIndex {
        let records = vec![
            record(&[2], 0),
            record(&[2, 3], 1),
            record(&[0, 1, 2, 3], 2),
        ];
        let mut cfg = BuildConfig::new(8);
        cfg.bin_size = bin_size;
        SupersetIndex::build(records, &cfg).unwrap()
    }

    fn sorted_rows(records: &[Record]) -> Vec<u64> {
        let mut rows: Vec<u64> = records.iter().map(|r| r.row.0).collect();
        rows.sort_unstable();
        rows
    }

    #[test]
    fn scenario_queries_return_expected_row_sets() {
        let index = scenario_index(1);
        let q = |bits: &[usize]| sorted_rows(&index.collect(&BitVector::from_bits(bits), usize::MAX));
        assert_eq!(q(&[2]), vec![0, 1, 2]);
        assert_eq!(q(&[3]), vec![1, 2]);
        assert_eq!(q(&[0, 1]), vec![2]);
        assert_eq!(q(&[4]), Vec::<u64>::new());
    }

    #[test]
    fn scenario_holds_for_single_leaf_tree() {
        // bin_size covers the whole input: the tree is one leaf.
        let index = scenario_index(16);
        assert!(matches!(index.root(), Node::Leaf { .. }));
        let q = |bits: &[usize]| sorted_rows(&index.collect(&BitVector::from_bits(bits), usize::MAX));
        assert_eq!(q(&[2]), vec![0, 1, 2]);
        assert_eq!(q(&[0, 1]), vec![2]);
    }

    #[test]
    fn empty_query_enumerates_everything() {
        let index = scenario_index(1);
        let all = index.collect(&BitVector::new(), usize::MAX);
        assert_eq!(sorted_rows(&all), vec![0, 1, 2]);
        assert!(index.probe(&BitVector::new()).0);
    }

    #[test]
    fn empty_index_answers_nothing() {
        let index = SupersetIndex::build(Vec::new(), &BuildConfig::new(8)).unwrap();
        assert!(index.collect(&BitVector::new(), usize::MAX).is_empty());
        assert!(index.collect(&BitVector::from_bits(&[1]), usize::MAX).is_empty());
        let (hit, subtree) = index.probe(&BitVector::new());
        assert!(!hit);
        assert!(subtree.is_none());
        assert!(index.iter(&BitVector::new()).next().is_none());
    }

    #[test]
    fn query_bits_beyond_width_match_nothing() {
        let index = scenario_index(1);
        let wide = BitVector::from_bits(&[2, 70]);
        assert!(index.collect(&wide, usize::MAX).is_empty());
        assert!(!index.probe(&wide).0);
        assert!(index.iter(&wide).next().is_none());

        // Trailing zero words are harmless.
        let padded = BitVector::from_words(vec![0b0100, 0, 0]);
        assert_eq!(sorted_rows(&index.collect(&padded, usize::MAX)), vec![0, 1, 2]);
    }

    #[test]
    fn probe_reports_covered_subtree_hint() {
        let index = scenario_index(1);
        let query = BitVector::from_bits(&[2]);
        let (hit, subtree) = index.probe(&query);
        assert!(hit);
        if let Some(node) = subtree {
            // The hint is sufficient, not exhaustive: every committed one-bit
            // of the subtree covers the query, and collecting under it only
            // yields true matches.
            assert!(node.one_bits().is_superset_of(&query));
            let under = collect_under(node, &query, usize::MAX);
            assert!(!under.is_empty());
            assert!(under.iter().all(|r| r.vector.is_superset_of(&query)));
        }
    }

    #[test]
    fn iterator_matches_collect_order_exactly() {
        let index = scenario_index(1);
        for bits in [&[2][..], &[3][..], &[0, 1][..], &[][..]] {
            let query = BitVector::from_bits(bits);
            let eager: Vec<u64> = index
                .collect(&query, usize::MAX)
                .iter()
                .map(|r| r.row.0)
                .collect();
            let lazy: Vec<u64> = index.iter(&query).map(|r| r.row.0).collect();
            assert_eq!(eager, lazy);
        }
    }

    #[test]
    fn peek_does_not_consume() {
        let index = scenario_index(1);
        let query = BitVector::from_bits(&[2]);
        let mut iter = index.iter(&query);
        let first = iter.peek().map(|r| r.row);
        assert_eq!(iter.peek().map(|r| r.row), first);
        assert!(iter.has_next());
        assert_eq!(iter.next().map(|r| r.row), first);

        let mut remaining = 0;
        while iter.has_next() {
            iter.next().unwrap();
            remaining += 1;
        }
        assert_eq!(remaining, 2);
        assert!(!iter.has_next());
        assert!(iter.next().is_none());
    }

    #[test]
    fn bounded_collect_is_a_prefix() {
        let index = scenario_index(1);
        let query = BitVector::from_bits(&[2]);
        let all = index.collect(&query, usize::MAX);
        for k in 0..=all.len() {
            assert_eq!(index.collect(&query, k), &all[..k]);
        }
        assert_eq!(index.collect(&query, 0), Vec::<Record>::new());
    }

    #[test]
    fn repeated_queries_are_deterministic() {
        let index = scenario_index(1);
        let query = BitVector::from_bits(&[3]);
        let first = index.collect(&query, usize::MAX);
        for _ in 0..3 {
            assert_eq!(index.collect(&query, usize::MAX), first);
        }
    }
}
