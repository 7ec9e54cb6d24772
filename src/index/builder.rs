//! Recursive randomized construction of the partition tree.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::bits::BitVector;
use crate::config::BuildConfig;
use crate::errors::{BitsieveError, Result};
use crate::index::node::Node;
use crate::types::Record;

/// A candidate scoring above this balance is taken immediately instead of
/// exhausting the search budget. `min(f, 1-f)` of a perfect split is 0.5.
const GOOD_ENOUGH_BALANCE: f64 = 0.42;

/// Both partitions must reach this size before the two recursive calls are
/// forked onto the rayon pool.
const PARALLEL_CUTOFF: usize = 4096;

struct BuildParams {
    width: usize,
    bin_size: usize,
    max_tries: usize,
}

/// Validate the input and build the tree. Fails fast on any record with a
/// set bit at or beyond the configured width.
pub(crate) fn build_tree(records: Vec<Record>, config: &BuildConfig) -> Result<Node> {
    config.validate()?;
    for record in &records {
        if let Some(high) = record.vector.highest_set_bit() {
            if high >= config.width {
                return Err(BitsieveError::BitOutOfRange {
                    bit: high,
                    width: config.width,
                });
            }
        }
    }

    tracing::debug!(
        records = records.len(),
        width = config.width,
        bin_size = config.bin_size,
        seed = config.seed,
        "building superset index"
    );

    let params = BuildParams {
        width: config.width,
        bin_size: config.bin_size,
        max_tries: config.max_tries,
    };
    Ok(split_recursive(
        records,
        BitVector::new(),
        BitVector::new(),
        config.seed,
        &params,
    ))
}

fn split_recursive(
    records: Vec<Record>,
    zero_bits: BitVector,
    one_bits: BitVector,
    seed: u64,
    params: &BuildParams,
) -> Node {
    if records.len() <= params.bin_size {
        return Node::Leaf {
            zero_bits,
            one_bits,
            records,
        };
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut candidates: Vec<usize> = (0..params.width)
        .filter(|&bit| !zero_bits.get(bit) && !one_bits.get(bit))
        .collect();
    candidates.shuffle(&mut rng);

    let Some(split_bit) = pick_split_bit(&records, &candidates, params.max_tries) else {
        // Every position is already committed. Keep the whole bucket in one
        // oversized leaf rather than produce a malformed split.
        tracing::debug!(
            records = records.len(),
            "candidate pool exhausted, emitting oversized leaf"
        );
        return Node::Leaf {
            zero_bits,
            one_bits,
            records,
        };
    };

    let (right_records, left_records): (Vec<Record>, Vec<Record>) = records
        .into_iter()
        .partition(|record| record.vector.get(split_bit));

    let mut left_zero = zero_bits.clone();
    left_zero.set(split_bit);
    let mut right_one = one_bits.clone();
    right_one.set(split_bit);
    let left_one = one_bits.clone();
    let right_zero = zero_bits.clone();

    // Child seeds are drawn before forking so the tree shape depends only on
    // the input and the configured seed, parallel or not.
    let left_seed: u64 = rng.gen();
    let right_seed: u64 = rng.gen();

    let (left, right) = if left_records.len().min(right_records.len()) >= PARALLEL_CUTOFF {
        rayon::join(
            || split_recursive(left_records, left_zero, left_one, left_seed, params),
            || split_recursive(right_records, right_zero, right_one, right_seed, params),
        )
    } else {
        (
            split_recursive(left_records, left_zero, left_one, left_seed, params),
            split_recursive(right_records, right_zero, right_one, right_seed, params),
        )
    };

    Node::Internal {
        split_bit,
        zero_bits,
        one_bits,
        left: Box::new(left),
        right: Box::new(right),
    }
}

/// Score up to `max_tries` shuffled candidates by how evenly they split the
/// bucket and return the best one. `None` iff the candidate pool is empty.
fn pick_split_bit(records: &[Record], candidates: &[usize], max_tries: usize) -> Option<usize> {
    let total = records.len() as f64;
    let mut best: Option<(usize, f64)> = None;

    for &bit in candidates.iter().take(max_tries) {
        let set = records
            .iter()
            .filter(|record| record.vector.get(bit))
            .count() as f64;
        let fraction = set / total;
        let score = fraction.min(1.0 - fraction);
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((bit, score));
            if score > GOOD_ENOUGH_BALANCE {
                break;
            }
        }
    }

    best.map(|(bit, _)| bit)
}
