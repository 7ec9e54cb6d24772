#![forbid(unsafe_code)]
#![deny(missing_debug_implementations, missing_docs, rust_2018_idioms)]

//! # bitsieve
//!
//! A superset-containment index over packed bit-vector fingerprints:
//! - batch construction of a randomized binary partition tree
//! - pruned depth-first superset queries (probe, bounded collect, lazy cursor)
//! - versioned byte-stream persistence for build-once-reuse-everywhere trees
//!
//! The index stores `(bit-vector, row id)` pairs and answers "which stored
//! vectors contain every bit of this query" without scanning the whole
//! collection. Construction is seeded and deterministic; a built tree is
//! immutable and safe to share across threads.

pub mod bits;
pub mod config;
pub mod errors;
pub mod index;
pub mod query;
pub mod types;

mod persistence;

pub use bits::BitVector;
pub use config::BuildConfig;
pub use errors::{BitsieveError, Result};
pub use index::node::Node;
pub use index::SupersetIndex;
pub use query::SupersetIter;
pub use types::{Record, RowId};
