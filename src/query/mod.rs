//! Superset query algorithms over a built tree.

mod search;

pub use search::{collect_under, SupersetIter};
pub(crate) use search::probe_node;
