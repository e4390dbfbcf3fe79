use thiserror::Error;

/// A broken structural invariant, found by [`AvlTree::check_invariants`](crate::AvlTree::check_invariants).
///
/// None of these can be caused by a caller; each one is a bug in the tree.
/// `depth` counts edges from the root.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum InvariantViolation {
    #[error("key at depth {depth} is outside the range allowed by its ancestors")]
    Ordering { depth: usize },

    #[error("node at depth {depth} caches height {cached} but its subtree is {actual} high")]
    Height { depth: usize, cached: u32, actual: u32 },

    #[error("node at depth {depth} has balance factor {balance}")]
    Balance { depth: usize, balance: i64 },

    #[error("{reachable} nodes reachable from the root but {allocated} allocated")]
    Length { reachable: usize, allocated: usize },
}
