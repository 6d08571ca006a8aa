use thiserror::Error;

/// A broken invariant found by [`AvlTreeMap::check_consistency`] or
/// [`AvlTreeMap::check_structure`].
///
/// [`AvlTreeMap::check_consistency`]: crate::AvlTreeMap::check_consistency
/// [`AvlTreeMap::check_structure`]: crate::AvlTreeMap::check_structure
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConsistencyError {
    #[error("root node has a parent link")]
    RootHasParent,
    #[error("child node does not link back to its parent")]
    BrokenParentLink,
    #[error("keys are out of order")]
    OrderViolation,
    #[error("cached height {cached} differs from computed height {computed}")]
    StaleHeight { cached: usize, computed: usize },
    #[error("balance factor {balance_factor} violates the AVL condition")]
    Unbalanced { balance_factor: isize },
    #[error("counted {counted} reachable nodes, expected {expected}")]
    CountMismatch { counted: usize, expected: usize },
    #[error("{leaked} arena slots are neither reachable nor free")]
    LeakedSlots { leaked: usize },
}
