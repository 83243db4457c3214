//! Errors reported by the trees

use thiserror::Error;

//-----------------------------------------------------------------------------------------------//

/// A failure of a tree operation
///
/// Searching for or removing an element that is not present is not an error, those operations
/// return `None` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// Storage for new leaves could not be reserved. The tree is left exactly as it was before the
    /// failed call.
    #[error("failed to allocate storage for {requested} tree leaves")]
    Alloc {
        /// The number of leaves that were requested
        requested: usize,
    },
}

//-----------------------------------------------------------------------------------------------//

/// A broken structural invariant, as reported by `verify`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Violation {
    /// In-order traversal found two neighbours that do not compare strictly ascending
    #[error("leaf {leaf} is not strictly greater than its in-order predecessor")]
    Unordered {
        /// The offending leaf
        leaf: usize,
    },

    /// A red link leans right
    #[error("leaf {leaf} has a red right child")]
    RedRightLink {
        /// The parent of the red right child
        leaf: usize,
    },

    /// A red leaf has a red left child
    #[error("leaf {leaf} is red and has a red left child")]
    DoubleRed {
        /// The upper of the two red leaves
        leaf: usize,
    },

    /// Two paths below a leaf pass through a different number of black links
    #[error("black height differs below leaf {leaf}")]
    BlackHeight {
        /// The leaf whose subtrees disagree
        leaf: usize,
    },

    /// The root is red
    #[error("the root is red")]
    RedRoot,

    /// The number of reachable leaves disagrees with the recorded count
    #[error("{found} leaves are reachable but {expected} are recorded")]
    CountMismatch {
        /// The recorded count
        expected: usize,
        /// The number found by traversal
        found: usize,
    },
}
