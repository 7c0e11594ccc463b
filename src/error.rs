//! Error types.

use thiserror::Error;

/// Errors raised when a problem instance or a configuration is rejected.
///
/// All checks run before any partitioning or construction starts, so a
/// returned error never leaves a partially built tour behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TsptwError {
    /// The distance matrix has no row/column for a node id.
    #[error("distance matrix of size {size} does not cover node {id}")]
    MissingDistance {
        /// Node id outside the matrix.
        id: usize,
        /// Matrix dimension.
        size: usize,
    },

    /// The node set lists the same id more than once.
    #[error("node {id} appears more than once in the node set")]
    DuplicateNode {
        /// Repeated node id.
        id: usize,
    },

    /// The node set contains the start node.
    #[error("node set contains the start node {id}")]
    ContainsStart {
        /// Start node id.
        id: usize,
    },

    /// The distance matrix differs between the two directions of a pair.
    #[error("distance matrix is not symmetric: d({from}, {to}) != d({to}, {from})")]
    AsymmetricDistance {
        /// Lower id of the pair.
        from: usize,
        /// Higher id of the pair.
        to: usize,
    },

    /// No node with the requested start id exists.
    #[error("start node {id} is not in the node list")]
    StartNotFound {
        /// Requested start id.
        id: usize,
    },

    /// A parameter is outside its valid range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result alias for fallible operations in this crate.
pub type Result<T> = std::result::Result<T, TsptwError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let e = TsptwError::MissingDistance { id: 7, size: 5 };
        assert_eq!(e.to_string(), "distance matrix of size 5 does not cover node 7");

        let e = TsptwError::AsymmetricDistance { from: 1, to: 4 };
        assert_eq!(
            e.to_string(),
            "distance matrix is not symmetric: d(1, 4) != d(4, 1)"
        );

        let e = TsptwError::InvalidConfig("p must be at least 1".into());
        assert_eq!(e.to_string(), "invalid configuration: p must be at least 1");
    }
}
