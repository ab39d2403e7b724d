use thiserror::Error;

/// Errors returned by fallible [`OrderedTree`](crate::OrderedTree) operations.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum TreeError {
    /// A deletion was requested on a tree with no values.
    #[error("tree is empty")]
    EmptyTree,
    /// No value sits at the requested rank.
    ///
    /// `rank` is `None` when the rank arithmetic behind
    /// [`floor`](crate::OrderedTree::floor) would have gone below zero.
    #[error("no value at the requested rank in a tree of {count} values")]
    OutOfRange {
        /// The requested zero-based rank.
        rank: Option<usize>,
        /// The number of values in the tree.
        count: usize,
    },
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn messages() {
        assert_eq!(TreeError::EmptyTree.to_string(), "tree is empty");
        let err = TreeError::OutOfRange {
            rank: Some(3),
            count: 2,
        };
        assert_eq!(err.to_string(), "no value at the requested rank in a tree of 2 values");
        let err = TreeError::OutOfRange {
            rank: None,
            count: 0,
        };
        assert_eq!(err.to_string(), "no value at the requested rank in a tree of 0 values");
    }
}
