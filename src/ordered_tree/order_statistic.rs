use core::borrow::Borrow;
use core::ops::Index;

use super::OrderedTree;
use crate::{Rank, TreeError};

impl<T: Ord> OrderedTree<T> {
    /// Returns the number of values strictly less than `value`.
    ///
    /// `value` does not have to be present in the tree.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::OrderedTree;
    ///
    /// let tree = OrderedTree::from([10, 20, 30]);
    ///
    /// assert_eq!(tree.rank(&20), 1);
    /// assert_eq!(tree.rank(&25), 2);
    /// assert_eq!(tree.rank(&5), 0);
    /// ```
    #[must_use]
    pub fn rank<Q>(&self, value: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.rank(value)
    }

    /// Returns the value one rank below `rank(value)`.
    ///
    /// This is rank arithmetic, not a nearest-neighbour search: the result is
    /// the largest value strictly less than `value`, whether or not `value`
    /// itself is stored.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::OutOfRange`] when `rank(value)` is 0. The rank is
    /// never clamped.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::OrderedTree;
    ///
    /// let tree = OrderedTree::from([10, 20, 30]);
    ///
    /// assert_eq!(tree.floor(&20), Ok(&10));
    /// assert_eq!(tree.floor(&25), Ok(&20));
    /// assert!(tree.floor(&10).is_err());
    /// ```
    pub fn floor<Q>(&self, value: &Q) -> Result<&T, TreeError>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let rank = self.rank(value).checked_sub(1).ok_or(TreeError::OutOfRange {
            rank: None,
            count: self.count(),
        })?;
        self.select(rank)
    }

    /// Returns the value one rank above `rank(value)`.
    ///
    /// This is rank arithmetic, not a nearest-neighbour search. For a stored
    /// `value` the result is its successor; for a value that is not stored it
    /// skips the smallest greater value and returns the one after it.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::OutOfRange`] when `rank(value) + 1` is not a valid
    /// rank.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::OrderedTree;
    ///
    /// let tree = OrderedTree::from([10, 20, 30, 40]);
    ///
    /// assert_eq!(tree.ceiling(&20), Ok(&30));
    /// assert_eq!(tree.ceiling(&15), Ok(&30));
    /// assert!(tree.ceiling(&40).is_err());
    /// ```
    pub fn ceiling<Q>(&self, value: &Q) -> Result<&T, TreeError>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.select(self.rank(value) + 1)
    }
}

impl<T> OrderedTree<T> {
    /// Returns the value at position `rank` in sorted order.
    ///
    /// The rank is zero-based.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::OutOfRange`] if `rank >= count()`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::{OrderedTree, TreeError};
    ///
    /// let tree = OrderedTree::from([10, 20, 30]);
    /// assert_eq!(tree.select(1), Ok(&20));
    /// assert_eq!(tree.select(3), Err(TreeError::OutOfRange { rank: Some(3), count: 3 }));
    /// ```
    pub fn select(&self, rank: usize) -> Result<&T, TreeError> {
        self.raw.select(rank).ok_or(TreeError::OutOfRange {
            rank: Some(rank),
            count: self.count(),
        })
    }
}

/// Indexes into the tree by rank.
///
/// # Panics
///
/// Panics if `rank` is out of bounds.
///
/// # Examples
///
/// ```
/// use llrb_tree::{OrderedTree, Rank};
///
/// let tree = OrderedTree::from([10, 20, 30]);
/// assert_eq!(tree[Rank(1)], 20);
/// ```
impl<T> Index<Rank> for OrderedTree<T> {
    type Output = T;

    fn index(&self, rank: Rank) -> &Self::Output {
        self.raw.select(rank.0).expect("index out of bounds")
    }
}
