use core::borrow::Borrow;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;

use alloc::vec::Vec;

use log::{debug, trace};

use crate::TreeError;
use crate::raw::{Node, RawTree};

mod order_statistic;
#[cfg(feature = "serde")]
mod serde_impl;

/// An ordered set based on a left-leaning red-black tree.
///
/// Every node tracks the size of its subtree, so besides the usual ordered-set
/// operations the tree answers order-statistic queries ([`rank`], [`select`],
/// [`floor`], [`ceiling`]) in O(log n).
///
/// Insertion keeps the tree balanced: red links lean left and every
/// root-to-leaf path carries the same number of black links, so the height
/// stays below `2 * log2(n + 1)`. Deletions splice nodes out without any
/// rebalancing pass; they never make the tree taller, but the black-height
/// balance can be lost. [`black_height`] reports whether it still holds.
///
/// It is a logic error for a value to be modified in such a way that its
/// ordering relative to any other value, as determined by the [`Ord`] trait,
/// changes while it is in the tree.
///
/// [`rank`]: OrderedTree::rank
/// [`select`]: OrderedTree::select
/// [`floor`]: OrderedTree::floor
/// [`ceiling`]: OrderedTree::ceiling
/// [`black_height`]: OrderedTree::black_height
///
/// # Examples
///
/// ```
/// use llrb_tree::OrderedTree;
///
/// let mut tree = OrderedTree::new();
/// for value in [5, 3, 8, 1, 4, 7, 9] {
///     tree.insert(value);
/// }
///
/// assert_eq!(tree.count(), 7);
/// assert_eq!(tree.rank(&7), 4);
/// assert_eq!(tree.select(0), Ok(&1));
/// assert_eq!(tree.range(&4, &8), [&4, &5, &7, &8]);
///
/// assert_eq!(tree.delete_min(), Ok(1));
/// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [3, 4, 5, 7, 8, 9]);
/// ```
pub struct OrderedTree<T> {
    raw: RawTree<T>,
}

/// An iterator over the values of an `OrderedTree`, in ascending order.
///
/// This `struct` is created by the [`iter`] method on [`OrderedTree`].
///
/// # Examples
///
/// ```
/// use llrb_tree::OrderedTree;
///
/// let tree = OrderedTree::from([3, 1, 2]);
/// let mut iter = tree.iter();
/// assert_eq!(iter.next(), Some(&1));
/// assert_eq!(iter.next_back(), Some(&3));
/// assert_eq!(iter.next(), Some(&2));
/// assert_eq!(iter.next(), None);
/// ```
///
/// [`iter`]: OrderedTree::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, T: 'a> {
    // Ancestors whose value has not been yielded yet, for each direction.
    front: Vec<&'a Node<T>>,
    back: Vec<&'a Node<T>>,
    remaining: usize,
}

/// An owning iterator over the values of an `OrderedTree`, in ascending order.
///
/// This `struct` is created by the [`into_iter`] method on [`OrderedTree`]
/// (provided by the [`IntoIterator`] trait).
///
/// [`into_iter`]: OrderedTree#method.into_iter
pub struct IntoIter<T> {
    inner: alloc::vec::IntoIter<T>,
}

impl<T> OrderedTree<T> {
    /// Makes a new, empty `OrderedTree`.
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::OrderedTree;
    ///
    /// let mut tree: OrderedTree<i32> = OrderedTree::new();
    /// assert!(tree.is_empty());
    /// ```
    #[must_use]
    pub const fn new() -> Self {
        OrderedTree {
            raw: RawTree::new(),
        }
    }

    /// Returns the number of values in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::OrderedTree;
    ///
    /// let mut tree = OrderedTree::new();
    /// assert_eq!(tree.count(), 0);
    /// tree.insert(1);
    /// tree.insert(1);
    /// assert_eq!(tree.count(), 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn count(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the tree contains no values.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Clears the tree, removing all values.
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns the smallest value, or `None` if the tree is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::OrderedTree;
    ///
    /// let tree = OrderedTree::from([2, 1, 3]);
    /// assert_eq!(tree.first(), Some(&1));
    /// assert_eq!(tree.last(), Some(&3));
    /// ```
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.raw.first()
    }

    /// Returns the largest value, or `None` if the tree is empty.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.raw.last()
    }

    /// Removes and returns the smallest value.
    ///
    /// The leftmost node is spliced out and replaced by its right child; the
    /// sizes of its ancestors are updated on the way back up. No red links are
    /// pushed down first, so black-height balance is not preserved.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::EmptyTree`] if the tree has no values.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::{OrderedTree, TreeError};
    ///
    /// let mut tree = OrderedTree::from([5, 3, 8]);
    /// assert_eq!(tree.delete_min(), Ok(3));
    /// assert_eq!(tree.count(), 2);
    ///
    /// let mut empty: OrderedTree<i32> = OrderedTree::new();
    /// assert_eq!(empty.delete_min(), Err(TreeError::EmptyTree));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(height)
    pub fn delete_min(&mut self) -> Result<T, TreeError> {
        let min = self.raw.pop_first().ok_or_else(|| empty_tree("delete_min"))?;
        trace!("delete_min spliced the leftmost node, {} values remain", self.raw.len());
        Ok(min)
    }

    /// Removes and returns the largest value.
    ///
    /// Mirrors [`delete_min`](OrderedTree::delete_min) on the rightmost node.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::EmptyTree`] if the tree has no values.
    ///
    /// # Complexity
    ///
    /// O(height)
    pub fn delete_max(&mut self) -> Result<T, TreeError> {
        let max = self.raw.pop_last().ok_or_else(|| empty_tree("delete_max"))?;
        trace!("delete_max spliced the rightmost node, {} values remain", self.raw.len());
        Ok(max)
    }

    /// Calls `visitor` once for every value, in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::OrderedTree;
    ///
    /// let tree = OrderedTree::from([3, 1, 2]);
    /// let mut seen = Vec::new();
    /// tree.each_in_order(|v| seen.push(*v));
    /// assert_eq!(seen, [1, 2, 3]);
    /// ```
    pub fn each_in_order<'a, F>(&'a self, visitor: F)
    where
        F: FnMut(&'a T),
    {
        self.raw.each_in_order(visitor);
    }

    /// Gets an iterator that visits the values in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::OrderedTree;
    ///
    /// let tree = OrderedTree::from([3, 1, 2]);
    /// let values: Vec<_> = tree.iter().collect();
    /// assert_eq!(values, [&1, &2, &3]);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n) to create the iterator; amortized O(1) per step.
    pub fn iter(&self) -> Iter<'_, T> {
        let mut iter = Iter {
            front: Vec::new(),
            back: Vec::new(),
            remaining: self.raw.len(),
        };
        iter.push_left_spine(self.raw.root());
        iter.push_right_spine(self.raw.root());
        iter
    }

    /// Returns the number of nodes on the longest path from the root to a
    /// leaf. An empty tree has height 0.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::OrderedTree;
    ///
    /// let tree: OrderedTree<u32> = (0..1000).collect();
    /// assert!(tree.height() <= 20);
    /// ```
    #[must_use]
    pub fn height(&self) -> usize {
        self.raw.height()
    }

    /// Returns the number of black nodes on every path from the root to an
    /// empty link, counting the root as black, or `None` if two paths
    /// disagree.
    ///
    /// Trees built purely by insertion always return `Some`. Deletions splice
    /// nodes out without rebalancing and can break the balance.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::OrderedTree;
    ///
    /// let mut tree = OrderedTree::from([1, 2, 3]);
    /// assert_eq!(tree.black_height(), Some(2));
    ///
    /// tree.delete_min().unwrap();
    /// assert_eq!(tree.black_height(), None);
    /// ```
    #[must_use]
    pub fn black_height(&self) -> Option<usize> {
        self.raw.black_height()
    }
}

impl<T: Ord> OrderedTree<T> {
    /// Adds a value to the tree.
    ///
    /// Returns whether the value was newly inserted. If the tree already
    /// contained an equal value, `false` is returned and the stored value is
    /// left untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::OrderedTree;
    ///
    /// let mut tree = OrderedTree::new();
    ///
    /// assert_eq!(tree.insert(2), true);
    /// assert_eq!(tree.insert(2), false);
    /// assert_eq!(tree.count(), 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn insert(&mut self, value: T) -> bool {
        let inserted = self.raw.insert(value);
        if inserted {
            trace!("inserted a red leaf, tree now holds {} values", self.raw.len());
        }
        inserted
    }

    /// Returns `true` if the tree contains a value equal to `value`.
    ///
    /// The value may be any borrowed form of the tree's value type, but the
    /// ordering on the borrowed form *must* match the ordering on the value
    /// type.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::OrderedTree;
    ///
    /// let tree = OrderedTree::from([1, 2, 3]);
    /// assert_eq!(tree.contains(&1), true);
    /// assert_eq!(tree.contains(&4), false);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.find(value).is_some()
    }

    /// Removes the value equal to `value`, if present.
    ///
    /// A node with a single child is replaced by that child. A node with two
    /// children takes the smallest value of its right subtree, which is then
    /// spliced out of that subtree. Like [`delete_min`], no rebalancing pass
    /// runs.
    ///
    /// Returns whether a value was removed.
    ///
    /// [`delete_min`]: OrderedTree::delete_min
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::EmptyTree`] if the tree has no values.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::{OrderedTree, TreeError};
    ///
    /// let mut tree = OrderedTree::from([1, 2, 3]);
    /// assert_eq!(tree.delete(&2), Ok(true));
    /// assert_eq!(tree.delete(&2), Ok(false));
    ///
    /// tree.clear();
    /// assert_eq!(tree.delete(&2), Err(TreeError::EmptyTree));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(height)
    pub fn delete<Q>(&mut self, value: &Q) -> Result<bool, TreeError>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        if self.raw.is_empty() {
            return Err(empty_tree("delete"));
        }
        let removed = self.raw.remove(value);
        if removed {
            trace!("delete spliced a node, {} values remain", self.raw.len());
        }
        Ok(removed)
    }

    /// Returns every value in `[low, high]`, in ascending order.
    ///
    /// Both bounds are inclusive. Subtrees that cannot hold a value in the
    /// range are skipped. If `low > high` the result is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::OrderedTree;
    ///
    /// let tree = OrderedTree::from([5, 3, 8, 1, 4, 7, 9]);
    /// assert_eq!(tree.range(&4, &8), [&4, &5, &7, &8]);
    /// assert!(tree.range(&8, &4).is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n + k) for k values in range.
    #[must_use]
    pub fn range<Q>(&self, low: &Q, high: &Q) -> Vec<&T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut out = Vec::new();
        self.raw.range(low, high, &mut out);
        out
    }
}

impl<T: Clone + Ord> OrderedTree<T> {
    /// Returns a new tree holding a copy of the subtree rooted at the node
    /// equal to `value`, or `None` if no such node exists.
    ///
    /// The copy is built by re-inserting the subtree's values in pre-order,
    /// so it is balanced in its own right and shares nothing with `self`.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::OrderedTree;
    ///
    /// let tree = OrderedTree::from([5, 3, 8, 1, 4, 7, 9]);
    ///
    /// let mut view = tree.search(&3).unwrap();
    /// assert_eq!(view.iter().copied().collect::<Vec<_>>(), [1, 3, 4]);
    ///
    /// view.insert(2);
    /// assert!(!tree.contains(&2));
    ///
    /// assert!(tree.search(&6).is_none());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(k log k) for a subtree of k values.
    #[must_use]
    pub fn search<Q>(&self, value: &Q) -> Option<OrderedTree<T>>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let node = self.raw.find(value)?;
        let raw = RawTree::copy_subtree(node);
        trace!("search copied a subtree of {} values", raw.len());
        Some(OrderedTree {
            raw,
        })
    }
}

fn empty_tree(operation: &str) -> TreeError {
    debug!("{operation} called on an empty tree");
    TreeError::EmptyTree
}

impl<'a, T> Iter<'a, T> {
    fn push_left_spine(&mut self, mut node: Option<&'a Node<T>>) {
        while let Some(n) = node {
            self.front.push(n);
            node = n.left.as_deref();
        }
    }

    fn push_right_spine(&mut self, mut node: Option<&'a Node<T>>) {
        while let Some(n) = node {
            self.back.push(n);
            node = n.right.as_deref();
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.front.pop()?;
        self.push_left_spine(node.right.as_deref());
        self.remaining -= 1;
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }

    fn last(mut self) -> Option<&'a T> {
        self.next_back()
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.back.pop()?;
        self.push_right_spine(node.left.as_deref());
        self.remaining -= 1;
        Some(&node.value)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            front: self.front.clone(),
            back: self.back.clone(),
            remaining: self.remaining,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<T> Default for Iter<'_, T> {
    /// Creates an empty `ordered_tree::Iter`.
    ///
    /// ```
    /// # use llrb_tree::ordered_tree;
    /// let iter: ordered_tree::Iter<'_, u8> = Default::default();
    /// assert_eq!(iter.len(), 0);
    /// ```
    fn default() -> Self {
        Iter {
            front: Vec::new(),
            back: Vec::new(),
            remaining: 0,
        }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<T> FusedIterator for IntoIter<T> {}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntoIter").field("inner", &self.inner).finish()
    }
}

impl<T> IntoIterator for OrderedTree<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    /// Gets an iterator for moving out the tree's contents in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_tree::OrderedTree;
    ///
    /// let tree = OrderedTree::from([1, 2, 3, 4]);
    ///
    /// let v: Vec<_> = tree.into_iter().collect();
    /// assert_eq!(v, [1, 2, 3, 4]);
    /// ```
    fn into_iter(self) -> IntoIter<T> {
        IntoIter {
            inner: self.raw.into_sorted_vec().into_iter(),
        }
    }
}

impl<'a, T> IntoIterator for &'a OrderedTree<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T> Default for OrderedTree<T> {
    fn default() -> Self {
        OrderedTree::new()
    }
}

impl<T: Clone> Clone for OrderedTree<T> {
    /// Clones the tree node by node, keeping its exact shape.
    fn clone(&self) -> Self {
        OrderedTree {
            raw: self.raw.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for OrderedTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

// Equality compares contents, not shape.
impl<T: PartialEq> PartialEq for OrderedTree<T> {
    fn eq(&self, other: &OrderedTree<T>) -> bool {
        self.count() == other.count() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for OrderedTree<T> {}

impl<T: Hash> Hash for OrderedTree<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.count().hash(state);
        for value in self {
            value.hash(state);
        }
    }
}

impl<T: Ord> FromIterator<T> for OrderedTree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = OrderedTree::new();
        tree.extend(iter);
        tree
    }
}

impl<T: Ord> Extend<T> for OrderedTree<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<'a, T: 'a + Ord + Copy> Extend<&'a T> for OrderedTree<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        for &value in iter {
            self.insert(value);
        }
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for OrderedTree<T> {
    /// Converts a `[T; N]` into an `OrderedTree<T>`, inserting in array order.
    ///
    /// ```
    /// use llrb_tree::OrderedTree;
    ///
    /// let tree1 = OrderedTree::from([1, 2, 3, 4]);
    /// let tree2: OrderedTree<_> = [1, 2, 3, 4].into();
    /// assert_eq!(tree1, tree2);
    /// ```
    fn from(values: [T; N]) -> Self {
        values.into_iter().collect()
    }
}
