use core::borrow::Borrow;
use core::cmp::Ordering::{Equal, Greater, Less};

use alloc::boxed::Box;
use alloc::vec::Vec;

use super::node::{Color, Link, Node, balance, size};

/// The recursive LLRB engine backing `OrderedTree`.
pub(crate) struct RawTree<T> {
    /// The root node, if the tree is non-empty. It owns every other node.
    root: Link<T>,
}

impl<T> RawTree<T> {
    /// Creates a new, empty tree.
    pub(crate) const fn new() -> Self {
        Self {
            root: None,
        }
    }

    /// Returns the number of values in the tree.
    pub(crate) fn len(&self) -> usize {
        size(self.root.as_deref())
    }

    /// Returns true if the tree contains no values.
    pub(crate) const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Drops every node.
    pub(crate) fn clear(&mut self) {
        self.root = None;
    }

    /// Returns the root node, if any.
    pub(crate) fn root(&self) -> Option<&Node<T>> {
        self.root.as_deref()
    }

    /// Returns the leftmost value.
    pub(crate) fn first(&self) -> Option<&T> {
        let mut node = self.root.as_deref()?;
        while let Some(left) = node.left.as_deref() {
            node = left;
        }
        Some(&node.value)
    }

    /// Returns the rightmost value.
    pub(crate) fn last(&self) -> Option<&T> {
        let mut node = self.root.as_deref()?;
        while let Some(right) = node.right.as_deref() {
            node = right;
        }
        Some(&node.value)
    }

    /// Removes and returns the smallest value by splicing the leftmost node.
    pub(crate) fn pop_first(&mut self) -> Option<T> {
        let root = self.root.take()?;
        let (root, min) = Self::take_min(root);
        self.root = root;
        Some(min)
    }

    /// Removes and returns the largest value by splicing the rightmost node.
    pub(crate) fn pop_last(&mut self) -> Option<T> {
        let root = self.root.take()?;
        let (root, max) = Self::take_max(root);
        self.root = root;
        Some(max)
    }

    /// Returns the value at zero-based position `rank` in sorted order.
    pub(crate) fn select(&self, mut rank: usize) -> Option<&T> {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            let left_size = size(node.left.as_deref());
            match rank.cmp(&left_size) {
                Equal => return Some(&node.value),
                Less => current = node.left.as_deref(),
                Greater => {
                    rank -= left_size + 1;
                    current = node.right.as_deref();
                }
            }
        }
        None
    }

    /// Calls `visitor` once per value in ascending order.
    pub(crate) fn each_in_order<'a, F>(&'a self, mut visitor: F)
    where
        F: FnMut(&'a T),
    {
        Self::walk_in_order(self.root.as_deref(), &mut visitor);
    }

    /// Consumes the tree, returning its values in ascending order.
    pub(crate) fn into_sorted_vec(mut self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.len());
        Self::drain_in_order(self.root.take(), &mut out);
        out
    }

    /// Returns the number of nodes on the longest root-to-leaf path.
    pub(crate) fn height(&self) -> usize {
        Self::subtree_height(self.root.as_deref())
    }

    /// Returns the number of black nodes on every root-to-null path, counting
    /// the root as black, or `None` if two paths disagree.
    pub(crate) fn black_height(&self) -> Option<usize> {
        let Some(root) = self.root.as_deref() else {
            return Some(0);
        };
        let left = Self::subtree_black_height(root.left.as_deref())?;
        let right = Self::subtree_black_height(root.right.as_deref())?;
        (left == right).then_some(left + 1)
    }

    // Splices out the leftmost node of `node`'s subtree, replacing it with its
    // right child. There is no red-link pushdown on the way down.
    fn take_min(mut node: Box<Node<T>>) -> (Link<T>, T) {
        match node.left.take() {
            None => {
                let node = *node;
                (node.right, node.value)
            }
            Some(left) => {
                let (left, min) = Self::take_min(left);
                node.left = left;
                node.update_size();
                (Some(node), min)
            }
        }
    }

    fn take_max(mut node: Box<Node<T>>) -> (Link<T>, T) {
        match node.right.take() {
            None => {
                let node = *node;
                (node.left, node.value)
            }
            Some(right) => {
                let (right, max) = Self::take_max(right);
                node.right = right;
                node.update_size();
                (Some(node), max)
            }
        }
    }

    fn walk_in_order<'a, F>(node: Option<&'a Node<T>>, visitor: &mut F)
    where
        F: FnMut(&'a T),
    {
        if let Some(node) = node {
            Self::walk_in_order(node.left.as_deref(), visitor);
            visitor(&node.value);
            Self::walk_in_order(node.right.as_deref(), visitor);
        }
    }

    fn drain_in_order(node: Link<T>, out: &mut Vec<T>) {
        if let Some(node) = node {
            let Node {
                value,
                left,
                right,
                ..
            } = *node;
            Self::drain_in_order(left, out);
            out.push(value);
            Self::drain_in_order(right, out);
        }
    }

    fn subtree_height(node: Option<&Node<T>>) -> usize {
        node.map_or(0, |node| {
            1 + Self::subtree_height(node.left.as_deref()).max(Self::subtree_height(node.right.as_deref()))
        })
    }

    fn subtree_black_height(node: Option<&Node<T>>) -> Option<usize> {
        let Some(node) = node else {
            return Some(0);
        };
        let left = Self::subtree_black_height(node.left.as_deref())?;
        let right = Self::subtree_black_height(node.right.as_deref())?;
        if left != right {
            return None;
        }
        Some(left + usize::from(!node.is_red()))
    }
}

impl<T: Ord> RawTree<T> {
    /// Finds the node holding `value`.
    pub(crate) fn find<Q>(&self, value: &Q) -> Option<&Node<T>>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            current = match value.cmp(node.value.borrow()) {
                Less => node.left.as_deref(),
                Greater => node.right.as_deref(),
                Equal => return Some(node),
            };
        }
        None
    }

    /// Inserts `value`, rebalancing on the way back up. Returns `false` if an
    /// equal value was already present; the tree keeps the existing value.
    pub(crate) fn insert(&mut self, value: T) -> bool {
        let mut inserted = false;
        let mut root = Self::insert_into(self.root.take(), value, &mut inserted);
        root.color = Color::Black;
        self.root = Some(root);
        inserted
    }

    /// Removes `value` if present. Returns whether a node was removed.
    pub(crate) fn remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut removed = false;
        self.root = Self::remove_from(self.root.take(), value, &mut removed);
        removed
    }

    /// Counts the values strictly less than `value`.
    pub(crate) fn rank<Q>(&self, value: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut rank = 0;
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            match value.cmp(node.value.borrow()) {
                Less => current = node.left.as_deref(),
                Greater => {
                    rank += 1 + size(node.left.as_deref());
                    current = node.right.as_deref();
                }
                Equal => return rank + size(node.left.as_deref()),
            }
        }
        rank
    }

    /// Collects every value in `[low, high]` in ascending order.
    pub(crate) fn range<'a, Q>(&'a self, low: &Q, high: &Q, out: &mut Vec<&'a T>)
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        Self::collect_range(self.root.as_deref(), low, high, out);
    }

    fn insert_into(node: Link<T>, value: T, inserted: &mut bool) -> Box<Node<T>> {
        let Some(mut node) = node else {
            *inserted = true;
            return Node::new_red(value);
        };
        match value.cmp(&node.value) {
            Less => node.left = Some(Self::insert_into(node.left.take(), value, inserted)),
            Greater => node.right = Some(Self::insert_into(node.right.take(), value, inserted)),
            Equal => {}
        }
        balance(node)
    }

    fn remove_from<Q>(node: Link<T>, value: &Q, removed: &mut bool) -> Link<T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut node = node?;
        match value.cmp(node.value.borrow()) {
            Less => node.left = Self::remove_from(node.left.take(), value, removed),
            Greater => node.right = Self::remove_from(node.right.take(), value, removed),
            Equal => {
                *removed = true;
                match (node.left.take(), node.right.take()) {
                    (left, None) => return left,
                    (None, right) => return right,
                    (Some(left), Some(right)) => {
                        // Two children: the successor's value moves up and the
                        // node keeps its color and left subtree.
                        let (right, successor) = Self::take_min(right);
                        node.value = successor;
                        node.left = Some(left);
                        node.right = right;
                    }
                }
            }
        }
        node.update_size();
        Some(node)
    }

    fn collect_range<'a, Q>(node: Option<&'a Node<T>>, low: &Q, high: &Q, out: &mut Vec<&'a T>)
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let Some(node) = node else {
            return;
        };
        let value = node.value.borrow();
        let low_cmp = low.cmp(value);
        let high_cmp = high.cmp(value);

        if low_cmp == Less {
            Self::collect_range(node.left.as_deref(), low, high, out);
        }
        if low_cmp != Greater && high_cmp != Less {
            out.push(&node.value);
        }
        if high_cmp == Greater {
            Self::collect_range(node.right.as_deref(), low, high, out);
        }
    }
}

impl<T: Clone + Ord> RawTree<T> {
    /// Builds an independent tree from the subtree rooted at `node` by
    /// re-inserting its values in pre-order.
    pub(crate) fn copy_subtree(node: &Node<T>) -> Self {
        let mut tree = Self::new();
        tree.pre_order_insert(node);
        tree
    }

    fn pre_order_insert(&mut self, node: &Node<T>) {
        self.insert(node.value.clone());
        if let Some(left) = node.left.as_deref() {
            self.pre_order_insert(left);
        }
        if let Some(right) = node.right.as_deref() {
            self.pre_order_insert(right);
        }
    }
}

impl<T: Clone> Clone for RawTree<T> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::raw::node::is_red;
    use alloc::format;
    use alloc::string::String;
    use proptest::prelude::*;

    impl<T: Ord + core::fmt::Debug> RawTree<T> {
        /// Validates ordering and size bookkeeping. These hold after any
        /// sequence of operations.
        pub(crate) fn validate_order_and_sizes(&self) {
            let mut errors: Vec<String> = Vec::new();
            Self::check_subtree(self.root.as_deref(), None, None, &mut errors);
            assert!(errors.is_empty(), "tree invariant violations:\n{}", errors.join("\n"));
        }

        /// Validates the full LLRB shape: ordering, sizes, left-leaning reds,
        /// no consecutive reds and uniform black height. Only guaranteed for
        /// trees built by insertion alone.
        pub(crate) fn validate_invariants(&self) {
            self.validate_order_and_sizes();
            if let Some(root) = self.root.as_deref() {
                assert_eq!(root.color, Color::Black, "root must be black");
                Self::check_colors(root);
            }
            assert!(self.black_height().is_some(), "black height is not uniform");
        }

        fn check_subtree(node: Option<&Node<T>>, low: Option<&T>, high: Option<&T>, errors: &mut Vec<String>) -> usize {
            let Some(node) = node else {
                return 0;
            };
            if let Some(low) = low {
                if node.value <= *low {
                    errors.push(format!("{:?} is not greater than ancestor {:?}", node.value, low));
                }
            }
            if let Some(high) = high {
                if node.value >= *high {
                    errors.push(format!("{:?} is not less than ancestor {:?}", node.value, high));
                }
            }
            let left = Self::check_subtree(node.left.as_deref(), low, Some(&node.value), errors);
            let right = Self::check_subtree(node.right.as_deref(), Some(&node.value), high, errors);
            let expected = 1 + left + right;
            if node.size() != expected {
                errors.push(format!("size of {:?} is {} but subtree holds {}", node.value, node.size(), expected));
            }
            expected
        }

        fn check_colors(node: &Node<T>) {
            assert!(!is_red(node.right.as_deref()), "red right link below {:?}", node.value);
            if node.is_red() {
                assert!(!is_red(node.left.as_deref()), "consecutive red links below {:?}", node.value);
            }
            if let Some(left) = node.left.as_deref() {
                Self::check_colors(left);
            }
            if let Some(right) = node.right.as_deref() {
                Self::check_colors(right);
            }
        }
    }

    fn in_order<T: Clone>(tree: &RawTree<T>) -> Vec<T> {
        let mut out = Vec::new();
        tree.each_in_order(|v| out.push(v.clone()));
        out
    }

    // 2 * log2(n + 1), rounded up.
    fn height_bound(len: usize) -> usize {
        2 * (usize::BITS - (len + 1).leading_zeros()) as usize
    }

    fn from_values(values: &[i32]) -> RawTree<i32> {
        let mut tree = RawTree::new();
        for &v in values {
            tree.insert(v);
        }
        tree
    }

    #[test]
    fn empty_tree() {
        let tree: RawTree<i32> = RawTree::new();
        assert_eq!(tree.len(), 0);
        assert!(tree.is_empty());
        assert_eq!(tree.height(), 0);
        assert_eq!(tree.black_height(), Some(0));
        assert!(tree.first().is_none());
        assert!(tree.select(0).is_none());
        assert_eq!(tree.rank(&10), 0);
    }

    #[test]
    fn ascending_inserts_stay_balanced() {
        let mut tree = RawTree::new();
        for v in 0..1024 {
            assert!(tree.insert(v));
            tree.validate_invariants();
        }
        assert_eq!(tree.len(), 1024);
        assert!(tree.height() <= height_bound(1024), "height {}", tree.height());
    }

    #[test]
    fn descending_inserts_stay_balanced() {
        let mut tree = RawTree::new();
        for v in (0..1024).rev() {
            tree.insert(v);
        }
        tree.validate_invariants();
        assert!(tree.height() <= height_bound(1024), "height {}", tree.height());
    }

    #[test]
    fn duplicate_insert_is_noop() {
        let mut tree = from_values(&[2, 1, 3]);
        assert!(!tree.insert(2));
        assert_eq!(tree.len(), 3);
        assert_eq!(in_order(&tree), [1, 2, 3]);
        tree.validate_invariants();
    }

    #[test]
    fn three_ascending_values_split_into_black_children() {
        let tree = from_values(&[1, 2, 3]);
        let root = tree.root().unwrap();
        assert_eq!(root.value, 2);
        assert_eq!(root.color, Color::Black);
        assert_eq!(root.left.as_deref().unwrap().color, Color::Black);
        assert_eq!(root.right.as_deref().unwrap().color, Color::Black);
        assert_eq!(tree.black_height(), Some(2));
    }

    #[test]
    fn remove_two_child_node_takes_successor() {
        let mut tree = from_values(&[5, 3, 8, 1, 4, 7, 9]);
        let root_before = tree.root().unwrap().value;
        assert!(tree.remove(&root_before));
        assert_eq!(tree.len(), 6);
        tree.validate_order_and_sizes();
        assert!(!tree.remove(&root_before));
        assert_eq!(tree.len(), 6);
    }

    #[test]
    fn remove_missing_value_leaves_tree_intact() {
        let mut tree = from_values(&[5, 3, 8]);
        assert!(!tree.remove(&42));
        assert_eq!(in_order(&tree), [3, 5, 8]);
        tree.validate_invariants();
    }

    #[test]
    fn pop_first_splices_without_rebalancing() {
        let mut tree = from_values(&[1, 2, 3]);
        assert_eq!(tree.pop_first(), Some(1));
        tree.validate_order_and_sizes();
        // The left path under the root lost its black node.
        assert_eq!(tree.black_height(), None);
        assert_eq!(in_order(&tree), [2, 3]);
    }

    #[test]
    fn pop_last_returns_maximum() {
        let mut tree = from_values(&[4, 2, 6, 1, 3, 5, 7]);
        assert_eq!(tree.pop_last(), Some(7));
        assert_eq!(tree.last(), Some(&6));
        assert_eq!(tree.len(), 6);
        tree.validate_order_and_sizes();
    }

    #[test]
    fn range_prunes_but_keeps_bounds_inclusive() {
        let tree = from_values(&[5, 3, 8, 1, 4, 7, 9]);
        let mut out = Vec::new();
        tree.range(&4, &8, &mut out);
        assert_eq!(out, [&4, &5, &7, &8]);

        out.clear();
        tree.range(&8, &4, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn copy_subtree_is_independent() {
        let tree = from_values(&[5, 3, 8, 1, 4, 7, 9]);
        let node = tree.find(&3).unwrap();
        let mut copy = RawTree::copy_subtree(node);
        copy.validate_invariants();
        // 3 roots the black subtree {1, 3, 4}.
        assert_eq!(in_order(&copy), [1, 3, 4]);
        copy.insert(100);
        assert!(tree.find(&100).is_none());
    }

    #[test]
    fn into_sorted_vec_drains_everything() {
        let tree = from_values(&[9, 1, 8, 2, 7, 3]);
        assert_eq!(tree.into_sorted_vec(), [1, 2, 3, 7, 8, 9]);
    }

    proptest! {
        #[test]
        fn inserts_preserve_llrb_shape(values in proptest::collection::vec(-500i32..500, 0..400)) {
            let tree = from_values(&values);
            tree.validate_invariants();
            prop_assert!(tree.height() <= height_bound(tree.len()));
        }

        #[test]
        fn removals_never_grow_height(
            values in proptest::collection::vec(-500i32..500, 1..400),
            removals in proptest::collection::vec(-500i32..500, 0..200),
        ) {
            let mut tree = from_values(&values);
            for value in &removals {
                let height = tree.height();
                let len = tree.len();
                let removed = tree.remove(value);
                prop_assert!(tree.height() <= height);
                prop_assert_eq!(tree.len(), len - usize::from(removed));
                tree.validate_order_and_sizes();
            }
        }

        #[test]
        fn rank_and_select_agree(values in proptest::collection::vec(-500i32..500, 0..400)) {
            let tree = from_values(&values);
            for r in 0..tree.len() {
                let value = tree.select(r).unwrap();
                prop_assert_eq!(tree.rank(value), r);
            }
            prop_assert!(tree.select(tree.len()).is_none());
        }
    }
}
