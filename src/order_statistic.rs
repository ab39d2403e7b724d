/// A zero-based rank into the sorted order of an [`OrderedTree`](crate::OrderedTree).
///
/// # Examples
///
/// ```
/// use llrb_tree::{OrderedTree, Rank};
///
/// let tree = OrderedTree::from([30, 10, 20]);
///
/// assert_eq!(tree[Rank(0)], 10);
/// assert_eq!(tree[Rank(2)], 30);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Rank(pub usize);
