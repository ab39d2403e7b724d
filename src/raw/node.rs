use alloc::boxed::Box;

/// Owned child slot. A node exclusively owns both of its subtrees.
pub(crate) type Link<T> = Option<Box<Node<T>>>;

/// Color of the link from a node's parent to the node.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Color {
    Red,
    Black,
}

#[derive(Clone)]
pub(crate) struct Node<T> {
    pub(crate) value: T,
    pub(crate) left: Link<T>,
    pub(crate) right: Link<T>,
    pub(crate) color: Color,
    // The number of values in the subtree rooted at this node.
    size: usize,
}

impl<T> Node<T> {
    /// Creates a new red leaf holding `value`.
    pub(crate) fn new_red(value: T) -> Box<Self> {
        Box::new(Self {
            value,
            left: None,
            right: None,
            color: Color::Red,
            size: 1,
        })
    }

    /// Returns the number of values in the subtree rooted at this node.
    #[inline]
    pub(crate) fn size(&self) -> usize {
        self.size
    }

    /// Recalculates the subtree size from the children.
    #[inline]
    pub(crate) fn update_size(&mut self) {
        self.size = 1 + size(self.left.as_deref()) + size(self.right.as_deref());
    }

    #[inline]
    pub(crate) fn is_red(&self) -> bool {
        self.color == Color::Red
    }
}

/// Size of an optional subtree; absent subtrees count zero.
#[inline]
pub(crate) fn size<T>(node: Option<&Node<T>>) -> usize {
    node.map_or(0, Node::size)
}

/// Absent links are black.
#[inline]
pub(crate) fn is_red<T>(node: Option<&Node<T>>) -> bool {
    node.is_some_and(Node::is_red)
}

//              (c)                       (c)
//               |                         |
//              node                       x
//              /  \                      / \
//             /    (r)                 (r)  \
//            /       \                 /     \
//          left       x             node      xr
//                    / \            /  \
//                  xl   xr       left   xl
//
/// Turns a right-leaning red link into a left-leaning one.
///
/// Returns `node` unchanged if it has no right child.
pub(crate) fn rotate_left<T>(mut node: Box<Node<T>>) -> Box<Node<T>> {
    let Some(mut x) = node.right.take() else {
        return node;
    };
    node.right = x.left.take();
    x.color = node.color;
    node.color = Color::Red;
    node.update_size();
    x.left = Some(node);
    x.update_size();
    x
}

//              (c)                       (c)
//               |                         |
//              node                       x
//              /  \                      / \
//            (r)   \                   (r)  \
//           /       \                 /      \
//          x       right             xl      node
//         / \                                / \
//       xl   xr                             xr  right
//
/// Turns a left-leaning red link into a right-leaning one.
///
/// Returns `node` unchanged if it has no left child.
pub(crate) fn rotate_right<T>(mut node: Box<Node<T>>) -> Box<Node<T>> {
    let Some(mut x) = node.left.take() else {
        return node;
    };
    node.left = x.right.take();
    x.color = node.color;
    node.color = Color::Red;
    node.update_size();
    x.right = Some(node);
    x.update_size();
    x
}

/// Splits a temporary 4-node: both children turn black and the red link
/// moves up to `node`.
pub(crate) fn flip_colors<T>(node: &mut Node<T>) {
    if let Some(left) = node.left.as_deref_mut() {
        left.color = Color::Black;
    }
    if let Some(right) = node.right.as_deref_mut() {
        right.color = Color::Black;
    }
    node.color = Color::Red;
}

/// Applies the three insertion passes, in order, then refreshes `size`.
pub(crate) fn balance<T>(mut node: Box<Node<T>>) -> Box<Node<T>> {
    if is_red(node.right.as_deref()) && !is_red(node.left.as_deref()) {
        node = rotate_left(node);
    }
    if is_red(node.left.as_deref()) && is_red(node.left.as_ref().and_then(|left| left.left.as_deref())) {
        node = rotate_right(node);
    }
    if is_red(node.left.as_deref()) && is_red(node.right.as_deref()) {
        flip_colors(&mut node);
    }
    node.update_size();
    node
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use static_assertions::assert_eq_size;

    // Child slots use the null-pointer niche.
    assert_eq_size!(Link<u64>, Box<Node<u64>>);
    assert_eq_size!(Color, u8);

    fn leaf(value: i32, color: Color) -> Box<Node<i32>> {
        let mut node = Node::new_red(value);
        node.color = color;
        node
    }

    #[test]
    fn new_node_is_red_leaf() {
        let node = Node::new_red(7);
        assert!(node.is_red());
        assert_eq!(node.size(), 1);
        assert!(node.left.is_none());
        assert!(node.right.is_none());
    }

    #[test]
    fn absent_links_are_black_and_empty() {
        assert!(!is_red::<i32>(None));
        assert_eq!(size::<i32>(None), 0);
    }

    #[test]
    fn rotate_left_moves_red_link_to_the_left() {
        let mut node = leaf(1, Color::Black);
        node.right = Some(leaf(2, Color::Red));
        node.update_size();

        let root = rotate_left(node);
        assert_eq!(root.value, 2);
        assert_eq!(root.color, Color::Black);
        assert_eq!(root.size(), 2);
        let left = root.left.as_deref().unwrap();
        assert_eq!(left.value, 1);
        assert!(left.is_red());
        assert_eq!(left.size(), 1);
        assert!(root.right.is_none());
    }

    #[test]
    fn rotate_right_keeps_inner_subtree() {
        // 30 -> (2 -> (1, 25)); rotating right makes 2 the root and hands
        // 25 over to 30.
        let mut inner = leaf(2, Color::Red);
        inner.left = Some(leaf(1, Color::Red));
        inner.right = Some(leaf(25, Color::Black));
        inner.update_size();
        let mut node = leaf(30, Color::Black);
        node.left = Some(inner);
        node.update_size();

        let root = rotate_right(node);
        assert_eq!(root.value, 2);
        assert_eq!(root.color, Color::Black);
        assert_eq!(root.size(), 4);
        let right = root.right.as_deref().unwrap();
        assert_eq!(right.value, 30);
        assert!(right.is_red());
        assert_eq!(right.size(), 2);
        assert_eq!(right.left.as_deref().unwrap().value, 25);
    }

    #[test]
    fn rotation_without_child_is_identity() {
        let node = rotate_left(leaf(1, Color::Black));
        assert_eq!(node.value, 1);
        let node = rotate_right(node);
        assert_eq!(node.value, 1);
        assert_eq!(node.size(), 1);
    }

    #[test]
    fn flip_colors_pushes_red_up() {
        let mut node = leaf(2, Color::Black);
        node.left = Some(leaf(1, Color::Red));
        node.right = Some(leaf(3, Color::Red));
        flip_colors(&mut node);
        assert!(node.is_red());
        assert!(!node.left.as_deref().unwrap().is_red());
        assert!(!node.right.as_deref().unwrap().is_red());
    }

    #[test]
    fn balance_splits_left_leaning_chain() {
        // 3 -> red 2 -> red 1: rotate right, then split the 4-node.
        let mut two = leaf(2, Color::Red);
        two.left = Some(leaf(1, Color::Red));
        two.update_size();
        let mut three = leaf(3, Color::Black);
        three.left = Some(two);

        let root = balance(three);
        assert_eq!(root.value, 2);
        assert_eq!(root.size(), 3);
        assert!(root.is_red());
        assert_eq!(root.left.as_deref().unwrap().color, Color::Black);
        assert_eq!(root.right.as_deref().unwrap().color, Color::Black);
        assert_eq!(root.right.as_deref().unwrap().size(), 1);
    }

    #[test]
    fn balance_leans_single_right_red_left() {
        let mut one = leaf(1, Color::Black);
        one.right = Some(leaf(2, Color::Red));

        let root = balance(one);
        assert_eq!(root.value, 2);
        assert_eq!(root.color, Color::Black);
        assert_eq!(root.size(), 2);
        assert!(is_red(root.left.as_deref()));
    }
}
