//! Order-statistic left-leaning red-black tree for Rust.
//!
//! This crate provides [`OrderedTree`], an ordered set of unique values backed
//! by a left-leaning red-black tree (LLRB) whose nodes track subtree sizes.
//! Besides membership and ordered iteration it answers order-statistic queries
//! in O(log n):
//!
//! - [`rank`](OrderedTree::rank) - Count the values strictly less than a value
//! - [`select`](OrderedTree::select) - Get the value at a given sorted position
//! - [`floor`](OrderedTree::floor) / [`ceiling`](OrderedTree::ceiling) - Step one rank down or up
//! - [`range`](OrderedTree::range) - Collect every value inside inclusive bounds
//! - Indexing by [`Rank`] - e.g., `tree[Rank(0)]` for the smallest value
//!
//! # Example
//!
//! ```
//! use llrb_tree::{OrderedTree, Rank, TreeError};
//!
//! let mut tree = OrderedTree::new();
//! for value in [5, 3, 8, 1, 4, 7, 9] {
//!     tree.insert(value);
//! }
//!
//! assert_eq!(tree.count(), 7);
//! assert_eq!(tree.rank(&7), 4);
//! assert_eq!(tree[Rank(0)], 1);
//! assert_eq!(tree.range(&4, &8), [&4, &5, &7, &8]);
//!
//! // An independent copy of the subtree rooted at 8.
//! let view = tree.search(&8).unwrap();
//! assert_eq!(view.iter().copied().collect::<Vec<_>>(), [7, 8, 9]);
//!
//! assert_eq!(tree.delete_min(), Ok(1));
//! assert_eq!(OrderedTree::<i32>::new().delete_min(), Err(TreeError::EmptyTree));
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **`serde`** - Optional `Serialize`/`Deserialize` as an ascending sequence
//!
//! # Implementation
//!
//! Insertion follows the classic LLRB scheme: a new value becomes a red leaf
//! and, on the way back up, right-leaning red links are rotated left, two
//! reds in a row are rotated right, and 4-nodes are split by a color flip.
//! Deletions splice nodes out without pushing red links down first, so they
//! keep ordering and subtree sizes exact but may leave the black height
//! uneven. [`OrderedTree::black_height`] reports when that has happened.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Unpublished: there is no repository URL to point at yet.
#![allow(clippy::cargo_common_metadata)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod error;
mod order_statistic;
mod raw;

pub mod ordered_tree;

pub use error::TreeError;
pub use order_statistic::Rank;
pub use ordered_tree::OrderedTree;
