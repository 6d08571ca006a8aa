//! An ordered map implemented with an AVL tree.
//!
//! Nodes live in an arena and refer to each other by index, so the tree keeps
//! parent links for upward walks without reference cycles or `unsafe`.
//! After every insert or removal the cached subtree heights on the path to the
//! root are fixed up and the AVL condition (subtree heights of every node
//! differ by at most one) is restored with single or double rotations.
//!
//! Besides the usual sorted iteration, [`AvlTreeMap::level_order`] walks the
//! tree breadth-first and reports each node's height, depth and side, which is
//! all a renderer needs to lay the tree out.
//!
//! ```
//! use avl_map::AvlTreeMap;
//! let mut map = AvlTreeMap::new();
//! for key in [5, 3, 8, 1, 4, 7, 9] {
//!     map.insert(key, key * 100);
//! }
//! assert_eq!(map.height(), Some(2));
//! assert_eq!(map.remove(&5), Some(500));
//! assert_eq!(map.level_order().next().map(|entry| *entry.key), Some(7));
//! ```

mod error;
mod map;

pub use error::ConsistencyError;
pub use map::{AvlTreeMap, Iter, LevelOrder, LevelOrderEntry, RemovalRebalance, Side};

#[cfg(test)]
mod proptests;
