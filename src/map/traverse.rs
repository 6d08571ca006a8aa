//! Read-only walks over the tree: in-order iteration and level-order traversal.

use std::collections::VecDeque;
use std::iter::FusedIterator;

use super::arena::{Link, NodeId};
use super::AvlTreeMap;

/// Which child slot of its parent a node occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

/// A node visited by a level-order traversal.
///
/// Carries enough structure (depth and side) for a consumer to lay the tree out
/// level by level without access to the tree's internals.
#[derive(Debug, PartialEq, Eq)]
pub struct LevelOrderEntry<'a, K, V> {
    pub key: &'a K,
    pub value: &'a V,
    /// Height of the subtree rooted at this node, 0 for a leaf.
    pub height: usize,
    /// Distance from the root, 0 for the root itself.
    pub depth: usize,
    /// Side of the parent this node hangs on; `None` for the root.
    pub side: Option<Side>,
}

/// A breadth-first iterator over the entries of a map.
///
/// This `struct` is created by the [`level_order`] method on [`AvlTreeMap`].
///
/// [`AvlTreeMap`]: struct.AvlTreeMap.html
/// [`level_order`]: struct.AvlTreeMap.html#method.level_order
pub struct LevelOrder<'a, K, V> {
    map: &'a AvlTreeMap<K, V>,
    queue: VecDeque<(NodeId, usize, Option<Side>)>,
    remaining: usize,
}

/// An iterator over the entries of a map, sorted by key.
pub struct Iter<'a, K, V> {
    map: &'a AvlTreeMap<K, V>,
    cursor: Link,
    dir: Direction,
    remaining: usize,
}

#[derive(Clone, Copy)]
#[allow(clippy::enum_variant_names)]
enum Direction {
    FromParent,
    FromLeft,
    FromRight,
}

impl<K, V> AvlTreeMap<K, V> {
    /// Gets an iterator over the entries of the map in breadth-first order,
    /// starting at the root and visiting each level from left to right.
    ///
    /// ```
    /// use avl_map::AvlTreeMap;
    /// let map: AvlTreeMap<_, _> = (1..=3).map(|k| (k, k * 10)).collect();
    /// let keys: Vec<_> = map.level_order().map(|entry| *entry.key).collect();
    /// assert_eq!(keys, [2, 1, 3]);
    /// ```
    pub fn level_order(&self) -> LevelOrder<'_, K, V> {
        let mut queue = VecDeque::new();
        if let Some(root) = self.root {
            queue.push_back((root, 0, None));
        }
        LevelOrder {
            map: self,
            queue,
            remaining: self.len(),
        }
    }

    /// Calls `f` on every key-value pair in breadth-first order.
    pub fn traverse_level_order<F: FnMut(&K, &V)>(&self, mut f: F) {
        for entry in self.level_order() {
            f(entry.key, entry.value);
        }
    }

    /// Gets an iterator over the entries of the map, sorted by key.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            map: self,
            cursor: self.root,
            dir: Direction::FromParent,
            remaining: self.len(),
        }
    }

    /// Calls `f` on every node before its children, left subtree first.
    #[cfg(any(test, feature = "consistency_check"))]
    pub(super) fn preorder<F: FnMut(NodeId)>(&self, mut f: F) {
        let mut stack: Vec<NodeId> = self.root.into_iter().collect();
        while let Some(id) = stack.pop() {
            f(id);
            let node = &self.arena[id];
            stack.extend(node.right);
            stack.extend(node.left);
        }
    }
}

impl<'a, K, V> Iterator for LevelOrder<'a, K, V> {
    type Item = LevelOrderEntry<'a, K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let (id, depth, side) = self.queue.pop_front()?;
        let node = &self.map.arena[id];
        if let Some(left) = node.left {
            self.queue.push_back((left, depth + 1, Some(Side::Left)));
        }
        if let Some(right) = node.right {
            self.queue.push_back((right, depth + 1, Some(Side::Right)));
        }
        self.remaining -= 1;
        Some(LevelOrderEntry {
            key: &node.key,
            value: &node.value,
            height: node.height,
            depth,
            side,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for LevelOrder<'_, K, V> {}

impl<K, V> Clone for LevelOrder<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            map: self.map,
            queue: self.queue.clone(),
            remaining: self.remaining,
        }
    }
}

impl<K, V> Clone for LevelOrderEntry<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for LevelOrderEntry<'_, K, V> {}

impl<K, V> FusedIterator for LevelOrder<'_, K, V> {}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let map = self.map;
        while let Some(id) = self.cursor {
            let node = &map.arena[id];
            match self.dir {
                Direction::FromParent => {
                    if let Some(left) = node.left {
                        self.cursor = Some(left);
                    } else {
                        self.dir = Direction::FromLeft;
                    }
                }
                Direction::FromLeft => {
                    if let Some(right) = node.right {
                        self.cursor = Some(right);
                        self.dir = Direction::FromParent;
                    } else {
                        self.dir = Direction::FromRight;
                    }
                    self.remaining -= 1;
                    return Some((&node.key, &node.value));
                }
                Direction::FromRight => {
                    if let Some(parent) = node.parent {
                        if map.arena[parent].left == Some(id) {
                            self.dir = Direction::FromLeft;
                        } else {
                            self.dir = Direction::FromRight;
                        }
                    }
                    self.cursor = node.parent;
                }
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            map: self.map,
            cursor: self.cursor,
            dir: self.dir,
            remaining: self.remaining,
        }
    }
}

impl<'a, K, V> IntoIterator for &'a AvlTreeMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
