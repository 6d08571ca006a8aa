//! An ordered map implemented with an AVL tree.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::mem;

use log::{debug, trace};

#[cfg(any(test, feature = "consistency_check"))]
use crate::error::ConsistencyError;

mod arena;
mod balance;
mod traverse;

use arena::{Arena, Link, NodeId};
pub use traverse::{Iter, LevelOrder, LevelOrderEntry, Side};

/// How far up the tree a removal re-tests the AVL condition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RemovalRebalance {
    /// Re-test every ancestor of the removed node up to the root.
    /// Keeps the tree height-balanced after every removal.
    #[default]
    FullPath,
    /// Stop at the first ancestor that needed a rotation, then re-test the root only.
    /// Ancestors between that point and the root are not re-tested and may stay
    /// out of balance; key order and cached heights stay exact.
    StopAtFirstRotation,
}

/// An ordered map implemented with an AVL tree.
///
/// ```
/// use avl_map::AvlTreeMap;
/// let mut map = AvlTreeMap::new();
/// map.insert(0, "zero");
/// map.insert(1, "one");
/// map.insert(2, "two");
/// assert_eq!(map.get(&1), Some(&"one"));
/// map.remove(&1);
/// assert!(map.get(&1).is_none());
/// ```
#[derive(Clone)]
pub struct AvlTreeMap<K, V> {
    arena: Arena<K, V>,
    root: Link,
    removal_rebalance: RemovalRebalance,
}

enum Search {
    Found(NodeId),
    Vacant { parent: Link, side: Side },
}

impl<K, V> AvlTreeMap<K, V> {
    /// Creates an empty map.
    /// No memory is allocated until the first item is inserted.
    pub fn new() -> Self {
        Self::with_removal_rebalance(RemovalRebalance::default())
    }

    /// Creates an empty map with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: Arena::with_capacity(capacity),
            root: None,
            removal_rebalance: RemovalRebalance::default(),
        }
    }

    /// Creates an empty map that rebalances after removals according to `policy`.
    pub fn with_removal_rebalance(policy: RemovalRebalance) -> Self {
        Self {
            arena: Arena::new(),
            root: None,
            removal_rebalance: policy,
        }
    }

    /// Returns the rebalancing policy applied after removals.
    pub fn removal_rebalance(&self) -> RemovalRebalance {
        self.removal_rebalance
    }

    /// Returns true if the map contains no elements.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the number of elements in the map.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Returns the height of the tree, counted in edges from the root to the deepest leaf.
    /// A map with a single element has height 0, an empty map has none.
    pub fn height(&self) -> Option<usize> {
        self.root.map(|root| self.arena[root].height)
    }

    /// Clears the map, deallocating all memory.
    pub fn clear(&mut self) {
        self.root = None;
        self.arena.clear();
    }
}

impl<K: Ord, V> AvlTreeMap<K, V> {
    /// Returns a reference to the value corresponding to the key.
    ///
    /// The key may be any borrowed form of the map's key type, but the ordering
    /// on the borrowed form *must* match the ordering on the key type.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).map(|id| &self.arena[id].value)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let id = self.find(key)?;
        Some(&mut self.arena[id].value)
    }

    /// Returns references to the key-value pair corresponding to the key.
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).map(|id| {
            let node = &self.arena[id];
            (&node.key, &node.value)
        })
    }

    /// Returns true if the map contains a value for the specified key.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).is_some()
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map already had this key present, the value is updated in place,
    /// the tree is not restructured and the old value is returned.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.search(&key) {
            Search::Found(id) => Some(mem::replace(&mut self.arena[id].value, value)),
            Search::Vacant { parent, side } => {
                let id = self.arena.create(parent, key, value);
                match (parent, side) {
                    (None, _) => self.root = Some(id),
                    (Some(parent_id), Side::Left) => self.arena[parent_id].left = Some(id),
                    (Some(parent_id), Side::Right) => self.arena[parent_id].right = Some(id),
                }
                trace!("inserted {id:?} below {parent:?}");
                self.rebalance_once(parent);
                None
            }
        }
    }

    /// Removes a key from the map.
    /// Returns the value at the key if the key was previously in the map.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Removes a key from the map.
    /// Returns the stored key and value if the key was previously in the map.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let node_id = self.find(key)?;
        let (removed_id, parent) = self.unlink_node(node_id);
        let entry = self.arena.destroy(removed_id);
        trace!("removed {removed_id:?} below {parent:?}");

        match self.removal_rebalance {
            RemovalRebalance::FullPath => self.rebalance(parent),
            RemovalRebalance::StopAtFirstRotation => {
                if let Some(rotated_at) = self.rebalance_once(parent) {
                    debug!("removal rebalancing stopped after rotation at {rotated_at:?}");
                }
            }
        }
        Some(entry)
    }

    /// Checks links, key order, cached heights, node count and the AVL condition.
    #[cfg(any(test, feature = "consistency_check"))]
    pub fn check_consistency(&self) -> Result<(), ConsistencyError> {
        self.validate(true)
    }

    /// Like [`check_consistency`](Self::check_consistency), but without the AVL condition.
    /// This is what holds after removals under [`RemovalRebalance::StopAtFirstRotation`].
    #[cfg(any(test, feature = "consistency_check"))]
    pub fn check_structure(&self) -> Result<(), ConsistencyError> {
        self.validate(false)
    }

    #[cfg(any(test, feature = "consistency_check"))]
    fn validate(&self, require_balance: bool) -> Result<(), ConsistencyError> {
        // Check root link
        if let Some(root) = self.root {
            if self.arena[root].parent.is_some() {
                return Err(ConsistencyError::RootHasParent);
            }
        }

        // Check tree nodes
        let mut num_nodes = 0;
        let mut result = Ok(());
        self.preorder(|id| {
            if result.is_ok() {
                result = self.validate_node(id, require_balance);
            }
            num_nodes += 1;
        });
        result?;

        // Check global key order
        let mut keys = self.iter().map(|(key, _)| key);
        if let Some(mut prev) = keys.next() {
            for key in keys {
                if prev >= key {
                    return Err(ConsistencyError::OrderViolation);
                }
                prev = key;
            }
        }

        // Check number of nodes
        if num_nodes != self.arena.len() {
            return Err(ConsistencyError::CountMismatch {
                counted: num_nodes,
                expected: self.arena.len(),
            });
        }
        let leaked = self
            .arena
            .num_slots()
            .saturating_sub(self.arena.len() + self.arena.num_free());
        if leaked != 0 {
            return Err(ConsistencyError::LeakedSlots { leaked });
        }
        Ok(())
    }

    #[cfg(any(test, feature = "consistency_check"))]
    fn validate_node(&self, id: NodeId, require_balance: bool) -> Result<(), ConsistencyError> {
        let node = &self.arena[id];

        // Check links for child nodes
        for (child, side) in [(node.left, Side::Left), (node.right, Side::Right)] {
            if let Some(child_id) = child {
                let child_node = &self.arena[child_id];
                if child_node.parent != Some(id) {
                    return Err(ConsistencyError::BrokenParentLink);
                }
                let ordered = match side {
                    Side::Left => child_node.key < node.key,
                    Side::Right => child_node.key > node.key,
                };
                if !ordered {
                    return Err(ConsistencyError::OrderViolation);
                }
            }
        }

        // Check height
        let left_height = self.link_height(node.left);
        let right_height = self.link_height(node.right);
        let computed = left_height.max(right_height);
        if node.height != computed {
            return Err(ConsistencyError::StaleHeight {
                cached: node.height,
                computed,
            });
        }

        // Check AVL condition (nearly balance)
        if require_balance && left_height.abs_diff(right_height) > 1 {
            return Err(ConsistencyError::Unbalanced {
                balance_factor: left_height as isize - right_height as isize,
            });
        }
        Ok(())
    }

    fn find<Q>(&self, key: &Q) -> Link
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        match self.search(key) {
            Search::Found(id) => Some(id),
            Search::Vacant { .. } => None,
        }
    }

    fn search<Q>(&self, key: &Q) -> Search
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut parent = None;
        let mut side = Side::Left;
        let mut current = self.root;
        while let Some(id) = current {
            let node = &self.arena[id];
            parent = current;
            current = match key.cmp(node.key.borrow()) {
                Ordering::Equal => return Search::Found(id),
                Ordering::Less => {
                    side = Side::Left;
                    node.left
                }
                Ordering::Greater => {
                    side = Side::Right;
                    node.right
                }
            };
        }
        Search::Vacant { parent, side }
    }

    /// Detaches the entry of `node_id` from the tree.
    ///
    /// A node with two children takes over the entry of its in-order successor
    /// (the leftmost node of its right subtree), and the successor's slot is
    /// detached instead. The detached slot has at most one child, which is
    /// spliced into its place.
    /// Returns the detached slot, now holding the removed entry, and its former parent.
    fn unlink_node(&mut self, node_id: NodeId) -> (NodeId, Link) {
        let node = &self.arena[node_id];
        let target = match (node.left, node.right) {
            (Some(_), Some(right)) => {
                let mut successor = right;
                while let Some(left) = self.arena[successor].left {
                    successor = left;
                }
                self.arena.swap_entries(node_id, successor);
                successor
            }
            _ => node_id,
        };

        let target_node = &self.arena[target];
        debug_assert!(target_node.left.is_none() || target_node.right.is_none());
        let child = target_node.left.or(target_node.right);
        let parent = target_node.parent;
        self.replace_child(parent, target, child);
        (target, parent)
    }
}

impl<K, V> Default for AvlTreeMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for AvlTreeMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for AvlTreeMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Ord, V> Extend<(K, V)> for AvlTreeMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}
