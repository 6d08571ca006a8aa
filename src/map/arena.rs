//! Index-addressed node storage for the AVL tree.

use std::fmt;
use std::mem;
use std::ops::{Index, IndexMut};

/// Position of a node in the arena.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(usize);

impl NodeId {
    fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A child or parent slot. `None` is an absent node.
pub(crate) type Link = Option<NodeId>;

#[derive(Clone)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) parent: Link,
    pub(crate) left: Link,
    pub(crate) right: Link,
    /// Height of the subtree rooted here; 0 for a leaf.
    pub(crate) height: usize,
}

#[derive(Clone)]
enum Slot<K, V> {
    Occupied(Node<K, V>),
    Vacant { next_free: Link },
}

#[derive(Clone)]
pub(crate) struct Arena<K, V> {
    slots: Vec<Slot<K, V>>,
    free_head: Link,
    num_nodes: usize,
}

impl<K, V> Arena<K, V> {
    pub(crate) fn new() -> Self {
        Self::with_capacity(0)
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_head: None,
            num_nodes: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.num_nodes
    }

    /// Number of slots ever handed out, live or recycled.
    #[cfg(any(test, feature = "consistency_check"))]
    pub(crate) fn num_slots(&self) -> usize {
        self.slots.len()
    }

    #[cfg(any(test, feature = "consistency_check"))]
    pub(crate) fn num_free(&self) -> usize {
        let mut count = 0;
        let mut current = self.free_head;
        while let Some(id) = current {
            current = match self.slots[id.index()] {
                Slot::Vacant { next_free } => next_free,
                Slot::Occupied(_) => panic!("free list points at live node {id:?}"),
            };
            count += 1;
        }
        count
    }

    /// Materializes a present leaf hanging off `parent`.
    pub(crate) fn create(&mut self, parent: Link, key: K, value: V) -> NodeId {
        let node = Node {
            key,
            value,
            parent,
            left: None,
            right: None,
            height: 0,
        };
        self.num_nodes += 1;
        match self.free_head {
            Some(id) => {
                let slot = mem::replace(&mut self.slots[id.index()], Slot::Occupied(node));
                match slot {
                    Slot::Vacant { next_free } => self.free_head = next_free,
                    Slot::Occupied(_) => unreachable!("free list points at live node {id:?}"),
                }
                id
            }
            None => {
                self.slots.push(Slot::Occupied(node));
                NodeId(self.slots.len() - 1)
            }
        }
    }

    /// Reverts a node to absent and returns its entry.
    /// The caller must have unlinked it from the tree.
    pub(crate) fn destroy(&mut self, id: NodeId) -> (K, V) {
        let vacant = Slot::Vacant {
            next_free: self.free_head,
        };
        match mem::replace(&mut self.slots[id.index()], vacant) {
            Slot::Occupied(node) => {
                self.free_head = Some(id);
                self.num_nodes -= 1;
                (node.key, node.value)
            }
            Slot::Vacant { .. } => panic!("node {id:?} destroyed twice"),
        }
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free_head = None;
        self.num_nodes = 0;
    }

    /// Exchanges the key-value pairs of two live nodes, leaving links intact.
    pub(crate) fn swap_entries(&mut self, a: NodeId, b: NodeId) {
        if a == b {
            return;
        }
        let (low, high) = if a.index() < b.index() { (a, b) } else { (b, a) };
        let (head, tail) = self.slots.split_at_mut(high.index());
        match (&mut head[low.index()], &mut tail[0]) {
            (Slot::Occupied(lhs), Slot::Occupied(rhs)) => {
                mem::swap(&mut lhs.key, &mut rhs.key);
                mem::swap(&mut lhs.value, &mut rhs.value);
            }
            _ => panic!("swap of vacant node {a:?} or {b:?}"),
        }
    }
}

impl<K, V> Index<NodeId> for Arena<K, V> {
    type Output = Node<K, V>;

    fn index(&self, id: NodeId) -> &Node<K, V> {
        match &self.slots[id.index()] {
            Slot::Occupied(node) => node,
            Slot::Vacant { .. } => panic!("dangling node id {id:?}"),
        }
    }
}

impl<K, V> IndexMut<NodeId> for Arena<K, V> {
    fn index_mut(&mut self, id: NodeId) -> &mut Node<K, V> {
        match &mut self.slots[id.index()] {
            Slot::Occupied(node) => node,
            Slot::Vacant { .. } => panic!("dangling node id {id:?}"),
        }
    }
}
