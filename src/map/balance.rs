//! Rotations and the upward rebalancing walks.
//!
//! Heights are handled with an offset of one: `left_height`/`right_height`
//! report 0 for an absent child and `height + 1` for a present one, so no
//! signed arithmetic is needed.

use std::cmp;

use log::trace;

use super::arena::{Link, NodeId};
use super::AvlTreeMap;

impl<K, V> AvlTreeMap<K, V> {
    pub(super) fn link_height(&self, link: Link) -> usize {
        match link {
            None => 0,
            Some(id) => self.arena[id].height + 1,
        }
    }

    fn left_height(&self, id: NodeId) -> usize {
        self.link_height(self.arena[id].left)
    }

    fn right_height(&self, id: NodeId) -> usize {
        self.link_height(self.arena[id].right)
    }

    /// Recomputes the cached height of a single node from its children.
    /// Returns whether the height changed.
    pub(super) fn adjust_height(&mut self, id: NodeId) -> bool {
        let height = cmp::max(self.left_height(id), self.right_height(id));
        let node = &mut self.arena[id];
        let changed = node.height != height;
        node.height = height;
        changed
    }

    /// Points the link that owned `old` (parent's child slot or the root) at `new`.
    pub(super) fn replace_child(&mut self, parent: Link, old: NodeId, new: Link) {
        match parent {
            None => self.root = new,
            Some(parent_id) => {
                let parent_node = &mut self.arena[parent_id];
                if parent_node.left == Some(old) {
                    parent_node.left = new;
                } else {
                    parent_node.right = new;
                }
            }
        }
        if let Some(new_id) = new {
            self.arena[new_id].parent = parent;
        }
    }

    //     A             B
    //    / \           / \
    //   x   B   ->    A   z
    //      / \       / \
    //     C   z     x   C
    fn rotate_left(&mut self, a: NodeId) {
        let Some(b) = self.arena[a].right else {
            return;
        };
        trace!("rotate left at {a:?}, {b:?} moves up");
        let c = self.arena[b].left;

        self.arena[a].right = c;
        if let Some(c) = c {
            self.arena[c].parent = Some(a);
        }

        let parent = self.arena[a].parent;
        self.replace_child(parent, a, Some(b));

        self.arena[b].left = Some(a);
        self.arena[a].parent = Some(b);
    }

    //       A         B
    //      / \       / \
    //     B   z ->  x   A
    //    / \           / \
    //   x   C         C   z
    fn rotate_right(&mut self, a: NodeId) {
        let Some(b) = self.arena[a].left else {
            return;
        };
        trace!("rotate right at {a:?}, {b:?} moves up");
        let c = self.arena[b].right;

        self.arena[a].left = c;
        if let Some(c) = c {
            self.arena[c].parent = Some(a);
        }

        let parent = self.arena[a].parent;
        self.replace_child(parent, a, Some(b));

        self.arena[b].right = Some(a);
        self.arena[a].parent = Some(b);
    }

    /// Refreshes heights of a freshly rotated subtree, children first.
    fn adjust_rotated(&mut self, top: NodeId) {
        let (left, right) = (self.arena[top].left, self.arena[top].right);
        if let Some(left) = left {
            self.adjust_height(left);
        }
        if let Some(right) = right {
            self.adjust_height(right);
        }
        self.adjust_height(top);
    }

    /// Restores the AVL condition at the given node if necessary and adjusts heights.
    ///
    /// Left-heavy nodes get a single right rotation when the left child leans
    /// left or is even, a left-right double rotation when it leans right.
    /// Right-heavy nodes are the mirror image.
    /// Returns whether a rotation has been applied.
    pub(super) fn rebalance_node(&mut self, id: NodeId) -> bool {
        let left_height = self.left_height(id);
        let right_height = self.right_height(id);
        if left_height > right_height + 1 {
            let Some(left) = self.arena[id].left else {
                unreachable!("left-heavy node {id:?} without left child");
            };
            if self.right_height(left) > self.left_height(left) {
                self.rotate_left(left);
            }
            self.rotate_right(id);
        } else if right_height > left_height + 1 {
            let Some(right) = self.arena[id].right else {
                unreachable!("right-heavy node {id:?} without right child");
            };
            if self.left_height(right) > self.right_height(right) {
                self.rotate_right(right);
            }
            self.rotate_left(id);
        } else {
            self.adjust_height(id);
            return false;
        }

        // The node has moved down one level; its former child or grandchild is on top.
        let top = self.arena[id].parent.unwrap_or(id);
        self.adjust_rotated(top);
        true
    }

    /// Rebalances nodes starting from given position up to the root node.
    pub(super) fn rebalance(&mut self, start_from: Link) {
        let mut current = start_from;
        while let Some(id) = current {
            let parent = self.arena[id].parent;
            self.rebalance_node(id);
            current = parent;
        }
    }

    /// Rebalances nodes starting from given position up to the root node.
    /// Stops after the first rotation, refreshes the heights above it and
    /// re-tests the root.
    /// This is enough to restore balance after a single insert operation.
    /// Returns the node the walk stopped at, if any rotation happened.
    pub(super) fn rebalance_once(&mut self, start_from: Link) -> Link {
        let mut current = start_from;
        let mut rotated_at = None;
        while let Some(id) = current {
            let parent = self.arena[id].parent;
            if self.rebalance_node(id) {
                self.refresh_heights(parent);
                rotated_at = Some(id);
                break;
            }
            current = parent;
        }
        if let Some(root) = self.root {
            self.rebalance_node(root);
        }
        rotated_at
    }

    /// Adjusts heights upwards without rotating.
    /// Stops at the first node whose height did not change.
    fn refresh_heights(&mut self, start_from: Link) {
        let mut current = start_from;
        while let Some(id) = current {
            if !self.adjust_height(id) {
                break;
            }
            current = self.arena[id].parent;
        }
    }
}
