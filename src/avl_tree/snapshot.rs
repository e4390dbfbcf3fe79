use alloc::vec::Vec;

use super::AvlTree;
use crate::raw::{Handle, RawAvlTree};

/// A read-only export of a tree's shape.
///
/// Nodes are listed in pre-order (parent before children, left before
/// right), so `nodes[0]` is the root. Children are referred to by key; no
/// layout or coordinates are computed here.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot<K> {
    pub root: Option<K>,
    pub nodes: Vec<NodeView<K>>,
}

/// One node of a [`Snapshot`].
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeView<K> {
    pub key: K,
    pub left: Option<K>,
    pub right: Option<K>,
    /// Height of the subtree rooted here; a leaf is 1.
    pub height: u32,
    /// Edges from the root; the root is at depth 0.
    pub depth: usize,
    /// `height(left) - height(right)`, always in `-1..=1`.
    pub balance: i32,
}

impl<K> Snapshot<K> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The exported node holding `key`, by linear scan.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&NodeView<K>>
    where
        K: PartialEq,
    {
        self.nodes.iter().find(|node| node.key == *key)
    }

    /// Height of the exported tree.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.nodes.first().map_or(0, |root| root.height)
    }
}

impl<K> NodeView<K> {
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

impl<K: Clone> AvlTree<K> {
    /// Exports every node's key, child keys, height, depth and balance factor.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_engine::AvlTree;
    ///
    /// let tree = AvlTree::from([30, 10, 20]);
    /// let snapshot = tree.snapshot();
    ///
    /// assert_eq!(snapshot.root, Some(20));
    /// let root = &snapshot.nodes[0];
    /// assert_eq!((root.left, root.right), (Some(10), Some(30)));
    /// assert_eq!(root.balance, 0);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n)
    #[must_use]
    pub fn snapshot(&self) -> Snapshot<K> {
        let root = self.raw.root().map(|handle| self.raw.key(handle).clone());
        let nodes = self
            .raw
            .pre_order()
            .map(|(handle, depth)| view(&self.raw, handle, depth))
            .collect();
        Snapshot { root, nodes }
    }
}

pub(super) fn view<K: Clone>(raw: &RawAvlTree<K>, handle: Handle, depth: usize) -> NodeView<K> {
    let left = raw.left(handle);
    let right = raw.right(handle);
    NodeView {
        key: raw.key(handle).clone(),
        left: left.map(|child| raw.key(child).clone()),
        right: right.map(|child| raw.key(child).clone()),
        height: raw.height(Some(handle)),
        depth,
        balance: raw.balance(Some(handle)),
    }
}
