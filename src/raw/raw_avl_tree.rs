use core::cmp::Ordering::{Equal, Greater, Less};

use smallvec::SmallVec;

use super::arena::Arena;
use super::handle::Handle;
use super::node::Node;
use crate::error::InvariantViolation;
use crate::rotation::{Mutation, Rotation};

/// Handles visited by a root-to-leaf descent.
///
/// An AVL tree addressable by a `u32` handle is at most 46 levels deep.
pub(crate) type Path = SmallVec<[Handle; 64]>;

/// The AVL core backing `AvlTree`.
///
/// Every structural operation is a recursive descent that takes the handle of
/// a subtree root and returns the handle of whatever node roots that subtree
/// afterwards. Callers store the returned handle back into the parent link.
#[derive(Clone)]
pub(crate) struct RawAvlTree<K> {
    nodes: Arena<Node<K>>,
    root: Option<Handle>,
}

impl<K> RawAvlTree<K> {
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: None,
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    pub(crate) const fn root(&self) -> Option<Handle> {
        self.root
    }

    pub(crate) fn key(&self, handle: Handle) -> &K {
        self.nodes.get(handle).key()
    }

    pub(crate) fn left(&self, handle: Handle) -> Option<Handle> {
        self.nodes.get(handle).left()
    }

    pub(crate) fn right(&self, handle: Handle) -> Option<Handle> {
        self.nodes.get(handle).right()
    }

    /// Cached height of a subtree; 0 when absent.
    #[inline]
    pub(crate) fn height(&self, node: Option<Handle>) -> u32 {
        node.map_or(0, |handle| self.nodes.get(handle).height())
    }

    /// `height(left) - height(right)`; 0 when absent. Positive means left-heavy.
    #[allow(clippy::cast_possible_wrap)]
    pub(crate) fn balance(&self, node: Option<Handle>) -> i32 {
        let Some(handle) = node else {
            return 0;
        };
        let node = self.nodes.get(handle);
        self.height(node.left()) as i32 - self.height(node.right()) as i32
    }

    fn update_height(&mut self, handle: Handle) {
        let node = self.nodes.get(handle);
        let height = 1 + self.height(node.left()).max(self.height(node.right()));
        self.nodes.get_mut(handle).set_height(height);
    }

    /// Promotes the left child of `y` and returns it as the new subtree root.
    fn rotate_right(&mut self, y: Handle) -> Handle {
        let Some(x) = self.nodes.get(y).left() else {
            unreachable!("right rotation on a node without a left child");
        };
        let t2 = self.nodes.get(x).right();
        self.nodes.get_mut(y).set_left(t2);
        self.nodes.get_mut(x).set_right(Some(y));
        self.update_height(y);
        self.update_height(x);
        x
    }

    /// Promotes the right child of `x` and returns it as the new subtree root.
    fn rotate_left(&mut self, x: Handle) -> Handle {
        let Some(y) = self.nodes.get(x).right() else {
            unreachable!("left rotation on a node without a right child");
        };
        let t2 = self.nodes.get(y).left();
        self.nodes.get_mut(x).set_right(t2);
        self.nodes.get_mut(y).set_left(Some(x));
        self.update_height(x);
        self.update_height(y);
        y
    }

    /// Applies one of the four rebalancing cases at `node` and records it as
    /// the latest rotation of the running mutation.
    fn restructure(&mut self, node: Handle, case: Rotation, mutation: &mut Mutation) -> Handle {
        tracing::trace!(rotation = %case, "rebalancing subtree");
        mutation.rotation = Some(case);

        match case {
            Rotation::LL => self.rotate_right(node),
            Rotation::RR => self.rotate_left(node),
            Rotation::LR => {
                let Some(left) = self.nodes.get(node).left() else {
                    unreachable!("left-right case without a left child");
                };
                let left = self.rotate_left(left);
                self.nodes.get_mut(node).set_left(Some(left));
                self.rotate_right(node)
            }
            Rotation::RL => {
                let Some(right) = self.nodes.get(node).right() else {
                    unreachable!("right-left case without a right child");
                };
                let right = self.rotate_right(right);
                self.nodes.get_mut(node).set_right(Some(right));
                self.rotate_left(node)
            }
        }
    }

    /// Picks the rebalancing case after a deletion from the balance of the
    /// heavier child.
    fn deletion_case(&self, node: Handle) -> Option<Rotation> {
        let balance = self.balance(Some(node));
        let node = self.nodes.get(node);
        if balance > 1 {
            if self.balance(node.left()) >= 0 {
                Some(Rotation::LL)
            } else {
                Some(Rotation::LR)
            }
        } else if balance < -1 {
            if self.balance(node.right()) <= 0 {
                Some(Rotation::RR)
            } else {
                Some(Rotation::RL)
            }
        } else {
            None
        }
    }

    /// Leftmost node of a subtree.
    fn min_node(&self, mut handle: Handle) -> Handle {
        while let Some(left) = self.nodes.get(handle).left() {
            handle = left;
        }
        handle
    }

    fn max_node(&self, mut handle: Handle) -> Handle {
        while let Some(right) = self.nodes.get(handle).right() {
            handle = right;
        }
        handle
    }

    pub(crate) fn first(&self) -> Option<&K> {
        self.root.map(|root| self.key(self.min_node(root)))
    }

    pub(crate) fn last(&self) -> Option<&K> {
        self.root.map(|root| self.key(self.max_node(root)))
    }

    /// In-order traversal of the keys.
    pub(crate) fn keys(&self) -> Keys<'_, K> {
        let mut keys = Keys {
            tree: self,
            stack: Path::new(),
            remaining: self.len(),
        };
        keys.push_left_spine(self.root);
        keys
    }

    /// Pre-order traversal yielding each node with its depth (root = 0).
    pub(crate) fn pre_order(&self) -> PreOrder<'_, K> {
        let mut stack = SmallVec::new();
        if let Some(root) = self.root {
            stack.push((root, 0));
        }
        PreOrder { tree: self, stack }
    }
}

impl<K: Ord> RawAvlTree<K> {
    /// Inserts `key`, rebalancing every ancestor of the new leaf as needed.
    pub(crate) fn insert(&mut self, key: K) -> Mutation {
        let mut mutation = Mutation::default();
        let mut leaf = None;
        let root = self.insert_at(self.root, key, &mut leaf, &mut mutation);
        self.root = Some(root);
        mutation.changed = leaf.is_some();
        mutation
    }

    fn insert_at(
        &mut self,
        node: Option<Handle>,
        key: K,
        leaf: &mut Option<Handle>,
        mutation: &mut Mutation,
    ) -> Handle {
        let Some(current) = node else {
            let handle = self.nodes.insert(Node::leaf(key));
            *leaf = Some(handle);
            return handle;
        };

        let node = self.nodes.get(current);
        let (left, right) = (node.left(), node.right());
        match key.cmp(node.key()) {
            Less => {
                let left = self.insert_at(left, key, leaf, mutation);
                self.nodes.get_mut(current).set_left(Some(left));
            }
            Greater => {
                let right = self.insert_at(right, key, leaf, mutation);
                self.nodes.get_mut(current).set_right(Some(right));
            }
            Equal => return current,
        }

        // Duplicate found further down: nothing changed on this path.
        let Some(leaf) = *leaf else {
            return current;
        };

        self.update_height(current);
        match self.insertion_case(current, leaf) {
            Some(case) => self.restructure(current, case, mutation),
            None => current,
        }
    }

    /// Picks the rebalancing case after an insertion by comparing the new key
    /// with the key of the heavier child.
    fn insertion_case(&self, node: Handle, leaf: Handle) -> Option<Rotation> {
        let balance = self.balance(Some(node));
        let inserted = self.key(leaf);
        let node = self.nodes.get(node);
        match (node.left(), node.right()) {
            (Some(left), _) if balance > 1 => {
                if inserted < self.key(left) {
                    Some(Rotation::LL)
                } else {
                    Some(Rotation::LR)
                }
            }
            (_, Some(right)) if balance < -1 => {
                if inserted > self.key(right) {
                    Some(Rotation::RR)
                } else {
                    Some(Rotation::RL)
                }
            }
            _ => None,
        }
    }

    /// Returns whether `key` is present along with the handles visited, root first.
    pub(crate) fn search(&self, key: &K) -> (bool, Path) {
        let mut path = Path::new();
        let mut current = self.root;
        while let Some(handle) = current {
            path.push(handle);
            let node = self.nodes.get(handle);
            current = match key.cmp(node.key()) {
                Less => node.left(),
                Greater => node.right(),
                Equal => return (true, path),
            };
        }
        (false, path)
    }

    /// Plain lookup without recording a path.
    pub(crate) fn find(&self, key: &K) -> Option<Handle> {
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            current = match key.cmp(node.key()) {
                Less => node.left(),
                Greater => node.right(),
                Equal => return Some(handle),
            };
        }
        None
    }

    /// Verifies ordering, cached heights, balance factors and that every
    /// allocated node is reachable from the root.
    pub(crate) fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let (_, reachable) = self.check_subtree(self.root, None, None, 0)?;
        if reachable != self.len() {
            return Err(InvariantViolation::Length {
                reachable,
                allocated: self.len(),
            });
        }
        Ok(())
    }

    /// Returns `(height, node count)` of a verified subtree.
    fn check_subtree(
        &self,
        node: Option<Handle>,
        lower: Option<&K>,
        upper: Option<&K>,
        depth: usize,
    ) -> Result<(u32, usize), InvariantViolation> {
        let Some(handle) = node else {
            return Ok((0, 0));
        };
        let node = self.nodes.get(handle);
        let key = node.key();
        if lower.is_some_and(|lower| key <= lower) || upper.is_some_and(|upper| key >= upper) {
            return Err(InvariantViolation::Ordering { depth });
        }

        let (left_height, left_count) = self.check_subtree(node.left(), lower, Some(key), depth + 1)?;
        let (right_height, right_count) = self.check_subtree(node.right(), Some(key), upper, depth + 1)?;

        let actual = 1 + left_height.max(right_height);
        if node.height() != actual {
            return Err(InvariantViolation::Height {
                depth,
                cached: node.height(),
                actual,
            });
        }

        let balance = i64::from(left_height) - i64::from(right_height);
        if !(-1..=1).contains(&balance) {
            return Err(InvariantViolation::Balance { depth, balance });
        }

        Ok((actual, 1 + left_count + right_count))
    }
}

impl<K: Ord + Clone> RawAvlTree<K> {
    /// Removes `key`, rebalancing every ancestor on the way back to the root.
    pub(crate) fn delete(&mut self, key: &K) -> Mutation {
        let mut mutation = Mutation::default();
        self.root = self.delete_at(self.root, key, &mut mutation);
        mutation
    }

    fn delete_at(&mut self, node: Option<Handle>, key: &K, mutation: &mut Mutation) -> Option<Handle> {
        let mut current = node?;

        let node = self.nodes.get(current);
        let (left, right) = (node.left(), node.right());
        match key.cmp(node.key()) {
            Less => {
                let left = self.delete_at(left, key, mutation);
                self.nodes.get_mut(current).set_left(left);
            }
            Greater => {
                let right = self.delete_at(right, key, mutation);
                self.nodes.get_mut(current).set_right(right);
            }
            Equal if node.has_two_children() => {
                // Take over the in-order successor's key, then remove the
                // successor, which has no left child.
                let Some(right) = right else {
                    unreachable!("node with two children has no right child");
                };
                let successor = self.key(self.min_node(right)).clone();
                let right = self.delete_at(Some(right), &successor, mutation);
                let node = self.nodes.get_mut(current);
                node.set_key(successor);
                node.set_right(right);
            }
            Equal => {
                let replacement = node.only_child();
                self.nodes.remove(current);
                mutation.changed = true;
                current = replacement?;
            }
        }

        self.update_height(current);
        match self.deletion_case(current) {
            Some(case) => Some(self.restructure(current, case, mutation)),
            None => Some(current),
        }
    }
}

/// In-order key iterator over a `RawAvlTree`.
pub(crate) struct Keys<'a, K> {
    tree: &'a RawAvlTree<K>,
    stack: Path,
    remaining: usize,
}

impl<K> Keys<'_, K> {
    fn push_left_spine(&mut self, mut node: Option<Handle>) {
        while let Some(handle) = node {
            self.stack.push(handle);
            node = self.tree.left(handle);
        }
    }
}

impl<'a, K> Iterator for Keys<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        let handle = self.stack.pop()?;
        self.push_left_spine(self.tree.right(handle));
        self.remaining -= 1;
        Some(self.tree.key(handle))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> ExactSizeIterator for Keys<'_, K> {}

impl<K> Clone for Keys<'_, K> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            stack: self.stack.clone(),
            remaining: self.remaining,
        }
    }
}

/// Pre-order walk yielding `(handle, depth)`.
pub(crate) struct PreOrder<'a, K> {
    tree: &'a RawAvlTree<K>,
    stack: SmallVec<[(Handle, usize); 64]>,
}

impl<K> Iterator for PreOrder<'_, K> {
    type Item = (Handle, usize);

    fn next(&mut self) -> Option<(Handle, usize)> {
        let (handle, depth) = self.stack.pop()?;
        if let Some(right) = self.tree.right(handle) {
            self.stack.push((right, depth + 1));
        }
        if let Some(left) = self.tree.left(handle) {
            self.stack.push((left, depth + 1));
        }
        Some((handle, depth))
    }
}
