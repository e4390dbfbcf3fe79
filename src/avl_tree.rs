use alloc::vec::Vec;
use core::fmt;
use core::iter::FusedIterator;

use crate::error::InvariantViolation;
use crate::raw::{self, RawAvlTree};
use crate::rotation::Mutation;

mod capacity;
mod snapshot;

pub use snapshot::{NodeView, Snapshot};

/// An ordered set of unique keys kept height-balanced by AVL rotations.
///
/// After every call the tree satisfies:
///
/// - every key in a node's left subtree is smaller, and every key in its right
///   subtree larger, than the node's own key;
/// - the heights of a node's two subtrees differ by at most one.
///
/// Mutations report which rebalancing case (if any) they applied, and
/// [`search`](AvlTree::search) reports the nodes it visited, so that a
/// front end can explain what the tree did. The structure itself is never
/// handed out; [`snapshot`](AvlTree::snapshot) exports a read-only copy of its
/// shape.
///
/// # Examples
///
/// ```
/// use avl_engine::{AvlTree, Rotation};
///
/// let mut tree = AvlTree::new();
/// tree.insert(10);
/// tree.insert(20);
///
/// // The third ascending key unbalances the root and triggers a left rotation.
/// let mutation = tree.insert(30);
/// assert!(mutation.changed);
/// assert_eq!(mutation.rotation, Some(Rotation::RR));
///
/// let snapshot = tree.snapshot();
/// assert_eq!(snapshot.root, Some(20));
///
/// let outcome = tree.search(&30);
/// assert!(outcome.found);
/// assert_eq!(outcome.path, [20, 30]);
///
/// // Duplicates and missing keys are no-ops, not errors.
/// assert!(!tree.insert(20).changed);
/// assert!(!tree.delete(&99).changed);
/// ```
pub struct AvlTree<K> {
    raw: RawAvlTree<K>,
}

/// Result of [`AvlTree::search`].
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchOutcome<K> {
    pub found: bool,
    /// Keys of the visited nodes, root first. On a hit the last entry is the
    /// searched key; on a miss it is the node whose missing child the search
    /// would have followed. Empty for an empty tree.
    pub path: Vec<K>,
}

/// An iterator over the keys of an `AvlTree` in ascending order.
///
/// This `struct` is created by [`AvlTree::iter`].
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K> {
    inner: raw::Keys<'a, K>,
}

impl<K> AvlTree<K> {
    /// Makes a new, empty `AvlTree`.
    ///
    /// Does not allocate anything on its own.
    #[must_use]
    pub const fn new() -> Self {
        AvlTree { raw: RawAvlTree::new() }
    }

    /// Returns the number of keys in the tree.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Height of the whole tree: 0 when empty, 1 for a single key.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.raw.height(self.raw.root())
    }

    /// Balance factor of the root, 0 when empty.
    #[must_use]
    pub fn root_balance(&self) -> i32 {
        self.raw.balance(self.raw.root())
    }

    /// Discards every key, returning to the empty state.
    pub fn clear(&mut self) {
        self.raw.clear();
        tracing::debug!("cleared tree");
    }

    /// Smallest key, if any.
    #[must_use]
    pub fn first(&self) -> Option<&K> {
        self.raw.first()
    }

    /// Largest key, if any.
    #[must_use]
    pub fn last(&self) -> Option<&K> {
        self.raw.last()
    }

    /// Gets an iterator that visits the keys in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_engine::AvlTree;
    ///
    /// let tree: AvlTree<i64> = [3, 1, 2].into_iter().collect();
    /// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [1, 2, 3]);
    /// ```
    pub fn iter(&self) -> Iter<'_, K> {
        Iter { inner: self.raw.keys() }
    }
}

impl<K: Ord> AvlTree<K> {
    /// Adds `key` to the set and rebalances.
    ///
    /// Inserting a key that is already present leaves the tree untouched and
    /// returns a `Mutation` with `changed == false`.
    pub fn insert(&mut self, key: K) -> Mutation {
        let mutation = self.raw.insert(key);
        tracing::debug!(
            changed = mutation.changed,
            rotation = ?mutation.rotation,
            len = self.len(),
            "insert"
        );
        self.assert_invariants("insert");
        mutation
    }

    /// Returns `true` if the set contains `key`.
    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.raw.find(key).is_some()
    }

    /// Balance factor of the node holding `key`, re-derived by a fresh lookup
    /// from the root.
    ///
    /// ```
    /// use avl_engine::AvlTree;
    ///
    /// let tree: AvlTree<i64> = [2, 1].into_iter().collect();
    /// assert_eq!(tree.balance_of(&2), Some(1));
    /// assert_eq!(tree.balance_of(&1), Some(0));
    /// assert_eq!(tree.balance_of(&7), None);
    /// ```
    #[must_use]
    pub fn balance_of(&self, key: &K) -> Option<i32> {
        self.raw.find(key).map(|handle| self.raw.balance(Some(handle)))
    }

    /// Checks ordering, cached heights and balance factors of every node.
    ///
    /// Every public operation already runs this check in debug builds and
    /// panics on failure; it is exposed for callers that want to verify a
    /// release build.
    ///
    /// # Errors
    ///
    /// Returns the first violation found in a depth-first walk.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        self.raw.check_invariants()
    }

    fn assert_invariants(&self, operation: &str) {
        if cfg!(debug_assertions)
            && let Err(violation) = self.raw.check_invariants()
        {
            panic!("`AvlTree::{operation}()` left the tree inconsistent: {violation}");
        }
    }
}

impl<K: Ord + Clone> AvlTree<K> {
    /// Removes `key` from the set and rebalances every ancestor of the removed
    /// node.
    ///
    /// A node with two children takes over the key of its in-order successor,
    /// and the successor's node is removed instead. Deleting a key that is not
    /// present returns a `Mutation` with `changed == false`.
    pub fn delete(&mut self, key: &K) -> Mutation {
        let mutation = self.raw.delete(key);
        tracing::debug!(
            changed = mutation.changed,
            rotation = ?mutation.rotation,
            len = self.len(),
            "delete"
        );
        self.assert_invariants("delete");
        mutation
    }

    /// Descends from the root towards `key`, recording every node visited.
    #[must_use]
    pub fn search(&self, key: &K) -> SearchOutcome<K> {
        let (found, handles) = self.raw.search(key);
        let path: Vec<K> = handles.iter().map(|&handle| self.raw.key(handle).clone()).collect();
        tracing::debug!(found, visited = path.len(), "search");
        SearchOutcome { found, path }
    }

    /// Read-only view of the node holding `key`, if present.
    #[must_use]
    pub fn find_node(&self, key: &K) -> Option<NodeView<K>> {
        let (found, path) = self.raw.search(key);
        let handle = *path.last()?;
        found.then(|| snapshot::view(&self.raw, handle, path.len() - 1))
    }
}

impl<K> Default for AvlTree<K> {
    /// Creates an empty `AvlTree`.
    fn default() -> Self {
        AvlTree::new()
    }
}

impl<K: Clone> Clone for AvlTree<K> {
    fn clone(&self) -> Self {
        AvlTree { raw: self.raw.clone() }
    }
}

impl<K: fmt::Debug> fmt::Debug for AvlTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K: Ord> FromIterator<K> for AvlTree<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tree = AvlTree::new();
        tree.extend(iter);
        tree
    }
}

impl<K: Ord> Extend<K> for AvlTree<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            let _ = self.insert(key);
        }
    }
}

impl<K: Ord, const N: usize> From<[K; N]> for AvlTree<K> {
    fn from(keys: [K; N]) -> Self {
        keys.into_iter().collect()
    }
}

impl<'a, K> IntoIterator for &'a AvlTree<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Iter<'a, K> {
        self.iter()
    }
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {}

impl<K> FusedIterator for Iter<'_, K> {}

impl<K> Clone for Iter<'_, K> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
        }
    }
}
