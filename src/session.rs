use alloc::vec::Vec;

use crate::avl_tree::{AvlTree, SearchOutcome, Snapshot};
use crate::rotation::{Mutation, Rotation};

/// The state an interactive front end keeps between calls.
///
/// A session owns one tree plus what the last operations reported: the
/// rotation applied by the last insert or delete, and the path and hit of the
/// last search. Mutations clear the search state, since the old path may no
/// longer exist. Sessions are independent of each other.
///
/// # Examples
///
/// ```
/// use avl_engine::{Rotation, Session};
///
/// let mut session = Session::new();
/// session.insert(30);
/// session.insert(10);
/// session.insert(20);
/// assert_eq!(session.last_rotation(), Some(Rotation::LR));
///
/// session.search(&10);
/// assert_eq!(session.searched(), Some(&10));
/// assert_eq!(session.search_path(), [20, 10]);
///
/// session.clear();
/// assert!(session.tree().is_empty());
/// assert_eq!(session.last_rotation(), None);
/// ```
#[derive(Clone, Debug)]
pub struct Session<K> {
    tree: AvlTree<K>,
    last_rotation: Option<Rotation>,
    searched: Option<K>,
    search_path: Vec<K>,
}

impl<K> Session<K> {
    #[must_use]
    pub const fn new() -> Self {
        Session {
            tree: AvlTree::new(),
            last_rotation: None,
            searched: None,
            search_path: Vec::new(),
        }
    }

    /// Read access to the session's tree.
    #[must_use]
    pub const fn tree(&self) -> &AvlTree<K> {
        &self.tree
    }

    /// The rotation reported by the most recent insert or delete.
    #[must_use]
    pub const fn last_rotation(&self) -> Option<Rotation> {
        self.last_rotation
    }

    /// The key found by the most recent search, if it was found and no
    /// mutation has happened since.
    #[must_use]
    pub const fn searched(&self) -> Option<&K> {
        self.searched.as_ref()
    }

    /// Keys visited by the most recent search, root first.
    #[must_use]
    pub fn search_path(&self) -> &[K] {
        &self.search_path
    }

    /// Returns `true` if `key` was visited by the most recent search.
    #[must_use]
    pub fn is_on_search_path(&self, key: &K) -> bool
    where
        K: PartialEq,
    {
        self.search_path.contains(key)
    }

    /// Empties the tree and forgets every recorded result.
    pub fn clear(&mut self) {
        self.tree.clear();
        self.last_rotation = None;
        self.reset_search();
    }

    fn reset_search(&mut self) {
        self.searched = None;
        self.search_path.clear();
    }
}

impl<K: Ord + Clone> Session<K> {
    pub fn insert(&mut self, key: K) -> Mutation {
        let mutation = self.tree.insert(key);
        self.record(mutation)
    }

    pub fn delete(&mut self, key: &K) -> Mutation {
        let mutation = self.tree.delete(key);
        self.record(mutation)
    }

    pub fn search(&mut self, key: &K) -> SearchOutcome<K> {
        let outcome = self.tree.search(key);
        self.searched = outcome.found.then(|| key.clone());
        self.search_path.clone_from(&outcome.path);
        outcome
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot<K> {
        self.tree.snapshot()
    }

    fn record(&mut self, mutation: Mutation) -> Mutation {
        self.last_rotation = mutation.rotation;
        self.reset_search();
        mutation
    }
}

impl<K> Default for Session<K> {
    fn default() -> Self {
        Session::new()
    }
}
