//! A height-balanced (AVL) ordered set that explains itself.
//!
//! [`AvlTree`] keeps a set of unique keys (typically integers) under insertion,
//! deletion and search, restoring the AVL balance condition with rotations
//! after every mutation. Besides the usual set operations it reports:
//!
//! - which [`Rotation`] case a mutation applied, via [`Mutation`];
//! - which nodes a search visited, via [`SearchOutcome`];
//! - a read-only [`Snapshot`] of the current shape (keys, child links,
//!   heights, depths and balance factors) for drawing the tree.
//!
//! [`Session`] bundles a tree with the results of the last operations for an
//! interactive front end.
//!
//! # Example
//!
//! ```
//! use avl_engine::{AvlTree, Rotation};
//!
//! let mut tree = AvlTree::new();
//! for key in [5, 4, 3, 2, 1] {
//!     tree.insert(key);
//! }
//! assert_eq!(tree.snapshot().root, Some(4));
//!
//! // Removing 5 leaves 4 two levels left-heavy: a single right rotation.
//! let mutation = tree.delete(&5);
//! assert_eq!(mutation.rotation, Some(Rotation::LL));
//! assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [1, 2, 3, 4]);
//! assert!(tree.check_invariants().is_ok());
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`
//! - **`serde`** - Serialize snapshots and operation results
//!
//! # Implementation
//!
//! Nodes live in an arena and refer to their children by index. Rotations and
//! the recursive insert/delete take the index of a subtree root and return the
//! index of the node rooting it afterwards, so no reference into the tree is
//! held across a restructuring.

#![no_std]
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod error;
mod raw;
mod rotation;
mod session;

pub mod avl_tree;

pub use avl_tree::{AvlTree, NodeView, SearchOutcome, Snapshot};
pub use error::InvariantViolation;
pub use rotation::{Mutation, Rotation};
pub use session::Session;
