use core::fmt;

/// One of the four AVL rebalancing cases.
///
/// The name describes where the excess height sits relative to the node that
/// went out of balance: `LL` is the left child's left subtree, `LR` the left
/// child's right subtree, and so on. `LL` and `RR` are fixed by a single
/// rotation; `LR` and `RL` need two.
///
/// Its [`Display`](fmt::Display) form is the label shown to users:
///
/// ```
/// use avl_engine::Rotation;
///
/// assert_eq!(Rotation::LR.to_string(), "Left-Right Rotation (LR)");
/// assert_eq!(Rotation::LR.short_name(), "LR");
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rotation {
    /// Single right rotation at the unbalanced node.
    LL,
    /// Single left rotation at the unbalanced node.
    RR,
    /// Left rotation at the left child, then right rotation at the node.
    LR,
    /// Right rotation at the right child, then left rotation at the node.
    RL,
}

impl Rotation {
    /// The two-letter case name.
    #[must_use]
    pub const fn short_name(self) -> &'static str {
        match self {
            Rotation::LL => "LL",
            Rotation::RR => "RR",
            Rotation::LR => "LR",
            Rotation::RL => "RL",
        }
    }

    /// Returns `true` for the two cases that need a double rotation.
    #[must_use]
    pub const fn is_double(self) -> bool {
        matches!(self, Rotation::LR | Rotation::RL)
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Rotation::LL => "Right Rotation (LL)",
            Rotation::RR => "Left Rotation (RR)",
            Rotation::LR => "Left-Right Rotation (LR)",
            Rotation::RL => "Right-Left Rotation (RL)",
        };
        f.write_str(label)
    }
}

/// What a call to [`AvlTree::insert`](crate::AvlTree::insert) or
/// [`AvlTree::delete`](crate::AvlTree::delete) did.
///
/// `rotation` is the last rebalancing case applied during the call. When
/// several ancestors rotate, only the one closest to the root is reported.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mutation {
    /// `false` when the key was already present (insert) or absent (delete).
    pub changed: bool,
    pub rotation: Option<Rotation>,
}
