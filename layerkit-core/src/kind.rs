//! Type descriptors for packets, headers and builders
//!
//! Every concrete packet, header and builder type carries a [`PacketKind`].
//! Traversal and equality compare descriptors instead of asking the
//! runtime for type information. A kind may name a parent kind, so a
//! query for the parent also matches the child.
//!
//! A kind is identified by its owner type, not by its name: two kinds
//! declared for different types never compare equal even when they share
//! a display name.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Stable identifier of a concrete packet, header or builder type
#[derive(Clone, Copy)]
pub struct PacketKind {
    name: &'static str,
    owner: fn() -> TypeId,
    parent: Option<&'static PacketKind>,
}

impl PacketKind {
    /// Create a root kind owned by `T`
    pub const fn new<T: ?Sized + 'static>(name: &'static str) -> Self {
        PacketKind {
            name,
            owner: TypeId::of::<T>,
            parent: None,
        }
    }

    /// Create a kind owned by `T` that is also matched by queries for
    /// `parent`
    pub const fn with_parent<T: ?Sized + 'static>(
        name: &'static str,
        parent: &'static PacketKind,
    ) -> Self {
        PacketKind {
            name,
            owner: TypeId::of::<T>,
            parent: Some(parent),
        }
    }

    /// Human readable name of the kind
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Parent kind, if any
    pub fn parent(&self) -> Option<&'static PacketKind> {
        self.parent
    }

    /// Whether `other` is this kind or one of its descendants.
    ///
    /// The relation is directional: `parent.accepts(child)` holds while
    /// `child.accepts(parent)` does not.
    pub fn accepts(&self, other: &PacketKind) -> bool {
        let mut current = Some(other);
        while let Some(kind) = current {
            if kind == self {
                return true;
            }
            current = kind.parent;
        }
        false
    }
}

impl PartialEq for PacketKind {
    fn eq(&self, other: &Self) -> bool {
        (self.owner)() == (other.owner)()
    }
}

impl Eq for PacketKind {}

impl Hash for PacketKind {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.owner)().hash(state);
    }
}

impl fmt::Debug for PacketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PacketKind")
            .field("name", &self.name)
            .field("parent", &self.parent.map(|p| p.name))
            .finish()
    }
}

impl fmt::Display for PacketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
