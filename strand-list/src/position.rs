//! Positions: non-owning handles to a node or to the end of a list.
//!
//! A [`Position`] is a key plus a view marker. It borrows nothing, so it
//! can be held across mutations of the list, the same way a linked-list
//! iterator stays valid across inserts and splices. Moving it and reading
//! through it go through the owning [`List`](crate::List), which has the
//! storage:
//!
//! ```
//! use strand_list::{List, SlabListStorage};
//!
//! let mut storage: SlabListStorage<u64> = slab::Slab::new();
//! let mut list: List<u64, SlabListStorage<u64>, usize> = List::new();
//! list.assign(&mut storage, [1, 2, 3]);
//!
//! let pos = list.begin(&storage);
//! let pos = list.next(&storage, pos);
//! assert_eq!(list.get(&storage, pos), Some(&2));
//!
//! *list.get_mut(&mut storage, pos).unwrap() = 20;
//! assert_eq!(list.get(&storage, pos), Some(&20));
//! ```
//!
//! # Views
//!
//! [`Pos`] is the mutable view and can be passed to `get_mut`. [`ConstPos`]
//! is the read-only view. A `Pos` converts to a `ConstPos` implicitly
//! (`From`); going back requires the explicit [`ConstPos::cast_mut`].
//! Both share traversal and compare equal when they name the same node.
//!
//! # Validity
//!
//! A position is valid until its node is erased. Splicing moves the node
//! to another list but keeps the position valid. In debug builds every
//! position carries the generation stamp of its node and lists reject a
//! position whose node was erased or whose slot has been reused.

use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;

use crate::{Key, ListNode};

mod sealed {
    pub trait Sealed {}
}

/// Marker for the view a [`Position`] grants.
pub trait Access: sealed::Sealed {}

/// Mutable view marker.
#[derive(Debug)]
pub enum Mutable {}

/// Read-only view marker.
#[derive(Debug)]
pub enum Const {}

impl sealed::Sealed for Mutable {}
impl sealed::Sealed for Const {}
impl Access for Mutable {}
impl Access for Const {}

/// Position allowing mutable access to its element.
pub type Pos<K = u32> = Position<K, Mutable>;

/// Position allowing read-only access to its element.
pub type ConstPos<K = u32> = Position<K, Const>;

/// Handle to a list node, or to the end of a list.
pub struct Position<K: Key, A: Access> {
    pub(crate) key: K,
    #[cfg(debug_assertions)]
    pub(crate) stamp: u64,
    _access: PhantomData<fn() -> A>,
}

impl<K: Key, A: Access> Position<K, A> {
    /// The end position: one past the last element.
    #[inline]
    pub(crate) fn end() -> Self {
        Self {
            key: K::NONE,
            #[cfg(debug_assertions)]
            stamp: 0,
            _access: PhantomData,
        }
    }

    /// Position of `node`, which lives at `key`.
    #[inline]
    #[cfg_attr(not(debug_assertions), allow(unused_variables))]
    pub(crate) fn at<T>(key: K, node: &ListNode<T, K>) -> Self {
        Self {
            key,
            #[cfg(debug_assertions)]
            stamp: node.stamp,
            _access: PhantomData,
        }
    }

    #[inline]
    fn with_access<B: Access>(self) -> Position<K, B> {
        Position {
            key: self.key,
            #[cfg(debug_assertions)]
            stamp: self.stamp,
            _access: PhantomData,
        }
    }

    /// Returns the storage key of the node, or `None` for the end position.
    #[inline]
    pub fn key(&self) -> Option<K> {
        if self.key.is_none() {
            None
        } else {
            Some(self.key)
        }
    }

    /// Returns `true` if this is the end position.
    #[inline]
    pub fn is_end(&self) -> bool {
        self.key.is_none()
    }

    /// Returns the read-only view of this position.
    #[inline]
    pub fn as_const(self) -> ConstPos<K> {
        self.with_access()
    }
}

impl<K: Key> ConstPos<K> {
    /// Returns the mutable view of this position.
    ///
    /// Read-only positions never turn mutable implicitly; this is the one
    /// explicit way to do it.
    #[inline]
    pub fn cast_mut(self) -> Pos<K> {
        self.with_access()
    }
}

impl<K: Key> From<Pos<K>> for ConstPos<K> {
    #[inline]
    fn from(pos: Pos<K>) -> Self {
        pos.as_const()
    }
}

impl<K: Key, A: Access> Clone for Position<K, A> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<K: Key, A: Access> Copy for Position<K, A> {}

impl<K: Key, A: Access, B: Access> PartialEq<Position<K, B>> for Position<K, A> {
    #[inline]
    fn eq(&self, other: &Position<K, B>) -> bool {
        self.key == other.key
    }
}

impl<K: Key, A: Access> Eq for Position<K, A> {}

impl<K: Key, A: Access> Hash for Position<K, A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl<K: Key, A: Access> fmt::Debug for Position<K, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.key.is_none() {
            f.write_str("Position(end)")
        } else {
            write!(f, "Position({:?})", self.key)
        }
    }
}
