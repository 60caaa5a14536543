//! List node stored in [`Storage`](crate::Storage).

use crate::Key;

/// A node in a linked list.
///
/// Wraps user data with `prev`/`next` keys. `K::NONE` marks the ends of a
/// chain. Users reach the data through the list's accessors; the links
/// are owned by whichever list currently holds the node.
#[derive(Debug)]
pub struct ListNode<T, K: Key = u32> {
    pub(crate) data: T,
    pub(crate) prev: K,
    pub(crate) next: K,
    /// Generation stamp of the list that created this node.
    #[cfg(debug_assertions)]
    pub(crate) stamp: u64,
}

impl<T, K: Key> ListNode<T, K> {
    /// Creates an unlinked node.
    #[inline]
    pub(crate) fn new(data: T) -> Self {
        Self {
            data,
            prev: K::NONE,
            next: K::NONE,
            #[cfg(debug_assertions)]
            stamp: 0,
        }
    }

    /// Returns the stored element.
    #[inline]
    pub fn data(&self) -> &T {
        &self.data
    }

    /// Consumes the node, returning the element.
    #[inline]
    pub fn into_data(self) -> T {
        self.data
    }
}
