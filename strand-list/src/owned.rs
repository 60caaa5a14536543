//! OwnedList - a doubly-linked list that owns its storage.
//!
//! Use [`OwnedList`] when:
//! - there is a single list, not several sharing one storage pool
//! - passing `&mut storage` to every method is not wanted
//! - elements never need to move between lists by relinking
//!
//! Use [`List`] with external storage when several lists share one pool
//! and elements move between them through [`List::splice`].

use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};

use crate::iter::{Drain, Iter, IterMut, Positions};
use crate::position::{Access, ConstPos, Pos, Position};
use crate::{List, SlabListStorage};

type Inner<T> = List<T, SlabListStorage<T>, usize>;

/// A doubly-linked list that owns its storage.
///
/// A convenience wrapper around [`List`] + [`SlabListStorage`]. Storage
/// grows as needed, so insertion never fails. Dropping the list drops
/// every element.
///
/// # Example
///
/// ```
/// use strand_list::OwnedList;
///
/// let mut queue: OwnedList<u64> = OwnedList::with_capacity(100);
///
/// queue.push_back(1);
/// let two = queue.push_back(2);
/// queue.push_back(3);
///
/// // Remove from middle
/// assert_eq!(queue.remove_at(two), Some(2));
/// assert_eq!(queue.pop_front(), Some(1));
/// assert_eq!(queue, OwnedList::from_iter([3]));
/// ```
pub struct OwnedList<T> {
    storage: SlabListStorage<T>,
    list: Inner<T>,
}

impl<T> OwnedList<T> {
    /// Creates an empty list.
    #[inline]
    pub fn new() -> Self {
        Self {
            storage: slab::Slab::new(),
            list: List::new(),
        }
    }

    /// Creates an empty list with room for `capacity` elements before the
    /// storage grows.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: slab::Slab::with_capacity(capacity),
            list: List::new(),
        }
    }

    /// Returns the number of elements in the list.
    #[inline]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Returns `true` if the list is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Returns the number of elements the storage holds without growing.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    /// Replaces the contents with the items of `values`.
    pub fn assign<I: IntoIterator<Item = T>>(&mut self, values: I) {
        self.list.assign(&mut self.storage, values);
    }

    /// Replaces the contents with `count` clones of `value`.
    pub fn assign_n(&mut self, count: usize, value: &T)
    where
        T: Clone,
    {
        self.list.assign_n(&mut self.storage, count, value);
    }

    /// Exchanges the contents of two lists. O(1).
    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        core::mem::swap(self, other);
    }

    // ========================================================================
    // Positions
    // ========================================================================

    /// Position of the first element, or the end position if empty.
    #[inline]
    pub fn begin(&self) -> Pos<usize> {
        self.list.begin(&self.storage)
    }

    /// The end position.
    #[inline]
    pub fn end(&self) -> Pos<usize> {
        self.list.end()
    }

    /// Read-only position of the first element, or the end position if
    /// empty.
    #[inline]
    pub fn cbegin(&self) -> ConstPos<usize> {
        self.list.cbegin(&self.storage)
    }

    /// Read-only end position.
    #[inline]
    pub fn cend(&self) -> ConstPos<usize> {
        self.list.cend()
    }

    /// Position of the last element, or the end position if empty.
    #[inline]
    pub fn back_pos(&self) -> Pos<usize> {
        self.list.back_pos(&self.storage)
    }

    /// See [`List::next`].
    #[inline]
    pub fn next<A: Access>(&self, pos: Position<usize, A>) -> Position<usize, A> {
        self.list.next(&self.storage, pos)
    }

    /// See [`List::prev`].
    #[inline]
    pub fn prev<A: Access>(&self, pos: Position<usize, A>) -> Position<usize, A> {
        self.list.prev(&self.storage, pos)
    }

    /// Returns the element at `pos`, or `None` for the end position.
    #[inline]
    pub fn get<A: Access>(&self, pos: Position<usize, A>) -> Option<&T> {
        self.list.get(&self.storage, pos)
    }

    /// Returns the element at `pos` mutably, or `None` for the end position.
    #[inline]
    pub fn get_mut(&mut self, pos: Pos<usize>) -> Option<&mut T> {
        self.list.get_mut(&mut self.storage, pos)
    }

    // ========================================================================
    // Deque operations
    // ========================================================================

    /// Pushes a value to the back of the list.
    #[inline]
    pub fn push_back(&mut self, value: T) -> Pos<usize> {
        self.list.push_back(&mut self.storage, value)
    }

    /// Pushes a value to the front of the list.
    #[inline]
    pub fn push_front(&mut self, value: T) -> Pos<usize> {
        self.list.push_front(&mut self.storage, value)
    }

    /// Removes and returns the front element.
    #[inline]
    pub fn pop_front(&mut self) -> Option<T> {
        self.list.pop_front(&mut self.storage)
    }

    /// Removes and returns the back element.
    #[inline]
    pub fn pop_back(&mut self) -> Option<T> {
        self.list.pop_back(&mut self.storage)
    }

    /// Returns a reference to the front element.
    #[inline]
    pub fn front(&self) -> Option<&T> {
        self.list.front(&self.storage)
    }

    /// Returns a mutable reference to the front element.
    #[inline]
    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.list.front_mut(&mut self.storage)
    }

    /// Returns a reference to the back element.
    #[inline]
    pub fn back(&self) -> Option<&T> {
        self.list.back(&self.storage)
    }

    /// Returns a mutable reference to the back element.
    #[inline]
    pub fn back_mut(&mut self) -> Option<&mut T> {
        self.list.back_mut(&mut self.storage)
    }

    // ========================================================================
    // Insert / erase
    // ========================================================================

    /// Inserts a value before `pos`, returning its position.
    #[inline]
    pub fn insert(&mut self, pos: impl Into<ConstPos<usize>>, value: T) -> Pos<usize> {
        self.list.insert(&mut self.storage, pos, value)
    }

    /// Inserts `count` clones of `value` before `pos`. See [`List::insert_n`].
    pub fn insert_n(&mut self, pos: impl Into<ConstPos<usize>>, count: usize, value: &T) -> Pos<usize>
    where
        T: Clone,
    {
        self.list.insert_n(&mut self.storage, pos, count, value)
    }

    /// Inserts the items of `values` before `pos`. See [`List::insert_iter`].
    pub fn insert_iter<I>(&mut self, pos: impl Into<ConstPos<usize>>, values: I) -> Pos<usize>
    where
        I: IntoIterator<Item = T>,
    {
        self.list.insert_iter(&mut self.storage, pos, values)
    }

    /// Removes the element at `pos` and returns the following position.
    #[inline]
    pub fn erase(&mut self, pos: impl Into<ConstPos<usize>>) -> Pos<usize> {
        self.list.erase(&mut self.storage, pos)
    }

    /// Removes the element at `pos` and returns it.
    #[inline]
    pub fn remove_at(&mut self, pos: impl Into<ConstPos<usize>>) -> Option<T> {
        self.list.remove_at(&mut self.storage, pos)
    }

    /// Removes `[first, last)` and returns `last`.
    pub fn erase_range(
        &mut self,
        first: impl Into<ConstPos<usize>>,
        last: impl Into<ConstPos<usize>>,
    ) -> Pos<usize> {
        self.list.erase_range(&mut self.storage, first, last)
    }

    /// Overwrites `[first, last)` with clones of `value`.
    pub fn fill(
        &mut self,
        first: impl Into<ConstPos<usize>>,
        last: impl Into<ConstPos<usize>>,
        value: &T,
    ) where
        T: Clone,
    {
        self.list.fill(&mut self.storage, first, last, value);
    }

    /// Clears the list, dropping all elements.
    pub fn clear(&mut self) {
        self.list.clear(&mut self.storage);
    }

    /// Removes every element equal to `value`. Returns how many were removed.
    pub fn remove(&mut self, value: &T) -> usize
    where
        T: PartialEq,
    {
        self.list.remove(&mut self.storage, value)
    }

    /// Removes every element matching `pred`. Returns how many were removed.
    pub fn remove_if<F: FnMut(&T) -> bool>(&mut self, pred: F) -> usize {
        self.list.remove_if(&mut self.storage, pred)
    }

    /// Keeps only the elements matching `pred`. Returns how many were removed.
    pub fn retain<F: FnMut(&T) -> bool>(&mut self, pred: F) -> usize {
        self.list.retain(&mut self.storage, pred)
    }

    /// Reverses the list in place.
    pub fn reverse(&mut self) {
        self.list.reverse(&mut self.storage);
    }

    /// Returns `true` if some element equals `value`.
    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.list.contains(&self.storage, value)
    }

    // ========================================================================
    // Reordering
    // ========================================================================

    /// Moves the element at `it` before `pos`. See [`List::move_before`].
    #[inline]
    pub fn move_before(&mut self, pos: impl Into<ConstPos<usize>>, it: impl Into<ConstPos<usize>>) {
        self.list.move_before(&mut self.storage, pos, it);
    }

    /// Moves the element at `it` to the front.
    #[inline]
    pub fn move_to_front(&mut self, it: impl Into<ConstPos<usize>>) {
        self.list.move_to_front(&mut self.storage, it);
    }

    /// Moves the element at `it` to the back.
    #[inline]
    pub fn move_to_back(&mut self, it: impl Into<ConstPos<usize>>) {
        self.list.move_to_back(&mut self.storage, it);
    }

    // ========================================================================
    // Iteration
    // ========================================================================

    /// Returns an iterator over references to elements.
    #[inline]
    pub fn iter(&self) -> Iter<'_, T, SlabListStorage<T>, usize> {
        self.list.iter(&self.storage)
    }

    /// Returns an iterator over mutable references to elements.
    #[inline]
    pub fn iter_mut(&mut self) -> IterMut<'_, T, SlabListStorage<T>, usize> {
        self.list.iter_mut(&mut self.storage)
    }

    /// Returns an iterator over element positions.
    #[inline]
    pub fn positions(&self) -> Positions<'_, T, SlabListStorage<T>, usize> {
        self.list.positions(&self.storage)
    }

    /// Empties the list, returning an iterator over the removed elements.
    #[inline]
    pub fn drain(&mut self) -> Drain<'_, T, SlabListStorage<T>, usize> {
        self.list.drain(&mut self.storage)
    }
}

impl<T> Default for OwnedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for OwnedList<T> {
    fn clone(&self) -> Self {
        let mut copy = Self::with_capacity(self.len());
        copy.extend(self.iter().cloned());
        copy
    }
}

impl<T: fmt::Debug> fmt::Debug for OwnedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for OwnedList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for OwnedList<T> {}

impl<T: PartialOrd> PartialOrd for OwnedList<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<T: Ord> Ord for OwnedList<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<T: Hash> Hash for OwnedList<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for item in self.iter() {
            item.hash(state);
        }
    }
}

impl<T> FromIterator<T> for OwnedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

impl<T> Extend<T> for OwnedList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push_back(value);
        }
    }
}

impl<'a, T: Copy + 'a> Extend<&'a T> for OwnedList<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

/// Owning iterator over the elements of an [`OwnedList`].
pub struct IntoIter<T> {
    list: OwnedList<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        self.list.pop_front()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.list.len(), Some(self.list.len()))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    #[inline]
    fn next_back(&mut self) -> Option<T> {
        self.list.pop_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> IntoIterator for OwnedList<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter { list: self }
    }
}

impl<'a, T> IntoIterator for &'a OwnedList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T, SlabListStorage<T>, usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut OwnedList<T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T, SlabListStorage<T>, usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
