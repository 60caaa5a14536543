//! Doubly-linked list over external node storage.
//!
//! Nodes live in a [`Storage`], with the list holding only head, tail and
//! length. Any number of lists can share one storage; that is what makes
//! [`splice`](List::splice) a pure relink with no allocation, no element
//! copy and no invalidated positions.
//!
//! # Storage Invariant
//!
//! A list must always be used with the same storage instance, and lists
//! that splice between each other must share it. Passing a different
//! storage is a logic error and may panic or corrupt the lists. This is
//! the caller's responsibility (same discipline as the `slab` crate).
//!
//! # Bounded vs Unbounded Storage
//!
//! Every inserting operation has a `try_` form that works with any
//! storage and returns [`Full`] when the storage runs out of slots. With
//! growable storage (`slab::Slab`) the infallible forms are available too:
//!
//! ```
//! use strand_list::{BoxedListStorage, List};
//!
//! let mut storage: BoxedListStorage<u64> = BoxedListStorage::with_capacity(16);
//! let mut list: List<u64, BoxedListStorage<u64>> = List::new();
//!
//! list.try_push_back(&mut storage, 42).unwrap();
//! ```
//!
//! ```
//! use strand_list::{List, SlabListStorage};
//!
//! let mut storage: SlabListStorage<u64> = slab::Slab::with_capacity(16);
//! let mut list: List<u64, SlabListStorage<u64>, usize> = List::new();
//!
//! list.push_back(&mut storage, 42); // No Result
//! ```
//!
//! # Splicing
//!
//! ```
//! use strand_list::{List, SlabListStorage};
//!
//! let mut storage: SlabListStorage<u64> = slab::Slab::new();
//! let mut a: List<u64, SlabListStorage<u64>, usize> = List::new();
//! let mut b: List<u64, SlabListStorage<u64>, usize> = List::new();
//!
//! a.assign(&mut storage, [1, 2, 3, 4]);
//! b.assign(&mut storage, [10, 20, 30]);
//! let moved = b.begin(&storage);
//!
//! // Splice all of `b` before the element 2
//! let two = a.next(&storage, a.begin(&storage));
//! a.splice(&mut storage, two, &mut b);
//!
//! assert!(b.is_empty());
//! assert_eq!(a.len(), 7);
//! assert_eq!(a.iter(&storage).copied().collect::<Vec<_>>(), [1, 10, 20, 30, 2, 3, 4]);
//!
//! // Positions follow their nodes
//! assert_eq!(a.get(&storage, moved), Some(&10));
//! ```
//!
//! # Ranges
//!
//! Ranges taken by [`erase_range`](List::erase_range),
//! [`splice_range`](List::splice_range), [`fill`](List::fill) and
//! [`try_assign_range`](List::try_assign_range) are half-open:
//! `[first, last)`, where `last` may be the end position.
//!
//! # Concurrency
//!
//! Lists do no synchronization. Mutating a list, or its storage, from more
//! than one thread needs an external lock.

use core::cmp::Ordering;
use core::iter;
use core::marker::PhantomData;
use core::mem;

use crate::iter::{Drain, Iter, IterMut, Positions};
use crate::position::{Access, ConstPos, Pos, Position};
use crate::{BoxedStorage, Full, Key, ListNode, Storage, UnboundedStorage};

/// Bounded list storage backed by a boxed slice.
pub type BoxedListStorage<T, K = u32> = BoxedStorage<ListNode<T, K>, K>;

/// Growable list storage backed by `slab::Slab`.
pub type SlabListStorage<T> = slab::Slab<ListNode<T, usize>>;

/// Hands out disjoint stamp ranges so that no two lists ever stamp two
/// nodes alike.
#[cfg(debug_assertions)]
static NEXT_GENERATION: core::sync::atomic::AtomicU64 = core::sync::atomic::AtomicU64::new(1);

/// A doubly-linked list over external storage.
///
/// The list tracks head, tail and length. Nodes live in user-provided
/// storage, wrapped in [`ListNode`]. Elements are addressed through
/// [`Position`]s.
///
/// # Type Parameters
///
/// - `T`: Element type
/// - `S`: Storage type (e.g. [`BoxedListStorage<T>`])
/// - `K`: Key type (default `u32`)
///
/// # Dropping
///
/// A list does not own its storage, so dropping a non-empty list leaves
/// its nodes in storage until the storage itself is dropped or cleared.
/// Call [`clear`](List::clear) first to free them. [`OwnedList`](crate::OwnedList)
/// bundles a list with its own storage and frees everything on drop.
///
/// # Example
///
/// ```
/// use strand_list::{BoxedListStorage, List};
///
/// let mut storage: BoxedListStorage<String> = BoxedListStorage::with_capacity(16);
/// let mut list: List<String, BoxedListStorage<String>> = List::new();
///
/// let pos = list.try_push_back(&mut storage, "hello".into()).unwrap();
/// list.try_push_front(&mut storage, "well".into()).unwrap();
///
/// assert_eq!(list.get(&storage, pos).map(String::as_str), Some("hello"));
/// assert_eq!(list.front(&storage).map(String::as_str), Some("well"));
/// ```
pub struct List<T, S, K: Key = u32>
where
    S: Storage<ListNode<T, K>, Key = K>,
{
    head: K,
    tail: K,
    len: usize,
    #[cfg(debug_assertions)]
    generation: u64,
    _marker: PhantomData<(T, S)>,
}

impl<T, S, K: Key> Default for List<T, S, K>
where
    S: Storage<ListNode<T, K>, Key = K>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, S, K: Key> core::fmt::Debug for List<T, S, K>
where
    S: Storage<ListNode<T, K>, Key = K>,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("List")
            .field("head", &self.head)
            .field("tail", &self.tail)
            .field("len", &self.len)
            .finish()
    }
}

// =============================================================================
// Base impl - works with any Storage
// =============================================================================

impl<T, S, K: Key> List<T, S, K>
where
    S: Storage<ListNode<T, K>, Key = K>,
{
    /// Creates an empty list.
    #[inline]
    pub fn new() -> Self {
        Self {
            head: K::NONE,
            tail: K::NONE,
            len: 0,
            #[cfg(debug_assertions)]
            generation: NEXT_GENERATION.fetch_add(1, core::sync::atomic::Ordering::Relaxed) << 32,
            _marker: PhantomData,
        }
    }

    /// Returns the number of elements in the list.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the list is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Moves every element into a new list, leaving `self` empty.
    ///
    /// O(1). Positions stay valid and now belong to the returned list.
    #[inline]
    pub fn take(&mut self) -> Self {
        let mut taken = Self::new();
        self.swap(&mut taken);
        taken
    }

    /// Exchanges the contents of two lists. O(1).
    ///
    /// No position is invalidated; each follows its node to the other list.
    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(&mut self.head, &mut other.head);
        mem::swap(&mut self.tail, &mut other.tail);
        mem::swap(&mut self.len, &mut other.len);
    }

    // ========================================================================
    // Positions
    // ========================================================================

    /// Returns the position of the first element, or [`end`](List::end) if
    /// the list is empty.
    #[inline]
    pub fn begin(&self, storage: &S) -> Pos<K> {
        Self::pos_at(storage, self.head)
    }

    /// Returns the end position, one past the last element.
    #[inline]
    pub fn end(&self) -> Pos<K> {
        Pos::end()
    }

    /// Read-only form of [`begin`](List::begin).
    #[inline]
    pub fn cbegin(&self, storage: &S) -> ConstPos<K> {
        self.begin(storage).as_const()
    }

    /// Read-only form of [`end`](List::end).
    #[inline]
    pub fn cend(&self) -> ConstPos<K> {
        ConstPos::end()
    }

    /// Returns the position of the last element, or the end position if the
    /// list is empty.
    #[inline]
    pub fn back_pos(&self, storage: &S) -> Pos<K> {
        Self::pos_at(storage, self.tail)
    }

    /// Advances `pos` to the following position.
    ///
    /// Advancing the end position is a caller error: it panics in debug
    /// builds and stays at the end in release builds.
    #[inline]
    pub fn next<A: Access>(&self, storage: &S, pos: Position<K, A>) -> Position<K, A> {
        self.check(storage, pos);
        debug_assert!(pos.key.is_some(), "cannot advance past the end position");
        if pos.key.is_none() {
            return pos;
        }

        // Safety: check above, position keys name occupied slots
        let next = unsafe { storage.get_unchecked(pos.key) }.next;
        Self::pos_at(storage, next)
    }

    /// Moves `pos` to the preceding position.
    ///
    /// The end position retreats to the last element. Retreating from the
    /// first element is a caller error: it panics in debug builds and yields
    /// the end position in release builds.
    #[inline]
    pub fn prev<A: Access>(&self, storage: &S, pos: Position<K, A>) -> Position<K, A> {
        self.check(storage, pos);
        if pos.key.is_none() {
            return Self::pos_at(storage, self.tail);
        }

        // Safety: position keys name occupied slots
        let prev = unsafe { storage.get_unchecked(pos.key) }.prev;
        debug_assert!(prev.is_some(), "cannot retreat before the first element");
        Self::pos_at(storage, prev)
    }

    /// Returns `true` if `pos` is the first element.
    #[inline]
    pub fn is_head<A: Access>(&self, pos: Position<K, A>) -> bool {
        pos.key.is_some() && pos.key == self.head
    }

    /// Returns `true` if `pos` is the last element.
    #[inline]
    pub fn is_tail<A: Access>(&self, pos: Position<K, A>) -> bool {
        pos.key.is_some() && pos.key == self.tail
    }

    // ========================================================================
    // Access
    // ========================================================================

    /// Returns the element at `pos`, or `None` for the end position.
    #[inline]
    pub fn get<'a, A: Access>(&self, storage: &'a S, pos: Position<K, A>) -> Option<&'a T>
    where
        K: 'a,
    {
        self.check(storage, pos);
        if pos.key.is_none() {
            return None;
        }
        storage.get(pos.key).map(|node| &node.data)
    }

    /// Returns the element at `pos` mutably, or `None` for the end position.
    ///
    /// Only the mutable view [`Pos`] grants this.
    #[inline]
    pub fn get_mut<'a>(&self, storage: &'a mut S, pos: Pos<K>) -> Option<&'a mut T>
    where
        K: 'a,
    {
        self.check(storage, pos);
        if pos.key.is_none() {
            return None;
        }
        storage.get_mut(pos.key).map(|node| &mut node.data)
    }

    /// Returns a reference to the front element.
    #[inline]
    pub fn front<'a>(&self, storage: &'a S) -> Option<&'a T>
    where
        K: 'a,
    {
        if self.head.is_none() {
            None
        } else {
            // Safety: head is valid when is_some()
            Some(unsafe { &storage.get_unchecked(self.head).data })
        }
    }

    /// Returns a mutable reference to the front element.
    #[inline]
    pub fn front_mut<'a>(&self, storage: &'a mut S) -> Option<&'a mut T>
    where
        K: 'a,
    {
        if self.head.is_none() {
            None
        } else {
            // Safety: head is valid when is_some()
            Some(unsafe { &mut storage.get_unchecked_mut(self.head).data })
        }
    }

    /// Returns a reference to the back element.
    #[inline]
    pub fn back<'a>(&self, storage: &'a S) -> Option<&'a T>
    where
        K: 'a,
    {
        if self.tail.is_none() {
            None
        } else {
            // Safety: tail is valid when is_some()
            Some(unsafe { &storage.get_unchecked(self.tail).data })
        }
    }

    /// Returns a mutable reference to the back element.
    #[inline]
    pub fn back_mut<'a>(&self, storage: &'a mut S) -> Option<&'a mut T>
    where
        K: 'a,
    {
        if self.tail.is_none() {
            None
        } else {
            // Safety: tail is valid when is_some()
            Some(unsafe { &mut storage.get_unchecked_mut(self.tail).data })
        }
    }

    /// Returns `true` if some element equals `value`.
    pub fn contains(&self, storage: &S, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.iter(storage).any(|item| item == value)
    }

    // ========================================================================
    // Push / insert (fallible)
    // ========================================================================

    /// Pushes a value to the back of the list.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(value))` if storage is full.
    #[inline]
    pub fn try_push_back(&mut self, storage: &mut S, value: T) -> Result<Pos<K>, Full<T>> {
        let key = self.alloc(storage, value)?;
        self.link_run_before(storage, K::NONE, key, key, 1);
        Ok(Self::pos_at(storage, key))
    }

    /// Pushes a value to the front of the list.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(value))` if storage is full.
    #[inline]
    pub fn try_push_front(&mut self, storage: &mut S, value: T) -> Result<Pos<K>, Full<T>> {
        let key = self.alloc(storage, value)?;
        let head = self.head;
        self.link_run_before(storage, head, key, key, 1);
        Ok(Self::pos_at(storage, key))
    }

    /// Inserts a value before `pos` (at the back for the end position).
    ///
    /// Returns the position of the new element.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(value))` if storage is full; the list is unchanged.
    #[inline]
    pub fn try_insert(
        &mut self,
        storage: &mut S,
        pos: impl Into<ConstPos<K>>,
        value: T,
    ) -> Result<Pos<K>, Full<T>> {
        let pos = pos.into();
        self.check(storage, pos);

        let key = self.alloc(storage, value)?;
        self.link_run_before(storage, pos.key, key, key, 1);
        Ok(Self::pos_at(storage, key))
    }

    /// Inserts `count` clones of `value` before `pos`.
    ///
    /// Returns the position of the first inserted element, or `pos` when
    /// `count` is zero.
    ///
    /// # Errors
    ///
    /// All or nothing: if storage fills up part way, the clones already
    /// linked by this call are unlinked and dropped before `Full` is
    /// returned, leaving the list as it was.
    pub fn try_insert_n(
        &mut self,
        storage: &mut S,
        pos: impl Into<ConstPos<K>>,
        count: usize,
        value: &T,
    ) -> Result<Pos<K>, Full<T>>
    where
        T: Clone,
    {
        self.try_insert_iter(storage, pos, iter::repeat(value).take(count).cloned())
    }

    /// Inserts every item of `values`, in order, before `pos`.
    ///
    /// Returns the position of the first inserted element, or `pos` when
    /// `values` is empty.
    ///
    /// # Errors
    ///
    /// All or nothing, as for [`try_insert_n`](List::try_insert_n). The
    /// remaining items of `values` are not consumed.
    pub fn try_insert_iter<I>(
        &mut self,
        storage: &mut S,
        pos: impl Into<ConstPos<K>>,
        values: I,
    ) -> Result<Pos<K>, Full<T>>
    where
        I: IntoIterator<Item = T>,
    {
        let pos = pos.into();
        self.check(storage, pos);

        let mut first = K::NONE;
        let mut inserted = 0;
        for value in values {
            match self.alloc(storage, value) {
                Ok(key) => {
                    self.link_run_before(storage, pos.key, key, key, 1);
                    if first.is_none() {
                        first = key;
                    }
                    inserted += 1;
                }
                Err(full) => {
                    self.discard_run(storage, first, inserted);
                    return Err(full);
                }
            }
        }

        if first.is_none() {
            Ok(pos.cast_mut())
        } else {
            Ok(Self::pos_at(storage, first))
        }
    }

    // ========================================================================
    // Construction & assignment (fallible)
    // ========================================================================

    /// Creates a list of `count` clones of `value`.
    ///
    /// # Errors
    ///
    /// Returns `Full` if storage runs out; nothing is left allocated.
    pub fn try_with_value(storage: &mut S, count: usize, value: &T) -> Result<Self, Full<T>>
    where
        T: Clone,
    {
        let mut list = Self::new();
        list.try_assign_n(storage, count, value)?;
        Ok(list)
    }

    /// Creates a list holding the items of `values`, in order.
    ///
    /// # Errors
    ///
    /// Returns `Full` if storage runs out; nothing is left allocated.
    pub fn try_from_iter_in<I>(storage: &mut S, values: I) -> Result<Self, Full<T>>
    where
        I: IntoIterator<Item = T>,
    {
        let mut list = Self::new();
        list.try_assign(storage, values)?;
        Ok(list)
    }

    /// Deep-copies this list into new nodes of the same storage.
    ///
    /// The copy is independent: mutating one never affects the other.
    ///
    /// # Errors
    ///
    /// Returns `Full` if storage runs out; the partial copy is freed.
    pub fn try_clone_in(&self, storage: &mut S) -> Result<Self, Full<T>>
    where
        T: Clone,
    {
        let mut copy = Self::new();
        copy.try_extend_from_run(storage, self.head, K::NONE)?;
        Ok(copy)
    }

    /// Replaces the contents with `count` clones of `value`.
    ///
    /// # Errors
    ///
    /// Strong guarantee: the replacement is built in full before it is
    /// swapped in, so on `Full` the list is exactly as it was. With
    /// bounded storage, old and new elements must fit at the same time.
    pub fn try_assign_n(&mut self, storage: &mut S, count: usize, value: &T) -> Result<(), Full<T>>
    where
        T: Clone,
    {
        self.try_assign(storage, iter::repeat(value).take(count).cloned())
    }

    /// Replaces the contents with the items of `values`.
    ///
    /// # Errors
    ///
    /// Strong guarantee, as for [`try_assign_n`](List::try_assign_n).
    pub fn try_assign<I>(&mut self, storage: &mut S, values: I) -> Result<(), Full<T>>
    where
        I: IntoIterator<Item = T>,
    {
        let mut fresh = Self::new();
        for value in values {
            if let Err(full) = fresh.try_push_back(storage, value) {
                fresh.clear(storage);
                return Err(full);
            }
        }

        self.replace_with(storage, fresh);
        Ok(())
    }

    /// Replaces the contents with clones of `[first, last)`.
    ///
    /// The range may belong to this list or to any list in the same
    /// storage.
    ///
    /// # Errors
    ///
    /// Strong guarantee, as for [`try_assign_n`](List::try_assign_n).
    pub fn try_assign_range(
        &mut self,
        storage: &mut S,
        first: impl Into<ConstPos<K>>,
        last: impl Into<ConstPos<K>>,
    ) -> Result<(), Full<T>>
    where
        T: Clone,
    {
        let (first, last) = (first.into(), last.into());
        self.check(storage, first);
        self.check(storage, last);

        let mut fresh = Self::new();
        fresh.try_extend_from_run(storage, first.key, last.key)?;
        self.replace_with(storage, fresh);
        Ok(())
    }

    // ========================================================================
    // Remove operations (unlink + deallocate)
    // ========================================================================

    /// Removes and returns the front element.
    ///
    /// Returns `None` if the list is empty.
    #[inline]
    pub fn pop_front(&mut self, storage: &mut S) -> Option<T> {
        if self.head.is_none() {
            return None;
        }

        let key = self.head;
        self.unlink_run(storage, key, key, 1);
        // Safety: key was linked, so it is occupied
        Some(unsafe { storage.remove_unchecked(key) }.data)
    }

    /// Removes and returns the back element.
    ///
    /// Returns `None` if the list is empty.
    #[inline]
    pub fn pop_back(&mut self, storage: &mut S) -> Option<T> {
        if self.tail.is_none() {
            return None;
        }

        let key = self.tail;
        self.unlink_run(storage, key, key, 1);
        // Safety: key was linked, so it is occupied
        Some(unsafe { storage.remove_unchecked(key) }.data)
    }

    /// Removes the element at `pos` and returns the following position.
    ///
    /// Erasing the end position is a caller error: it panics in debug builds
    /// and is a no-op returning the end position in release builds.
    #[inline]
    pub fn erase(&mut self, storage: &mut S, pos: impl Into<ConstPos<K>>) -> Pos<K> {
        let pos = pos.into();
        self.check(storage, pos);
        debug_assert!(pos.key.is_some(), "cannot erase the end position");
        if pos.key.is_none() {
            return Pos::end();
        }

        let next = self.destroy(storage, pos.key).1;
        Self::pos_at(storage, next)
    }

    /// Removes the element at `pos` and returns it.
    ///
    /// Returns `None` for the end position.
    #[inline]
    pub fn remove_at(&mut self, storage: &mut S, pos: impl Into<ConstPos<K>>) -> Option<T> {
        let pos = pos.into();
        self.check(storage, pos);
        if pos.key.is_none() {
            return None;
        }

        Some(self.destroy(storage, pos.key).0)
    }

    /// Removes every element in `[first, last)` and returns `last`.
    ///
    /// The empty range (`first == last`) is a no-op and also returns `last`.
    /// `last` must be reachable from `first`.
    pub fn erase_range(
        &mut self,
        storage: &mut S,
        first: impl Into<ConstPos<K>>,
        last: impl Into<ConstPos<K>>,
    ) -> Pos<K> {
        let (first, last) = (first.into(), last.into());
        self.check(storage, first);
        self.check(storage, last);

        let mut key = first.key;
        while key != last.key {
            debug_assert!(key.is_some(), "`last` is not reachable from `first`");
            if key.is_none() {
                break;
            }
            key = self.destroy(storage, key).1;
        }

        last.cast_mut()
    }

    /// Clears the list, dropping all elements.
    pub fn clear(&mut self, storage: &mut S) {
        let mut key = self.head;
        while key.is_some() {
            // Safety: key came from list traversal
            let node = unsafe { storage.remove_unchecked(key) };
            key = node.next;
        }

        self.head = K::NONE;
        self.tail = K::NONE;
        self.len = 0;
    }

    /// Removes every element equal to `value`, keeping the order of the
    /// rest. Returns how many were removed.
    pub fn remove(&mut self, storage: &mut S, value: &T) -> usize
    where
        T: PartialEq,
    {
        self.remove_if(storage, |item| item == value)
    }

    /// Removes every element for which `pred` returns `true`, keeping the
    /// order of the rest. Returns how many were removed.
    ///
    /// `pred` is called exactly once per element, front to back.
    pub fn remove_if<F>(&mut self, storage: &mut S, mut pred: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        let mut removed = 0;
        let mut key = self.head;
        while key.is_some() {
            // Safety: key came from list traversal
            let node = unsafe { storage.get_unchecked(key) };
            let next = node.next;
            if pred(&node.data) {
                self.destroy(storage, key);
                removed += 1;
            }
            key = next;
        }
        removed
    }

    /// Keeps only the elements for which `pred` returns `true`.
    ///
    /// Returns how many were removed.
    pub fn retain<F>(&mut self, storage: &mut S, mut pred: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        self.remove_if(storage, |item| !pred(item))
    }

    // ========================================================================
    // In-place mutation
    // ========================================================================

    /// Overwrites every element in `[first, last)` with a clone of `value`.
    pub fn fill(
        &self,
        storage: &mut S,
        first: impl Into<ConstPos<K>>,
        last: impl Into<ConstPos<K>>,
        value: &T,
    ) where
        T: Clone,
    {
        let (first, last) = (first.into(), last.into());
        self.check(storage, first);
        self.check(storage, last);

        let mut key = first.key;
        while key != last.key {
            debug_assert!(key.is_some(), "`last` is not reachable from `first`");
            if key.is_none() {
                break;
            }
            // Safety: key came from list traversal
            let node = unsafe { storage.get_unchecked_mut(key) };
            node.data.clone_from(value);
            key = node.next;
        }
    }

    /// Reverses the order of the elements in place. O(n).
    ///
    /// Nodes are relinked, not moved, so every position stays valid and
    /// keeps pointing at the same element.
    pub fn reverse(&mut self, storage: &mut S) {
        let mut key = self.head;
        while key.is_some() {
            // Safety: key came from list traversal
            let node = unsafe { storage.get_unchecked_mut(key) };
            mem::swap(&mut node.prev, &mut node.next);
            key = node.prev;
        }
        mem::swap(&mut self.head, &mut self.tail);
    }

    // ========================================================================
    // Splice (relink only, no alloc/dealloc)
    // ========================================================================

    /// Moves every element of `other` before `pos`. O(1).
    ///
    /// `other` is left empty. Both lists must use `storage`.
    #[inline]
    pub fn splice(&mut self, storage: &mut S, pos: impl Into<ConstPos<K>>, other: &mut Self) {
        let pos = pos.into();
        self.check(storage, pos);
        if other.is_empty() {
            return;
        }

        let (first, last, count) = (other.head, other.tail, other.len);
        other.head = K::NONE;
        other.tail = K::NONE;
        other.len = 0;

        self.link_run_before(storage, pos.key, first, last, count);
    }

    /// Moves the element at `it`, which belongs to `other`, before `pos`.
    /// O(1).
    ///
    /// Use [`move_before`](List::move_before) to reorder within one list.
    /// `it` must not be the end position.
    #[inline]
    pub fn splice_one(
        &mut self,
        storage: &mut S,
        pos: impl Into<ConstPos<K>>,
        other: &mut Self,
        it: impl Into<ConstPos<K>>,
    ) {
        let (pos, it) = (pos.into(), it.into());
        self.check(storage, pos);
        self.check(storage, it);
        debug_assert!(it.key.is_some(), "cannot splice the end position");
        if it.key.is_none() {
            return;
        }

        other.unlink_run(storage, it.key, it.key, 1);
        self.link_run_before(storage, pos.key, it.key, it.key, 1);
    }

    /// Moves `[first, last)` out of `other` and before `pos`.
    ///
    /// The relink is O(1); counting the moved elements to keep both lengths
    /// right is O(k). An empty range is a no-op.
    pub fn splice_range(
        &mut self,
        storage: &mut S,
        pos: impl Into<ConstPos<K>>,
        other: &mut Self,
        first: impl Into<ConstPos<K>>,
        last: impl Into<ConstPos<K>>,
    ) {
        let (pos, first, last) = (pos.into(), first.into(), last.into());
        self.check(storage, pos);
        self.check(storage, first);
        self.check(storage, last);
        if first.key == last.key {
            return;
        }

        let Some((run_last, count)) = Self::measure_run(storage, first.key, last.key) else {
            return;
        };

        other.unlink_run(storage, first.key, run_last, count);
        self.link_run_before(storage, pos.key, first.key, run_last, count);
    }

    /// Moves every element of `other` to the back of this list. O(1).
    #[inline]
    pub fn append(&mut self, storage: &mut S, other: &mut Self) {
        self.splice(storage, ConstPos::end(), other);
    }

    /// Splits the list before `pos`.
    ///
    /// Returns a new list holding `pos` and everything after it; `self`
    /// keeps everything before. O(k) to count the split-off part. Splitting
    /// at the end position returns an empty list.
    pub fn split_off(&mut self, storage: &mut S, pos: impl Into<ConstPos<K>>) -> Self {
        let pos = pos.into();
        self.check(storage, pos);

        let mut other = Self::new();
        if pos.key.is_none() {
            return other;
        }
        if pos.key == self.head {
            self.swap(&mut other);
            return other;
        }

        let Some((last, count)) = Self::measure_run(storage, pos.key, K::NONE) else {
            return other;
        };
        self.unlink_run(storage, pos.key, last, count);
        other.link_run_before(storage, K::NONE, pos.key, last, count);
        other
    }

    /// Moves the element at `it` before `pos`, within this list. O(1).
    ///
    /// No-op when `it` is `pos` or already sits right before it.
    pub fn move_before(
        &mut self,
        storage: &mut S,
        pos: impl Into<ConstPos<K>>,
        it: impl Into<ConstPos<K>>,
    ) {
        let (pos, it) = (pos.into(), it.into());
        self.check(storage, pos);
        self.check(storage, it);
        debug_assert!(it.key.is_some(), "cannot move the end position");
        if it.key.is_none() || it.key == pos.key {
            return;
        }

        // Safety: it is a checked, non-end position
        if unsafe { storage.get_unchecked(it.key) }.next == pos.key {
            return;
        }

        self.unlink_run(storage, it.key, it.key, 1);
        self.link_run_before(storage, pos.key, it.key, it.key, 1);
    }

    /// Moves the element at `it` to the front. O(1).
    #[inline]
    pub fn move_to_front(&mut self, storage: &mut S, it: impl Into<ConstPos<K>>) {
        let head: ConstPos<K> = Self::pos_at(storage, self.head);
        self.move_before(storage, head, it);
    }

    /// Moves the element at `it` to the back. O(1). Useful for LRU caches.
    #[inline]
    pub fn move_to_back(&mut self, storage: &mut S, it: impl Into<ConstPos<K>>) {
        self.move_before(storage, ConstPos::end(), it);
    }

    // ========================================================================
    // Comparison
    // ========================================================================

    /// Element-wise equality with `other`, short-circuiting on the first
    /// mismatch. Lists of different lengths are never equal.
    pub fn eq_in(&self, storage: &S, other: &Self) -> bool
    where
        T: PartialEq,
    {
        self.len == other.len && self.iter(storage).eq(other.iter(storage))
    }

    /// Lexicographic comparison with `other`; a proper prefix is less.
    pub fn partial_cmp_in(&self, storage: &S, other: &Self) -> Option<Ordering>
    where
        T: PartialOrd,
    {
        self.iter(storage).partial_cmp(other.iter(storage))
    }

    /// Lexicographic comparison with `other`; a proper prefix is less.
    pub fn cmp_in(&self, storage: &S, other: &Self) -> Ordering
    where
        T: Ord,
    {
        self.iter(storage).cmp(other.iter(storage))
    }

    // ========================================================================
    // Iteration
    // ========================================================================

    /// Returns an iterator over references to elements, front to back.
    #[inline]
    pub fn iter<'a>(&self, storage: &'a S) -> Iter<'a, T, S, K> {
        Iter::new(storage, self.head, self.tail, self.len)
    }

    /// Returns an iterator over mutable references to elements, front to back.
    #[inline]
    pub fn iter_mut<'a>(&self, storage: &'a mut S) -> IterMut<'a, T, S, K> {
        IterMut::new(storage, self.head, self.tail, self.len)
    }

    /// Returns an iterator over the positions of the elements, front to back.
    ///
    /// Collect the positions first when the list is to be modified while
    /// walking it.
    #[inline]
    pub fn positions<'a>(&self, storage: &'a S) -> Positions<'a, T, S, K> {
        Positions::new(storage, self.head, self.tail, self.len)
    }

    /// Empties the list, returning an iterator over the removed elements.
    ///
    /// Elements not consumed are dropped with the iterator.
    #[inline]
    pub fn drain<'a>(&'a mut self, storage: &'a mut S) -> Drain<'a, T, S, K> {
        let head = self.head;
        let len = self.len;
        self.head = K::NONE;
        self.tail = K::NONE;
        self.len = 0;

        Drain::new(storage, head, len)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Builds an unlinked node, stamping it in debug builds.
    #[inline]
    fn prepare(&mut self, value: T) -> ListNode<T, K> {
        #[allow(unused_mut)]
        let mut node = ListNode::new(value);
        #[cfg(debug_assertions)]
        {
            self.generation += 1;
            node.stamp = self.generation;
        }
        node
    }

    #[inline]
    fn alloc(&mut self, storage: &mut S, value: T) -> Result<K, Full<T>> {
        let node = self.prepare(value);
        storage
            .try_insert(node)
            .map_err(|Full(node)| Full(node.data))
    }

    #[inline]
    fn pos_at<A: Access>(storage: &S, key: K) -> Position<K, A> {
        if key.is_none() {
            return Position::end();
        }
        // Safety: callers pass keys linked into a list
        Position::at(key, unsafe { storage.get_unchecked(key) })
    }

    /// Rejects positions whose node was erased. Debug builds also reject
    /// positions whose slot was reused by another node.
    #[inline]
    fn check<A: Access>(&self, storage: &S, pos: Position<K, A>) {
        if pos.key.is_none() {
            return;
        }
        #[cfg_attr(not(debug_assertions), allow(unused_variables))]
        let node = storage
            .get(pos.key)
            .expect("stale position: its node was erased");
        #[cfg(debug_assertions)]
        assert_eq!(
            node.stamp, pos.stamp,
            "stale position: its slot now holds another node"
        );
    }

    /// Links the detached run `first..=last` of `count` nodes before
    /// `before`, or at the back when `before` is `NONE`.
    #[inline]
    fn link_run_before(&mut self, storage: &mut S, before: K, first: K, last: K, count: usize) {
        let prev = if before.is_some() {
            // Safety: before is a linked node
            unsafe { storage.get_unchecked(before) }.prev
        } else {
            self.tail
        };
        assert!(
            before.is_none() || prev.is_some() || self.head == before,
            "position belongs to another list"
        );

        // Safety: first and last are occupied (caller invariant)
        unsafe { storage.get_unchecked_mut(first) }.prev = prev;
        unsafe { storage.get_unchecked_mut(last) }.next = before;

        if prev.is_some() {
            // Safety: prev is valid when is_some() (list invariant)
            unsafe { storage.get_unchecked_mut(prev) }.next = first;
        } else {
            self.head = first;
        }

        if before.is_some() {
            // Safety: before validated above
            unsafe { storage.get_unchecked_mut(before) }.prev = last;
        } else {
            self.tail = last;
        }

        self.len += count;
    }

    /// Detaches the linked run `first..=last` of `count` nodes, leaving it
    /// with `NONE` at both ends.
    #[inline]
    fn unlink_run(&mut self, storage: &mut S, first: K, last: K, count: usize) {
        // Safety: first and last are linked nodes (caller invariant)
        let prev = unsafe { storage.get_unchecked(first) }.prev;
        let next = unsafe { storage.get_unchecked(last) }.next;
        assert!(
            (prev.is_some() || self.head == first) && (next.is_some() || self.tail == last),
            "position belongs to another list"
        );

        if prev.is_some() {
            // Safety: prev is valid when is_some() (list invariant)
            unsafe { storage.get_unchecked_mut(prev) }.next = next;
        } else {
            self.head = next;
        }

        if next.is_some() {
            // Safety: next is valid when is_some() (list invariant)
            unsafe { storage.get_unchecked_mut(next) }.prev = prev;
        } else {
            self.tail = prev;
        }

        unsafe { storage.get_unchecked_mut(first) }.prev = K::NONE;
        unsafe { storage.get_unchecked_mut(last) }.next = K::NONE;

        self.len -= count;
    }

    /// Unlinks and frees one node. Returns its element and its successor.
    #[inline]
    fn destroy(&mut self, storage: &mut S, key: K) -> (T, K) {
        // Safety: key is a linked node (caller invariant)
        let next = unsafe { storage.get_unchecked(key) }.next;
        self.unlink_run(storage, key, key, 1);
        let node = unsafe { storage.remove_unchecked(key) };
        (node.data, next)
    }

    /// Frees the `count` nodes starting at `first`.
    fn discard_run(&mut self, storage: &mut S, first: K, count: usize) {
        let mut key = first;
        for _ in 0..count {
            key = self.destroy(storage, key).1;
        }
    }

    /// Walks `[first, last)`, returning the run's last key and its length.
    ///
    /// Returns `None` for an empty run.
    fn measure_run(storage: &S, first: K, last: K) -> Option<(K, usize)> {
        if first.is_none() || first == last {
            return None;
        }

        let mut run_last = first;
        let mut count = 1;
        loop {
            // Safety: run_last came from list traversal
            let next = unsafe { storage.get_unchecked(run_last) }.next;
            if next == last || next.is_none() {
                debug_assert!(next == last, "`last` is not reachable from `first`");
                return Some((run_last, count));
            }
            run_last = next;
            count += 1;
        }
    }

    /// Pushes clones of `[first, last)` to the back. Frees everything pushed
    /// by this call on failure.
    fn try_extend_from_run(&mut self, storage: &mut S, first: K, last: K) -> Result<(), Full<T>>
    where
        T: Clone,
    {
        let mut key = first;
        let mut pushed = 0;
        while key != last && key.is_some() {
            // Safety: key came from list traversal
            let node = unsafe { storage.get_unchecked(key) };
            let (value, next) = (node.data.clone(), node.next);

            if let Err(full) = self.try_push_back(storage, value) {
                for _ in 0..pushed {
                    self.pop_back(storage);
                }
                return Err(full);
            }
            pushed += 1;
            key = next;
        }
        Ok(())
    }

    /// Swaps `fresh` in and frees the old chain.
    #[inline]
    fn replace_with(&mut self, storage: &mut S, mut fresh: Self) {
        self.swap(&mut fresh);
        fresh.clear(storage);
    }
}

// =============================================================================
// Unbounded storage impl - infallible insertion
// =============================================================================

impl<T, S, K: Key> List<T, S, K>
where
    S: UnboundedStorage<ListNode<T, K>, Key = K>,
{
    /// Pushes a value to the back of the list.
    #[inline]
    pub fn push_back(&mut self, storage: &mut S, value: T) -> Pos<K> {
        let key = self.alloc_unbounded(storage, value);
        self.link_run_before(storage, K::NONE, key, key, 1);
        Self::pos_at(storage, key)
    }

    /// Pushes a value to the front of the list.
    #[inline]
    pub fn push_front(&mut self, storage: &mut S, value: T) -> Pos<K> {
        let key = self.alloc_unbounded(storage, value);
        let head = self.head;
        self.link_run_before(storage, head, key, key, 1);
        Self::pos_at(storage, key)
    }

    /// Inserts a value before `pos`, returning its position.
    #[inline]
    pub fn insert(&mut self, storage: &mut S, pos: impl Into<ConstPos<K>>, value: T) -> Pos<K> {
        let pos = pos.into();
        self.check(storage, pos);

        let key = self.alloc_unbounded(storage, value);
        self.link_run_before(storage, pos.key, key, key, 1);
        Self::pos_at(storage, key)
    }

    /// Inserts `count` clones of `value` before `pos`.
    ///
    /// Returns the position of the first inserted element, or `pos` when
    /// `count` is zero.
    pub fn insert_n(
        &mut self,
        storage: &mut S,
        pos: impl Into<ConstPos<K>>,
        count: usize,
        value: &T,
    ) -> Pos<K>
    where
        T: Clone,
    {
        self.insert_iter(storage, pos, iter::repeat(value).take(count).cloned())
    }

    /// Inserts every item of `values`, in order, before `pos`.
    ///
    /// Returns the position of the first inserted element, or `pos` when
    /// `values` is empty.
    pub fn insert_iter<I>(&mut self, storage: &mut S, pos: impl Into<ConstPos<K>>, values: I) -> Pos<K>
    where
        I: IntoIterator<Item = T>,
    {
        let pos = pos.into();
        self.check(storage, pos);

        let mut first = K::NONE;
        for value in values {
            let key = self.alloc_unbounded(storage, value);
            self.link_run_before(storage, pos.key, key, key, 1);
            if first.is_none() {
                first = key;
            }
        }

        if first.is_none() {
            pos.cast_mut()
        } else {
            Self::pos_at(storage, first)
        }
    }

    /// Creates a list of `count` clones of `value`.
    pub fn with_value(storage: &mut S, count: usize, value: &T) -> Self
    where
        T: Clone,
    {
        let mut list = Self::new();
        list.assign_n(storage, count, value);
        list
    }

    /// Creates a list holding the items of `values`, in order.
    pub fn from_iter_in<I>(storage: &mut S, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut list = Self::new();
        list.assign(storage, values);
        list
    }

    /// Deep-copies this list into new nodes of the same storage.
    pub fn clone_in(&self, storage: &mut S) -> Self
    where
        T: Clone,
    {
        let mut copy = Self::new();
        let mut key = self.head;
        while key.is_some() {
            // Safety: key came from list traversal
            let node = unsafe { storage.get_unchecked(key) };
            let (value, next) = (node.data.clone(), node.next);
            copy.push_back(storage, value);
            key = next;
        }
        copy
    }

    /// Replaces the contents with `count` clones of `value`.
    pub fn assign_n(&mut self, storage: &mut S, count: usize, value: &T)
    where
        T: Clone,
    {
        self.assign(storage, iter::repeat(value).take(count).cloned());
    }

    /// Replaces the contents with the items of `values`.
    ///
    /// The replacement is built before the old elements are dropped, so
    /// `values` may borrow from data outside the list freely.
    pub fn assign<I>(&mut self, storage: &mut S, values: I)
    where
        I: IntoIterator<Item = T>,
    {
        let mut fresh = Self::new();
        for value in values {
            fresh.push_back(storage, value);
        }
        self.replace_with(storage, fresh);
    }

    #[inline]
    fn alloc_unbounded(&mut self, storage: &mut S, value: T) -> K {
        let node = self.prepare(value);
        storage.insert(node)
    }
}
