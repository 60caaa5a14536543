//! Storage traits for slab-like containers with stable keys.
//!
//! Storage owns node memory. A key stays valid from insert until it is
//! removed, no matter what happens to other slots, which is what lets a
//! list hand out positions that survive unrelated inserts, erases and
//! splices.

use core::fmt;
use core::hint::unreachable_unchecked;
use core::mem;

use crate::Key;

/// Slab-like storage with stable keys.
///
/// # Requirements
///
/// Implementations must provide:
/// - **Stable keys**: a key remains valid until explicitly removed
/// - **O(1)** insert, remove, get
/// - **Slot reuse**: removed slots can be handed out again
///
/// # Implementations
///
/// - [`BoxedStorage`] - fixed capacity chosen at runtime, fallible insert
/// - `slab::Slab` - growable, infallible insert
pub trait Storage<T> {
    /// Key type handed out by this storage.
    type Key: Key;

    /// Inserts a value, returning its key.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(value))` if there is no free slot. Growable
    /// storage never fails.
    fn try_insert(&mut self, value: T) -> Result<Self::Key, Full<T>>;

    /// Removes and returns the value at `key`, if occupied.
    fn remove(&mut self, key: Self::Key) -> Option<T>;

    /// Returns a reference to the value at `key`, if occupied.
    fn get(&self, key: Self::Key) -> Option<&T>;

    /// Returns a mutable reference to the value at `key`, if occupied.
    fn get_mut(&mut self, key: Self::Key) -> Option<&mut T>;

    /// Returns the number of occupied slots.
    fn len(&self) -> usize;

    /// Returns `true` if no slot is occupied.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a reference without checking the slot.
    ///
    /// # Safety
    ///
    /// `key` must be in bounds and occupied.
    unsafe fn get_unchecked(&self, key: Self::Key) -> &T;

    /// Returns a mutable reference without checking the slot.
    ///
    /// # Safety
    ///
    /// `key` must be in bounds and occupied.
    unsafe fn get_unchecked_mut(&mut self, key: Self::Key) -> &mut T;

    /// Removes a value without checking the slot.
    ///
    /// # Safety
    ///
    /// `key` must be in bounds and occupied.
    unsafe fn remove_unchecked(&mut self, key: Self::Key) -> T;
}

/// Storage with a fixed number of slots.
///
/// Inserts go through [`Storage::try_insert`] and can fail with [`Full`].
pub trait BoundedStorage<T>: Storage<T> {
    /// Returns the total number of slots.
    fn capacity(&self) -> usize;

    /// Returns `true` if every slot is occupied.
    #[inline]
    fn is_full(&self) -> bool {
        self.len() == self.capacity()
    }
}

/// Storage that grows on demand.
///
/// Enables the infallible `push_*`/`insert*` methods on [`List`](crate::List).
pub trait UnboundedStorage<T>: Storage<T> {
    /// Inserts a value, returning its key. Never fails.
    fn insert(&mut self, value: T) -> Self::Key;
}

/// Error returned when fixed-capacity storage has no free slot.
///
/// Carries back the value that could not be stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Full<T>(pub T);

impl<T> Full<T> {
    /// Returns the value that could not be inserted.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Display for Full<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "storage is full")
    }
}

impl<T: fmt::Debug> std::error::Error for Full<T> {}

// =============================================================================
// BoxedStorage - runtime capacity, single boxed slice, intrusive free list
// =============================================================================

enum Slot<T, K> {
    Occupied(T),
    /// Next free slot, or `K::NONE` at the end of the free list.
    Vacant(K),
}

/// Fixed-capacity storage with runtime-determined size.
///
/// One boxed slice of slots. Vacant slots form a LIFO free list, so the
/// most recently freed slot is reused first.
///
/// Capacity is rounded up to the next power of 2.
///
/// # Example
///
/// ```
/// use strand_list::{BoundedStorage, BoxedStorage, Storage};
///
/// let mut storage: BoxedStorage<u64> = BoxedStorage::with_capacity(1000);
/// assert_eq!(storage.capacity(), 1024);
///
/// let key = storage.try_insert(42).unwrap();
/// assert_eq!(storage.get(key), Some(&42));
/// ```
pub struct BoxedStorage<T, K: Key = u32> {
    slots: Box<[Slot<T, K>]>,
    free_head: K,
    len: usize,
}

impl<T, K: Key> BoxedStorage<T, K> {
    /// Creates storage with at least `min_capacity` slots.
    ///
    /// # Panics
    ///
    /// Panics if `min_capacity` is 0 or the rounded capacity does not fit
    /// below the key type's sentinel.
    pub fn with_capacity(min_capacity: usize) -> Self {
        assert!(min_capacity > 0, "capacity must be > 0");

        let capacity = min_capacity.next_power_of_two();
        assert!(
            capacity <= K::NONE.as_usize(),
            "capacity exceeds key type maximum"
        );

        Self {
            slots: Self::vacant_slots(capacity),
            free_head: K::from_usize(0),
            len: 0,
        }
    }

    /// Returns the number of slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of occupied slots.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no slot is occupied.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` if every slot is occupied.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Drops every stored value and frees all slots.
    ///
    /// Lists that still link nodes in this storage are left dangling. Clear
    /// them first, or only call this when nothing references the storage.
    pub fn clear(&mut self) {
        self.slots = Self::vacant_slots(self.capacity());
        self.free_head = K::from_usize(0);
        self.len = 0;
    }

    fn vacant_slots(capacity: usize) -> Box<[Slot<T, K>]> {
        (0..capacity)
            .map(|i| {
                let next = if i + 1 < capacity {
                    K::from_usize(i + 1)
                } else {
                    K::NONE
                };
                Slot::Vacant(next)
            })
            .collect()
    }
}

impl<T, K: Key> Storage<T> for BoxedStorage<T, K> {
    type Key = K;

    #[inline]
    fn try_insert(&mut self, value: T) -> Result<K, Full<T>> {
        if self.free_head.is_none() {
            return Err(Full(value));
        }

        let key = self.free_head;
        let slot = &mut self.slots[key.as_usize()];
        let Slot::Vacant(next) = *slot else {
            unreachable!("free list points at an occupied slot");
        };

        *slot = Slot::Occupied(value);
        self.free_head = next;
        self.len += 1;
        Ok(key)
    }

    #[inline]
    fn remove(&mut self, key: K) -> Option<T> {
        match self.slots.get(key.as_usize()) {
            Some(Slot::Occupied(_)) => Some(unsafe { self.remove_unchecked(key) }),
            _ => None,
        }
    }

    #[inline]
    fn get(&self, key: K) -> Option<&T> {
        match self.slots.get(key.as_usize()) {
            Some(Slot::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    #[inline]
    fn get_mut(&mut self, key: K) -> Option<&mut T> {
        match self.slots.get_mut(key.as_usize()) {
            Some(Slot::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    #[inline]
    fn len(&self) -> usize {
        self.len
    }

    #[inline]
    unsafe fn get_unchecked(&self, key: K) -> &T {
        match unsafe { self.slots.get_unchecked(key.as_usize()) } {
            Slot::Occupied(value) => value,
            Slot::Vacant(_) => unsafe { unreachable_unchecked() },
        }
    }

    #[inline]
    unsafe fn get_unchecked_mut(&mut self, key: K) -> &mut T {
        match unsafe { self.slots.get_unchecked_mut(key.as_usize()) } {
            Slot::Occupied(value) => value,
            Slot::Vacant(_) => unsafe { unreachable_unchecked() },
        }
    }

    #[inline]
    unsafe fn remove_unchecked(&mut self, key: K) -> T {
        let slot = unsafe { self.slots.get_unchecked_mut(key.as_usize()) };
        let Slot::Occupied(value) = mem::replace(slot, Slot::Vacant(self.free_head)) else {
            unsafe { unreachable_unchecked() }
        };

        self.free_head = key;
        self.len -= 1;
        value
    }
}

impl<T, K: Key> BoundedStorage<T> for BoxedStorage<T, K> {
    #[inline]
    fn capacity(&self) -> usize {
        self.slots.len()
    }
}

impl<T, K: Key> fmt::Debug for BoxedStorage<T, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoxedStorage")
            .field("len", &self.len)
            .field("capacity", &self.slots.len())
            .finish()
    }
}

// =============================================================================
// slab::Slab implementation
// =============================================================================

impl<T> Storage<T> for slab::Slab<T> {
    type Key = usize;

    #[inline]
    fn try_insert(&mut self, value: T) -> Result<usize, Full<T>> {
        Ok(slab::Slab::insert(self, value))
    }

    #[inline]
    fn remove(&mut self, key: usize) -> Option<T> {
        self.try_remove(key)
    }

    #[inline]
    fn get(&self, key: usize) -> Option<&T> {
        slab::Slab::get(self, key)
    }

    #[inline]
    fn get_mut(&mut self, key: usize) -> Option<&mut T> {
        slab::Slab::get_mut(self, key)
    }

    #[inline]
    fn len(&self) -> usize {
        slab::Slab::len(self)
    }

    #[inline]
    unsafe fn get_unchecked(&self, key: usize) -> &T {
        unsafe { slab::Slab::get_unchecked(self, key) }
    }

    #[inline]
    unsafe fn get_unchecked_mut(&mut self, key: usize) -> &mut T {
        unsafe { slab::Slab::get_unchecked_mut(self, key) }
    }

    #[inline]
    unsafe fn remove_unchecked(&mut self, key: usize) -> T {
        slab::Slab::remove(self, key)
    }
}

impl<T> UnboundedStorage<T> for slab::Slab<T> {
    #[inline]
    fn insert(&mut self, value: T) -> usize {
        slab::Slab::insert(self, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_is_empty() {
        let storage: BoxedStorage<u64> = BoxedStorage::with_capacity(16);
        assert!(storage.is_empty());
        assert!(!storage.is_full());
        assert_eq!(storage.len(), 0);
        assert_eq!(storage.capacity(), 16);
    }

    #[test]
    fn capacity_rounds_to_power_of_two() {
        let storage: BoxedStorage<u64> = BoxedStorage::with_capacity(100);
        assert_eq!(storage.capacity(), 128);

        let storage: BoxedStorage<u64> = BoxedStorage::with_capacity(1000);
        assert_eq!(storage.capacity(), 1024);
    }

    #[test]
    #[should_panic(expected = "capacity must be > 0")]
    fn zero_capacity_panics() {
        let _ = BoxedStorage::<u64>::with_capacity(0);
    }

    #[test]
    #[should_panic(expected = "capacity exceeds key type maximum")]
    fn capacity_must_fit_key_type() {
        let _ = BoxedStorage::<u64, u8>::with_capacity(256);
    }

    #[test]
    fn insert_get_remove() {
        let mut storage: BoxedStorage<u64> = BoxedStorage::with_capacity(16);

        let key = storage.try_insert(42).unwrap();
        assert_eq!(storage.len(), 1);
        assert_eq!(storage.get(key), Some(&42));

        assert_eq!(storage.remove(key), Some(42));
        assert_eq!(storage.get(key), None);
        assert_eq!(storage.len(), 0);
    }

    #[test]
    fn get_mut() {
        let mut storage: BoxedStorage<u64> = BoxedStorage::with_capacity(16);

        let key = storage.try_insert(10).unwrap();
        *storage.get_mut(key).unwrap() = 20;

        assert_eq!(storage.get(key), Some(&20));
    }

    #[test]
    fn fill_to_capacity() {
        let mut storage: BoxedStorage<u64> = BoxedStorage::with_capacity(4);

        let keys: Vec<_> = (0..4).map(|i| storage.try_insert(i).unwrap()).collect();
        assert!(storage.is_full());

        let err = storage.try_insert(4).unwrap_err();
        assert_eq!(err.into_inner(), 4);

        for (i, key) in keys.iter().enumerate() {
            assert_eq!(storage.get(*key), Some(&(i as u64)));
        }
    }

    #[test]
    fn slot_reuse_is_lifo() {
        let mut storage: BoxedStorage<u64> = BoxedStorage::with_capacity(4);

        let k0 = storage.try_insert(0).unwrap();
        let k1 = storage.try_insert(1).unwrap();

        storage.remove(k0);
        storage.remove(k1);

        assert_eq!(storage.try_insert(2).unwrap(), k1);
        assert_eq!(storage.try_insert(3).unwrap(), k0);
    }

    #[test]
    fn remove_vacant_or_out_of_bounds() {
        let mut storage: BoxedStorage<u64> = BoxedStorage::with_capacity(16);

        let key = storage.try_insert(42).unwrap();
        storage.remove(key);

        assert_eq!(storage.remove(key), None);
        assert_eq!(storage.remove(1000), None);
        assert_eq!(storage.get(u32::NONE), None);
    }

    #[test]
    fn clear_frees_every_slot() {
        let mut storage: BoxedStorage<u64> = BoxedStorage::with_capacity(4);
        for i in 0..4 {
            storage.try_insert(i).unwrap();
        }

        storage.clear();

        assert!(storage.is_empty());
        for i in 0..4 {
            storage.try_insert(i).unwrap();
        }
        assert!(storage.is_full());
    }

    #[test]
    fn drop_cleans_up() {
        use std::rc::Rc;

        let tracker = Rc::new(());
        {
            let mut storage: BoxedStorage<Rc<()>> = BoxedStorage::with_capacity(8);
            for _ in 0..3 {
                storage.try_insert(Rc::clone(&tracker)).unwrap();
            }
            assert_eq!(Rc::strong_count(&tracker), 4);
        }

        assert_eq!(Rc::strong_count(&tracker), 1);
    }

    #[test]
    fn u16_key() {
        let mut storage: BoxedStorage<u64, u16> = BoxedStorage::with_capacity(100);

        let key = storage.try_insert(42).unwrap();
        assert_eq!(storage.get(key), Some(&42));
    }

    mod slab_tests {
        use super::*;

        #[test]
        fn insert_get_remove() {
            let mut storage = slab::Slab::new();

            let key = storage.try_insert(42).unwrap();
            assert_eq!(Storage::get(&storage, key), Some(&42));

            assert_eq!(Storage::remove(&mut storage, key), Some(42));
            assert_eq!(Storage::get(&storage, key), None);
        }

        #[test]
        fn slot_reuse() {
            let mut storage = slab::Slab::new();

            let first = UnboundedStorage::insert(&mut storage, 1);
            Storage::remove(&mut storage, first);

            let second = UnboundedStorage::insert(&mut storage, 2);
            assert_eq!(first, second);
        }

        #[test]
        fn never_full() {
            let mut storage = slab::Slab::with_capacity(1);
            for i in 0..64 {
                assert!(storage.try_insert(i).is_ok());
            }
            assert_eq!(Storage::len(&storage), 64);
        }
    }
}
