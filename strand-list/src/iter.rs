//! Iterators over a [`List`](crate::List).
//!
//! All of them walk the chain through the storage they borrow. The borrow
//! keeps the storage frozen (or exclusively held) for the iterator's
//! lifetime, so the chain cannot change under them.

use core::iter::FusedIterator;
use core::marker::PhantomData;

use crate::position::Pos;
use crate::{Key, ListNode, Storage};

/// Iterator over references to list elements.
///
/// Created by [`List::iter`](crate::List::iter).
pub struct Iter<'a, T, S, K: Key> {
    storage: &'a S,
    front: K,
    back: K,
    remaining: usize,
    _marker: PhantomData<T>,
}

impl<'a, T, S, K: Key> Iter<'a, T, S, K> {
    #[inline]
    pub(crate) fn new(storage: &'a S, front: K, back: K, remaining: usize) -> Self {
        Self {
            storage,
            front,
            back,
            remaining,
            _marker: PhantomData,
        }
    }
}

impl<T, S, K: Key> Clone for Iter<'_, T, S, K> {
    fn clone(&self) -> Self {
        Self { ..*self }
    }
}

impl<'a, T: 'a, S, K: Key + 'a> Iterator for Iter<'a, T, S, K>
where
    S: Storage<ListNode<T, K>, Key = K>,
{
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 || self.front.is_none() {
            return None;
        }

        // Safety: remaining > 0, so front is a linked node
        let node = unsafe { self.storage.get_unchecked(self.front) };
        self.front = node.next;
        self.remaining -= 1;
        Some(&node.data)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T: 'a, S, K: Key + 'a> DoubleEndedIterator for Iter<'a, T, S, K>
where
    S: Storage<ListNode<T, K>, Key = K>,
{
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 || self.back.is_none() {
            return None;
        }

        // Safety: remaining > 0, so back is a linked node
        let node = unsafe { self.storage.get_unchecked(self.back) };
        self.back = node.prev;
        self.remaining -= 1;
        Some(&node.data)
    }
}

impl<'a, T: 'a, S, K: Key + 'a> ExactSizeIterator for Iter<'a, T, S, K> where
    S: Storage<ListNode<T, K>, Key = K>
{
}

impl<'a, T: 'a, S, K: Key + 'a> FusedIterator for Iter<'a, T, S, K> where
    S: Storage<ListNode<T, K>, Key = K>
{
}

/// Iterator over mutable references to list elements.
///
/// Created by [`List::iter_mut`](crate::List::iter_mut).
pub struct IterMut<'a, T, S, K: Key> {
    storage: &'a mut S,
    front: K,
    back: K,
    remaining: usize,
    _marker: PhantomData<T>,
}

impl<'a, T, S, K: Key> IterMut<'a, T, S, K> {
    #[inline]
    pub(crate) fn new(storage: &'a mut S, front: K, back: K, remaining: usize) -> Self {
        Self {
            storage,
            front,
            back,
            remaining,
            _marker: PhantomData,
        }
    }
}

impl<'a, T: 'a, S, K: Key + 'a> Iterator for IterMut<'a, T, S, K>
where
    S: Storage<ListNode<T, K>, Key = K>,
{
    type Item = &'a mut T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 || self.front.is_none() {
            return None;
        }

        // Safety: remaining > 0, so front is a linked node
        let node = unsafe { self.storage.get_unchecked_mut(self.front) };
        self.front = node.next;
        self.remaining -= 1;

        // Safety: each node is yielded once, so the references never alias
        Some(unsafe { &mut *(&raw mut node.data) })
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T: 'a, S, K: Key + 'a> DoubleEndedIterator for IterMut<'a, T, S, K>
where
    S: Storage<ListNode<T, K>, Key = K>,
{
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 || self.back.is_none() {
            return None;
        }

        // Safety: remaining > 0, so back is a linked node
        let node = unsafe { self.storage.get_unchecked_mut(self.back) };
        self.back = node.prev;
        self.remaining -= 1;

        // Safety: each node is yielded once, so the references never alias
        Some(unsafe { &mut *(&raw mut node.data) })
    }
}

impl<'a, T: 'a, S, K: Key + 'a> ExactSizeIterator for IterMut<'a, T, S, K> where
    S: Storage<ListNode<T, K>, Key = K>
{
}

impl<'a, T: 'a, S, K: Key + 'a> FusedIterator for IterMut<'a, T, S, K> where
    S: Storage<ListNode<T, K>, Key = K>
{
}

/// Iterator over the positions of list elements.
///
/// Created by [`List::positions`](crate::List::positions).
pub struct Positions<'a, T, S, K: Key> {
    storage: &'a S,
    front: K,
    back: K,
    remaining: usize,
    _marker: PhantomData<T>,
}

impl<'a, T, S, K: Key> Positions<'a, T, S, K> {
    #[inline]
    pub(crate) fn new(storage: &'a S, front: K, back: K, remaining: usize) -> Self {
        Self {
            storage,
            front,
            back,
            remaining,
            _marker: PhantomData,
        }
    }
}

impl<T, S, K: Key> Iterator for Positions<'_, T, S, K>
where
    S: Storage<ListNode<T, K>, Key = K>,
{
    type Item = Pos<K>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 || self.front.is_none() {
            return None;
        }

        let key = self.front;
        // Safety: remaining > 0, so front is a linked node
        let node = unsafe { self.storage.get_unchecked(key) };
        self.front = node.next;
        self.remaining -= 1;
        Some(Pos::at(key, node))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T, S, K: Key> DoubleEndedIterator for Positions<'_, T, S, K>
where
    S: Storage<ListNode<T, K>, Key = K>,
{
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 || self.back.is_none() {
            return None;
        }

        let key = self.back;
        // Safety: remaining > 0, so back is a linked node
        let node = unsafe { self.storage.get_unchecked(key) };
        self.back = node.prev;
        self.remaining -= 1;
        Some(Pos::at(key, node))
    }
}

impl<T, S, K: Key> ExactSizeIterator for Positions<'_, T, S, K> where
    S: Storage<ListNode<T, K>, Key = K>
{
}

/// Iterator that removes and returns elements from a list.
///
/// Created by [`List::drain`](crate::List::drain). The list is already
/// empty when this is created; dropping it frees whatever was not consumed.
pub struct Drain<'a, T, S, K: Key>
where
    S: Storage<ListNode<T, K>, Key = K>,
{
    storage: &'a mut S,
    current: K,
    remaining: usize,
    _marker: PhantomData<T>,
}

impl<'a, T, S, K: Key> Drain<'a, T, S, K>
where
    S: Storage<ListNode<T, K>, Key = K>,
{
    #[inline]
    pub(crate) fn new(storage: &'a mut S, head: K, remaining: usize) -> Self {
        Self {
            storage,
            current: head,
            remaining,
            _marker: PhantomData,
        }
    }
}

impl<T, S, K: Key> Iterator for Drain<'_, T, S, K>
where
    S: Storage<ListNode<T, K>, Key = K>,
{
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 || self.current.is_none() {
            return None;
        }

        // Safety: remaining > 0, so current is a detached chain node
        let node = unsafe { self.storage.remove_unchecked(self.current) };
        self.current = node.next;
        self.remaining -= 1;
        Some(node.data)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T, S, K: Key> ExactSizeIterator for Drain<'_, T, S, K> where
    S: Storage<ListNode<T, K>, Key = K>
{
}

impl<T, S, K: Key> Drop for Drain<'_, T, S, K>
where
    S: Storage<ListNode<T, K>, Key = K>,
{
    fn drop(&mut self) {
        for _ in self.by_ref() {}
    }
}
