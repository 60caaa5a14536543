//! Doubly-linked list with external storage, O(1) splice and stable
//! positions.
//!
//! The list separates storage from structure:
//!
//! ```text
//! Storage (Slab)  - owns the nodes, hands out stable keys
//! List            - head, tail and length; links nodes by key
//! Position        - key of one node (or the end), valid until erased
//! ```
//!
//! Benefits:
//! - **Stable positions**: insert, erase, splice and reverse elsewhere in
//!   the list never invalidate a position
//! - **O(1) splice**: lists sharing a storage move nodes between each other
//!   by relinking, without allocating or copying elements
//! - **Bounded or growable**: pre-allocate a [`BoxedStorage`] and get
//!   [`Full`] back on exhaustion, or use `slab::Slab` and never fail
//!
//! # Quick Start
//!
//! ```
//! use strand_list::{BoxedListStorage, List};
//!
//! let mut storage: BoxedListStorage<u64> = BoxedListStorage::with_capacity(1000);
//! let mut queue: List<u64, BoxedListStorage<u64>> = List::new();
//!
//! // Insert returns a stable position
//! let pos = queue.try_push_back(&mut storage, 42).unwrap();
//! queue.try_push_front(&mut storage, 7).unwrap();
//!
//! // O(1) removal from anywhere
//! assert_eq!(queue.remove_at(&mut storage, pos), Some(42));
//! assert_eq!(queue.len(), 1);
//! ```
//!
//! # Moving Between Lists
//!
//! ```
//! use strand_list::{BoxedListStorage, List};
//!
//! let mut storage: BoxedListStorage<u64> = BoxedListStorage::with_capacity(100);
//! let mut ready: List<u64, BoxedListStorage<u64>> = List::new();
//! let mut waiting: List<u64, BoxedListStorage<u64>> = List::new();
//!
//! let pos = waiting.try_push_back(&mut storage, 42).unwrap();
//!
//! // Move to `ready`; the position follows the node
//! ready.splice_one(&mut storage, ready.end(), &mut waiting, pos);
//!
//! assert!(waiting.is_empty());
//! assert_eq!(ready.get(&storage, pos), Some(&42));
//! ```
//!
//! # Critical Invariant: Same Storage Instance
//!
//! All operations on a list must use the same storage instance, and lists
//! that splice between each other must share it. This is the caller's
//! responsibility (same discipline as the `slab` crate).
//!
//! # Storage Options
//!
//! | Storage | Capacity | Allocation | API |
//! |---------|----------|------------|-----|
//! | [`BoxedListStorage`] | Fixed (runtime) | Single heap alloc | `try_*` |
//! | [`SlabListStorage`] | Growable | May reallocate | `try_*` and infallible |
//!
//! [`OwnedList`] bundles a list with its own slab when sharing is not needed.
//!
//! # Position Checks
//!
//! Every operation that takes a position first looks its key up in the
//! storage, and panics with `stale position` if the slot is vacant or out
//! of range. Unlinking a node at either end of a list, or linking before
//! a head, checks that the node is that list's head or tail and panics
//! with `position belongs to another list` otherwise. A position to the
//! interior of another list is not detected.
//!
//! Debug builds also stamp every node and every position with a
//! generation, so a position whose slot now holds a newer node panics
//! too. Release builds carry no stamps.
//!
//! # Threads
//!
//! Nothing here synchronizes. A list and its storage are used from one
//! thread at a time; share them behind a lock otherwise.

#![warn(missing_docs)]

pub mod iter;
pub mod key;
pub mod list;
pub mod node;
pub mod owned;
pub mod position;
pub mod storage;

pub use iter::{Drain, Iter, IterMut, Positions};
pub use key::Key;
pub use list::{BoxedListStorage, List, SlabListStorage};
pub use node::ListNode;
pub use owned::OwnedList;
pub use position::{Access, Const, ConstPos, Mutable, Pos, Position};
pub use storage::{BoundedStorage, BoxedStorage, Full, Storage, UnboundedStorage};
