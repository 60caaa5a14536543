//! Key trait for storage slots.
//!
//! A [`Key`] names a slot in [`Storage`](crate::Storage). Lists use keys as
//! their links, with the reserved [`Key::NONE`] value standing in for a
//! null link. This keeps `ListNode` as small as the key type allows instead
//! of paying for `Option<K>`.

use core::fmt::Debug;
use core::hash::Hash;

/// Copyable slot index with a sentinel "no key" value.
///
/// Implemented for the unsigned integer types, with `MAX` as the sentinel.
///
/// # Example
///
/// ```
/// use strand_list::Key;
///
/// let key: u32 = 7;
/// assert!(key.is_some());
/// assert!(u32::NONE.is_none());
/// assert_eq!(key.as_usize(), 7);
/// ```
///
/// # Custom Key Types
///
/// ```
/// use strand_list::Key;
///
/// #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
/// struct Slot(u32);
///
/// impl Key for Slot {
///     const NONE: Self = Slot(u32::MAX);
///
///     fn from_usize(val: usize) -> Self {
///         Slot(val as u32)
///     }
///
///     fn as_usize(&self) -> usize {
///         self.0 as usize
///     }
/// }
///
/// assert!(Slot::NONE.is_none());
/// ```
pub trait Key: Copy + Eq + Hash + Debug {
    /// Sentinel value meaning "no node".
    ///
    /// Never handed out by storage as a real slot.
    const NONE: Self;

    /// Creates a key from a slot number.
    fn from_usize(val: usize) -> Self;

    /// Returns the slot number.
    fn as_usize(&self) -> usize;

    /// Returns `true` if this is the sentinel.
    #[inline]
    fn is_none(&self) -> bool {
        *self == Self::NONE
    }

    /// Returns `true` if this names a real slot.
    #[inline]
    fn is_some(&self) -> bool {
        !self.is_none()
    }
}

macro_rules! impl_key_for_unsigned {
    ($($ty:ty),*) => {
        $(
            impl Key for $ty {
                const NONE: Self = <$ty>::MAX;

                #[inline]
                fn from_usize(val: usize) -> Self {
                    val as Self
                }

                #[inline]
                fn as_usize(&self) -> usize {
                    *self as usize
                }
            }
        )*
    };
}

impl_key_for_unsigned!(u8, u16, u32, u64, usize);

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_key_sentinel {
        ($($ty:ty => $name:ident),*) => {
            $(
                #[test]
                fn $name() {
                    assert!(<$ty>::NONE.is_none());
                    assert!(!<$ty>::NONE.is_some());
                    assert!((0 as $ty).is_some());
                    assert!((<$ty>::MAX - 1).is_some());
                }
            )*
        };
    }

    test_key_sentinel!(
        u8 => u8_sentinel,
        u16 => u16_sentinel,
        u32 => u32_sentinel,
        u64 => u64_sentinel,
        usize => usize_sentinel
    );

    #[test]
    fn slot_number_survives_conversion() {
        for i in [0usize, 1, 100, 1000, u16::MAX as usize] {
            assert_eq!(u32::from_usize(i).as_usize(), i);
        }
    }
}
