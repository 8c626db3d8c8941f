//! The type-erased storage cell.
//!
//! This module encapsulates the `vtable` and `slot` fields of [`RawStorage`],
//! ensuring they are only visible within this module. This visibility
//! restriction guarantees the safety invariant: **the cell is either empty
//! (no vtable, nothing initialized in the slot) or occupied (a vtable for some
//! `T`, and exactly one live `T` at the placement recorded in that vtable)**.
//!
//! # Safety Invariant
//!
//! The `vtable` field is only ever set to `Some` after a value has been fully
//! written into the slot, by [`RawStorage::new`], [`RawStorage::new_cloneable`]
//! or [`RawStorage::try_clone`]. It is reset to `None` before the value is
//! dropped. A panic while producing the value therefore leaves the cell empty
//! and nothing is leaked or dropped twice.
//!
//! # Moves
//!
//! Moving a [`RawStorage`] relocates the inline bytes or copies the heap
//! pointer. Either way the move is a plain `memcpy` that cannot fail and does
//! not run any code of the stored type. Rust has no observable moved-from
//! state, so [`RawStorage::take`] is the way to move a value out while leaving
//! an empty cell behind.
//!
//! # Lifetimes
//!
//! A `RawStorage<'a>` holds a value that outlives `'a`, much like a
//! `Box<dyn Trait + 'a>`. Once stored, the value is only trusted to be valid
//! for `'a`. The type identity recorded in the vtable ignores lifetimes, so
//! checked downcasts are only offered on `RawStorage<'static>`, where every
//! stored type is `'static` and the identity is exact.

use alloc::boxed::Box;
use core::{any::TypeId, marker::PhantomData, mem::MaybeUninit, ptr::NonNull};

use crate::{
    storage::vtable::{StorageVtable, fits_inline},
    util::{Erased, erased_type_id},
};

/// The default inline capacity of a [`RawStorage`], in machine words.
pub const DEFAULT_INLINE_WORDS: usize = 3;

/// The storage area of a [`RawStorage`].
///
/// Which field is active is recorded in the placement flag of the vtable that
/// accompanies the slot. Both fields start at offset zero.
#[repr(C)]
union Slot<const WORDS: usize> {
    /// Buffer holding a value placed inline.
    inline: [MaybeUninit<usize>; WORDS],
    /// Pointer to a value placed on the heap, obtained from [`Box::leak`].
    heap: NonNull<Erased>,
}

/// A cell holding at most one value of an arbitrary type.
///
/// Small values are stored inline in a buffer of `WORDS` machine words, larger
/// or over-aligned values are boxed. The decision is made once per type and
/// never changes for the lifetime of the cell.
///
/// Whether the cell can be cloned is decided when it is filled:
/// [`RawStorage::new_cloneable`] records a clone operation in the vtable while
/// [`RawStorage::new`] does not.
pub struct RawStorage<'a, const WORDS: usize = DEFAULT_INLINE_WORDS> {
    /// Vtable of the stored value
    ///
    /// # Safety
    ///
    /// The following safety invariants are guaranteed to be upheld as long as
    /// this struct exists:
    ///
    /// 1. If `None`, the slot holds no initialized value.
    /// 2. If `Some`, the vtable was created for some type `T` and the capacity
    ///    `WORDS`, and the slot holds exactly one initialized `T` at the
    ///    placement recorded in the vtable.
    vtable: Option<&'static StorageVtable>,

    /// The inline buffer or heap pointer
    slot: Slot<WORDS>,

    /// The held value outlives `'a`
    _lifetime: PhantomData<&'a ()>,
}

impl<'a, const WORDS: usize> RawStorage<'a, WORDS> {
    /// Creates an empty cell.
    #[inline]
    #[must_use]
    pub const fn empty() -> Self {
        // SAFETY: We must uphold the safety invariants of the vtable field:
        // 1. The vtable is `None` and nothing is initialized in the slot.
        // 2. Not applicable.
        Self {
            vtable: None,
            slot: Slot {
                inline: [MaybeUninit::uninit(); WORDS],
            },
            _lifetime: PhantomData,
        }
    }

    /// Creates a move-only cell holding `value`.
    ///
    /// [`RawStorage::try_clone`] on the returned cell returns `None`.
    #[inline]
    #[must_use]
    pub fn new<T: 'a>(value: T) -> Self {
        Self::with_vtable(value, StorageVtable::new::<T, WORDS>())
    }

    /// Creates a cloneable cell holding `value`.
    #[inline]
    #[must_use]
    pub fn new_cloneable<T: Clone + 'a>(value: T) -> Self {
        Self::with_vtable(value, StorageVtable::new_cloneable::<T, WORDS>())
    }

    /// Places `value` according to its placement and records `vtable`.
    ///
    /// The vtable must have been created for `T` and `WORDS`.
    fn with_vtable<T: 'a>(value: T, vtable: &'static StorageVtable) -> Self {
        debug_assert_eq!(vtable.type_id(), erased_type_id::<T>());

        let mut this = Self::empty();
        if fits_inline::<T, WORDS>() {
            let slot: NonNull<T> = NonNull::from(&mut this.slot).cast::<T>();
            // SAFETY: `fits_inline` guarantees that a `T` fits in the slot and
            // that its alignment divides the alignment of the slot. The slot is
            // uninitialized, so nothing is overwritten.
            unsafe {
                slot.write(value);
            }
        } else {
            this.slot.heap = NonNull::from(Box::leak(Box::new(value))).cast::<Erased>();
        }

        // SAFETY: We must uphold the safety invariants of the vtable field:
        // 1. Not applicable.
        // 2. The vtable was created for `T` and `WORDS`, and the value was just
        //    written at the placement computed by the same `fits_inline`.
        this.vtable = Some(vtable);
        this
    }

    /// Returns whether a value of type `T` would be stored inline in this
    /// kind of cell.
    #[inline]
    #[must_use]
    pub const fn fits_inline<T>() -> bool {
        fits_inline::<T, WORDS>()
    }

    /// Returns `true` if the cell holds no value.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vtable.is_none()
    }

    /// Returns `true` if the cell holds a value in its inline buffer.
    #[inline]
    #[must_use]
    pub fn is_inline(&self) -> bool {
        self.vtable.is_some_and(StorageVtable::is_inline)
    }

    /// Returns `true` if [`RawStorage::try_clone`] would succeed.
    ///
    /// An empty cell can always be cloned.
    #[inline]
    #[must_use]
    pub fn is_cloneable(&self) -> bool {
        self.vtable.is_none_or(StorageVtable::is_cloneable)
    }

    /// Returns the [`TypeId`] of the held value with its lifetimes erased, if
    /// any.
    ///
    /// Two cells holding types that differ only in their lifetimes report
    /// the same identifier.
    #[inline]
    #[must_use]
    pub fn type_id(&self) -> Option<TypeId> {
        self.vtable.map(StorageVtable::type_id)
    }

    /// Returns `true` if the cell holds a value of type `T`, ignoring
    /// lifetimes.
    #[inline]
    #[must_use]
    pub fn holds<T>(&self) -> bool {
        self.type_id() == Some(erased_type_id::<T>())
    }

    /// Returns the [`core::any::type_name`] of the held value, if any.
    #[inline]
    #[must_use]
    pub fn type_name(&self) -> Option<&'static str> {
        self.vtable.map(StorageVtable::type_name)
    }

    /// Returns a pointer to the held value, if any, for reading.
    fn value_ptr(&self) -> Option<NonNull<Erased>> {
        let vtable = self.vtable?;
        if vtable.is_inline() {
            Some(NonNull::from(&self.slot).cast::<Erased>())
        } else {
            // SAFETY: The vtable records heap placement, so the `heap` field is
            // the one that was written.
            Some(unsafe { self.slot.heap })
        }
    }

    /// Returns a pointer to the held value, if any, for reading and writing.
    fn value_ptr_mut(&mut self) -> Option<NonNull<Erased>> {
        let vtable = self.vtable?;
        if vtable.is_inline() {
            Some(NonNull::from(&mut self.slot).cast::<Erased>())
        } else {
            // SAFETY: The vtable records heap placement, so the `heap` field is
            // the one that was written.
            Some(unsafe { self.slot.heap })
        }
    }

    /// Returns a reference to the held value without checking its type.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The cell is occupied and holds a value of type `T`, up to
    ///    lifetimes. The returned reference must not be used to move data of a
    ///    shorter lifetime than `'a` into the value.
    #[inline]
    #[must_use]
    pub unsafe fn downcast_ref_unchecked<T>(&self) -> &T {
        // Debug assertion to catch type mismatches in case of bugs
        debug_assert!(self.holds::<T>());

        let Some(value) = self.value_ptr() else {
            // SAFETY: The caller guarantees that the cell is occupied.
            unsafe { core::hint::unreachable_unchecked() }
        };

        // SAFETY: Converting the pointer to a reference is sound because:
        // - The pointer is non-null, aligned and points to an initialized `T`
        //   (guaranteed by the invariants of the vtable field and the caller)
        // - Shared access is allowed, as we hold `&self`
        unsafe { value.cast::<T>().as_ref() }
    }

    /// Returns a mutable reference to the held value without checking its
    /// type.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The cell is occupied and holds a value of type `T`, up to
    ///    lifetimes. The returned reference must not be used to move data of a
    ///    shorter lifetime than `'a` into the value.
    #[inline]
    #[must_use]
    pub unsafe fn downcast_mut_unchecked<T>(&mut self) -> &mut T {
        // Debug assertion to catch type mismatches in case of bugs
        debug_assert!(self.holds::<T>());

        let Some(value) = self.value_ptr_mut() else {
            // SAFETY: The caller guarantees that the cell is occupied.
            unsafe { core::hint::unreachable_unchecked() }
        };

        // SAFETY: Converting the pointer to a reference is sound because:
        // - The pointer is non-null, aligned and points to an initialized `T`
        //   (guaranteed by the invariants of the vtable field and the caller)
        // - Exclusive access is allowed, as we hold `&mut self`
        unsafe { value.cast::<T>().as_mut() }
    }

    /// Clones the cell.
    ///
    /// An empty cell clones into an empty cell. Returns `None` if the cell
    /// holds a value but was created with [`RawStorage::new`].
    ///
    /// The clone is built completely before it is returned. If the [`Clone`]
    /// implementation of the held value panics, `self` is left untouched and
    /// nothing is leaked.
    #[must_use]
    pub fn try_clone(&self) -> Option<Self> {
        let (Some(vtable), Some(value)) = (self.vtable, self.value_ptr()) else {
            return Some(Self::empty());
        };

        let mut out = Self::empty();
        let slot: NonNull<Erased> = NonNull::from(&mut out.slot).cast::<Erased>();

        // SAFETY:
        // 1. `value` points to the value held by `self`, which has the type the
        //    vtable was created for
        // 2. `slot` points to the uninitialized slot of `out`, which has the same
        //    capacity as `self`
        let cloned = unsafe { vtable.clone_into(value, slot) };
        if !cloned {
            return None;
        }

        // SAFETY: We must uphold the safety invariants of the vtable field:
        // 1. Not applicable.
        // 2. `clone_into` returned without panicking, so the slot now holds a
        //    clone at the placement recorded in the vtable.
        out.vtable = Some(vtable);
        Some(out)
    }

    /// Moves the value out, leaving an empty cell behind.
    #[inline]
    #[must_use]
    pub fn take(&mut self) -> Self {
        core::mem::replace(self, Self::empty())
    }
}

impl<const WORDS: usize> RawStorage<'static, WORDS> {
    /// Returns a reference to the held value if it has type `T`.
    #[inline]
    #[must_use]
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        if !self.holds::<T>() {
            return None;
        }

        // SAFETY:
        // 1. The cell is occupied and holds a `T`, as we just checked. The cell
        //    is `'static`, so `T` and the held type are equal including their
        //    lifetimes.
        let value: &T = unsafe { self.downcast_ref_unchecked::<T>() };
        Some(value)
    }

    /// Returns a mutable reference to the held value if it has type `T`.
    #[inline]
    #[must_use]
    pub fn downcast_mut<T: 'static>(&mut self) -> Option<&mut T> {
        if !self.holds::<T>() {
            return None;
        }

        // SAFETY:
        // 1. The cell is occupied and holds a `T`, as we just checked. The cell
        //    is `'static`, so `T` and the held type are equal including their
        //    lifetimes.
        let value: &mut T = unsafe { self.downcast_mut_unchecked::<T>() };
        Some(value)
    }
}

impl<const WORDS: usize> Default for RawStorage<'_, WORDS> {
    #[inline]
    fn default() -> Self {
        Self::empty()
    }
}

impl<const WORDS: usize> core::ops::Drop for RawStorage<'_, WORDS> {
    #[inline]
    fn drop(&mut self) {
        let (Some(vtable), Some(value)) = (self.vtable, self.value_ptr_mut()) else {
            return;
        };
        self.vtable = None;

        // SAFETY:
        // 1. `value` points to the held value at the placement recorded in the
        //    vtable, as guaranteed by the invariants of the vtable field.
        // 2. The vtable has been cleared, so the value is not used again. We are
        //    in the drop function, so we are allowed to transfer ownership.
        unsafe {
            // @add-unsafe-context: drop
            vtable.drop(value);
        }
    }
}

impl<const WORDS: usize> core::fmt::Debug for RawStorage<'_, WORDS> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RawStorage")
            .field("type_name", &self.type_name())
            .field("inline", &self.is_inline())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::{string::String, vec, vec::Vec};

    use super::*;

    #[test]
    fn test_raw_storage_size() {
        assert_eq!(
            core::mem::size_of::<RawStorage<'static>>(),
            (DEFAULT_INLINE_WORDS + 1) * core::mem::size_of::<usize>()
        );
        assert_eq!(
            core::mem::size_of::<RawStorage<'static, 0>>(),
            2 * core::mem::size_of::<usize>()
        );
    }

    #[test]
    fn test_raw_storage_empty() {
        let storage = RawStorage::<3>::empty();
        assert!(storage.is_empty());
        assert!(!storage.is_inline());
        assert!(storage.is_cloneable());
        assert_eq!(storage.type_id(), None);
        assert_eq!(storage.downcast_ref::<u32>(), None);

        let copy = storage.try_clone().unwrap();
        assert!(copy.is_empty());
    }

    #[test]
    fn test_raw_storage_placement() {
        let small = RawStorage::<3>::new(7u32);
        assert!(small.is_inline());

        let string = RawStorage::<3>::new(String::from("inline"));
        assert!(string.is_inline());

        let large = RawStorage::<3>::new([1usize; 4]);
        assert!(!large.is_inline());
        assert_eq!(large.downcast_ref::<[usize; 4]>(), Some(&[1usize; 4]));

        assert!(RawStorage::<3>::fits_inline::<Vec<u8>>());
        assert!(!RawStorage::<2>::fits_inline::<Vec<u8>>());
    }

    #[test]
    fn test_raw_storage_downcast() {
        let mut storage = RawStorage::<3>::new(vec![1, 2, 3]);
        assert_eq!(storage.type_id(), Some(TypeId::of::<Vec<i32>>()));
        assert_eq!(storage.downcast_ref::<Vec<u32>>(), None);

        storage.downcast_mut::<Vec<i32>>().unwrap().push(4);
        assert_eq!(storage.downcast_ref::<Vec<i32>>().unwrap(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_raw_storage_clone() {
        let inline = RawStorage::<3>::new_cloneable(String::from("abc"));
        let boxed = RawStorage::<3>::new_cloneable([7u64; 8]);
        let move_only = RawStorage::<3>::new(String::from("abc"));

        let inline_copy = inline.try_clone().unwrap();
        let boxed_copy = boxed.try_clone().unwrap();
        assert!(move_only.try_clone().is_none());
        assert!(!move_only.is_cloneable());

        assert_eq!(inline_copy.downcast_ref::<String>().unwrap(), "abc");
        assert_eq!(boxed_copy.downcast_ref::<[u64; 8]>(), Some(&[7u64; 8]));

        // The boxed copy owns a separate allocation
        assert!(!core::ptr::eq(
            boxed.downcast_ref::<[u64; 8]>().unwrap(),
            boxed_copy.downcast_ref::<[u64; 8]>().unwrap()
        ));
    }

    #[test]
    fn test_raw_storage_borrowed_value() {
        let words = vec![String::from("left"), String::from("right")];
        let mut storage = RawStorage::<3>::new_cloneable(words.as_slice());
        assert!(storage.is_inline());
        assert!(storage.holds::<&[String]>());
        assert!(!storage.holds::<&[u8]>());
        assert_eq!(storage.type_id(), Some(TypeId::of::<&'static [String]>()));

        let copy = storage.try_clone().unwrap();
        // SAFETY: The cell holds a `&[String]`
        let slice: &[String] = unsafe { *copy.downcast_ref_unchecked::<&[String]>() };
        assert_eq!(slice, ["left", "right"]);

        // SAFETY: The cell holds a `&[String]`
        let held: &mut &[String] = unsafe { storage.downcast_mut_unchecked::<&[String]>() };
        let rest: &[String] = *held;
        *held = &rest[1..];
        // SAFETY: The cell holds a `&[String]`
        assert_eq!(unsafe { storage.downcast_ref_unchecked::<&[String]>() }.len(), 1);

        drop(storage);
        drop(copy);
        drop(words);
    }

    #[test]
    fn test_raw_storage_take() {
        let mut storage = RawStorage::<3>::new(String::from("abc"));
        let taken = storage.take();
        assert!(storage.is_empty());
        assert_eq!(taken.downcast_ref::<String>().unwrap(), "abc");
    }

    #[test]
    fn test_send_sync() {
        static_assertions::assert_not_impl_any!(RawStorage<'static>: Send, Sync);
    }
}
