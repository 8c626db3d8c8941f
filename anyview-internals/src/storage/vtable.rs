//! Vtable for the lifecycle operations of a type-erased storage cell.
//!
//! This module contains the [`StorageVtable`] which knows how to drop and clone
//! a value held by a [`RawStorage`] once its concrete type `T` has been erased.
//! The placement of the value (inline or boxed) is baked into the vtable, so
//! every function pointer stored here already knows where the value lives.
//!
//! This module encapsulates the fields of [`StorageVtable`] so they cannot be
//! accessed directly. This visibility restriction guarantees the safety
//! invariant: **the vtable's type parameter and placement must match the value
//! actually stored in the [`RawStorage`]**.
//!
//! # Safety Invariant
//!
//! This invariant is maintained because vtables are created as `&'static`
//! references via [`StorageVtable::new`] and [`StorageVtable::new_cloneable`],
//! which pair the function pointers with a specific type `T` and capacity
//! `WORDS` at compile time.
//!
//! `T` need not be `'static`. None of the function pointers mention `T` in
//! their signature, so the vtable itself is always `'static`. Its lifetimes
//! are tracked by the [`RawStorage`] instead.
//!
//! [`RawStorage`]: crate::storage::RawStorage

use alloc::boxed::Box;
use core::{any::TypeId, ptr::NonNull};

use crate::util::{Erased, erased_type_id};

/// Returns whether a value of type `T` is placed inside a buffer of `WORDS`
/// machine words rather than on the heap.
///
/// A value is placed inline when it fits in the buffer and its alignment
/// divides the alignment of the buffer. Moving a Rust value never runs user
/// code and cannot fail, so no further condition applies.
pub(crate) const fn fits_inline<T, const WORDS: usize>() -> bool {
    core::mem::size_of::<T>() <= WORDS * core::mem::size_of::<usize>()
        && core::mem::align_of::<usize>() % core::mem::align_of::<T>() == 0
}

/// Vtable for the lifecycle of a type-erased stored value.
///
/// # Safety Invariant
///
/// The fields `drop` and `clone` are guaranteed to point to the functions
/// defined below, instantiated with the stored type `T`, and chosen according
/// to the `inline` placement flag that was computed for `T`.
pub(crate) struct StorageVtable {
    /// Gets the [`TypeId`] of the stored type, with its lifetimes erased.
    type_id: fn() -> TypeId,
    /// Gets the [`core::any::type_name`] of the stored type.
    type_name: fn() -> &'static str,
    /// Whether values of the stored type live in the inline buffer.
    inline: bool,
    /// Drops the value pointed to by this pointer. In heap mode this also
    /// releases the allocation.
    drop: unsafe fn(NonNull<Erased>),
    /// Clones the value behind the first pointer into the uninitialized slot
    /// behind the second pointer. `None` for move-only storage.
    clone: Option<unsafe fn(NonNull<Erased>, NonNull<Erased>)>,
}

impl StorageVtable {
    /// Creates a new move-only [`StorageVtable`] for the type `T` held in a
    /// cell with `WORDS` words of inline capacity.
    pub(super) const fn new<T, const WORDS: usize>() -> &'static Self {
        const {
            &Self {
                type_id: erased_type_id::<T>,
                type_name: core::any::type_name::<T>,
                inline: fits_inline::<T, WORDS>(),
                drop: if fits_inline::<T, WORDS>() {
                    drop_inline::<T>
                } else {
                    drop_boxed::<T>
                },
                clone: None,
            }
        }
    }

    /// Creates a new cloneable [`StorageVtable`] for the type `T` held in a
    /// cell with `WORDS` words of inline capacity.
    pub(super) const fn new_cloneable<T: Clone, const WORDS: usize>() -> &'static Self {
        const {
            &Self {
                type_id: erased_type_id::<T>,
                type_name: core::any::type_name::<T>,
                inline: fits_inline::<T, WORDS>(),
                drop: if fits_inline::<T, WORDS>() {
                    drop_inline::<T>
                } else {
                    drop_boxed::<T>
                },
                clone: Some(if fits_inline::<T, WORDS>() {
                    clone_inline::<T>
                } else {
                    clone_boxed::<T>
                }),
            }
        }
    }

    /// Gets the [`TypeId`] of the type that was used to create this
    /// [`StorageVtable`], with its lifetimes erased.
    #[inline]
    pub(super) fn type_id(&self) -> TypeId {
        (self.type_id)()
    }

    /// Gets the [`core::any::type_name`] of the type that was used to create
    /// this [`StorageVtable`].
    #[inline]
    pub(super) fn type_name(&self) -> &'static str {
        (self.type_name)()
    }

    /// Whether the stored type is placed in the inline buffer.
    #[inline]
    pub(super) fn is_inline(&self) -> bool {
        self.inline
    }

    /// Whether this vtable was created with [`StorageVtable::new_cloneable`].
    #[inline]
    pub(super) fn is_cloneable(&self) -> bool {
        self.clone.is_some()
    }

    /// Drops the value pointed to by `value`.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `value` points to an initialized value of the type this vtable was
    ///    created for, at the placement recorded in this vtable: inside the
    ///    inline buffer, or at an address obtained from [`Box::leak`].
    /// 2. This method drops the value, so the caller must ensure that it has
    ///    not previously been dropped, that it is able to transfer ownership
    ///    of it, and that it will not use the value after calling this method.
    #[inline]
    pub(super) unsafe fn drop(&self, value: NonNull<Erased>) {
        // SAFETY: We know that `self.drop` points to either `drop_inline::<T>` or
        // `drop_boxed::<T>` below, matching the placement of `T`. That function's
        // safety requirements are upheld:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        unsafe {
            // @add-unsafe-context: drop
            (self.drop)(value);
        }
    }

    /// Clones the value pointed to by `value` into `slot`.
    ///
    /// Returns `false` without touching `slot` if this vtable is move-only.
    /// If the [`Clone`] implementation of the stored type panics, the panic
    /// propagates and `slot` is left uninitialized.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `value` points to an initialized value of the type this vtable was
    ///    created for.
    /// 2. `slot` points to the start of an uninitialized slot of a cell with
    ///    the same inline capacity that was used to create this vtable, valid
    ///    for writes.
    #[inline]
    pub(super) unsafe fn clone_into(&self, value: NonNull<Erased>, slot: NonNull<Erased>) -> bool {
        let Some(clone) = self.clone else {
            return false;
        };

        // SAFETY: We know that `clone` points to either `clone_inline::<T>` or
        // `clone_boxed::<T>` below, matching the placement of `T`. That function's
        // safety requirements are upheld:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        unsafe {
            // @add-unsafe-context: clone
            clone(value, slot);
        }
        true
    }
}

/// Drops a value of type `T` in place.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. `value` points to an initialized `T` that lives inside an inline buffer.
/// 2. The caller transfers ownership of the value and will not use it after
///    calling this function.
unsafe fn drop_inline<T>(value: NonNull<Erased>) {
    let value: NonNull<T> = value.cast::<T>();
    // SAFETY:
    // 1. The pointer is valid, aligned and initialized as guaranteed by the caller
    // 2. Ownership is transferred as guaranteed by the caller
    unsafe {
        value.drop_in_place();
    }
}

/// Reconstructs and drops the [`Box<T>`] the value was leaked from.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. `value` was obtained from a [`Box<T>`] via [`Box::leak`].
/// 2. The caller transfers ownership of the allocation and will not use it
///    after calling this function.
unsafe fn drop_boxed<T>(value: NonNull<Erased>) {
    let value: *mut T = value.cast::<T>().as_ptr();
    // SAFETY: The pointer came from `Box::leak` and ownership is transferred, as
    // guaranteed by the caller.
    let boxed: Box<T> = unsafe {
        // @add-unsafe-context: Box
        Box::from_raw(value)
    };
    core::mem::drop(boxed);
}

/// Clones an inline `T` into the inline buffer of another cell.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. `value` points to an initialized `T`.
/// 2. `slot` points to an uninitialized inline buffer that can hold a `T`.
unsafe fn clone_inline<T: Clone>(value: NonNull<Erased>, slot: NonNull<Erased>) {
    // SAFETY:
    // 1. Guaranteed by the caller
    let value: &T = unsafe { value.cast::<T>().as_ref() };
    let copy = value.clone();

    // SAFETY: The slot is valid for writes and aligned for `T` as guaranteed by
    // the caller. It is uninitialized, so nothing is overwritten.
    unsafe {
        slot.cast::<T>().write(copy);
    }
}

/// Clones a boxed `T` into a fresh allocation and stores the new pointer in
/// the slot of another cell.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. `value` points to an initialized `T`.
/// 2. `slot` points to an uninitialized slot that can hold a pointer.
unsafe fn clone_boxed<T: Clone>(value: NonNull<Erased>, slot: NonNull<Erased>) {
    // SAFETY:
    // 1. Guaranteed by the caller
    let value: &T = unsafe { value.cast::<T>().as_ref() };
    let copy: NonNull<Erased> = NonNull::from(Box::leak(Box::new(value.clone()))).cast::<Erased>();

    // SAFETY: The slot is valid for writes and aligned for a pointer as
    // guaranteed by the caller.
    unsafe {
        slot.cast::<NonNull<Erased>>().write(copy);
    }
}
