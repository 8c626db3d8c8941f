//! Type-erased cursor.
//!
//! This module encapsulates the `vtable` and `storage` fields of
//! [`RawCursor`], ensuring they are only visible within this module. This
//! visibility restriction guarantees the safety invariant: **the vtable is
//! `None` exactly when the storage is empty, and otherwise was created for the
//! concrete cursor type held in the storage**.
//!
//! # Singular Cursors
//!
//! A cursor without a vtable is *singular*. Singular cursors can be created,
//! cloned, dropped, assigned to and compared with each other: two singular
//! cursors are always equal, and a singular cursor never equals a cursor that
//! holds a value. Every other operation panics.
//!
//! # Identity
//!
//! Two cursors can only be compared or measured against each other when they
//! hold the same concrete cursor type. This is checked through the
//! [`TypeId`] recorded in their storage, never through the address of a
//! vtable. The check ignores lifetimes: two cursors of the same type that
//! borrow from different places are still comparable, since both are valid
//! for the lifetime `'a` of the erased cursors.

use core::{any::TypeId, marker::PhantomData};

use crate::{
    cursor::vtable::CursorVtable, handlers::CursorHandler, storage::RawStorage, util::singular,
};

/// A type-erased cursor yielding items of type `R`, over a concrete cursor
/// that outlives `'a`.
///
/// The concrete cursor is held in a [`RawStorage`], so cursors that fit in
/// three machine words do not allocate.
pub struct RawCursor<'a, R> {
    /// Vtable of the concrete cursor
    ///
    /// # Safety
    ///
    /// The following safety invariants are guaranteed to be upheld as long as
    /// this struct exists:
    ///
    /// 1. The vtable is `None` if and only if `storage` is empty.
    /// 2. If the vtable is `Some`, it was created for some cursor type `C` and
    ///    the item type `R`, and `storage` holds a value of type `C`.
    vtable: Option<&'static CursorVtable>,

    /// The concrete cursor
    storage: RawStorage<'a>,

    /// Items are produced as `R`
    _item: PhantomData<fn() -> R>,
}

impl<'a, R> RawCursor<'a, R> {
    /// Creates a move-only erased cursor dispatching through the handler `H`.
    ///
    /// [`RawCursor::try_clone`] on the returned cursor returns `None`.
    #[inline]
    #[must_use]
    pub fn new<C, H>(cursor: C) -> Self
    where
        C: 'a,
        H: CursorHandler<C, R>,
    {
        // SAFETY: We must uphold the safety invariants of the vtable field:
        // 1. The vtable is `Some` and the storage is occupied.
        // 2. The vtable was created for `C` and `R`, and the storage holds a `C`.
        Self {
            vtable: Some(CursorVtable::new::<C, R, H>()),
            storage: RawStorage::new(cursor),
            _item: PhantomData,
        }
    }

    /// Creates a cloneable erased cursor dispatching through the handler `H`.
    #[inline]
    #[must_use]
    pub fn new_cloneable<C, H>(cursor: C) -> Self
    where
        C: Clone + 'a,
        H: CursorHandler<C, R>,
    {
        // SAFETY: We must uphold the safety invariants of the vtable field:
        // 1. The vtable is `Some` and the storage is occupied.
        // 2. The vtable was created for `C` and `R`, and the storage holds a `C`.
        Self {
            vtable: Some(CursorVtable::new::<C, R, H>()),
            storage: RawStorage::new_cloneable(cursor),
            _item: PhantomData,
        }
    }

    /// Creates a singular cursor.
    #[inline]
    #[must_use]
    pub const fn singular() -> Self {
        // SAFETY: We must uphold the safety invariants of the vtable field:
        // 1. The vtable is `None` and the storage is empty.
        // 2. Not applicable.
        Self {
            vtable: None,
            storage: RawStorage::empty(),
            _item: PhantomData,
        }
    }

    /// Returns `true` if the cursor holds no concrete cursor.
    #[inline]
    #[must_use]
    pub fn is_singular(&self) -> bool {
        self.vtable.is_none()
    }

    /// Returns `true` if the concrete cursor is stored inline.
    #[inline]
    #[must_use]
    pub fn is_inline(&self) -> bool {
        self.storage.is_inline()
    }

    /// Returns the [`TypeId`] of the concrete cursor with its lifetimes
    /// erased, if any.
    #[inline]
    #[must_use]
    pub fn type_id(&self) -> Option<TypeId> {
        self.storage.type_id()
    }

    /// Returns the [`core::any::type_name`] of the concrete cursor, if any.
    #[inline]
    #[must_use]
    pub fn type_name(&self) -> Option<&'static str> {
        self.storage.type_name()
    }

    /// Returns the storage holding the concrete cursor.
    #[inline]
    pub(crate) fn storage(&self) -> &RawStorage<'a> {
        &self.storage
    }

    /// Returns the vtable, or panics naming `operation` if the cursor is
    /// singular.
    #[inline]
    #[track_caller]
    fn vtable(&self, operation: &'static str) -> &'static CursorVtable {
        match self.vtable {
            Some(vtable) => vtable,
            None => singular("cursor", operation),
        }
    }

    /// Returns the item at the current position.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is singular.
    #[inline]
    #[track_caller]
    pub fn get(&self) -> R {
        let vtable = self.vtable("get");
        // SAFETY:
        // 1. The storage holds the cursor type of the vtable, as guaranteed by the
        //    invariants of the vtable field.
        // 2. The vtable was created for the item type `R`, as guaranteed by the
        //    invariants of the vtable field.
        unsafe {
            // @add-unsafe-context: CursorVtable
            vtable.get::<R>(&self.storage)
        }
    }

    /// Moves the item at the current position out of the cursor.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is singular.
    #[inline]
    #[track_caller]
    pub fn take_item(&mut self) -> R {
        let vtable = self.vtable("take_item");
        // SAFETY:
        // 1. The storage holds the cursor type of the vtable, as guaranteed by the
        //    invariants of the vtable field.
        // 2. The vtable was created for the item type `R`, as guaranteed by the
        //    invariants of the vtable field.
        unsafe {
            // @add-unsafe-context: CursorVtable
            vtable.take_item::<R>(&mut self.storage)
        }
    }

    /// Moves the cursor one position forward.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is singular.
    #[inline]
    #[track_caller]
    pub fn advance(&mut self) {
        let vtable = self.vtable("advance");
        // SAFETY:
        // 1. The storage holds the cursor type of the vtable, as guaranteed by the
        //    invariants of the vtable field.
        unsafe {
            // @add-unsafe-context: CursorVtable
            vtable.advance(&mut self.storage);
        }
    }

    /// Moves the cursor one position backward.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is singular, or if its handler does not support
    /// stepping backward.
    #[inline]
    #[track_caller]
    pub fn step_back(&mut self) {
        let vtable = self.vtable("step_back");
        // SAFETY:
        // 1. The storage holds the cursor type of the vtable, as guaranteed by the
        //    invariants of the vtable field.
        unsafe {
            // @add-unsafe-context: CursorVtable
            vtable.step_back(&mut self.storage);
        }
    }

    /// Moves the cursor by `offset` positions.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is singular, or if its handler does not support
    /// random access.
    #[inline]
    #[track_caller]
    pub fn jump(&mut self, offset: isize) {
        let vtable = self.vtable("jump");
        // SAFETY:
        // 1. The storage holds the cursor type of the vtable, as guaranteed by the
        //    invariants of the vtable field.
        unsafe {
            // @add-unsafe-context: CursorVtable
            vtable.jump(&mut self.storage, offset);
        }
    }

    /// Returns `true` if both cursors hold a concrete cursor of the same type.
    #[inline]
    #[must_use]
    pub fn same_source(&self, other: &Self) -> bool {
        match (self.type_id(), other.type_id()) {
            (Some(left), Some(right)) => left == right,
            _ => false,
        }
    }

    /// Compares two cursors.
    ///
    /// Two singular cursors are equal. A singular cursor never equals a
    /// cursor that holds a value, and cursors holding different concrete
    /// types are never equal.
    ///
    /// # Panics
    ///
    /// Panics if both cursors hold the same concrete type but their handler
    /// does not support comparison.
    #[inline]
    #[must_use]
    #[track_caller]
    pub fn equals(&self, other: &Self) -> bool {
        match self.vtable {
            None => other.is_singular(),
            Some(_) if !self.same_source(other) => false,
            Some(vtable) => {
                // SAFETY:
                // 1. `self.storage` holds the cursor type of the vtable, as
                //    guaranteed by the invariants of the vtable field. `other.storage`
                //    holds a value of the same type, as we just checked.
                unsafe {
                    // @add-unsafe-context: CursorVtable
                    vtable.equals(&self.storage, &other.storage)
                }
            }
        }
    }

    /// Returns the signed number of positions from `origin` to `self`, or
    /// `None` if either cursor is singular or they hold different concrete
    /// types.
    ///
    /// # Panics
    ///
    /// Panics if the handler does not support random access.
    #[inline]
    #[must_use]
    #[track_caller]
    pub fn checked_offset_from(&self, origin: &Self) -> Option<isize> {
        let vtable = self.vtable?;
        if !self.same_source(origin) {
            return None;
        }

        // SAFETY:
        // 1. `self.storage` holds the cursor type of the vtable, as guaranteed by
        //    the invariants of the vtable field. `origin.storage` holds a value of
        //    the same type, as we just checked.
        let offset = unsafe {
            // @add-unsafe-context: CursorVtable
            vtable.offset_from(&self.storage, &origin.storage)
        };
        Some(offset)
    }

    /// Returns the signed number of positions from `origin` to `self`.
    ///
    /// # Panics
    ///
    /// Panics if either cursor is singular, if they hold different concrete
    /// cursor types, or if the handler does not support random access.
    #[inline]
    #[must_use]
    #[track_caller]
    pub fn offset_from(&self, origin: &Self) -> isize {
        if origin.is_singular() {
            singular("cursor", "offset_from");
        }
        let vtable = self.vtable("offset_from");
        if !self.same_source(origin) {
            mismatched(self, origin);
        }

        // SAFETY:
        // 1. `self.storage` holds the cursor type of the vtable, as guaranteed by
        //    the invariants of the vtable field. `origin.storage` holds a value of
        //    the same type, as we just checked.
        unsafe {
            // @add-unsafe-context: CursorVtable
            vtable.offset_from(&self.storage, &origin.storage)
        }
    }

    /// Clones the cursor.
    ///
    /// A singular cursor clones into a singular cursor. Returns `None` if the
    /// cursor was created with [`RawCursor::new`].
    #[inline]
    #[must_use]
    pub fn try_clone(&self) -> Option<Self> {
        let storage = self.storage.try_clone()?;
        // SAFETY: We must uphold the safety invariants of the vtable field:
        // 1. The clone of an occupied storage is occupied, the clone of an empty
        //    one is empty.
        // 2. The clone holds a value of the same type as `self.storage`.
        Some(Self {
            vtable: self.vtable,
            storage,
            _item: PhantomData,
        })
    }

    /// Moves the concrete cursor out, leaving a singular cursor behind.
    #[inline]
    #[must_use]
    pub fn take(&mut self) -> Self {
        core::mem::replace(self, Self::singular())
    }
}

impl<R> Default for RawCursor<'_, R> {
    #[inline]
    fn default() -> Self {
        Self::singular()
    }
}

impl<R> core::fmt::Debug for RawCursor<'_, R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RawCursor")
            .field("type_name", &self.type_name())
            .field("inline", &self.is_inline())
            .finish()
    }
}

/// Panics because two cursors hold different concrete types.
#[cold]
#[track_caller]
fn mismatched<R>(left: &RawCursor<'_, R>, right: &RawCursor<'_, R>) -> ! {
    panic!(
        "cursors of different types cannot be measured against each other: `{}` and `{}`",
        left.type_name().unwrap_or("<singular>"),
        right.type_name().unwrap_or("<singular>"),
    )
}
