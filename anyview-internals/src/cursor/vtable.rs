//! Vtable for type-erased cursor operations.
//!
//! This module contains the [`CursorVtable`] which enables calling handler
//! methods on cursors when their concrete cursor type `C`, their item type
//! `R` and handler type `H` have all been erased.
//!
//! Items are handed back through an out-pointer, so the vtable type does not
//! mention `R`. This keeps it `'static` even for items that borrow.
//!
//! # Safety Invariant
//!
//! Vtables are created as `&'static` references via [`CursorVtable::new`],
//! which pairs the function pointers with specific types `C`, `R` and `H` at
//! compile time. The [`RawCursor`] that owns a vtable guarantees that its
//! storage holds a `C` and that it reads items as `R`.
//!
//! [`RawCursor`]: crate::cursor::RawCursor

use core::{mem::MaybeUninit, ptr::NonNull};

use crate::{handlers::CursorHandler, storage::RawStorage, util::Erased};

/// Vtable for type-erased cursor operations.
///
/// # Safety Invariant
///
/// All fields are guaranteed to point to the functions defined below
/// instantiated with the cursor type `C`, item type `R` and handler type `H`
/// that were used to create this [`CursorVtable`].
pub(crate) struct CursorVtable {
    /// Writes the current item into the uninitialized `R` behind the pointer.
    get: unsafe fn(&RawStorage<'_>, NonNull<Erased>),
    /// Moves the current item into the uninitialized `R` behind the pointer.
    take_item: unsafe fn(&mut RawStorage<'_>, NonNull<Erased>),
    /// Steps one position forward.
    advance: unsafe fn(&mut RawStorage<'_>),
    /// Compares two cursors of type `C`.
    equals: unsafe fn(&RawStorage<'_>, &RawStorage<'_>) -> bool,
    /// Steps one position backward.
    step_back: unsafe fn(&mut RawStorage<'_>),
    /// Moves by a signed number of positions.
    jump: unsafe fn(&mut RawStorage<'_>, isize),
    /// Measures the signed distance from the second cursor to the first.
    offset_from: unsafe fn(&RawStorage<'_>, &RawStorage<'_>) -> isize,
}

impl CursorVtable {
    /// Creates a new [`CursorVtable`] for the cursor type `C`, the item type
    /// `R` and the handler type `H`.
    pub(super) const fn new<C, R, H: CursorHandler<C, R>>() -> &'static Self {
        const {
            &Self {
                get: get::<C, R, H>,
                take_item: take_item::<C, R, H>,
                advance: advance::<C, R, H>,
                equals: equals::<C, R, H>,
                step_back: step_back::<C, R, H>,
                jump: jump::<C, R, H>,
                offset_from: offset_from::<C, R, H>,
            }
        }
    }

    /// Reads the current item using [`H::get`].
    ///
    /// [`H::get`]: CursorHandler::get
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `cursor` holds a value of the cursor type this vtable was created
    ///    for.
    /// 2. `R` is the item type this vtable was created for.
    #[inline]
    #[track_caller]
    pub(super) unsafe fn get<R>(&self, cursor: &RawStorage<'_>) -> R {
        let mut item = MaybeUninit::<R>::uninit();
        let out: NonNull<Erased> = NonNull::from(&mut item).cast::<Erased>();

        // SAFETY: We know that `self.get` points to the function `get::<C, R, H>`
        // below. That function's safety requirements are upheld:
        // 1. Guaranteed by the caller
        // 2. `out` points to an uninitialized `R`, as guaranteed by the caller
        unsafe {
            // @add-unsafe-context: get
            (self.get)(cursor, out);
        }

        // SAFETY: `get::<C, R, H>` returned without panicking, so it wrote an `R`.
        unsafe { item.assume_init() }
    }

    /// Moves the current item out using [`H::take_item`].
    ///
    /// [`H::take_item`]: CursorHandler::take_item
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `cursor` holds a value of the cursor type this vtable was created
    ///    for.
    /// 2. `R` is the item type this vtable was created for.
    #[inline]
    #[track_caller]
    pub(super) unsafe fn take_item<R>(&self, cursor: &mut RawStorage<'_>) -> R {
        let mut item = MaybeUninit::<R>::uninit();
        let out: NonNull<Erased> = NonNull::from(&mut item).cast::<Erased>();

        // SAFETY: We know that `self.take_item` points to the function
        // `take_item::<C, R, H>` below. That function's safety requirements are
        // upheld:
        // 1. Guaranteed by the caller
        // 2. `out` points to an uninitialized `R`, as guaranteed by the caller
        unsafe {
            // @add-unsafe-context: take_item
            (self.take_item)(cursor, out);
        }

        // SAFETY: `take_item::<C, R, H>` returned without panicking, so it wrote
        // an `R`.
        unsafe { item.assume_init() }
    }

    /// Steps forward using [`H::advance`].
    ///
    /// [`H::advance`]: CursorHandler::advance
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `cursor` holds a value of the cursor type this vtable was created
    ///    for.
    #[inline]
    #[track_caller]
    pub(super) unsafe fn advance(&self, cursor: &mut RawStorage<'_>) {
        // SAFETY: We know that `self.advance` points to the function
        // `advance::<C, R, H>` below. That function's safety requirements are
        // upheld:
        // 1. Guaranteed by the caller
        unsafe {
            // @add-unsafe-context: advance
            (self.advance)(cursor);
        }
    }

    /// Compares two cursors using [`H::equals`].
    ///
    /// [`H::equals`]: CursorHandler::equals
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. Both `left` and `right` hold a value of the cursor type this vtable
    ///    was created for.
    #[inline]
    #[track_caller]
    pub(super) unsafe fn equals(&self, left: &RawStorage<'_>, right: &RawStorage<'_>) -> bool {
        // SAFETY: We know that `self.equals` points to the function
        // `equals::<C, R, H>` below. That function's safety requirements are
        // upheld:
        // 1. Guaranteed by the caller
        unsafe {
            // @add-unsafe-context: equals
            (self.equals)(left, right)
        }
    }

    /// Steps backward using [`H::step_back`].
    ///
    /// [`H::step_back`]: CursorHandler::step_back
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `cursor` holds a value of the cursor type this vtable was created
    ///    for.
    #[inline]
    #[track_caller]
    pub(super) unsafe fn step_back(&self, cursor: &mut RawStorage<'_>) {
        // SAFETY: We know that `self.step_back` points to the function
        // `step_back::<C, R, H>` below. That function's safety requirements are
        // upheld:
        // 1. Guaranteed by the caller
        unsafe {
            // @add-unsafe-context: step_back
            (self.step_back)(cursor);
        }
    }

    /// Moves by `offset` positions using [`H::jump`].
    ///
    /// [`H::jump`]: CursorHandler::jump
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `cursor` holds a value of the cursor type this vtable was created
    ///    for.
    #[inline]
    #[track_caller]
    pub(super) unsafe fn jump(&self, cursor: &mut RawStorage<'_>, offset: isize) {
        // SAFETY: We know that `self.jump` points to the function
        // `jump::<C, R, H>` below. That function's safety requirements are
        // upheld:
        // 1. Guaranteed by the caller
        unsafe {
            // @add-unsafe-context: jump
            (self.jump)(cursor, offset);
        }
    }

    /// Measures the distance from `origin` to `cursor` using
    /// [`H::offset_from`].
    ///
    /// [`H::offset_from`]: CursorHandler::offset_from
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. Both `cursor` and `origin` hold a value of the cursor type this
    ///    vtable was created for.
    #[inline]
    #[track_caller]
    pub(super) unsafe fn offset_from(
        &self,
        cursor: &RawStorage<'_>,
        origin: &RawStorage<'_>,
    ) -> isize {
        // SAFETY: We know that `self.offset_from` points to the function
        // `offset_from::<C, R, H>` below. That function's safety requirements are
        // upheld:
        // 1. Guaranteed by the caller
        unsafe {
            // @add-unsafe-context: offset_from
            (self.offset_from)(cursor, origin)
        }
    }
}

/// Reads the current item of a cursor of type `C` into `out`.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. `cursor` holds a value of type `C`.
/// 2. `out` points to an uninitialized `R`, valid for writes.
#[track_caller]
unsafe fn get<C, R, H: CursorHandler<C, R>>(cursor: &RawStorage<'_>, out: NonNull<Erased>) {
    // SAFETY:
    // 1. Guaranteed by the caller
    let cursor: &C = unsafe { cursor.downcast_ref_unchecked::<C>() };
    let item = H::get(cursor);

    // SAFETY: Guaranteed by the caller
    unsafe {
        out.cast::<R>().write(item);
    }
}

/// Moves the current item out of a cursor of type `C` into `out`.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. `cursor` holds a value of type `C`.
/// 2. `out` points to an uninitialized `R`, valid for writes.
#[track_caller]
unsafe fn take_item<C, R, H: CursorHandler<C, R>>(
    cursor: &mut RawStorage<'_>,
    out: NonNull<Erased>,
) {
    // SAFETY:
    // 1. Guaranteed by the caller
    let cursor: &mut C = unsafe { cursor.downcast_mut_unchecked::<C>() };
    let item = H::take_item(cursor);

    // SAFETY: Guaranteed by the caller
    unsafe {
        out.cast::<R>().write(item);
    }
}

/// Steps a cursor of type `C` forward.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. `cursor` holds a value of type `C`.
unsafe fn advance<C, R, H: CursorHandler<C, R>>(cursor: &mut RawStorage<'_>) {
    // SAFETY:
    // 1. Guaranteed by the caller
    let cursor: &mut C = unsafe { cursor.downcast_mut_unchecked::<C>() };
    H::advance(cursor);
}

/// Compares two cursors of type `C`.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. Both `left` and `right` hold a value of type `C`.
#[track_caller]
unsafe fn equals<C, R, H: CursorHandler<C, R>>(
    left: &RawStorage<'_>,
    right: &RawStorage<'_>,
) -> bool {
    // SAFETY:
    // 1. Guaranteed by the caller
    let left: &C = unsafe { left.downcast_ref_unchecked::<C>() };
    // SAFETY:
    // 1. Guaranteed by the caller
    let right: &C = unsafe { right.downcast_ref_unchecked::<C>() };
    H::equals(left, right)
}

/// Steps a cursor of type `C` backward.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. `cursor` holds a value of type `C`.
#[track_caller]
unsafe fn step_back<C, R, H: CursorHandler<C, R>>(cursor: &mut RawStorage<'_>) {
    // SAFETY:
    // 1. Guaranteed by the caller
    let cursor: &mut C = unsafe { cursor.downcast_mut_unchecked::<C>() };
    H::step_back(cursor);
}

/// Moves a cursor of type `C` by `offset` positions.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. `cursor` holds a value of type `C`.
#[track_caller]
unsafe fn jump<C, R, H: CursorHandler<C, R>>(cursor: &mut RawStorage<'_>, offset: isize) {
    // SAFETY:
    // 1. Guaranteed by the caller
    let cursor: &mut C = unsafe { cursor.downcast_mut_unchecked::<C>() };
    H::jump(cursor, offset);
}

/// Measures the distance between two cursors of type `C`.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. Both `cursor` and `origin` hold a value of type `C`.
#[track_caller]
unsafe fn offset_from<C, R, H: CursorHandler<C, R>>(
    cursor: &RawStorage<'_>,
    origin: &RawStorage<'_>,
) -> isize {
    // SAFETY:
    // 1. Guaranteed by the caller
    let cursor: &C = unsafe { cursor.downcast_ref_unchecked::<C>() };
    // SAFETY:
    // 1. Guaranteed by the caller
    let origin: &C = unsafe { origin.downcast_ref_unchecked::<C>() };
    H::offset_from(cursor, origin)
}
