//! Vtable for type-erased view operations.
//!
//! This module contains the [`ViewVtable`] which produces the erased bounds of
//! a sequence and measures it when its concrete type `V`, its item type `R`,
//! its bounds handler `B` and its size handler `S` have been erased.
//!
//! Bounds and slices are handed back through out-pointers, so the vtable type
//! mentions neither `R` nor a lifetime.
//!
//! # Safety Invariant
//!
//! Vtables are created as `&'static` references via [`ViewVtable::new`],
//! which pairs the function pointers with specific types `V`, `R`, `B` and `S`
//! at compile time. The [`RawView`] that owns a vtable guarantees that its
//! storage holds a `V` and that it reads items as `R`.
//!
//! [`RawView`]: crate::view::RawView

use core::{mem::MaybeUninit, ptr::NonNull};

use crate::{
    cursor::RawCursor,
    handlers::{BoundsHandler, SizeHandler},
    sentinel::RawSentinel,
    storage::RawStorage,
    util::Erased,
};

/// Vtable for type-erased view operations.
///
/// # Safety Invariant
///
/// All fields are guaranteed to point to the functions defined below
/// instantiated with the view type `V`, item type `R`, bounds handler `B` and
/// size handler `S` that were used to create this [`ViewVtable`].
pub(crate) struct ViewVtable {
    /// Writes a cursor to the first item into the uninitialized
    /// `RawCursor<R>` behind the pointer.
    begin: unsafe fn(&RawStorage<'_>, NonNull<Erased>),
    /// Writes the end sentinel into the uninitialized `RawSentinel` behind
    /// the pointer.
    end_sentinel: unsafe fn(&RawStorage<'_>, NonNull<Erased>),
    /// Writes the end cursor into the uninitialized `RawCursor<R>` behind the
    /// pointer.
    end_cursor: unsafe fn(&RawStorage<'_>, NonNull<Erased>),
    /// Writes a pointer to the items into the uninitialized `*const [R]`
    /// behind the pointer.
    as_slice: unsafe fn(&RawStorage<'_>, NonNull<Erased>),
    /// Counts the items.
    len: unsafe fn(&RawStorage<'_>) -> usize,
    /// Estimates the number of items.
    reserve_hint: unsafe fn(&RawStorage<'_>) -> usize,
}

impl ViewVtable {
    /// Creates a new [`ViewVtable`] for the view type `V`, the item type `R`,
    /// the bounds handler `B` and the size handler `S`.
    pub(super) const fn new<V, R, B, S>() -> &'static Self
    where
        B: BoundsHandler<V, R>,
        S: SizeHandler<V>,
    {
        const {
            &Self {
                begin: begin::<V, R, B>,
                end_sentinel: end_sentinel::<V, R, B>,
                end_cursor: end_cursor::<V, R, B>,
                as_slice: as_slice::<V, R, B>,
                len: len::<V, S>,
                reserve_hint: reserve_hint::<V, S>,
            }
        }
    }

    /// Produces a cursor to the first item using [`B::begin`].
    ///
    /// [`B::begin`]: BoundsHandler::begin
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `view` holds a value of the view type this vtable was created for.
    /// 2. `R` is the item type this vtable was created for.
    #[inline]
    #[track_caller]
    pub(super) unsafe fn begin<'a, R>(&self, view: &RawStorage<'a>) -> RawCursor<'a, R> {
        let mut cursor = MaybeUninit::<RawCursor<'a, R>>::uninit();
        let out: NonNull<Erased> = NonNull::from(&mut cursor).cast::<Erased>();

        // SAFETY: We know that `self.begin` points to the function
        // `begin::<V, R, B>` below. That function's safety requirements are
        // upheld:
        // 1. Guaranteed by the caller
        // 2. `out` points to an uninitialized `RawCursor<'a, R>`, and `R` is the
        //    item type of the vtable as guaranteed by the caller
        // 3. The view outlives `'a`, as guaranteed by the storage
        unsafe {
            // @add-unsafe-context: begin
            (self.begin)(view, out);
        }

        // SAFETY: `begin::<V, R, B>` returned without panicking, so it wrote a
        // cursor.
        unsafe { cursor.assume_init() }
    }

    /// Produces the end sentinel using [`B::end_sentinel`].
    ///
    /// [`B::end_sentinel`]: BoundsHandler::end_sentinel
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `view` holds a value of the view type this vtable was created for.
    #[inline]
    #[track_caller]
    pub(super) unsafe fn end_sentinel<'a>(&self, view: &RawStorage<'a>) -> RawSentinel<'a> {
        let mut sentinel = MaybeUninit::<RawSentinel<'a>>::uninit();
        let out: NonNull<Erased> = NonNull::from(&mut sentinel).cast::<Erased>();

        // SAFETY: We know that `self.end_sentinel` points to the function
        // `end_sentinel::<V, R, B>` below. That function's safety requirements
        // are upheld:
        // 1. Guaranteed by the caller
        // 2. `out` points to an uninitialized `RawSentinel<'a>`
        // 3. The view outlives `'a`, as guaranteed by the storage
        unsafe {
            // @add-unsafe-context: end_sentinel
            (self.end_sentinel)(view, out);
        }

        // SAFETY: `end_sentinel::<V, R, B>` returned without panicking, so it
        // wrote a sentinel.
        unsafe { sentinel.assume_init() }
    }

    /// Produces the end cursor using [`B::end_cursor`].
    ///
    /// [`B::end_cursor`]: BoundsHandler::end_cursor
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `view` holds a value of the view type this vtable was created for.
    /// 2. `R` is the item type this vtable was created for.
    #[inline]
    #[track_caller]
    pub(super) unsafe fn end_cursor<'a, R>(&self, view: &RawStorage<'a>) -> RawCursor<'a, R> {
        let mut cursor = MaybeUninit::<RawCursor<'a, R>>::uninit();
        let out: NonNull<Erased> = NonNull::from(&mut cursor).cast::<Erased>();

        // SAFETY: We know that `self.end_cursor` points to the function
        // `end_cursor::<V, R, B>` below. That function's safety requirements are
        // upheld:
        // 1. Guaranteed by the caller
        // 2. `out` points to an uninitialized `RawCursor<'a, R>`, and `R` is the
        //    item type of the vtable as guaranteed by the caller
        // 3. The view outlives `'a`, as guaranteed by the storage
        unsafe {
            // @add-unsafe-context: end_cursor
            (self.end_cursor)(view, out);
        }

        // SAFETY: `end_cursor::<V, R, B>` returned without panicking, so it
        // wrote a cursor.
        unsafe { cursor.assume_init() }
    }

    /// Borrows the items as a slice using [`B::as_slice`].
    ///
    /// [`B::as_slice`]: BoundsHandler::as_slice
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `view` holds a value of the view type this vtable was created for.
    /// 2. `R` is the item type this vtable was created for.
    #[inline]
    #[track_caller]
    pub(super) unsafe fn as_slice<'v, R>(&self, view: &'v RawStorage<'_>) -> &'v [R] {
        let mut slice = MaybeUninit::<*const [R]>::uninit();
        let out: NonNull<Erased> = NonNull::from(&mut slice).cast::<Erased>();

        // SAFETY: We know that `self.as_slice` points to the function
        // `as_slice::<V, R, B>` below. That function's safety requirements are
        // upheld:
        // 1. Guaranteed by the caller
        // 2. `out` points to an uninitialized `*const [R]`, and `R` is the item
        //    type of the vtable as guaranteed by the caller
        unsafe {
            // @add-unsafe-context: as_slice
            (self.as_slice)(view, out);
        }

        // SAFETY: `as_slice::<V, R, B>` returned without panicking, so it wrote a
        // pointer.
        let slice: *const [R] = unsafe { slice.assume_init() };

        // SAFETY: The pointer was derived from a shared borrow of the view held
        // in `view`, which stays borrowed for `'v`.
        unsafe { &*slice }
    }

    /// Counts the items using [`S::len`].
    ///
    /// [`S::len`]: SizeHandler::len
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `view` holds a value of the view type this vtable was created for.
    #[inline]
    #[track_caller]
    pub(super) unsafe fn len(&self, view: &RawStorage<'_>) -> usize {
        // SAFETY: We know that `self.len` points to the function `len::<V, S>`
        // below. That function's safety requirements are upheld:
        // 1. Guaranteed by the caller
        unsafe {
            // @add-unsafe-context: len
            (self.len)(view)
        }
    }

    /// Estimates the number of items using [`S::reserve_hint`].
    ///
    /// [`S::reserve_hint`]: SizeHandler::reserve_hint
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `view` holds a value of the view type this vtable was created for.
    #[inline]
    #[track_caller]
    pub(super) unsafe fn reserve_hint(&self, view: &RawStorage<'_>) -> usize {
        // SAFETY: We know that `self.reserve_hint` points to the function
        // `reserve_hint::<V, S>` below. That function's safety requirements are
        // upheld:
        // 1. Guaranteed by the caller
        unsafe {
            // @add-unsafe-context: reserve_hint
            (self.reserve_hint)(view)
        }
    }
}

/// Writes a cursor to the first item of a view of type `V` into `out`.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. `view` holds a value of type `V`.
/// 2. `out` points to an uninitialized `RawCursor<R>`, valid for writes.
/// 3. The caller reads the cursor back for a lifetime that `V` outlives.
#[track_caller]
unsafe fn begin<V, R, B: BoundsHandler<V, R>>(view: &RawStorage<'_>, out: NonNull<Erased>) {
    // SAFETY:
    // 1. Guaranteed by the caller
    let view: &V = unsafe { view.downcast_ref_unchecked::<V>() };
    let cursor = B::begin(view);

    // SAFETY: Guaranteed by the caller. The cursor is erased for a lifetime
    // local to this function, but `B::begin` is generic over that lifetime and
    // only relies on `V` outliving it, which holds for the lifetime the caller
    // reads the cursor back for.
    unsafe {
        out.cast::<RawCursor<'_, R>>().write(cursor);
    }
}

/// Writes the end sentinel of a view of type `V` into `out`.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. `view` holds a value of type `V`.
/// 2. `out` points to an uninitialized `RawSentinel`, valid for writes.
/// 3. The caller reads the sentinel back for a lifetime that `V` outlives.
#[track_caller]
unsafe fn end_sentinel<V, R, B: BoundsHandler<V, R>>(
    view: &RawStorage<'_>,
    out: NonNull<Erased>,
) {
    // SAFETY:
    // 1. Guaranteed by the caller
    let view: &V = unsafe { view.downcast_ref_unchecked::<V>() };
    let sentinel = B::end_sentinel(view);

    // SAFETY: Guaranteed by the caller. `B::end_sentinel` is generic over the
    // lifetime of the sentinel and only relies on `V` outliving it.
    unsafe {
        out.cast::<RawSentinel<'_>>().write(sentinel);
    }
}

/// Writes the end cursor of a view of type `V` into `out`.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. `view` holds a value of type `V`.
/// 2. `out` points to an uninitialized `RawCursor<R>`, valid for writes.
/// 3. The caller reads the cursor back for a lifetime that `V` outlives.
#[track_caller]
unsafe fn end_cursor<V, R, B: BoundsHandler<V, R>>(view: &RawStorage<'_>, out: NonNull<Erased>) {
    // SAFETY:
    // 1. Guaranteed by the caller
    let view: &V = unsafe { view.downcast_ref_unchecked::<V>() };
    let cursor = B::end_cursor(view);

    // SAFETY: Guaranteed by the caller. `B::end_cursor` is generic over the
    // lifetime of the cursor and only relies on `V` outliving it.
    unsafe {
        out.cast::<RawCursor<'_, R>>().write(cursor);
    }
}

/// Writes a pointer to the items of a view of type `V` into `out`.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. `view` holds a value of type `V`.
/// 2. `out` points to an uninitialized `*const [R]`, valid for writes.
#[track_caller]
unsafe fn as_slice<V, R, B: BoundsHandler<V, R>>(view: &RawStorage<'_>, out: NonNull<Erased>) {
    // SAFETY:
    // 1. Guaranteed by the caller
    let view: &V = unsafe { view.downcast_ref_unchecked::<V>() };
    let slice: *const [R] = B::as_slice(view);

    // SAFETY: Guaranteed by the caller
    unsafe {
        out.cast::<*const [R]>().write(slice);
    }
}

/// Counts the items of a view of type `V`.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. `view` holds a value of type `V`.
#[track_caller]
unsafe fn len<V, S: SizeHandler<V>>(view: &RawStorage<'_>) -> usize {
    // SAFETY:
    // 1. Guaranteed by the caller
    let view: &V = unsafe { view.downcast_ref_unchecked::<V>() };
    S::len(view)
}

/// Estimates the number of items of a view of type `V`.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. `view` holds a value of type `V`.
#[track_caller]
unsafe fn reserve_hint<V, S: SizeHandler<V>>(view: &RawStorage<'_>) -> usize {
    // SAFETY:
    // 1. Guaranteed by the caller
    let view: &V = unsafe { view.downcast_ref_unchecked::<V>() };
    S::reserve_hint(view)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Pair;

    struct PairSize;
    impl SizeHandler<Pair> for PairSize {
        fn len(_view: &Pair) -> usize {
            2
        }
    }

    struct NoBounds;
    impl BoundsHandler<Pair, u8> for NoBounds {}

    #[test]
    fn test_view_vtable_eq() {
        let vtable1 = ViewVtable::new::<Pair, u8, NoBounds, PairSize>();
        let vtable2 = ViewVtable::new::<Pair, u8, NoBounds, PairSize>();

        // Both should be the exact same static instance
        assert!(core::ptr::eq(vtable1, vtable2));
    }

    #[test]
    fn test_view_vtable_len() {
        let vtable = ViewVtable::new::<Pair, u8, NoBounds, PairSize>();
        let storage = RawStorage::new(Pair);

        // SAFETY: The storage holds a `Pair`
        assert_eq!(unsafe { vtable.len(&storage) }, 2);
    }

    #[test]
    #[should_panic(expected = "unsupported operation `reserve_hint`")]
    fn test_view_vtable_unsupported() {
        let vtable = ViewVtable::new::<Pair, u8, NoBounds, PairSize>();
        let storage = RawStorage::new(Pair);

        // SAFETY: The storage holds a `Pair`
        let _ = unsafe { vtable.reserve_hint(&storage) };
    }
}
