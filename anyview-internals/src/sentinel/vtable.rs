//! Vtable for type-erased sentinel operations.
//!
//! This module contains the [`SentinelVtable`] which checks whether an erased
//! cursor has reached an erased sentinel. The concrete sentinel type `S`, the
//! concrete cursor type `C` and the handler type `H` are all erased.
//!
//! # Safety Invariant
//!
//! Vtables are created as `&'static` references via [`SentinelVtable::new`],
//! which pairs the function pointers with specific types `S`, `C` and `H` at
//! compile time. The [`RawSentinel`] that owns a vtable guarantees that its
//! storage holds an `S`. The cursor side is never trusted: its type is checked
//! through its [`TypeId`](core::any::TypeId) before it is down-cast.
//!
//! [`RawSentinel`]: crate::sentinel::RawSentinel

use core::any::TypeId;

use crate::{handlers::SentinelHandler, storage::RawStorage, util::erased_type_id};

/// Vtable for type-erased sentinel operations.
///
/// # Safety Invariant
///
/// The field `is_end` is guaranteed to point to the function defined below
/// instantiated with the types `S`, `C` and `H` that were used to create this
/// [`SentinelVtable`].
pub(crate) struct SentinelVtable {
    /// Gets the [`TypeId`] of the cursor type this sentinel compares against,
    /// with its lifetimes erased.
    cursor_type_id: fn() -> TypeId,
    /// Checks whether the cursor held by the second storage has reached the
    /// sentinel held by the first.
    is_end: unsafe fn(&RawStorage<'_>, &RawStorage<'_>) -> bool,
}

impl SentinelVtable {
    /// Creates a new [`SentinelVtable`] for the sentinel type `S`, the cursor
    /// type `C` and the handler type `H`.
    pub(super) const fn new<S, C, H: SentinelHandler<S, C>>() -> &'static Self {
        const {
            &Self {
                cursor_type_id: erased_type_id::<C>,
                is_end: is_end::<S, C, H>,
            }
        }
    }

    /// Gets the [`TypeId`] of the cursor type this sentinel compares against,
    /// with its lifetimes erased.
    #[inline]
    pub(super) fn cursor_type_id(&self) -> TypeId {
        (self.cursor_type_id)()
    }

    /// Checks whether `cursor` has reached `sentinel` using [`H::is_end`].
    ///
    /// A cursor of another type than `C` is never at the end.
    ///
    /// [`H::is_end`]: SentinelHandler::is_end
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `sentinel` holds a value of the sentinel type this vtable was created
    ///    for.
    #[inline]
    pub(super) unsafe fn is_end(
        &self,
        sentinel: &RawStorage<'_>,
        cursor: &RawStorage<'_>,
    ) -> bool {
        // SAFETY: We know that `self.is_end` points to the function
        // `is_end::<S, C, H>` below. That function's safety requirements are
        // upheld:
        // 1. Guaranteed by the caller
        unsafe {
            // @add-unsafe-context: is_end
            (self.is_end)(sentinel, cursor)
        }
    }
}

/// Checks whether the cursor in `cursor` has reached the sentinel in
/// `sentinel`.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. `sentinel` holds a value of type `S`.
unsafe fn is_end<S, C, H: SentinelHandler<S, C>>(
    sentinel: &RawStorage<'_>,
    cursor: &RawStorage<'_>,
) -> bool {
    if !cursor.holds::<C>() {
        return false;
    }

    // SAFETY:
    // 1. Guaranteed by the caller
    let sentinel: &S = unsafe { sentinel.downcast_ref_unchecked::<S>() };
    // SAFETY:
    // 1. The storage holds a `C` up to lifetimes, as we just checked
    let cursor: &C = unsafe { cursor.downcast_ref_unchecked::<C>() };
    H::is_end(sentinel, cursor)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Limit(u32);

    struct LimitHandler;
    impl SentinelHandler<Limit, u32> for LimitHandler {
        fn is_end(sentinel: &Limit, cursor: &u32) -> bool {
            *cursor >= sentinel.0
        }
    }

    #[test]
    fn test_sentinel_vtable_eq() {
        let vtable1 = SentinelVtable::new::<Limit, u32, LimitHandler>();
        let vtable2 = SentinelVtable::new::<Limit, u32, LimitHandler>();

        // Both should be the exact same static instance
        assert!(core::ptr::eq(vtable1, vtable2));
        assert_eq!(vtable1.cursor_type_id(), TypeId::of::<u32>());
    }

    #[test]
    fn test_sentinel_vtable_foreign_cursor() {
        let vtable = SentinelVtable::new::<Limit, u32, LimitHandler>();
        let sentinel = RawStorage::new(Limit(3));

        // SAFETY: The storage holds a `Limit`
        assert!(unsafe { vtable.is_end(&sentinel, &RawStorage::new(5u32)) });
        // SAFETY: The storage holds a `Limit`
        assert!(!unsafe { vtable.is_end(&sentinel, &RawStorage::new(1u32)) });
        // SAFETY: The storage holds a `Limit`
        assert!(!unsafe { vtable.is_end(&sentinel, &RawStorage::new(5u64)) });
    }
}
