//! Type-erased sentinel.
//!
//! This module encapsulates the `vtable` and `storage` fields of
//! [`RawSentinel`], ensuring they are only visible within this module. This
//! visibility restriction guarantees the safety invariant: **the vtable is
//! `None` exactly when the storage is empty, and otherwise was created for the
//! concrete sentinel type held in the storage**.
//!
//! Sentinels are always stored cloneable, since every consumer that holds an
//! end marker expects to be able to duplicate it.

use core::any::TypeId;

use crate::{
    cursor::RawCursor, handlers::SentinelHandler, sentinel::vtable::SentinelVtable,
    storage::RawStorage,
};

/// A type-erased end marker for a [`RawCursor`], over a concrete sentinel
/// that outlives `'a`.
///
/// A sentinel without a vtable is *singular*. A singular sentinel only
/// matches a singular cursor, which makes the bounds of an empty view compare
/// equal.
pub struct RawSentinel<'a> {
    /// Vtable of the concrete sentinel
    ///
    /// # Safety
    ///
    /// The following safety invariants are guaranteed to be upheld as long as
    /// this struct exists:
    ///
    /// 1. The vtable is `None` if and only if `storage` is empty.
    /// 2. If the vtable is `Some`, it was created for some sentinel type `S`
    ///    and `storage` holds a value of type `S`.
    /// 3. `storage` is cloneable.
    vtable: Option<&'static SentinelVtable>,

    /// The concrete sentinel
    storage: RawStorage<'a>,
}

impl<'a> RawSentinel<'a> {
    /// Creates an erased sentinel marking the end of cursors of type `C`.
    #[inline]
    #[must_use]
    pub fn new<S, C, H>(sentinel: S) -> Self
    where
        S: Clone + 'a,
        H: SentinelHandler<S, C>,
    {
        // SAFETY: We must uphold the safety invariants of the vtable field:
        // 1. The vtable is `Some` and the storage is occupied.
        // 2. The vtable was created for `S` and the storage holds an `S`.
        // 3. The storage is created with `new_cloneable`.
        Self {
            vtable: Some(SentinelVtable::new::<S, C, H>()),
            storage: RawStorage::new_cloneable(sentinel),
        }
    }

    /// Creates a singular sentinel.
    #[inline]
    #[must_use]
    pub const fn singular() -> Self {
        // SAFETY: We must uphold the safety invariants of the vtable field:
        // 1. The vtable is `None` and the storage is empty.
        // 2. Not applicable.
        // 3. An empty storage is cloneable.
        Self {
            vtable: None,
            storage: RawStorage::empty(),
        }
    }

    /// Returns `true` if the sentinel holds no concrete sentinel.
    #[inline]
    #[must_use]
    pub fn is_singular(&self) -> bool {
        self.vtable.is_none()
    }

    /// Returns the [`TypeId`] of the concrete sentinel with its lifetimes
    /// erased, if any.
    #[inline]
    #[must_use]
    pub fn type_id(&self) -> Option<TypeId> {
        self.storage.type_id()
    }

    /// Returns the [`core::any::type_name`] of the concrete sentinel, if any.
    #[inline]
    #[must_use]
    pub fn type_name(&self) -> Option<&'static str> {
        self.storage.type_name()
    }

    /// Returns the [`TypeId`] of the cursor type this sentinel marks the end
    /// of with its lifetimes erased, if any.
    #[inline]
    #[must_use]
    pub fn cursor_type_id(&self) -> Option<TypeId> {
        self.vtable.map(SentinelVtable::cursor_type_id)
    }

    /// Returns whether `cursor` has reached this sentinel.
    ///
    /// A singular sentinel matches only a singular cursor. A sentinel never
    /// matches a cursor of another concrete type than the one it was created
    /// for.
    #[inline]
    #[must_use]
    pub fn is_end<R>(&self, cursor: &RawCursor<'a, R>) -> bool {
        let Some(vtable) = self.vtable else {
            return cursor.is_singular();
        };

        // SAFETY:
        // 1. The storage holds the sentinel type of the vtable, as guaranteed by
        //    the invariants of the vtable field.
        unsafe {
            // @add-unsafe-context: SentinelVtable
            vtable.is_end(&self.storage, cursor.storage())
        }
    }

    /// Moves the concrete sentinel out, leaving a singular sentinel behind.
    #[inline]
    #[must_use]
    pub fn take(&mut self) -> Self {
        core::mem::replace(self, Self::singular())
    }
}

impl Clone for RawSentinel<'_> {
    fn clone(&self) -> Self {
        let Some(storage) = self.storage.try_clone() else {
            unreachable!("sentinel storage is always cloneable")
        };

        // SAFETY: We must uphold the safety invariants of the vtable field:
        // 1. The clone of an occupied storage is occupied, the clone of an empty
        //    one is empty.
        // 2. The clone holds a value of the same type as `self.storage`.
        // 3. The clone was created with the same cloneable vtable.
        Self {
            vtable: self.vtable,
            storage,
        }
    }
}

impl Default for RawSentinel<'_> {
    #[inline]
    fn default() -> Self {
        Self::singular()
    }
}

impl core::fmt::Debug for RawSentinel<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RawSentinel")
            .field("type_name", &self.type_name())
            .finish()
    }
}
