//! Type-erased view.
//!
//! This module encapsulates the `vtable` and `storage` fields of [`RawView`],
//! ensuring they are only visible within this module. This visibility
//! restriction guarantees the safety invariant: **the vtable is `None` exactly
//! when the storage is empty, and otherwise was created for the concrete
//! sequence type held in the storage**.
//!
//! An empty view behaves as a sequence without items: its bounds are a
//! singular cursor and a singular sentinel, which compare equal, and it
//! measures zero.
//!
//! A [`RawView<'a, R>`](RawView) may hold a sequence that borrows data for
//! `'a`. The cursors and sentinels it hands out are erased for the same
//! lifetime.

use core::{any::TypeId, marker::PhantomData};

use crate::{
    cursor::RawCursor,
    handlers::{BoundsHandler, SizeHandler},
    sentinel::RawSentinel,
    storage::RawStorage,
    view::vtable::ViewVtable,
};

/// A type-erased sequence whose cursors yield items of type `R`.
pub struct RawView<'a, R> {
    /// Vtable of the concrete sequence
    ///
    /// # Safety
    ///
    /// The following safety invariants are guaranteed to be upheld as long as
    /// this struct exists:
    ///
    /// 1. The vtable is `None` if and only if `storage` is empty.
    /// 2. If the vtable is `Some`, it was created for some view type `V` and
    ///    `storage` holds a value of type `V`.
    /// 3. If the vtable is `Some`, it was created for the item type `R`.
    vtable: Option<&'static ViewVtable>,

    /// The concrete sequence
    storage: RawStorage<'a>,

    /// Items are produced, never stored
    _item: PhantomData<fn() -> R>,
}

impl<'a, R> RawView<'a, R> {
    /// Creates a move-only erased view.
    ///
    /// [`RawView::try_clone`] on the returned view returns `None`.
    #[inline]
    #[must_use]
    pub fn new<V, B, S>(view: V) -> Self
    where
        V: 'a,
        B: BoundsHandler<V, R>,
        S: SizeHandler<V>,
    {
        // SAFETY: We must uphold the safety invariants of the vtable field:
        // 1. The vtable is `Some` and the storage is occupied.
        // 2. The vtable was created for `V` and the storage holds a `V`.
        // 3. The vtable was created for `R`.
        Self {
            vtable: Some(ViewVtable::new::<V, R, B, S>()),
            storage: RawStorage::new(view),
            _item: PhantomData,
        }
    }

    /// Creates a cloneable erased view.
    #[inline]
    #[must_use]
    pub fn new_cloneable<V, B, S>(view: V) -> Self
    where
        V: Clone + 'a,
        B: BoundsHandler<V, R>,
        S: SizeHandler<V>,
    {
        // SAFETY: We must uphold the safety invariants of the vtable field:
        // 1. The vtable is `Some` and the storage is occupied.
        // 2. The vtable was created for `V` and the storage holds a `V`.
        // 3. The vtable was created for `R`.
        Self {
            vtable: Some(ViewVtable::new::<V, R, B, S>()),
            storage: RawStorage::new_cloneable(view),
            _item: PhantomData,
        }
    }

    /// Creates an empty view.
    #[inline]
    #[must_use]
    pub const fn empty() -> Self {
        // SAFETY: We must uphold the safety invariants of the vtable field:
        // 1. The vtable is `None` and the storage is empty.
        // 2. Not applicable.
        // 3. Not applicable.
        Self {
            vtable: None,
            storage: RawStorage::empty(),
            _item: PhantomData,
        }
    }

    /// Returns `true` if the view holds no concrete sequence.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vtable.is_none()
    }

    /// Returns `true` if the concrete sequence is stored inline.
    #[inline]
    #[must_use]
    pub fn is_inline(&self) -> bool {
        self.storage.is_inline()
    }

    /// Returns the [`TypeId`] of the concrete sequence with its lifetimes
    /// erased, if any.
    #[inline]
    #[must_use]
    pub fn type_id(&self) -> Option<TypeId> {
        self.storage.type_id()
    }

    /// Returns the [`core::any::type_name`] of the concrete sequence, if any.
    #[inline]
    #[must_use]
    pub fn type_name(&self) -> Option<&'static str> {
        self.storage.type_name()
    }

    /// Returns a cursor to the first item, or a singular cursor if the view
    /// is empty.
    #[inline]
    #[must_use]
    #[track_caller]
    pub fn begin(&self) -> RawCursor<'a, R> {
        let Some(vtable) = self.vtable else {
            return RawCursor::singular();
        };

        // SAFETY:
        // 1. The storage holds the view type of the vtable, as guaranteed by the
        //    invariants of the vtable field.
        // 2. The vtable was created for `R`, as guaranteed by the invariants of
        //    the vtable field.
        unsafe {
            // @add-unsafe-context: ViewVtable
            vtable.begin(&self.storage)
        }
    }

    /// Returns the end sentinel, or a singular sentinel if the view is empty.
    #[inline]
    #[must_use]
    #[track_caller]
    pub fn end_sentinel(&self) -> RawSentinel<'a> {
        let Some(vtable) = self.vtable else {
            return RawSentinel::singular();
        };

        // SAFETY:
        // 1. The storage holds the view type of the vtable, as guaranteed by the
        //    invariants of the vtable field.
        unsafe {
            // @add-unsafe-context: ViewVtable
            vtable.end_sentinel(&self.storage)
        }
    }

    /// Returns the end cursor, or a singular cursor if the view is empty.
    #[inline]
    #[must_use]
    #[track_caller]
    pub fn end_cursor(&self) -> RawCursor<'a, R> {
        let Some(vtable) = self.vtable else {
            return RawCursor::singular();
        };

        // SAFETY:
        // 1. The storage holds the view type of the vtable, as guaranteed by the
        //    invariants of the vtable field.
        // 2. The vtable was created for `R`, as guaranteed by the invariants of
        //    the vtable field.
        unsafe {
            // @add-unsafe-context: ViewVtable
            vtable.end_cursor(&self.storage)
        }
    }

    /// Returns the items as a slice, or an empty slice if the view is empty.
    #[inline]
    #[must_use]
    #[track_caller]
    pub fn as_slice(&self) -> &[R] {
        let Some(vtable) = self.vtable else {
            return &[];
        };

        // SAFETY:
        // 1. The storage holds the view type of the vtable, as guaranteed by the
        //    invariants of the vtable field.
        // 2. The vtable was created for `R`, as guaranteed by the invariants of
        //    the vtable field.
        unsafe {
            // @add-unsafe-context: ViewVtable
            vtable.as_slice(&self.storage)
        }
    }

    /// Returns the number of items, or zero if the view is empty.
    #[inline]
    #[must_use]
    #[track_caller]
    pub fn len(&self) -> usize {
        let Some(vtable) = self.vtable else {
            return 0;
        };

        // SAFETY:
        // 1. The storage holds the view type of the vtable, as guaranteed by the
        //    invariants of the vtable field.
        unsafe {
            // @add-unsafe-context: ViewVtable
            vtable.len(&self.storage)
        }
    }

    /// Returns an estimate of the number of items, or zero if the view is
    /// empty.
    #[inline]
    #[must_use]
    #[track_caller]
    pub fn reserve_hint(&self) -> usize {
        let Some(vtable) = self.vtable else {
            return 0;
        };

        // SAFETY:
        // 1. The storage holds the view type of the vtable, as guaranteed by the
        //    invariants of the vtable field.
        unsafe {
            // @add-unsafe-context: ViewVtable
            vtable.reserve_hint(&self.storage)
        }
    }

    /// Clones the view.
    ///
    /// An empty view clones into an empty view. Returns `None` if the view was
    /// created with [`RawView::new`].
    #[inline]
    #[must_use]
    pub fn try_clone(&self) -> Option<Self> {
        let storage = self.storage.try_clone()?;
        // SAFETY: We must uphold the safety invariants of the vtable field:
        // 1. The clone of an occupied storage is occupied, the clone of an empty
        //    one is empty.
        // 2. The clone holds a value of the same type as `self.storage`.
        // 3. The vtable is unchanged.
        Some(Self {
            vtable: self.vtable,
            storage,
            _item: PhantomData,
        })
    }

    /// Moves the concrete sequence out, leaving an empty view behind.
    #[inline]
    #[must_use]
    pub fn take(&mut self) -> Self {
        core::mem::replace(self, Self::empty())
    }
}

impl<R> RawView<'static, R> {
    /// Returns a reference to the concrete sequence if it has type `V`.
    ///
    /// Only available for views that do not borrow, because the check cannot
    /// tell apart types that differ only in their lifetimes.
    #[inline]
    #[must_use]
    pub fn downcast_ref<V: 'static>(&self) -> Option<&V> {
        self.storage.downcast_ref::<V>()
    }
}

impl<R> Default for RawView<'_, R> {
    #[inline]
    fn default() -> Self {
        Self::empty()
    }
}

impl<R> core::fmt::Debug for RawView<'_, R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RawView")
            .field("type_name", &self.type_name())
            .field("inline", &self.is_inline())
            .finish()
    }
}
