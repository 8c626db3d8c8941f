use core::{fmt, marker::PhantomData};

use anyview_internals::RawSentinel;

use crate::{
    any_iter::AnyIter,
    markers::{ErasedTier, Input, SentinelEnd},
    traversal::Sentinel,
};

/// A type-erased end marker for an [`AnyIter<'a, R, T>`](AnyIter).
///
/// A sentinel only ever reports the end for cursors of the concrete sequence
/// it was produced from. A default-constructed sentinel is singular and
/// matches only a singular cursor.
///
/// # Examples
///
/// ```
/// use anyview::{AnyView, markers::*, sequences::Iota};
///
/// let view: AnyView<i64, Caps<Forward>> = AnyView::new(Iota::new(0, 2));
/// let end = view.end();
///
/// let mut cursor = view.begin();
/// assert!(cursor != end);
/// cursor.advance();
/// cursor.advance();
/// assert!(cursor == end);
/// ```
pub struct AnySentinel<'a, R, T = Input> {
    /// The concrete sentinel
    raw: RawSentinel<'a>,
    /// Item type and tier of the cursors this sentinel is compared against
    _marker: PhantomData<fn() -> (R, T)>,
}

impl<'a, R, T> AnySentinel<'a, R, T> {
    /// Wraps an erased sentinel created for cursors of tier `T`.
    #[inline]
    pub(crate) fn from_raw(raw: RawSentinel<'a>) -> Self {
        Self {
            raw,
            _marker: PhantomData,
        }
    }

    /// Returns `true` if the sentinel does not refer to any sequence.
    #[inline]
    #[must_use]
    pub fn is_singular(&self) -> bool {
        self.raw.is_singular()
    }

    /// Returns the name of the concrete sentinel type, or `None` if the
    /// sentinel is singular.
    #[inline]
    #[must_use]
    pub fn type_name(&self) -> Option<&'static str> {
        self.raw.type_name()
    }
}

impl<R, T> Default for AnySentinel<'_, R, T> {
    /// Creates a singular sentinel.
    #[inline]
    fn default() -> Self {
        Self::from_raw(RawSentinel::singular())
    }
}

impl<R, T> Clone for AnySentinel<'_, R, T> {
    #[inline]
    fn clone(&self) -> Self {
        Self::from_raw(self.raw.clone())
    }
}

impl<'a, R, T: ErasedTier> Sentinel<AnyIter<'a, R, T, SentinelEnd>> for AnySentinel<'a, R, T> {
    #[inline]
    fn is_end(&self, cursor: &AnyIter<'a, R, T, SentinelEnd>) -> bool {
        self.raw.is_end(cursor.as_raw())
    }
}

impl<'a, R, T: ErasedTier> PartialEq<AnySentinel<'a, R, T>> for AnyIter<'a, R, T, SentinelEnd> {
    #[inline]
    fn eq(&self, sentinel: &AnySentinel<'a, R, T>) -> bool {
        sentinel.raw.is_end(self.as_raw())
    }
}

impl<'a, R, T: ErasedTier> PartialEq<AnyIter<'a, R, T, SentinelEnd>> for AnySentinel<'a, R, T> {
    #[inline]
    fn eq(&self, cursor: &AnyIter<'a, R, T, SentinelEnd>) -> bool {
        self.raw.is_end(cursor.as_raw())
    }
}

impl<R, T> fmt::Debug for AnySentinel<'_, R, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnySentinel")
            .field("type_name", &self.raw.type_name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        AnyView,
        markers::{Caps, Forward, MoveOnly, NoSize},
        sequences::{Iota, SharedView, StreamView},
    };

    #[test]
    fn test_singular_sentinel() {
        let sentinel = AnySentinel::<u32>::default();
        assert!(sentinel.is_singular());
        assert!(AnyIter::<u32>::default() == sentinel);

        let view: AnyView<u32, Caps<Input, NoSize, SentinelEnd, MoveOnly>> =
            AnyView::new(StreamView::new(0..3u32));
        assert!(view.begin() != sentinel);
    }

    #[test]
    fn test_foreign_sentinel() {
        let numbers: AnyView<i64, Caps<Forward>> = AnyView::new(Iota::new(0, 0));
        let shared: AnyView<i64, Caps<Forward>> =
            AnyView::new(SharedView::<i64>::from(alloc::vec::Vec::new()));

        assert!(numbers.begin() == numbers.end());
        assert!(shared.begin() == shared.end());
        assert!(shared.begin() != numbers.end());
        assert!(numbers.begin() != shared.end());
    }

    #[test]
    fn test_clone() {
        let view: AnyView<i64, Caps<Forward>> = AnyView::new(Iota::new(0, 1));
        let end = view.end();
        let copy = end.clone();
        let mut cursor = view.begin();
        cursor.advance();
        assert!(cursor == end);
        assert!(copy == cursor);
        assert!(!copy.is_singular());
    }

    #[test]
    fn test_send_sync() {
        static_assertions::assert_not_impl_any!(AnySentinel<'static, u8>: Send, Sync);
    }
}
