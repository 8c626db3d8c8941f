use core::{fmt, marker::PhantomData};

use anyview_internals::RawView;

use crate::{
    any_iter::{AnyIter, AnySentinel},
    markers::{
        ApproxSize, Borrowed, Caps, CommonEnd, Contiguous, Copyable, ErasedTier, ExactSize,
        MultiPassFor, SentinelEnd, SequenceFor,
    },
    sequences::SliceCursor,
    traversal::{
        ApproximatelySized, BorrowedSequence, ContiguousSequence, Iter, Sequence, SizedSequence,
    },
};

/// A type-erased sequence of items of type `R`, with the capabilities `K`.
///
/// An `AnyView` can hold any sequence that provides at least the capabilities
/// named by `K`, a [`Caps`] bundle. The sequence is stored inline when it is
/// small enough and on the heap otherwise, and its operations are dispatched
/// through a table of function pointers generated once per concrete type.
///
/// # Capabilities
///
/// - The tier decides the cursor type: [`begin`](Self::begin) returns an
///   [`AnyIter<'a, R, T, E>`](AnyIter), or a [`SliceCursor`] for
///   [`Contiguous`] views, which also expose [`as_slice`](Self::as_slice).
/// - [`ExactSize`] adds [`len`](Self::len) and [`is_empty`](Self::is_empty).
///   Both [`ExactSize`] and [`ApproxSize`] add
///   [`reserve_hint`](Self::reserve_hint).
/// - The end capability decides what [`end`](Self::end) returns: an
///   [`AnySentinel<'a, R, T>`](AnySentinel) for [`SentinelEnd`], another
///   [`AnyIter<'a, R, T, CommonEnd>`](AnyIter) for [`CommonEnd`].
/// - [`Copyable`] views implement [`Clone`].
/// - [`Borrowed`] views implement [`BorrowedSequence`].
///
/// # Examples
///
/// ```
/// use anyview::{AnyView, markers::*, sequences::SliceView};
///
/// static NUMBERS: [i32; 5] = [1, 2, 3, 4, 5];
///
/// let view: AnyView<&i32, Caps<Forward, ExactSize>> = AnyView::new(SliceView::new(&NUMBERS));
/// assert_eq!(view.len(), 5);
/// assert_eq!(*view.begin().get(), 1);
///
/// let copy = view.clone();
/// let mut cursor = copy.begin();
/// cursor.advance();
/// assert_eq!(*cursor.get(), 2);
/// assert_eq!(*view.begin().get(), 1);
/// ```
///
/// Asking for a capability the sequence does not have is a compile error:
///
/// ```compile_fail
/// use anyview::{AnyView, markers::*, sequences::StreamView};
///
/// let view: AnyView<u8, Caps<Input, NoSize, SentinelEnd, Copyable>> =
///     AnyView::new(StreamView::new(0..3u8));
/// ```
pub struct AnyView<'a, R, K = Caps> {
    /// The concrete sequence
    raw: RawView<'a, R>,
    /// Capabilities the concrete sequence was erased with
    _marker: PhantomData<K>,
}

impl<'a, R, K> AnyView<'a, R, K> {
    /// Erases `sequence` into a view.
    ///
    /// Only compiles if `sequence` provides every capability in `K`; see
    /// [`SequenceFor`] for the exact requirements.
    ///
    /// ```
    /// use anyview::{AnyView, markers::*, sequences::Iota};
    ///
    /// let view: AnyView<i64, Caps<RandomAccess, ExactSize>> = AnyView::new(Iota::new(0, 10));
    /// assert_eq!(view.len(), 10);
    /// assert!(view.is_inline());
    /// ```
    ///
    /// Items are converted into `R` as they are read:
    ///
    /// ```
    /// use anyview::{AnyView, sequences::Iota};
    ///
    /// let view: AnyView<i128> = AnyView::new(Iota::new(1, 4));
    /// assert_eq!(view.iter().sum::<i128>(), 6);
    /// ```
    #[must_use]
    pub fn new<V: SequenceFor<R, K> + 'a>(sequence: V) -> Self {
        let raw = sequence.erase();
        #[cfg(feature = "tracing")]
        tracing::trace!(
            sequence = core::any::type_name::<V>(),
            inline = raw.is_inline(),
            "erased sequence"
        );
        Self {
            raw,
            _marker: PhantomData,
        }
    }

    /// Creates a view without any sequence.
    ///
    /// An empty view has no items: its bounds compare equal and it has a
    /// length of zero. A view that was moved out of with [`core::mem::take`]
    /// is empty as well.
    ///
    /// ```
    /// use anyview::{AnyView, markers::*};
    ///
    /// let view: AnyView<u8, Caps<Forward, ExactSize>> = AnyView::empty();
    /// assert!(view.begin() == view.end());
    /// assert_eq!(view.len(), 0);
    /// assert_eq!(view.type_name(), None);
    /// ```
    #[inline]
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            raw: RawView::empty(),
            _marker: PhantomData,
        }
    }

    /// Returns `true` if the concrete sequence is stored without allocating.
    #[inline]
    #[must_use]
    pub fn is_inline(&self) -> bool {
        self.raw.is_inline()
    }

    /// Returns the name of the concrete sequence type, or `None` if the view
    /// is empty.
    #[inline]
    #[must_use]
    pub fn type_name(&self) -> Option<&'static str> {
        self.raw.type_name()
    }
}

impl<R, K> AnyView<'static, R, K> {
    /// Returns a reference to the concrete sequence if it has type `V`.
    ///
    /// Only views that borrow nothing can be down-cast.
    ///
    /// ```
    /// use anyview::{AnyView, sequences::Iota};
    ///
    /// let view: AnyView<'static, i64> = AnyView::new(Iota::new(3, 5));
    /// assert_eq!(view.downcast_ref::<Iota>(), Some(&Iota::new(3, 5)));
    /// ```
    #[inline]
    #[must_use]
    pub fn downcast_ref<V: 'static>(&self) -> Option<&V> {
        self.raw.downcast_ref()
    }
}

impl<'a, R, T: ErasedTier, S, O, B> AnyView<'a, R, Caps<T, S, SentinelEnd, O, B>> {
    /// Returns a cursor to the first item.
    #[inline]
    #[must_use]
    pub fn begin(&self) -> AnyIter<'a, R, T, SentinelEnd> {
        AnyIter::from_raw(self.raw.begin())
    }

    /// Returns the end marker.
    #[inline]
    #[must_use]
    pub fn end(&self) -> AnySentinel<'a, R, T> {
        AnySentinel::from_raw(self.raw.end_sentinel())
    }

    /// Returns an iterator over the items.
    #[inline]
    #[must_use]
    pub fn iter(&self) -> Iter<AnyIter<'a, R, T, SentinelEnd>, AnySentinel<'a, R, T>> {
        Iter::new(self.begin(), self.end())
    }
}

impl<'a, R, T: MultiPassFor<CommonEnd>, S, O, B> AnyView<'a, R, Caps<T, S, CommonEnd, O, B>> {
    /// Returns a cursor to the first item.
    #[inline]
    #[must_use]
    pub fn begin(&self) -> AnyIter<'a, R, T, CommonEnd> {
        AnyIter::from_raw(self.raw.begin())
    }

    /// Returns a cursor one past the last item.
    #[inline]
    #[must_use]
    pub fn end(&self) -> AnyIter<'a, R, T, CommonEnd> {
        AnyIter::from_raw(self.raw.end_cursor())
    }

    /// Returns an iterator over the items.
    #[inline]
    #[must_use]
    pub fn iter(&self) -> Iter<AnyIter<'a, R, T, CommonEnd>, AnyIter<'a, R, T, CommonEnd>> {
        Iter::new(self.begin(), self.end())
    }
}

impl<'a, R, S, E, O, B> AnyView<'a, R, Caps<Contiguous, S, E, O, B>> {
    /// Returns the items as a slice.
    ///
    /// ```
    /// use anyview::{AnyView, markers::*, sequences::SharedView};
    ///
    /// let view: AnyView<char, Caps<Contiguous, ExactSize>> =
    ///     AnyView::new(SharedView::from(vec!['a', 'b']));
    /// assert_eq!(view.as_slice(), ['a', 'b']);
    /// assert_eq!(view.end() - view.begin(), 2);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[R] {
        self.raw.as_slice()
    }

    /// Returns a cursor to the first item.
    #[inline]
    #[must_use]
    pub fn begin(&self) -> SliceCursor<'_, R> {
        SliceCursor::new(self.as_slice(), 0)
    }

    /// Returns a cursor one past the last item.
    #[inline]
    #[must_use]
    pub fn end(&self) -> SliceCursor<'_, R> {
        let slice = self.as_slice();
        SliceCursor::new(slice, slice.len())
    }

    /// Returns an iterator over the items.
    #[inline]
    #[must_use]
    pub fn iter(&self) -> core::slice::Iter<'_, R> {
        self.as_slice().iter()
    }
}

impl<'a, R, T, E, O, B> AnyView<'a, R, Caps<T, ExactSize, E, O, B>> {
    /// Returns the number of items.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the view has no items.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.len() == 0
    }

    /// Returns an estimate of the number of items for pre-sizing a
    /// destination container.
    ///
    /// For a view with an exact size the estimate is exact and equals
    /// [`len`](Self::len).
    #[inline]
    #[must_use]
    pub fn reserve_hint(&self) -> usize {
        self.raw.reserve_hint()
    }
}

impl<'a, R, T, E, O, B> AnyView<'a, R, Caps<T, ApproxSize, E, O, B>> {
    /// Returns an estimate of the number of items, suitable only for
    /// pre-sizing a destination container.
    #[inline]
    #[must_use]
    pub fn reserve_hint(&self) -> usize {
        self.raw.reserve_hint()
    }
}

impl<R, K> Default for AnyView<'_, R, K> {
    /// Creates an empty view.
    #[inline]
    fn default() -> Self {
        Self::empty()
    }
}

impl<'a, R, T, S, E, B> Clone for AnyView<'a, R, Caps<T, S, E, Copyable, B>> {
    fn clone(&self) -> Self {
        let Some(raw) = self.raw.try_clone() else {
            unreachable!("copyable views are always erased as cloneable")
        };
        Self {
            raw,
            _marker: PhantomData,
        }
    }
}

impl<'a, R, T: ErasedTier, S, O, B> Sequence for AnyView<'a, R, Caps<T, S, SentinelEnd, O, B>> {
    type Cursor = AnyIter<'a, R, T, SentinelEnd>;
    type End = AnySentinel<'a, R, T>;

    #[inline]
    fn begin(&self) -> Self::Cursor {
        AnyIter::from_raw(self.raw.begin())
    }

    #[inline]
    fn end(&self) -> Self::End {
        AnySentinel::from_raw(self.raw.end_sentinel())
    }
}

impl<'a, R, T, S, O, B> Sequence for AnyView<'a, R, Caps<T, S, CommonEnd, O, B>>
where
    T: MultiPassFor<CommonEnd>,
{
    type Cursor = AnyIter<'a, R, T, CommonEnd>;
    type End = AnyIter<'a, R, T, CommonEnd>;

    #[inline]
    fn begin(&self) -> Self::Cursor {
        AnyIter::from_raw(self.raw.begin())
    }

    #[inline]
    fn end(&self) -> Self::End {
        AnyIter::from_raw(self.raw.end_cursor())
    }
}

impl<'a, R, T, E, O, B> SizedSequence for AnyView<'a, R, Caps<T, ExactSize, E, O, B>>
where
    Self: Sequence,
{
    #[inline]
    fn len(&self) -> usize {
        self.raw.len()
    }
}

impl<'a, R, T, E, O, B> ApproximatelySized for AnyView<'a, R, Caps<T, ApproxSize, E, O, B>> {
    #[inline]
    fn reserve_hint(&self) -> usize {
        self.raw.reserve_hint()
    }
}

impl<'a, R, S, E, O, B> ContiguousSequence for AnyView<'a, R, Caps<Contiguous, S, E, O, B>> {
    type Elem = R;

    #[inline]
    fn as_slice(&self) -> &[R] {
        self.raw.as_slice()
    }
}

impl<'a, R, T, S, E, O> BorrowedSequence for AnyView<'a, R, Caps<T, S, E, O, Borrowed>> {}

impl<'v, 'a, R, T: ErasedTier, S, O, B> IntoIterator
    for &'v AnyView<'a, R, Caps<T, S, SentinelEnd, O, B>>
{
    type Item = R;
    type IntoIter = Iter<AnyIter<'a, R, T, SentinelEnd>, AnySentinel<'a, R, T>>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'v, 'a, R, T, S, O, B> IntoIterator for &'v AnyView<'a, R, Caps<T, S, CommonEnd, O, B>>
where
    T: MultiPassFor<CommonEnd>,
{
    type Item = R;
    type IntoIter = Iter<AnyIter<'a, R, T, CommonEnd>, AnyIter<'a, R, T, CommonEnd>>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'v, R, S, E, O, B> IntoIterator for &'v AnyView<'_, R, Caps<Contiguous, S, E, O, B>> {
    type Item = &'v R;
    type IntoIter = core::slice::Iter<'v, R>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<R, K> fmt::Debug for AnyView<'_, R, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyView")
            .field("type_name", &self.raw.type_name())
            .field("inline", &self.raw.is_inline())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::{string::String, vec, vec::Vec};
    use core::cmp::Ordering;

    use super::*;
    use crate::{
        markers::{Bidirectional, Forward, Input, MoveOnly, NoSize, Owned, RandomAccess},
        sequences::{Iota, SharedView, SliceView, StreamView, iota_from},
        traversal::{self, InputCursor},
    };

    static NUMBERS: [i32; 5] = [1, 2, 3, 4, 5];

    #[test]
    fn test_forward_sized_copyable() {
        let view: AnyView<&i32, Caps<Forward, ExactSize, SentinelEnd, Copyable>> =
            AnyView::new(SliceView::new(&NUMBERS));
        assert_eq!(*view.begin().get(), 1);
        assert_eq!(view.len(), 5);

        let copy = view.clone();
        let mut cursor = copy.begin();
        cursor.advance();
        cursor.advance();
        assert_eq!(*cursor.get(), 3);
        assert_eq!(*view.begin().get(), 1);
        assert_eq!(copy.len(), 5);
    }

    #[test]
    fn test_random_access_scenario() {
        let view: AnyView<&i32, Caps<RandomAccess, ExactSize, CommonEnd>> =
            AnyView::new(SliceView::new(&NUMBERS));
        let it = view.begin();

        assert_eq!(*(it.clone() + 3).get(), 4);
        assert_eq!((it.clone() + 3) - it.clone(), 3);
        assert!(it < it.clone() + 3);
        assert!(it.clone() + 4 > it.clone() + 1);
        assert_eq!((it.clone() + 2).partial_cmp(&(it.clone() + 2)), Some(Ordering::Equal));
        assert_eq!(view.end() - view.begin(), 5);
    }

    #[test]
    fn test_iteration() {
        let view: AnyView<i64, Caps<Bidirectional, ExactSize, CommonEnd>> =
            AnyView::new(Iota::new(1, 4));
        let forward: Vec<i64> = view.iter().collect();
        assert_eq!(forward, [1, 2, 3]);

        let mut total = 0;
        for item in &view {
            total += item;
        }
        assert_eq!(total, 6);

        let mut cursor = view.end();
        let mut backward = Vec::new();
        while cursor != view.begin() {
            cursor.step_back();
            backward.push(cursor.get());
        }
        assert_eq!(backward, [3, 2, 1]);
    }

    #[test]
    fn test_contiguous() {
        let view: AnyView<i32, Caps<Contiguous, ExactSize>> =
            AnyView::new(SharedView::from(vec![4, 5, 6]));
        assert_eq!(view.as_slice(), [4, 5, 6]);
        assert_eq!(view.len(), 3);
        assert_eq!(view.end() - view.begin(), 3);
        assert_eq!(*(view.begin() + 1).get(), 5);
        assert_eq!(view.iter().copied().sum::<i32>(), 15);

        let empty: AnyView<i32, Caps<Contiguous>> = AnyView::empty();
        assert!(empty.as_slice().is_empty());
        assert!(empty.begin() == empty.end());
    }

    #[test]
    fn test_approximate_size() {
        let view: AnyView<u32, Caps<Input, ApproxSize, SentinelEnd, MoveOnly>> =
            AnyView::new(StreamView::new(0..4u32));
        assert_eq!(view.reserve_hint(), 4);

        let exact: AnyView<i64, Caps<Forward, ExactSize>> = AnyView::new(Iota::new(0, 9));
        assert_eq!(exact.reserve_hint(), 9);
        assert_eq!(exact.reserve_hint(), exact.len());

        let empty: AnyView<i64, Caps<Forward, ExactSize>> = AnyView::default();
        assert_eq!(empty.reserve_hint(), empty.len());
    }

    #[test]
    fn test_empty_and_moved_from() {
        let empty: AnyView<i64, Caps<Forward, ExactSize>> = AnyView::default();
        assert!(empty.begin() == empty.end());
        assert_eq!(empty.len(), 0);
        assert!(empty.is_empty());
        assert_eq!(empty.iter().count(), 0);

        let mut view: AnyView<i64, Caps<Forward, ExactSize, CommonEnd>> =
            AnyView::new(Iota::new(0, 3));
        let moved = core::mem::take(&mut view);
        assert!(view.begin() == view.end());
        assert_eq!(view.len(), 0);
        assert_eq!(view.type_name(), None);
        assert_eq!(moved.len(), 3);
    }

    #[test]
    fn test_erased_view_erases_again() {
        let inner: AnyView<i64, Caps<Forward, ExactSize, CommonEnd>> =
            AnyView::new(Iota::new(2, 5));
        let outer: AnyView<i64, Caps<Forward, ExactSize>> = AnyView::new(inner);
        assert_eq!(outer.len(), 3);
        assert_eq!(outer.iter().collect::<Vec<_>>(), [2, 3, 4]);
        assert!(outer
            .downcast_ref::<AnyView<'static, i64, Caps<Forward, ExactSize, CommonEnd>>>()
            .is_some());
    }

    #[test]
    fn test_borrowed() {
        let cursor = {
            let view: AnyView<i64, Caps<RandomAccess, NoSize, SentinelEnd, Copyable, Borrowed>> =
                AnyView::new(Iota::new(10, 20));
            view.begin()
        };
        assert_eq!(cursor.at(5), 15);

        fn assert_borrowed<V: BorrowedSequence>(_: &V) {}
        let unbounded: AnyView<i64, Caps<Forward, NoSize, SentinelEnd, Copyable, Borrowed>> =
            AnyView::new(iota_from(0));
        assert_borrowed(&unbounded);
        assert_eq!(unbounded.iter().take(3).collect::<Vec<_>>(), [0, 1, 2]);
    }

    #[test]
    fn test_placement() {
        let small: AnyView<i64, Caps<Forward>> = AnyView::new(Iota::new(0, 1));
        assert!(small.is_inline());

        let large: AnyView<i64, Caps<Forward>> = AnyView::new(PaddedIota {
            inner: Iota::new(0, 1),
            _padding: [0; 4],
        });
        assert!(!large.is_inline());
        assert_eq!(large.iter().collect::<Vec<_>>(), [0]);
    }

    #[test]
    fn test_view_of_local_vec() {
        let numbers: Vec<i64> = (1..=6).collect();

        let view: AnyView<'_, &i64, Caps<RandomAccess, ExactSize, CommonEnd>> =
            AnyView::new(SliceView::new(&numbers));
        let begin = view.begin();
        assert_eq!(*begin.at(4), 5);
        assert_eq!(view.end() - begin.clone(), 6);
        assert_eq!(view.iter().copied().sum::<i64>(), 21);

        let contiguous: AnyView<'_, i64, Caps<Contiguous, ExactSize>> =
            AnyView::new(SliceView::new(&numbers));
        assert_eq!(contiguous.as_slice(), numbers.as_slice());
        assert_eq!(*(contiguous.begin() + 2).get(), 3);

        let copy = view.clone();
        drop(view);
        assert_eq!(copy.iter().last(), Some(&6));
    }

    #[test]
    fn test_stream_of_borrowed_items() {
        let words = vec![String::from("left"), String::from("right")];
        let view: AnyView<'_, &String, Caps<Input, ApproxSize, SentinelEnd, MoveOnly>> =
            AnyView::new(StreamView::new(words.iter()));
        assert_eq!(view.reserve_hint(), 2);
        assert_eq!(view.iter().map(String::len).collect::<Vec<_>>(), [4, 5]);
    }

    #[test]
    fn test_traversal_iter_over_view() {
        let view: AnyView<i64, Caps<Forward, ExactSize, SentinelEnd, Copyable, Owned>> =
            AnyView::new(Iota::new(0, 4));
        assert_eq!(traversal::iter(&view).sum::<i64>(), 6);
    }

    #[test]
    fn test_send_sync() {
        static_assertions::assert_not_impl_any!(AnyView<'static, i64>: Send, Sync);
        static_assertions::assert_impl_all!(AnyView<'static, i64>: Clone, Default);
        static_assertions::assert_not_impl_any!(
            AnyView<'static, i64, Caps<Input, NoSize, SentinelEnd, MoveOnly>>: Clone
        );
    }

    /// An [`Iota`] too large to be stored inline.
    #[derive(Clone)]
    struct PaddedIota {
        inner: Iota,
        _padding: [u64; 4],
    }

    impl Sequence for PaddedIota {
        type Cursor = <Iota as Sequence>::Cursor;
        type End = <Iota as Sequence>::End;

        fn begin(&self) -> Self::Cursor {
            self.inner.begin()
        }

        fn end(&self) -> Self::End {
            self.inner.end()
        }
    }
}
