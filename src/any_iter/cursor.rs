use core::{
    cmp::Ordering,
    fmt,
    marker::PhantomData,
    ops::{Add, AddAssign, Sub, SubAssign},
};

use anyview_internals::RawCursor;

use crate::{
    error::TraversalError,
    markers::{
        BidirectionalTier, EndMarker, ErasedTier, ForwardTier, Input, MultiPassFor, RandomAccess,
        SentinelEnd,
    },
    traversal::{BidirectionalCursor, ForwardCursor, InputCursor, RandomAccessCursor},
};

/// A type-erased cursor yielding items of type `R`, valid for the lifetime
/// `'a` of the data it refers to.
///
/// See the [module documentation](crate::any_iter) for the operations each
/// tier `T` provides.
///
/// # Examples
///
/// ```
/// use anyview::{AnyView, markers::*, sequences::Iota};
///
/// let view: AnyView<i64, Caps<RandomAccess, ExactSize, CommonEnd>> =
///     AnyView::new(Iota::new(1, 6));
///
/// let begin = view.begin();
/// let fourth = begin.clone() + 3;
/// assert_eq!(fourth.get(), 4);
/// assert_eq!(&fourth - &begin, 3);
/// assert!(begin < fourth);
/// assert_eq!(begin.at(4), 5);
/// ```
pub struct AnyIter<'a, R, T = Input, E = SentinelEnd> {
    /// The concrete cursor
    raw: RawCursor<'a, R>,
    /// Capabilities the concrete cursor was erased with
    _marker: PhantomData<(T, E)>,
}

impl<'a, R, T, E> AnyIter<'a, R, T, E> {
    /// Wraps an erased cursor created with the capabilities `T` and `E`.
    #[inline]
    pub(crate) fn from_raw(raw: RawCursor<'a, R>) -> Self {
        Self {
            raw,
            _marker: PhantomData,
        }
    }

    /// Returns the erased cursor.
    #[inline]
    pub(crate) fn as_raw(&self) -> &RawCursor<'a, R> {
        &self.raw
    }

    /// Returns `true` if the cursor does not refer to any sequence.
    ///
    /// ```
    /// use anyview::AnyIter;
    ///
    /// let cursor: AnyIter<u8> = AnyIter::default();
    /// assert!(cursor.is_singular());
    /// ```
    #[inline]
    #[must_use]
    pub fn is_singular(&self) -> bool {
        self.raw.is_singular()
    }

    /// Returns the name of the concrete cursor type, or `None` if the cursor
    /// is singular.
    #[inline]
    #[must_use]
    pub fn type_name(&self) -> Option<&'static str> {
        self.raw.type_name()
    }

    /// Returns `true` if the concrete cursor is stored without allocating.
    #[inline]
    #[must_use]
    pub fn is_inline(&self) -> bool {
        self.raw.is_inline()
    }
}

impl<'a, R, T: ErasedTier, E: EndMarker> AnyIter<'a, R, T, E> {
    /// Returns the item at the current position.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is singular.
    #[inline]
    #[must_use]
    #[track_caller]
    pub fn get(&self) -> R {
        self.raw.get()
    }

    /// Returns the item at the current position, or
    /// [`TraversalError::Singular`] if the cursor is singular.
    #[inline]
    pub fn try_get(&self) -> Result<R, TraversalError> {
        if self.raw.is_singular() {
            return Err(TraversalError::Singular);
        }
        Ok(self.raw.get())
    }

    /// Moves the cursor to the next position.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is singular.
    #[inline]
    #[track_caller]
    pub fn advance(&mut self) {
        self.raw.advance();
    }

    /// Moves the item at the current position out of the cursor.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is singular.
    #[inline]
    #[must_use]
    #[track_caller]
    pub fn take_item(&mut self) -> R {
        self.raw.take_item()
    }
}

impl<'a, R, T: BidirectionalTier, E: EndMarker> AnyIter<'a, R, T, E> {
    /// Moves the cursor to the previous position.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is singular.
    #[inline]
    #[track_caller]
    pub fn step_back(&mut self) {
        self.raw.step_back();
    }
}

impl<'a, R, E: EndMarker> AnyIter<'a, R, RandomAccess, E> {
    /// Moves the cursor by `offset` positions, which may be negative.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is singular.
    #[inline]
    #[track_caller]
    pub fn jump(&mut self, offset: isize) {
        self.raw.jump(offset);
    }

    /// Returns the signed number of positions from `self` to `other`.
    ///
    /// # Panics
    ///
    /// Panics if either cursor is singular, or if the cursors were produced by
    /// different concrete sequence types. See
    /// [`try_distance_to`](Self::try_distance_to) for a checked variant.
    #[inline]
    #[must_use]
    #[track_caller]
    pub fn distance_to(&self, other: &Self) -> isize {
        other.raw.offset_from(&self.raw)
    }

    /// Returns the signed number of positions from `self` to `other`.
    ///
    /// # Errors
    ///
    /// - [`TraversalError::Singular`] if either cursor is singular.
    /// - [`TraversalError::Mismatched`] if the cursors were produced by
    ///   different concrete sequence types.
    pub fn try_distance_to(&self, other: &Self) -> Result<isize, TraversalError> {
        let (Some(left), Some(right)) = (self.raw.type_name(), other.raw.type_name()) else {
            return Err(TraversalError::Singular);
        };
        other
            .raw
            .checked_offset_from(&self.raw)
            .ok_or(TraversalError::Mismatched { left, right })
    }

    /// Returns the item `offset` positions away from the current one.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is singular.
    #[inline]
    #[must_use]
    #[track_caller]
    pub fn at(&self, offset: isize) -> R {
        let mut cursor = self.clone();
        cursor.raw.jump(offset);
        cursor.raw.get()
    }
}

impl<R, T, E> Default for AnyIter<'_, R, T, E> {
    /// Creates a singular cursor.
    #[inline]
    fn default() -> Self {
        Self::from_raw(RawCursor::singular())
    }
}

impl<'a, R, T: MultiPassFor<E>, E> Clone for AnyIter<'a, R, T, E> {
    fn clone(&self) -> Self {
        let Some(raw) = self.raw.try_clone() else {
            unreachable!("multi-pass cursors are always erased as cloneable")
        };
        Self::from_raw(raw)
    }
}

impl<'a, R, T: MultiPassFor<E>, E> PartialEq for AnyIter<'a, R, T, E> {
    /// Two cursors are equal if both are singular, or if they hold the same
    /// concrete cursor type and the concrete cursors are equal.
    #[inline]
    #[track_caller]
    fn eq(&self, other: &Self) -> bool {
        self.raw.equals(&other.raw)
    }
}

impl<'a, R, E: EndMarker> PartialOrd for AnyIter<'a, R, RandomAccess, E> {
    /// Cursors are ordered by their position. Cursors of different concrete
    /// sequence types, or a singular and a non-singular cursor, are unordered.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.raw.is_singular() && other.raw.is_singular() {
            return Some(Ordering::Equal);
        }
        self.raw
            .checked_offset_from(&other.raw)
            .map(|offset| offset.cmp(&0))
    }
}

impl<'a, R, E: EndMarker> AddAssign<isize> for AnyIter<'a, R, RandomAccess, E> {
    #[inline]
    #[track_caller]
    fn add_assign(&mut self, offset: isize) {
        self.raw.jump(offset);
    }
}

impl<'a, R, E: EndMarker> SubAssign<isize> for AnyIter<'a, R, RandomAccess, E> {
    #[inline]
    #[track_caller]
    fn sub_assign(&mut self, offset: isize) {
        self.raw.jump(-offset);
    }
}

impl<'a, R, E: EndMarker> Add<isize> for AnyIter<'a, R, RandomAccess, E> {
    type Output = Self;

    #[inline]
    #[track_caller]
    fn add(mut self, offset: isize) -> Self {
        self += offset;
        self
    }
}

impl<'a, R, E: EndMarker> Sub<isize> for AnyIter<'a, R, RandomAccess, E> {
    type Output = Self;

    #[inline]
    #[track_caller]
    fn sub(mut self, offset: isize) -> Self {
        self -= offset;
        self
    }
}

impl<'a, R, E: EndMarker> Sub for AnyIter<'a, R, RandomAccess, E> {
    type Output = isize;

    /// Returns the signed number of positions from `origin` to `self`.
    #[inline]
    #[track_caller]
    fn sub(self, origin: Self) -> isize {
        self.raw.offset_from(&origin.raw)
    }
}

impl<'r, 'a, R, E: EndMarker> Sub<&'r AnyIter<'a, R, RandomAccess, E>>
    for &'r AnyIter<'a, R, RandomAccess, E>
{
    type Output = isize;

    /// Returns the signed number of positions from `origin` to `self`.
    #[inline]
    #[track_caller]
    fn sub(self, origin: Self) -> isize {
        self.raw.offset_from(&origin.raw)
    }
}

impl<'a, R, T: ErasedTier, E: EndMarker> InputCursor for AnyIter<'a, R, T, E> {
    type Item = R;

    #[inline]
    fn get(&self) -> R {
        self.raw.get()
    }

    #[inline]
    fn advance(&mut self) {
        self.raw.advance();
    }

    #[inline]
    fn take_item(&mut self) -> R {
        self.raw.take_item()
    }
}

impl<'a, R, T, E> ForwardCursor for AnyIter<'a, R, T, E>
where
    T: ForwardTier + MultiPassFor<E>,
    E: EndMarker,
{
}

impl<'a, R, T, E> BidirectionalCursor for AnyIter<'a, R, T, E>
where
    T: BidirectionalTier + MultiPassFor<E>,
    E: EndMarker,
{
    #[inline]
    fn step_back(&mut self) {
        self.raw.step_back();
    }
}

impl<'a, R, E: EndMarker> RandomAccessCursor for AnyIter<'a, R, RandomAccess, E> {
    #[inline]
    fn jump(&mut self, offset: isize) {
        self.raw.jump(offset);
    }

    #[inline]
    fn offset_from(&self, origin: &Self) -> isize {
        self.raw.offset_from(&origin.raw)
    }
}

impl<R, T, E> fmt::Debug for AnyIter<'_, R, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyIter")
            .field("type_name", &self.raw.type_name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;
    use crate::{
        AnyView,
        markers::{Bidirectional, Caps, CommonEnd, ExactSize, Forward, MoveOnly, NoSize},
        sequences::{Iota, SharedView, StreamView},
    };

    type Indexed = AnyView<'static, i64, Caps<RandomAccess, ExactSize, CommonEnd>>;

    #[test]
    fn test_singular_equality() {
        let left = AnyIter::<i64, Forward>::default();
        let right = AnyIter::<i64, Forward>::default();
        assert!(left == right);

        let view: AnyView<i64, Caps<Forward>> = AnyView::new(Iota::new(0, 3));
        assert!(view.begin() != left);
        assert!(left != view.begin());
    }

    #[test]
    fn test_cross_type_inequality() {
        let numbers: AnyView<i64, Caps<Forward, ExactSize, CommonEnd>> =
            AnyView::new(Iota::new(1, 4));
        let shared: AnyView<i64, Caps<Forward, ExactSize, CommonEnd>> =
            AnyView::new(SharedView::from(alloc::vec![1i64, 2, 3]));

        assert_eq!(numbers.begin().get(), shared.begin().get());
        assert!(numbers.begin() != shared.begin());
        assert!(numbers.end() != shared.end());
    }

    #[test]
    fn test_random_access_arithmetic() {
        let view: Indexed = AnyView::new(Iota::new(1, 6));
        let begin = view.begin();

        let mut cursor = begin.clone() + 3;
        assert_eq!(cursor.get(), 4);
        assert_eq!(cursor.clone() - begin.clone(), 3);
        assert_eq!(begin.distance_to(&cursor), 3);

        cursor -= 2;
        assert_eq!(cursor.get(), 2);
        cursor += 1;
        assert_eq!((cursor.clone() - 1).get(), 2);

        assert!(begin < cursor);
        assert!(cursor > begin);
        assert!(begin <= begin.clone());
        assert_eq!(begin.partial_cmp(&view.end()), Some(Ordering::Less));
        assert_eq!(view.end().at(-1), 5);
    }

    #[test]
    fn test_ordering_across_sources() {
        let numbers: Indexed = AnyView::new(Iota::new(1, 6));
        let shared: Indexed = AnyView::new(SharedView::from(alloc::vec![1i64, 2]));

        assert_eq!(numbers.begin().partial_cmp(&shared.begin()), None);
        assert_eq!(
            AnyIter::<i64, RandomAccess>::default().partial_cmp(&AnyIter::default()),
            Some(Ordering::Equal)
        );
        assert_eq!(numbers.begin().partial_cmp(&AnyIter::default()), None);
    }

    #[test]
    fn test_try_distance_to() {
        let numbers: Indexed = AnyView::new(Iota::new(1, 6));
        let shared: Indexed = AnyView::new(SharedView::from(alloc::vec![1i64, 2]));

        assert_eq!(numbers.begin().try_distance_to(&numbers.end()), Ok(5));
        assert_eq!(
            numbers.begin().try_distance_to(&AnyIter::default()),
            Err(TraversalError::Singular)
        );
        assert!(matches!(
            numbers.begin().try_distance_to(&shared.begin()),
            Err(TraversalError::Mismatched { .. })
        ));
    }

    #[test]
    #[should_panic(expected = "cannot be measured against each other")]
    fn test_distance_across_sources_panics() {
        let numbers: Indexed = AnyView::new(Iota::new(1, 6));
        let shared: Indexed = AnyView::new(SharedView::from(alloc::vec![1i64, 2]));
        let _ = numbers.begin().distance_to(&shared.begin());
    }

    #[test]
    #[should_panic(expected = "called `get` on a singular cursor")]
    fn test_singular_get_panics() {
        let cursor = AnyIter::<u8>::default();
        let _ = cursor.get();
    }

    #[test]
    fn test_try_get() {
        let view: AnyView<i64, Caps<Forward>> = AnyView::new(Iota::new(7, 8));
        assert_eq!(view.begin().try_get(), Ok(7));
        assert_eq!(
            AnyIter::<i64>::default().try_get(),
            Err(TraversalError::Singular)
        );
    }

    #[test]
    fn test_step_back() {
        let view: AnyView<i64, Caps<Bidirectional, ExactSize, CommonEnd>> =
            AnyView::new(Iota::new(0, 3));
        let mut cursor = view.end();
        cursor.step_back();
        assert_eq!(cursor.get(), 2);
    }

    #[test]
    fn test_take_leaves_singular() {
        let view: AnyView<i64, Caps<Forward>> = AnyView::new(Iota::new(0, 3));
        let mut cursor = view.begin();
        let taken = core::mem::take(&mut cursor);
        assert!(cursor.is_singular());
        assert_eq!(taken.get(), 0);
    }

    #[test]
    fn test_single_pass_common_end_is_cloneable() {
        let view: AnyView<i64, Caps<Input, ExactSize, CommonEnd, MoveOnly>> =
            AnyView::new(Iota::new(0, 2));
        let begin = view.begin();
        let copy = begin.clone();
        assert!(begin == copy);
        assert!(begin != view.end());
    }

    #[test]
    fn test_single_pass_traversal() {
        let view: AnyView<u32, Caps<Input, NoSize, SentinelEnd, MoveOnly>> =
            AnyView::new(StreamView::new([3u32, 1, 4].into_iter()));
        let items: Vec<u32> = view.iter().collect();
        assert_eq!(items, [3, 1, 4]);
    }

    #[test]
    fn test_send_sync() {
        static_assertions::assert_not_impl_any!(AnyIter<'static, u8>: Send, Sync, Clone);
        static_assertions::assert_impl_all!(AnyIter<'static, u8, Forward>: Clone, PartialEq);
        static_assertions::assert_impl_all!(
            AnyIter<'static, u8, Input, CommonEnd>: Clone, PartialEq
        );
        static_assertions::assert_not_impl_any!(AnyIter<'static, u8, Forward>: PartialOrd);
    }
}
