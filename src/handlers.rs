//! Handlers that plug the [`traversal`](crate::traversal) protocol into the
//! erased vtables of [`anyview_internals`].
//!
//! Each handler implements the operations of exactly one capability level and
//! leaves every other operation at its panicking default. The capability
//! markers on [`AnyIter`](crate::AnyIter) and [`AnyView`](crate::AnyView)
//! then make sure those defaults are never reachable through the public API:
//! an `AnyIter<'_, R, Forward>` has no `step_back` method to call in the first
//! place.
//!
//! You rarely need to name these types. They appear in the bounds of
//! [`AnyView::new`](crate::AnyView::new) through the marker traits in
//! [`markers`](crate::markers).

use core::marker::PhantomData;

use anyview_internals::{
    RawCursor, RawSentinel,
    handlers::{BoundsHandler, CursorHandler, SentinelHandler, SizeHandler},
};

use crate::{
    markers::{
        ApproxSize, CommonEnd, Contiguous, CursorFor, EndMarker, ErasedTier, ExactSize, NoSize,
        SentinelEnd,
    },
    traversal::{
        ApproximatelySized, BidirectionalCursor, CommonSequence, ContiguousSequence, InputCursor,
        RandomAccessCursor, Sentinel, Sequence, SizedSequence,
    },
};

/// Handler for single-pass cursors: reading and advancing only.
#[derive(Copy, Clone)]
pub struct SinglePass;

impl<C, R> CursorHandler<C, R> for SinglePass
where
    C: InputCursor,
    C::Item: Into<R>,
{
    #[inline]
    fn get(cursor: &C) -> R {
        cursor.get().into()
    }

    #[inline]
    fn advance(cursor: &mut C) {
        cursor.advance();
    }

    #[inline]
    fn take_item(cursor: &mut C) -> R {
        cursor.take_item().into()
    }
}

/// Handler for cursors that can be compared: [`SinglePass`] plus equality.
#[derive(Copy, Clone)]
pub struct MultiPass;

impl<C, R> CursorHandler<C, R> for MultiPass
where
    C: InputCursor + PartialEq,
    C::Item: Into<R>,
{
    #[inline]
    fn get(cursor: &C) -> R {
        cursor.get().into()
    }

    #[inline]
    fn advance(cursor: &mut C) {
        cursor.advance();
    }

    #[inline]
    fn take_item(cursor: &mut C) -> R {
        cursor.take_item().into()
    }

    #[inline]
    fn equals(left: &C, right: &C) -> bool {
        left == right
    }
}

/// Handler for bidirectional cursors: [`MultiPass`] plus stepping backward.
#[derive(Copy, Clone)]
pub struct Reversible;

impl<C, R> CursorHandler<C, R> for Reversible
where
    C: BidirectionalCursor,
    C::Item: Into<R>,
{
    #[inline]
    fn get(cursor: &C) -> R {
        cursor.get().into()
    }

    #[inline]
    fn advance(cursor: &mut C) {
        cursor.advance();
    }

    #[inline]
    fn take_item(cursor: &mut C) -> R {
        cursor.take_item().into()
    }

    #[inline]
    fn equals(left: &C, right: &C) -> bool {
        left == right
    }

    #[inline]
    fn step_back(cursor: &mut C) {
        cursor.step_back();
    }
}

/// Handler for random-access cursors: [`Reversible`] plus jumps and
/// distances.
#[derive(Copy, Clone)]
pub struct Indexed;

impl<C, R> CursorHandler<C, R> for Indexed
where
    C: RandomAccessCursor,
    C::Item: Into<R>,
{
    #[inline]
    fn get(cursor: &C) -> R {
        cursor.get().into()
    }

    #[inline]
    fn advance(cursor: &mut C) {
        cursor.advance();
    }

    #[inline]
    fn take_item(cursor: &mut C) -> R {
        cursor.take_item().into()
    }

    #[inline]
    fn equals(left: &C, right: &C) -> bool {
        left == right
    }

    #[inline]
    fn step_back(cursor: &mut C) {
        cursor.step_back();
    }

    #[inline]
    fn jump(cursor: &mut C, offset: isize) {
        cursor.jump(offset);
    }

    #[inline]
    fn offset_from(cursor: &C, origin: &C) -> isize {
        cursor.offset_from(origin)
    }
}

/// Handler for end markers, dispatching to [`Sentinel::is_end`].
#[derive(Copy, Clone)]
pub struct EndCheck;

impl<S, C> SentinelHandler<S, C> for EndCheck
where
    S: Sentinel<C>,
{
    #[inline]
    fn is_end(sentinel: &S, cursor: &C) -> bool {
        sentinel.is_end(cursor)
    }
}

/// Handler producing the erased bounds of a sequence for the tier `T` and the
/// end capability `E`.
pub struct Bounds<T, E>(PhantomData<(T, E)>);

impl<V, R, T> BoundsHandler<V, R> for Bounds<T, SentinelEnd>
where
    V: Sequence,
    V::Cursor: CursorFor<T, SentinelEnd, R>,
    V::End: Clone,
    T: ErasedTier,
{
    #[inline]
    fn begin<'a>(view: &V) -> RawCursor<'a, R>
    where
        V: 'a,
    {
        view.begin().erase()
    }

    #[inline]
    fn end_sentinel<'a>(view: &V) -> RawSentinel<'a>
    where
        V: 'a,
    {
        RawSentinel::new::<V::End, V::Cursor, EndCheck>(view.end())
    }
}

impl<V, R, T> BoundsHandler<V, R> for Bounds<T, CommonEnd>
where
    V: CommonSequence,
    V::Cursor: CursorFor<T, CommonEnd, R>,
    T: ErasedTier,
{
    #[inline]
    fn begin<'a>(view: &V) -> RawCursor<'a, R>
    where
        V: 'a,
    {
        view.begin().erase()
    }

    #[inline]
    fn end_cursor<'a>(view: &V) -> RawCursor<'a, R>
    where
        V: 'a,
    {
        view.end_cursor().erase()
    }
}

impl<V, R, E> BoundsHandler<V, R> for Bounds<Contiguous, E>
where
    V: ContiguousSequence<Elem = R>,
    E: EndMarker,
{
    #[inline]
    fn as_slice(view: &V) -> &[R] {
        view.as_slice()
    }
}

/// Handler measuring a sequence according to the size capability `S`.
pub struct Size<S>(PhantomData<S>);

impl<V> SizeHandler<V> for Size<NoSize> {}

impl<V: SizedSequence> SizeHandler<V> for Size<ExactSize> {
    #[inline]
    fn len(view: &V) -> usize {
        view.len()
    }

    #[inline]
    fn reserve_hint(view: &V) -> usize {
        view.len()
    }
}

impl<V: ApproximatelySized> SizeHandler<V> for Size<ApproxSize> {
    #[inline]
    fn reserve_hint(view: &V) -> usize {
        view.reserve_hint()
    }
}
