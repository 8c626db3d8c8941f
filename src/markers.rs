//! Marker types describing the capabilities of an [`AnyView`](crate::AnyView).
//!
//! A view's capabilities are chosen when naming its type, by filling in the
//! five dimensions of [`Caps`]:
//!
//! | Dimension | Markers (default first)                                                         |
//! |-----------|---------------------------------------------------------------------------------|
//! | Tier      | [`Input`], [`Forward`], [`Bidirectional`], [`RandomAccess`], [`Contiguous`]     |
//! | Size      | [`NoSize`], [`ExactSize`], [`ApproxSize`]                                       |
//! | End       | [`SentinelEnd`], [`CommonEnd`]                                                  |
//! | Ownership | [`Copyable`], [`MoveOnly`]                                                      |
//! | Borrow    | [`Owned`], [`Borrowed`]                                                         |
//!
//! The markers only exist at the type level. They decide which methods the
//! view and its cursors expose, and which concrete sequences the view can be
//! built from: asking for a capability the sequence does not have is a
//! compile error.
//!
//! ```
//! use anyview::{AnyView, markers::*, sequences::SliceView};
//!
//! type Numbers<'a> = AnyView<'a, &'a i32, Caps<RandomAccess, ExactSize, CommonEnd>>;
//!
//! let numbers = vec![1, 2, 3];
//! let view: Numbers<'_> = AnyView::new(SliceView::new(&numbers));
//! assert_eq!(view.len(), 3);
//! ```
//!
//! ```compile_fail
//! use anyview::{AnyView, markers::*, sequences::StreamView};
//!
//! // A stream can only be traversed once
//! let view: AnyView<u32, Caps<Forward>> = AnyView::new(StreamView::new(0..3u32));
//! ```

use core::marker::PhantomData;

use anyview_internals::{
    RawCursor, RawView,
    handlers::{BoundsHandler, SizeHandler},
};

use crate::{
    handlers::{Bounds, Indexed, MultiPass, Reversible, SinglePass, Size},
    traversal::{
        BidirectionalCursor, BorrowedSequence, ForwardCursor, InputCursor, RandomAccessCursor,
    },
};

/// Traversal tier of a single pass.
///
/// Cursors can read and advance. Unless combined with [`CommonEnd`], they
/// cannot be cloned or compared.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash)]
pub struct Input;

/// Traversal tier of multiple passes: cursors can be cloned and compared.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash)]
pub struct Forward;

/// Traversal tier of [`Forward`] cursors that can also step backward.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash)]
pub struct Bidirectional;

/// Traversal tier of [`Bidirectional`] cursors that jump by offsets in
/// constant time and measure distances between each other.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash)]
pub struct RandomAccess;

/// Traversal tier of sequences laid out in a slice.
///
/// Contiguous views need no erased cursor at all: their bounds are
/// [`SliceCursor`](crate::sequences::SliceCursor)s into the slice.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash)]
pub struct Contiguous;

/// The view does not report its number of items.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash)]
pub struct NoSize;

/// The view reports its exact number of items in constant time.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash)]
pub struct ExactSize;

/// The view reports an estimate of its number of items, suitable only for
/// pre-sizing a destination container.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash)]
pub struct ApproxSize;

/// The view ends with an [`AnySentinel`](crate::AnySentinel).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash)]
pub struct SentinelEnd;

/// The view ends with an [`AnyIter`](crate::AnyIter) of the same type as its
/// beginning.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash)]
pub struct CommonEnd;

/// The view can be cloned. It requires the concrete sequence to be [`Clone`].
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash)]
pub struct Copyable;

/// The view can only be moved.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash)]
pub struct MoveOnly;

/// The view owns what its cursors refer to.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash)]
pub struct Owned;

/// The cursors of the view stay meaningful after the view is dropped. It
/// requires the concrete sequence to implement
/// [`BorrowedSequence`](crate::traversal::BorrowedSequence).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash)]
pub struct Borrowed;

/// The full set of capabilities of an [`AnyView`](crate::AnyView).
///
/// `Caps` is never constructed: it only bundles one marker per dimension.
/// See the [module documentation](self) for the available markers.
pub struct Caps<T = Input, S = NoSize, E = SentinelEnd, O = Copyable, B = Owned>(
    PhantomData<(T, S, E, O, B)>,
);

mod sealed {
    use super::*;

    pub trait Tier: 'static {}
    impl Tier for Input {}
    impl Tier for Forward {}
    impl Tier for Bidirectional {}
    impl Tier for RandomAccess {}
    impl Tier for Contiguous {}

    pub trait Size: 'static {}
    impl Size for NoSize {}
    impl Size for ExactSize {}
    impl Size for ApproxSize {}

    pub trait End: 'static {}
    impl End for SentinelEnd {}
    impl End for CommonEnd {}

    pub trait Ownership: 'static {}
    impl Ownership for Copyable {}
    impl Ownership for MoveOnly {}

    pub trait Borrow: 'static {}
    impl Borrow for Owned {}
    impl Borrow for Borrowed {}
}

/// Marker trait for traversal tiers.
///
/// This trait is sealed and cannot be implemented outside of this crate.
pub trait TierMarker: sealed::Tier {}
impl<T: sealed::Tier> TierMarker for T {}

/// Marker trait for size capabilities.
///
/// This trait is sealed and cannot be implemented outside of this crate.
pub trait SizeMarker: sealed::Size {}
impl<S: sealed::Size> SizeMarker for S {}

/// Marker trait for end capabilities.
///
/// This trait is sealed and cannot be implemented outside of this crate.
pub trait EndMarker: sealed::End {}
impl<E: sealed::End> EndMarker for E {}

/// Marker trait for ownership capabilities.
///
/// This trait is sealed and cannot be implemented outside of this crate.
pub trait OwnershipMarker: sealed::Ownership {}
impl<O: sealed::Ownership> OwnershipMarker for O {}

/// Marker trait for borrow capabilities.
///
/// This trait is sealed and cannot be implemented outside of this crate.
pub trait BorrowMarker: sealed::Borrow {}
impl<B: sealed::Borrow> BorrowMarker for B {}

mod sealed_erased_tier {
    use super::*;

    pub trait Sealed: 'static {}
    impl Sealed for Input {}
    impl Sealed for Forward {}
    impl Sealed for Bidirectional {}
    impl Sealed for RandomAccess {}
}

/// Marker trait for the tiers whose cursors are erased into an
/// [`AnyIter`](crate::AnyIter): every tier except [`Contiguous`].
///
/// This trait is sealed and cannot be implemented outside of this crate.
pub trait ErasedTier: TierMarker + sealed_erased_tier::Sealed {}
impl ErasedTier for Input {}
impl ErasedTier for Forward {}
impl ErasedTier for Bidirectional {}
impl ErasedTier for RandomAccess {}

/// Marker trait for the multi-pass tiers: [`Forward`] and above.
pub trait ForwardTier: ErasedTier {}
impl ForwardTier for Forward {}
impl ForwardTier for Bidirectional {}
impl ForwardTier for RandomAccess {}

/// Marker trait for the tiers whose cursors step backward:
/// [`Bidirectional`] and [`RandomAccess`].
pub trait BidirectionalTier: ForwardTier {}
impl BidirectionalTier for Bidirectional {}
impl BidirectionalTier for RandomAccess {}

/// Marker trait for the combinations of a tier and an end capability whose
/// cursors can be cloned and compared.
///
/// Every multi-pass tier qualifies. A single-pass [`Input`] cursor qualifies
/// only together with [`CommonEnd`], since reaching the end then means
/// comparing against a cursor.
pub trait MultiPassFor<E>: ErasedTier {}
impl<E: EndMarker> MultiPassFor<E> for Forward {}
impl<E: EndMarker> MultiPassFor<E> for Bidirectional {}
impl<E: EndMarker> MultiPassFor<E> for RandomAccess {}
impl MultiPassFor<CommonEnd> for Input {}

/// Marker trait for cursor types that can be erased into an
/// [`AnyIter<'a, R, T, E>`](crate::AnyIter).
///
/// # Implementations
///
/// - For `T = Input`: every [`InputCursor`]. Together with [`CommonEnd`] the
///   cursor must also be `Clone + PartialEq`.
/// - For `T = Forward`: every [`ForwardCursor`].
/// - For `T = Bidirectional`: every [`BidirectionalCursor`].
/// - For `T = RandomAccess`: every [`RandomAccessCursor`].
///
/// In every case the items of the cursor must convert into `R`.
///
/// ```compile_fail
/// use anyview::{AnyView, markers::*, sequences::Iota};
///
/// // Iota yields `i64`, which does not convert into `i32`
/// let view: AnyView<i32, Caps<Forward>> = AnyView::new(Iota::new(0, 3));
/// ```
///
/// A cursor is never erased above its own tier. This sequence only has a
/// forward cursor, so it can back a [`Forward`] view:
///
/// ```
/// use anyview::{
///     AnyView,
///     markers::*,
///     traversal::{ForwardCursor, InputCursor, Sequence},
/// };
///
/// #[derive(Clone)]
/// struct Letters<'a>(&'a str);
///
/// #[derive(Clone, PartialEq)]
/// struct LetterCursor<'a>(&'a str);
///
/// impl<'a> InputCursor for LetterCursor<'a> {
///     type Item = char;
///
///     fn get(&self) -> char {
///         self.0.chars().next().unwrap()
///     }
///
///     fn advance(&mut self) {
///         let width = self.get().len_utf8();
///         self.0 = &self.0[width..];
///     }
/// }
///
/// impl ForwardCursor for LetterCursor<'_> {}
///
/// impl<'a> Sequence for Letters<'a> {
///     type Cursor = LetterCursor<'a>;
///     type End = LetterCursor<'a>;
///
///     fn begin(&self) -> LetterCursor<'a> {
///         LetterCursor(self.0)
///     }
///
///     fn end(&self) -> LetterCursor<'a> {
///         LetterCursor(&self.0[self.0.len()..])
///     }
/// }
///
/// let text = String::from("añb");
/// let view: AnyView<'_, char, Caps<Forward>> = AnyView::new(Letters(&text));
/// assert_eq!(view.iter().collect::<String>(), "añb");
/// ```
///
/// but not a [`RandomAccess`] one:
///
/// ```compile_fail
/// use anyview::{
///     AnyView,
///     markers::*,
///     traversal::{ForwardCursor, InputCursor, Sequence},
/// };
///
/// #[derive(Clone)]
/// struct Letters<'a>(&'a str);
///
/// #[derive(Clone, PartialEq)]
/// struct LetterCursor<'a>(&'a str);
///
/// impl<'a> InputCursor for LetterCursor<'a> {
///     type Item = char;
///
///     fn get(&self) -> char {
///         self.0.chars().next().unwrap()
///     }
///
///     fn advance(&mut self) {
///         let width = self.get().len_utf8();
///         self.0 = &self.0[width..];
///     }
/// }
///
/// impl ForwardCursor for LetterCursor<'_> {}
///
/// impl<'a> Sequence for Letters<'a> {
///     type Cursor = LetterCursor<'a>;
///     type End = LetterCursor<'a>;
///
///     fn begin(&self) -> LetterCursor<'a> {
///         LetterCursor(self.0)
///     }
///
///     fn end(&self) -> LetterCursor<'a> {
///         LetterCursor(&self.0[self.0.len()..])
///     }
/// }
///
/// let text = String::from("añb");
/// let view: AnyView<'_, char, Caps<RandomAccess>> = AnyView::new(Letters(&text));
/// ```
pub trait CursorFor<T, E, R>: Sized {
    /// Erases the cursor.
    #[doc(hidden)]
    fn erase<'a>(self) -> RawCursor<'a, R>
    where
        Self: 'a;
}

impl<C, R> CursorFor<Input, SentinelEnd, R> for C
where
    C: InputCursor,
    C::Item: Into<R>,
{
    #[inline]
    fn erase<'a>(self) -> RawCursor<'a, R>
    where
        Self: 'a,
    {
        RawCursor::new::<C, SinglePass>(self)
    }
}

impl<C, R> CursorFor<Input, CommonEnd, R> for C
where
    C: InputCursor + Clone + PartialEq,
    C::Item: Into<R>,
{
    #[inline]
    fn erase<'a>(self) -> RawCursor<'a, R>
    where
        Self: 'a,
    {
        RawCursor::new_cloneable::<C, MultiPass>(self)
    }
}

impl<C, R, E> CursorFor<Forward, E, R> for C
where
    C: ForwardCursor,
    C::Item: Into<R>,
    E: EndMarker,
{
    #[inline]
    fn erase<'a>(self) -> RawCursor<'a, R>
    where
        Self: 'a,
    {
        RawCursor::new_cloneable::<C, MultiPass>(self)
    }
}

impl<C, R, E> CursorFor<Bidirectional, E, R> for C
where
    C: BidirectionalCursor,
    C::Item: Into<R>,
    E: EndMarker,
{
    #[inline]
    fn erase<'a>(self) -> RawCursor<'a, R>
    where
        Self: 'a,
    {
        RawCursor::new_cloneable::<C, Reversible>(self)
    }
}

impl<C, R, E> CursorFor<RandomAccess, E, R> for C
where
    C: RandomAccessCursor,
    C::Item: Into<R>,
    E: EndMarker,
{
    #[inline]
    fn erase<'a>(self) -> RawCursor<'a, R>
    where
        Self: 'a,
    {
        RawCursor::new_cloneable::<C, Indexed>(self)
    }
}

/// Marker trait for sequence types that can be stored with the ownership
/// capability `O`.
///
/// - For `O = MoveOnly`: every type.
/// - For `O = Copyable`: every type that is also [`Clone`].
pub trait StorageFor<O>: Sized {
    /// Moves the sequence into an erased view that lives at most as long as
    /// the sequence.
    #[doc(hidden)]
    fn store<'a, R, B, S>(self) -> RawView<'a, R>
    where
        Self: 'a,
        B: BoundsHandler<Self, R>,
        S: SizeHandler<Self>;
}

impl<V> StorageFor<MoveOnly> for V {
    #[inline]
    fn store<'a, R, B, S>(self) -> RawView<'a, R>
    where
        Self: 'a,
        B: BoundsHandler<Self, R>,
        S: SizeHandler<Self>,
    {
        RawView::new::<V, B, S>(self)
    }
}

impl<V: Clone> StorageFor<Copyable> for V {
    #[inline]
    fn store<'a, R, B, S>(self) -> RawView<'a, R>
    where
        Self: 'a,
        B: BoundsHandler<Self, R>,
        S: SizeHandler<Self>,
    {
        RawView::new_cloneable::<V, B, S>(self)
    }
}

/// Marker trait for sequence types that satisfy the borrow capability `B`.
///
/// - For `B = Owned`: every type.
/// - For `B = Borrowed`: every [`BorrowedSequence`].
pub trait BorrowFor<B> {}
impl<V> BorrowFor<Owned> for V {}
impl<V: BorrowedSequence> BorrowFor<Borrowed> for V {}

/// Marker trait for sequence types that can be erased into an
/// [`AnyView<'a, R, K>`](crate::AnyView).
///
/// Implemented for every sequence satisfying all five capabilities of
/// `K = Caps<T, S, E, O, B>`:
///
/// - Its cursor is a [`CursorFor<T, E, R>`](CursorFor), or for
///   `T = Contiguous`, it is a
///   [`ContiguousSequence`](crate::traversal::ContiguousSequence) of `R`.
/// - For `S = ExactSize` it is a
///   [`SizedSequence`](crate::traversal::SizedSequence), and for
///   `S = ApproxSize` it is
///   [`ApproximatelySized`](crate::traversal::ApproximatelySized).
/// - For `E = SentinelEnd` its end marker is `Clone`, and for `E = CommonEnd`
///   it is a [`CommonSequence`](crate::traversal::CommonSequence).
/// - It is a [`StorageFor<O>`](StorageFor) and a [`BorrowFor<B>`](BorrowFor).
///
/// ```compile_fail
/// use anyview::{AnyView, markers::*, sequences::StreamView};
///
/// // A stream only estimates its length
/// let view: AnyView<u8, Caps<Input, ExactSize, SentinelEnd, MoveOnly>> =
///     AnyView::new(StreamView::new(0..3u8));
/// ```
///
/// ```
/// use anyview::{AnyView, markers::*, sequences::StreamView};
///
/// let view: AnyView<u8, Caps<Input, ApproxSize, SentinelEnd, MoveOnly>> =
///     AnyView::new(StreamView::new(0..3u8));
/// assert_eq!(view.reserve_hint(), 3);
/// ```
pub trait SequenceFor<R, K>: Sized {
    /// Erases the sequence.
    #[doc(hidden)]
    fn erase<'a>(self) -> RawView<'a, R>
    where
        Self: 'a;
}

impl<V, R, T, S, E, O, B> SequenceFor<R, Caps<T, S, E, O, B>> for V
where
    V: StorageFor<O> + BorrowFor<B>,
    T: TierMarker,
    S: SizeMarker,
    E: EndMarker,
    O: OwnershipMarker,
    B: BorrowMarker,
    Bounds<T, E>: BoundsHandler<V, R>,
    Size<S>: SizeHandler<V>,
{
    #[inline]
    fn erase<'a>(self) -> RawView<'a, R>
    where
        Self: 'a,
    {
        <V as StorageFor<O>>::store::<'a, R, Bounds<T, E>, Size<S>>(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_multi_pass<T: MultiPassFor<E>, E>() {}

    #[test]
    fn test_multi_pass_tiers() {
        assert_multi_pass::<Input, CommonEnd>();
        assert_multi_pass::<Forward, SentinelEnd>();
        assert_multi_pass::<RandomAccess, CommonEnd>();
        static_assertions::assert_not_impl_any!(Input: MultiPassFor<SentinelEnd>);
        static_assertions::assert_not_impl_any!(Contiguous: ErasedTier);
    }

    #[test]
    fn test_markers_are_zero_sized() {
        assert_eq!(core::mem::size_of::<Caps<RandomAccess, ExactSize>>(), 0);
        assert_eq!(Input, Input::default());
    }
}
