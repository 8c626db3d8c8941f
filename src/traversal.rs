//! The cursor and sequence protocol that [`AnyView`](crate::AnyView) erases.
//!
//! A sequence hands out a *cursor* to its first item and an *end marker*.
//! Traversal reads the item under the cursor, advances, and stops once the
//! end marker reports that the cursor has reached it. The traits in this
//! module grade cursors by what they can do:
//!
//! | Trait                   | Adds                                        |
//! |-------------------------|---------------------------------------------|
//! | [`InputCursor`]         | reading and advancing, one pass only        |
//! | [`ForwardCursor`]       | duplicating and comparing positions         |
//! | [`BidirectionalCursor`] | stepping backward                           |
//! | [`RandomAccessCursor`]  | jumping by an offset and measuring distance |
//!
//! Sequences are graded the same way: [`SizedSequence`] knows its length in
//! constant time, [`ApproximatelySized`] can only estimate it,
//! [`CommonSequence`] ends with a cursor rather than a separate sentinel and
//! [`ContiguousSequence`] lays its items out in a slice.
//!
//! # Examples
//!
//! ```
//! use anyview::{sequences::Iota, traversal};
//!
//! let numbers = Iota::new(1, 4);
//! let collected: Vec<i64> = traversal::iter(&numbers).collect();
//! assert_eq!(collected, [1, 2, 3]);
//! ```

/// A cursor that reads items and moves forward through a single pass.
///
/// Once advanced, earlier positions may no longer be reachable: a copy of an
/// input cursor, if one can be made at all, is not guaranteed to observe the
/// same items.
pub trait InputCursor {
    /// The type of the items read through the cursor.
    type Item;

    /// Returns the item at the current position.
    fn get(&self) -> Self::Item;

    /// Moves the cursor to the next position.
    fn advance(&mut self);

    /// Moves the item at the current position out of the cursor.
    ///
    /// Defaults to [`get`](InputCursor::get). Cursors over sources that can
    /// only produce each item once override this to hand out ownership.
    fn take_item(&mut self) -> Self::Item {
        self.get()
    }
}

/// A cursor that can be duplicated, with every copy observing the same items.
///
/// Two forward cursors compare equal when they denote the same position.
pub trait ForwardCursor: InputCursor + Clone + PartialEq {}

/// A forward cursor that can also move backward.
pub trait BidirectionalCursor: ForwardCursor {
    /// Moves the cursor to the previous position.
    fn step_back(&mut self);
}

/// A bidirectional cursor that moves by arbitrary offsets in constant time.
pub trait RandomAccessCursor: BidirectionalCursor {
    /// Moves the cursor by `offset` positions, which may be negative.
    fn jump(&mut self, offset: isize);

    /// Returns the signed number of positions from `origin` to `self`.
    fn offset_from(&self, origin: &Self) -> isize;
}

/// An end marker for cursors of type `C`.
///
/// Every comparable cursor is its own sentinel, which is how sequences with a
/// common end are expressed.
pub trait Sentinel<C> {
    /// Returns `true` if `cursor` has reached this end marker.
    fn is_end(&self, cursor: &C) -> bool;
}

impl<C: InputCursor + PartialEq> Sentinel<C> for C {
    #[inline]
    fn is_end(&self, cursor: &C) -> bool {
        self == cursor
    }
}

/// A sequence of items, traversed from [`begin`](Sequence::begin) until
/// [`end`](Sequence::end).
///
/// Both bounds are produced from a shared reference. Single-pass sources that
/// consume their input keep that state behind interior mutability.
///
/// # Examples
///
/// ```
/// use anyview::traversal::{InputCursor, Sentinel, Sequence};
///
/// struct Evens(u32);
///
/// #[derive(Clone, PartialEq)]
/// struct EvenCursor(u32);
///
/// impl InputCursor for EvenCursor {
///     type Item = u32;
///
///     fn get(&self) -> u32 {
///         self.0
///     }
///
///     fn advance(&mut self) {
///         self.0 += 2;
///     }
/// }
///
/// #[derive(Clone)]
/// struct Below(u32);
///
/// impl Sentinel<EvenCursor> for Below {
///     fn is_end(&self, cursor: &EvenCursor) -> bool {
///         cursor.0 >= self.0
///     }
/// }
///
/// impl Sequence for Evens {
///     type Cursor = EvenCursor;
///     type End = Below;
///
///     fn begin(&self) -> EvenCursor {
///         EvenCursor(0)
///     }
///
///     fn end(&self) -> Below {
///         Below(self.0)
///     }
/// }
///
/// let evens: Vec<u32> = anyview::traversal::iter(&Evens(7)).collect();
/// assert_eq!(evens, [0, 2, 4, 6]);
/// ```
pub trait Sequence {
    /// The cursor type of the sequence.
    type Cursor: InputCursor;

    /// The end marker of the sequence.
    type End: Sentinel<Self::Cursor>;

    /// Returns a cursor to the first item.
    fn begin(&self) -> Self::Cursor;

    /// Returns the end marker.
    fn end(&self) -> Self::End;
}

/// A sequence that knows its number of items in constant time.
pub trait SizedSequence: Sequence {
    /// Returns the number of items.
    fn len(&self) -> usize;

    /// Returns `true` if the sequence has no items.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A sequence that can estimate its number of items.
///
/// The estimate is only meant for pre-sizing a destination container and
/// carries no correctness guarantee. Every [`SizedSequence`] reports its exact
/// length.
pub trait ApproximatelySized {
    /// Returns an estimate of the number of items.
    fn reserve_hint(&self) -> usize;
}

impl<S: SizedSequence> ApproximatelySized for S {
    #[inline]
    fn reserve_hint(&self) -> usize {
        self.len()
    }
}

/// A sequence whose end marker is a cursor of the same type as its begin.
///
/// Implemented for every [`Sequence`] with `End = Cursor`.
pub trait CommonSequence: Sequence {
    /// Returns the end of the sequence as a cursor.
    fn end_cursor(&self) -> Self::Cursor;
}

impl<S, C> CommonSequence for S
where
    S: Sequence<Cursor = C, End = C>,
    C: InputCursor + PartialEq,
{
    #[inline]
    fn end_cursor(&self) -> C {
        self.end()
    }
}

/// Marker for sequences whose cursors stay meaningful after the sequence
/// itself is dropped.
///
/// Views that merely borrow their items from elsewhere, or that compute them,
/// are borrowed. Sequences that own their items are not.
pub trait BorrowedSequence {}

/// A sequence whose items are laid out in a single slice.
pub trait ContiguousSequence {
    /// The element type of the slice.
    type Elem;

    /// Returns the items as a slice.
    fn as_slice(&self) -> &[Self::Elem];
}

/// An [`Iterator`] driven by a cursor and an end marker.
///
/// Created by [`iter`] or [`Iter::new`].
#[derive(Clone, Debug)]
pub struct Iter<C, S> {
    /// The current position
    cursor: C,
    /// Where iteration stops
    end: S,
}

impl<C, S> Iter<C, S>
where
    C: InputCursor,
    S: Sentinel<C>,
{
    /// Creates an iterator reading from `cursor` until it reaches `end`.
    #[inline]
    #[must_use]
    pub fn new(cursor: C, end: S) -> Self {
        Self { cursor, end }
    }

    /// Returns the cursor at the position of the next item.
    #[inline]
    #[must_use]
    pub fn cursor(&self) -> &C {
        &self.cursor
    }

    /// Splits the iterator back into its cursor and its end marker.
    #[inline]
    #[must_use]
    pub fn into_parts(self) -> (C, S) {
        (self.cursor, self.end)
    }
}

impl<C, S> Iterator for Iter<C, S>
where
    C: InputCursor,
    S: Sentinel<C>,
{
    type Item = C::Item;

    #[inline]
    fn next(&mut self) -> Option<C::Item> {
        if self.end.is_end(&self.cursor) {
            return None;
        }
        let item = self.cursor.take_item();
        self.cursor.advance();
        Some(item)
    }
}

/// Returns an iterator over the items of `sequence`.
#[inline]
#[must_use]
pub fn iter<S: Sequence + ?Sized>(sequence: &S) -> Iter<S::Cursor, S::End> {
    Iter::new(sequence.begin(), sequence.end())
}
