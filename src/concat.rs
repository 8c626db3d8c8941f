//! Joining two sequences into one.
//!
//! [`concat`] traverses all items of its first sequence, then all items of
//! its second. The joined sequence keeps as much of its parts' capabilities as
//! it can: it is random-access if both cursors are and the first sequence
//! ends with a cursor, and it is sized if both parts are.
//!
//! ```
//! use anyview::{AnyView, concat, markers::*, sequences::{Iota, SharedView}};
//!
//! let view: AnyView<i64, Caps<RandomAccess, ExactSize>> =
//!     AnyView::new(concat(Iota::new(0, 3), SharedView::from(vec![10i64, 20])));
//! assert_eq!(view.len(), 5);
//! assert_eq!(view.begin().at(3), 10);
//! assert_eq!(view.iter().collect::<Vec<_>>(), [0, 1, 2, 10, 20]);
//! ```

use crate::traversal::{
    BidirectionalCursor, BorrowedSequence, ForwardCursor, InputCursor, RandomAccessCursor,
    Sentinel, Sequence, SizedSequence,
};

/// Two sequences traversed one after the other.
///
/// Created by [`concat`].
#[derive(Clone, Debug)]
pub struct Concat<A, B> {
    /// Traversed first
    first: A,
    /// Traversed once `first` is exhausted
    second: B,
}

/// Returns a sequence of the items of `first` followed by the items of
/// `second`.
///
/// The second sequence's cursor must be cloneable, since every cursor of the
/// joined sequence remembers where the second part begins.
#[inline]
#[must_use]
pub fn concat<A, B>(first: A, second: B) -> Concat<A, B> {
    Concat::new(first, second)
}

impl<A, B> Concat<A, B> {
    /// Joins `first` and `second`. Same as [`concat`].
    #[inline]
    #[must_use]
    pub const fn new(first: A, second: B) -> Self {
        Self { first, second }
    }

    /// Splits the joined sequence back into its parts.
    #[inline]
    #[must_use]
    pub fn into_parts(self) -> (A, B) {
        (self.first, self.second)
    }
}

impl<A, B> Sequence for Concat<A, B>
where
    A: Sequence,
    B: Sequence,
    B::Cursor: InputCursor<Item = <A::Cursor as InputCursor>::Item> + Clone,
{
    type Cursor = ConcatCursor<A::Cursor, A::End, B::Cursor>;
    type End = ConcatEnd<B::End>;

    fn begin(&self) -> Self::Cursor {
        ConcatCursor::new(self.first.begin(), self.first.end(), self.second.begin())
    }

    #[inline]
    fn end(&self) -> Self::End {
        ConcatEnd {
            second_end: self.second.end(),
        }
    }
}

impl<A, B> SizedSequence for Concat<A, B>
where
    A: SizedSequence,
    B: SizedSequence,
    Self: Sequence,
{
    #[inline]
    fn len(&self) -> usize {
        self.first.len() + self.second.len()
    }
}

impl<A: BorrowedSequence, B: BorrowedSequence> BorrowedSequence for Concat<A, B> {}

/// The part of a [`Concat`] a cursor is in.
#[derive(Clone, PartialEq, Debug)]
enum Segment<CA, CB> {
    /// Inside the first sequence, never at its end
    First(CA),
    /// Inside the second sequence or at its end
    Second(CB),
}

/// The cursor of a [`Concat`].
///
/// A cursor that reaches the end of the first sequence moves on to the
/// beginning of the second one immediately, so that the position between both
/// parts has a single representation.
///
/// Like any cursor, it must not be moved before the first item of the joined
/// sequence. Crossing back from the second part into an empty first part
/// panics in debug builds.
#[derive(Clone, Debug)]
pub struct ConcatCursor<CA, EA, CB> {
    /// Current position
    segment: Segment<CA, CB>,
    /// End of the first sequence
    first_end: EA,
    /// Beginning of the second sequence
    second_begin: CB,
    /// Whether the first sequence has no items
    first_empty: bool,
}

impl<CA, EA, CB> ConcatCursor<CA, EA, CB>
where
    EA: Sentinel<CA>,
    CB: Clone,
{
    /// Creates a cursor at `first_begin`, skipping ahead to `second_begin` if
    /// the first sequence is empty.
    fn new(first_begin: CA, first_end: EA, second_begin: CB) -> Self {
        let mut cursor = Self {
            segment: Segment::First(first_begin),
            first_end,
            second_begin,
            first_empty: false,
        };
        cursor.normalize();
        cursor.first_empty = matches!(cursor.segment, Segment::Second(_));
        cursor
    }

    /// Moves on to the second sequence once the end of the first is reached.
    fn normalize(&mut self) {
        if let Segment::First(cursor) = &self.segment
            && self.first_end.is_end(cursor)
        {
            self.segment = Segment::Second(self.second_begin.clone());
        }
    }
}

impl<CA, EA, CB> InputCursor for ConcatCursor<CA, EA, CB>
where
    CA: InputCursor,
    EA: Sentinel<CA>,
    CB: InputCursor<Item = CA::Item> + Clone,
{
    type Item = CA::Item;

    #[inline]
    fn get(&self) -> CA::Item {
        match &self.segment {
            Segment::First(cursor) => cursor.get(),
            Segment::Second(cursor) => cursor.get(),
        }
    }

    fn advance(&mut self) {
        match &mut self.segment {
            Segment::First(cursor) => {
                cursor.advance();
                self.normalize();
            }
            Segment::Second(cursor) => cursor.advance(),
        }
    }

    #[inline]
    fn take_item(&mut self) -> CA::Item {
        match &mut self.segment {
            Segment::First(cursor) => cursor.take_item(),
            Segment::Second(cursor) => cursor.take_item(),
        }
    }
}

impl<CA: PartialEq, EA, CB: PartialEq> PartialEq for ConcatCursor<CA, EA, CB> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.segment == other.segment
    }
}

impl<CA, EA, CB> ForwardCursor for ConcatCursor<CA, EA, CB>
where
    CA: ForwardCursor,
    EA: Sentinel<CA> + Clone,
    CB: ForwardCursor<Item = CA::Item>,
{
}

impl<C, CB> BidirectionalCursor for ConcatCursor<C, C, CB>
where
    C: BidirectionalCursor,
    CB: BidirectionalCursor<Item = C::Item>,
{
    /// # Panics
    ///
    /// In debug builds, panics if the cursor is at the beginning of the second
    /// sequence and the first sequence is empty.
    #[track_caller]
    fn step_back(&mut self) {
        if let Segment::Second(cursor) = &self.segment
            && *cursor == self.second_begin
        {
            debug_assert!(
                !self.first_empty,
                "stepped back before the beginning of a concatenation"
            );
            let mut cursor = self.first_end.clone();
            cursor.step_back();
            self.segment = Segment::First(cursor);
            return;
        }
        match &mut self.segment {
            Segment::First(cursor) => cursor.step_back(),
            Segment::Second(cursor) => cursor.step_back(),
        }
    }
}

impl<C, CB> ConcatCursor<C, C, CB>
where
    C: RandomAccessCursor,
    CB: RandomAccessCursor<Item = C::Item>,
{
    /// Returns the offset from the beginning of the second sequence, negative
    /// inside the first.
    fn position(&self) -> isize {
        match &self.segment {
            Segment::First(cursor) => cursor.offset_from(&self.first_end),
            Segment::Second(cursor) => cursor.offset_from(&self.second_begin),
        }
    }
}

impl<C, CB> RandomAccessCursor for ConcatCursor<C, C, CB>
where
    C: RandomAccessCursor,
    CB: RandomAccessCursor<Item = C::Item>,
{
    /// # Panics
    ///
    /// In debug builds, panics if the target lies before the beginning of the
    /// second sequence and the first sequence is empty.
    #[track_caller]
    fn jump(&mut self, offset: isize) {
        let target = self.position() + offset;
        debug_assert!(
            target >= 0 || !self.first_empty,
            "jumped before the beginning of a concatenation"
        );
        self.segment = if target < 0 {
            let mut cursor = self.first_end.clone();
            cursor.jump(target);
            Segment::First(cursor)
        } else {
            let mut cursor = self.second_begin.clone();
            cursor.jump(target);
            Segment::Second(cursor)
        };
    }

    #[inline]
    fn offset_from(&self, origin: &Self) -> isize {
        self.position() - origin.position()
    }
}

/// The end marker of a [`Concat`]: the end of its second sequence.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Hash)]
pub struct ConcatEnd<EB> {
    /// End of the second sequence
    second_end: EB,
}

impl<CA, EA, CB, EB: Sentinel<CB>> Sentinel<ConcatCursor<CA, EA, CB>> for ConcatEnd<EB> {
    #[inline]
    fn is_end(&self, cursor: &ConcatCursor<CA, EA, CB>) -> bool {
        match &cursor.segment {
            Segment::First(_) => false,
            Segment::Second(cursor) => self.second_end.is_end(cursor),
        }
    }
}
