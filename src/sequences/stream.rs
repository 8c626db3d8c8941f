use alloc::rc::Rc;
use core::{cell::RefCell, fmt, iter::Fuse, mem};

use crate::traversal::{ApproximatelySized, InputCursor, Sentinel, Sequence};

/// A single-pass sequence reading from an [`Iterator`].
///
/// Every cursor of a stream shares the same position: advancing one cursor
/// advances all of them. The first item is pulled from the iterator when the
/// stream is first traversed.
///
/// Traversal moves each item out of the stream. Reading the current item
/// without moving it, with [`InputCursor::get`], clones it, which is only
/// possible for streams created with [`new`](Self::new). Streams created with
/// [`take_only`](Self::take_only) accept items of any type.
///
/// # Examples
///
/// ```
/// use anyview::{AnyView, markers::*, sequences::StreamView};
///
/// let view: AnyView<char, Caps<Input, ApproxSize, SentinelEnd, MoveOnly>> =
///     AnyView::new(StreamView::new("abc".chars()));
/// assert!(view.reserve_hint() >= 1);
/// assert_eq!(view.iter().collect::<String>(), "abc");
///
/// // The stream is exhausted after a single pass
/// assert_eq!(view.iter().count(), 0);
/// ```
pub struct StreamView<I: Iterator> {
    /// State shared between the view and its cursors
    state: Rc<RefCell<StreamState<I>>>,
}

/// The source of a stream and its current item.
struct StreamState<I: Iterator> {
    /// Remaining items
    source: Fuse<I>,
    /// The item at the current position
    slot: Slot<I::Item>,
    /// Copies the current item, if items can be copied
    read: Option<fn(&I::Item) -> I::Item>,
}

/// The item at the current position of a stream.
enum Slot<T> {
    /// Nothing has been read from the source yet
    Unread,
    /// The current item
    Ready(T),
    /// The current item was moved out
    Taken,
    /// The source is exhausted
    Done,
}

impl<I: Iterator> StreamState<I> {
    /// Reads the first item from the source if nothing was read yet.
    fn prime(&mut self) {
        if matches!(self.slot, Slot::Unread) {
            self.pull();
        }
    }

    /// Replaces the current item with the next one from the source.
    fn pull(&mut self) {
        self.slot = match self.source.next() {
            Some(item) => Slot::Ready(item),
            None => Slot::Done,
        };
    }
}

impl<I: Iterator> StreamView<I> {
    /// Creates a stream reading from `source`, whose current item can also be
    /// read without moving it out.
    #[must_use]
    pub fn new(source: I) -> Self
    where
        I::Item: Clone,
    {
        let read: fn(&I::Item) -> I::Item = <I::Item as Clone>::clone;
        Self::with_reader(source, Some(read))
    }

    /// Creates a stream reading from `source`, whose items can only be moved
    /// out.
    ///
    /// ```
    /// use anyview::{sequences::StreamView, traversal};
    ///
    /// struct Ticket(u32);
    ///
    /// let stream = StreamView::take_only([Ticket(4), Ticket(2)].into_iter());
    /// let numbers: Vec<u32> = traversal::iter(&stream).map(|ticket| ticket.0).collect();
    /// assert_eq!(numbers, [4, 2]);
    /// ```
    #[must_use]
    pub fn take_only(source: I) -> Self {
        Self::with_reader(source, None)
    }

    /// Creates a stream that reads its current item with `read`.
    fn with_reader(source: I, read: Option<fn(&I::Item) -> I::Item>) -> Self {
        Self {
            state: Rc::new(RefCell::new(StreamState {
                source: source.fuse(),
                slot: Slot::Unread,
                read,
            })),
        }
    }
}

impl<I: Iterator> fmt::Debug for StreamView<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamView")
            .field("source", &core::any::type_name::<I>())
            .finish()
    }
}

impl<I: Iterator> Sequence for StreamView<I> {
    type Cursor = StreamCursor<I>;
    type End = StreamEnd;

    #[inline]
    fn begin(&self) -> StreamCursor<I> {
        self.state.borrow_mut().prime();
        StreamCursor {
            state: Rc::clone(&self.state),
        }
    }

    #[inline]
    fn end(&self) -> StreamEnd {
        StreamEnd
    }
}

impl<I: Iterator> ApproximatelySized for StreamView<I> {
    /// Returns the lower bound of the source's
    /// [`size_hint`](Iterator::size_hint), counting an item that was read but
    /// not yet consumed.
    fn reserve_hint(&self) -> usize {
        let state = self.state.borrow();
        let pending = usize::from(matches!(state.slot, Slot::Ready(_)));
        state.source.size_hint().0.saturating_add(pending)
    }
}

/// The cursor of a [`StreamView`].
pub struct StreamCursor<I: Iterator> {
    /// State shared with the view and its other cursors
    state: Rc<RefCell<StreamState<I>>>,
}

impl<I: Iterator> fmt::Debug for StreamCursor<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamCursor").finish_non_exhaustive()
    }
}

impl<I: Iterator> InputCursor for StreamCursor<I> {
    type Item = I::Item;

    /// # Panics
    ///
    /// Panics if the stream was created with
    /// [`take_only`](StreamView::take_only), if it is exhausted, or if the
    /// current item was moved out with [`take_item`](InputCursor::take_item).
    #[track_caller]
    fn get(&self) -> I::Item {
        let mut state = self.state.borrow_mut();
        let Some(read) = state.read else {
            panic!("the items of this stream can only be moved out with `take_item`")
        };
        state.prime();
        match &state.slot {
            Slot::Ready(item) => read(item),
            Slot::Taken => panic!("the current item of the stream was already taken"),
            Slot::Unread | Slot::Done => panic!("read past the end of the stream"),
        }
    }

    fn advance(&mut self) {
        let mut state = self.state.borrow_mut();
        state.prime();
        if !matches!(state.slot, Slot::Done) {
            state.pull();
        }
    }

    /// # Panics
    ///
    /// Panics if the stream is exhausted or the current item was already
    /// moved out.
    #[track_caller]
    fn take_item(&mut self) -> I::Item {
        let mut state = self.state.borrow_mut();
        state.prime();
        match mem::replace(&mut state.slot, Slot::Taken) {
            Slot::Ready(item) => item,
            Slot::Taken => panic!("the current item of the stream was already taken"),
            slot @ (Slot::Unread | Slot::Done) => {
                state.slot = slot;
                panic!("read past the end of the stream")
            }
        }
    }
}

/// The end marker of a [`StreamView`], reached once the source is
/// exhausted.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Hash)]
pub struct StreamEnd;

impl<I: Iterator> Sentinel<StreamCursor<I>> for StreamEnd {
    fn is_end(&self, cursor: &StreamCursor<I>) -> bool {
        let mut state = cursor.state.borrow_mut();
        state.prime();
        matches!(state.slot, Slot::Done)
    }
}

#[cfg(test)]
mod tests {
    use alloc::{string::String, vec::Vec};

    use super::*;
    use crate::traversal;

    #[test]
    fn test_stream_single_pass() {
        let stream = StreamView::new([1, 2, 3].into_iter());
        let mut first = traversal::iter(&stream);
        assert_eq!(first.next(), Some(1));

        // A second traversal resumes where the first one stopped
        let rest: Vec<i32> = traversal::iter(&stream).collect();
        assert_eq!(rest, [2, 3]);
        assert_eq!(first.next(), None);
    }

    #[test]
    fn test_stream_reserve_hint() {
        let stream = StreamView::new(0..5u8);
        assert_eq!(stream.reserve_hint(), 5);

        let cursor = stream.begin();
        assert_eq!(cursor.get(), 0);
        assert_eq!(stream.reserve_hint(), 5);

        let filtered = StreamView::new((0..5u8).filter(|n| n % 2 == 0));
        assert_eq!(filtered.reserve_hint(), 0);
    }

    #[test]
    fn test_stream_take_item() {
        let stream = StreamView::new([String::from("a"), String::from("b")].into_iter());
        let mut cursor = stream.begin();
        assert_eq!(cursor.take_item(), "a");
        cursor.advance();
        assert_eq!(cursor.get(), "b");
        cursor.advance();
        assert!(StreamEnd.is_end(&cursor));
    }

    /// An item that cannot be cloned.
    #[derive(Debug, PartialEq)]
    struct Token(String);

    #[test]
    fn test_stream_of_items_without_clone() {
        let tokens = ["a", "b"].map(|name| Token(String::from(name)));
        let stream = StreamView::take_only(tokens.into_iter());
        assert_eq!(stream.reserve_hint(), 2);

        let mut cursor = stream.begin();
        assert_eq!(cursor.take_item(), Token(String::from("a")));
        cursor.advance();
        assert!(!StreamEnd.is_end(&cursor));

        let rest: Vec<Token> = traversal::iter(&stream).collect();
        assert_eq!(rest, [Token(String::from("b"))]);
        assert!(StreamEnd.is_end(&cursor));
    }

    #[test]
    #[should_panic(expected = "can only be moved out with `take_item`")]
    fn test_stream_get_without_clone_panics() {
        let stream = StreamView::take_only([Token(String::from("a"))].into_iter());
        let _ = stream.begin().get();
    }

    #[test]
    #[should_panic(expected = "already taken")]
    fn test_stream_get_after_take_panics() {
        let stream = StreamView::new([String::from("a")].into_iter());
        let mut cursor = stream.begin();
        let _ = cursor.take_item();
        let _ = cursor.get();
    }
}
