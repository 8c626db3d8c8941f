use core::{
    cmp::Ordering,
    fmt,
    ops::{Add, Sub},
};

use crate::traversal::{
    BidirectionalCursor, BorrowedSequence, ContiguousSequence, ForwardCursor, InputCursor,
    RandomAccessCursor, Sequence, SizedSequence,
};

/// A sequence over a borrowed slice.
///
/// # Examples
///
/// ```
/// use anyview::{sequences::SliceView, traversal};
///
/// let letters = ['x', 'y'];
/// let view = SliceView::new(&letters);
/// assert_eq!(traversal::iter(&view).collect::<Vec<_>>(), [&'x', &'y']);
/// ```
pub struct SliceView<'a, T> {
    /// The items
    slice: &'a [T],
}

impl<'a, T> SliceView<'a, T> {
    /// Creates a view over `slice`.
    #[inline]
    #[must_use]
    pub const fn new(slice: &'a [T]) -> Self {
        Self { slice }
    }
}

impl<T> Clone for SliceView<'_, T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for SliceView<'_, T> {}

impl<T: fmt::Debug> fmt::Debug for SliceView<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SliceView").field(&self.slice).finish()
    }
}

impl<'a, T> Sequence for SliceView<'a, T> {
    type Cursor = SliceCursor<'a, T>;
    type End = SliceCursor<'a, T>;

    #[inline]
    fn begin(&self) -> SliceCursor<'a, T> {
        SliceCursor::new(self.slice, 0)
    }

    #[inline]
    fn end(&self) -> SliceCursor<'a, T> {
        SliceCursor::new(self.slice, self.slice.len())
    }
}

impl<T> SizedSequence for SliceView<'_, T> {
    #[inline]
    fn len(&self) -> usize {
        self.slice.len()
    }
}

impl<T> ContiguousSequence for SliceView<'_, T> {
    type Elem = T;

    #[inline]
    fn as_slice(&self) -> &[T] {
        self.slice
    }
}

impl<T> BorrowedSequence for SliceView<'_, T> {}

/// A cursor into a slice, yielding references to its elements.
///
/// Cursors into different slices are never equal.
pub struct SliceCursor<'a, T> {
    /// The slice traversed
    slice: &'a [T],
    /// Position within `slice`, `slice.len()` at the end
    index: usize,
}

impl<'a, T> SliceCursor<'a, T> {
    /// Creates a cursor at position `index` of `slice`.
    #[inline]
    #[must_use]
    pub const fn new(slice: &'a [T], index: usize) -> Self {
        Self { slice, index }
    }

    /// Returns the position of the cursor within its slice.
    #[inline]
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Returns `true` if both cursors traverse the same slice.
    #[inline]
    fn same_slice(&self, other: &Self) -> bool {
        core::ptr::eq(self.slice, other.slice)
    }
}

impl<T> Clone for SliceCursor<'_, T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for SliceCursor<'_, T> {}

impl<T> PartialEq for SliceCursor<'_, T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.same_slice(other) && self.index == other.index
    }
}

impl<T> PartialOrd for SliceCursor<'_, T> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if !self.same_slice(other) {
            return None;
        }
        Some(self.index.cmp(&other.index))
    }
}

impl<T> fmt::Debug for SliceCursor<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SliceCursor")
            .field("index", &self.index)
            .field("len", &self.slice.len())
            .finish()
    }
}

impl<'a, T> InputCursor for SliceCursor<'a, T> {
    type Item = &'a T;

    /// # Panics
    ///
    /// Panics if the cursor is at the end of its slice.
    #[inline]
    #[track_caller]
    fn get(&self) -> &'a T {
        &self.slice[self.index]
    }

    #[inline]
    fn advance(&mut self) {
        self.index += 1;
    }
}

impl<T> ForwardCursor for SliceCursor<'_, T> {}

impl<T> BidirectionalCursor for SliceCursor<'_, T> {
    #[inline]
    fn step_back(&mut self) {
        self.index -= 1;
    }
}

impl<T> RandomAccessCursor for SliceCursor<'_, T> {
    #[inline]
    fn jump(&mut self, offset: isize) {
        self.index = self.index.wrapping_add_signed(offset);
    }

    #[inline]
    fn offset_from(&self, origin: &Self) -> isize {
        self.index.wrapping_sub(origin.index) as isize
    }
}

impl<T> Add<isize> for SliceCursor<'_, T> {
    type Output = Self;

    #[inline]
    fn add(mut self, offset: isize) -> Self {
        self.jump(offset);
        self
    }
}

impl<T> Sub<isize> for SliceCursor<'_, T> {
    type Output = Self;

    #[inline]
    fn sub(mut self, offset: isize) -> Self {
        self.jump(-offset);
        self
    }
}

impl<T> Sub for SliceCursor<'_, T> {
    type Output = isize;

    #[inline]
    fn sub(self, origin: Self) -> isize {
        self.offset_from(&origin)
    }
}
