use crate::traversal::{
    BidirectionalCursor, BorrowedSequence, ForwardCursor, InputCursor, RandomAccessCursor,
    Sentinel, Sequence, SizedSequence,
};

/// The integers from `start` up to, but not including, `end`.
///
/// # Examples
///
/// ```
/// use anyview::{sequences::Iota, traversal};
///
/// assert_eq!(traversal::iter(&Iota::new(-1, 2)).collect::<Vec<_>>(), [-1, 0, 1]);
/// assert_eq!(traversal::iter(&Iota::new(5, 2)).count(), 0);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub struct Iota {
    /// First value
    start: i64,
    /// One past the last value, never below `start`
    end: i64,
}

impl Iota {
    /// Creates the sequence `start..end`. It is empty if `end <= start`.
    #[inline]
    #[must_use]
    pub const fn new(start: i64, end: i64) -> Self {
        let end = if end < start { start } else { end };
        Self { start, end }
    }
}

impl Sequence for Iota {
    type Cursor = IotaCursor;
    type End = IotaCursor;

    #[inline]
    fn begin(&self) -> IotaCursor {
        IotaCursor(self.start)
    }

    #[inline]
    fn end(&self) -> IotaCursor {
        IotaCursor(self.end)
    }
}

impl SizedSequence for Iota {
    /// # Panics
    ///
    /// Panics if the number of integers does not fit in a `usize`, which can
    /// only happen on targets narrower than 64 bits.
    #[inline]
    #[track_caller]
    fn len(&self) -> usize {
        let len = self.end.abs_diff(self.start);
        usize::try_from(len).unwrap_or_else(|_| panic!("{len} integers do not fit in usize"))
    }
}

impl BorrowedSequence for Iota {}

/// The integers from `start` upward, without end.
///
/// Created by [`iota_from`].
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub struct IotaFrom {
    /// First value
    start: i64,
}

/// Returns the unbounded sequence of integers starting at `start`.
///
/// ```
/// use anyview::{sequences::iota_from, traversal};
///
/// let first: Vec<i64> = traversal::iter(&iota_from(7)).take(2).collect();
/// assert_eq!(first, [7, 8]);
/// ```
#[inline]
#[must_use]
pub const fn iota_from(start: i64) -> IotaFrom {
    IotaFrom { start }
}

impl Sequence for IotaFrom {
    type Cursor = IotaCursor;
    type End = Unreachable;

    #[inline]
    fn begin(&self) -> IotaCursor {
        IotaCursor(self.start)
    }

    #[inline]
    fn end(&self) -> Unreachable {
        Unreachable
    }
}

impl BorrowedSequence for IotaFrom {}

/// Cursor over [`Iota`] and [`IotaFrom`], positioned at an integer.
///
/// Moving the cursor wraps around at the bounds of `i64`.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub struct IotaCursor(i64);

impl IotaCursor {
    /// Returns the integer the cursor is positioned at.
    #[inline]
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl InputCursor for IotaCursor {
    type Item = i64;

    #[inline]
    fn get(&self) -> i64 {
        self.0
    }

    #[inline]
    fn advance(&mut self) {
        self.0 = self.0.wrapping_add(1);
    }
}

impl ForwardCursor for IotaCursor {}

impl BidirectionalCursor for IotaCursor {
    #[inline]
    fn step_back(&mut self) {
        self.0 = self.0.wrapping_sub(1);
    }
}

impl RandomAccessCursor for IotaCursor {
    #[inline]
    fn jump(&mut self, offset: isize) {
        // `isize` is at most 64 bits wide on every supported target
        self.0 = self.0.wrapping_add(offset as i64);
    }

    /// # Panics
    ///
    /// Panics if the distance does not fit in an `isize`.
    #[inline]
    #[track_caller]
    fn offset_from(&self, origin: &Self) -> isize {
        let distance = i128::from(self.0) - i128::from(origin.0);
        isize::try_from(distance)
            .unwrap_or_else(|_| panic!("distance of {distance} does not fit in isize"))
    }
}

/// An end marker that no cursor ever reaches.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Hash)]
pub struct Unreachable;

impl<C> Sentinel<C> for Unreachable {
    #[inline]
    fn is_end(&self, _cursor: &C) -> bool {
        false
    }
}
