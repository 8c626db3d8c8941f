//! Handlers that define how erased cursors, sentinels and views dispatch to
//! their concrete types.
//!
//! Every erased value carries a vtable generated from a handler type. The
//! handler decides which operations the erased value supports: operations a
//! handler does not override fall back to a default that panics with an
//! "unsupported operation" message. The safe `anyview` crate only hands out
//! erased values through types that never reach those defaults.
//!
//! The erased values may borrow. Methods that produce erased cursors and
//! sentinels are generic over the lifetime `'a` they are erased for, and may
//! rely on the sequence outliving it.

use crate::{cursor::RawCursor, sentinel::RawSentinel};

/// Panics because the handler of an erased value does not support
/// `operation`.
#[cold]
#[track_caller]
pub fn unsupported(operation: &'static str) -> ! {
    panic!("unsupported operation `{operation}` on an erased value")
}

/// Trait for driving a concrete cursor of type `C` that yields items of type
/// `R` through an erased [`RawCursor<'_, R>`](RawCursor).
///
/// # Required Methods
///
/// - [`get`](CursorHandler::get): Reads the current item
/// - [`advance`](CursorHandler::advance): Steps to the next position
///
/// # Optional Methods
///
/// - [`take_item`](CursorHandler::take_item): Moves the current item out.
///   Defaults to [`get`](CursorHandler::get).
/// - [`equals`](CursorHandler::equals),
///   [`step_back`](CursorHandler::step_back), [`jump`](CursorHandler::jump)
///   and [`offset_from`](CursorHandler::offset_from): Panic unless
///   overridden.
///
/// # Examples
///
/// ```
/// use anyview_internals::{RawCursor, handlers::CursorHandler};
///
/// struct Countdown(u8);
///
/// struct CountdownHandler;
///
/// impl CursorHandler<Countdown, u8> for CountdownHandler {
///     fn get(cursor: &Countdown) -> u8 {
///         cursor.0
///     }
///
///     fn advance(cursor: &mut Countdown) {
///         cursor.0 -= 1;
///     }
/// }
///
/// let mut cursor = RawCursor::new::<Countdown, CountdownHandler>(Countdown(3));
/// cursor.advance();
/// assert_eq!(cursor.get(), 2);
/// ```
pub trait CursorHandler<C, R>: 'static {
    /// Returns the item at the current position.
    fn get(cursor: &C) -> R;

    /// Moves the cursor one position forward.
    fn advance(cursor: &mut C);

    /// Moves the item at the current position out of the cursor.
    ///
    /// The default implementation reads the item with
    /// [`get`](CursorHandler::get).
    fn take_item(cursor: &mut C) -> R {
        Self::get(cursor)
    }

    /// Returns whether two cursors of the same concrete type denote the same
    /// position.
    #[track_caller]
    fn equals(left: &C, right: &C) -> bool {
        let _ = (left, right);
        unsupported("equals")
    }

    /// Moves the cursor one position backward.
    #[track_caller]
    fn step_back(cursor: &mut C) {
        let _ = cursor;
        unsupported("step_back")
    }

    /// Moves the cursor by `offset` positions, which may be negative.
    #[track_caller]
    fn jump(cursor: &mut C, offset: isize) {
        let _ = (cursor, offset);
        unsupported("jump")
    }

    /// Returns the signed number of positions from `origin` to `cursor`.
    #[track_caller]
    fn offset_from(cursor: &C, origin: &C) -> isize {
        let _ = (cursor, origin);
        unsupported("offset_from")
    }
}

/// Trait for checking whether a cursor of type `C` has reached the end marked
/// by a sentinel of type `S`.
///
/// Erased sentinels only ever compare against cursors of the type `C` they
/// were created for. A cursor of any other type is never at the end.
pub trait SentinelHandler<S, C>: 'static {
    /// Returns whether `cursor` has reached `sentinel`.
    fn is_end(sentinel: &S, cursor: &C) -> bool;
}

/// Trait for producing the erased bounds of a concrete sequence of type `V`
/// whose cursors yield items of type `R`.
///
/// All methods panic unless overridden: a handler implements the subset that
/// matches the shape of the sequence.
///
/// - Sequences whose end is a separate sentinel implement
///   [`begin`](BoundsHandler::begin) and
///   [`end_sentinel`](BoundsHandler::end_sentinel).
/// - Sequences whose end is a cursor implement
///   [`begin`](BoundsHandler::begin) and
///   [`end_cursor`](BoundsHandler::end_cursor).
/// - Sequences backed by contiguous memory implement
///   [`as_slice`](BoundsHandler::as_slice).
pub trait BoundsHandler<V, R>: 'static {
    /// Returns an erased cursor to the first item of the sequence.
    #[track_caller]
    fn begin<'a>(view: &V) -> RawCursor<'a, R>
    where
        V: 'a,
    {
        let _ = view;
        unsupported("begin")
    }

    /// Returns an erased sentinel marking the end of the sequence.
    #[track_caller]
    fn end_sentinel<'a>(view: &V) -> RawSentinel<'a>
    where
        V: 'a,
    {
        let _ = view;
        unsupported("end_sentinel")
    }

    /// Returns an erased cursor one past the last item of the sequence.
    #[track_caller]
    fn end_cursor<'a>(view: &V) -> RawCursor<'a, R>
    where
        V: 'a,
    {
        let _ = view;
        unsupported("end_cursor")
    }

    /// Returns the items of the sequence as a slice.
    #[track_caller]
    fn as_slice(view: &V) -> &[R] {
        let _ = view;
        unsupported("as_slice")
    }
}

/// Trait for measuring a concrete sequence of type `V`.
///
/// Both methods panic unless overridden.
pub trait SizeHandler<V>: 'static {
    /// Returns the exact number of items in the sequence.
    #[track_caller]
    fn len(view: &V) -> usize {
        let _ = view;
        unsupported("len")
    }

    /// Returns an estimate of the number of items in the sequence, suitable
    /// for pre-sizing a destination container.
    #[track_caller]
    fn reserve_hint(view: &V) -> usize {
        let _ = view;
        unsupported("reserve_hint")
    }
}
